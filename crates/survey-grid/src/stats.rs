//! Capture statistics for a planned survey: image count, flight time and
//! how many batteries that takes.
//!
//! The model is deliberately coarse. A camera footprint that grows with
//! altitude, a fixed forward/side overlap, and a fixed time per image.

use serde::{Deserialize, Serialize};

use crate::coverage::CoverageMode;

/// Tunable constants of the estimate. Every field has a default, so a
/// mission file can override just the ones it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsModel {
    /// Ground footprint width per meter of altitude.
    pub footprint_width_ratio: f64,
    /// Ground footprint height per meter of altitude.
    pub footprint_height_ratio: f64,
    /// Fraction of each image shared with its neighbors, 0..1.
    pub overlap: f64,
    /// Photo interval.
    pub seconds_per_image: f64,
    /// Used only by [`StatsModel::estimate_with_path`].
    pub cruise_speed_mps: f64,
    pub battery_endurance_seconds: f64,
}

impl Default for StatsModel {
    fn default() -> Self {
        Self {
            footprint_width_ratio: 1.2,
            footprint_height_ratio: 0.9,
            overlap: 0.7,
            seconds_per_image: 2.0,
            cruise_speed_mps: 10.0,
            battery_endurance_seconds: 1200.0,
        }
    }
}

/// Result of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MissionStats {
    pub images: u64,
    pub duration_seconds: f64,
    pub batteries: u32,
}

impl MissionStats {
    /// Duration as whole minutes, rounded up.
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds / 60.0).ceil() as u64
    }
}

impl StatsModel {
    /// New ground area covered by each image, m².
    pub fn effective_image_area(&self, altitude_m: f64) -> f64 {
        let footprint = self.footprint_width_ratio
            * altitude_m
            * self.footprint_height_ratio
            * altitude_m;
        footprint * (1.0 - self.overlap)
    }

    /// Images needed for one pass over `area_m2`.
    fn single_pass_images(&self, area_m2: f64, altitude_m: f64) -> u64 {
        let effective = self.effective_image_area(altitude_m);
        if !(effective > 0.0) {
            return 0;
        }
        (area_m2 / effective).ceil() as u64
    }

    /// Estimate from area, altitude and mode alone.
    pub fn estimate(&self, area_m2: f64, altitude_m: f64, mode: CoverageMode) -> MissionStats {
        self.estimate_with_path(area_m2, altitude_m, mode, 0.0)
    }

    /// Like [`estimate`](Self::estimate), plus the time spent flying
    /// `path_length_m` at cruise speed.
    ///
    /// `path_length_m` is one pass over the field. Cross-hatch flies the
    /// area twice, so its distance counts once per pass like its images.
    pub fn estimate_with_path(
        &self,
        area_m2: f64,
        altitude_m: f64,
        mode: CoverageMode,
        path_length_m: f64,
    ) -> MissionStats {
        if !(area_m2 > 0.0) || !(altitude_m > 0.0) {
            return MissionStats::default();
        }

        let passes = mode.passes();
        let pass_images = self.single_pass_images(area_m2, altitude_m);
        let mut pass_seconds = pass_images as f64 * self.seconds_per_image;
        if path_length_m > 0.0 && self.cruise_speed_mps > 0.0 {
            pass_seconds += path_length_m / self.cruise_speed_mps;
        }
        let images = pass_images * passes as u64;
        let duration_seconds = pass_seconds * passes as f64;

        let batteries = if self.battery_endurance_seconds > 0.0 {
            (duration_seconds / self.battery_endurance_seconds).ceil() as u32
        } else {
            0
        };

        MissionStats {
            images,
            duration_seconds,
            batteries,
        }
    }
}

/// Estimate with the default model.
pub fn estimate_stats(area_m2: f64, altitude_m: f64, mode: CoverageMode) -> MissionStats {
    StatsModel::default().estimate(area_m2, altitude_m, mode)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_pass_numbers() {
        // 30 m altitude: 36 m x 27 m footprint, 30 % of it new = 291.6 m²
        let stats = estimate_stats(100_000.0, 30.0, CoverageMode::Single);
        assert_eq!(stats.images, 343);
        assert_relative_eq!(stats.duration_seconds, 686.0);
        assert_eq!(stats.batteries, 1);
    }

    #[test]
    fn cross_hatch_doubles_exactly() {
        for (area, alt) in [(12_345.0, 25.0), (100_000.0, 30.0), (2.5e6, 80.0)] {
            let single = estimate_stats(area, alt, CoverageMode::Single);
            let double = estimate_stats(area, alt, CoverageMode::CrossHatch);
            assert_eq!(double.images, 2 * single.images);
            assert_relative_eq!(double.duration_seconds, 2.0 * single.duration_seconds);
            assert!(double.batteries >= single.batteries);
        }
    }

    #[test]
    fn higher_altitude_needs_fewer_images() {
        let low = estimate_stats(500_000.0, 30.0, CoverageMode::Single);
        let high = estimate_stats(500_000.0, 60.0, CoverageMode::Single);
        // Footprint scales with altitude squared
        assert!(high.images * 4 <= low.images + 4);
        assert!(high.images < low.images);
    }

    #[test]
    fn batteries_round_up() {
        let model = StatsModel {
            battery_endurance_seconds: 600.0,
            ..StatsModel::default()
        };
        let stats = model.estimate(100_000.0, 30.0, CoverageMode::Single);
        assert_relative_eq!(stats.duration_seconds, 686.0);
        assert_eq!(stats.batteries, 2);
    }

    #[test]
    fn path_term_adds_flight_time() {
        let model = StatsModel::default();
        let base = model.estimate(100_000.0, 30.0, CoverageMode::Single);
        let flown = model.estimate_with_path(100_000.0, 30.0, CoverageMode::Single, 5_000.0);
        assert_eq!(flown.images, base.images);
        assert_relative_eq!(flown.duration_seconds, base.duration_seconds + 500.0);
    }

    #[test]
    fn cross_hatch_flies_the_path_twice() {
        let model = StatsModel::default();
        let single = model.estimate_with_path(100_000.0, 30.0, CoverageMode::Single, 8_000.0);
        let double = model.estimate_with_path(100_000.0, 30.0, CoverageMode::CrossHatch, 8_000.0);
        assert_eq!(double.images, 2 * single.images);
        assert_relative_eq!(single.duration_seconds, 686.0 + 800.0);
        assert_relative_eq!(double.duration_seconds, 2.0 * single.duration_seconds);
        assert_eq!(double.batteries, 3);
    }

    #[test]
    fn nothing_to_fly() {
        assert_eq!(estimate_stats(0.0, 30.0, CoverageMode::Single), MissionStats::default());
        assert_eq!(estimate_stats(1000.0, 0.0, CoverageMode::CrossHatch), MissionStats::default());
        assert_eq!(estimate_stats(-5.0, 30.0, CoverageMode::Single), MissionStats::default());
        assert_eq!(estimate_stats(f64::NAN, 30.0, CoverageMode::Single), MissionStats::default());
    }

    #[test]
    fn model_overrides_from_partial_json() {
        let model: StatsModel = serde_json::from_str(r#"{ "overlap": 0.8 }"#).unwrap();
        assert_relative_eq!(model.overlap, 0.8);
        assert_relative_eq!(model.seconds_per_image, 2.0);
    }
}
