//! Common utilities shared across CLI commands.

use std::fs;

use anyhow::{Context, Result};

use survey_grid::{CoveragePlan, Point, VertexRing};

/// Output format for a planned survey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Kml,
    Svg,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "kml" => Some(OutputFormat::Kml),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

const PADDING: f64 = 20.0;

/// Maps geographic points into SVG pixel space.
///
/// Longitude is scaled by cos(latitude) at the ring's center so the
/// preview keeps its real aspect ratio, and y grows southwards.
struct Viewport {
    min_x: f64,
    max_y: f64,
    lng_scale: f64,
    scale: f64,
}

impl Viewport {
    fn fit(ring: &VertexRing, width: u32, height: u32) -> Option<Viewport> {
        let (min_lng, min_lat, max_lng, max_lat) = ring.bounding_box()?;
        let lng_scale = ((min_lat + max_lat) / 2.0).to_radians().cos();

        let span_x = (max_lng - min_lng) * lng_scale;
        let span_y = max_lat - min_lat;
        if !(span_x > 0.0) || !(span_y > 0.0) {
            return None;
        }

        let scale_x = (width as f64 - PADDING * 2.0) / span_x;
        let scale_y = (height as f64 - PADDING * 2.0) / span_y;
        Some(Viewport {
            min_x: min_lng * lng_scale,
            max_y: max_lat,
            lng_scale,
            scale: scale_x.min(scale_y),
        })
    }

    fn project(&self, p: Point) -> (f64, f64) {
        (
            PADDING + (p.lng * self.lng_scale - self.min_x) * self.scale,
            PADDING + (self.max_y - p.lat) * self.scale,
        )
    }

    /// "x1,y1 x2,y2 ..." for a polyline or polygon `points` attribute.
    fn points_attr(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|&p| {
                let (x, y) = self.project(p);
                format!("{:.2},{:.2}", x, y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render the ring and its plan as a standalone SVG document.
///
/// Layers bottom to top: the survey area, the cross-hatch overlay, the
/// stitched flight path, and a marker at the path start. A ring with no
/// extent renders as an empty canvas.
pub fn plan_to_svg(name: &str, ring: &VertexRing, plan: &CoveragePlan, width: u32, height: u32) -> String {
    let mut svg = format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <title>{title}</title>
  <rect width="100%" height="100%" fill="white"/>
"##,
        w = width,
        h = height,
        title = escape_text(name),
    );

    let Some(view) = Viewport::fit(ring, width, height) else {
        svg.push_str("</svg>\n");
        return svg;
    };

    svg.push_str(&format!(
        "  <polygon points=\"{}\" fill=\"#e8f4e8\" stroke=\"#2e7d32\" stroke-width=\"2\"/>\n",
        view.points_attr(ring.points())
    ));

    if !plan.secondary_lines.is_empty() {
        svg.push_str("  <g id=\"crosshatch\" stroke=\"#90caf9\" stroke-width=\"1\" fill=\"none\">\n");
        for line in &plan.secondary_lines {
            svg.push_str(&format!(
                "    <polyline points=\"{}\"/>\n",
                view.points_attr(&line.points)
            ));
        }
        svg.push_str("  </g>\n");
    }

    if plan.path.len() >= 2 {
        svg.push_str(&format!(
            "  <polyline id=\"path\" points=\"{}\" stroke=\"#c62828\" stroke-width=\"1.5\" fill=\"none\" stroke-linejoin=\"round\"/>\n",
            view.points_attr(&plan.path)
        ));
    }

    if let Some(&start) = plan.path.first() {
        let (x, y) = view.project(start);
        svg.push_str(&format!(
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"5\" fill=\"#c62828\"/>\n",
            x, y
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write to `path`, or stdout when there is no path or it is "-".
pub fn write_output(output_path: Option<&str>, content: &str) -> Result<()> {
    match output_path {
        Some("-") | None => {
            println!("{}", content);
        }
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
            log::info!("Wrote: {}", path);
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use survey_grid::{CoverageMode, plan_coverage};

    fn field() -> VertexRing {
        VertexRing::new(vec![
            Point::new(47.3775, 8.5405),
            Point::new(47.3779, 8.5429),
            Point::new(47.3764, 8.5434),
            Point::new(47.3759, 8.5412),
        ])
    }

    #[test]
    fn svg_has_every_layer() {
        let ring = field();
        let plan = plan_coverage(&ring, 30.0, 20.0, CoverageMode::CrossHatch);
        let svg = plan_to_svg("North <field>", &ring, &plan, 800, 600);

        assert!(svg.contains("<polygon"));
        assert!(svg.contains("id=\"crosshatch\""));
        assert!(svg.contains("id=\"path\""));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("North &lt;field&gt;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn projected_points_stay_on_canvas() {
        let ring = field();
        let view = Viewport::fit(&ring, 400, 300).unwrap();
        for &p in ring.points() {
            let (x, y) = view.project(p);
            assert!((PADDING - 1e-6..=400.0 - PADDING + 1e-6).contains(&x));
            assert!((PADDING - 1e-6..=300.0 - PADDING + 1e-6).contains(&y));
        }
    }

    #[test]
    fn flat_ring_renders_empty_canvas() {
        let ring = VertexRing::new(vec![Point::new(1.0, 1.0), Point::new(1.0, 2.0), Point::new(1.0, 3.0)]);
        let svg = plan_to_svg("flat", &ring, &CoveragePlan::default(), 100, 100);
        assert!(!svg.contains("<polygon"));
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::from_name("KML"), Some(OutputFormat::Kml));
        assert_eq!(OutputFormat::from_name("png"), None);
    }
}
