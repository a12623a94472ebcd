//! KML export of a survey: the area polygon and the flight path, ready to
//! drop into any map viewer.

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::coverage::CoveragePlan;
use crate::error::{Result, SurveyError};
use crate::geometry::{Point, VertexRing};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// KML wants `lng,lat,alt` tuples separated by whitespace.
fn coordinate_text(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{},0", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(" ")
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(SurveyError::Xml)
}

fn open<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(tag)))
}

fn close<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    open(writer, tag)?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    close(writer, tag)
}

/// Render `ring` and the plan's stitched path as a KML document.
///
/// The polygon is written closed (first vertex repeated) as KML requires.
/// An empty path is left out rather than written as an empty LineString.
pub fn to_kml(name: &str, ring: &VertexRing, plan: &CoveragePlan) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("kml");
    root.push_attribute(("xmlns", KML_NAMESPACE));
    emit(&mut writer, Event::Start(root))?;
    open(&mut writer, "Document")?;
    text_element(&mut writer, "name", name)?;

    // Survey area
    open(&mut writer, "Placemark")?;
    text_element(&mut writer, "name", "Survey area")?;
    open(&mut writer, "Polygon")?;
    open(&mut writer, "outerBoundaryIs")?;
    open(&mut writer, "LinearRing")?;
    text_element(&mut writer, "coordinates", &coordinate_text(&ring.closed_points()))?;
    close(&mut writer, "LinearRing")?;
    close(&mut writer, "outerBoundaryIs")?;
    close(&mut writer, "Polygon")?;
    close(&mut writer, "Placemark")?;

    // Flight path
    if !plan.path.is_empty() {
        open(&mut writer, "Placemark")?;
        text_element(&mut writer, "name", "Flight path")?;
        open(&mut writer, "LineString")?;
        text_element(&mut writer, "tessellate", "1")?;
        text_element(&mut writer, "coordinates", &coordinate_text(&plan.path))?;
        close(&mut writer, "LineString")?;
        close(&mut writer, "Placemark")?;
    }

    close(&mut writer, "Document")?;
    close(&mut writer, "kml")?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageMode, plan_coverage};
    use quick_xml::Reader;

    fn square() -> VertexRing {
        VertexRing::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(0.001, 0.001),
            Point::new(0.001, 0.0),
        ])
    }

    /// Text of every `<coordinates>` element, in document order.
    fn coordinate_blocks(kml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(kml);
        let mut blocks = Vec::new();
        let mut inside = false;
        loop {
            match reader.read_event().unwrap() {
                quick_xml::events::Event::Start(e) if e.name().as_ref() == b"coordinates" => {
                    inside = true;
                }
                quick_xml::events::Event::Text(t) if inside => {
                    blocks.push(t.unescape().unwrap().into_owned());
                }
                quick_xml::events::Event::End(e) if e.name().as_ref() == b"coordinates" => {
                    inside = false;
                }
                quick_xml::events::Event::Eof => break,
                _ => {}
            }
        }
        blocks
    }

    #[test]
    fn kml_has_polygon_and_path() {
        let ring = square();
        let plan = plan_coverage(&ring, 0.0, 20.0, CoverageMode::Single);
        let kml = to_kml("Test field", &ring, &plan).unwrap();

        assert!(kml.starts_with("<?xml"));
        assert!(kml.contains("<name>Test field</name>"));
        assert!(kml.contains("<Polygon>"));
        assert!(kml.contains("<LineString>"));

        let blocks = coordinate_blocks(&kml);
        assert_eq!(blocks.len(), 2);

        // Closed ring in lng,lat,0 order
        let ring_tuples: Vec<&str> = blocks[0].split_whitespace().collect();
        assert_eq!(ring_tuples.len(), 5);
        assert_eq!(ring_tuples[0], ring_tuples[4]);
        assert_eq!(ring_tuples[1], "0.001,0,0");

        assert_eq!(blocks[1].split_whitespace().count(), plan.path.len());
    }

    #[test]
    fn empty_path_is_left_out() {
        let kml = to_kml("Empty", &square(), &CoveragePlan::default()).unwrap();
        assert!(!kml.contains("<LineString>"));
        assert_eq!(coordinate_blocks(&kml).len(), 1);
    }

    #[test]
    fn names_are_escaped() {
        let kml = to_kml("Fields <north> & south", &square(), &CoveragePlan::default()).unwrap();
        assert!(kml.contains("Fields &lt;north&gt; &amp; south"));
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failures_surface_as_xml_errors() {
        let mut writer = Writer::new(FullDisk);
        let err = text_element(&mut writer, "name", "Test field").unwrap_err();
        assert!(matches!(err, SurveyError::Xml(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
