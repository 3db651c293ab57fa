//! ASCII DXF encoding
//!
//! Emits the R12 entity set (POLYLINE/VERTEX/SEQEND, LINE, ARC, TEXT), which
//! every DXF reader understands, as a sequence of group code / value lines.

use crate::error::{PlanError, Result};
use crate::types::{Point, Primitive, TextAlign, Unit};
use std::fmt::{Display, Write};

pub const CONTENT_TYPE: &str = "application/dxf";

const ACAD_VERSION: &str = "AC1009";
const LAYER: &str = "0";

/// `$INSUNITS` drawing unit codes.
///
/// The variable dates from R2000. Under `AC1009` it is advisory: R12 readers
/// skip it and the coordinates are plain drawing units.
fn insunits(unit: Unit) -> i32 {
    match unit {
        Unit::Feet => 2,
        Unit::Meters => 6,
    }
}

/// Encode primitives as a complete DXF document.
///
/// Fails if any coordinate, radius, angle or height is not finite, or a
/// polyline has fewer than two points.
pub fn write_drawing(primitives: &[Primitive], unit: Unit) -> Result<Vec<u8>> {
    let mut writer = DxfWriter::default();

    writer.section("HEADER");
    writer.pair(9, "$ACADVER");
    writer.pair(1, ACAD_VERSION);
    writer.pair(9, "$INSUNITS");
    writer.pair(70, insunits(unit));
    writer.pair(0, "ENDSEC");

    writer.section("ENTITIES");
    for primitive in primitives {
        writer.primitive(primitive)?;
    }
    writer.pair(0, "ENDSEC");
    writer.pair(0, "EOF");

    Ok(writer.out.into_bytes())
}

#[derive(Default)]
struct DxfWriter {
    out: String,
}

impl DxfWriter {
    fn pair(&mut self, code: i32, value: impl Display) {
        // Writing to a String cannot fail
        let _ = write!(self.out, "{}\n{}\n", code, value);
    }

    fn real(&mut self, code: i32, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(PlanError::Serialization(format!(
                "non-finite value {} for group code {}",
                value, code
            )));
        }
        self.pair(code, value);
        Ok(())
    }

    /// Point as group codes `code`, `code + 10`, `code + 20` (x, y, z)
    fn point(&mut self, code: i32, point: Point) -> Result<()> {
        self.real(code, point.x)?;
        self.real(code + 10, point.y)?;
        self.real(code + 20, 0.0)
    }

    fn section(&mut self, name: &str) {
        self.pair(0, "SECTION");
        self.pair(2, name);
    }

    fn entity(&mut self, kind: &str) {
        self.pair(0, kind);
        self.pair(8, LAYER);
    }

    fn primitive(&mut self, primitive: &Primitive) -> Result<()> {
        match primitive {
            Primitive::Polyline { points, closed } => {
                if points.len() < 2 {
                    return Err(PlanError::Serialization(format!(
                        "polyline needs at least two points, got {}",
                        points.len()
                    )));
                }
                self.entity("POLYLINE");
                self.pair(66, 1);
                self.point(10, Point::new(0.0, 0.0))?;
                self.pair(70, if *closed { 1 } else { 0 });
                for vertex in points {
                    self.entity("VERTEX");
                    self.point(10, *vertex)?;
                }
                self.entity("SEQEND");
            }
            Primitive::Line { start, end } => {
                self.entity("LINE");
                self.point(10, *start)?;
                self.point(11, *end)?;
            }
            Primitive::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                self.entity("ARC");
                self.point(10, *center)?;
                self.real(40, *radius)?;
                self.real(50, *start_angle)?;
                self.real(51, *end_angle)?;
            }
            Primitive::Text {
                content,
                position,
                height,
                rotation,
                align,
            } => {
                self.entity("TEXT");
                self.point(10, *position)?;
                self.real(40, *height)?;
                self.pair(1, encode_text(content));
                if *rotation != 0.0 {
                    self.real(50, *rotation)?;
                }
                if *align == TextAlign::Center {
                    // Middle-center justification; the alignment point is
                    // what readers position the text by
                    self.pair(72, 1);
                    self.point(11, *position)?;
                    self.pair(73, 2);
                }
            }
        }
        Ok(())
    }
}

/// Text values must stay on one ASCII line. Line breaks become spaces and
/// non-ASCII characters use the `\U+XXXX` escape.
fn encode_text(content: &str) -> String {
    let mut encoded = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\r' | '\n' => encoded.push(' '),
            c if c.is_ascii_control() => {}
            c if c.is_ascii() => encoded.push(c),
            c => {
                let _ = write!(encoded, "\\U+{:04X}", c as u32);
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use crate::types::{Element, ElementKind, RoomSpec, Wall};

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_document_structure() {
        let bytes = write_drawing(&[], Unit::Feet).unwrap();
        let lines = lines(&bytes);

        assert_eq!(&lines[..4], ["0", "SECTION", "2", "HEADER"]);
        assert!(lines.windows(2).any(|w| w == ["1", "AC1009"]));
        assert!(lines.windows(2).any(|w| w == ["70", "2"]));
        assert_eq!(&lines[lines.len() - 4..], ["0", "ENDSEC", "0", "EOF"]);
        // Group codes and values alternate
        assert_eq!(lines.len() % 2, 0);
    }

    #[test]
    fn test_meters_header() {
        let bytes = write_drawing(&[], Unit::Meters).unwrap();
        assert!(lines(&bytes).windows(2).any(|w| w == ["70", "6"]));
    }

    #[test]
    fn test_units_follow_version_in_header() {
        let lines = lines(&write_drawing(&[], Unit::Feet).unwrap());
        let version = lines.iter().position(|l| l == "$ACADVER").unwrap();
        let units = lines.iter().position(|l| l == "$INSUNITS").unwrap();

        assert_eq!(lines[version + 2], "AC1009");
        assert!(units > version);
        assert_eq!(lines[units + 1], "70");
        assert_eq!(lines[units + 2], "2");
    }

    #[test]
    fn test_room_drawing_entities() {
        let spec = RoomSpec {
            room_type: "kitchen".to_string(),
            length: 12.0,
            width: 10.0,
            unit: Unit::Feet,
        };
        let primitives = render(
            &spec,
            &[
                Element::new(ElementKind::Door, Wall::East, 3.0),
                Element::new(ElementKind::Window, Wall::North, 4.0),
            ],
        );
        let bytes = write_drawing(&primitives, spec.unit).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        let lines = lines(&bytes);

        let count = |name: &str| lines.iter().filter(|l| l.as_str() == name).count();
        assert_eq!(count("POLYLINE"), 1);
        assert_eq!(count("VERTEX"), 4);
        assert_eq!(count("SEQEND"), 1);
        assert_eq!(count("LINE"), 3);
        assert_eq!(count("ARC"), 1);
        assert_eq!(count("TEXT"), 3);

        assert!(text.contains("Kitchen 12' x 10'"));
        assert!(text.contains("\n1\nDOOR\n"));
        assert!(text.contains("\n1\nWINDOW\n"));
        assert!(text.contains("\n40\n3\n50\n180\n51\n270\n"));
        // Closed polyline flag
        assert!(text.contains("\n66\n1\n10\n0\n20\n0\n30\n0\n70\n1\n"));
        assert!(text.is_ascii());
    }

    #[test]
    fn test_centered_text_has_alignment_point() {
        let primitive = Primitive::Text {
            content: "Office 12' x 10'".to_string(),
            position: Point::new(6.0, 5.0),
            height: 1.0,
            rotation: 0.0,
            align: TextAlign::Center,
        };
        let text = String::from_utf8(write_drawing(&[primitive], Unit::Feet).unwrap()).unwrap();
        assert!(text.contains("\n72\n1\n11\n6\n21\n5\n31\n0\n73\n2\n"));
    }

    #[test]
    fn test_rotated_text() {
        let primitive = Primitive::Text {
            content: "WINDOW".to_string(),
            position: Point::new(11.5, 5.0),
            height: 0.3,
            rotation: 90.0,
            align: TextAlign::Left,
        };
        let text = String::from_utf8(write_drawing(&[primitive], Unit::Feet).unwrap()).unwrap();
        assert!(text.contains("\n1\nWINDOW\n50\n90\n"));
        assert!(!text.contains("\n72\n"));
    }

    #[test]
    fn test_non_finite_coordinates_fail() {
        let primitive = Primitive::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(f64::INFINITY, 1.0),
        };
        let err = write_drawing(&[primitive], Unit::Feet).unwrap_err();
        assert!(matches!(err, PlanError::Serialization(_)));
    }

    #[test]
    fn test_degenerate_polyline_fails() {
        let primitive = Primitive::Polyline {
            points: vec![Point::new(0.0, 0.0)],
            closed: true,
        };
        assert!(write_drawing(&[primitive], Unit::Feet).is_err());
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("Kitchen\n12' x 10'"), "Kitchen 12' x 10'");
        assert_eq!(encode_text("Café"), "Caf\\U+00E9");
        assert_eq!(encode_text("a\tb"), "ab");
    }
}
