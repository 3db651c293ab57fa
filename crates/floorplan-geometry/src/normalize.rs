//! Normalization of loosely-typed room parameters
//!
//! Input is the parameter bag produced by transcript extraction:
//!
//! ```json
//! {
//!   "room_type": "kitchen",
//!   "dimensions": { "length": 12, "width": "10 ft", "unit": "feet" },
//!   "elements": [{ "type": "door", "position": "right", "size": { "width": 3, "height": 7 } }],
//!   "additional_notes": "..."
//! }
//! ```
//!
//! Any field may be missing, wrongly typed or accompanied by extra fields.

use crate::error::{PlanError, Result};
use crate::types::{Element, ElementKind, ElementSize, RoomSpec, Unit, Wall};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)").unwrap();
}

const FALLBACK_ROOM_TYPE: &str = "room";

/// Default dimensions for a room type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomDefaults {
    pub length: f64,
    pub width: f64,
    pub unit: Unit,
}

const GENERIC_DEFAULTS: RoomDefaults = RoomDefaults {
    length: 10.0,
    width: 10.0,
    unit: Unit::Feet,
};

/// Look up default dimensions. `room_type` is matched case-insensitively with
/// spaces and hyphens treated as underscores.
pub fn room_defaults(room_type: &str) -> RoomDefaults {
    let key = room_type
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let (length, width) = match key.as_str() {
        "kitchen" => (12.0, 10.0),
        "bedroom" => (14.0, 12.0),
        "living_room" => (18.0, 14.0),
        "office" => (12.0, 10.0),
        "bathroom" => (8.0, 6.0),
        "dining_room" => (14.0, 12.0),
        _ => return GENERIC_DEFAULTS,
    };

    RoomDefaults {
        length,
        width,
        unit: Unit::Feet,
    }
}

/// Extract a number from a JSON value. Strings yield their first signed
/// decimal number, so "12 ft" parses as 12.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => NUMBER
            .find(s)
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    }
}

/// Build a [`RoomSpec`] from a raw parameter bag.
///
/// Length and width fall back to the room-type defaults independently when
/// absent or unparsable. A resolved dimension that is not a positive finite
/// number is an error.
pub fn normalize(raw: &Value) -> Result<RoomSpec> {
    let room_type = raw
        .get("room_type")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_ROOM_TYPE.to_string());

    let defaults = room_defaults(&room_type);
    let dimensions = raw.get("dimensions");
    let axis = |name: &str| dimensions.and_then(|d| d.get(name)).and_then(parse_number);

    let length = axis("length").unwrap_or(defaults.length);
    let width = axis("width").unwrap_or(defaults.width);

    let unit = dimensions
        .and_then(|d| d.get("unit"))
        .and_then(Value::as_str)
        .and_then(Unit::from_name)
        .unwrap_or(defaults.unit);

    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(length) || !valid(width) {
        return Err(PlanError::InvalidDimensions { length, width });
    }

    Ok(RoomSpec {
        room_type,
        length,
        width,
        unit,
    })
}

/// Parse the `elements` array, each entry independently.
/// A missing or non-array `elements` field yields no elements.
pub fn normalize_elements(raw: &Value) -> Vec<Result<Element>> {
    raw.get("elements")
        .and_then(Value::as_array)
        .map(|elements| elements.iter().map(parse_element).collect())
        .unwrap_or_default()
}

/// Parse one element. Unknown kinds and positions are tolerated; a size that
/// is present but unreadable is not.
pub fn parse_element(value: &Value) -> Result<Element> {
    let obj = value
        .as_object()
        .ok_or_else(|| PlanError::InvalidElement("element is not an object".to_string()))?;

    let kind = obj
        .get("type")
        .or_else(|| obj.get("kind"))
        .and_then(Value::as_str)
        .map(ElementKind::from_name)
        .unwrap_or_else(|| ElementKind::Other(String::new()));

    let position = obj
        .get("position")
        .and_then(Value::as_str)
        .and_then(Wall::from_name)
        .unwrap_or(Wall::North);

    let size = match obj.get("size") {
        None | Some(Value::Null) => ElementSize::default(),
        Some(Value::Object(size)) => {
            let defaults = ElementSize::default();
            let dimension = |name: &str, default: f64| match size.get(name) {
                None | Some(Value::Null) => Ok(default),
                Some(v) => parse_number(v).ok_or_else(|| {
                    PlanError::InvalidElement(format!("unreadable {}: {}", name, v))
                }),
            };
            ElementSize {
                width: dimension("width", defaults.width)?,
                height: dimension("height", defaults.height)?,
            }
        }
        Some(other) => {
            return Err(PlanError::InvalidElement(format!(
                "size is not an object: {}",
                other
            )))
        }
    };

    Ok(Element {
        kind,
        position,
        size,
    })
}
