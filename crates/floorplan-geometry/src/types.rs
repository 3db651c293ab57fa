//! Core types for floor-plan generation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length unit of a room. Informational only, no conversion is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Feet,
    Meters,
}

impl Unit {
    /// Parse a unit name, accepting common abbreviations
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "feet" | "foot" | "ft" | "'" => Some(Unit::Feet),
            "meters" | "meter" | "metres" | "metre" | "m" => Some(Unit::Meters),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Feet => "feet",
            Unit::Meters => "meters",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized room description used as geometry input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub room_type: String,
    pub length: f64,
    pub width: f64,
    pub unit: Unit,
}

impl RoomSpec {
    /// Room type formatted for display, e.g. "living_room" -> "Living Room"
    pub fn title(&self) -> String {
        self.room_type
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The centered room label, e.g. "Kitchen 12' x 10'"
    pub fn label(&self) -> String {
        format!("{} {}' x {}'", self.title(), self.length, self.width)
    }
}

/// Wall of the room an element is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    North,
    South,
    East,
    West,
}

impl Wall {
    /// Parse a wall name. Front, back, right and left are synonyms for
    /// north, south, east and west.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "north" | "front" => Some(Wall::North),
            "south" | "back" => Some(Wall::South),
            "east" | "right" => Some(Wall::East),
            "west" | "left" => Some(Wall::West),
            _ => None,
        }
    }
}

/// What an element is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Door,
    Window,
    Wall,
    Fixture,
    /// Anything else; kept so it can be reported, never drawn
    Other(String),
}

impl ElementKind {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "door" => ElementKind::Door,
            "window" => ElementKind::Window,
            "wall" => ElementKind::Wall,
            "fixture" => ElementKind::Fixture,
            _ => ElementKind::Other(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ElementSize {
    fn default() -> Self {
        Self {
            width: 3.0,
            height: 1.0,
        }
    }
}

/// A door, window, wall or fixture attached to the room boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub position: Wall,
    pub size: ElementSize,
}

impl Element {
    pub fn new(kind: ElementKind, position: Wall, width: f64) -> Self {
        Self {
            kind,
            position,
            size: ElementSize {
                width,
                ..ElementSize::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchored at the left end of the baseline
    Left,
    /// Centered horizontally and vertically on the anchor
    Center,
}

/// One drawing instruction. Angles are in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Polyline {
        points: Vec<Point>,
        closed: bool,
    },
    Line {
        start: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Text {
        content: String,
        position: Point,
        height: f64,
        rotation: f64,
        align: TextAlign,
    },
}
