//! Pattern-based parameter extraction, used when no language model is
//! configured or the model call fails

use crate::ParameterExtractor;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

lazy_static! {
    /// "12x10", "12 x 10", "12 by 10"
    static ref DIMENSIONS: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s*(?:x|by|×)\s*(\d+(?:\.\d+)?)").unwrap();
}

/// Checked in order; the first one mentioned wins
const ROOM_TYPES: [&str; 5] = ["kitchen", "bedroom", "living room", "office", "bathroom"];

const DEFAULT_LENGTH: f64 = 10.0;
const DEFAULT_WIDTH: f64 = 10.0;

/// Extracts room type, the first "L x W" pair, one door and one window from
/// plain keywords
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexExtractor;

impl RegexExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_sync(&self, transcript: &str) -> Value {
        let text = transcript.to_lowercase();

        let room_type = ROOM_TYPES
            .iter()
            .find(|room| text.contains(**room))
            .copied()
            .unwrap_or("room");

        let (length, width) = DIMENSIONS
            .captures(&text)
            .and_then(|caps| {
                let length = caps[1].parse::<f64>().ok()?;
                let width = caps[2].parse::<f64>().ok()?;
                Some((length, width))
            })
            .unwrap_or((DEFAULT_LENGTH, DEFAULT_WIDTH));

        let mut elements = Vec::new();
        if text.contains("door") {
            let position = if text.contains("right") {
                "east"
            } else if text.contains("left") {
                "west"
            } else if text.contains("front") {
                "north"
            } else if text.contains("back") {
                "south"
            } else {
                "east"
            };
            elements.push(json!({
                "type": "door",
                "position": position,
                "size": { "width": 3, "height": 7 },
            }));
        }
        if text.contains("window") {
            elements.push(json!({
                "type": "window",
                "position": "north",
                "size": { "width": 4, "height": 3 },
            }));
        }

        json!({
            "room_type": room_type,
            "dimensions": { "length": length, "width": width, "unit": "feet" },
            "elements": elements,
            "additional_notes": transcript,
        })
    }
}

#[async_trait]
impl ParameterExtractor for RegexExtractor {
    async fn extract(&self, transcript: &str) -> Value {
        self.extract_sync(transcript)
    }
}
