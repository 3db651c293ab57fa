//! Floor-plan geometry
//!
//! The room occupies `(0,0)..(length,width)`: north is the wall at
//! `y = width`, south at `y = 0`, east at `x = length`, west at `x = 0`.
//! Doors and windows are always centered on their wall. Elements sharing a
//! wall overlap, and an element wider than its wall overruns it.

use crate::error::{PlanError, Result};
use crate::types::{Element, ElementKind, Point, Primitive, RoomSpec, TextAlign, Wall};
use tracing::warn;

const ROOM_LABEL_HEIGHT: f64 = 1.0;

const DOOR_LABEL: &str = "DOOR";
const DOOR_LABEL_HEIGHT: f64 = 0.5;
const DOOR_LABEL_INSET: f64 = 1.0;

const WINDOW_LABEL: &str = "WINDOW";
const WINDOW_LABEL_HEIGHT: f64 = 0.3;
const WINDOW_LABEL_INSET: f64 = 0.5;
/// Distance between the two lines of a window
const WINDOW_LINE_GAP: f64 = 0.2;

/// Render a room and its elements into drawing primitives.
///
/// Output order: boundary, room label, then each element's primitives in
/// input order. An element that cannot be drawn is skipped.
pub fn render(spec: &RoomSpec, elements: &[Element]) -> Vec<Primitive> {
    let (l, w) = (spec.length, spec.width);

    let mut primitives = vec![
        Primitive::Polyline {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(l, 0.0),
                Point::new(l, w),
                Point::new(0.0, w),
            ],
            closed: true,
        },
        Primitive::Text {
            content: spec.label(),
            position: Point::new(l / 2.0, w / 2.0),
            height: ROOM_LABEL_HEIGHT,
            rotation: 0.0,
            align: TextAlign::Center,
        },
    ];

    for (index, element) in elements.iter().enumerate() {
        match render_element(spec, element) {
            Ok(element_primitives) => primitives.extend(element_primitives),
            Err(e) => warn!(index, kind = ?element.kind, error = %e, "Skipping element"),
        }
    }

    primitives
}

/// Primitives for a single element
pub fn render_element(spec: &RoomSpec, element: &Element) -> Result<Vec<Primitive>> {
    match &element.kind {
        ElementKind::Door => Ok(door(spec, element.position, opening_width(element)?)),
        ElementKind::Window => Ok(window(spec, element.position, opening_width(element)?)),
        // Reserved; nothing is drawn for these yet
        ElementKind::Wall | ElementKind::Fixture | ElementKind::Other(_) => Ok(Vec::new()),
    }
}

fn opening_width(element: &Element) -> Result<f64> {
    let width = element.size.width;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(PlanError::InvalidElement(format!(
            "opening width must be positive, got {}",
            width
        )))
    }
}

fn text(content: &str, position: Point, height: f64, rotation: f64) -> Primitive {
    Primitive::Text {
        content: content.to_string(),
        position,
        height,
        rotation,
        align: TextAlign::Left,
    }
}

/// Door gap on the wall, a quarter-circle swing of radius `size` and a label
/// inset from the wall at the opening midpoint
fn door(spec: &RoomSpec, wall: Wall, size: f64) -> Vec<Primitive> {
    let (l, w) = (spec.length, spec.width);
    // Start of the opening along the wall
    let oy = w / 2.0 - size / 2.0;
    let ox = l / 2.0 - size / 2.0;

    let (start, end, center, start_angle, end_angle, label_at) = match wall {
        Wall::East => (
            Point::new(l, oy),
            Point::new(l, oy + size),
            Point::new(l, oy),
            180.0,
            270.0,
            Point::new(l - DOOR_LABEL_INSET, oy + size / 2.0),
        ),
        Wall::West => (
            Point::new(0.0, oy),
            Point::new(0.0, oy + size),
            Point::new(0.0, oy + size),
            0.0,
            90.0,
            Point::new(DOOR_LABEL_INSET, oy + size / 2.0),
        ),
        Wall::North => (
            Point::new(ox, w),
            Point::new(ox + size, w),
            Point::new(ox, w),
            270.0,
            360.0,
            Point::new(ox + size / 2.0, w - DOOR_LABEL_INSET),
        ),
        Wall::South => (
            Point::new(ox, 0.0),
            Point::new(ox + size, 0.0),
            Point::new(ox + size, 0.0),
            90.0,
            180.0,
            Point::new(ox + size / 2.0, DOOR_LABEL_INSET),
        ),
    };

    vec![
        Primitive::Line { start, end },
        Primitive::Arc {
            center,
            radius: size,
            start_angle,
            end_angle,
        },
        text(DOOR_LABEL, label_at, DOOR_LABEL_HEIGHT, 0.0),
    ]
}

/// Double line on the wall with a label; the label reads vertically on the
/// east and west walls
fn window(spec: &RoomSpec, wall: Wall, size: f64) -> Vec<Primitive> {
    let (l, w) = (spec.length, spec.width);
    let oy = w / 2.0 - size / 2.0;
    let ox = l / 2.0 - size / 2.0;

    // (outer line, inner line, label anchor, rotation)
    let (outer, inner, label_at, rotation) = match wall {
        Wall::North => (
            (Point::new(ox, w), Point::new(ox + size, w)),
            (
                Point::new(ox, w - WINDOW_LINE_GAP),
                Point::new(ox + size, w - WINDOW_LINE_GAP),
            ),
            Point::new(ox + size / 2.0, w - WINDOW_LABEL_INSET),
            0.0,
        ),
        Wall::South => (
            (Point::new(ox, 0.0), Point::new(ox + size, 0.0)),
            (
                Point::new(ox, WINDOW_LINE_GAP),
                Point::new(ox + size, WINDOW_LINE_GAP),
            ),
            Point::new(ox + size / 2.0, WINDOW_LABEL_INSET),
            0.0,
        ),
        Wall::East => (
            (Point::new(l, oy), Point::new(l, oy + size)),
            (
                Point::new(l - WINDOW_LINE_GAP, oy),
                Point::new(l - WINDOW_LINE_GAP, oy + size),
            ),
            Point::new(l - WINDOW_LABEL_INSET, oy + size / 2.0),
            90.0,
        ),
        Wall::West => (
            (Point::new(0.0, oy), Point::new(0.0, oy + size)),
            (
                Point::new(WINDOW_LINE_GAP, oy),
                Point::new(WINDOW_LINE_GAP, oy + size),
            ),
            Point::new(WINDOW_LABEL_INSET, oy + size / 2.0),
            90.0,
        ),
    };

    vec![
        Primitive::Line {
            start: outer.0,
            end: outer.1,
        },
        Primitive::Line {
            start: inner.0,
            end: inner.1,
        },
        text(WINDOW_LABEL, label_at, WINDOW_LABEL_HEIGHT, rotation),
    ]
}
