//! Floor-plan geometry
//!
//! Turns a loosely-typed room description into a normalized [`RoomSpec`],
//! renders it into an ordered list of drawing [`Primitive`]s and encodes
//! those as ASCII DXF.

pub mod dxf;
pub mod error;
pub mod normalize;
pub mod render;
pub mod types;

pub use error::{PlanError, Result};
pub use normalize::{normalize, normalize_elements};
pub use render::render;
pub use types::*;
