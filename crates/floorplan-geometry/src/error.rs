//! Error types for floor-plan generation

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Resolved room dimensions are not strictly positive finite numbers
    InvalidDimensions { length: f64, width: f64 },
    /// A single element could not be parsed or drawn
    InvalidElement(String),
    /// The drawing could not be encoded
    Serialization(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidDimensions { length, width } => write!(
                f,
                "Invalid room dimensions: length {} and width {} must both be positive",
                length, width
            ),
            PlanError::InvalidElement(msg) => write!(f, "Invalid element: {}", msg),
            PlanError::Serialization(msg) => write!(f, "Drawing serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for PlanError {}

pub type Result<T> = std::result::Result<T, PlanError>;
