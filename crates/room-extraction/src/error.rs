//! Error types for the extraction collaborators

use std::fmt;

#[derive(Debug)]
pub enum ExtractionError {
    Http(Box<reqwest::Error>),
    Json(serde_json::Error),
    /// Speech could not be turned into text
    Transcription(String),
    /// A collaborator answered with something unusable
    Response(String),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Http(err) => write!(f, "HTTP error: {}", err),
            ExtractionError::Json(err) => write!(f, "JSON error: {}", err),
            ExtractionError::Transcription(msg) => write!(f, "Transcription failed: {}", msg),
            ExtractionError::Response(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Http(err) => Some(err.as_ref()),
            ExtractionError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        ExtractionError::Http(Box::new(err))
    }
}

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
