//! Collaborators that turn audio into room parameters
//!
//! Speech goes through a [`Transcriber`], the transcript through a
//! [`ParameterExtractor`]. The extractor never fails: when the language model
//! is unavailable it degrades to pattern matching on the transcript.

pub mod error;
pub mod fallback;
pub mod gemini;
pub mod speech;

pub use error::{ExtractionError, Result};
pub use fallback::RegexExtractor;
pub use gemini::GeminiExtractor;
pub use speech::HttpTranscriber;

use async_trait::async_trait;
use serde_json::Value;

/// Converts recorded audio into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Converts a transcript into a loose room parameter bag
/// (`room_type`, `dimensions`, `elements`, `additional_notes`)
#[async_trait]
pub trait ParameterExtractor: Send + Sync {
    async fn extract(&self, transcript: &str) -> Value;
}
