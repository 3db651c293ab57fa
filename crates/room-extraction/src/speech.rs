//! Speech-to-text over HTTP

use crate::error::{ExtractionError, Result};
use crate::Transcriber;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    transcript: String,
}

/// Posts raw audio to a speech service that answers with
/// `{"transcript": "..."}`
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriber {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String> {
        if audio.is_empty() {
            return Err(ExtractionError::Transcription("empty audio".to_string()));
        }

        debug!(size = audio.len(), content_type, "Sending audio for transcription");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| ExtractionError::Transcription(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Speech service rejected audio");
            return Err(ExtractionError::Transcription(format!(
                "speech service returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transcription(e.to_string()))?;
        parse_transcript(&body)
    }
}

/// Any body that does not carry a non-empty transcript is a failed
/// transcription
fn parse_transcript(body: &str) -> Result<String> {
    let parsed: TranscriptResponse = serde_json::from_str(body).map_err(|e| {
        ExtractionError::Transcription(format!("unreadable speech service response: {}", e))
    })?;

    let transcript = parsed.transcript.trim().to_string();
    if transcript.is_empty() {
        return Err(ExtractionError::Transcription(
            "no speech recognized".to_string(),
        ));
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_audio_rejected() {
        let transcriber = HttpTranscriber::new("http://127.0.0.1:1/transcribe").unwrap();
        let err = transcriber.transcribe(Vec::new(), "audio/wav").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Transcription(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transcription_error() {
        let transcriber = HttpTranscriber::new("http://127.0.0.1:1/transcribe").unwrap();
        let err = transcriber
            .transcribe(vec![0u8; 16], "audio/wav")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Transcription(_)));
    }

    #[test]
    fn test_parse_transcript() {
        assert_eq!(
            parse_transcript(r#"{"transcript": " a 12x10 kitchen "}"#).unwrap(),
            "a 12x10 kitchen"
        );
    }

    #[test]
    fn test_non_json_reply_is_transcription_error() {
        let err = parse_transcript("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ExtractionError::Transcription(_)));
        assert!(err.to_string().contains("unreadable speech service response"));
    }

    #[test]
    fn test_blank_transcript_is_transcription_error() {
        let err = parse_transcript(r#"{"transcript": "   "}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::Transcription(_)));
    }

    #[test]
    fn test_transcript_response_deserialization() {
        let body: TranscriptResponse =
            serde_json::from_str(r#"{"transcript": " a 12x10 kitchen ", "confidence": 0.9}"#)
                .unwrap();
        assert_eq!(body.transcript, " a 12x10 kitchen ");

        let empty: TranscriptResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.transcript.is_empty());
    }
}
