//! Request and response bodies

use chrono::{DateTime, Utc};
use plan_artifact_cache::CacheStats;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct ParametersResponse {
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub dwg_filename: String,
    pub download_url: String,
    pub message: String,
}

/// Result of the whole audio-to-drawing pipeline
#[derive(Debug, Serialize)]
pub struct VoiceToPlanResponse {
    pub transcript: String,
    pub parameters: Value,
    pub dwg_path: String,
    pub download_url: String,
}

/// A cached drawing as listed by `GET /files`
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileSummary>,
}

pub fn download_url(key: &str) -> String {
    format!("/download-dwg/{}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_without_parameters() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.parameters.is_null());
    }

    #[test]
    fn test_file_summary_serialization() {
        let summary = FileSummary {
            key: "drawing_abc.dxf".to_string(),
            created_at: Utc::now(),
            size: 2048,
            room_type: None,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("drawing_abc.dxf"));
        assert!(json.contains("2048"));
        assert!(!json.contains("room_type"));
    }

    #[test]
    fn test_download_url() {
        assert_eq!(download_url("drawing_1.dxf"), "/download-dwg/drawing_1.dxf");
    }
}
