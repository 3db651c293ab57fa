use crate::error::{Result, ServiceError};
use plan_artifact_cache::{DEFAULT_MAX_BYTES, DEFAULT_MAX_ITEMS};
use room_extraction::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::env;

/// Service configuration parsed from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub max_cache_items: usize,
    pub max_cache_bytes: usize,
    pub max_upload_bytes: usize,
    /// `["*"]` allows any origin
    pub cors_origins: Vec<String>,
    /// Speech-to-text endpoint; audio routes are unavailable without it
    pub speech_api_url: Option<String>,
    /// Without a key, transcripts are parsed by pattern matching only
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            max_cache_items: DEFAULT_MAX_ITEMS,
            max_cache_bytes: DEFAULT_MAX_BYTES,
            max_upload_bytes: 25 * 1024 * 1024, // 25MB
            cors_origins: vec!["*".to_string()],
            speech_api_url: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration from any variable source. Unparsable numbers fall
    /// back to defaults; malformed URLs are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = var("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let max_cache_items = var("MAX_CACHE_ITEMS")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_cache_items);

        let max_cache_bytes = var("MAX_CACHE_BYTES")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_cache_bytes);

        let max_upload_bytes = var("MAX_UPLOAD_BYTES")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_upload_bytes);

        let cors_origins = var("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let speech_api_url = var("SPEECH_API_URL")
            .map(|url| validate_url("SPEECH_API_URL", url))
            .transpose()?;

        let gemini_base_url = var("GEMINI_BASE_URL")
            .map(|url| validate_url("GEMINI_BASE_URL", url))
            .transpose()?
            .unwrap_or(defaults.gemini_base_url);

        Ok(Self {
            port,
            max_cache_items,
            max_cache_bytes,
            max_upload_bytes,
            cors_origins,
            speech_api_url,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn validate_url(name: &str, value: String) -> Result<String> {
    match url::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        Ok(url) => Err(ServiceError::Config(format!(
            "{} must be an http(s) URL, got scheme {}",
            name,
            url.scheme()
        ))),
        Err(e) => Err(ServiceError::Config(format!("invalid {}: {}", name, e))),
    }
}
