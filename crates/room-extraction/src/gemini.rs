//! Language-model parameter extraction through the Generative Language API

use crate::error::{ExtractionError, Result};
use crate::fallback::RegexExtractor;
use crate::ParameterExtractor;
use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL_SECS: u64 = 60 * 60;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Extracts room parameters with a Gemini model, falling back to
/// [`RegexExtractor`] whenever the model call or its output is unusable.
/// Successful extractions are cached per transcript.
pub struct GeminiExtractor {
    client: reqwest::Client,
    url: String,
    api_key: String,
    cache: Cache<String, Value>,
    fallback: RegexExtractor,
}

impl GeminiExtractor {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    pub fn with_base_url(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();

        Ok(Self {
            client,
            url: format!(
                "{}/v1beta/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            api_key: api_key.to_string(),
            cache,
            fallback: RegexExtractor::new(),
        })
    }

    async fn request(&self, transcript: &str) -> Result<Value> {
        let prompt = build_prompt(transcript);
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractionError::Response(format!(
                "model returned status {}",
                response.status()
            )));
        }

        let response: GenerateResponse = response.json().await?;
        parse_model_output(&response)
    }
}

#[async_trait]
impl ParameterExtractor for GeminiExtractor {
    async fn extract(&self, transcript: &str) -> Value {
        let cache_key = transcript.trim().to_lowercase();
        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!("Extraction cache hit");
            return cached;
        }

        match self.request(transcript).await {
            Ok(params) => {
                self.cache.insert(cache_key, params.clone()).await;
                params
            }
            Err(e) => {
                warn!(error = %e, "Model extraction failed, using pattern fallback");
                self.fallback.extract_sync(transcript)
            }
        }
    }
}

fn build_prompt(transcript: &str) -> String {
    format!(
        r#"From this transcript: "{transcript}"

Extract drawing parameters and return a JSON object with the following structure:
{{
    "room_type": "kitchen/bedroom/living_room/office/bathroom",
    "dimensions": {{
        "length": number,
        "width": number,
        "unit": "feet/meters"
    }},
    "elements": [
        {{
            "type": "door/window/wall/fixture",
            "position": "north/south/east/west/front/back/left/right",
            "size": {{
                "width": number,
                "height": number
            }}
        }}
    ],
    "additional_notes": "any other specifications"
}}

If dimensions aren't specified, use reasonable defaults for the room type.
Return only the JSON object, no other text."#
    )
}

/// Pull the JSON object out of the first candidate's text
fn parse_model_output(response: &GenerateResponse) -> Result<Value> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.iter().find_map(|p| p.text.as_deref()))
        .ok_or_else(|| ExtractionError::Response("model returned no text".to_string()))?;

    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    if !value.is_object() {
        return Err(ExtractionError::Response(
            "model output is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// Models often wrap JSON in a markdown fence
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .map(|rest| rest.strip_suffix("```").unwrap_or(rest));
    inner.unwrap_or(text).trim()
}
