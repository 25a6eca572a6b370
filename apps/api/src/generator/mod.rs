/// Text generator: the single point of entry for calls to the generative-language API.
///
/// Handlers only see the `TextGenerator` trait; `AppState` carries an
/// `Arc<dyn TextGenerator>` so tests can swap in a canned backend.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_PROMPT: &str = "Say \"OK\" if you can read this.";

/// First `{...}` or `[...]` span in a reply, greedy so nested objects survive.
static JSON_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)(\{.*\}|\[.*\])").unwrap());

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Gemini API key not configured")]
    NotConfigured,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error: {status}")]
    Api { status: u16 },

    #[error("No content in Gemini response")]
    EmptyContent,

    #[error("No JSON found in response")]
    NoJson,

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Sampling knobs for a single generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GenerationOptions {
    pub fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            max_output_tokens,
            ..Self::default()
        }
    }
}

/// Result of a liveness check against the generator backend.
#[derive(Debug, Clone)]
pub struct GeneratorHealth {
    pub available: bool,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Returns the raw text of the first candidate.
    async fn generate(&self, prompt: &str, options: GenerationOptions)
        -> Result<String, GeneratorError>;

    async fn check_health(&self) -> GeneratorHealth {
        if !self.is_configured() {
            return GeneratorHealth {
                available: false,
                response_time_ms: None,
                error: Some("API key not configured".to_string()),
            };
        }

        let options = GenerationOptions {
            temperature: 0.0,
            max_output_tokens: 10,
            timeout: HEALTH_TIMEOUT,
        };
        let started = Instant::now();
        let result = self.generate(HEALTH_PROMPT, options).await;
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        GeneratorHealth {
            available: result.is_ok(),
            response_time_ms: Some(elapsed),
            error: result.err().map(|e| e.to_string()),
        }
    }
}

/// Deserializes the JSON embedded in a model reply, tolerating prose or code fences around it.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, GeneratorError> {
    let span = JSON_SPAN.find(text).ok_or(GeneratorError::NoJson)?;
    Ok(serde_json::from_str(span.as_str())?)
}

/// Generates and deserializes the first JSON span found in the reply.
pub async fn generate_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    prompt: &str,
    options: GenerationOptions,
) -> Result<T, GeneratorError> {
    let text = generator.generate(prompt, options).await?;
    parse_json_reply(&text)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: [GeminiPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

/// Gemini `generateContent` over REST. Without an API key every call
/// fails fast with `NotConfigured`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Result<Self, GeneratorError> {
        Ok(Self {
            client: Client::builder().timeout(DEFAULT_TIMEOUT).build()?,
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, GeneratorError> {
        let api_key = self.api_key.as_deref().ok_or(GeneratorError::NotConfigured)?;

        let body = GeminiRequest {
            contents: [GeminiContent {
                parts: [GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(GEMINI_API_URL)
            .header("x-goog-api-key", api_key)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), detail = %detail, "Gemini API returned an error");
            return Err(GeneratorError::Api {
                status: status.as_u16(),
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        let text = parsed.into_text().ok_or(GeneratorError::EmptyContent)?;
        debug!(chars = text.len(), "Gemini call succeeded");
        Ok(text)
    }
}
