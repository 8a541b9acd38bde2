//! REST client for the Gemini `generateContent` endpoint.
//!
//! Each call sends one user prompt and returns the text of the first
//! candidate. There is no retry: a 429 surfaces as
//! [`LlmError::RateLimited`] and is passed straight to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::{Purpose, TextGenerator};

/// Public Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for task extraction unless configured otherwise.
pub const DEFAULT_EXTRACTION_MODEL: &str = "gemini-2.5-flash";

/// Model used for flowcharts and the assistant unless configured otherwise.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash-lite";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Model name per [`Purpose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNames {
    pub extraction: String,
    pub flowchart: String,
    pub assistant: String,
}

impl Default for ModelNames {
    fn default() -> Self {
        Self {
            extraction: DEFAULT_EXTRACTION_MODEL.to_string(),
            flowchart: DEFAULT_CHAT_MODEL.to_string(),
            assistant: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl ModelNames {
    pub fn for_purpose(&self, purpose: Purpose) -> &str {
        match purpose {
            Purpose::Extraction => &self.extraction,
            Purpose::Flowchart => &self.flowchart,
            Purpose::Assistant => &self.assistant,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response body of `generateContent`. Only the fields we read are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn into_text(self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no candidates".to_string()))?;
        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| LlmError::InvalidResponse("candidate has no text part".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    models: ModelNames,
}

impl GeminiClient {
    /// Create a client.
    ///
    /// * `base_url` - API root without trailing slash, e.g. [`DEFAULT_BASE_URL`].
    /// * `api_key` - `None` makes every call fail with [`LlmError::MissingApiKey`].
    pub fn new(base_url: String, api_key: Option<String>, models: ModelNames) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            models,
        }
    }

    /// Send `prompt` to `model` and return the generated text.
    pub async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(format!("{}/models/{model}:generateContent", self.base_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text()
    }

    // ---- private helpers ----

    /// Map 429 to [`LlmError::RateLimited`] and any other non-2xx status to
    /// [`LlmError::ApiError`] carrying the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), %body, "Gemini API error");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, purpose: Purpose, prompt: &str) -> Result<String, LlmError> {
        let model = self.models.for_purpose(purpose);
        tracing::debug!(model, ?purpose, prompt_len = prompt.len(), "Calling Gemini");
        self.generate_content(
            model,
            prompt,
            GenerationConfig::with_temperature(purpose.temperature()),
        )
        .await
    }
}
