//! Text-generation client for the Gemini API
//!
//! Blocking HTTP with a bounded timeout and a single retry on transient
//! failures: network errors, 429, 5xx and bodies that fail mid-read.
//! Other 4xx responses and undecodable bodies fail immediately.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 1;

/// Anything that can turn a prompt into text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

// ============================================================================
// Gemini API types
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
    retry_backoff: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String, model: &str) -> Result<Self, AnalysisError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(
        api_key: String,
        model: &str,
        base_url: String,
    ) -> Result<Self, AnalysisError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("korelasi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalysisError::GenerationFailed(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_backoff: Duration::from_secs(1),
        })
    }

    /// Override the wait between the first attempt and the retry.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn wait_before_retry(&self, attempt: u32, reason: &str) {
        tracing::warn!(
            attempt = attempt + 1,
            max_retries = MAX_RETRIES,
            reason,
            "Retrying text generation"
        );
        thread::sleep(self.retry_backoff);
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        for attempt in 0..=MAX_RETRIES {
            let result = self
                .http
                .post(self.endpoint())
                .header("x-goog-api-key", self.api_key.as_str())
                .json(&body)
                .send();

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(AnalysisError::GenerationFailed(format!(
                            "network error after {} attempts: {}",
                            attempt + 1,
                            e
                        )));
                    }
                    self.wait_before_retry(attempt, &e.to_string());
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 || status >= 500 {
                if attempt == MAX_RETRIES {
                    return Err(AnalysisError::GenerationFailed(format!(
                        "service unavailable after {} attempts (HTTP {})",
                        attempt + 1,
                        status
                    )));
                }
                self.wait_before_retry(attempt, &format!("HTTP {}", status));
                continue;
            }

            if status >= 400 {
                let message = response
                    .json::<ApiError>()
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| "no error details".to_string());
                return Err(AnalysisError::GenerationFailed(format!(
                    "API error ({}): {}",
                    status, message
                )));
            }

            // A body cut off mid-read is transient; a complete body that does not decode is not.
            let body = match response.text() {
                Ok(body) => body,
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(AnalysisError::GenerationFailed(format!(
                            "failed to read response after {} attempts: {}",
                            attempt + 1,
                            e
                        )));
                    }
                    self.wait_before_retry(attempt, &e.to_string());
                    continue;
                }
            };

            let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
                AnalysisError::GenerationFailed(format!("failed to parse response: {}", e))
            })?;

            let text: String = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();

            if text.trim().is_empty() {
                return Err(AnalysisError::GenerationFailed(
                    "response contained no text".to_string(),
                ));
            }

            tracing::debug!(model = %self.model, chars = text.len(), "Received generated text");
            return Ok(text);
        }

        Err(AnalysisError::GenerationFailed(
            "retries exhausted".to_string(),
        ))
    }
}
