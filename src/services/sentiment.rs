//! Sentiment classification service.
//!
//! The live client posts `{"inputs": "<text>"}` to a Hugging-Face-style
//! inference endpoint and returns the top-scoring label verbatim.
//! Labels are opaque to the rest of the crate; only the dashboard's
//! filters compare against the POSITIVE/NEGATIVE constants.
//!
//! Inputs are truncated to the configured char budget before
//! submission — the classifier's context window is a hard cap, and the
//! cut is silent (downstream never sees which rows were clipped).

use std::cmp::Ordering;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::SentimentConfig;
use crate::error::ServiceError;

const SERVICE: &str = "sentiment";

/// Capability trait for sentiment classification.
#[async_trait]
pub trait SentimentService: Send + Sync {
    /// Classify `text`, returning the model's label verbatim.
    async fn classify(&self, text: &str) -> Result<String, ServiceError>;
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScoredLabel {
    label: String,
    score: f64,
}

/// Inference endpoints return either `[[{label, score}, …]]` (one
/// inner list per input) or a flat `[{label, score}, …]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<ScoredLabel>>),
    Flat(Vec<ScoredLabel>),
}

// ── HTTP client ─────────────────────────────────────────────────────

/// Sentiment classifier backed by an HTTP inference endpoint.
pub struct HttpSentimentClassifier {
    client: reqwest::Client,
    config: SentimentConfig,
}

impl HttpSentimentClassifier {
    pub fn new(config: SentimentConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::RequestFailed {
                service: SERVICE.into(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.config.api_token {
            if let Ok(value) =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}

#[async_trait]
impl SentimentService for HttpSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<String, ServiceError> {
        let input = truncate_chars(text, self.config.max_input_chars);

        let response = self
            .client
            .post(&self.config.api_url)
            .headers(self.build_headers())
            .json(&InferenceRequest { inputs: input })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout {
                        service: SERVICE.into(),
                        timeout: self.config.timeout,
                    }
                } else {
                    ServiceError::RequestFailed {
                        service: SERVICE.into(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::StatusCode {
                service: SERVICE.into(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: InferenceResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::InvalidResponse {
                    service: SERVICE.into(),
                    reason: format!("failed to parse response: {e}"),
                })?;

        top_label(parsed).ok_or_else(|| ServiceError::InvalidResponse {
            service: SERVICE.into(),
            reason: "no labels in response".into(),
        })
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Pick the highest-scoring label from whichever response shape the
/// endpoint used.
fn top_label(response: InferenceResponse) -> Option<String> {
    let labels = match response {
        InferenceResponse::Nested(mut rows) => {
            if rows.is_empty() {
                return None;
            }
            rows.swap_remove(0)
        }
        InferenceResponse::Flat(labels) => labels,
    };
    labels
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
        .map(|l| l.label)
}
