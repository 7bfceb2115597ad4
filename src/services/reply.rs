//! Draft reply generation.
//!
//! Two interchangeable strategies behind one trait:
//! - `TemplateReplyGenerator`: priority → sentiment → default cascade,
//!   no network, never fails.
//! - `LlmReplyGenerator`: chat completion against an OpenAI-compatible
//!   endpoint, with the same fixed instruction preamble for every row.
//!
//! Neither strategy is allowed to sink a batch: the pipeline maps any
//! generation error to a literal error string in the row's reply.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::ReplyConfig;
use crate::enrich::types::{Priority, SENTIMENT_NEGATIVE};
use crate::error::{ConfigError, ServiceError};

const SERVICE: &str = "reply";

/// Body characters sent to the model per row. Keeps the prompt inside
/// a small completion budget.
const PROMPT_BODY_BUDGET: usize = 2000;

/// Capability trait for drafting replies.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Draft a reply for one row. Inputs are the row's own fields only.
    async fn generate(
        &self,
        body: &str,
        sentiment: &str,
        priority: Priority,
        sender: &str,
    ) -> Result<String, ServiceError>;
}

// ── Templated replies ───────────────────────────────────────────────

/// Template cascade: urgent wins over sentiment, sentiment over the
/// generic acknowledgment. First match is final.
#[derive(Debug, Clone, Default)]
pub struct TemplateReplyGenerator;

impl TemplateReplyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core, also used directly by tests.
    pub fn render(&self, sentiment: &str, priority: Priority, sender: &str) -> String {
        if priority == Priority::Urgent {
            format!(
                "Hello {sender},\n\nWe've marked your request as urgent and will resolve it as soon as possible.\n\nBest Regards."
            )
        } else if sentiment == SENTIMENT_NEGATIVE {
            format!(
                "Hello {sender},\n\nWe're sorry for the inconvenience. Our team is looking into this and will get back to you shortly.\n\nBest Regards."
            )
        } else {
            format!(
                "Hello {sender},\n\nThank you for reaching out. We'll get back to you soon.\n\nBest Regards."
            )
        }
    }
}

#[async_trait]
impl ReplyGenerator for TemplateReplyGenerator {
    async fn generate(
        &self,
        _body: &str,
        sentiment: &str,
        priority: Priority,
        sender: &str,
    ) -> Result<String, ServiceError> {
        Ok(self.render(sentiment, priority, sender))
    }
}

// ── Generated replies ───────────────────────────────────────────────

/// Build the per-row completion prompt. Same instruction preamble for
/// every row; only the row fields vary.
pub fn build_reply_prompt(body: &str, sentiment: &str, priority: Priority) -> String {
    let body = if body.chars().count() > PROMPT_BODY_BUDGET {
        let cut: String = body.chars().take(PROMPT_BODY_BUDGET).collect();
        format!("{cut}…")
    } else {
        body.to_string()
    };

    format!(
        "You are a professional support assistant. Write a polite and professional reply.\n\n\
         Email Body: {body}\n\
         Sentiment: {sentiment}\n\
         Priority: {priority}\n\n\
         Guidelines:\n\
         - If the customer is frustrated (Negative sentiment), acknowledge politely.\n\
         - Provide a general solution or assurance.\n\
         - Keep reply concise and professional."
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Reply generator backed by an OpenAI-compatible chat endpoint.
pub struct LlmReplyGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl LlmReplyGenerator {
    /// Build from a `generated`-strategy config. Missing API settings
    /// are a configuration error, caught at startup.
    pub fn from_config(config: &ReplyConfig) -> Result<Self, ConfigError> {
        let base_url = config
            .api_url
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "REPLY_API_URL".into(),
                hint: "required when REPLY_STRATEGY=generated".into(),
            })?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "REPLY_API_KEY".into(),
                hint: "required when REPLY_STRATEGY=generated".into(),
            })?;
        let model = config
            .model
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "REPLY_MODEL".into(),
                hint: "required when REPLY_STRATEGY=generated".into(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "REPLY_TIMEOUT_SECS".into(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) =
            HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose_secret()))
        {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

#[async_trait]
impl ReplyGenerator for LlmReplyGenerator {
    async fn generate(
        &self,
        body: &str,
        sentiment: &str,
        priority: Priority,
        _sender: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: build_reply_prompt(body, sentiment, priority),
            }],
            max_tokens: 150,
            temperature: 0.5,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed {
                service: SERVICE.into(),
                reason: e.to_string(),
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

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::InvalidResponse {
                    service: SERVICE.into(),
                    reason: format!("failed to parse response: {e}"),
                })?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ServiceError::InvalidResponse {
                service: SERVICE.into(),
                reason: "no choices in response".into(),
            })?;

        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::types::{SENTIMENT_POSITIVE, SENTIMENT_UNKNOWN};

    #[tokio::test]
    async fn urgent_template_wins_over_negative_sentiment() {
        let generator = TemplateReplyGenerator::new();
        let reply = generator
            .generate("body", SENTIMENT_NEGATIVE, Priority::Urgent, "Jane")
            .await
            .unwrap();
        assert!(reply.contains("marked your request as urgent"));
        assert!(!reply.contains("sorry for the inconvenience"));
    }

    #[tokio::test]
    async fn negative_sentiment_gets_apology() {
        let generator = TemplateReplyGenerator::new();
        let reply = generator
            .generate("body", SENTIMENT_NEGATIVE, Priority::Normal, "Jane")
            .await
            .unwrap();
        assert!(reply.contains("sorry for the inconvenience"));
    }

    #[tokio::test]
    async fn default_template_for_everything_else() {
        let generator = TemplateReplyGenerator::new();
        for sentiment in [SENTIMENT_POSITIVE, SENTIMENT_UNKNOWN, "NEUTRAL"] {
            let reply = generator
                .generate("body", sentiment, Priority::Normal, "Jane")
                .await
                .unwrap();
            assert!(reply.contains("Thank you for reaching out"));
        }
    }

    #[test]
    fn templates_greet_sender_and_sign_off() {
        let generator = TemplateReplyGenerator::new();
        let reply = generator.render(SENTIMENT_POSITIVE, Priority::Normal, "Ana");
        assert!(reply.starts_with("Hello Ana,"));
        assert!(reply.ends_with("Best Regards."));
    }

    #[test]
    fn prompt_carries_row_fields() {
        let prompt = build_reply_prompt("My login fails", "NEGATIVE", Priority::Urgent);
        assert!(prompt.contains("Email Body: My login fails"));
        assert!(prompt.contains("Sentiment: NEGATIVE"));
        assert!(prompt.contains("Priority: Urgent"));
        assert!(prompt.starts_with("You are a professional support assistant."));
    }

    #[test]
    fn prompt_truncates_long_bodies() {
        let body = "x".repeat(PROMPT_BODY_BUDGET + 500);
        let prompt = build_reply_prompt(&body, "POSITIVE", Priority::Normal);
        assert!(prompt.len() < body.len());
        assert!(prompt.contains('…'));
    }

    #[test]
    fn chat_request_wire_shape() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hi".into(),
            }],
            max_tokens: 150,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn chat_response_parsing() {
        let json = r#"{"choices": [{"message": {"content": "Thanks for writing in."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Thanks for writing in.")
        );
    }

    #[test]
    fn from_config_rejects_missing_key() {
        let config = ReplyConfig {
            api_url: Some("https://api.example.com/v1".into()),
            ..ReplyConfig::default()
        };
        assert!(LlmReplyGenerator::from_config(&config).is_err());
    }
}
