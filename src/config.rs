//! Configuration types, built from environment variables.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Keywords that mark a request as urgent when found anywhere in the
/// body (case-insensitive substring match). Overridable via
/// `URGENT_KEYWORDS`.
pub const DEFAULT_URGENT_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "critical",
    "important",
    "cannot access",
    "not working",
];

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP port for the dashboard API.
    pub port: u16,
    /// CSV file to load and enrich at startup (optional; the API can
    /// load one later).
    pub input_path: Option<String>,
    /// Directory for daily-rolling log files (optional; stderr only
    /// when unset).
    pub log_dir: Option<String>,
    /// Maximum rows enriched concurrently.
    pub concurrency: usize,
    /// Urgency keywords, lowercase.
    pub urgent_keywords: Vec<String>,
    /// Subject keywords a row must contain to be enriched at all.
    /// Empty means no pre-filtering.
    pub subject_keywords: Vec<String>,
}

impl AppConfig {
    /// Build config from environment variables. Invalid numeric values
    /// fall back to defaults.
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("SUPPORT_TRIAGE_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let input_path = std::env::var("SUPPORT_TRIAGE_INPUT").ok();
        let log_dir = std::env::var("SUPPORT_TRIAGE_LOG_DIR").ok();

        let concurrency: usize = std::env::var("ENRICH_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(4);

        let urgent_keywords = keyword_list(
            std::env::var("URGENT_KEYWORDS").ok(),
            DEFAULT_URGENT_KEYWORDS,
        );

        let subject_keywords = keyword_list(std::env::var("SUBJECT_FILTER_KEYWORDS").ok(), &[]);

        Self {
            port,
            input_path,
            log_dir,
            concurrency,
            urgent_keywords,
            subject_keywords,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            input_path: None,
            log_dir: None,
            concurrency: 4,
            urgent_keywords: DEFAULT_URGENT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            subject_keywords: Vec::new(),
        }
    }
}

/// Split a comma-separated override into a lowercase keyword list,
/// falling back to `defaults` when the variable is unset.
fn keyword_list(var: Option<String>, defaults: &[&str]) -> Vec<String> {
    match var {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => defaults.iter().map(|k| k.to_string()).collect(),
    }
}

// ── Sentiment service ───────────────────────────────────────────────

/// Sentiment classifier configuration.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Inference endpoint URL.
    pub api_url: String,
    /// Bearer token, if the endpoint requires one.
    pub api_token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Inputs longer than this are truncated (silently) before
    /// submission.
    pub max_input_chars: usize,
}

impl SentimentConfig {
    /// Build config from environment variables.
    /// Returns `None` if `SENTIMENT_API_URL` is not set (classification
    /// disabled; every row degrades to the unknown sentinel).
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("SENTIMENT_API_URL").ok()?;

        let api_token = std::env::var("SENTIMENT_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let timeout_secs: u64 = std::env::var("SENTIMENT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let max_input_chars: usize = std::env::var("SENTIMENT_MAX_INPUT_CHARS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(512);

        Some(Self {
            api_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            max_input_chars,
        })
    }
}

// ── Reply generation ────────────────────────────────────────────────

/// How draft replies are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStrategy {
    /// Priority → sentiment → default template cascade. No network.
    Templated,
    /// Chat-completion model behind an OpenAI-compatible endpoint.
    Generated,
}

/// Reply generator configuration.
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    pub strategy: ReplyStrategy,
    /// Base URL of the completion endpoint (`generated` only).
    pub api_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub model: Option<String>,
    pub timeout: Duration,
}

impl ReplyConfig {
    /// Build config from environment variables. `REPLY_STRATEGY` picks
    /// the generator; `generated` requires the API settings up front,
    /// at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let strategy = match std::env::var("REPLY_STRATEGY").as_deref() {
            Ok("generated") => ReplyStrategy::Generated,
            Ok("templated") | Err(_) => ReplyStrategy::Templated,
            Ok(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "REPLY_STRATEGY".into(),
                    message: format!("expected 'templated' or 'generated', got '{other}'"),
                });
            }
        };

        let api_url = std::env::var("REPLY_API_URL").ok();
        let api_key = std::env::var("REPLY_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);
        let model = std::env::var("REPLY_MODEL").ok();

        let timeout_secs: u64 = std::env::var("REPLY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        if strategy == ReplyStrategy::Generated {
            if api_url.is_none() {
                return Err(ConfigError::MissingRequired {
                    key: "REPLY_API_URL".into(),
                    hint: "required when REPLY_STRATEGY=generated".into(),
                });
            }
            if api_key.is_none() {
                return Err(ConfigError::MissingRequired {
                    key: "REPLY_API_KEY".into(),
                    hint: "required when REPLY_STRATEGY=generated".into(),
                });
            }
            if model.is_none() {
                return Err(ConfigError::MissingRequired {
                    key: "REPLY_MODEL".into(),
                    hint: "required when REPLY_STRATEGY=generated".into(),
                });
            }
        }

        Ok(Self {
            strategy,
            api_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            strategy: ReplyStrategy::Templated,
            api_url: None,
            api_key: None,
            model: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_list_splits_trims_and_lowercases() {
        let list = keyword_list(Some("Urgent, ASAP ,cannot access,".into()), &["fallback"]);
        assert_eq!(list, vec!["urgent", "asap", "cannot access"]);
    }

    #[test]
    fn keyword_list_falls_back_to_defaults() {
        let list = keyword_list(None, &["a", "b"]);
        assert_eq!(list, vec!["a", "b"]);
    }

    #[test]
    fn default_urgent_keywords_are_lowercase() {
        for kw in DEFAULT_URGENT_KEYWORDS {
            assert_eq!(*kw, kw.to_lowercase());
        }
    }
}
