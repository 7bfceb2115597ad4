//! Shared types for the enrichment pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Sentiment labels ────────────────────────────────────────────────

/// Sentiment labels are opaque strings owned by the classifier; the
/// pipeline only ever compares against these three. Anything else the
/// model returns flows through untouched.
pub const SENTIMENT_POSITIVE: &str = "POSITIVE";
pub const SENTIMENT_NEGATIVE: &str = "NEGATIVE";
/// Sentinel for rows where classification failed or was disabled.
pub const SENTIMENT_UNKNOWN: &str = "UNKNOWN";

// ── Priority ────────────────────────────────────────────────────────

/// Request priority, derived from keyword matching on the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    Normal,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urgent => write!(f, "Urgent"),
            Self::Normal => write!(f, "Normal"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Urgent" => Ok(Self::Urgent),
            "Normal" => Ok(Self::Normal),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

// ── Contact info ────────────────────────────────────────────────────

/// Contact details lifted from a message body by pattern matching.
///
/// Matches are kept in first-occurrence order and not deduplicated;
/// the extractor makes no claim the strings are reachable addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

// ── Annotated records ───────────────────────────────────────────────

/// One support email after enrichment.
///
/// Every derived field is a function of this row's own inputs; rows
/// never read each other. `index` is the record's identity for the
/// dashboard, reply edits, and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    /// Position in the enriched table (0-based).
    pub index: usize,
    pub sender: String,
    pub subject: String,
    pub body: String,
    /// Emails and phone numbers found in the body.
    pub contact: ContactInfo,
    pub priority: Priority,
    /// Classifier label, or `SENTIMENT_UNKNOWN` on failure.
    pub sentiment: String,
    /// Drafted reply (template or generated).
    pub auto_reply: String,
}

/// The full enriched batch. Immutable once built — reply edits live in
/// the session beside it, never in here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedTable {
    pub records: Vec<AnnotatedRecord>,
    /// Where the batch came from (file path or upload name).
    pub source: String,
    pub enriched_at: DateTime<Utc>,
}

impl AnnotatedTable {
    pub fn new(records: Vec<AnnotatedRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
            enriched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AnnotatedRecord> {
        self.records.get(index)
    }
}
