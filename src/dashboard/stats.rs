//! Aggregate counters and the sentiment histogram.
//!
//! Always computed over the full table, never the filtered view: the
//! dashboard shows batch-level numbers next to whatever subset the
//! filters currently select.

use std::collections::HashMap;

use serde::Serialize;

use crate::enrich::types::{
    AnnotatedRecord, Priority, SENTIMENT_NEGATIVE, SENTIMENT_POSITIVE,
};

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentCount {
    pub label: String,
    pub count: usize,
}

/// Batch-level statistics.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    pub total: usize,
    pub urgent: usize,
    pub positive: usize,
    pub negative: usize,
    /// Label frequencies, highest first (ties break on label) so the
    /// JSON is deterministic.
    pub sentiment_counts: Vec<SentimentCount>,
}

impl TableStats {
    pub fn compute(records: &[AnnotatedRecord]) -> Self {
        let total = records.len();
        let urgent = records
            .iter()
            .filter(|r| r.priority == Priority::Urgent)
            .count();
        let positive = records
            .iter()
            .filter(|r| r.sentiment == SENTIMENT_POSITIVE)
            .count();
        let negative = records
            .iter()
            .filter(|r| r.sentiment == SENTIMENT_NEGATIVE)
            .count();

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *frequencies.entry(record.sentiment.as_str()).or_default() += 1;
        }
        let mut sentiment_counts: Vec<SentimentCount> = frequencies
            .into_iter()
            .map(|(label, count)| SentimentCount {
                label: label.to_string(),
                count,
            })
            .collect();
        sentiment_counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.cmp(&b.label)));

        Self {
            total,
            urgent,
            positive,
            negative,
            sentiment_counts,
        }
    }
}
