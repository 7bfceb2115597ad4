//! Record filters for the dashboard listing.
//!
//! All active predicates compose with AND: checking both sentiment
//! boxes yields the rows that are POSITIVE and NEGATIVE at once, i.e.
//! none. Filters narrow; they never union.

use serde::Deserialize;

use crate::enrich::types::{AnnotatedRecord, Priority, SENTIMENT_NEGATIVE, SENTIMENT_POSITIVE};

/// Filter state, typically deserialized from query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    /// Keep only `Priority::Urgent` rows.
    #[serde(default)]
    pub urgent: bool,
    /// Keep only rows whose sentiment is exactly `POSITIVE`.
    #[serde(default)]
    pub positive: bool,
    /// Keep only rows whose sentiment is exactly `NEGATIVE`.
    #[serde(default)]
    pub negative: bool,
    /// Case-insensitive substring match on subject or sender.
    #[serde(default, rename = "q")]
    pub query: Option<String>,
}

impl RecordFilter {
    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        !self.urgent
            && !self.positive
            && !self.negative
            && self.query.as_deref().is_none_or(str::is_empty)
    }

    /// Does `record` pass every active predicate?
    pub fn matches(&self, record: &AnnotatedRecord) -> bool {
        if self.urgent && record.priority != Priority::Urgent {
            return false;
        }
        if self.positive && record.sentiment != SENTIMENT_POSITIVE {
            return false;
        }
        if self.negative && record.sentiment != SENTIMENT_NEGATIVE {
            return false;
        }
        if let Some(query) = self.query.as_deref() {
            if !query.is_empty() {
                let needle = query.to_lowercase();
                let in_subject = record.subject.to_lowercase().contains(&needle);
                let in_sender = record.sender.to_lowercase().contains(&needle);
                if !in_subject && !in_sender {
                    return false;
                }
            }
        }
        true
    }

    /// Apply to a full table, preserving record order.
    pub fn apply<'a>(&self, records: &'a [AnnotatedRecord]) -> Vec<&'a AnnotatedRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::types::{ContactInfo, SENTIMENT_UNKNOWN};

    fn record(sender: &str, subject: &str, priority: Priority, sentiment: &str) -> AnnotatedRecord {
        AnnotatedRecord {
            index: 0,
            sender: sender.into(),
            subject: subject.into(),
            body: String::new(),
            contact: ContactInfo::default(),
            priority,
            sentiment: sentiment.into(),
            auto_reply: String::new(),
        }
    }

    fn sample() -> Vec<AnnotatedRecord> {
        vec![
            record(
                "angry@example.com",
                "Site is down",
                Priority::Urgent,
                SENTIMENT_NEGATIVE,
            ),
            record(
                "happy@example.com",
                "Love the product",
                Priority::Normal,
                SENTIMENT_POSITIVE,
            ),
            record(
                "quiet@example.com",
                "Question about billing",
                Priority::Normal,
                SENTIMENT_UNKNOWN,
            ),
            record(
                "urgent-fan@example.com",
                "Billing is urgent AND great",
                Priority::Urgent,
                SENTIMENT_POSITIVE,
            ),
        ]
    }

    #[test]
    fn empty_filter_passes_everything() {
        let records = sample();
        let filter = RecordFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), records.len());
    }

    #[test]
    fn urgent_only() {
        let records = sample();
        let filter = RecordFilter {
            urgent: true,
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.priority == Priority::Urgent));
    }

    #[test]
    fn positive_matches_exact_label_only() {
        let records = sample();
        let filter = RecordFilter {
            positive: true,
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 2);
        // UNKNOWN is not positive
        assert!(kept.iter().all(|r| r.sentiment == SENTIMENT_POSITIVE));
    }

    #[test]
    fn search_is_case_insensitive_over_subject_and_sender() {
        let records = sample();
        let filter = RecordFilter {
            query: Some("BILLING".into()),
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 2);

        let filter = RecordFilter {
            query: Some("happy@".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&records).len(), 1);
    }

    #[test]
    fn filters_intersect_not_union() {
        let records = sample();
        let filter = RecordFilter {
            urgent: true,
            query: Some("billing".into()),
            ..Default::default()
        };
        let kept = filter.apply(&records);
        // one row is urgent, one mentions billing, exactly one is both
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sender, "urgent-fan@example.com");
    }

    #[test]
    fn both_sentiment_filters_yield_nothing() {
        let records = sample();
        let filter = RecordFilter {
            positive: true,
            negative: true,
            ..Default::default()
        };
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn empty_query_string_is_inactive() {
        let records = sample();
        let filter = RecordFilter {
            query: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), records.len());
    }

    #[test]
    fn filter_preserves_order() {
        let records = sample();
        let filter = RecordFilter {
            urgent: true,
            ..Default::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept[0].sender, "angry@example.com");
        assert_eq!(kept[1].sender, "urgent-fan@example.com");
    }
}
