//! Priority classification — keyword lookup over the message body.
//!
//! A case-insensitive substring scan against a small keyword list; a
//! single hit marks the request urgent. No model call involved.

use crate::config::DEFAULT_URGENT_KEYWORDS;
use crate::enrich::types::Priority;

/// Keyword-based priority classifier.
#[derive(Debug, Clone)]
pub struct PriorityClassifier {
    /// Lowercased at construction; matching lowercases the input once.
    keywords: Vec<String>,
}

impl PriorityClassifier {
    /// Build a classifier from a keyword list. Entries are lowercased;
    /// empty entries are dropped.
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Classify `text`. First keyword hit short-circuits to `Urgent`;
    /// no hits (or an empty keyword list) means `Normal`.
    pub fn classify(&self, text: &str) -> Priority {
        let haystack = text.to_lowercase();
        if self.keywords.iter().any(|k| haystack.contains(k.as_str())) {
            Priority::Urgent
        } else {
            Priority::Normal
        }
    }
}

impl Default for PriorityClassifier {
    fn default() -> Self {
        let keywords: Vec<String> = DEFAULT_URGENT_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .collect();
        Self::new(&keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keywords_flag_urgent() {
        let classifier = PriorityClassifier::default();
        assert_eq!(
            classifier.classify("Please fix this ASAP, production is down"),
            Priority::Urgent
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let classifier = PriorityClassifier::default();
        assert_eq!(classifier.classify("this is URGENT"), Priority::Urgent);
        assert_eq!(classifier.classify("This Is Urgent"), Priority::Urgent);
    }

    #[test]
    fn multi_word_keyword_matches_as_phrase() {
        let classifier = PriorityClassifier::default();
        assert_eq!(
            classifier.classify("I cannot access my dashboard since Friday"),
            Priority::Urgent
        );
    }

    #[test]
    fn no_keyword_means_normal() {
        let classifier = PriorityClassifier::default();
        assert_eq!(
            classifier.classify("Thanks for the great product, just a small question"),
            Priority::Normal
        );
    }

    #[test]
    fn empty_body_is_normal() {
        let classifier = PriorityClassifier::default();
        assert_eq!(classifier.classify(""), Priority::Normal);
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let classifier = PriorityClassifier::new(&["outage".to_string()]);
        assert_eq!(classifier.classify("total outage here"), Priority::Urgent);
        // default keyword no longer matches
        assert_eq!(classifier.classify("this is urgent"), Priority::Normal);
    }

    #[test]
    fn empty_keyword_entries_are_dropped() {
        let classifier = PriorityClassifier::new(&["".to_string(), "  ".to_string()]);
        assert_eq!(classifier.classify("anything at all"), Priority::Normal);
    }

    #[test]
    fn keyword_inside_word_still_matches() {
        // substring semantics, not word-boundary
        let classifier = PriorityClassifier::new(&["urgent".to_string()]);
        assert_eq!(classifier.classify("non-urgently speaking"), Priority::Urgent);
    }
}
