//! Contact extraction — lifts email addresses and phone-like digit
//! runs out of message bodies with two fixed patterns.
//!
//! Extraction is lexical only. A match means "looks like contact
//! info", not "is deliverable"; validation is out of scope.

use regex::Regex;

use crate::enrich::types::ContactInfo;

/// Pattern-based contact extractor. Regexes are compiled once at
/// construction and reused across the batch.
#[derive(Debug, Clone)]
pub struct ContactExtractor {
    email_re: Regex,
    phone_re: Regex,
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            // local part, @, domain-ish token
            email_re: Regex::new(r"[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+").unwrap(),
            // optional +, then 10+ chars of digits/spaces/hyphens
            // bounded by digits
            phone_re: Regex::new(r"\+?\d[\d -]{8,}\d").unwrap(),
        }
    }

    /// Extract all contact matches from `text`, in order of occurrence.
    /// Duplicates are kept; empty input yields empty lists.
    pub fn extract(&self, text: &str) -> ContactInfo {
        let emails = self
            .email_re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        let phones = self
            .phone_re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        ContactInfo { emails, phones }
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_email() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Please reach me at jane@example.com for details.");
        assert_eq!(info.emails, vec!["jane@example.com"]);
        assert!(info.phones.is_empty());
    }

    #[test]
    fn extracts_multiple_emails_in_order() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Cc bob@corp.io and alice@corp.io on this.");
        assert_eq!(info.emails, vec!["bob@corp.io", "alice@corp.io"]);
    }

    #[test]
    fn extracts_phone_with_plus_and_separators() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Call me at +1 555-123-4567 after lunch.");
        assert_eq!(info.phones, vec!["+1 555-123-4567"]);
    }

    #[test]
    fn extracts_email_and_phone_together() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Contact jane@example.com or +1 555-123-4567.");
        assert_eq!(info.emails, vec!["jane@example.com"]);
        assert_eq!(info.phones, vec!["+1 555-123-4567"]);
    }

    #[test]
    fn no_contact_info_yields_empty_lists() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("My dashboard shows error 500 since this morning.");
        assert!(info.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_lists() {
        let extractor = ContactExtractor::new();
        assert!(extractor.extract("").is_empty());
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        let extractor = ContactExtractor::new();
        // order number is only 7 digits
        let info = extractor.extract("My order 1234567 never arrived.");
        assert!(info.phones.is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Mail me: a@x.com. Again: a@x.com.");
        assert_eq!(info.emails.len(), 2);
    }

    #[test]
    fn plus_tagged_local_part_matches() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Use billing+urgent@example.co.uk instead.");
        assert_eq!(info.emails, vec!["billing+urgent@example.co.uk"]);
    }
}
