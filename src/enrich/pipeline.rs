//! Enrichment pipeline — turns raw email records into the annotated
//! table the dashboard serves.
//!
//! Per row, in dependency order: contact extraction and priority
//! classification (pure, local), then sentiment (service call), then
//! the draft reply (needs sentiment + priority). Rows are independent
//! and run concurrently under a bounded buffer; output order always
//! equals input order.
//!
//! Failure policy: a service error degrades the field, never the row,
//! never the batch. Sentiment failures become `UNKNOWN`; reply
//! failures become a literal error string in the reply column.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::enrich::contact::ContactExtractor;
use crate::enrich::priority::PriorityClassifier;
use crate::enrich::types::{AnnotatedRecord, AnnotatedTable, Priority, SENTIMENT_UNKNOWN};
use crate::ingest::EmailRecord;
use crate::services::{ReplyGenerator, SentimentService};

/// Batch enricher. Holds the pure classifiers by value and the
/// external services as shared trait objects.
pub struct Enricher {
    extractor: ContactExtractor,
    classifier: PriorityClassifier,
    sentiment: Option<Arc<dyn SentimentService>>,
    reply: Arc<dyn ReplyGenerator>,
    /// Lowercase subject keywords; empty disables the pre-filter.
    subject_keywords: Vec<String>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(
        sentiment: Option<Arc<dyn SentimentService>>,
        reply: Arc<dyn ReplyGenerator>,
        config: &AppConfig,
    ) -> Self {
        Self {
            extractor: ContactExtractor::new(),
            classifier: PriorityClassifier::new(&config.urgent_keywords),
            sentiment,
            reply,
            subject_keywords: config.subject_keywords.clone(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Enrich a batch. Infallible: ingest errors are handled upstream
    /// and service errors degrade per row.
    pub async fn enrich(&self, records: Vec<EmailRecord>, source: &str) -> AnnotatedTable {
        let records = self.prefilter(records);
        let total = records.len();
        info!(count = total, source, "enriching batch");

        if self.sentiment.is_none() && total > 0 {
            info!("sentiment service not configured; labels default to UNKNOWN");
        }

        // buffered(n) polls up to n row futures at once but yields
        // results in submission order, so index i is always row i.
        let enriched: Vec<AnnotatedRecord> = stream::iter(records.into_iter().enumerate())
            .map(|(index, record)| self.enrich_row(index, record))
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(count = enriched.len(), source, "batch enriched");
        AnnotatedTable::new(enriched, source)
    }

    /// Keep only rows whose subject mentions one of the configured
    /// keywords. Surviving rows are re-indexed from zero.
    fn prefilter(&self, records: Vec<EmailRecord>) -> Vec<EmailRecord> {
        if self.subject_keywords.is_empty() {
            return records;
        }
        let before = records.len();
        let kept: Vec<EmailRecord> = records
            .into_iter()
            .filter(|r| {
                let subject = r.subject.to_lowercase();
                self.subject_keywords
                    .iter()
                    .any(|k| subject.contains(k.as_str()))
            })
            .collect();
        if kept.len() < before {
            info!(
                kept = kept.len(),
                dropped = before - kept.len(),
                "subject pre-filter applied"
            );
        }
        kept
    }

    async fn enrich_row(&self, index: usize, record: EmailRecord) -> AnnotatedRecord {
        let contact = self.extractor.extract(&record.body);
        let priority = self.classifier.classify(&record.body);
        let sentiment = self.classify_sentiment(index, &record.body).await;
        let auto_reply = self
            .draft_reply(index, &record, &sentiment, priority)
            .await;

        AnnotatedRecord {
            index,
            sender: record.sender,
            subject: record.subject,
            body: record.body,
            contact,
            priority,
            sentiment,
            auto_reply,
        }
    }

    async fn classify_sentiment(&self, index: usize, body: &str) -> String {
        let Some(service) = &self.sentiment else {
            return SENTIMENT_UNKNOWN.to_string();
        };
        match service.classify(body).await {
            Ok(label) => label,
            Err(e) => {
                warn!(index, error = %e, "sentiment classification failed, marking UNKNOWN");
                SENTIMENT_UNKNOWN.to_string()
            }
        }
    }

    async fn draft_reply(
        &self,
        index: usize,
        record: &EmailRecord,
        sentiment: &str,
        priority: Priority,
    ) -> String {
        match self
            .reply
            .generate(&record.body, sentiment, priority, &record.sender)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(index, error = %e, "reply generation failed");
                format!("Error generating reply: {e}")
            }
        }
    }
}
