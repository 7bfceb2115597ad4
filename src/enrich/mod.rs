//! Row enrichment — derived columns and the pipeline that computes them.
//!
//! Every ingested record flows through:
//! 1. `ContactExtractor::extract()` — regex contact lifting (pure)
//! 2. `PriorityClassifier::classify()` — keyword urgency check (pure)
//! 3. `SentimentService::classify()` — external model, degrades to UNKNOWN
//! 4. `ReplyGenerator::generate()` — template or model, degrades to an
//!    error string in the reply column
//!
//! Rows never read each other; the pipeline only orchestrates.

pub mod contact;
pub mod pipeline;
pub mod priority;
pub mod types;

pub use contact::ContactExtractor;
pub use pipeline::Enricher;
pub use priority::PriorityClassifier;
pub use types::{
    AnnotatedRecord, AnnotatedTable, ContactInfo, Priority, SENTIMENT_NEGATIVE,
    SENTIMENT_POSITIVE, SENTIMENT_UNKNOWN,
};
