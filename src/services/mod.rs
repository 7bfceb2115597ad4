//! External model services behind capability traits.
//!
//! The enrichment pipeline only ever sees `Arc<dyn SentimentService>`
//! and `Arc<dyn ReplyGenerator>`; the live implementations speak HTTP
//! and the tests substitute stubs. Service failures are typed, never
//! panics, and the pipeline decides what a failure means for the row.

pub mod reply;
pub mod sentiment;

pub use reply::{LlmReplyGenerator, ReplyGenerator, TemplateReplyGenerator, build_reply_prompt};
pub use sentiment::{HttpSentimentClassifier, SentimentService};
