//! Dashboard HTTP API.
//!
//! The browsing surface over a loaded session: filterable record
//! listing, per-row detail with an editable draft reply, batch stats
//! with the sentiment histogram, and CSV export. Filters narrow the
//! listing only; stats and export always cover the full table.

pub mod filters;
pub mod routes;
pub mod stats;

pub use filters::RecordFilter;
pub use routes::{AppState, dashboard_routes};
pub use stats::{SentimentCount, TableStats};
