//! Support Triage — email batch enrichment and review dashboard.

pub mod config;
pub mod dashboard;
pub mod enrich;
pub mod error;
pub mod export;
pub mod ingest;
pub mod services;
pub mod session;
