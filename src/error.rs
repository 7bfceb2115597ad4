//! Error types for Support Triage.

use std::time::Duration;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Input (CSV ingest) errors. Any of these aborts the whole load; a
/// partially annotated table is never exposed.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Malformed CSV record at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// External model service errors (sentiment classification, reply
/// generation). These degrade the affected row, never the batch.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service {service} request failed: {reason}")]
    RequestFailed { service: String, reason: String },

    #[error("Service {service} returned status {status}: {body}")]
    StatusCode {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },

    #[error("Service {service} timed out after {timeout:?}")]
    Timeout { service: String, timeout: Duration },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session state errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No table loaded")]
    NotLoaded,

    #[error("Record {index} not found (table has {len} records)")]
    RecordNotFound { index: usize, len: usize },
}

/// Export errors. In-memory state (including edited replies) survives
/// a failed export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
