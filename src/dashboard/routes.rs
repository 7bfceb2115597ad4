//! REST endpoints for the dashboard.
//!
//! Every response is a deterministic projection of the current session
//! (annotated table + edit map). Load and upload swap the session
//! wholesale; nothing else writes to the table.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use super::filters::RecordFilter;
use super::stats::TableStats;
use crate::enrich::pipeline::Enricher;
use crate::enrich::types::Priority;
use crate::error::SessionError;
use crate::export;
use crate::ingest;
use crate::session::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub enricher: Arc<Enricher>,
}

/// Build the Axum router with all dashboard routes.
pub fn dashboard_routes(store: Arc<SessionStore>, enricher: Arc<Enricher>) -> Router {
    let state = AppState { store, enricher };

    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(session_summary))
        .route("/api/session/load", post(load_session))
        .route("/api/session/upload", post(upload_session))
        .route("/api/records", get(list_records))
        .route("/api/records/{index}", get(record_detail))
        .route("/api/records/{index}/reply", put(save_reply))
        .route("/api/stats", get(table_stats))
        .route("/api/export", get(download_export).post(export_to_disk))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_body(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message.into() }))
}

/// Both session errors read as "nothing to show here": no table, or no
/// such record.
fn session_error(e: SessionError) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, error_body(e.to_string()))
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "support-triage"
    }))
}

// ── Session ─────────────────────────────────────────────────────────────

async fn session_summary(State(state): State<AppState>) -> Response {
    match state.store.summary().await {
        Some(summary) => Json(serde_json::json!(summary)).into_response(),
        None => session_error(SessionError::NotLoaded).into_response(),
    }
}

#[derive(Deserialize)]
struct LoadRequest {
    path: String,
}

/// Read, enrich, and install a CSV from a server-side path. On input
/// errors the previous session stays untouched.
async fn load_session(
    State(state): State<AppState>,
    Json(body): Json<LoadRequest>,
) -> Response {
    let records = match ingest::load_csv(&body.path) {
        Ok(records) => records,
        Err(e) => {
            warn!(path = %body.path, error = %e, "CSV load rejected");
            return (StatusCode::UNPROCESSABLE_ENTITY, error_body(e.to_string()))
                .into_response();
        }
    };

    let table = state.enricher.enrich(records, &body.path).await;
    let summary = state.store.replace(table).await;
    (StatusCode::OK, Json(serde_json::json!(summary))).into_response()
}

/// Same contract as `load_session`, for an uploaded file.
async fn upload_session(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut payload: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let source = field
                    .file_name()
                    .or(field.name())
                    .unwrap_or("upload.csv")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        payload = Some((source, bytes.to_vec()));
                        break;
                    }
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            error_body(format!("failed to read upload: {e}")),
                        )
                            .into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    error_body(format!("invalid multipart payload: {e}")),
                )
                    .into_response();
            }
        }
    }

    let Some((source, bytes)) = payload else {
        return (StatusCode::BAD_REQUEST, error_body("no file in upload")).into_response();
    };

    let records = match ingest::read_records_from_bytes(&bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!(source = %source, error = %e, "uploaded CSV rejected");
            return (StatusCode::UNPROCESSABLE_ENTITY, error_body(e.to_string()))
                .into_response();
        }
    };

    let table = state.enricher.enrich(records, &source).await;
    let summary = state.store.replace(table).await;
    (StatusCode::OK, Json(serde_json::json!(summary))).into_response()
}

// ── Records ─────────────────────────────────────────────────────────────

/// Listing projection: enough for a table view, body omitted.
#[derive(Debug, Serialize)]
struct RecordSummary {
    index: usize,
    sender: String,
    subject: String,
    priority: Priority,
    sentiment: String,
    edited: bool,
}

async fn list_records(
    State(state): State<AppState>,
    Query(filter): Query<RecordFilter>,
) -> Response {
    match state.store.snapshot().await {
        Ok((table, edits)) => {
            let records: Vec<RecordSummary> = filter
                .apply(&table.records)
                .into_iter()
                .map(|r| RecordSummary {
                    index: r.index,
                    sender: r.sender.clone(),
                    subject: r.subject.clone(),
                    priority: r.priority,
                    sentiment: r.sentiment.clone(),
                    edited: edits.contains_key(&r.index),
                })
                .collect();

            Json(serde_json::json!({
                "total": table.len(),
                "matched": records.len(),
                "records": records,
            }))
            .into_response()
        }
        Err(e) => session_error(e).into_response(),
    }
}

async fn record_detail(State(state): State<AppState>, Path(index): Path<usize>) -> Response {
    match state.store.record_detail(index).await {
        Ok((record, draft_reply, edited)) => Json(serde_json::json!({
            "index": record.index,
            "sender": record.sender,
            "subject": record.subject,
            "body": record.body,
            "priority": record.priority,
            "sentiment": record.sentiment,
            "contact": record.contact,
            "auto_reply": record.auto_reply,
            "draft_reply": draft_reply,
            "edited": edited,
        }))
        .into_response(),
        Err(e) => session_error(e).into_response(),
    }
}

#[derive(Deserialize)]
struct SaveReplyRequest {
    text: String,
}

/// Explicit save of an edited reply. This is the only write path into
/// a loaded session.
async fn save_reply(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(body): Json<SaveReplyRequest>,
) -> Response {
    match state.store.save_reply(index, body.text).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "saved", "index": index })),
        )
            .into_response(),
        Err(e) => session_error(e).into_response(),
    }
}

// ── Stats ───────────────────────────────────────────────────────────────

/// Batch-level counters and the sentiment histogram. Always the full
/// table, independent of any listing filters.
async fn table_stats(State(state): State<AppState>) -> Response {
    match state.store.snapshot().await {
        Ok((table, _)) => Json(TableStats::compute(&table.records)).into_response(),
        Err(e) => session_error(e).into_response(),
    }
}

// ── Export ──────────────────────────────────────────────────────────────

async fn download_export(State(state): State<AppState>) -> Response {
    let (table, edits) = match state.store.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return session_error(e).into_response(),
    };

    match export::to_csv_bytes(&table.records, &edits) {
        Ok(bytes) => {
            info!(rows = table.len(), "export downloaded");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"Final_Replies.csv\"",
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "export rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(e.to_string()),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct ExportRequest {
    path: String,
}

/// Server-side export. A write failure reports and leaves the session
/// (edits included) intact for a retry.
async fn export_to_disk(
    State(state): State<AppState>,
    Json(body): Json<ExportRequest>,
) -> Response {
    let (table, edits) = match state.store.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return session_error(e).into_response(),
    };

    match export::export_to_path(&table.records, &edits, &body.path) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "exported",
                "path": body.path,
                "rows": table.len(),
            })),
        )
            .into_response(),
        Err(e) => {
            error!(path = %body.path, error = %e, "export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(e.to_string()),
            )
                .into_response()
        }
    }
}
