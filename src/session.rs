//! Session state — the current annotated table plus its edited replies.
//!
//! Exactly one session exists at a time. Loading a new file replaces it
//! wholesale: the previous table, its edits, everything. The table
//! inside a session is never mutated; manual reply edits live in a side
//! map keyed by record index, and the "final reply" of a row is the
//! edit when present, the auto reply otherwise.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::enrich::types::{AnnotatedRecord, AnnotatedTable};
use crate::error::SessionError;

/// One loaded batch and its session-scoped edits.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub table: AnnotatedTable,
    /// Manual reply edits, keyed by record index. Only explicit saves
    /// land here.
    pub edited_replies: HashMap<usize, String>,
    pub loaded_at: DateTime<Utc>,
}

impl Session {
    fn new(table: AnnotatedTable) -> Self {
        Self {
            id: Uuid::new_v4(),
            table,
            edited_replies: HashMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// The reply that would be exported for `index`: the saved edit if
    /// one exists, else the auto reply.
    pub fn final_reply(&self, index: usize) -> Option<&str> {
        let record = self.table.get(index)?;
        Some(
            self.edited_replies
                .get(&index)
                .map(String::as_str)
                .unwrap_or(&record.auto_reply),
        )
    }
}

/// Summary of the current session, as returned by load and status
/// endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub source: String,
    pub total: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SessionSummary {
    fn of(session: &Session) -> Self {
        Self {
            session_id: session.id,
            source: session.table.source.clone(),
            total: session.table.len(),
            loaded_at: session.loaded_at,
        }
    }
}

/// Shared session store. Single-writer semantics through the write
/// lock; read paths clone what they need and release.
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            current: RwLock::new(None),
        })
    }

    /// Install a new session for `table`, discarding the previous one
    /// (table and edits both).
    pub async fn replace(&self, table: AnnotatedTable) -> SessionSummary {
        let session = Session::new(table);
        let summary = SessionSummary::of(&session);

        let mut current = self.current.write().await;
        if let Some(old) = current.as_ref() {
            info!(
                old_session = %old.id,
                discarded_edits = old.edited_replies.len(),
                "replacing session"
            );
        }
        *current = Some(session);

        info!(
            session = %summary.session_id,
            source = %summary.source,
            total = summary.total,
            "session loaded"
        );
        summary
    }

    /// Drop the current session, if any.
    pub async fn clear(&self) {
        let mut current = self.current.write().await;
        if let Some(old) = current.take() {
            info!(session = %old.id, "session cleared");
        }
    }

    /// Summary of the current session.
    pub async fn summary(&self) -> Option<SessionSummary> {
        self.current.read().await.as_ref().map(SessionSummary::of)
    }

    /// Save an edited reply for one record. Overwrites any previous
    /// edit for that index; nothing is ever saved implicitly.
    pub async fn save_reply(&self, index: usize, text: String) -> Result<(), SessionError> {
        let mut current = self.current.write().await;
        let session = current.as_mut().ok_or(SessionError::NotLoaded)?;

        if index >= session.table.len() {
            return Err(SessionError::RecordNotFound {
                index,
                len: session.table.len(),
            });
        }

        session.edited_replies.insert(index, text);
        info!(session = %session.id, index, "reply saved");
        Ok(())
    }

    /// One record plus its draft reply (edit if saved, else auto).
    pub async fn record_detail(
        &self,
        index: usize,
    ) -> Result<(AnnotatedRecord, String, bool), SessionError> {
        let current = self.current.read().await;
        let session = current.as_ref().ok_or(SessionError::NotLoaded)?;

        let record = session
            .table
            .get(index)
            .ok_or(SessionError::RecordNotFound {
                index,
                len: session.table.len(),
            })?;

        let edited = session.edited_replies.contains_key(&index);
        let draft = session
            .edited_replies
            .get(&index)
            .cloned()
            .unwrap_or_else(|| record.auto_reply.clone());

        Ok((record.clone(), draft, edited))
    }

    /// Clone of the full table and edit map for read paths (listing,
    /// stats, export).
    pub async fn snapshot(&self) -> Result<(AnnotatedTable, HashMap<usize, String>), SessionError> {
        let current = self.current.read().await;
        let session = current.as_ref().ok_or(SessionError::NotLoaded)?;
        Ok((session.table.clone(), session.edited_replies.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::types::{ContactInfo, Priority, SENTIMENT_UNKNOWN};

    fn table(n: usize) -> AnnotatedTable {
        let records = (0..n)
            .map(|i| AnnotatedRecord {
                index: i,
                sender: format!("user{i}@example.com"),
                subject: format!("subject {i}"),
                body: "body".into(),
                contact: ContactInfo::default(),
                priority: Priority::Normal,
                sentiment: SENTIMENT_UNKNOWN.into(),
                auto_reply: format!("auto reply {i}"),
            })
            .collect();
        AnnotatedTable::new(records, "test.csv")
    }

    #[tokio::test]
    async fn replace_installs_session() {
        let store = SessionStore::new();
        assert!(store.summary().await.is_none());

        let summary = store.replace(table(3)).await;
        assert_eq!(summary.total, 3);
        assert_eq!(summary.source, "test.csv");
        assert_eq!(store.summary().await.unwrap().total, 3);
    }

    #[tokio::test]
    async fn replace_discards_previous_edits() {
        let store = SessionStore::new();
        store.replace(table(2)).await;
        store.save_reply(0, "edited".into()).await.unwrap();

        let first_id = store.summary().await.unwrap().session_id;
        store.replace(table(2)).await;
        let second_id = store.summary().await.unwrap().session_id;
        assert_ne!(first_id, second_id);

        let (_, edits) = store.snapshot().await.unwrap();
        assert!(edits.is_empty());
    }

    #[tokio::test]
    async fn save_reply_requires_valid_index() {
        let store = SessionStore::new();
        store.replace(table(2)).await;

        assert!(store.save_reply(1, "ok".into()).await.is_ok());
        let err = store.save_reply(5, "nope".into()).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::RecordNotFound { index: 5, len: 2 }
        ));
    }

    #[tokio::test]
    async fn save_reply_without_session_fails() {
        let store = SessionStore::new();
        let err = store.save_reply(0, "x".into()).await.unwrap_err();
        assert!(matches!(err, SessionError::NotLoaded));
    }

    #[tokio::test]
    async fn save_overwrites_previous_edit() {
        let store = SessionStore::new();
        store.replace(table(1)).await;
        store.save_reply(0, "first".into()).await.unwrap();
        store.save_reply(0, "second".into()).await.unwrap();

        let (_, draft, edited) = store.record_detail(0).await.unwrap();
        assert!(edited);
        assert_eq!(draft, "second");
    }

    #[tokio::test]
    async fn detail_prefills_auto_reply_when_unedited() {
        let store = SessionStore::new();
        store.replace(table(2)).await;

        let (record, draft, edited) = store.record_detail(1).await.unwrap();
        assert!(!edited);
        assert_eq!(draft, "auto reply 1");
        assert_eq!(record.index, 1);
    }

    #[test]
    fn final_reply_prefers_edit() {
        let mut session = Session::new(table(2));
        assert_eq!(session.final_reply(0), Some("auto reply 0"));

        session.edited_replies.insert(0, "manual".into());
        assert_eq!(session.final_reply(0), Some("manual"));
        assert_eq!(session.final_reply(1), Some("auto reply 1"));
        assert_eq!(session.final_reply(9), None);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let store = SessionStore::new();
        store.replace(table(1)).await;
        store.clear().await;

        assert!(store.summary().await.is_none());
        assert!(store.snapshot().await.is_err());
    }
}
