pub mod json_store;
pub mod memory_store;

pub use json_store::JsonSessionStore;
pub use memory_store::MemorySessionStore;

use crate::error::{EmberError, Result};
use crate::session::SessionState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_RECORD_VERSION: u32 = 1;

/// What gets written to disk: the session plus a little bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub session: SessionState,
}

impl SessionRecord {
    pub fn new(session: SessionState) -> Self {
        Self {
            version: SESSION_RECORD_VERSION,
            saved_at: Utc::now(),
            session,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut record: Self = serde_json::from_str(raw)?;
        if record.version != SESSION_RECORD_VERSION {
            return Err(EmberError::storage(format!(
                "Unsupported session record version {}",
                record.version
            )));
        }
        record.session.normalize()?;
        Ok(record)
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<SessionRecord>>;

    async fn save(&self, session: &SessionState) -> Result<()>;
}

/// Loads the previous session, starting fresh if it is missing or unreadable.
pub async fn load_or_fresh(store: &dyn SessionStore) -> SessionState {
    match store.load().await {
        Ok(Some(record)) => {
            tracing::info!(
                "Restored session saved at {} with {} players",
                record.saved_at.format("%Y-%m-%d %H:%M:%S UTC"),
                record.session.players().len()
            );
            record.session
        }
        Ok(None) => {
            tracing::debug!("No previous session found");
            SessionState::default()
        }
        Err(e) => {
            tracing::warn!("Could not restore previous session, starting fresh: {}", e);
            SessionState::default()
        }
    }
}

/// Saves the session, logging instead of failing.
pub async fn save_quietly(store: &dyn SessionStore, session: &SessionState) {
    if let Err(e) = store.save(session).await {
        tracing::warn!("Failed to save session: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stage;

    #[tokio::test]
    async fn test_load_or_fresh_on_empty_store() {
        let store = MemorySessionStore::new();
        assert_eq!(load_or_fresh(&store).await, SessionState::default());
    }

    #[tokio::test]
    async fn test_load_or_fresh_on_corrupt_record() {
        let store = MemorySessionStore::with_raw("{ not json");
        assert_eq!(load_or_fresh(&store).await, SessionState::default());
    }

    #[tokio::test]
    async fn test_load_or_fresh_restores_saved_session() {
        let store = MemorySessionStore::new();
        let mut session = SessionState::new(Stage::S2);
        session.add_player("Rin").unwrap();
        store.save(&session).await.unwrap();

        assert_eq!(load_or_fresh(&store).await, session);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut record = SessionRecord::new(SessionState::default());
        record.version = 99;
        let raw = serde_json::to_string(&record).unwrap();
        assert!(matches!(
            SessionRecord::from_json(&raw),
            Err(EmberError::Storage(_))
        ));
    }

    fn record_with_players(names: &[&str]) -> serde_json::Value {
        let mut session = SessionState::default();
        for name in names {
            session.add_player(name).unwrap();
        }
        serde_json::to_value(SessionRecord::new(session)).unwrap()
    }

    #[tokio::test]
    async fn test_oversized_window_is_trimmed_on_load() {
        let mut value = record_with_players(&["Ana", "Ben"]);
        value["session"]["history"]["difficulties"] = serde_json::json!([1, 2, 3, 1, 2, 3, 1, 2]);
        let store = MemorySessionStore::with_raw(value.to_string());

        let session = load_or_fresh(&store).await;
        let values: Vec<u8> = session
            .history()
            .difficulties()
            .iter()
            .map(|d| d.value())
            .collect();
        assert_eq!(values, vec![1, 2, 3, 1, 2]);
        assert_eq!(session.players().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_player_ids_rejected_on_load() {
        let mut value = record_with_players(&["Ana", "Ben"]);
        let id = value["session"]["players"][0]["id"].clone();
        value["session"]["players"][1]["id"] = id;
        let raw = value.to_string();

        assert!(matches!(
            SessionRecord::from_json(&raw),
            Err(EmberError::Storage(_))
        ));
        let store = MemorySessionStore::with_raw(raw);
        assert_eq!(load_or_fresh(&store).await, SessionState::default());
    }

    #[test]
    fn test_huge_counters_load_without_overflow() {
        let mut value = record_with_players(&["Ana"]);
        value["session"]["history"]["counts"] =
            serde_json::json!({ "Individual": u32::MAX, "RPS": u32::MAX, "Group": 3 });
        let record = SessionRecord::from_json(&value.to_string()).unwrap();
        assert_eq!(record.session.history().counts().total(), u32::MAX);
    }
}
