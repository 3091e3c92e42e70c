use super::{SessionRecord, SessionStore};
use crate::error::Result;
use crate::session::SessionState;
use async_trait::async_trait;
use parking_lot::Mutex;

/// In-memory store holding the serialized record, handy for tests and throwaway sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<SessionRecord>> {
        let raw = self.raw.lock().clone();
        raw.map(|r| SessionRecord::from_json(&r)).transpose()
    }

    async fn save(&self, session: &SessionState) -> Result<()> {
        let content = SessionRecord::new(session.clone()).to_json()?;
        *self.raw.lock() = Some(content);
        Ok(())
    }
}
