use super::{SessionRecord, SessionStore};
use crate::error::{EmberError, Result};
use crate::session::SessionState;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Session record kept as a pretty-printed JSON file.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load(&self) -> Result<Option<SessionRecord>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        SessionRecord::from_json(&content).map(Some)
    }

    async fn save(&self, session: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EmberError::storage(format!("Failed to create directory: {}", e)))?;
        }

        let content = SessionRecord::new(session.clone()).to_json()?;

        // Write beside the target and rename so a crash never leaves half a record.
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}
