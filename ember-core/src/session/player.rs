use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A participant on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: Uuid,
    name: String,
    participation_count: u32,
    #[serde(default)]
    skip_tokens: u32,
}

impl Player {
    /// Callers are expected to have trimmed and checked `name`.
    pub(crate) fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            participation_count: 0,
            skip_tokens: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_participation(name: &str, participation_count: u32) -> Self {
        Self {
            participation_count,
            ..Self::new(name.to_string())
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participation_count(&self) -> u32 {
        self.participation_count
    }

    pub fn skip_tokens(&self) -> u32 {
        self.skip_tokens
    }

    pub(crate) fn record_participation(&mut self) {
        self.participation_count = self.participation_count.saturating_add(1);
    }

    pub(crate) fn award_skip_token(&mut self) {
        self.skip_tokens = self.skip_tokens.saturating_add(1);
    }

    /// Returns false when the player has nothing to spend.
    pub(crate) fn spend_skip_token(&mut self) -> bool {
        if self.skip_tokens == 0 {
            return false;
        }
        self.skip_tokens -= 1;
        true
    }
}
