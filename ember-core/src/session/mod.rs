pub mod history;
pub mod player;

pub use history::{RoundHistory, RoundTypeCounts, HISTORY_WINDOW};
pub use player::Player;

use crate::error::{EmberError, Result};
use crate::types::{Difficulty, RoundType, Stage};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Everything a session persists between launches: roster, stage and round history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    players: Vec<Player>,
    stage: Stage,
    #[serde(default)]
    history: RoundHistory,
}

impl SessionState {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Looks a player up by id, id prefix, or case-insensitive name.
    pub fn find_player(&self, needle: &str) -> Option<&Player> {
        let needle = needle.trim();
        if let Ok(id) = Uuid::parse_str(needle) {
            return self.player(id);
        }
        self.players
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle))
            .or_else(|| {
                let mut by_prefix = self
                    .players
                    .iter()
                    .filter(|p| !needle.is_empty() && p.id().to_string().starts_with(needle));
                match (by_prefix.next(), by_prefix.next()) {
                    (Some(p), None) => Some(p),
                    _ => None,
                }
            })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn add_player(&mut self, name: &str) -> Result<&Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EmberError::EmptyName);
        }

        self.players.push(Player::new(name.to_string()));
        let index = self.players.len() - 1;
        let player = &self.players[index];
        tracing::info!("Player '{}' joined with ID: {}", player.name(), player.id());
        Ok(player)
    }

    pub fn remove_player(&mut self, id: Uuid) -> Result<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.id() == id)
            .ok_or(EmberError::PlayerNotFound(id))?;

        let player = self.players.remove(index);
        tracing::info!("Player '{}' left the session", player.name());
        Ok(player)
    }

    pub fn set_stage(&mut self, stage: Stage) {
        if self.stage != stage {
            tracing::info!("Stage changed from {} to {}", self.stage, stage);
        }
        self.stage = stage;
    }

    pub fn record_participation(&mut self, id: Uuid) -> Result<()> {
        self.player_mut(id)?.record_participation();
        Ok(())
    }

    pub fn award_skip_token(&mut self, id: Uuid) -> Result<()> {
        self.player_mut(id)?.award_skip_token();
        Ok(())
    }

    /// Spends one of the player's skip tokens; `Ok(false)` when they have none.
    pub fn spend_skip_token(&mut self, id: Uuid) -> Result<bool> {
        Ok(self.player_mut(id)?.spend_skip_token())
    }

    pub fn record_round(&mut self, round_type: RoundType, difficulty: Difficulty) {
        self.history.record(round_type, difficulty);
    }

    /// Back to an empty roster, the first stage and no history.
    pub fn reset(&mut self) {
        *self = Self::default();
        tracing::info!("Session reset");
    }

    /// Brings a session read from outside back within its invariants.
    ///
    /// An over-long difficulty window is trimmed to its newest entries. Duplicate player
    /// ids cannot be repaired and are rejected.
    pub fn normalize(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(player.id()) {
                return Err(EmberError::storage(format!(
                    "Player id {} appears more than once",
                    player.id()
                )));
            }
        }
        self.history.clamp_window();
        Ok(())
    }

    fn player_mut(&mut self, id: Uuid) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(EmberError::PlayerNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_player_trims_and_rejects_empty() {
        let mut session = SessionState::default();
        let id = session.add_player("  Ana  ").unwrap().id();
        assert_eq!(session.player(id).unwrap().name(), "Ana");
        assert!(matches!(session.add_player("   "), Err(EmberError::EmptyName)));
        assert_eq!(session.players().len(), 1);
    }

    #[test]
    fn test_player_ids_are_unique() {
        let mut session = SessionState::default();
        let a = session.add_player("Sam").unwrap().id();
        let b = session.add_player("Sam").unwrap().id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_player() {
        let mut session = SessionState::default();
        let id = session.add_player("Kai").unwrap().id();
        assert_eq!(session.remove_player(id).unwrap().name(), "Kai");
        assert!(matches!(
            session.remove_player(id),
            Err(EmberError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn test_find_player_by_name_and_prefix() {
        let mut session = SessionState::default();
        let id = session.add_player("Mira").unwrap().id();
        assert_eq!(session.find_player("mira").unwrap().id(), id);
        assert_eq!(session.find_player(&id.to_string()[..8]).unwrap().id(), id);
        assert!(session.find_player("nobody").is_none());
    }

    #[test]
    fn test_skip_tokens() {
        let mut session = SessionState::default();
        let id = session.add_player("Lu").unwrap().id();
        assert!(!session.spend_skip_token(id).unwrap());
        session.award_skip_token(id).unwrap();
        assert!(session.spend_skip_token(id).unwrap());
        assert_eq!(session.player(id).unwrap().skip_tokens(), 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState::new(Stage::S3);
        let id = session.add_player("Jo").unwrap().id();
        session.record_participation(id).unwrap();
        session.record_round(RoundType::Group, Difficulty::MEDIUM);

        session.reset();
        assert_eq!(session, SessionState::default());
        assert_eq!(session.stage(), Stage::S1);
    }
}
