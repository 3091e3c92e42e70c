use crate::context::{DuelOutcome, RoundPhase};
use crate::ticket::RoundTicket;
use ember_core::{Player, Prompt, RoundType, Stage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything a front end needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub players: Vec<Player>,
    pub stage: Stage,
    pub phase: RoundPhase,
    pub prompt: Option<Prompt>,
    pub pre_roll: Vec<Prompt>,
    pub selected: Option<Uuid>,
    pub opponent: Option<Uuid>,
    pub round_type: Option<RoundType>,
    pub duel: Option<DuelOutcome>,
    pub spin_in_progress: bool,
    pub committed_winner: Option<Uuid>,
    pub ticket: RoundTicket,
}

impl RenderSnapshot {
    pub fn player_name(&self, id: Uuid) -> Option<&str> {
        self.players.iter().find(|p| p.id() == id).map(Player::name)
    }

    /// Whether the spin control should accept input.
    pub fn can_spin(&self) -> bool {
        self.phase == RoundPhase::Idle && self.players.len() >= crate::MIN_PLAYERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoundOrchestrator;
    use ember_core::{GameConfig, PromptLibrary, SessionState};
    use std::sync::Arc;

    #[test]
    fn test_snapshot_is_plain_json() {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        let mut orch = RoundOrchestrator::new(Arc::new(PromptLibrary::builtin()), config).unwrap();
        let mut session = SessionState::default();
        session.add_player("Ana").unwrap();
        session.add_player("Ben").unwrap();

        let commit = orch.spin(&session).unwrap();
        orch.complete_spin(&mut session, commit.ticket).unwrap();

        let snapshot = orch.snapshot(&session);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["players"].as_array().unwrap().len(), 2);
        assert_eq!(value["spin_in_progress"], false);
        assert_eq!(value["selected"], commit.selected.to_string());
        assert!(value["phase"].is_string());
        assert!(snapshot.player_name(commit.selected).is_some());
    }

    #[test]
    fn test_cannot_spin_with_one_player() {
        let orch = RoundOrchestrator::new(Arc::new(PromptLibrary::builtin()), GameConfig::default())
            .unwrap();
        let mut session = SessionState::default();
        session.add_player("Ana").unwrap();
        assert!(!orch.snapshot(&session).can_spin());
    }
}
