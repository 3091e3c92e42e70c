use crate::context::RoundPhase;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, RoundError>;

#[derive(Error, Debug)]
pub enum RoundError {
    #[error("Ember core error: {0}")]
    Core(#[from] ember_core::EmberError),

    #[error("Not enough players: need {need}, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    #[error("A spin is already in progress")]
    SpinInProgress,

    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: RoundPhase,
    },

    #[error("Player {0} is not in this duel")]
    NotACombatant(Uuid),

    #[error("Prompt {0} was not offered this round")]
    OptionNotOffered(String),

    #[error("Player {0} has no skip tokens")]
    NoSkipTokens(Uuid),

    #[error("The current prompt does not offer a re-spin")]
    RerollNotOffered,

    #[error("No prompts available: {0}")]
    ContentExhausted(String),
}

impl RoundError {
    pub fn invalid(action: &'static str, phase: RoundPhase) -> Self {
        Self::InvalidTransition { action, phase }
    }

    pub fn exhausted(msg: impl Into<String>) -> Self {
        Self::ContentExhausted(msg.into())
    }

    /// Errors the facilitator can fix by editing the roster or picking again.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotEnoughPlayers { .. }
                | Self::SpinInProgress
                | Self::OptionNotOffered(_)
                | Self::NoSkipTokens(_)
                | Self::RerollNotOffered
        )
    }
}
