use ember_core::{Prompt, RoundType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the orchestrator is in the round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Wheel visible, waiting for a spin.
    Idle,
    /// Outcome decided, wheel animation in flight.
    Committed,
    IndividualPreRoll,
    IndividualPrompt,
    DuelVersus,
    DuelResult,
    DuelPunishment,
    GroupPrompt,
}

impl RoundPhase {
    /// Phases from which a round may be completed.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RoundPhase::IndividualPrompt | RoundPhase::DuelPunishment | RoundPhase::GroupPrompt
        )
    }

    pub fn is_in_round(self) -> bool {
        !matches!(self, RoundPhase::Idle)
    }
}

/// Result of a duel once the facilitator names a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: Uuid,
    pub loser: Uuid,
    pub punishment: Prompt,
}

/// Working state of the single in-flight round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundContext {
    selected: Uuid,
    opponent: Option<Uuid>,
    round_type: RoundType,
    prompt: Option<Prompt>,
    pre_roll: Option<Vec<Prompt>>,
    choosing: bool,
    duel: Option<DuelOutcome>,
}

impl RoundContext {
    pub(crate) fn new(selected: Uuid, round_type: RoundType, opponent: Option<Uuid>) -> Self {
        Self {
            selected,
            opponent,
            round_type,
            prompt: None,
            pre_roll: None,
            choosing: false,
            duel: None,
        }
    }

    pub fn selected(&self) -> Uuid {
        self.selected
    }

    pub fn opponent(&self) -> Option<Uuid> {
        self.opponent
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn pre_roll(&self) -> Option<&[Prompt]> {
        self.pre_roll.as_deref()
    }

    /// True while the selected player is still picking among pre-roll options.
    pub fn is_choosing(&self) -> bool {
        self.choosing
    }

    pub fn duel(&self) -> Option<&DuelOutcome> {
        self.duel.as_ref()
    }

    pub fn involves(&self, player: Uuid) -> bool {
        self.selected == player || self.opponent == Some(player)
    }

    pub(crate) fn offer(&mut self, options: Vec<Prompt>) {
        self.pre_roll = Some(options);
        self.choosing = true;
    }

    /// Takes the chosen option and drops the rest. `None` if it was never offered.
    pub(crate) fn take_option(&mut self, prompt_id: &str) -> Option<Prompt> {
        let options = self.pre_roll.as_ref()?;
        let chosen = options.iter().find(|p| p.id == prompt_id)?.clone();
        self.pre_roll = None;
        self.choosing = false;
        Some(chosen)
    }

    pub(crate) fn set_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
    }

    pub(crate) fn set_duel(&mut self, outcome: DuelOutcome) {
        self.duel = Some(outcome);
    }

    /// Prompt the players are looking at right now, if any.
    pub fn displayed_prompt(&self, phase: RoundPhase) -> Option<&Prompt> {
        match phase {
            RoundPhase::IndividualPrompt | RoundPhase::GroupPrompt => self.prompt.as_ref(),
            RoundPhase::DuelPunishment => self.duel.as_ref().map(|d| &d.punishment),
            _ => None,
        }
    }
}
