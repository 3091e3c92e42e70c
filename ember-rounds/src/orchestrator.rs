use crate::context::{DuelOutcome, RoundContext, RoundPhase};
use crate::error::{Result, RoundError};
use crate::snapshot::RenderSnapshot;
use crate::ticket::{RoundTicket, TicketGuard};
use crate::wheel::{plan_spin, SpinPlan, WheelEntry};
use ember_core::fairness::{
    get_pointing_prompt, get_prompts_for_round, select_round_type, select_weighted_player,
};
use ember_core::{
    Difficulty, GameConfig, Player, Prompt, PromptKind, PromptLibrary, RoundType, SessionState,
    Stage,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Fewest players a round can be started with.
pub const MIN_PLAYERS: usize = 2;

/// Decision handed to the presentation layer when a spin is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinCommit {
    pub ticket: RoundTicket,
    pub plan: SpinPlan,
    pub selected: Uuid,
    pub opponent: Option<Uuid>,
    pub round_type: RoundType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinResolution {
    /// Side effects applied; the round entered this phase.
    Applied(RoundPhase),
    /// The ticket no longer matches a pending spin. Nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_type: RoundType,
    pub selected: Uuid,
    pub opponent: Option<Uuid>,
    pub difficulty: Difficulty,
    pub prompt_id: Option<String>,
}

/// Where a completed spin leads, worked out before any state changes.
enum RoundEntry {
    PreRoll(Vec<Prompt>),
    Prompt(Prompt),
    Versus,
    Group(Prompt),
}

/// Drives rounds: idle, spin commit, reveal, round-specific steps, completion.
///
/// The orchestrator owns the in-flight round and its random source. The session is
/// passed in by the caller; the orchestrator only touches participation counters,
/// skip tokens and round history on it.
pub struct RoundOrchestrator {
    library: Arc<PromptLibrary>,
    config: GameConfig,
    rng: ChaCha8Rng,
    phase: RoundPhase,
    context: Option<RoundContext>,
    committed: Option<SpinPlan>,
    generation: u64,
    round: u64,
    wheel_rest_deg: f64,
    ticket_tx: watch::Sender<RoundTicket>,
}

impl RoundOrchestrator {
    pub fn new(library: Arc<PromptLibrary>, config: GameConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let ticket = RoundTicket {
            generation: 0,
            round: 0,
        };
        let (ticket_tx, _) = watch::channel(ticket);

        Ok(Self {
            library,
            config,
            rng,
            phase: RoundPhase::Idle,
            context: None,
            committed: None,
            generation: 0,
            round: 0,
            wheel_rest_deg: 0.0,
            ticket_tx,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn context(&self) -> Option<&RoundContext> {
        self.context.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn library(&self) -> &PromptLibrary {
        &self.library
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == RoundPhase::Committed
    }

    /// Plan of the spin currently in flight or just revealed.
    pub fn committed_plan(&self) -> Option<&SpinPlan> {
        self.committed.as_ref()
    }

    pub fn ticket(&self) -> RoundTicket {
        RoundTicket {
            generation: self.generation,
            round: self.round,
        }
    }

    /// Guard for a timer tied to the current round.
    pub fn guard(&self) -> TicketGuard {
        TicketGuard::new(self.ticket(), self.ticket_tx.subscribe())
    }

    /// Decides the whole outcome of the next round and commits to it.
    ///
    /// Player, round type and duel opponent are fixed here, before any animation
    /// starts. Side effects wait for [`complete_spin`](Self::complete_spin).
    pub fn spin(&mut self, session: &SessionState) -> Result<SpinCommit> {
        match self.phase {
            RoundPhase::Idle => {}
            RoundPhase::Committed => return Err(RoundError::SpinInProgress),
            phase => return Err(RoundError::invalid("spin", phase)),
        }

        let players = session.players();
        let not_enough = RoundError::NotEnoughPlayers {
            have: players.len(),
            need: MIN_PLAYERS,
        };
        if players.len() < MIN_PLAYERS {
            tracing::info!("Spin rejected: {}", not_enough);
            return Err(not_enough);
        }

        let selected = match select_weighted_player(players, &mut self.rng) {
            Some(player) => player.id(),
            None => return Err(not_enough),
        };
        let round_type = select_round_type(session.history().counts(), &mut self.rng);

        let opponent = if round_type == RoundType::Rps {
            let rest: Vec<&Player> = players.iter().filter(|p| p.id() != selected).collect();
            match select_weighted_player(&rest, &mut self.rng) {
                Some(player) => Some(player.id()),
                None => return Err(not_enough),
            }
        } else {
            None
        };

        let entries = players
            .iter()
            .map(|p| WheelEntry::new(p.id(), p.name()))
            .collect();
        let plan = plan_spin(
            entries,
            selected,
            self.wheel_rest_deg,
            self.config.wheel_full_turns,
            self.config.spin_duration,
            &mut self.rng,
        )
        .ok_or_else(|| RoundError::invalid("plan a spin", self.phase))?;

        self.round += 1;
        self.context = Some(RoundContext::new(selected, round_type, opponent));
        self.committed = Some(plan.clone());
        self.phase = RoundPhase::Committed;
        let ticket = self.publish_ticket();

        tracing::info!(
            "Round {} committed: {} plays a {} round",
            self.round,
            plan.winner().label,
            round_type
        );

        Ok(SpinCommit {
            ticket,
            plan,
            selected,
            opponent,
            round_type,
        })
    }

    /// Applies a committed spin once its animation has finished.
    ///
    /// Only the first call with the spin's own ticket does anything; repeats and tickets
    /// from abandoned rounds resolve to [`SpinResolution::Stale`].
    pub fn complete_spin(
        &mut self,
        session: &mut SessionState,
        ticket: RoundTicket,
    ) -> Result<SpinResolution> {
        if self.phase != RoundPhase::Committed || ticket != self.ticket() {
            tracing::debug!("Ignoring spin completion for stale ticket {:?}", ticket);
            return Ok(SpinResolution::Stale);
        }

        let (selected, round_type) = match self.context.as_ref() {
            Some(ctx) => (ctx.selected(), ctx.round_type()),
            None => return Err(RoundError::invalid("complete a spin", self.phase)),
        };

        let stage = session.stage();
        let entry = {
            let history = session.history().difficulties();
            match round_type {
                RoundType::Individual if self.config.pre_roll_enabled => RoundEntry::PreRoll(
                    self.draw_prompts(round_type, stage, history, self.config.pre_roll_count)?,
                ),
                RoundType::Individual => {
                    RoundEntry::Prompt(self.draw_prompt(round_type, stage, history)?)
                }
                RoundType::Rps => RoundEntry::Versus,
                RoundType::Group => {
                    let prompt = self.draw_prompt(round_type, stage, history)?;
                    if prompt.triggers_pointing() {
                        RoundEntry::Group(self.draw_pointing(stage)?)
                    } else {
                        RoundEntry::Group(prompt)
                    }
                }
            }
        };

        session.record_participation(selected)?;
        if let Some(plan) = self.committed.as_ref() {
            self.wheel_rest_deg = plan.end_deg().rem_euclid(360.0);
        }

        let ctx = self
            .context
            .as_mut()
            .ok_or_else(|| RoundError::invalid("complete a spin", RoundPhase::Committed))?;
        self.phase = match entry {
            RoundEntry::PreRoll(options) => {
                ctx.offer(options);
                RoundPhase::IndividualPreRoll
            }
            RoundEntry::Prompt(prompt) => {
                ctx.set_prompt(prompt);
                RoundPhase::IndividualPrompt
            }
            RoundEntry::Versus => RoundPhase::DuelVersus,
            RoundEntry::Group(prompt) => {
                ctx.set_prompt(prompt);
                RoundPhase::GroupPrompt
            }
        };

        tracing::info!("Round {} revealed, entering {:?}", self.round, self.phase);
        Ok(SpinResolution::Applied(self.phase))
    }

    /// Locks in one of the pre-roll options; the others are discarded.
    pub fn choose_pre_roll(&mut self, prompt_id: &str) -> Result<&Prompt> {
        self.expect_phase(RoundPhase::IndividualPreRoll, "choose a question")?;
        let ctx = self.context_mut("choose a question")?;
        let chosen = ctx
            .take_option(prompt_id)
            .ok_or_else(|| RoundError::OptionNotOffered(prompt_id.to_string()))?;
        ctx.set_prompt(chosen);

        self.phase = RoundPhase::IndividualPrompt;
        tracing::debug!("Pre-roll option {} chosen", prompt_id);
        self.current_prompt("choose a question")
    }

    /// Spends one of the selected player's skip tokens to swap the current question.
    pub fn skip_prompt(&mut self, session: &mut SessionState) -> Result<&Prompt> {
        self.expect_phase(RoundPhase::IndividualPrompt, "skip a question")?;
        let (selected, current_id) = {
            let ctx = self.context_ref("skip a question")?;
            (ctx.selected(), ctx.prompt().map(|p| p.id.clone()))
        };

        let tokens = session
            .player(selected)
            .map(Player::skip_tokens)
            .ok_or(ember_core::EmberError::PlayerNotFound(selected))?;
        if tokens == 0 {
            return Err(RoundError::NoSkipTokens(selected));
        }

        let stage = session.stage();
        let replacement = {
            let history = session.history().difficulties();
            self.draw_prompts(RoundType::Individual, stage, history, 2)?
                .into_iter()
                .find(|p| Some(&p.id) != current_id.as_ref())
                .ok_or_else(|| RoundError::exhausted("no other question to swap in"))?
        };

        if !session.spend_skip_token(selected)? {
            return Err(RoundError::NoSkipTokens(selected));
        }
        self.context_mut("skip a question")?.set_prompt(replacement);

        tracing::info!("Player {} spent a skip token", selected);
        self.current_prompt("skip a question")
    }

    /// Records the duel's winner and draws the loser's punishment.
    pub fn declare_duel_winner(
        &mut self,
        session: &mut SessionState,
        winner: Uuid,
    ) -> Result<&DuelOutcome> {
        self.expect_phase(RoundPhase::DuelVersus, "declare a winner")?;
        let (selected, opponent) = {
            let ctx = self.context_ref("declare a winner")?;
            (ctx.selected(), ctx.opponent())
        };

        let loser = if winner == selected {
            opponent.ok_or(RoundError::NotACombatant(winner))?
        } else if Some(winner) == opponent {
            selected
        } else {
            return Err(RoundError::NotACombatant(winner));
        };

        let stage = session.stage();
        let punishment = {
            let history = session.history().difficulties();
            self.draw_prompt(RoundType::Rps, stage, history)?
        };

        session.award_skip_token(winner)?;
        self.context_mut("declare a winner")?.set_duel(DuelOutcome {
            winner,
            loser,
            punishment,
        });
        self.phase = RoundPhase::DuelResult;

        tracing::info!("Duel won by {}, {} takes the punishment", winner, loser);
        self.context_ref("declare a winner")?
            .duel()
            .ok_or_else(|| RoundError::invalid("declare a winner", self.phase))
    }

    /// Shows the punishment drawn when the winner was declared.
    pub fn reveal_punishment(&mut self) -> Result<&Prompt> {
        self.expect_phase(RoundPhase::DuelResult, "reveal the punishment")?;
        self.phase = RoundPhase::DuelPunishment;
        self.context_ref("reveal the punishment")?
            .duel()
            .map(|d| &d.punishment)
            .ok_or_else(|| RoundError::invalid("reveal the punishment", self.phase))
    }

    /// Finishes the round: records its difficulty and type, then clears the context.
    ///
    /// `difficulty` overrides the prompt's own; prompts without one count as easy.
    pub fn complete_round(
        &mut self,
        session: &mut SessionState,
        difficulty: Option<Difficulty>,
    ) -> Result<RoundSummary> {
        if !self.phase.is_terminal() {
            return Err(RoundError::invalid("complete the round", self.phase));
        }
        let ctx = self
            .context
            .take()
            .ok_or_else(|| RoundError::invalid("complete the round", self.phase))?;

        let prompt = ctx.displayed_prompt(self.phase);
        let difficulty = difficulty
            .or_else(|| prompt.and_then(|p| p.difficulty))
            .unwrap_or_default();
        let summary = RoundSummary {
            round_type: ctx.round_type(),
            selected: ctx.selected(),
            opponent: ctx.opponent(),
            difficulty,
            prompt_id: prompt.map(|p| p.id.clone()),
        };

        session.record_round(summary.round_type, difficulty);
        self.finish_round();

        tracing::info!(
            "Round complete: {} round at difficulty {}",
            summary.round_type,
            difficulty
        );
        Ok(summary)
    }

    /// Picks someone at random for a prompt that asks for another player.
    ///
    /// Purely informational: no counters, tokens or history change.
    pub fn retarget(&mut self, session: &SessionState) -> Result<SpinPlan> {
        let (selected, offers_reroll) = {
            let ctx = self.context_ref("spin again")?;
            let prompt = ctx
                .displayed_prompt(self.phase)
                .ok_or_else(|| RoundError::invalid("spin again", self.phase))?;
            (ctx.selected(), prompt.offers_reroll())
        };
        if !offers_reroll {
            return Err(RoundError::RerollNotOffered);
        }

        let players = session.players();
        let others: Vec<&Player> = players.iter().filter(|p| p.id() != selected).collect();
        let candidates: Vec<&Player> = if others.is_empty() {
            players.iter().collect()
        } else {
            others
        };
        let target = candidates
            .choose(&mut self.rng)
            .map(|p| p.id())
            .ok_or(RoundError::NotEnoughPlayers {
                have: players.len(),
                need: MIN_PLAYERS,
            })?;

        let entries = players
            .iter()
            .map(|p| WheelEntry::new(p.id(), p.name()))
            .collect();
        let plan = plan_spin(
            entries,
            target,
            self.wheel_rest_deg,
            self.config.wheel_full_turns,
            self.config.spin_duration,
            &mut self.rng,
        )
        .ok_or(RoundError::NotEnoughPlayers {
            have: players.len(),
            need: MIN_PLAYERS,
        })?;
        self.wheel_rest_deg = plan.end_deg().rem_euclid(360.0);

        tracing::debug!("Re-spin landed on {}", plan.winner().label);
        Ok(plan)
    }

    pub fn set_stage(&mut self, session: &mut SessionState, stage: Stage) -> Result<()> {
        self.expect_phase(RoundPhase::Idle, "change stage")?;
        session.set_stage(stage);
        Ok(())
    }

    /// Removes a player. If the in-flight round involves them, it is abandoned to idle
    /// without recording history.
    pub fn remove_player(&mut self, session: &mut SessionState, id: Uuid) -> Result<Player> {
        if session.player(id).is_none() {
            return Err(ember_core::EmberError::PlayerNotFound(id).into());
        }

        if self.context.as_ref().is_some_and(|ctx| ctx.involves(id)) {
            tracing::warn!("Player {} removed mid-round, abandoning round {}", id, self.round);
            self.finish_round();
        }

        Ok(session.remove_player(id)?)
    }

    /// Clears the session and any round in flight. Timers from before the reset go stale.
    pub fn reset(&mut self, session: &mut SessionState) {
        session.reset();
        self.context = None;
        self.committed = None;
        self.phase = RoundPhase::Idle;
        self.wheel_rest_deg = 0.0;
        self.generation += 1;
        self.round = 0;
        self.publish_ticket();
        tracing::info!("Session reset, generation {}", self.generation);
    }

    /// Line to narrate for the current phase.
    pub fn narration_line(&self, session: &SessionState) -> Option<String> {
        let ctx = self.context.as_ref()?;
        let name = |id: Uuid| {
            session
                .player(id)
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| "Someone".to_string())
        };

        match self.phase {
            RoundPhase::Idle | RoundPhase::Committed => None,
            RoundPhase::IndividualPreRoll => Some(format!(
                "{}, pick one of {} questions.",
                name(ctx.selected()),
                ctx.pre_roll().map_or(0, <[Prompt]>::len)
            )),
            RoundPhase::IndividualPrompt => ctx
                .prompt()
                .map(|p| format!("{}, {}", name(ctx.selected()), p.text)),
            RoundPhase::DuelVersus => {
                let opponent = ctx.opponent().map(name)?;
                Some(format!(
                    "Duel! {} versus {}. Rock, paper, scissors!",
                    name(ctx.selected()),
                    opponent
                ))
            }
            RoundPhase::DuelResult => ctx.duel().map(|d| {
                format!(
                    "{} wins! {}, get ready for your punishment.",
                    name(d.winner),
                    name(d.loser)
                )
            }),
            RoundPhase::DuelPunishment => ctx
                .duel()
                .map(|d| format!("{}, {}", name(d.loser), d.punishment.text)),
            RoundPhase::GroupPrompt => ctx.prompt().map(|p| match p.kind {
                PromptKind::Pointing => format!(
                    "On the count of three, point to the person who {}",
                    p.text
                ),
                _ => format!("Everyone: {}", p.text),
            }),
        }
    }

    pub fn snapshot(&self, session: &SessionState) -> RenderSnapshot {
        let ctx = self.context.as_ref();
        RenderSnapshot {
            players: session.players().to_vec(),
            stage: session.stage(),
            phase: self.phase,
            prompt: ctx.and_then(|c| c.displayed_prompt(self.phase)).cloned(),
            pre_roll: ctx
                .and_then(|c| c.pre_roll())
                .map(<[Prompt]>::to_vec)
                .unwrap_or_default(),
            selected: ctx.map(RoundContext::selected),
            opponent: ctx.and_then(RoundContext::opponent),
            round_type: ctx.map(RoundContext::round_type),
            duel: ctx.and_then(|c| c.duel()).cloned(),
            spin_in_progress: self.is_spinning(),
            committed_winner: self.committed.as_ref().map(|p| p.winner().id),
            ticket: self.ticket(),
        }
    }

    fn publish_ticket(&self) -> RoundTicket {
        let ticket = self.ticket();
        self.ticket_tx.send_replace(ticket);
        ticket
    }

    fn finish_round(&mut self) {
        self.context = None;
        self.committed = None;
        self.phase = RoundPhase::Idle;
        self.round += 1;
        self.publish_ticket();
    }

    fn expect_phase(&self, expected: RoundPhase, action: &'static str) -> Result<()> {
        if self.phase != expected {
            return Err(RoundError::invalid(action, self.phase));
        }
        Ok(())
    }

    fn context_ref(&self, action: &'static str) -> Result<&RoundContext> {
        self.context
            .as_ref()
            .ok_or(RoundError::invalid(action, self.phase))
    }

    fn context_mut(&mut self, action: &'static str) -> Result<&mut RoundContext> {
        let phase = self.phase;
        self.context
            .as_mut()
            .ok_or(RoundError::invalid(action, phase))
    }

    fn current_prompt(&self, action: &'static str) -> Result<&Prompt> {
        self.context_ref(action)?
            .prompt()
            .ok_or(RoundError::invalid(action, self.phase))
    }

    fn draw_prompts(
        &mut self,
        round_type: RoundType,
        stage: Stage,
        history: &[Difficulty],
        count: usize,
    ) -> Result<Vec<Prompt>> {
        let prompts: Vec<Prompt> =
            get_prompts_for_round(&self.library, round_type, stage, history, count, &mut self.rng)
                .into_iter()
                .cloned()
                .collect();
        if prompts.is_empty() {
            return Err(RoundError::exhausted(format!(
                "{} pool is empty at stage {}",
                round_type, stage
            )));
        }
        Ok(prompts)
    }

    fn draw_prompt(
        &mut self,
        round_type: RoundType,
        stage: Stage,
        history: &[Difficulty],
    ) -> Result<Prompt> {
        self.draw_prompts(round_type, stage, history, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| RoundError::exhausted(format!("{} pool is empty", round_type)))
    }

    fn draw_pointing(&mut self, stage: Stage) -> Result<Prompt> {
        get_pointing_prompt(&self.library, stage, &mut self.rng)
            .cloned()
            .ok_or_else(|| RoundError::exhausted("pointing pool is empty"))
    }
}
