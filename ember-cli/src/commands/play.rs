use super::players::print_players;
use super::{dialog_error, App};
use crate::terminal::{NarrationQueue, SpeechNarrator, TerminalWheel};
use anyhow::anyhow;
use dialoguer::{Confirm, Input, Select};
use ember_core::{
    Difficulty, Narrator, PromptKind, SessionState, SilentNarrator, Stage,
};
use ember_rounds::{
    present, RoundOrchestrator, RoundPhase, SpinCommit, SpinResolution,
};
use std::sync::Arc;
use uuid::Uuid;

/// One evening at the table.
struct Game<'a> {
    app: &'a App,
    session: SessionState,
    orch: RoundOrchestrator,
    pending: Option<SpinCommit>,
    voice: NarrationQueue,
    wheel: TerminalWheel,
}

pub async fn play(app: &App) -> anyhow::Result<()> {
    let narrator: Arc<dyn Narrator> = if app.config.game.narration_enabled {
        Arc::new(SpeechNarrator::detect())
    } else {
        Arc::new(SilentNarrator)
    };

    let mut game = Game {
        app,
        session: app.load_session().await,
        orch: RoundOrchestrator::new(app.library.clone(), app.config.game.clone())?,
        pending: None,
        voice: NarrationQueue::new(narrator),
        wheel: TerminalWheel::default(),
    };

    println!("Welcome to Ember. {}", game.session.stage().label());
    game.run().await?;
    game.voice.silence();
    app.autosave(&game.session).await;
    println!("Good night!");
    Ok(())
}

impl Game<'_> {
    async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match self.orch.phase() {
                RoundPhase::Idle => {
                    if !self.idle_menu().await? {
                        return Ok(());
                    }
                }
                RoundPhase::Committed => self.finish_spin().await?,
                RoundPhase::IndividualPreRoll => self.choose_question().await?,
                RoundPhase::DuelVersus => self.duel_menu().await?,
                RoundPhase::DuelResult => {
                    pause("Reveal the punishment")?;
                    self.orch.reveal_punishment()?;
                    self.announce();
                }
                RoundPhase::IndividualPrompt
                | RoundPhase::DuelPunishment
                | RoundPhase::GroupPrompt => self.prompt_menu().await?,
            }
        }
    }

    /// Returns `false` once the facilitator quits.
    async fn idle_menu(&mut self) -> anyhow::Result<bool> {
        let items = [
            "Spin the wheel",
            "Add players",
            "Remove a player",
            "Change stage",
            "Show players",
            "Reset session",
            "Quit",
        ];
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact()
            .map_err(dialog_error)?;

        match choice {
            0 => self.spin(),
            1 => self.add_players().await?,
            2 => self.remove_player().await?,
            3 => self.change_stage().await?,
            4 => print_players(&self.session),
            5 => self.reset().await?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn spin(&mut self) {
        match self.orch.spin(&self.session) {
            Ok(commit) => self.pending = Some(commit),
            Err(e) if e.is_user_recoverable() => println!("{}", e),
            Err(e) => tracing::error!("Spin failed: {}", e),
        }
    }

    async fn finish_spin(&mut self) -> anyhow::Result<()> {
        let commit = self
            .pending
            .take()
            .ok_or_else(|| anyhow!("A spin was committed without a plan"))?;

        self.voice.silence();
        present(&self.wheel, &commit.plan).await;

        match self.orch.complete_spin(&mut self.session, commit.ticket)? {
            SpinResolution::Applied(_) => {
                self.app.autosave(&self.session).await;
                println!();
                println!("{} round!", commit.round_type.label());
                self.announce();
            }
            SpinResolution::Stale => tracing::debug!("Spin resolved after its round ended"),
        }
        Ok(())
    }

    async fn choose_question(&mut self) -> anyhow::Result<()> {
        let options: Vec<(String, String)> = self
            .orch
            .context()
            .and_then(|ctx| ctx.pre_roll())
            .map(|prompts| {
                prompts
                    .iter()
                    .map(|p| (p.id.clone(), p.text.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let texts: Vec<&str> = options.iter().map(|(_, text)| text.as_str()).collect();

        let choice = Select::new()
            .with_prompt(format!("{}, pick your question", self.selected_name()))
            .items(&texts)
            .default(0)
            .interact()
            .map_err(dialog_error)?;

        let (id, _) = options
            .get(choice)
            .ok_or_else(|| anyhow!("No question at position {}", choice))?;
        self.orch.choose_pre_roll(id)?;
        self.announce();
        Ok(())
    }

    async fn duel_menu(&mut self) -> anyhow::Result<()> {
        let combatants: Vec<Uuid> = self
            .orch
            .context()
            .map(|ctx| std::iter::once(ctx.selected()).chain(ctx.opponent()).collect())
            .unwrap_or_default();
        let names: Vec<String> = combatants.iter().map(|id| self.name_of(*id)).collect();

        let choice = Select::new()
            .with_prompt("Rock, paper, scissors! Who won?")
            .items(&names)
            .interact()
            .map_err(dialog_error)?;

        let winner = *combatants
            .get(choice)
            .ok_or_else(|| anyhow!("No combatant at position {}", choice))?;
        self.orch.declare_duel_winner(&mut self.session, winner)?;
        self.app.autosave(&self.session).await;
        println!("{} earns a skip token.", self.name_of(winner));
        self.announce();
        Ok(())
    }

    async fn prompt_menu(&mut self) -> anyhow::Result<()> {
        let mut actions = vec![Action::Done, Action::Rate];
        if self.can_skip() {
            actions.push(Action::Skip);
        }
        if self.offers_reroll() {
            actions.push(Action::Reroll);
        }
        actions.extend([Action::Remove, Action::Reset]);

        let labels: Vec<String> = actions.iter().map(|a| self.action_label(*a)).collect();
        let choice = Select::new()
            .with_prompt("When you're ready")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(dialog_error)?;

        match actions.get(choice).copied().unwrap_or(Action::Done) {
            Action::Done => self.complete_round(None).await?,
            Action::Rate => {
                let difficulty = rate_difficulty()?;
                self.complete_round(Some(difficulty)).await?;
            }
            Action::Skip => match self.orch.skip_prompt(&mut self.session) {
                Ok(_) => {
                    self.app.autosave(&self.session).await;
                    self.announce();
                }
                Err(e) => println!("{}", e),
            },
            Action::Reroll => {
                let plan = self.orch.retarget(&self.session)?;
                present(&self.wheel, &plan).await;
                println!("The wheel picks {}!", plan.winner().label);
                self.voice
                    .say_now(&format!("The wheel picks {}", plan.winner().label));
            }
            Action::Remove => self.remove_player().await?,
            Action::Reset => self.reset().await?,
        }
        Ok(())
    }

    async fn complete_round(&mut self, difficulty: Option<Difficulty>) -> anyhow::Result<()> {
        self.voice.silence();
        let summary = self.orch.complete_round(&mut self.session, difficulty)?;
        self.app.autosave(&self.session).await;
        tracing::debug!("Completed {:?}", summary);
        println!();
        Ok(())
    }

    async fn add_players(&mut self) -> anyhow::Result<()> {
        let raw: String = Input::new()
            .with_prompt("Names (comma separated)")
            .interact_text()
            .map_err(dialog_error)?;

        for name in raw.split(',').filter(|n| !n.trim().is_empty()) {
            let player = self.session.add_player(name)?;
            println!("Added {}", player.name());
        }
        self.app.autosave(&self.session).await;
        Ok(())
    }

    async fn remove_player(&mut self) -> anyhow::Result<()> {
        if self.session.players().is_empty() {
            println!("No players to remove.");
            return Ok(());
        }
        let names: Vec<&str> = self.session.players().iter().map(|p| p.name()).collect();
        let choice = Select::new()
            .with_prompt("Who is leaving?")
            .items(&names)
            .interact()
            .map_err(dialog_error)?;

        let id = self
            .session
            .players()
            .get(choice)
            .map(|p| p.id())
            .ok_or_else(|| anyhow!("No player at position {}", choice))?;
        let was_in_round = self.orch.phase().is_in_round();
        let removed = self.orch.remove_player(&mut self.session, id)?;
        if was_in_round && self.orch.phase() == RoundPhase::Idle {
            self.voice.silence();
            self.pending = None;
            println!("Round abandoned.");
        }
        self.app.autosave(&self.session).await;
        println!("Removed {}", removed.name());
        Ok(())
    }

    async fn change_stage(&mut self) -> anyhow::Result<()> {
        let labels: Vec<&str> = Stage::ALL.iter().map(|s| s.label()).collect();
        let current = Stage::ALL
            .iter()
            .position(|s| *s == self.session.stage())
            .unwrap_or(0);
        let choice = Select::new()
            .with_prompt("Stage")
            .items(&labels)
            .default(current)
            .interact()
            .map_err(dialog_error)?;

        let stage = Stage::ALL.get(choice).copied().unwrap_or_default();
        self.orch.set_stage(&mut self.session, stage)?;
        self.app.autosave(&self.session).await;
        println!("{}: {}", stage.label(), stage.description());
        Ok(())
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        let confirmed = Confirm::new()
            .with_prompt("Forget all players and round history?")
            .default(false)
            .interact()
            .map_err(dialog_error)?;
        if confirmed {
            self.voice.silence();
            self.pending = None;
            self.orch.reset(&mut self.session);
            self.app.autosave(&self.session).await;
            println!("Session reset.");
        }
        Ok(())
    }

    /// Prints the current screen and queues its narration behind the reveal.
    fn announce(&mut self) {
        self.render();
        self.voice.silence();

        let Some(line) = self.orch.narration_line(&self.session) else {
            return;
        };
        self.voice
            .say_after(self.orch.guard(), self.app.config.game.narration_delay, line);
    }

    fn render(&self) {
        let snapshot = self.orch.snapshot(&self.session);
        let name = |id: Option<Uuid>| {
            id.and_then(|id| snapshot.player_name(id))
                .unwrap_or("Someone")
                .to_string()
        };

        match snapshot.phase {
            RoundPhase::IndividualPreRoll => {
                println!("{} gets to choose.", name(snapshot.selected));
            }
            RoundPhase::DuelVersus => {
                println!(
                    "⚔  {}  vs  {}",
                    name(snapshot.selected),
                    name(snapshot.opponent)
                );
            }
            RoundPhase::DuelResult => {
                if let Some(duel) = &snapshot.duel {
                    println!(
                        "{} wins. {} takes the punishment.",
                        name(Some(duel.winner)),
                        name(Some(duel.loser))
                    );
                }
            }
            RoundPhase::IndividualPrompt | RoundPhase::DuelPunishment | RoundPhase::GroupPrompt => {
                if let Some(prompt) = &snapshot.prompt {
                    let who = match (snapshot.phase, prompt.kind) {
                        (RoundPhase::GroupPrompt, PromptKind::Pointing) => {
                            "Point at the person who...".to_string()
                        }
                        (RoundPhase::GroupPrompt, _) => "Everyone".to_string(),
                        (RoundPhase::DuelPunishment, _) => {
                            name(snapshot.duel.as_ref().map(|d| d.loser))
                        }
                        _ => name(snapshot.selected),
                    };
                    println!();
                    println!("  {} [{}]", who, prompt.effective_difficulty());
                    println!("  {}", prompt.text);
                    println!();
                }
            }
            RoundPhase::Idle | RoundPhase::Committed => {}
        }
    }

    fn can_skip(&self) -> bool {
        self.orch.phase() == RoundPhase::IndividualPrompt && self.selected_tokens() > 0
    }

    fn offers_reroll(&self) -> bool {
        self.orch
            .context()
            .and_then(|ctx| ctx.displayed_prompt(self.orch.phase()))
            .is_some_and(|p| p.offers_reroll())
    }

    fn selected_tokens(&self) -> u32 {
        self.orch
            .context()
            .and_then(|ctx| self.session.player(ctx.selected()))
            .map_or(0, |p| p.skip_tokens())
    }

    fn selected_name(&self) -> String {
        self.orch
            .context()
            .map(|ctx| self.name_of(ctx.selected()))
            .unwrap_or_else(|| "Someone".to_string())
    }

    fn name_of(&self, id: Uuid) -> String {
        self.session
            .player(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| "Someone".to_string())
    }

    fn action_label(&self, action: Action) -> String {
        match action {
            Action::Done => "Done".to_string(),
            Action::Rate => "Done, and rate how hard it was".to_string(),
            Action::Skip => format!("Skip this question ({} tokens left)", self.selected_tokens()),
            Action::Reroll => "Spin for a player".to_string(),
            Action::Remove => "Remove a player".to_string(),
            Action::Reset => "Reset session".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Done,
    Rate,
    Skip,
    Reroll,
    Remove,
    Reset,
}

fn rate_difficulty() -> anyhow::Result<Difficulty> {
    let choice = Select::new()
        .with_prompt("How hard was it?")
        .items(&["Easy", "Medium", "Hard"])
        .default(0)
        .interact()
        .map_err(dialog_error)?;
    let value = u8::try_from(choice + 1)?;
    Ok(Difficulty::new(value)?)
}

fn pause(prompt: &str) -> anyhow::Result<()> {
    Input::<String>::new()
        .with_prompt(format!("{} (press Enter)", prompt))
        .allow_empty(true)
        .interact_text()
        .map_err(dialog_error)?;
    Ok(())
}
