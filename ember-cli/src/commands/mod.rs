pub mod history;
pub mod play;
pub mod players;
pub mod stage;

pub use history::{reset_session, show_history};
pub use play::play;
pub use players::{handle_player_command, PlayerCommands};
pub use stage::{handle_stage_command, StageCommands};

use crate::config::CliConfig;
use anyhow::Context;
use ember_core::storage::{load_or_fresh, save_quietly};
use ember_core::{JsonSessionStore, PromptLibrary, SessionState, SessionStore};
use std::sync::Arc;

/// Everything a command needs: settings, the prompt library and the session file.
pub struct App {
    pub config: CliConfig,
    pub library: Arc<PromptLibrary>,
    store: JsonSessionStore,
}

impl App {
    pub async fn open(config: CliConfig) -> anyhow::Result<Self> {
        let library = match config.prompts_path() {
            Some(path) => PromptLibrary::load(path)
                .await
                .with_context(|| format!("Could not use prompt pack {}", path.display()))?,
            None => PromptLibrary::builtin(),
        };
        let store = JsonSessionStore::new(config.session_path());

        Ok(Self {
            config,
            library: Arc::new(library),
            store,
        })
    }

    pub async fn load_session(&self) -> SessionState {
        load_or_fresh(&self.store).await
    }

    /// Saves for commands that change exactly one thing; errors surface to the user.
    pub async fn save_session(&self, session: &SessionState) -> anyhow::Result<()> {
        self.store
            .save(session)
            .await
            .with_context(|| format!("Failed to save {}", self.store.path().display()))
    }

    /// Saves during play, where a failed write must not end the game.
    pub async fn autosave(&self, session: &SessionState) {
        save_quietly(&self.store, session).await;
    }
}

fn dialog_error(e: dialoguer::Error) -> anyhow::Error {
    anyhow::anyhow!("Prompt failed: {}", e)
}
