use anyhow::Context;
use ember_core::GameConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

/// Optional `config.json` in the data directory. Every field may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    game: GameConfig,
    prompts: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub game: GameConfig,
    pub prompts: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            game: GameConfig::default(),
            prompts: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ember")
}

impl CliConfig {
    pub async fn load(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let path = data_dir.join(CONFIG_FILE);
        let file = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str::<ConfigFile>(&raw)
                .with_context(|| format!("Invalid config in {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        file.game.validate()?;
        tracing::debug!("Using data directory {}", data_dir.display());

        Ok(Self {
            data_dir,
            game: file.game,
            prompts: file.prompts,
        })
    }

    /// Command-line flags win over the config file.
    pub fn apply_overrides(&mut self, seed: Option<u64>, no_narration: bool, prompts: Option<PathBuf>) {
        if seed.is_some() {
            self.game.seed = seed;
        }
        if no_narration {
            self.game.narration_enabled = false;
        }
        if prompts.is_some() {
            self.prompts = prompts;
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn prompts_path(&self) -> Option<&Path> {
        self.prompts.as_deref()
    }
}
