use crate::error::{EmberError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Offer the selected player a choice of questions before committing to one.
    pub pre_roll_enabled: bool,
    pub pre_roll_count: usize,
    pub spin_duration: Duration,
    pub wheel_full_turns: u32,
    pub narration_enabled: bool,
    /// Pause between a visual reveal and its narration.
    pub narration_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pre_roll_enabled: true,
            pre_roll_count: 3,
            spin_duration: Duration::from_secs(4),
            wheel_full_turns: 5,
            narration_enabled: true,
            narration_delay: Duration::from_millis(600),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pre_roll_count == 0 {
            return Err(EmberError::config("Pre-roll count must be greater than 0"));
        }

        if self.wheel_full_turns == 0 {
            return Err(EmberError::config("Wheel must make at least one full turn"));
        }

        if self.spin_duration.is_zero() {
            return Err(EmberError::config("Spin duration cannot be zero"));
        }

        Ok(())
    }
}
