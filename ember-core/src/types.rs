use crate::error::{EmberError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social closeness tier gating which prompts are eligible. Ordered `S1 < S2 < S3`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    #[default]
    S1,
    S2,
    S3,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::S1, Stage::S2, Stage::S3];

    pub fn display_name(self) -> &'static str {
        match self {
            Stage::S1 => "Icebreaker",
            Stage::S2 => "Fun",
            Stage::S3 => "Intimate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::S1 => "Stage 1: Strangers",
            Stage::S2 => "Stage 2: Friends",
            Stage::S3 => "Stage 3: Close Friends",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::S1 => "Lightweight icebreakers",
            Stage::S2 => "Medium depth conversations",
            Stage::S3 => "Deep, personal questions",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Stage::S1 => "S1",
            Stage::S2 => "S2",
            Stage::S3 => "S3",
        };
        write!(f, "{} ({})", code, self.display_name())
    }
}

impl FromStr for Stage {
    type Err = EmberError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s1" | "1" | "strangers" | "icebreaker" => Ok(Stage::S1),
            "s2" | "2" | "friends" | "fun" => Ok(Stage::S2),
            "s3" | "3" | "close" | "close-friends" | "intimate" => Ok(Stage::S3),
            _ => Err(EmberError::InvalidStage(s.to_string())),
        }
    }
}

/// Prompt difficulty, always within `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASY: Difficulty = Difficulty(1);
    pub const MEDIUM: Difficulty = Difficulty(2);
    pub const HARD: Difficulty = Difficulty(3);

    pub fn new(value: u8) -> Result<Self> {
        match value {
            1..=3 => Ok(Difficulty(value)),
            other => Err(EmberError::InvalidDifficulty(other)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::EASY
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = EmberError;

    fn try_from(value: u8) -> Result<Self> {
        Difficulty::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of round played after a spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundType {
    Individual,
    #[serde(rename = "RPS")]
    Rps,
    Group,
}

impl RoundType {
    /// Declaration order, also used to break ties when ranking by usage.
    pub const ALL: [RoundType; 3] = [RoundType::Individual, RoundType::Rps, RoundType::Group];

    pub fn label(self) -> &'static str {
        match self {
            RoundType::Individual => "Individual",
            RoundType::Rps => "Duel",
            RoundType::Group => "Group",
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Question,
    Activity,
    Pointing,
}

/// Behaviour attached to a prompt, kept apart from its display text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialBehavior {
    #[default]
    None,
    TriggersPointing,
    OffersReroll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub text: String,
    pub stage: Stage,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub kind: PromptKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub special: SpecialBehavior,
}

impl Prompt {
    /// Difficulty recorded in history; prompts without one count as easy.
    pub fn effective_difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    pub fn triggers_pointing(&self) -> bool {
        self.special == SpecialBehavior::TriggersPointing
    }

    pub fn offers_reroll(&self) -> bool {
        self.special == SpecialBehavior::OffersReroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering_and_parsing() {
        assert!(Stage::S1 < Stage::S2 && Stage::S2 < Stage::S3);
        assert_eq!("s2".parse::<Stage>().unwrap(), Stage::S2);
        assert_eq!("Close".parse::<Stage>().unwrap(), Stage::S3);
        assert_eq!(" 1 ".parse::<Stage>().unwrap(), Stage::S1);
        assert!("s4".parse::<Stage>().is_err());
    }

    #[test]
    fn test_difficulty_bounds() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(4).is_err());
        assert_eq!(Difficulty::new(2).unwrap(), Difficulty::MEDIUM);
        assert_eq!(Difficulty::default(), Difficulty::EASY);
    }

    #[test]
    fn test_difficulty_rejected_when_deserializing() {
        assert!(serde_json::from_str::<Difficulty>("7").is_err());
        assert_eq!(serde_json::from_str::<Difficulty>("3").unwrap(), Difficulty::HARD);
    }

    #[test]
    fn test_prompt_defaults() {
        let json = r#"{"id":"x","text":"Say hi","stage":"S1","kind":"activity"}"#;
        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt.difficulty, None);
        assert_eq!(prompt.effective_difficulty(), Difficulty::EASY);
        assert_eq!(prompt.special, SpecialBehavior::None);
        assert!(prompt.tags.is_empty());
    }
}
