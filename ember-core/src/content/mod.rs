mod builtin;

use crate::error::{EmberError, Result};
use crate::types::{Prompt, PromptKind, RoundType, Stage};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Static prompt catalogue, partitioned into questions, activities and pointing statements.
///
/// Questions carry a stage affinity and are served only at that stage. Activities form a
/// single pool shared by group rounds and duel punishments. Pointing statements are a
/// separate pool gated by stage at draw time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptLibrary {
    questions: Vec<Prompt>,
    activities: Vec<Prompt>,
    pointing: Vec<Prompt>,
}

impl PromptLibrary {
    pub fn new(questions: Vec<Prompt>, activities: Vec<Prompt>, pointing: Vec<Prompt>) -> Result<Self> {
        let library = Self {
            questions,
            activities,
            pointing,
        };
        library.validate()?;
        Ok(library)
    }

    pub fn builtin() -> Self {
        Self {
            questions: builtin::questions(),
            activities: builtin::activities(),
            pointing: builtin::pointing(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let library: Self = serde_json::from_str(json)?;
        library.validate()?;
        Ok(library)
    }

    /// Loads a custom prompt pack.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            EmberError::content(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let library = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded prompt pack from {} ({} questions, {} activities, {} pointing)",
            path.display(),
            library.questions.len(),
            library.activities.len(),
            library.pointing.len()
        );
        Ok(library)
    }

    pub fn questions_for_stage(&self, stage: Stage) -> Vec<&Prompt> {
        self.questions.iter().filter(|p| p.stage == stage).collect()
    }

    pub fn activities(&self) -> &[Prompt] {
        &self.activities
    }

    pub fn pointing(&self) -> &[Prompt] {
        &self.pointing
    }

    /// Content pool a round of the given type draws from.
    pub fn pool_for_round(&self, round_type: RoundType, stage: Stage) -> Vec<&Prompt> {
        match round_type {
            RoundType::Individual => self.questions_for_stage(stage),
            RoundType::Rps | RoundType::Group => self.activities.iter().collect(),
        }
    }

    /// Checks the authoring invariants the selector relies on.
    pub fn validate(&self) -> Result<()> {
        for stage in Stage::ALL {
            if self.questions_for_stage(stage).is_empty() {
                return Err(EmberError::content(format!("No questions for stage {}", stage)));
            }
        }

        if self.activities.is_empty() {
            return Err(EmberError::content("Activity pool cannot be empty"));
        }

        if !self.pointing.iter().any(|p| p.stage != Stage::S3) {
            return Err(EmberError::content(
                "Pointing pool needs at least one prompt below stage S3",
            ));
        }

        let pools = [
            (&self.questions, PromptKind::Question),
            (&self.activities, PromptKind::Activity),
            (&self.pointing, PromptKind::Pointing),
        ];
        let mut seen = HashSet::new();
        for (pool, kind) in pools {
            for prompt in pool.iter() {
                if prompt.kind != kind {
                    return Err(EmberError::content(format!(
                        "Prompt {} is a {:?} but sits in the {:?} pool",
                        prompt.id, prompt.kind, kind
                    )));
                }
                if !seen.insert(prompt.id.as_str()) {
                    return Err(EmberError::content(format!("Duplicate prompt id {}", prompt.id)));
                }
                if prompt.text.trim().is_empty() {
                    return Err(EmberError::content(format!("Prompt {} has no text", prompt.id)));
                }
            }
        }

        Ok(())
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}
