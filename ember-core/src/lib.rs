//! Ember core - content, fairness selection and session state for the Ember party game.
//!
//! This crate holds everything that does not depend on a round being in flight: the
//! prompt library, the fairness selector, the persisted session, and the narration
//! contract the round orchestrator talks to.

pub mod config;
pub mod content;
pub mod error;
pub mod fairness;
pub mod narration;
pub mod session;
pub mod storage;
pub mod types;

pub use config::GameConfig;
pub use content::PromptLibrary;
pub use error::{EmberError, Result};
pub use narration::{narrate, Narrator, SilentNarrator};
pub use session::{Player, RoundHistory, RoundTypeCounts, SessionState};
pub use storage::{JsonSessionStore, MemorySessionStore, SessionRecord, SessionStore};
pub use types::{Difficulty, Prompt, PromptKind, RoundType, SpecialBehavior, Stage};
