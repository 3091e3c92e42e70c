pub mod narrator;
pub mod wheel;

pub use narrator::{NarrationQueue, SpeechNarrator};
pub use wheel::TerminalWheel;
