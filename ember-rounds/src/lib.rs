//! Round orchestration for Ember.
//!
//! [`RoundOrchestrator`] runs one round at a time over a caller-owned
//! [`ember_core::SessionState`]. Spins are decided up front and handed out as a
//! [`SpinPlan`] for any front end to animate; deferred work is tied to a
//! [`RoundTicket`] so it can tell when its round has gone away.

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod snapshot;
pub mod ticket;
pub mod wheel;

pub use context::{DuelOutcome, RoundContext, RoundPhase};
pub use error::{Result, RoundError};
pub use orchestrator::{RoundOrchestrator, RoundSummary, SpinCommit, SpinResolution, MIN_PLAYERS};
pub use snapshot::RenderSnapshot;
pub use ticket::{spawn_guarded, RoundTicket, TicketGuard};
pub use wheel::{
    plan_spin, pointer_index, present, InstantPresenter, SpinPlan, WheelEntry, WheelPresenter,
};
