use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identifies the session generation and round a deferred callback belongs to.
///
/// The generation moves on every session reset; the round moves on every spin and
/// every round end. A callback holding an old ticket must not touch current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundTicket {
    pub generation: u64,
    pub round: u64,
}

/// Cheap handle a timer can hold to find out whether its round is still current.
#[derive(Debug, Clone)]
pub struct TicketGuard {
    ticket: RoundTicket,
    current: watch::Receiver<RoundTicket>,
}

impl TicketGuard {
    pub(crate) fn new(ticket: RoundTicket, current: watch::Receiver<RoundTicket>) -> Self {
        Self { ticket, current }
    }

    pub fn ticket(&self) -> RoundTicket {
        self.ticket
    }

    pub fn is_current(&self) -> bool {
        *self.current.borrow() == self.ticket
    }
}

/// Runs `action` after `delay` unless the round has moved on by then.
///
/// The handle resolves to whether the action ran.
pub fn spawn_guarded<F, Fut>(guard: TicketGuard, delay: Duration, action: F) -> JoinHandle<bool>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if !guard.is_current() {
            tracing::debug!("Dropping stale timer for {:?}", guard.ticket());
            return false;
        }
        action().await;
        true
    })
}
