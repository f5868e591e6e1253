//! Scoped ownership of the pending flag.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::conversation::SessionState;

/// Holds one unit of the in-flight count for as long as it lives.
///
/// Dropping the guard releases it, so the pending flag is cleared on every
/// exit path of a submission: normal return, early return, a panic in the
/// client, or the submit future being dropped mid-await.
pub(crate) struct PendingGuard {
    state: Arc<Mutex<SessionState>>,
    idle_notify: Arc<tokio::sync::Notify>,
}

impl PendingGuard {
    /// Take a unit of the in-flight count. The caller already holds the lock.
    pub(crate) fn acquire(
        locked: &mut SessionState,
        state: &Arc<Mutex<SessionState>>,
        idle_notify: &Arc<tokio::sync::Notify>,
    ) -> Self {
        locked.in_flight += 1;
        Self {
            state: Arc::clone(state),
            idle_notify: Arc::clone(idle_notify),
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let now_idle = {
            let mut state = self.state.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0
        };
        if now_idle {
            self.idle_notify.notify_waiters();
        }
    }
}
