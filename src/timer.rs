//! Per-call deadline timer.
//!
//! Each blocking registry call arms one [`CallTimer`] at entry. The timer
//! task sleeps until the deadline, then sets an atomically-visible fired
//! flag and broadcasts on the shared wake channel so the blocked call wakes
//! and observes the timeout instead of suspending forever. The deadline is
//! fixed at arm time, so spurious wakes cannot extend it.
//!
//! Dropping the `CallTimer` cancels the task; the normal-success path never
//! leaves a timer running behind it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellable one-shot timer bound to a single `emit`/`wait` call.
#[derive(Debug)]
pub(crate) struct CallTimer {
    fired: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl CallTimer {
    /// Arms a timer that fires at `deadline`.
    ///
    /// On firing, the timer sets the fired flag first and broadcasts second,
    /// so any waiter woken by the broadcast observes the flag already set.
    pub(crate) fn arm(deadline: Instant, notify: Arc<Notify>) -> Self {
        let fired = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();

        let flag = Arc::clone(&fired);
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    flag.store(true, Ordering::Release);
                    notify.notify_waiters();
                }
            }
        });

        Self { fired, cancel }
    }

    /// Returns `true` once the deadline has passed and the broadcast fired.
    pub(crate) fn fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl Drop for CallTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
