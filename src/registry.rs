//! # Rendezvous registry.
//!
//! [`Lockstep`] owns the shared pending-message set, the wake channel, and
//! the configured timeout, and implements the two operations of the
//! primitive:
//!
//! - [`emit`](Lockstep::emit) announces that a named event occurred and
//!   suspends until a `wait` claims it.
//! - [`wait`](Lockstep::wait) declares one or more awaited names and
//!   suspends until a separate `emit` has matched every one of them.
//!
//! All blocked calls share one broadcast channel: every state mutation is
//! followed by `notify_waiters`, and every waiter re-checks its own
//! condition from shared state on each wake. No guarantee is made about
//! which of several eligible calls wakes first after a broadcast.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::LockstepError;
use crate::report::FailureReporter;
use crate::timer::CallTimer;

/// Timeout applied to `emit` and `wait` unless overridden with
/// [`Lockstep::set_timeout`]. Increase the timeout when debugging
/// interactively.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// # Rendezvous point for concurrent test tasks.
///
/// One instance is created per test scenario and shared across the
/// scenario's tasks (typically behind an `Arc`). It holds no cross-scenario
/// state.
///
/// `wait` awaits all of its names as a group, so
///
/// ```text
/// ls.wait(["x", "y"])
/// ```
///
/// is fulfilled by `emit("x")` and `emit("y")` in either order, whereas
///
/// ```text
/// ls.wait(["x"]);
/// ls.wait(["y"]);
/// ```
///
/// additionally requires the emits to happen in order, since the second
/// registration only exists after the first call returned.
pub struct Lockstep {
    reporter: Arc<dyn FailureReporter>,
    timeout: Duration,
    verbose: bool,
    pending: Mutex<HashSet<String>>,
    notify: Arc<Notify>,
}

impl Lockstep {
    /// Creates a registry with [`DEFAULT_TIMEOUT`] and verbose mode off.
    ///
    /// The reporter receives trace output (verbose mode only) and fatal
    /// failures.
    pub fn new(reporter: Arc<dyn FailureReporter>) -> Self {
        Self {
            reporter,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
            pending: Mutex::new(HashSet::new()),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Overrides [`DEFAULT_TIMEOUT`] for subsequent `emit` and `wait` calls.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Enables verbose mode. When enabled, every operation traces its
    /// progress through the reporter's `log`. No behavioral effect.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Emits the message `message`.
    ///
    /// Suspends until a corresponding [`wait`](Lockstep::wait) registration
    /// for `message` exists and this call has consumed it; exactly one
    /// `emit` consumes exactly one registration. Fails fatally through the
    /// reporter if the timeout elapses first.
    pub async fn emit(&self, message: impl Into<String>) {
        let message = message.into();
        self.trace(|| format!("emitting {message}"));

        let timer = self.arm_timer();
        loop {
            // Register for wakeups before checking, so a broadcast between
            // the check and the await below cannot be lost.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut pending = self.lock_pending();
                if pending.remove(&message) {
                    self.trace(|| format!("emitted {message}"));
                    self.notify.notify_waiters();
                    return;
                }
            }

            if timer.fired() {
                self.reporter.fatal(LockstepError::EmitTimeout {
                    message: message.clone(),
                    timeout: self.timeout,
                });
            }

            notified.await;
        }
    }

    /// Waits for all the provided messages.
    ///
    /// Suspends until a separate [`emit`](Lockstep::emit) has matched every
    /// name; the emits may arrive in any relative order. Fails fatally
    /// through the reporter with a double-wait error if any name is already
    /// pending from another unresolved `wait` call (checked before anything
    /// is registered), or with a timeout error naming every still-unmatched
    /// message if the timeout elapses.
    pub async fn wait<I, S>(&self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested: Vec<String> = messages.into_iter().map(Into::into).collect();
        self.trace(|| format!("waiting for {}", message_list(&requested)));

        // Local view of the names this call still needs. Registration is
        // all-or-nothing: the double-wait check runs against every name
        // before the shared set is touched.
        let mut outstanding: HashSet<String> = HashSet::with_capacity(requested.len());
        {
            let mut pending = self.lock_pending();
            for message in &requested {
                if pending.contains(message) || !outstanding.insert(message.clone()) {
                    let message = message.clone();
                    drop(pending);
                    self.reporter.fatal(LockstepError::DoubleWait { message });
                }
            }
            for message in &outstanding {
                pending.insert(message.clone());
            }
        }
        // An emit already blocked on one of these names can now proceed.
        self.notify.notify_waiters();

        let timer = self.arm_timer();
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let pending = self.lock_pending();
                let before = outstanding.len();
                outstanding.retain(|message| {
                    if pending.contains(message) {
                        true
                    } else {
                        self.trace(|| format!("wait satisfied for {message}"));
                        false
                    }
                });
                if outstanding.len() != before {
                    self.notify.notify_waiters();
                }
            }

            if outstanding.is_empty() {
                return;
            }

            if timer.fired() {
                let mut names: Vec<String> = outstanding.iter().cloned().collect();
                names.sort_unstable();
                self.reporter.fatal(LockstepError::WaitTimeout {
                    outstanding: names,
                    timeout: self.timeout,
                });
            }

            notified.await;
        }
    }

    /// Arms a timer for one blocking call. The deadline is fixed here, at
    /// call entry, so repeated wakeups never extend the effective timeout.
    fn arm_timer(&self) -> CallTimer {
        CallTimer::arm(Instant::now() + self.timeout, Arc::clone(&self.notify))
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashSet<String>> {
        self.pending.lock().expect("pending lock poisoned")
    }

    fn trace(&self, line: impl FnOnce() -> String) {
        if self.verbose {
            self.reporter.log(&line());
        }
    }
}

/// Renders a message set as a stable, sorted list for diagnostics.
fn message_list(messages: &[String]) -> String {
    let mut names: Vec<&str> = messages.iter().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}
