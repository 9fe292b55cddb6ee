//! Error types reported by the lockstep registry.
//!
//! All three variants are terminal: the registry hands the error to the
//! [`FailureReporter`](crate::FailureReporter) and performs no recovery or
//! retry. Helper methods (`as_label`, `as_message`) follow the usual
//! label/message split for logs and assertions.

use std::time::Duration;
use thiserror::Error;

/// # Fatal failures of a lockstep operation.
///
/// Timeouts name the exact message(s) that never matched so a test author can
/// locate the `emit`/`wait` pair that went missing. `DoubleWait` is a usage
/// bug in the calling test, not a timing race, and is detected synchronously
/// before any blocking occurs.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockstepError {
    /// A `wait` call declared a message name that is already pending from
    /// another, unresolved `wait` call.
    #[error("double wait for {message}")]
    DoubleWait {
        /// The conflicting message name.
        message: String,
    },

    /// An `emit` call's message was never claimed by a matching `wait`
    /// within the timeout.
    #[error("timed out after {timeout:?} emitting {message}")]
    EmitTimeout {
        /// The unmet message name.
        message: String,
        /// The configured per-call timeout that elapsed.
        timeout: Duration,
    },

    /// A `wait` call's message set was not fully matched within the timeout.
    ///
    /// `outstanding` holds every name still unmatched at expiry, sorted, so
    /// the failure reports the whole unmet set at once rather than one name.
    #[error("timed out after {timeout:?} waiting for {}", .outstanding.join(", "))]
    WaitTimeout {
        /// Names still unmatched at expiry, sorted.
        outstanding: Vec<String>,
        /// The configured per-call timeout that elapsed.
        timeout: Duration,
    },
}

impl LockstepError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lockstep::LockstepError;
    ///
    /// let err = LockstepError::DoubleWait { message: "go".into() };
    /// assert_eq!(err.as_label(), "double_wait");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LockstepError::DoubleWait { .. } => "double_wait",
            LockstepError::EmitTimeout { .. } => "emit_timeout",
            LockstepError::WaitTimeout { .. } => "wait_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
