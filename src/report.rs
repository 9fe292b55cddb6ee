//! # Failure-reporter capability.
//!
//! The registry does not decide how a failed assertion terminates the test;
//! it delegates to a [`FailureReporter`]. The contract mirrors a test
//! harness's `Fatalf`: the fatal path logs an attributable message and never
//! returns, so the registry touches no shared state after reporting.
//!
//! [`PanicReporter`] is the stock implementation: it panics with the typed
//! [`LockstepError`] as the panic payload, which a harness can observe as an
//! unwind (or as a `JoinError` on a spawned task) and downcast to assert on
//! the exact failure.

use crate::error::LockstepError;

/// # Sink for fatal failures and verbose trace output.
///
/// Implementations must be shareable across the test's concurrent tasks.
///
/// # Example
/// ```
/// use lockstep::{FailureReporter, LockstepError};
///
/// struct AbortReporter;
///
/// impl FailureReporter for AbortReporter {
///     fn log(&self, message: &str) {
///         eprintln!("{message}");
///     }
///
///     fn fatal(&self, error: LockstepError) -> ! {
///         eprintln!("{error}");
///         std::process::abort();
///     }
/// }
/// ```
pub trait FailureReporter: Send + Sync {
    /// Records one diagnostic trace line.
    ///
    /// Called only when the registry runs in verbose mode; has no behavioral
    /// effect.
    fn log(&self, message: &str);

    /// Reports a fatal failure and terminates the calling task's forward
    /// progress. Must not return.
    fn fatal(&self, error: LockstepError) -> !;
}

/// Panic-based reporter.
///
/// `fatal` unwinds with the [`LockstepError`] itself as the panic payload.
/// Intended for test code; pair it with `tokio::spawn` and downcast the
/// `JoinError` panic payload to assert on the failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    fn log(&self, message: &str) {
        println!("[lockstep] {message}");
    }

    fn fatal(&self, error: LockstepError) -> ! {
        std::panic::panic_any(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_reporter_payload_is_typed() {
        let caught = std::panic::catch_unwind(|| {
            PanicReporter.fatal(LockstepError::DoubleWait { message: "x".into() });
        })
        .expect_err("fatal must unwind");

        let err = caught
            .downcast::<LockstepError>()
            .expect("payload should be a LockstepError");
        assert_eq!(*err, LockstepError::DoubleWait { message: "x".into() });
    }
}
