//! # lockstep
//!
//! **Lockstep** is a deterministic rendezvous primitive for coordinating
//! assertions across concurrent test tasks.
//!
//! It supports two operations: [`emit`](Lockstep::emit) and
//! [`wait`](Lockstep::wait). An emit of message `x` suspends until a
//! corresponding wait for `x` is processed; likewise a wait for `y`
//! suspends until the corresponding emit of `y` is processed. This lets a
//! test impose a strict, verifiable ordering on otherwise racy concurrent
//! code without polling or sleeping.
//!
//! ## Semantics
//! ```text
//! ls.wait(["x", "y"])        fulfilled by emit("x") / emit("y") in any order
//!
//! ls.wait(["x"]);
//! ls.wait(["y"]);            additionally requires x before y
//! ```
//!
//! Every operation is bounded by a per-instance timeout (default 10 s);
//! on expiry, and on a double registration of the same name by two
//! unresolved waits, the instance fails the calling task fatally through a
//! [`FailureReporter`]. The stock [`PanicReporter`] unwinds with the typed
//! [`LockstepError`] as the panic payload.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use lockstep::{Lockstep, PanicReporter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ls = Arc::new(Lockstep::new(Arc::new(PanicReporter)));
//!
//!     const DELAY: Duration = Duration::from_millis(300);
//!     let branch = Arc::clone(&ls);
//!     tokio::spawn(async move {
//!         branch.wait(["go"]).await;
//!         // ... racy work under test ...
//!         tokio::time::sleep(DELAY).await;
//!         branch.emit("done").await;
//!     });
//!
//!     ls.emit("go").await;
//!     ls.wait(["done"]).await;
//! }
//! ```

mod error;
mod registry;
mod report;
mod timer;

// ---- Public re-exports ----

pub use error::LockstepError;
pub use registry::{Lockstep, DEFAULT_TIMEOUT};
pub use report::{FailureReporter, PanicReporter};
