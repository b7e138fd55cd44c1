//! Logging abstraction passed into every publish call.
//!
//! Plugins and the publish session never call `tracing` directly. They log
//! through a [`Logger`] handed to them by the caller, so that a host can
//! route feedback to its own UI and tests can capture what was reported.
//!
//! - [`TracingLogger`]: forwards to the `tracing` crate
//! - [`NoOpLogger`]: discards everything
//! - [`CapturingLogger`]: records messages for assertions
//!
//! ```
//! use shotpub::log::{Logger, NoOpLogger};
//! use shotpub::{log_info, log_warn};
//!
//! let logger = NoOpLogger;
//! log_info!(logger, "Publishing {}", "shot010.v002.ma");
//! log_warn!(logger, "Your scene is not part of a project.");
//! ```

mod capture;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use capture::{CapturedMessage, CapturingLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
