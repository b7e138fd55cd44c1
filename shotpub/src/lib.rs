//! shotpub - versioned publishing for DCC work files
//!
//! Resolves where a work file publishes to and as which version, then runs
//! collected items through an accept / validate / publish / finalize
//! lifecycle that copies files into a publish area and registers records.
//!
//! - [`version`]: parsing, scanning and destination rules
//! - [`collector`]: host sessions and dropped files to publish items
//! - [`publisher`]: plugins, orchestration, registrars
//! - [`context`]: pipeline context and its `shotgun.context` cache
//! - [`config`]: `~/.shotpub/config.ini`
//! - [`log`] / [`logging`]: logger abstraction and tracing setup

pub mod collector;
pub mod config;
pub mod context;
pub mod log;
pub mod logging;
pub mod publisher;
pub mod version;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
