//! Gestura Test Harness - Pipeline validation
//!
//! This crate provides:
//! - Synthetic poses and timestamped pose streams
//! - A recording actuator with failure injection
//! - Scripted sessions over replayed frames
//! - End-to-end gesture scenarios
//! - Seeded chaos runs with invariant checks

pub mod chaos;
pub mod harness;
pub mod pose;
pub mod recording;
pub mod scenarios;

pub use chaos::*;
pub use harness::*;
pub use pose::*;
pub use recording::*;
pub use scenarios::*;

use tracing_subscriber::EnvFilter;

/// Print pipeline logs from tests and benches
///
/// Honours `RUST_LOG`, defaulting to warnings. Safe to call repeatedly.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
