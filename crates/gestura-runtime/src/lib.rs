//! Gestura Runtime - Session orchestration and frame loop
//!
//! Each step of a session runs the per-frame pipeline:
//! 1. Pull a snapshot from the pose engine
//! 2. Reject stale or duplicate timestamps
//! 3. Append to the landmark history
//! 4. Run every enabled detector
//! 5. Sample the pointer probe
//! 6. Arbitrate and actuate
//! 7. Reset detectors after a mode change or actuation failure
//!
//! Shutdown releases every held control, including when the session is
//! dropped after an error.

pub mod config;
pub mod engine;
pub mod session;

pub use config::*;
pub use engine::*;
pub use session::*;
