//! Gestura History - Temporal landmark store
//!
//! Bounded FIFO of frame snapshots with total kinematic queries:
//! - Positions at a frame offset
//! - Velocity, speed and acceleration over a window
//! - Distances and relative positions in the current frame
//! - Vertical range and oscillation over a window
//! - Advisory calibration baseline

pub mod config;
pub mod store;

pub use config::*;
pub use store::*;
