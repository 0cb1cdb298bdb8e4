//! Gestura Detect - Gesture detectors
//!
//! Every detector reads the landmark history and its own private state and
//! produces at most one [`Detection`] per frame:
//! - Shared hysteresis, debounce, cooldown and grace-period primitives
//! - Body-scale references (shoulder width, torso height, eye width)
//! - Hand shape measurements
//! - Eleven built-in detectors and a flat registry
//!
//! Thresholds are ratios of a body dimension measured in the same frame.
//! A missing landmark or degenerate scale produces no detection, except that
//! a detector holding an action reports its own stop.

pub mod config;
pub mod detector;
pub mod detectors;
pub mod hand;
pub mod pattern;
pub mod result;
pub mod scale;

pub use config::*;
pub use detector::*;
pub use detectors::*;
pub use pattern::*;
pub use result::*;
pub use scale::*;
