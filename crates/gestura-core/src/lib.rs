//! Gestura Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the pipeline:
//! - Landmark identifiers (fixed enumerated indices plus a name table)
//! - Points and landmarks in normalized camera coordinates
//! - Frame snapshots as delivered by the pose engine
//! - Frame time
//! - Error types
//!
//! # Coordinate contract
//!
//! All coordinates are raw sensor coordinates normalized to [0, 1]: `x` grows
//! toward the camera's right, `y` grows downward, `z` grows away from the
//! camera. Nothing here mirrors the image. `Left*` / `Right*` landmarks are
//! the subject's anatomical sides as labelled by the pose engine, so the
//! subject's left shoulder normally has the larger `x`.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod landmark;
pub mod time;

pub use error::*;
pub use frame::*;
pub use geometry::*;
pub use landmark::*;
pub use time::*;
