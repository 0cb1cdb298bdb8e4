//! External collaborators of a session
//!
//! The pose engine and the pointer probe are injected rather than reached
//! through globals, so a session can run against a camera, a recording or a
//! test script alike.

use std::collections::VecDeque;

use gestura_core::{FrameSnapshot, GesturaError, GesturaResult};

/// Source of landmark snapshots with its own lifecycle
pub trait PoseEngine {
    /// Acquire the camera or model. Called once before the first frame.
    fn start(&mut self) -> GesturaResult<()>;

    /// Next processed frame; `None` at end of stream
    ///
    /// May block until the camera delivers.
    fn next_frame(&mut self) -> GesturaResult<Option<FrameSnapshot>>;

    /// Release the engine. Must tolerate being called more than once.
    fn shutdown(&mut self) -> GesturaResult<()>;
}

impl<E: PoseEngine + ?Sized> PoseEngine for Box<E> {
    fn start(&mut self) -> GesturaResult<()> {
        (**self).start()
    }

    fn next_frame(&mut self) -> GesturaResult<Option<FrameSnapshot>> {
        (**self).next_frame()
    }

    fn shutdown(&mut self) -> GesturaResult<()> {
        (**self).shutdown()
    }
}

/// Reports whether the OS pointer is free (a game menu is showing)
pub trait PointerProbe {
    fn pointer_free(&mut self) -> bool;
}

impl<F: FnMut() -> bool> PointerProbe for F {
    fn pointer_free(&mut self) -> bool {
        self()
    }
}

/// Plays back a fixed sequence of snapshots
#[derive(Debug, Default)]
pub struct ReplayEngine {
    frames: VecDeque<FrameSnapshot>,
    started: bool,
}

impl ReplayEngine {
    pub fn new(frames: impl IntoIterator<Item = FrameSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            started: false,
        }
    }

    pub fn push(&mut self, frame: FrameSnapshot) {
        self.frames.push_back(frame);
    }

    /// Frames not yet delivered
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl PoseEngine for ReplayEngine {
    fn start(&mut self) -> GesturaResult<()> {
        self.started = true;
        Ok(())
    }

    fn next_frame(&mut self) -> GesturaResult<Option<FrameSnapshot>> {
        if !self.started {
            return Err(GesturaError::PoseEngine("replay not started".into()));
        }
        Ok(self.frames.pop_front())
    }

    fn shutdown(&mut self) -> GesturaResult<()> {
        self.started = false;
        Ok(())
    }
}
