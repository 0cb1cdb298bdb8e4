//! Scripted session harness
//!
//! Feeds a fixed pose sequence and pointer script through a full session
//! and collects every frame report.

use std::collections::VecDeque;

use gestura_control::{ControlMode, Key};
use gestura_core::{FrameSnapshot, GesturaResult};
use gestura_detect::{DetectorKind, DetectorRegistry};
use gestura_runtime::{FrameReport, GesturaConfig, PointerProbe, ReplayEngine, Session, StepOutcome};

use crate::{Pose, PoseStream, RecordingActuator};

/// Pointer states to report, one per frame; the last value repeats
#[derive(Debug, Clone, Default)]
pub struct PointerScript {
    values: VecDeque<bool>,
    last: bool,
}

impl PointerScript {
    pub fn new(values: impl IntoIterator<Item = bool>) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: false,
        }
    }

    /// Pointer always captured by the game
    pub fn captured() -> Self {
        Self::default()
    }
}

impl PointerProbe for PointerScript {
    fn pointer_free(&mut self) -> bool {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}

pub type ScriptedSession = Session<ReplayEngine, PointerScript, RecordingActuator>;

/// Everything observed during a scripted run
#[derive(Debug, Default)]
pub struct ScenarioResult {
    pub reports: Vec<FrameReport>,
    pub rejected_frames: usize,
}

impl ScenarioResult {
    /// Frames in which `kind` was detected
    pub fn frames_with(&self, kind: DetectorKind) -> usize {
        self.reports
            .iter()
            .filter(|r| r.detections.contains(kind))
            .count()
    }

    pub fn final_mode(&self) -> Option<ControlMode> {
        self.reports.last().map(|r| r.outcome.mode)
    }

    pub fn transitions(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.transition.is_some())
            .count()
    }

    pub fn failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.failure.is_some())
            .count()
    }
}

/// Builder for a scripted session
pub struct Scenario {
    config: GesturaConfig,
    registry: Option<DetectorRegistry>,
    frames: Vec<FrameSnapshot>,
    pointer: PointerScript,
    actuator: RecordingActuator,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self::with_config(GesturaConfig::default())
    }

    pub fn with_config(config: GesturaConfig) -> Self {
        let keys = &config.control.keys;
        let movement = [keys.forward, keys.backward, keys.left, keys.right];
        Self {
            config,
            registry: None,
            frames: Vec::new(),
            pointer: PointerScript::captured(),
            actuator: RecordingActuator::new().with_exclusive_keys(movement),
        }
    }

    /// Replace the built-in detector set
    pub fn with_registry(mut self, registry: DetectorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_frames(mut self, frames: Vec<FrameSnapshot>) -> Self {
        self.frames = frames;
        self
    }

    /// Timestamp poses at the configured camera rate
    pub fn with_poses<'a>(mut self, poses: impl IntoIterator<Item = &'a Pose>) -> GesturaResult<Self> {
        let mut stream = PoseStream::new(self.config.history.fps);
        self.frames = stream.frames(poses)?;
        Ok(self)
    }

    pub fn with_pointer(mut self, pointer: PointerScript) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_actuator(mut self, actuator: RecordingActuator) -> Self {
        self.actuator = actuator;
        self
    }

    /// Movement keys of the configured bindings
    pub fn movement_keys(&self) -> [Key; 4] {
        let keys = &self.config.control.keys;
        [keys.forward, keys.backward, keys.left, keys.right]
    }

    pub fn start(self) -> GesturaResult<ScriptedSession> {
        let engine = ReplayEngine::new(self.frames);
        match self.registry {
            Some(registry) => {
                Session::with_registry(self.config, registry, engine, self.pointer, self.actuator)
            }
            None => Session::new(self.config, engine, self.pointer, self.actuator),
        }
    }

    /// Run to end of stream; the session is returned still open so the
    /// caller can inspect held controls before shutting it down
    pub fn run(self) -> GesturaResult<(ScriptedSession, ScenarioResult)> {
        let mut session = self.start()?;
        let result = drain(&mut session)?;
        Ok((session, result))
    }
}

/// Step a session until its engine runs dry
pub fn drain(session: &mut ScriptedSession) -> GesturaResult<ScenarioResult> {
    let mut result = ScenarioResult::default();
    loop {
        match session.step()? {
            StepOutcome::Processed(report) => result.reports.push(report),
            StepOutcome::Rejected(_) => result.rejected_frames += 1,
            StepOutcome::EndOfStream | StepOutcome::Closed => break,
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_script_repeats_last() {
        let mut script = PointerScript::new([false, true]);
        assert!(!script.pointer_free());
        assert!(script.pointer_free());
        assert!(script.pointer_free());
    }

    #[test]
    fn test_standing_still_does_nothing() {
        let poses = vec![Pose::standing(); 40];
        let (mut session, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();
        assert_eq!(result.reports.len(), 40);
        assert_eq!(result.transitions(), 0);
        assert!(session.actuator().calls().is_empty());
        session.shutdown().unwrap();
    }
}
