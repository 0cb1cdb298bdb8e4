//! Gestura Session - frame loop implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gestura_control::{ActionCoordinator, Actuator, ControlMode, ControlStatus, FrameOutcome};
use gestura_core::{FrameTime, GesturaError, GesturaResult};
use gestura_detect::{DetectorKind, DetectorRegistry, FrameDetections};
use gestura_history::LandmarkHistory;

use crate::{GesturaConfig, PointerProbe, PoseEngine};

/// Cross-thread stop request for [`Session::run`]
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Operator command applied between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Release everything, clear history and detector state
    Reset,
    /// Store the current frame as the calibration baseline
    Calibrate,
    Enable(DetectorKind),
    Disable(DetectorKind),
    Shutdown,
}

/// What one processed frame produced
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub captured_at: FrameTime,
    pub detections: FrameDetections,
    pub outcome: FrameOutcome,
}

/// Result of [`Session::step`]
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Processed(FrameReport),
    /// Frame dropped for a timestamp not after the previous one
    Rejected(FrameTime),
    EndOfStream,
    /// Session already shut down
    Closed,
}

#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    pub frames: u64,
    pub frames_rejected: u64,
    pub detections: u64,
    pub mode_transitions: u64,
    pub actuation_failures: u64,
    pub last_step_duration: Duration,
}

/// A running gesture-control session
///
/// Owns every piece of per-session state. Dropping an open session shuts it
/// down, releasing any held key or button.
pub struct Session<E: PoseEngine, P: PointerProbe, A: Actuator> {
    history: LandmarkHistory,
    registry: DetectorRegistry,
    coordinator: ActionCoordinator<A>,
    engine: E,
    probe: P,
    stats: SessionStats,
    closed: bool,
}

impl<E: PoseEngine, P: PointerProbe, A: Actuator> Session<E, P, A> {
    /// Validate the configuration, build every built-in detector and start
    /// the engine
    pub fn new(config: GesturaConfig, engine: E, probe: P, actuator: A) -> GesturaResult<Self> {
        let registry = DetectorRegistry::from_config(&config.detectors);
        Self::with_registry(config, registry, engine, probe, actuator)
    }

    /// Like [`new`](Self::new) with a caller-assembled detector set
    pub fn with_registry(
        config: GesturaConfig,
        registry: DetectorRegistry,
        mut engine: E,
        probe: P,
        actuator: A,
    ) -> GesturaResult<Self> {
        config.validate()?;
        engine.start()?;
        tracing::info!(
            "Session started: {} detectors, {} frame history",
            registry.len(),
            config.history.capacity
        );

        Ok(Session {
            history: LandmarkHistory::with_config(config.history),
            registry,
            coordinator: ActionCoordinator::new(config.control, actuator),
            engine,
            probe,
            stats: SessionStats::default(),
            closed: false,
        })
    }

    /// Process one frame
    ///
    /// Pose-engine failures are returned; actuation failures are absorbed by
    /// the coordinator and reported in the frame outcome.
    pub fn step(&mut self) -> GesturaResult<StepOutcome> {
        if self.closed {
            return Ok(StepOutcome::Closed);
        }
        let start = Instant::now();

        // Stage 1: Pull a snapshot
        let Some(snapshot) = self.engine.next_frame()? else {
            return Ok(StepOutcome::EndOfStream);
        };

        // Stage 2: Reject stale timestamps
        let captured_at = snapshot.captured_at();
        if let Some(now) = self.history.now() {
            if captured_at <= now {
                tracing::warn!(
                    "Dropping frame at {}us: not after previous frame at {}us",
                    captured_at.as_micros(),
                    now.as_micros()
                );
                self.stats.frames_rejected += 1;
                return Ok(StepOutcome::Rejected(captured_at));
            }
        }

        // Stage 3: Append
        self.history.append(snapshot);

        // Stage 4: Detect
        let detections = self.registry.detect_all(&self.history);

        // Stage 5-6: Arbitrate and actuate
        let pointer_free = self.probe.pointer_free();
        let outcome = self.coordinator.execute(&detections, pointer_free);

        // Stage 7: Detector state no longer matches the coordinator
        if outcome.requires_detector_reset() {
            self.registry.reset_all();
        }

        self.stats.frames += 1;
        self.stats.detections += detections.len() as u64;
        if outcome.transition.is_some() {
            self.stats.mode_transitions += 1;
        }
        if outcome.failure.is_some() {
            self.stats.actuation_failures += 1;
        }
        self.stats.last_step_duration = start.elapsed();

        Ok(StepOutcome::Processed(FrameReport {
            captured_at,
            detections,
            outcome,
        }))
    }

    /// Step until end of stream, a shutdown request or an engine failure
    ///
    /// The session is shut down on every exit path.
    pub fn run(&mut self, signal: &ShutdownSignal) -> GesturaResult<()> {
        while !signal.is_requested() {
            match self.step() {
                Ok(StepOutcome::EndOfStream) | Ok(StepOutcome::Closed) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::error!("Frame loop aborted: {}", err);
                    if let Err(shutdown_err) = self.shutdown() {
                        tracing::error!("Shutdown after abort failed: {}", shutdown_err);
                    }
                    return Err(err);
                }
            }
        }
        self.shutdown()
    }

    pub fn apply(&mut self, command: OperatorCommand) -> GesturaResult<()> {
        tracing::info!("Operator command: {:?}", command);
        match command {
            OperatorCommand::Reset => {
                let released = self.coordinator.reset();
                self.registry.reset_all();
                self.history.clear();
                released?;
            }
            OperatorCommand::Calibrate => match self.history.current().cloned() {
                Some(frame) => self.history.set_calibration_baseline(frame),
                None => tracing::warn!("Calibrate ignored: no frame yet"),
            },
            OperatorCommand::Enable(kind) => {
                if !self.registry.enable(kind) {
                    return Err(not_registered(kind));
                }
            }
            OperatorCommand::Disable(kind) => {
                if !self.registry.disable(kind) {
                    return Err(not_registered(kind));
                }
            }
            OperatorCommand::Shutdown => self.shutdown()?,
        }
        Ok(())
    }

    /// Release all held controls and stop the engine
    ///
    /// Idempotent. Both steps are attempted; the first failure is returned.
    pub fn shutdown(&mut self) -> GesturaResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let released = self.coordinator.reset();
        self.registry.reset_all();
        let stopped = self.engine.shutdown();
        tracing::info!("Session shut down after {} frames", self.stats.frames);

        released?;
        stopped
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn mode(&self) -> ControlMode {
        self.coordinator.mode()
    }

    pub fn status(&self) -> ControlStatus {
        self.coordinator.status()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn history(&self) -> &LandmarkHistory {
        &self.history
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn actuator(&self) -> &A {
        self.coordinator.actuator()
    }
}

impl<E: PoseEngine, P: PointerProbe, A: Actuator> Drop for Session<E, P, A> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::error!("Shutdown on drop failed: {}", err);
        }
    }
}

fn not_registered(kind: DetectorKind) -> GesturaError {
    GesturaError::InvalidConfig(format!("no {} detector registered", kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReplayEngine;
    use gestura_control::{ActuationError, ActuationResult, Button, Key};
    use gestura_core::{FrameSnapshot, Landmark, LandmarkGroup};
    use gestura_detect::{Detection, Detector};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Logs calls into a shared buffer so tests can inspect it after drop
    #[derive(Default)]
    struct LogActuator {
        log: Log,
        fail_press: bool,
    }

    impl LogActuator {
        fn push(&self, entry: String) -> ActuationResult<()> {
            self.log.borrow_mut().push(entry);
            Ok(())
        }
    }

    impl Actuator for LogActuator {
        fn press_key(&mut self, key: Key) -> ActuationResult<()> {
            if self.fail_press {
                return Err(ActuationError::Unavailable("no display".into()));
            }
            self.push(format!("press {}", key))
        }

        fn release_key(&mut self, key: Key) -> ActuationResult<()> {
            self.push(format!("release {}", key))
        }

        fn press_button(&mut self, button: Button) -> ActuationResult<()> {
            self.push(format!("press {}", button))
        }

        fn release_button(&mut self, button: Button) -> ActuationResult<()> {
            self.push(format!("release {}", button))
        }

        fn click(&mut self, button: Button, count: u32) -> ActuationResult<()> {
            self.push(format!("click {} x{}", button, count))
        }

        fn move_cursor_relative(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
            self.push(format!("move {} {}", dx, dy))
        }

        fn set_cursor_absolute(&mut self, x: i32, y: i32) -> ActuationResult<()> {
            self.push(format!("cursor {} {}", x, y))
        }

        fn scroll(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
            self.push(format!("scroll {} {}", dx, dy))
        }
    }

    /// Walks whenever the body is visible
    struct BodyWalk;

    impl Detector for BodyWalk {
        fn kind(&self) -> DetectorKind {
            DetectorKind::Walk
        }

        fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
            let frame = history.current()?;
            frame.has_group(LandmarkGroup::Body).then_some(Detection::Walk {
                walking: true,
                backward: false,
                score: 1.0,
            })
        }

        fn reset(&mut self) {}
    }

    fn body_frame(ms: i64) -> FrameSnapshot {
        let body = vec![Landmark::new(0.5, 0.5, 0.0).with_visibility(1.0); 33];
        FrameSnapshot::empty(FrameTime::from_millis(ms))
            .with_body(body)
            .unwrap()
    }

    fn empty_frame(ms: i64) -> FrameSnapshot {
        FrameSnapshot::empty(FrameTime::from_millis(ms))
    }

    fn session(
        frames: Vec<FrameSnapshot>,
        actuator: LogActuator,
    ) -> Session<ReplayEngine, fn() -> bool, LogActuator> {
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(BodyWalk));
        Session::with_registry(
            GesturaConfig::default(),
            registry,
            ReplayEngine::new(frames),
            (|| false) as fn() -> bool,
            actuator,
        )
        .unwrap()
    }

    #[test]
    fn test_step_runs_pipeline() {
        let log = Log::default();
        let mut session = session(
            vec![body_frame(0), body_frame(33), empty_frame(66)],
            LogActuator {
                log: log.clone(),
                ..Default::default()
            },
        );

        let StepOutcome::Processed(report) = session.step().unwrap() else {
            panic!("expected a processed frame");
        };
        assert!(report.detections.contains(DetectorKind::Walk));
        assert_eq!(session.status().movement, Some(Key::Char('w')));

        session.step().unwrap();
        session.step().unwrap();
        assert_eq!(session.step().unwrap(), StepOutcome::EndOfStream);
        assert_eq!(*log.borrow(), vec!["press w", "release w"]);
        assert_eq!(session.stats().frames, 3);
        assert_eq!(session.stats().detections, 2);
    }

    #[test]
    fn test_stale_frame_rejected() {
        let mut session = session(vec![body_frame(33), body_frame(33), body_frame(10)], LogActuator::default());
        session.step().unwrap();
        assert_eq!(
            session.step().unwrap(),
            StepOutcome::Rejected(FrameTime::from_millis(33))
        );
        assert!(matches!(session.step().unwrap(), StepOutcome::Rejected(_)));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.stats().frames_rejected, 2);
    }

    #[test]
    fn test_drop_releases_held_keys() {
        let log = Log::default();
        {
            let mut session = session(
                vec![body_frame(0)],
                LogActuator {
                    log: log.clone(),
                    ..Default::default()
                },
            );
            session.step().unwrap();
        }
        assert_eq!(*log.borrow(), vec!["press w", "release w"]);
    }

    #[test]
    fn test_run_stops_on_signal_and_releases() {
        let log = Log::default();
        let frames = (0..10).map(|i| body_frame(i * 33)).collect();
        let mut session = session(
            frames,
            LogActuator {
                log: log.clone(),
                ..Default::default()
            },
        );
        session.step().unwrap();

        let signal = ShutdownSignal::new();
        signal.clone().request();
        session.run(&signal).unwrap();
        assert!(session.is_closed());
        assert_eq!(session.stats().frames, 1);
        assert_eq!(*log.borrow(), vec!["press w", "release w"]);
        assert_eq!(session.step().unwrap(), StepOutcome::Closed);
        assert!(!session.engine().is_started());
    }

    #[test]
    fn test_run_to_end_of_stream() {
        let frames = (0..5).map(|i| body_frame(i * 33)).collect();
        let mut session = session(frames, LogActuator::default());
        session.run(&ShutdownSignal::new()).unwrap();
        assert_eq!(session.stats().frames, 5);
        assert!(session.status().pressed_keys.is_empty());
    }

    #[test]
    fn test_actuation_failure_absorbed() {
        let mut session = session(
            vec![body_frame(0), body_frame(33)],
            LogActuator {
                fail_press: true,
                ..Default::default()
            },
        );
        let StepOutcome::Processed(report) = session.step().unwrap() else {
            panic!("expected a processed frame");
        };
        assert!(report.outcome.failure.is_some());
        assert_eq!(session.stats().actuation_failures, 1);
        assert!(session.step().is_ok());
    }

    #[test]
    fn test_operator_commands() {
        let log = Log::default();
        let mut session = session(
            vec![body_frame(0), body_frame(33)],
            LogActuator {
                log: log.clone(),
                ..Default::default()
            },
        );

        session.apply(OperatorCommand::Calibrate).unwrap();
        assert!(session.history().calibration_baseline().is_none());

        session.step().unwrap();
        session.apply(OperatorCommand::Calibrate).unwrap();
        assert!(session.history().calibration_baseline().is_some());

        session.apply(OperatorCommand::Reset).unwrap();
        assert!(session.history().is_empty());
        assert!(session.status().pressed_keys.is_empty());

        session.apply(OperatorCommand::Disable(DetectorKind::Walk)).unwrap();
        assert!(!session.registry().is_enabled(DetectorKind::Walk));
        session.step().unwrap();
        assert_eq!(*log.borrow(), vec!["press w", "release w"]);

        assert!(session.apply(OperatorCommand::Enable(DetectorKind::Look)).is_err());

        session.apply(OperatorCommand::Shutdown).unwrap();
        session.apply(OperatorCommand::Shutdown).unwrap();
        assert!(session.is_closed());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GesturaConfig::default();
        config.history.capacity = 1;
        let result = Session::new(config, ReplayEngine::default(), || false, LogActuator::default());
        assert!(matches!(result, Err(GesturaError::InvalidConfig(_))));
    }
}
