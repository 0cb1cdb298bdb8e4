//! Chaos runs for the gesture pipeline
//!
//! Drives a full session with a randomized but seeded pose stream:
//! - Landmark jitter
//! - Whole-group dropouts
//! - Duplicate timestamps
//! - Pointer toggles
//! - Actuator failures
//!
//! and checks the actuation invariants after every frame.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gestura_control::ControlMode;
use gestura_core::{BodyLandmark, FrameSnapshot, FrameTime, GesturaResult, HandSide, LandmarkGroup, Point3};
use gestura_runtime::{GesturaConfig, StepOutcome};

use crate::{face, hand_with_tip_area, open_palm, FailurePlan, PointerScript, Pose, RecordingActuator, Scenario};

/// Chaos configuration
#[derive(Clone, Debug)]
pub struct ChaosConfig {
    pub seed: u64,
    pub frames: usize,
    /// Per-frame, per-group probability that a group goes missing
    pub dropout_rate: f64,
    /// Maximum landmark displacement per frame (normalized units)
    pub jitter: f32,
    /// Probability that a frame repeats the previous timestamp
    pub duplicate_rate: f64,
    /// Probability that the pointer state flips on a frame
    pub pointer_toggle_rate: f64,
    /// Probability that any actuator call fails
    pub failure_rate: f64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        ChaosConfig {
            seed: 0x6e57_u64,
            frames: 600,
            dropout_rate: 0.02,
            jitter: 0.003,
            duplicate_rate: 0.01,
            pointer_toggle_rate: 0.01,
            failure_rate: 0.0,
        }
    }
}

impl ChaosConfig {
    /// Clean tracking, no failures
    pub fn calm() -> Self {
        ChaosConfig {
            dropout_rate: 0.0,
            jitter: 0.001,
            duplicate_rate: 0.0,
            pointer_toggle_rate: 0.0,
            ..Default::default()
        }
    }

    /// Frequent dropouts, jitter and actuator failures
    pub fn hostile() -> Self {
        ChaosConfig {
            dropout_rate: 0.15,
            jitter: 0.01,
            duplicate_rate: 0.05,
            pointer_toggle_rate: 0.03,
            failure_rate: 0.05,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }
}

/// Outcome of a chaos run
#[derive(Debug, Clone, Default)]
pub struct ChaosResult {
    pub processed: usize,
    pub rejected: usize,
    pub transitions: usize,
    pub actuation_failures: usize,
    pub actuator_calls: usize,
    /// Controls still held by the OS after shutdown
    pub held_after_shutdown: usize,
    pub violations: Vec<String>,
}

impl ChaosResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Motion the synthetic subject is performing
#[derive(Debug, Clone, Copy)]
enum Activity {
    Idle,
    Stepping { amplitude: f32 },
    Leaning { dx: f32 },
    Punching,
    Swinging,
    OpeningHand,
    Sweeping,
    Scrolling { tilt: f32 },
}

/// Seeded chaos runner
pub struct ChaosRunner {
    config: ChaosConfig,
    rng: StdRng,
}

impl ChaosRunner {
    pub fn new(config: ChaosConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn run(&mut self) -> GesturaResult<ChaosResult> {
        let frames = self.generate_frames()?;
        let pointer = self.generate_pointer(frames.len());
        let actuator = RecordingActuator::new().with_failures(FailurePlan::Random {
            rate: self.config.failure_rate,
            seed: self.config.seed ^ 0xfa11,
        });

        let scenario = Scenario::with_config(GesturaConfig::default())
            .with_frames(frames)
            .with_pointer(PointerScript::new(pointer));
        let movement = scenario.movement_keys();
        let actuator = actuator.with_exclusive_keys(movement);
        let mut session = scenario.with_actuator(actuator).start()?;

        let mut result = ChaosResult::default();
        loop {
            match session.step()? {
                StepOutcome::Processed(report) => {
                    result.processed += 1;
                    if report.outcome.transition.is_some() {
                        result.transitions += 1;
                    }
                    if report.outcome.failure.is_some() {
                        result.actuation_failures += 1;
                    }
                }
                StepOutcome::Rejected(_) => result.rejected += 1,
                StepOutcome::EndOfStream | StepOutcome::Closed => break,
            }

            let status = session.status();
            let frame = result.processed + result.rejected;
            let held_movement = status
                .pressed_keys
                .iter()
                .filter(|k| movement.contains(*k))
                .count();
            if held_movement > 1 {
                result
                    .violations
                    .push(format!("frame {}: {} movement keys held", frame, held_movement));
            }
            if status.mode == ControlMode::Menu
                && (status.movement.is_some() || !status.pressed_buttons.is_empty())
            {
                result
                    .violations
                    .push(format!("frame {}: gameplay action held in menu", frame));
            }
            let actuator = session.actuator();
            if let Some(key) = status
                .pressed_keys
                .iter()
                .find(|k| !actuator.held_keys().contains(*k))
            {
                result
                    .violations
                    .push(format!("frame {}: {} tracked as held but never pressed", frame, key));
            }
        }

        session.shutdown()?;
        let actuator = session.actuator();
        result.actuator_calls = actuator.calls().len();
        result.held_after_shutdown = actuator.held_keys().len() + actuator.held_buttons().len();
        // A rejected release leaves the OS holding a control the session
        // has already forgotten, so these checks only apply without failures
        if self.config.failure_rate == 0.0 {
            result
                .violations
                .extend(actuator.violations().iter().cloned());
            if result.held_after_shutdown > 0 {
                result
                    .violations
                    .push(format!("{} controls held after shutdown", result.held_after_shutdown));
            }
        }

        tracing::info!(
            "Chaos run seed={:#x}: {} frames, {} rejected, {} transitions, {} failures",
            self.config.seed,
            result.processed,
            result.rejected,
            result.transitions,
            result.actuation_failures
        );
        Ok(result)
    }

    fn generate_pointer(&mut self, frames: usize) -> Vec<bool> {
        let mut free = false;
        (0..frames)
            .map(|_| {
                if self.rng.gen_bool(self.config.pointer_toggle_rate.clamp(0.0, 1.0)) {
                    free = !free;
                }
                free
            })
            .collect()
    }

    fn generate_frames(&mut self) -> GesturaResult<Vec<FrameSnapshot>> {
        let fps = 30.0;
        let mut frames = Vec::with_capacity(self.config.frames);
        let mut activity = Activity::Idle;
        let mut remaining = 0usize;
        let mut index = 0u64;

        for i in 0..self.config.frames {
            if remaining == 0 {
                activity = self.pick_activity();
                remaining = self.rng.gen_range(10..60);
            }
            remaining -= 1;

            let pose = self.jitter(Self::pose_for(activity, i));
            let pose = self.drop_groups(pose);

            let duplicate = index > 0 && self.rng.gen_bool(self.config.duplicate_rate.clamp(0.0, 1.0));
            let captured_at = if duplicate {
                FrameTime::from_frame_index(index - 1, fps)
            } else {
                index += 1;
                FrameTime::from_frame_index(index - 1, fps)
            };
            frames.push(pose.snapshot(captured_at)?);
        }
        Ok(frames)
    }

    fn pick_activity(&mut self) -> Activity {
        match self.rng.gen_range(0..8) {
            0 => Activity::Idle,
            1 => Activity::Stepping {
                amplitude: self.rng.gen_range(0.01..0.06),
            },
            2 => Activity::Leaning {
                dx: self.rng.gen_range(-0.03..0.03),
            },
            3 => Activity::Punching,
            4 => Activity::Swinging,
            5 => Activity::OpeningHand,
            6 => Activity::Sweeping,
            _ => Activity::Scrolling {
                tilt: self.rng.gen_range(-0.06..0.06),
            },
        }
    }

    fn pose_for(activity: Activity, i: usize) -> Pose {
        let t = i as f32;
        let pose = Pose::standing();
        match activity {
            Activity::Idle => pose,
            Activity::Stepping { amplitude } => {
                let phase = (t * std::f32::consts::TAU / 10.0).sin() * amplitude;
                pose.with_body_point(BodyLandmark::LeftAnkle, Point3::new(0.56, 0.97 - phase, 0.0))
                    .with_body_point(BodyLandmark::RightAnkle, Point3::new(0.44, 0.97 + phase, 0.0))
            }
            Activity::Leaning { dx } => {
                let lean = Point3::new(dx, 0.0, 0.0);
                [
                    BodyLandmark::Nose,
                    BodyLandmark::LeftShoulder,
                    BodyLandmark::RightShoulder,
                ]
                .into_iter()
                .fold(pose, |pose, landmark| pose.shift_body_point(landmark, lean))
            }
            Activity::Punching => {
                let x = 0.30 + 0.02 * (i % 12) as f32;
                pose.with_body_point(BodyLandmark::RightWrist, Point3::new(x, 0.40, 0.0))
            }
            Activity::Swinging => {
                let y = if (i / 2) % 2 == 0 { 0.30 } else { 0.42 };
                pose.with_body_point(BodyLandmark::RightWrist, Point3::new(0.36, y, 0.0))
                    .with_hand(
                        HandSide::Right,
                        hand_with_tip_area(Point3::new(0.36, y - 0.05, 0.0), 0.0008),
                    )
            }
            Activity::OpeningHand => {
                let area = if i % 20 < 10 { 0.0008 } else { 0.0028 };
                pose.with_hand(HandSide::Right, hand_with_tip_area(Point3::new(0.40, 0.40, 0.0), area))
            }
            Activity::Sweeping => {
                let x = 0.66 - 0.01 * (i % 16) as f32;
                pose.with_body_point(BodyLandmark::LeftWrist, Point3::new(x, 0.45, 0.0))
            }
            Activity::Scrolling { tilt } => pose
                .with_body_point(BodyLandmark::LeftElbow, Point3::new(0.66, 0.50, 0.0))
                .with_body_point(BodyLandmark::LeftWrist, Point3::new(0.66, 0.38, 0.0))
                .with_hand(HandSide::Left, open_palm(Point3::new(0.66, 0.30, 0.0), tilt))
                .with_face(face(0.0, 0.0)),
        }
    }

    fn jitter(&mut self, mut pose: Pose) -> Pose {
        let amount = self.config.jitter;
        if amount <= 0.0 {
            return pose;
        }
        for landmark in BodyLandmark::all() {
            let delta = Point3::new(
                self.rng.gen_range(-amount..=amount),
                self.rng.gen_range(-amount..=amount),
                0.0,
            );
            pose = pose.shift_body_point(*landmark, delta);
        }
        pose
    }

    fn drop_groups(&mut self, mut pose: Pose) -> Pose {
        let rate = self.config.dropout_rate.clamp(0.0, 1.0);
        for group in LandmarkGroup::all() {
            if self.rng.gen_bool(rate) {
                pose = pose.without(*group);
            }
        }
        pose
    }
}
