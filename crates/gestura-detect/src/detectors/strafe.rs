//! Strafe - sideways torso lean

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, LandmarkId};
use gestura_history::LandmarkHistory;

use crate::{Debounce, Detection, Detector, DetectorKind, LeanDirection, ScaleConfig};

const TORSO: [BodyLandmark; 4] = [
    BodyLandmark::LeftShoulder,
    BodyLandmark::RightShoulder,
    BodyLandmark::LeftHip,
    BodyLandmark::RightHip,
];

/// Strafe configuration (displacements in torso heights)
#[derive(Clone, Debug)]
pub struct StrafeConfig {
    /// Displacements smaller than this are ignored entirely
    pub deadzone: f32,
    pub left_enter: f32,
    pub left_exit: f32,
    pub right_enter: f32,
    pub right_exit: f32,
    /// Identical per-frame decisions needed before a lean is reported
    pub confirm_frames: usize,
    pub min_visibility: f32,
}

impl Default for StrafeConfig {
    fn default() -> Self {
        StrafeConfig {
            deadzone: 0.010,
            left_enter: 0.025,
            left_exit: 0.012,
            right_enter: 0.025,
            right_exit: 0.012,
            confirm_frames: 3,
            min_visibility: 0.7,
        }
    }
}

impl StrafeConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.left_exit > self.left_enter || self.right_exit > self.right_enter {
            return Err(GesturaError::InvalidConfig(
                "strafe exit thresholds must not exceed enter thresholds".into(),
            ));
        }
        if self.confirm_frames == 0 {
            return Err(GesturaError::InvalidConfig(
                "strafe needs at least one confirming frame".into(),
            ));
        }
        Ok(())
    }

    fn thresholds(&self, direction: LeanDirection) -> (f32, f32) {
        match direction {
            LeanDirection::Left => (self.left_enter, self.left_exit),
            LeanDirection::Right => (self.right_enter, self.right_exit),
        }
    }
}

/// Left / right lean of the shoulders over the hips
pub struct StrafeDetector {
    config: StrafeConfig,
    scale: ScaleConfig,
    confirm: Debounce<Option<LeanDirection>>,
    asserted: Option<LeanDirection>,
}

impl StrafeDetector {
    pub fn new(config: StrafeConfig, scale: ScaleConfig) -> Self {
        let confirm = Debounce::new(config.confirm_frames);
        Self {
            config,
            scale,
            confirm,
            asserted: None,
        }
    }

    /// Shoulder midpoint minus hip midpoint, horizontally, in torso heights
    ///
    /// Positive when the shoulders sit toward the subject's left.
    fn displacement(&self, history: &LandmarkHistory) -> Option<f32> {
        let mut points = [gestura_core::Point3::zero(); 4];
        for (slot, landmark) in points.iter_mut().zip(TORSO) {
            let lm = history.landmark(LandmarkId::body(landmark), 0)?;
            if lm.visibility_or_full() < self.config.min_visibility {
                return None;
            }
            *slot = lm.position;
        }
        let torso = self.scale.torso_height(history)?;
        let shoulder_mid = points[0].midpoint(&points[1]);
        let hip_mid = points[2].midpoint(&points[3]);
        Some((shoulder_mid.x - hip_mid.x) / torso)
    }

    /// Per-frame decision with hysteresis against the asserted lean
    fn decide(&self, displacement: f32) -> Option<LeanDirection> {
        let magnitude = displacement.abs();
        if magnitude < self.config.deadzone {
            return None;
        }
        let direction = if displacement > 0.0 {
            LeanDirection::Left
        } else {
            LeanDirection::Right
        };
        let (enter, exit) = self.config.thresholds(direction);
        let threshold = if self.asserted == Some(direction) { exit } else { enter };
        (magnitude >= threshold).then_some(direction)
    }
}

impl Detector for StrafeDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Strafe
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let Some(displacement) = self.displacement(history) else {
            self.reset();
            return None;
        };

        let decision = self.decide(displacement);
        if let Some(confirmed) = self.confirm.update(decision) {
            if confirmed != self.asserted {
                tracing::debug!("Strafe {:?} -> {:?} ({:.3})", self.asserted, confirmed, displacement);
            }
            self.asserted = confirmed;
        }

        self.asserted.map(|direction| Detection::Strafe {
            direction,
            displacement,
        })
    }

    fn reset(&mut self) {
        self.confirm.reset();
        self.asserted = None;
    }
}
