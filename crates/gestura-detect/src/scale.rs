//! Per-frame body-scale references
//!
//! Thresholds are expressed as multiples of a body dimension measured in
//! the current frame, so detection does not depend on how far the subject
//! stands from the camera. A reference below its minimum is degenerate and
//! reported as missing.

use gestura_core::{BodyLandmark, FaceLandmark, GesturaError, GesturaResult, LandmarkId};
use gestura_history::LandmarkHistory;

const NOSE: LandmarkId = LandmarkId::body(BodyLandmark::Nose);
const LEFT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::LeftShoulder);
const RIGHT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::RightShoulder);
const LEFT_HIP: LandmarkId = LandmarkId::body(BodyLandmark::LeftHip);
const RIGHT_HIP: LandmarkId = LandmarkId::body(BodyLandmark::RightHip);

/// Minimum usable body-scale references (normalized units)
#[derive(Clone, Debug)]
pub struct ScaleConfig {
    pub min_shoulder_width: f32,
    pub min_torso_height: f32,
    pub min_eye_width: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            min_shoulder_width: 0.02,
            min_torso_height: 0.1,
            min_eye_width: 0.005,
        }
    }
}

impl ScaleConfig {
    /// Shoulder-to-shoulder distance in the image plane
    pub fn shoulder_width(&self, history: &LandmarkHistory) -> Option<f32> {
        let left = history.position(LEFT_SHOULDER, 0)?;
        let right = history.position(RIGHT_SHOULDER, 0)?;
        let width = left.distance_xy(&right);
        (width >= self.min_shoulder_width).then_some(width)
    }

    /// Nose to mid-hip distance in the image plane
    pub fn torso_height(&self, history: &LandmarkHistory) -> Option<f32> {
        let nose = history.position(NOSE, 0)?;
        let left_hip = history.position(LEFT_HIP, 0)?;
        let right_hip = history.position(RIGHT_HIP, 0)?;
        let height = nose.distance_xy(&left_hip.midpoint(&right_hip));
        (height >= self.min_torso_height).then_some(height)
    }

    /// Distance between the outer eye corners in the image plane
    pub fn eye_width(&self, history: &LandmarkHistory) -> Option<f32> {
        let left = history.position(LandmarkId::face(FaceLandmark::LEFT_EYE_OUTER)?, 0)?;
        let right = history.position(LandmarkId::face(FaceLandmark::RIGHT_EYE_OUTER)?, 0)?;
        let width = left.distance_xy(&right);
        (width >= self.min_eye_width).then_some(width)
    }

    pub fn validate(&self) -> GesturaResult<()> {
        let minimums = [
            ("min_shoulder_width", self.min_shoulder_width),
            ("min_torso_height", self.min_torso_height),
            ("min_eye_width", self.min_eye_width),
        ];
        for (name, value) in minimums {
            if !(value.is_finite() && value > 0.0) {
                return Err(GesturaError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
