//! Shield - horizontal left forearm held in front of the chest

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, LandmarkId};
use gestura_history::LandmarkHistory;

use crate::{Detection, Detector, DetectorKind, Hysteresis, HoldPhase, ScaleConfig, ShieldMetrics};

const LEFT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::LeftShoulder);
const LEFT_ELBOW: LandmarkId = LandmarkId::body(BodyLandmark::LeftElbow);
const LEFT_WRIST: LandmarkId = LandmarkId::body(BodyLandmark::LeftWrist);

/// Shield configuration
///
/// Angles in degrees from horizontal; distances in shoulder widths.
#[derive(Clone, Debug)]
pub struct ShieldConfig {
    pub enter_angle: f32,
    pub exit_angle: f32,
    /// Wrist depth ahead of the shoulder required to start
    pub enter_forward: f32,
    pub exit_forward: f32,
    /// Largest vertical wrist-to-shoulder distance to start
    pub enter_height: f32,
    pub exit_height: f32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        ShieldConfig {
            enter_angle: 35.0,
            exit_angle: 45.0,
            enter_forward: 0.4,
            exit_forward: 0.3,
            enter_height: 0.6,
            exit_height: 0.75,
        }
    }
}

impl ShieldConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.exit_angle < self.enter_angle
            || self.exit_forward > self.enter_forward
            || self.exit_height < self.enter_height
        {
            return Err(GesturaError::InvalidConfig(
                "shield exit thresholds must be looser than enter thresholds".into(),
            ));
        }
        Ok(())
    }
}

/// Held right button while all three forearm conditions hold
pub struct ShieldDetector {
    scale: ScaleConfig,
    angle: Hysteresis,
    forward: Hysteresis,
    height: Hysteresis,
    blocking: bool,
}

impl ShieldDetector {
    pub fn new(config: ShieldConfig, scale: ScaleConfig) -> Self {
        Self {
            scale,
            angle: Hysteresis::below(config.enter_angle, config.exit_angle),
            forward: Hysteresis::above(config.enter_forward, config.exit_forward),
            height: Hysteresis::below(config.enter_height, config.exit_height),
            blocking: false,
        }
    }

    fn metrics(&self, history: &LandmarkHistory) -> Option<ShieldMetrics> {
        let shoulder_width = self.scale.shoulder_width(history)?;
        let forearm = history.relative_position(LEFT_WRIST, LEFT_ELBOW)?;
        let reach = history.relative_position(LEFT_SHOULDER, LEFT_WRIST)?;

        // 0 = horizontal, 90 = vertical, either pointing direction
        let angle_deg = forearm.y.abs().atan2(forearm.x.abs()).to_degrees();
        Some(ShieldMetrics {
            angle_deg,
            forward: reach.z / shoulder_width,
            height: reach.y.abs() / shoulder_width,
        })
    }

    fn set_blocking(&mut self, blocking: bool) {
        self.blocking = blocking;
        if !blocking {
            self.angle.reset();
            self.forward.reset();
            self.height.reset();
        }
    }
}

impl Detector for ShieldDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Shield
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let Some(metrics) = self.metrics(history) else {
            if self.blocking {
                tracing::debug!("Shield stop: tracking lost");
                self.set_blocking(false);
                return Some(Detection::Shield {
                    phase: HoldPhase::Stop,
                    metrics: None,
                });
            }
            return None;
        };

        // Every latch shares the blocking state, so evaluate against it
        // rather than letting each flip on its own
        let in_pose = self.angle.would_hold(metrics.angle_deg)
            && self.forward.would_hold(metrics.forward)
            && self.height.would_hold(metrics.height);

        let phase = match (self.blocking, in_pose) {
            (false, true) => HoldPhase::Start,
            (true, true) => HoldPhase::Continue,
            (true, false) => HoldPhase::Stop,
            (false, false) => return None,
        };
        if in_pose {
            self.angle.update(metrics.angle_deg);
            self.forward.update(metrics.forward);
            self.height.update(metrics.height);
        }
        if phase != HoldPhase::Continue {
            tracing::debug!(
                "Shield {:?}: angle={:.1} forward={:.2} height={:.2}",
                phase,
                metrics.angle_deg,
                metrics.forward,
                metrics.height
            );
        }
        self.set_blocking(in_pose);
        Some(Detection::Shield {
            phase,
            metrics: Some(metrics),
        })
    }

    fn reset(&mut self) {
        self.set_blocking(false);
    }
}
