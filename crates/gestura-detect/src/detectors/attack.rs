//! Attack - horizontal punch

use std::time::Duration;

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, LandmarkId};
use gestura_history::LandmarkHistory;

use crate::{Cooldown, Detection, Detector, DetectorKind, ScaleConfig};

const RIGHT_WRIST: LandmarkId = LandmarkId::body(BodyLandmark::RightWrist);

/// Attack configuration (velocities in shoulder widths per second)
#[derive(Clone, Debug)]
pub struct AttackConfig {
    /// Frames spanned by the velocity estimate
    pub velocity_window: usize,
    /// Horizontal speed required to trigger
    pub min_speed_x: f32,
    /// Vertical speed above which the motion is not a punch
    pub max_speed_y: f32,
    pub cooldown: Duration,
}

impl Default for AttackConfig {
    fn default() -> Self {
        AttackConfig {
            velocity_window: 6,
            min_speed_x: 1.8,
            max_speed_y: 0.8,
            cooldown: Duration::from_millis(300),
        }
    }
}

impl AttackConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.velocity_window < 2 {
            return Err(GesturaError::InvalidConfig(
                "attack velocity window must span at least 2 frames".into(),
            ));
        }
        if self.min_speed_x <= 0.0 || self.max_speed_y <= 0.0 {
            return Err(GesturaError::InvalidConfig(
                "attack speed thresholds must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Fast, mostly horizontal right-wrist motion; one tap per cooldown
pub struct AttackDetector {
    config: AttackConfig,
    scale: ScaleConfig,
    cooldown: Cooldown,
}

impl AttackDetector {
    pub fn new(config: AttackConfig, scale: ScaleConfig) -> Self {
        let cooldown = Cooldown::new(config.cooldown);
        Self {
            config,
            scale,
            cooldown,
        }
    }
}

impl Detector for AttackDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Attack
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let velocity = history.velocity(RIGHT_WRIST, self.config.velocity_window)?;
        let shoulder_width = self.scale.shoulder_width(history)?;
        let now = history.now()?;

        let speed_x = velocity.x.abs() / shoulder_width;
        let speed_y = velocity.y.abs() / shoulder_width;
        if speed_x <= self.config.min_speed_x || speed_y >= self.config.max_speed_y {
            return None;
        }
        if !self.cooldown.try_trigger(now) {
            return None;
        }

        tracing::debug!("Attack at {:?}: vx={:.2} vy={:.2}", now, speed_x, speed_y);
        Some(Detection::Attack { speed_x, speed_y })
    }

    fn reset(&mut self) {
        self.cooldown.reset();
    }
}
