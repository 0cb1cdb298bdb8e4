//! Mining - repetitive swings with a closed hand

use std::time::Duration;

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, HandSide, LandmarkId};
use gestura_history::LandmarkHistory;

use crate::hand::fingertip_area;
use crate::{Agreement, Detection, Detector, DetectorKind, GracePeriod, HoldPhase, ScaleConfig};

const RIGHT_WRIST: LandmarkId = LandmarkId::body(BodyLandmark::RightWrist);
const RIGHT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::RightShoulder);

/// Mining configuration
///
/// Speeds are shoulder widths per second, areas are shoulder widths squared,
/// heights are shoulder widths (positive above the shoulder).
#[derive(Clone, Debug)]
pub struct MiningConfig {
    pub velocity_window: usize,
    /// Vertical speed that counts as a swing while idle
    pub swing_enter: f32,
    /// Vertical speed that counts as a swing while holding
    pub swing_exit: f32,
    /// Swing frames required among the last `swing_window` frames
    pub swings_required: usize,
    pub swing_window: usize,
    /// Fingertip area at or below which the hand is closed
    pub closed_area_max: f32,
    /// Fingertip area at or above which the hand is open
    pub open_area_min: f32,
    /// Lowest wrist position, relative to the shoulder, that may start a hold;
    /// zero is the shoulder line
    pub min_wrist_height: f32,
    /// Pause between swings tolerated during a hold
    pub grace: Duration,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            velocity_window: 3,
            swing_enter: 1.2,
            swing_exit: 0.6,
            swings_required: 2,
            swing_window: 6,
            closed_area_max: 0.03,
            open_area_min: 0.05,
            min_wrist_height: 0.0,
            grace: Duration::from_millis(600),
        }
    }
}

impl MiningConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.velocity_window < 2 {
            return Err(GesturaError::InvalidConfig(
                "mining velocity window must span at least 2 frames".into(),
            ));
        }
        if self.swing_exit > self.swing_enter {
            return Err(GesturaError::InvalidConfig(format!(
                "mining swing exit {} exceeds enter {}",
                self.swing_exit, self.swing_enter
            )));
        }
        if self.swings_required == 0 || self.swings_required > self.swing_window {
            return Err(GesturaError::InvalidConfig(format!(
                "mining needs 1..={} swing frames, got {}",
                self.swing_window, self.swings_required
            )));
        }
        if self.closed_area_max >= self.open_area_min {
            return Err(GesturaError::InvalidConfig(
                "mining closed-hand area must be below open-hand area".into(),
            ));
        }
        Ok(())
    }
}

struct MiningSignals {
    speed_y: f32,
    area: f32,
    wrist_height: f32,
}

/// Held left button while the right arm keeps swinging with a closed hand
pub struct MiningDetector {
    config: MiningConfig,
    scale: ScaleConfig,
    holding: bool,
    swings: Agreement,
    grace: GracePeriod,
}

impl MiningDetector {
    pub fn new(config: MiningConfig, scale: ScaleConfig) -> Self {
        let swings = Agreement::new(config.swings_required, config.swing_window);
        let grace = GracePeriod::new(config.grace);
        Self {
            config,
            scale,
            holding: false,
            swings,
            grace,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    fn signals(&self, history: &LandmarkHistory) -> Option<MiningSignals> {
        let shoulder_width = self.scale.shoulder_width(history)?;
        let velocity = history.velocity(RIGHT_WRIST, self.config.velocity_window)?;
        let wrist = history.position(RIGHT_WRIST, 0)?;
        let shoulder = history.position(RIGHT_SHOULDER, 0)?;
        let area = fingertip_area(history, HandSide::Right)?;
        Some(MiningSignals {
            speed_y: velocity.y.abs() / shoulder_width,
            area: area / (shoulder_width * shoulder_width),
            wrist_height: (shoulder.y - wrist.y) / shoulder_width,
        })
    }

    fn stop(&mut self, reason: &str) -> Option<Detection> {
        tracing::debug!("Mining stop: {}", reason);
        self.holding = false;
        self.swings.clear();
        self.grace.reset();
        Some(Detection::Mining {
            phase: HoldPhase::Stop,
        })
    }
}

impl Detector for MiningDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Mining
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let (Some(signals), Some(now)) = (self.signals(history), history.now()) else {
            if self.holding {
                return self.stop("tracking lost");
            }
            self.swings.clear();
            return None;
        };

        let threshold = if self.holding {
            self.config.swing_exit
        } else {
            self.config.swing_enter
        };
        let swinging = signals.speed_y >= threshold;
        self.swings.push(swinging);

        if self.holding {
            if signals.area >= self.config.open_area_min {
                return self.stop("hand opened");
            }
            if swinging {
                self.grace.mark(now);
            }
            if self.grace.expired(now) {
                return self.stop("swings ended");
            }
            return Some(Detection::Mining {
                phase: HoldPhase::Continue,
            });
        }

        let closed = signals.area <= self.config.closed_area_max;
        let raised = signals.wrist_height >= self.config.min_wrist_height;
        if self.swings.is_satisfied() && closed && raised {
            tracing::debug!(
                "Mining start at {:?}: vy={:.2} area={:.3}",
                now,
                signals.speed_y,
                signals.area
            );
            self.holding = true;
            self.grace.mark(now);
            return Some(Detection::Mining {
                phase: HoldPhase::Start,
            });
        }
        None
    }

    fn reset(&mut self) {
        self.holding = false;
        self.swings.clear();
        self.grace.reset();
    }
}
