//! Scroll - rotating the open left hand with the forearm upright

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, HandLandmark, HandSide, LandmarkId};
use gestura_history::LandmarkHistory;

use crate::hand::is_open_upright;
use crate::{Detection, Detector, DetectorKind, MovingAverage, ScaleConfig, ScrollDirection};

const INDEX_MCP: LandmarkId = LandmarkId::hand(HandSide::Left, HandLandmark::IndexMcp);
const PINKY_MCP: LandmarkId = LandmarkId::hand(HandSide::Left, HandLandmark::PinkyMcp);
const LEFT_WRIST: LandmarkId = LandmarkId::body(BodyLandmark::LeftWrist);
const LEFT_ELBOW: LandmarkId = LandmarkId::body(BodyLandmark::LeftElbow);

/// Scroll configuration (ratios in eye widths)
#[derive(Clone, Debug)]
pub struct ScrollConfig {
    /// Frames that must all agree on a direction
    pub window: usize,
    /// Knuckle-line tilt beyond which a frame votes for scrolling
    pub threshold: f32,
    /// Fraction of `threshold` around zero where the mean tilt never scrolls
    pub inner_dead_zone: f32,
    /// Largest horizontal wrist-to-elbow offset for an upright forearm
    pub vertical_arm_max: f32,
    /// Fingertip spread, relative to palm length, for an open hand
    pub min_palm_spread: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            window: 5,
            threshold: 0.2,
            inner_dead_zone: 0.1,
            vertical_arm_max: 2.0,
            min_palm_spread: 0.005,
        }
    }
}

impl ScrollConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.window == 0 {
            return Err(GesturaError::InvalidConfig(
                "scroll window must be non-empty".into(),
            ));
        }
        if self.threshold <= 0.0 || !(0.0..1.0).contains(&self.inner_dead_zone) {
            return Err(GesturaError::InvalidConfig(format!(
                "scroll threshold {} / dead zone {} out of range",
                self.threshold, self.inner_dead_zone
            )));
        }
        Ok(())
    }
}

/// Continuous scroll direction while the open left hand stays tilted
pub struct ScrollDetector {
    config: ScrollConfig,
    scale: ScaleConfig,
    ratios: MovingAverage,
}

impl ScrollDetector {
    pub fn new(config: ScrollConfig, scale: ScaleConfig) -> Self {
        let ratios = MovingAverage::new(config.window);
        Self {
            config,
            scale,
            ratios,
        }
    }

    fn direction(&self) -> Option<ScrollDirection> {
        if !self.ratios.is_full() {
            return None;
        }
        let threshold = self.config.threshold;
        let mean = self.ratios.mean()?;
        if mean.abs() < threshold * self.config.inner_dead_zone {
            return None;
        }
        if self.ratios.iter().all(|r| *r < -threshold) {
            Some(ScrollDirection::Up)
        } else if self.ratios.iter().all(|r| *r > threshold) {
            Some(ScrollDirection::Down)
        } else {
            None
        }
    }
}

impl Detector for ScrollDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Scroll
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let eye_width = self.scale.eye_width(history)?;
        let index = history.position(INDEX_MCP, 0)?;
        let pinky = history.position(PINKY_MCP, 0)?;
        let ratio = (index.y - pinky.y) / eye_width;

        let arm_vertical = match (history.position(LEFT_WRIST, 0), history.position(LEFT_ELBOW, 0)) {
            (Some(wrist), Some(elbow)) => {
                (wrist.x - elbow.x).abs() / eye_width < self.config.vertical_arm_max
            }
            _ => false,
        };
        let hand_open =
            is_open_upright(history, HandSide::Left, self.config.min_palm_spread).unwrap_or(false);

        self.ratios.push(ratio);
        let direction = if hand_open && arm_vertical {
            self.direction()
        } else {
            None
        };

        Some(Detection::Scroll {
            direction,
            ratio,
            hand_open,
            arm_vertical,
        })
    }

    fn reset(&mut self) {
        self.ratios.clear();
    }
}
