//! Walk - walking in place, plus the backward-step signal
//!
//! Walking is read from anti-phase vertical motion of the legs. Ankles are
//! preferred; knees and then hips stand in when the lower landmarks are not
//! visible. All distances are in torso heights.

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, HandLandmark, HandSide, LandmarkId, Point3};
use gestura_history::LandmarkHistory;

use crate::{Agreement, Detection, Detector, DetectorKind, MovingAverage, ScaleConfig, StableHysteresis};

const LEG_PAIRS: [(BodyLandmark, BodyLandmark); 3] = [
    (BodyLandmark::LeftAnkle, BodyLandmark::RightAnkle),
    (BodyLandmark::LeftKnee, BodyLandmark::RightKnee),
    (BodyLandmark::LeftHip, BodyLandmark::RightHip),
];

const LEFT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::LeftShoulder);

/// Walk configuration
#[derive(Clone, Debug)]
pub struct WalkConfig {
    /// Leg score above which walking starts
    pub enter: f32,
    /// Leg score below which walking stops
    pub exit: f32,
    /// Consecutive frames needed for either transition
    pub stable_frames: usize,
    /// Frames of history required before evaluating
    pub min_history: usize,
    pub min_visibility: f32,
    pub velocity_window: usize,
    pub range_window: usize,
    /// Vertical leg speed below which motion is noise (with `min_range`)
    pub min_speed: f32,
    pub min_range: f32,
    pub speed_gain: f32,
    pub range_gain: f32,
    pub anti_phase_window: usize,
    pub anti_phase_min_ratio: f32,
    pub smoothing_window: usize,
    /// Backward step: left thumb outward of the left shoulder, shoulder widths
    pub backward_enter: f32,
    pub backward_exit: f32,
    pub backward_frames: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig {
            enter: 0.28,
            exit: 0.12,
            stable_frames: 3,
            min_history: 5,
            min_visibility: 0.7,
            velocity_window: 5,
            range_window: 15,
            min_speed: 0.04,
            min_range: 0.015,
            speed_gain: 8.0,
            range_gain: 4.0,
            anti_phase_window: 5,
            anti_phase_min_ratio: 0.6,
            smoothing_window: 5,
            backward_enter: 0.35,
            backward_exit: 0.2,
            backward_frames: 3,
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.exit >= self.enter {
            return Err(GesturaError::InvalidConfig(format!(
                "walk exit {} must be below enter {}",
                self.exit, self.enter
            )));
        }
        if self.backward_exit >= self.backward_enter {
            return Err(GesturaError::InvalidConfig(
                "backward exit must be below backward enter".into(),
            ));
        }
        if self.velocity_window < 2 || self.stable_frames == 0 || self.smoothing_window == 0 {
            return Err(GesturaError::InvalidConfig(
                "walk windows must be positive and the velocity window at least 2".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.anti_phase_min_ratio) {
            return Err(GesturaError::InvalidConfig(
                "anti-phase ratio must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Forward walking (W) and backward step (S)
pub struct WalkDetector {
    config: WalkConfig,
    scale: ScaleConfig,
    walking: StableHysteresis,
    backward: StableHysteresis,
    anti_phase: Agreement,
    score: MovingAverage,
}

impl WalkDetector {
    pub fn new(config: WalkConfig, scale: ScaleConfig) -> Self {
        Self {
            walking: StableHysteresis::new(config.enter, config.exit, config.stable_frames),
            backward: StableHysteresis::new(
                config.backward_enter,
                config.backward_exit,
                config.backward_frames,
            ),
            anti_phase: Agreement::new(0, config.anti_phase_window),
            score: MovingAverage::new(config.smoothing_window),
            config,
            scale,
        }
    }

    pub fn is_walking(&self) -> bool {
        self.walking.is_active()
    }

    fn visible(&self, history: &LandmarkHistory, landmark: BodyLandmark) -> bool {
        history
            .landmark(LandmarkId::body(landmark), 0)
            .map_or(false, |lm| lm.visibility_or_full() >= self.config.min_visibility)
    }

    /// Best visible leg pair, most sensitive first
    fn leg_pair(&self, history: &LandmarkHistory) -> Option<(LandmarkId, LandmarkId)> {
        LEG_PAIRS
            .iter()
            .find(|(left, right)| self.visible(history, *left) && self.visible(history, *right))
            .map(|(left, right)| (LandmarkId::body(*left), LandmarkId::body(*right)))
    }

    /// Smoothed leg-motion score for this frame
    fn leg_score(&mut self, history: &LandmarkHistory, torso: f32) -> f32 {
        let raw = self.raw_leg_score(history, torso);
        self.score.push(raw)
    }

    fn raw_leg_score(&mut self, history: &LandmarkHistory, torso: f32) -> f32 {
        let config = &self.config;
        let Some((left, right)) = self.leg_pair(history) else {
            return 0.0;
        };
        let (Some(left_v), Some(right_v)) = (
            history.velocity(left, config.velocity_window),
            history.velocity(right, config.velocity_window),
        ) else {
            return 0.0;
        };

        let left_vy = left_v.y / torso;
        let right_vy = right_v.y / torso;
        let mut speed = (left_vy.abs() + right_vy.abs()) / 2.0;
        let left_range = history.y_range(left, config.range_window).unwrap_or(0.0);
        let right_range = history.y_range(right, config.range_window).unwrap_or(0.0);
        let mut range = (left_range + right_range) / 2.0 / torso;

        if speed < config.min_speed && range < config.min_range {
            speed = 0.0;
            range = 0.0;
        }
        let mut score = (speed * config.speed_gain + range * config.range_gain) / 2.0;

        // Legs move in opposite vertical directions when walking; body sway
        // moves them together. No score until enough frames have voted.
        let opposed = left_vy * right_vy < 0.0
            && left_vy.abs() >= config.min_speed
            && right_vy.abs() >= config.min_speed;
        let min_votes = 3.max(config.anti_phase_window / 2);
        self.anti_phase.push(opposed);
        if self.anti_phase.len() < min_votes || self.anti_phase.ratio() < config.anti_phase_min_ratio {
            score = 0.0;
        }
        score
    }

    /// Left thumb outward of the left shoulder and above the shoulder line
    fn backward_offset(&self, history: &LandmarkHistory, shoulder_width: f32) -> f32 {
        let thumb = history
            .position(LandmarkId::hand(HandSide::Left, HandLandmark::ThumbTip), 0)
            .or_else(|| history.position(LandmarkId::body(BodyLandmark::LeftThumb), 0));
        let (Some(thumb), Some(shoulder)) = (thumb, history.position(LEFT_SHOULDER, 0)) else {
            return 0.0;
        };
        outward_offset(thumb, shoulder, shoulder_width)
    }
}

/// Outward (subject's left) offset of `point` from the left shoulder, zero
/// unless the point is above the shoulder line
fn outward_offset(point: Point3, shoulder: Point3, shoulder_width: f32) -> f32 {
    if point.y >= shoulder.y {
        return 0.0;
    }
    (point.x - shoulder.x) / shoulder_width
}

impl Detector for WalkDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Walk
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        if history.len() < self.config.min_history {
            return None;
        }
        let (Some(torso), Some(shoulder_width)) = (
            self.scale.torso_height(history),
            self.scale.shoulder_width(history),
        ) else {
            if self.walking.is_active() || self.backward.is_active() {
                tracing::debug!("Walk reset: body lost");
            }
            self.reset();
            return None;
        };

        let score = self.leg_score(history, torso);
        let was_walking = self.walking.is_active();
        let walking = self.walking.update(score);
        if walking != was_walking {
            tracing::debug!("Walk {}: score={:.3}", if walking { "start" } else { "stop" }, score);
        }

        let offset = self.backward_offset(history, shoulder_width);
        let backward = self.backward.update(offset);

        (walking || backward).then_some(Detection::Walk {
            walking,
            backward,
            score,
        })
    }

    fn reset(&mut self) {
        self.walking.reset();
        self.backward.reset();
        self.anti_phase.clear();
        self.score.clear();
    }
}
