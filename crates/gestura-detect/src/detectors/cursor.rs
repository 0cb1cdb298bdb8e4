//! Cursor - absolute pointer from the right hand, pinch to click

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, HandLandmark, HandSide, LandmarkId, Point3};
use gestura_history::LandmarkHistory;

use crate::{Detection, Detector, DetectorKind, FrameCooldown, ScaleConfig};

const RIGHT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::RightShoulder);
const THUMB_TIP: LandmarkId = LandmarkId::hand(HandSide::Right, HandLandmark::ThumbTip);
const INDEX_TIP: LandmarkId = LandmarkId::hand(HandSide::Right, HandLandmark::IndexTip);

/// Cursor configuration (pinch ratios in shoulder widths)
#[derive(Clone, Debug)]
pub struct CursorConfig {
    /// Weight of the new target in the moving average; 1.0 disables smoothing
    pub smoothing: f32,
    /// Position holds still while the pinch is tighter than this
    pub freeze_ratio: f32,
    pub click_ratio: f32,
    pub release_ratio: f32,
    pub click_cooldown_frames: u32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Screen sizes covered per shoulder width of hand travel
    pub sensitivity: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            smoothing: 0.7,
            freeze_ratio: 0.16,
            click_ratio: 0.08,
            release_ratio: 0.2,
            click_cooldown_frames: 15,
            screen_width: 1920.0,
            screen_height: 1080.0,
            sensitivity: 1.0,
        }
    }
}

impl CursorConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(GesturaError::InvalidConfig(format!(
                "cursor smoothing must be in (0, 1], got {}",
                self.smoothing
            )));
        }
        if self.click_ratio > self.release_ratio {
            return Err(GesturaError::InvalidConfig(
                "cursor click ratio must not exceed release ratio".into(),
            ));
        }
        if self.screen_width < 1.0 || self.screen_height < 1.0 {
            return Err(GesturaError::InvalidConfig(format!(
                "cursor screen {}x{} is empty",
                self.screen_width, self.screen_height
            )));
        }
        Ok(())
    }
}

/// Menu pointer driven by the right thumb / index midpoint
pub struct CursorDetector {
    config: CursorConfig,
    scale: ScaleConfig,
    last: Option<(f32, f32)>,
    pinching: bool,
    cooldown: FrameCooldown,
}

impl CursorDetector {
    pub fn new(config: CursorConfig, scale: ScaleConfig) -> Self {
        let cooldown = FrameCooldown::new(config.click_cooldown_frames);
        Self {
            config,
            scale,
            last: None,
            pinching: false,
            cooldown,
        }
    }

    /// Screen position for a hand point, relative to the right shoulder
    fn map_to_screen(&self, hand: Point3, origin: Point3, shoulder_width: f32) -> (f32, f32) {
        let config = &self.config;
        // Hand moving toward the subject's right (smaller x) moves the cursor right
        let dx = (origin.x - hand.x) / shoulder_width;
        let dy = (hand.y - origin.y) / shoulder_width;
        let x = config.screen_width / 2.0 + dx * config.screen_width * config.sensitivity;
        let y = config.screen_height / 2.0 + dy * config.screen_height * config.sensitivity;
        (
            x.clamp(0.0, config.screen_width - 1.0),
            y.clamp(0.0, config.screen_height - 1.0),
        )
    }

    fn update_click(&mut self, pinch: f32) -> bool {
        self.cooldown.tick();
        if self.pinching {
            if pinch > self.config.release_ratio {
                self.pinching = false;
            }
            return false;
        }
        if pinch <= self.config.click_ratio && self.cooldown.is_ready() {
            self.pinching = true;
            self.cooldown.start();
            return true;
        }
        false
    }
}

impl Detector for CursorDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Cursor
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let inputs = self.scale.shoulder_width(history).and_then(|sw| {
            Some((
                sw,
                history.position(RIGHT_SHOULDER, 0)?,
                history.position(THUMB_TIP, 0)?,
                history.position(INDEX_TIP, 0)?,
            ))
        });
        let Some((shoulder_width, shoulder, thumb, index)) = inputs else {
            self.last = None;
            self.pinching = false;
            return None;
        };

        let pinch = thumb.distance_xy(&index) / shoulder_width;
        let target = self.map_to_screen(thumb.midpoint(&index), shoulder, shoulder_width);

        let frozen = pinch < self.config.freeze_ratio && self.last.is_some();
        let (x, y) = match self.last {
            Some(last) if frozen => last,
            Some((lx, ly)) => {
                let a = self.config.smoothing;
                (lx + (target.0 - lx) * a, ly + (target.1 - ly) * a)
            }
            None => target,
        };
        self.last = Some((x, y));

        let click = self.update_click(pinch);
        if click {
            tracing::debug!("Cursor click at ({:.0}, {:.0}), pinch={:.3}", x, y, pinch);
        }
        Some(Detection::Cursor {
            x,
            y,
            frozen,
            click,
            pinch,
        })
    }

    fn reset(&mut self) {
        self.last = None;
        self.pinching = false;
        self.cooldown.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::{hand_with_tip_area, standing_frame, HistoryBuilder, PoseFrame};
    use gestura_core::Landmark;

    /// Right hand with the thumb / index midpoint at `center` and the tips
    /// `pinch` shoulder widths apart horizontally
    fn pointing(frame: PoseFrame, center: Point3, pinch: f32) -> PoseFrame {
        let mut hand = hand_with_tip_area(center, 0.001);
        let half = pinch * 0.2 / 2.0;
        hand[HandLandmark::ThumbTip as usize] = Landmark::new(center.x - half, center.y, 0.0);
        hand[HandLandmark::IndexTip as usize] = Landmark::new(center.x + half, center.y, 0.0);
        standing_frame(frame).with_hand(HandSide::Right, hand)
    }

    fn cursor(result: Option<Detection>) -> (f32, f32, bool, bool) {
        match result {
            Some(Detection::Cursor { x, y, frozen, click, .. }) => (x, y, frozen, click),
            other => panic!("expected cursor, got {other:?}"),
        }
    }

    #[test]
    fn test_hand_at_shoulder_maps_to_center() {
        let mut detector = CursorDetector::new(CursorConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        builder.push(|f| pointing(f, Point3::new(0.40, 0.35, 0.0), 0.5));
        let (x, y, frozen, click) = cursor(detector.detect(builder.history()));
        assert!((x - 960.0).abs() < 0.5);
        assert!((y - 540.0).abs() < 0.5);
        assert!(!frozen);
        assert!(!click);
    }

    #[test]
    fn test_mapping_direction_and_clamp() {
        let mut detector = CursorDetector::new(CursorConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        // A quarter shoulder width toward the subject's right and down
        builder.push(|f| pointing(f, Point3::new(0.35, 0.40, 0.0), 0.5));
        let (x, y, ..) = cursor(detector.detect(builder.history()));
        assert!((x - 1440.0).abs() < 0.5);
        assert!((y - 810.0).abs() < 0.5);

        detector.reset();
        builder.push(|f| pointing(f, Point3::new(0.90, 0.0, 0.0), 0.5));
        let (x, y, ..) = cursor(detector.detect(builder.history()));
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn test_smoothing_moves_part_way() {
        let mut detector = CursorDetector::new(CursorConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        builder.push(|f| pointing(f, Point3::new(0.40, 0.35, 0.0), 0.5));
        detector.detect(builder.history());
        builder.push(|f| pointing(f, Point3::new(0.35, 0.35, 0.0), 0.5));
        let (x, ..) = cursor(detector.detect(builder.history()));
        // 960 + 0.7 * 480
        assert!((x - 1296.0).abs() < 0.5);
    }

    #[test]
    fn test_pinch_freezes_and_clicks_once() {
        let mut detector = CursorDetector::new(CursorConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        builder.push(|f| pointing(f, Point3::new(0.40, 0.35, 0.0), 0.5));
        detector.detect(builder.history());

        let mut clicks = 0;
        for _ in 0..5 {
            builder.push(|f| pointing(f, Point3::new(0.37, 0.38, 0.0), 0.05));
            let (x, y, frozen, click) = cursor(detector.detect(builder.history()));
            assert!(frozen);
            assert!((x - 960.0).abs() < 0.5 && (y - 540.0).abs() < 0.5);
            clicks += usize::from(click);
        }
        assert_eq!(clicks, 1);
    }

    #[test]
    fn test_click_cooldown_after_release() {
        let mut detector = CursorDetector::new(CursorConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        let mut clicks = Vec::new();
        // Pinch, release, pinch again within 15 frames, then after
        let pinches = [0.05, 0.3, 0.05, 0.3];
        let holds = [1, 1, 1, 20];
        for (pinch, frames) in pinches.iter().zip(holds) {
            for _ in 0..frames {
                builder.push(|f| pointing(f, Point3::new(0.40, 0.35, 0.0), *pinch));
                let (.., click) = cursor(detector.detect(builder.history()));
                clicks.push(click);
            }
        }
        builder.push(|f| pointing(f, Point3::new(0.40, 0.35, 0.0), 0.05));
        let (.., click) = cursor(detector.detect(builder.history()));
        clicks.push(click);

        assert_eq!(clicks.iter().filter(|c| **c).count(), 2);
        assert!(clicks[0]);
        assert!(!clicks[2]);
        assert!(*clicks.last().unwrap_or(&false));
    }

    #[test]
    fn test_missing_hand_clears_position() {
        let mut detector = CursorDetector::new(CursorConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        builder.push(|f| pointing(f, Point3::new(0.40, 0.35, 0.0), 0.5));
        detector.detect(builder.history());
        builder.push(standing_frame);
        assert!(detector.detect(builder.history()).is_none());

        // No smoothing against the stale position
        builder.push(|f| pointing(f, Point3::new(0.35, 0.35, 0.0), 0.5));
        let (x, ..) = cursor(detector.detect(builder.history()));
        assert!((x - 1440.0).abs() < 0.5);
    }
}
