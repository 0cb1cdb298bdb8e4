//! Placing - opening the right hand after a closed phase

use std::collections::VecDeque;
use std::time::Duration;

use gestura_core::{FrameTime, GesturaError, GesturaResult, HandSide};
use gestura_history::LandmarkHistory;

use crate::hand::fingertip_area;
use crate::{Cooldown, Detection, Detector, DetectorKind, PlacePath, ScaleConfig};

/// Placing configuration (areas in shoulder widths squared)
#[derive(Clone, Debug)]
pub struct PlacingConfig {
    /// Span of fingertip-area samples considered
    pub window: Duration,
    /// Area at or below which the hand counts as closed
    pub closed_area_max: f32,
    /// Area at or above which the hand counts as open
    pub open_area_min: f32,
    /// Minimum opening speed for the primary path, area per second
    pub min_growth_rate: f32,
    /// Current / minimum area ratio for the fallback path
    pub fallback_ratio: f32,
    /// Single-frame area jump out of a closed hand for the rapid path
    pub rapid_jump: f32,
    /// Permissive path: the minimum must reach this low...
    pub permissive_min: f32,
    /// ...and the current area this high, while still rising
    pub permissive_current: f32,
    pub cooldown: Duration,
}

impl Default for PlacingConfig {
    fn default() -> Self {
        PlacingConfig {
            window: Duration::from_millis(600),
            closed_area_max: 0.03,
            open_area_min: 0.05,
            min_growth_rate: 0.25,
            fallback_ratio: 2.0,
            rapid_jump: 0.03,
            permissive_min: 0.04,
            permissive_current: 0.045,
            cooldown: Duration::from_millis(500),
        }
    }
}

impl PlacingConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.closed_area_max >= self.open_area_min {
            return Err(GesturaError::InvalidConfig(
                "placing closed-hand area must be below open-hand area".into(),
            ));
        }
        if self.fallback_ratio <= 1.0 {
            return Err(GesturaError::InvalidConfig(
                "placing fallback ratio must exceed 1".into(),
            ));
        }
        if self.window.is_zero() {
            return Err(GesturaError::InvalidConfig(
                "placing window must be non-empty".into(),
            ));
        }
        Ok(())
    }
}

/// Right-click tap on a hand opening; four redundant trigger rules, each
/// with its own confidence
pub struct PlacingDetector {
    config: PlacingConfig,
    scale: ScaleConfig,
    samples: VecDeque<(FrameTime, f32)>,
    cooldown: Cooldown,
}

impl PlacingDetector {
    pub fn new(config: PlacingConfig, scale: ScaleConfig) -> Self {
        let cooldown = Cooldown::new(config.cooldown);
        Self {
            config,
            scale,
            samples: VecDeque::new(),
            cooldown,
        }
    }

    fn record(&mut self, now: FrameTime, area: f32) {
        while let Some((t, _)) = self.samples.front() {
            if now.since(*t) > self.config.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        self.samples.push_back((now, area));
    }

    /// Evaluate the trigger rules in order of confidence
    fn evaluate(&self, now: FrameTime, current: f32) -> Option<(PlacePath, f32, f32)> {
        let earlier = self.samples.len().checked_sub(1)?;
        if earlier == 0 {
            return None;
        }
        let (min_time, min_area) = self
            .samples
            .iter()
            .take(earlier)
            .copied()
            .fold((now, f32::INFINITY), |best, s| if s.1 < best.1 { s } else { best });
        let (_, previous) = self.samples[earlier - 1];

        let elapsed = now.since(min_time).as_secs_f32();
        let growth_rate = if elapsed > 0.0 {
            (current - min_area) / elapsed
        } else {
            0.0
        };
        let config = &self.config;

        if min_area <= config.closed_area_max
            && current >= config.open_area_min
            && growth_rate >= config.min_growth_rate
        {
            let strength = (growth_rate / (4.0 * config.min_growth_rate)).min(1.0);
            return Some((PlacePath::Primary, 0.6 + 0.4 * strength, growth_rate));
        }
        if min_area > 0.0
            && current / min_area >= config.fallback_ratio
            && current > config.closed_area_max
        {
            return Some((PlacePath::Fallback, 0.5, growth_rate));
        }
        if previous <= config.closed_area_max && current - previous >= config.rapid_jump {
            return Some((PlacePath::Rapid, 0.45, growth_rate));
        }
        if min_area <= config.permissive_min
            && current >= config.permissive_current
            && current > previous
        {
            return Some((PlacePath::Permissive, 0.3, growth_rate));
        }
        None
    }
}

impl Detector for PlacingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Placing
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let now = history.now()?;
        let area = self.scale.shoulder_width(history).and_then(|sw| {
            fingertip_area(history, HandSide::Right).map(|a| a / (sw * sw))
        });
        let Some(area) = area else {
            self.samples.clear();
            return None;
        };

        self.record(now, area);
        if !self.cooldown.is_ready(now) {
            return None;
        }

        let (path, confidence, growth_rate) = self.evaluate(now, area)?;
        self.cooldown.trigger(now);
        self.samples.clear();
        tracing::debug!(
            "Place via {:?}: confidence={:.2} area={:.3} growth={:.2}/s",
            path,
            confidence,
            area,
            growth_rate
        );
        Some(Detection::Place {
            path,
            confidence,
            area,
            growth_rate,
        })
    }

    fn reset(&mut self) {
        self.samples.clear();
        self.cooldown.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::{hand_with_tip_area, standing_frame, HistoryBuilder, SHOULDER_WIDTH};
    use gestura_core::Point3;

    fn push_area(builder: &mut HistoryBuilder, normalized: f32) {
        let raw = normalized * SHOULDER_WIDTH * SHOULDER_WIDTH;
        builder.push(|f| {
            standing_frame(f).with_hand(HandSide::Right, hand_with_tip_area(Point3::new(0.36, 0.5, 0.0), raw))
        });
    }

    fn run(detector: &mut PlacingDetector, areas: &[f32]) -> Vec<Option<Detection>> {
        let mut builder = HistoryBuilder::new();
        areas
            .iter()
            .map(|a| {
                push_area(&mut builder, *a);
                detector.detect(builder.history())
            })
            .collect()
    }

    #[test]
    fn test_closed_then_open_is_primary() {
        let mut detector = PlacingDetector::new(PlacingConfig::default(), ScaleConfig::default());
        let results = run(&mut detector, &[0.02, 0.02, 0.06]);
        assert!(results[0].is_none());
        assert!(results[1].is_none());
        match &results[2] {
            Some(Detection::Place {
                path, confidence, ..
            }) => {
                assert_eq!(*path, PlacePath::Primary);
                assert!((0.3..=1.0).contains(confidence));
            }
            other => panic!("expected a place, got {other:?}"),
        }
    }

    #[test]
    fn test_steady_hand_never_places() {
        let mut detector = PlacingDetector::new(PlacingConfig::default(), ScaleConfig::default());
        assert!(run(&mut detector, &[0.02; 20]).iter().all(Option::is_none));

        let mut detector = PlacingDetector::new(PlacingConfig::default(), ScaleConfig::default());
        assert!(run(&mut detector, &[0.07; 20]).iter().all(Option::is_none));
    }

    #[test]
    fn test_fallback_path() {
        let mut detector = PlacingDetector::new(PlacingConfig::default(), ScaleConfig::default());
        // Never closed enough for primary or rapid, but doubles in size
        let results = run(&mut detector, &[0.045, 0.045, 0.095]);
        assert!(matches!(
            results[2],
            Some(Detection::Place {
                path: PlacePath::Fallback,
                ..
            })
        ));
    }

    #[test]
    fn test_cooldown_and_window_reset() {
        let mut detector = PlacingDetector::new(PlacingConfig::default(), ScaleConfig::default());
        let results = run(&mut detector, &[0.02, 0.06, 0.02, 0.06, 0.02, 0.06]);
        let places = results.iter().filter(|r| r.is_some()).count();
        // Second opening falls inside the 0.5 s cooldown
        assert_eq!(places, 1);
    }

    #[test]
    fn test_lost_hand_clears_samples() {
        let mut detector = PlacingDetector::new(PlacingConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        push_area(&mut builder, 0.02);
        detector.detect(builder.history());
        builder.push(standing_frame);
        assert!(detector.detect(builder.history()).is_none());
        push_area(&mut builder, 0.06);
        assert!(detector.detect(builder.history()).is_none());
    }
}
