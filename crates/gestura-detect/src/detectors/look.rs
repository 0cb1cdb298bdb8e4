//! Look - head rotation read from face-edge to eye-corner distances

use gestura_core::{FaceLandmark, GesturaError, GesturaResult, LandmarkId, Point3};
use gestura_history::LandmarkHistory;

use crate::{Detection, Detector, DetectorKind, LookMetrics, ScaleConfig};

/// Look configuration
#[derive(Clone, Debug)]
pub struct LookConfig {
    /// Edge-distance ratio between the two sides that counts as a turn
    pub ratio_threshold: f32,
    /// Eye corners this far above the face edges (shoulder widths) look up
    pub up_threshold: f32,
    /// Eye corners this far below the face edges look down
    pub down_threshold: f32,
    /// Pointer units per frame
    pub speed: f32,
    /// Edge distances below this are degenerate
    pub min_edge_distance: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        LookConfig {
            ratio_threshold: 2.0,
            up_threshold: 0.115,
            down_threshold: 0.05,
            speed: 7.0,
            min_edge_distance: 1e-4,
        }
    }
}

impl LookConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if self.ratio_threshold <= 1.0 {
            return Err(GesturaError::InvalidConfig(format!(
                "look ratio threshold must exceed 1, got {}",
                self.ratio_threshold
            )));
        }
        if self.up_threshold < 0.0 || self.down_threshold < 0.0 {
            return Err(GesturaError::InvalidConfig(
                "look vertical thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Relative pointer motion while the head is turned or tilted
pub struct LookDetector {
    config: LookConfig,
    scale: ScaleConfig,
}

impl LookDetector {
    pub fn new(config: LookConfig, scale: ScaleConfig) -> Self {
        Self { config, scale }
    }

    fn face_point(history: &LandmarkHistory, index: u16) -> Option<Point3> {
        history.position(LandmarkId::face(index)?, 0)
    }

    fn metrics(&self, history: &LandmarkHistory) -> Option<LookMetrics> {
        let left_edge = Self::face_point(history, FaceLandmark::LEFT_FACE_EDGE)?;
        let left_eye = Self::face_point(history, FaceLandmark::LEFT_EYE_OUTER)?;
        let right_edge = Self::face_point(history, FaceLandmark::RIGHT_FACE_EDGE)?;
        let right_eye = Self::face_point(history, FaceLandmark::RIGHT_EYE_OUTER)?;
        let shoulder_width = self.scale.shoulder_width(history)?;

        let left_x_distance = (left_edge.x - left_eye.x).abs();
        let right_x_distance = (right_edge.x - right_eye.x).abs();
        let min = self.config.min_edge_distance;
        if left_x_distance < min || right_x_distance < min {
            return None;
        }

        // Positive when the eye corners sit below the face edges
        let y_offset = ((left_eye.y - left_edge.y) + (right_eye.y - right_edge.y)) / 2.0;
        Some(LookMetrics {
            left_x_distance,
            right_x_distance,
            x_ratio: (left_x_distance / right_x_distance).max(right_x_distance / left_x_distance),
            y_offset: y_offset / shoulder_width,
        })
    }
}

impl Detector for LookDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Look
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        let metrics = self.metrics(history)?;
        let config = &self.config;

        let dx = if metrics.x_ratio <= config.ratio_threshold {
            0.0
        } else if metrics.left_x_distance > metrics.right_x_distance {
            -config.speed
        } else {
            config.speed
        };
        let dy = if metrics.y_offset < -config.up_threshold {
            -config.speed
        } else if metrics.y_offset > config.down_threshold {
            config.speed
        } else {
            0.0
        };

        Some(Detection::Look { dx, dy, metrics })
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::{face, standing_frame, HistoryBuilder};

    fn look(turn: f32, tilt: f32) -> (f32, f32) {
        let mut detector = LookDetector::new(LookConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        builder.push(|f| standing_frame(f).with_face(face(turn, tilt)));
        match detector.detect(builder.history()) {
            Some(Detection::Look { dx, dy, .. }) => (dx, dy),
            other => panic!("expected look, got {other:?}"),
        }
    }

    #[test]
    fn test_neutral_face_is_still() {
        assert_eq!(look(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_turns() {
        // 0.035 against 0.005: ratio 7
        assert_eq!(look(0.015, 0.0), (-7.0, 0.0));
        assert_eq!(look(-0.015, 0.0).0, 7.0);
        // 0.025 against 0.015: below the ratio threshold
        assert_eq!(look(0.005, 0.0).0, 0.0);
    }

    #[test]
    fn test_tilts() {
        // Offsets of -0.15 and +0.075 shoulder widths
        assert_eq!(look(0.0, -0.03), (0.0, -7.0));
        assert_eq!(look(0.0, 0.015), (0.0, 7.0));
        // -0.05 sits inside the neutral band
        assert_eq!(look(0.0, -0.01), (0.0, 0.0));
    }

    #[test]
    fn test_requires_face_and_shoulders() {
        let mut detector = LookDetector::new(LookConfig::default(), ScaleConfig::default());
        let mut builder = HistoryBuilder::new();
        builder.push(standing_frame);
        assert!(detector.detect(builder.history()).is_none());

        builder.push(|f| f.with_face(face(0.0, 0.0)));
        assert!(detector.detect(builder.history()).is_none());
    }
}
