//! Arm-crossing gestures: inventory open and menu close
//!
//! Both follow the left wrist horizontally relative to the left shoulder.
//! A crossing arms once the wrist passes the arm offset and completes when
//! it reaches the complete offset on the other side.

use gestura_core::{BodyLandmark, GesturaError, GesturaResult, LandmarkId};
use gestura_history::LandmarkHistory;

use crate::{CrossingMetrics, Detection, Detector, DetectorKind, FrameCooldown, ScaleConfig};

const LEFT_WRIST: LandmarkId = LandmarkId::body(BodyLandmark::LeftWrist);
const LEFT_SHOULDER: LandmarkId = LandmarkId::body(BodyLandmark::LeftShoulder);

/// Crossing configuration (signed offsets in shoulder widths, positive
/// toward the subject's left)
#[derive(Clone, Debug)]
pub struct CrossingConfig {
    pub arm_offset: f32,
    pub complete_offset: f32,
    /// Frames ignored after a completed crossing
    pub cooldown_frames: u32,
}

impl CrossingConfig {
    /// Wrist sweeps from outside the left shoulder across the chest
    pub fn inventory_open() -> Self {
        CrossingConfig {
            arm_offset: 0.1,
            complete_offset: -0.3,
            cooldown_frames: 30,
        }
    }

    /// Wrist sweeps from across the chest back out past the left shoulder
    pub fn menu_close() -> Self {
        CrossingConfig {
            arm_offset: -0.1,
            complete_offset: 0.1,
            cooldown_frames: 30,
        }
    }

    pub fn validate(&self) -> GesturaResult<()> {
        if !(self.arm_offset.is_finite() && self.complete_offset.is_finite()) {
            return Err(GesturaError::InvalidConfig(
                "crossing offsets must be finite".into(),
            ));
        }
        if self.arm_offset == self.complete_offset {
            return Err(GesturaError::InvalidConfig(format!(
                "crossing arm and complete offsets must differ, both {}",
                self.arm_offset
            )));
        }
        Ok(())
    }

    /// +1 when completing means moving toward larger offsets
    fn sweep(&self) -> f32 {
        (self.complete_offset - self.arm_offset).signum()
    }
}

struct Crossing {
    config: CrossingConfig,
    scale: ScaleConfig,
    armed: bool,
    cooldown: FrameCooldown,
}

impl Crossing {
    fn new(config: CrossingConfig, scale: ScaleConfig) -> Self {
        let cooldown = FrameCooldown::new(config.cooldown_frames);
        Self {
            config,
            scale,
            armed: false,
            cooldown,
        }
    }

    fn metrics(&self, history: &LandmarkHistory) -> Option<CrossingMetrics> {
        let shoulder_width = self.scale.shoulder_width(history)?;
        let wrist = history.relative_position(LEFT_WRIST, LEFT_SHOULDER)?;
        Some(CrossingMetrics {
            offset: wrist.x / shoulder_width,
            shoulder_width,
        })
    }

    fn step(&mut self, kind: DetectorKind, history: &LandmarkHistory) -> Option<CrossingMetrics> {
        if !self.cooldown.is_ready() {
            self.cooldown.tick();
            return None;
        }
        let Some(metrics) = self.metrics(history) else {
            self.armed = false;
            return None;
        };

        let sweep = self.config.sweep();
        if !self.armed {
            if (metrics.offset - self.config.arm_offset) * sweep <= 0.0 {
                tracing::debug!("{} armed at offset {:.2}", kind, metrics.offset);
                self.armed = true;
            }
            return None;
        }
        if (metrics.offset - self.config.complete_offset) * sweep >= 0.0 {
            tracing::debug!("{} completed at offset {:.2}", kind, metrics.offset);
            self.armed = false;
            self.cooldown.start();
            return Some(metrics);
        }
        None
    }

    fn reset(&mut self) {
        self.armed = false;
        self.cooldown.reset();
    }
}

/// Left wrist swept inward across the chest
pub struct InventoryOpenDetector {
    crossing: Crossing,
}

impl InventoryOpenDetector {
    pub fn new(config: CrossingConfig, scale: ScaleConfig) -> Self {
        Self {
            crossing: Crossing::new(config, scale),
        }
    }
}

impl Detector for InventoryOpenDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::InventoryOpen
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        self.crossing
            .step(DetectorKind::InventoryOpen, history)
            .map(Detection::InventoryOpen)
    }

    fn reset(&mut self) {
        self.crossing.reset();
    }
}

/// Left wrist swept back outward past the shoulder
pub struct MenuCloseDetector {
    crossing: Crossing,
}

impl MenuCloseDetector {
    pub fn new(config: CrossingConfig, scale: ScaleConfig) -> Self {
        Self {
            crossing: Crossing::new(config, scale),
        }
    }
}

impl Detector for MenuCloseDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::MenuClose
    }

    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection> {
        self.crossing
            .step(DetectorKind::MenuClose, history)
            .map(Detection::MenuClose)
    }

    fn reset(&mut self) {
        self.crossing.reset();
    }
}
