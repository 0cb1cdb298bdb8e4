//! Detection results
//!
//! One closed enum covers every gesture family, so the coordinator's
//! dispatch is checked exhaustively at compile time.

use std::fmt;
use std::str::FromStr;

use gestura_core::GesturaError;

/// Detector identity; exactly one detector of each kind runs per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetectorKind {
    Attack,
    Mining,
    Placing,
    Shield,
    Walk,
    Strafe,
    InventoryOpen,
    MenuClose,
    Cursor,
    Look,
    Scroll,
}

impl DetectorKind {
    pub fn all() -> &'static [DetectorKind] {
        use DetectorKind::*;
        &[
            Attack,
            Mining,
            Placing,
            Shield,
            Walk,
            Strafe,
            InventoryOpen,
            MenuClose,
            Cursor,
            Look,
            Scroll,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Attack => "attack",
            DetectorKind::Mining => "mining",
            DetectorKind::Placing => "placing",
            DetectorKind::Shield => "shield",
            DetectorKind::Walk => "walk",
            DetectorKind::Strafe => "strafe",
            DetectorKind::InventoryOpen => "inventory_open",
            DetectorKind::MenuClose => "menu_close",
            DetectorKind::Cursor => "cursor",
            DetectorKind::Look => "look",
            DetectorKind::Scroll => "scroll",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = GesturaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        DetectorKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| GesturaError::InvalidConfig(format!("unknown detector: {name}")))
    }
}

/// Phase of a continuous (held) action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase {
    Start,
    Continue,
    Stop,
}

impl HoldPhase {
    /// Start or Continue
    pub fn is_held(&self) -> bool {
        !matches!(self, HoldPhase::Stop)
    }
}

/// Which placing rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacePath {
    /// Closed hand followed by a fast opening
    Primary,
    /// Large relative growth of the spread
    Fallback,
    /// Single-frame jump out of a closed hand
    Rapid,
    /// Weak but rising opening
    Permissive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeanDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Forearm pose measured by the shield detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldMetrics {
    /// Forearm angle from horizontal, degrees
    pub angle_deg: f32,
    /// Wrist depth ahead of the shoulder, shoulder widths
    pub forward: f32,
    /// Vertical wrist-to-shoulder distance, shoulder widths
    pub height: f32,
}

/// Wrist-crossing measurement for inventory / menu-close
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingMetrics {
    /// Wrist x minus shoulder x, shoulder widths
    pub offset: f32,
    pub shoulder_width: f32,
}

/// Head pose measured by the look detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookMetrics {
    pub left_x_distance: f32,
    pub right_x_distance: f32,
    /// Larger of the two edge-distance ratios
    pub x_ratio: f32,
    /// Averaged eye-corner vertical offset, shoulder widths
    pub y_offset: f32,
}

/// Output of a single detector for a single frame
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Horizontal punch; one left click
    Attack { speed_x: f32, speed_y: f32 },
    /// Repetitive downward swings; held left button
    Mining { phase: HoldPhase },
    /// Hand opening after a closed phase; one right click
    Place {
        path: PlacePath,
        confidence: f32,
        area: f32,
        growth_rate: f32,
    },
    /// Horizontal forearm in front of the body; held right button.
    /// Metrics are absent on a stop caused by tracking loss.
    Shield {
        phase: HoldPhase,
        metrics: Option<ShieldMetrics>,
    },
    /// Walking in place and the backward-step signal
    Walk {
        walking: bool,
        backward: bool,
        score: f32,
    },
    /// Torso lean
    Strafe {
        direction: LeanDirection,
        displacement: f32,
    },
    InventoryOpen(CrossingMetrics),
    MenuClose(CrossingMetrics),
    /// Absolute cursor position in screen pixels
    Cursor {
        x: f32,
        y: f32,
        frozen: bool,
        click: bool,
        pinch: f32,
    },
    /// Relative pointer delta from head rotation
    Look {
        dx: f32,
        dy: f32,
        metrics: LookMetrics,
    },
    Scroll {
        direction: Option<ScrollDirection>,
        ratio: f32,
        hand_open: bool,
        arm_vertical: bool,
    },
}

impl Detection {
    pub fn kind(&self) -> DetectorKind {
        match self {
            Detection::Attack { .. } => DetectorKind::Attack,
            Detection::Mining { .. } => DetectorKind::Mining,
            Detection::Place { .. } => DetectorKind::Placing,
            Detection::Shield { .. } => DetectorKind::Shield,
            Detection::Walk { .. } => DetectorKind::Walk,
            Detection::Strafe { .. } => DetectorKind::Strafe,
            Detection::InventoryOpen(_) => DetectorKind::InventoryOpen,
            Detection::MenuClose(_) => DetectorKind::MenuClose,
            Detection::Cursor { .. } => DetectorKind::Cursor,
            Detection::Look { .. } => DetectorKind::Look,
            Detection::Scroll { .. } => DetectorKind::Scroll,
        }
    }
}

/// All detections produced for one frame, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDetections {
    detections: Vec<Detection>,
}

impl FrameDetections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detection, replacing any earlier one of the same kind
    pub fn insert(&mut self, detection: Detection) {
        let kind = detection.kind();
        if let Some(slot) = self.detections.iter_mut().find(|d| d.kind() == kind) {
            *slot = detection;
        } else {
            self.detections.push(detection);
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, detection: Detection) -> Self {
        self.insert(detection);
        self
    }

    pub fn get(&self, kind: DetectorKind) -> Option<&Detection> {
        self.detections.iter().find(|d| d.kind() == kind)
    }

    pub fn contains(&self, kind: DetectorKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    pub fn kinds(&self) -> Vec<DetectorKind> {
        self.detections.iter().map(Detection::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl FromIterator<Detection> for FrameDetections {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        let mut frame = FrameDetections::new();
        for detection in iter {
            frame.insert(detection);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in DetectorKind::all() {
            assert_eq!(kind.as_str().parse::<DetectorKind>().unwrap(), *kind);
        }
        assert!("jump".parse::<DetectorKind>().is_err());
    }

    #[test]
    fn test_frame_detections_one_per_kind() {
        let frame = FrameDetections::new()
            .with(Detection::Mining {
                phase: HoldPhase::Start,
            })
            .with(Detection::Mining {
                phase: HoldPhase::Continue,
            })
            .with(Detection::Attack {
                speed_x: 2.0,
                speed_y: 0.1,
            });
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.get(DetectorKind::Mining),
            Some(&Detection::Mining {
                phase: HoldPhase::Continue
            })
        );
        assert!(!frame.contains(DetectorKind::Shield));
    }

    #[test]
    fn test_hold_phase() {
        assert!(HoldPhase::Start.is_held());
        assert!(HoldPhase::Continue.is_held());
        assert!(!HoldPhase::Stop.is_held());
    }
}
