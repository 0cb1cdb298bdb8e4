//! Landmark history - bounded FIFO of frame snapshots
//!
//! Every query is total: missing frames, missing groups and too-short
//! windows yield `None` (or `false`), never a panic.

use std::collections::VecDeque;

use gestura_core::{FrameSnapshot, FrameTime, Landmark, LandmarkId, Point3};

use crate::HistoryConfig;

/// Temporal landmark store
#[derive(Debug, Clone)]
pub struct LandmarkHistory {
    /// Snapshots, oldest first
    frames: VecDeque<FrameSnapshot>,
    /// Maximum number of retained frames
    capacity: usize,
    /// Nominal frame interval (seconds)
    dt: f32,
    /// Reference pose for relative measurement
    baseline: Option<FrameSnapshot>,
}

impl Default for LandmarkHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkHistory {
    /// Create a history with the default configuration
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Create a history with a custom configuration
    pub fn with_config(config: HistoryConfig) -> Self {
        let capacity = config.capacity.max(1);
        LandmarkHistory {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            dt: config.dt(),
            baseline: None,
        }
    }

    /// Append the newest frame, evicting the oldest when full
    pub fn append(&mut self, snapshot: FrameSnapshot) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Nominal frame interval in seconds
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop all frames (the calibration baseline is kept)
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frame `offset` frames before the current one (0 = current)
    pub fn frame(&self, offset: usize) -> Option<&FrameSnapshot> {
        let len = self.frames.len();
        if offset >= len {
            return None;
        }
        self.frames.get(len - 1 - offset)
    }

    pub fn current(&self) -> Option<&FrameSnapshot> {
        self.frame(0)
    }

    /// Capture time of the frame at `offset`
    pub fn timestamp(&self, offset: usize) -> Option<FrameTime> {
        self.frame(offset).map(FrameSnapshot::captured_at)
    }

    /// Capture time of the current frame
    pub fn now(&self) -> Option<FrameTime> {
        self.timestamp(0)
    }

    pub fn landmark(&self, id: LandmarkId, offset: usize) -> Option<Landmark> {
        self.frame(offset).and_then(|f| f.landmark(id)).copied()
    }

    pub fn position(&self, id: LandmarkId, offset: usize) -> Option<Point3> {
        self.frame(offset).and_then(|f| f.position(id))
    }

    /// Velocity over `window` frames, in normalized units per second
    ///
    /// `(p(0) - p(window - 1)) / ((window - 1) * dt)`
    pub fn velocity(&self, id: LandmarkId, window: usize) -> Option<Point3> {
        if window < 2 || self.frames.len() < window {
            return None;
        }
        let current = self.position(id, 0)?;
        let past = self.position(id, window - 1)?;
        Some((current - past) / ((window - 1) as f32 * self.dt))
    }

    /// Magnitude of the velocity over `window` frames
    pub fn speed(&self, id: LandmarkId, window: usize) -> Option<f32> {
        self.velocity(id, window).map(|v| v.norm())
    }

    /// Acceleration from the velocities of the two halves of `window`
    pub fn acceleration(&self, id: LandmarkId, window: usize) -> Option<Point3> {
        let half = window / 2;
        if half == 0 || self.frames.len() <= 2 * half {
            return None;
        }
        let span = half as f32 * self.dt;
        let p0 = self.position(id, 0)?;
        let p1 = self.position(id, half)?;
        let p2 = self.position(id, 2 * half)?;
        let recent = (p0 - p1) / span;
        let earlier = (p1 - p2) / span;
        Some((recent - earlier) / span)
    }

    /// Distance between two landmarks in the current frame
    pub fn distance(&self, a: LandmarkId, b: LandmarkId) -> Option<f32> {
        let pa = self.position(a, 0)?;
        let pb = self.position(b, 0)?;
        Some(pa.distance(&pb))
    }

    /// Offset of `id` from `reference` in the current frame
    pub fn relative_position(&self, id: LandmarkId, reference: LandmarkId) -> Option<Point3> {
        let target = self.position(id, 0)?;
        let origin = self.position(reference, 0)?;
        Some(target - origin)
    }

    /// Spread of the vertical coordinate over the last `window` frames
    ///
    /// Absent when fewer than half of the window's frames carry the landmark.
    pub fn y_range(&self, id: LandmarkId, window: usize) -> Option<f32> {
        let ys = self.vertical_series(id, window);
        if ys.is_empty() || ys.len() < window / 2 {
            return None;
        }
        let (min, max) = ys
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| (lo.min(*y), hi.max(*y)));
        Some(max - min)
    }

    /// Detect sustained back-and-forth vertical motion
    ///
    /// Counts direction reversals of the frame-to-frame vertical delta over
    /// `window` frames, considering only deltas whose magnitude exceeds
    /// `threshold`. True iff at least `min_peaks` reversals were seen.
    pub fn is_oscillating(&self, id: LandmarkId, threshold: f32, window: usize, min_peaks: usize) -> bool {
        if window < 3 || self.frames.len() < window {
            return false;
        }
        let ys = self.vertical_series(id, window);
        if ys.len() < 3 || ys.len() < window / 2 {
            return false;
        }

        let mut reversals = 0;
        for i in 1..ys.len() - 1 {
            let before = ys[i] - ys[i - 1];
            if before.abs() <= threshold {
                continue;
            }
            let after = ys[i + 1] - ys[i];
            if sign(before) != 0 && sign(before) != sign(after) {
                reversals += 1;
            }
        }
        reversals >= min_peaks
    }

    /// Store a reference snapshot for relative measurement
    pub fn set_calibration_baseline(&mut self, snapshot: FrameSnapshot) {
        self.baseline = Some(snapshot);
    }

    pub fn calibration_baseline(&self) -> Option<&FrameSnapshot> {
        self.baseline.as_ref()
    }

    /// Vertical coordinates of `id` over the last `window` frames, oldest
    /// first, skipping frames where it is missing
    fn vertical_series(&self, id: LandmarkId, window: usize) -> Vec<f32> {
        let depth = window.min(self.frames.len());
        (0..depth)
            .rev()
            .filter_map(|offset| self.position(id, offset))
            .map(|p| p.y)
            .collect()
    }
}

fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
