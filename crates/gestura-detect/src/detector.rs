//! Detector capability and registry

use gestura_history::LandmarkHistory;

use crate::{
    AttackDetector, CursorDetector, Detection, DetectorConfig, DetectorKind, FrameDetections,
    InventoryOpenDetector, LookDetector, MenuCloseDetector, MiningDetector, PlacingDetector,
    ScrollDetector, ShieldDetector, StrafeDetector, WalkDetector,
};

/// A gesture detector
///
/// A detector is a function of the landmark history and its own private
/// state. It never observes another detector.
pub trait Detector {
    fn kind(&self) -> DetectorKind;

    /// Evaluate the current frame
    ///
    /// Missing landmarks or a degenerate body scale yield `None`, except that
    /// a detector in the middle of a hold reports its own stop.
    fn detect(&mut self, history: &LandmarkHistory) -> Option<Detection>;

    /// Return to the initial state
    fn reset(&mut self);
}

struct Entry {
    detector: Box<dyn Detector>,
    enabled: bool,
}

/// Flat set of detectors, at most one per kind
pub struct DetectorRegistry {
    entries: Vec<Entry>,
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry holding every built-in detector, all enabled
    pub fn from_config(config: &DetectorConfig) -> Self {
        let scale = &config.scale;
        let mut registry = Self::new();
        registry.register(Box::new(AttackDetector::new(config.attack.clone(), scale.clone())));
        registry.register(Box::new(MiningDetector::new(config.mining.clone(), scale.clone())));
        registry.register(Box::new(PlacingDetector::new(config.placing.clone(), scale.clone())));
        registry.register(Box::new(ShieldDetector::new(config.shield.clone(), scale.clone())));
        registry.register(Box::new(WalkDetector::new(config.walk.clone(), scale.clone())));
        registry.register(Box::new(StrafeDetector::new(config.strafe.clone(), scale.clone())));
        registry.register(Box::new(InventoryOpenDetector::new(
            config.inventory_open.clone(),
            scale.clone(),
        )));
        registry.register(Box::new(MenuCloseDetector::new(
            config.menu_close.clone(),
            scale.clone(),
        )));
        registry.register(Box::new(CursorDetector::new(config.cursor.clone(), scale.clone())));
        registry.register(Box::new(LookDetector::new(config.look.clone(), scale.clone())));
        registry.register(Box::new(ScrollDetector::new(config.scroll.clone(), scale.clone())));
        registry
    }

    /// Add a detector, replacing any registered detector of the same kind
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        let kind = detector.kind();
        let entry = Entry {
            detector,
            enabled: true,
        };
        match self.entries.iter_mut().find(|e| e.detector.kind() == kind) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Run every enabled detector on the current frame
    pub fn detect_all(&mut self, history: &LandmarkHistory) -> FrameDetections {
        let mut frame = FrameDetections::new();
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            if let Some(detection) = entry.detector.detect(history) {
                frame.insert(detection);
            }
        }
        frame
    }

    /// Returns false if no detector of this kind is registered
    pub fn enable(&mut self, kind: DetectorKind) -> bool {
        self.set_enabled(kind, true)
    }

    /// Disabling also resets the detector, so it restarts cleanly
    pub fn disable(&mut self, kind: DetectorKind) -> bool {
        self.set_enabled(kind, false)
    }

    pub fn is_enabled(&self, kind: DetectorKind) -> bool {
        self.entries
            .iter()
            .any(|e| e.enabled && e.detector.kind() == kind)
    }

    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.detector.reset();
        }
    }

    pub fn kinds(&self) -> Vec<DetectorKind> {
        self.entries.iter().map(|e| e.detector.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set_enabled(&mut self, kind: DetectorKind, enabled: bool) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.detector.kind() == kind) else {
            return false;
        };
        if entry.enabled && !enabled {
            entry.detector.reset();
        }
        if entry.enabled != enabled {
            tracing::info!("Detector {} {}", kind, if enabled { "enabled" } else { "disabled" });
        }
        entry.enabled = enabled;
        true
    }
}
