//! History configuration

use gestura_core::{GesturaError, GesturaResult};

/// Landmark history configuration
#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// Number of frames retained
    pub capacity: usize,
    /// Nominal camera rate; velocity math assumes `dt = 1 / fps`
    pub fps: f32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        // About one second of motion at a typical webcam rate
        HistoryConfig {
            capacity: 30,
            fps: 30.0,
        }
    }
}

impl HistoryConfig {
    /// One second of history at the given camera rate
    pub fn at_fps(fps: f32) -> Self {
        HistoryConfig {
            capacity: fps.round().max(2.0) as usize,
            fps,
        }
    }

    /// Nominal frame interval in seconds
    pub fn dt(&self) -> f32 {
        1.0 / self.fps
    }

    pub fn validate(&self) -> GesturaResult<()> {
        if self.capacity < 2 {
            return Err(GesturaError::InvalidConfig(format!(
                "history capacity must be at least 2, got {}",
                self.capacity
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(GesturaError::InvalidConfig(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = HistoryConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.dt() - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_at_fps() {
        let config = HistoryConfig::at_fps(60.0);
        assert_eq!(config.capacity, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let tiny = HistoryConfig { capacity: 1, fps: 30.0 };
        assert!(tiny.validate().is_err());

        let frozen = HistoryConfig { capacity: 30, fps: 0.0 };
        assert!(frozen.validate().is_err());
    }
}
