//! Session configuration

use gestura_control::ControlConfig;
use gestura_core::{GesturaError, GesturaResult};
use gestura_detect::DetectorConfig;
use gestura_history::HistoryConfig;

/// Top-level configuration of a session
#[derive(Clone, Debug, Default)]
pub struct GesturaConfig {
    pub history: HistoryConfig,
    pub detectors: DetectorConfig,
    pub control: ControlConfig,
}

impl GesturaConfig {
    /// Lower thresholds and shorter confirmations
    pub fn responsive() -> Self {
        GesturaConfig {
            detectors: DetectorConfig::responsive(),
            ..Default::default()
        }
    }

    /// Higher thresholds for noisy tracking
    pub fn strict() -> Self {
        GesturaConfig {
            detectors: DetectorConfig::strict(),
            ..Default::default()
        }
    }

    /// Default detectors with one second of history at `fps`
    pub fn at_fps(fps: f32) -> Self {
        GesturaConfig {
            history: HistoryConfig::at_fps(fps),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> GesturaResult<()> {
        self.history.validate()?;
        self.detectors.validate()?;
        self.control.validate()?;

        let required = self.detectors.required_history();
        if self.history.capacity < required {
            return Err(GesturaError::InvalidConfig(format!(
                "history capacity {} is shorter than the {} frames the detectors read",
                self.history.capacity, required
            )));
        }
        Ok(())
    }
}
