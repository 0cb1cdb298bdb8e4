//! Detector configuration

use std::time::Duration;

use gestura_core::GesturaResult;

use crate::{
    AttackConfig, CrossingConfig, CursorConfig, LookConfig, MiningConfig, PlacingConfig,
    ScaleConfig, ScrollConfig, ShieldConfig, StrafeConfig, WalkConfig,
};

/// Configuration for every built-in detector
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    pub scale: ScaleConfig,
    pub attack: AttackConfig,
    pub mining: MiningConfig,
    pub placing: PlacingConfig,
    pub shield: ShieldConfig,
    pub walk: WalkConfig,
    pub strafe: StrafeConfig,
    pub inventory_open: CrossingConfig,
    pub menu_close: CrossingConfig,
    pub cursor: CursorConfig,
    pub look: LookConfig,
    pub scroll: ScrollConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            scale: ScaleConfig::default(),
            attack: AttackConfig::default(),
            mining: MiningConfig::default(),
            placing: PlacingConfig::default(),
            shield: ShieldConfig::default(),
            walk: WalkConfig::default(),
            strafe: StrafeConfig::default(),
            inventory_open: CrossingConfig::inventory_open(),
            menu_close: CrossingConfig::menu_close(),
            cursor: CursorConfig::default(),
            look: LookConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Lower thresholds and shorter confirmations for small or distant subjects
    pub fn responsive() -> Self {
        let mut config = Self::default();
        config.attack.min_speed_x = 1.4;
        config.attack.cooldown = Duration::from_millis(250);
        config.mining.swing_enter = 1.0;
        config.placing.min_growth_rate = 0.2;
        config.walk.enter = 0.22;
        config.walk.stable_frames = 2;
        config.strafe.left_enter = 0.02;
        config.strafe.right_enter = 0.02;
        config.strafe.confirm_frames = 2;
        config.look.ratio_threshold = 1.6;
        config.scroll.window = 4;
        config
    }

    /// Higher thresholds and longer confirmations against false triggers
    pub fn strict() -> Self {
        let mut config = Self::default();
        config.attack.min_speed_x = 2.2;
        config.attack.max_speed_y = 0.6;
        config.attack.cooldown = Duration::from_millis(400);
        config.mining.swing_enter = 1.5;
        config.mining.swings_required = 3;
        config.placing.min_growth_rate = 0.35;
        config.walk.enter = 0.35;
        config.walk.stable_frames = 4;
        config.strafe.left_enter = 0.035;
        config.strafe.right_enter = 0.035;
        config.strafe.confirm_frames = 4;
        config.shield.enter_angle = 30.0;
        config.look.ratio_threshold = 2.6;
        config.scroll.window = 7;
        config
    }

    /// Longest frame window any detector reads from the history
    pub fn required_history(&self) -> usize {
        [
            self.attack.velocity_window,
            self.mining.velocity_window,
            self.walk.velocity_window,
            self.walk.range_window,
            self.walk.min_history,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn validate(&self) -> GesturaResult<()> {
        self.scale.validate()?;
        self.attack.validate()?;
        self.mining.validate()?;
        self.placing.validate()?;
        self.shield.validate()?;
        self.walk.validate()?;
        self.strafe.validate()?;
        self.inventory_open.validate()?;
        self.menu_close.validate()?;
        self.cursor.validate()?;
        self.look.validate()?;
        self.scroll.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestura_core::GesturaError;

    #[test]
    fn test_presets_validate() {
        assert!(DetectorConfig::default().validate().is_ok());
        assert!(DetectorConfig::responsive().validate().is_ok());
        assert!(DetectorConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_presets_are_ordered() {
        let responsive = DetectorConfig::responsive();
        let default = DetectorConfig::default();
        let strict = DetectorConfig::strict();
        assert!(responsive.attack.min_speed_x < default.attack.min_speed_x);
        assert!(default.attack.min_speed_x < strict.attack.min_speed_x);
        assert!(responsive.walk.enter < strict.walk.enter);
    }

    #[test]
    fn test_required_history() {
        assert_eq!(DetectorConfig::default().required_history(), 15);
    }

    #[test]
    fn test_invalid_member_rejected() {
        let mut config = DetectorConfig::default();
        config.shield.exit_angle = 10.0;
        assert!(matches!(config.validate(), Err(GesturaError::InvalidConfig(_))));
    }
}
