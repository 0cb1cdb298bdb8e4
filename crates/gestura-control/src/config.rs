//! Coordinator configuration

use gestura_core::{GesturaError, GesturaResult};

use crate::Key;

/// Keys issued by the coordinator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
    /// Tapped when the inventory gesture enters the menu
    pub open_inventory: Key,
    /// Tapped when the menu-close gesture leaves the menu
    pub dismiss: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            forward: Key::Char('w'),
            backward: Key::Char('s'),
            left: Key::Char('a'),
            right: Key::Char('d'),
            open_inventory: Key::Char('e'),
            dismiss: Key::Escape,
        }
    }
}

impl KeyBindings {
    fn movement(&self) -> [Key; 4] {
        [self.forward, self.backward, self.left, self.right]
    }
}

/// Action coordinator configuration
#[derive(Clone, Debug)]
pub struct ControlConfig {
    /// Multiplier from look deltas to relative cursor pixels
    pub look_sensitivity: f32,
    /// Frames between repeated scroll notches while a direction is held
    pub scroll_repeat_frames: u32,
    /// One-shot actions kept for status reporting
    pub recent_actions: usize,
    /// Tap the dismiss key when the pointer is recaptured, not only on the
    /// menu-close gesture
    pub tap_on_pointer_exit: bool,
    pub keys: KeyBindings,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            look_sensitivity: 5.0,
            scroll_repeat_frames: 6,
            recent_actions: 8,
            tap_on_pointer_exit: false,
            keys: KeyBindings::default(),
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> GesturaResult<()> {
        if !(self.look_sensitivity.is_finite() && self.look_sensitivity >= 0.0) {
            return Err(GesturaError::InvalidConfig(format!(
                "look sensitivity must be non-negative, got {}",
                self.look_sensitivity
            )));
        }
        if self.scroll_repeat_frames == 0 {
            return Err(GesturaError::InvalidConfig(
                "scroll repeat interval must be at least one frame".into(),
            ));
        }
        let movement = self.keys.movement();
        for (i, key) in movement.iter().enumerate() {
            if movement[i + 1..].contains(key) {
                return Err(GesturaError::InvalidConfig(format!(
                    "movement key {} is bound twice",
                    key
                )));
            }
        }
        Ok(())
    }
}
