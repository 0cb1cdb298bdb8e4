//! Idempotent actuation state
//!
//! Wraps an [`Actuator`] and remembers which controls are pressed. A press of
//! a pressed control or a release of a released one never reaches the
//! actuator.

use std::collections::BTreeSet;

use crate::{ActuationResult, Actuator, Button, Key};

/// Controls currently held and the last absolute cursor position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActuationState {
    pub pressed_keys: BTreeSet<Key>,
    pub pressed_buttons: BTreeSet<Button>,
    pub cursor: Option<(i32, i32)>,
}

impl ActuationState {
    pub fn is_idle(&self) -> bool {
        self.pressed_keys.is_empty() && self.pressed_buttons.is_empty()
    }
}

/// Actuator plus the state needed to keep its calls idempotent
pub struct Actuation<A> {
    actuator: A,
    state: ActuationState,
}

impl<A: Actuator> Actuation<A> {
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            state: ActuationState::default(),
        }
    }

    pub fn state(&self) -> &ActuationState {
        &self.state
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn into_inner(self) -> A {
        self.actuator
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.state.pressed_keys.contains(&key)
    }

    pub fn is_button_pressed(&self, button: Button) -> bool {
        self.state.pressed_buttons.contains(&button)
    }

    /// Returns whether a call was issued
    pub fn press_key(&mut self, key: Key) -> ActuationResult<bool> {
        if self.is_key_pressed(key) {
            return Ok(false);
        }
        self.actuator.press_key(key)?;
        self.state.pressed_keys.insert(key);
        Ok(true)
    }

    /// Returns whether a call was issued
    pub fn release_key(&mut self, key: Key) -> ActuationResult<bool> {
        if !self.is_key_pressed(key) {
            return Ok(false);
        }
        self.actuator.release_key(key)?;
        self.state.pressed_keys.remove(&key);
        Ok(true)
    }

    /// Press then release
    pub fn tap_key(&mut self, key: Key) -> ActuationResult<()> {
        self.press_key(key)?;
        self.release_key(key)?;
        Ok(())
    }

    pub fn press_button(&mut self, button: Button) -> ActuationResult<bool> {
        if self.is_button_pressed(button) {
            return Ok(false);
        }
        self.actuator.press_button(button)?;
        self.state.pressed_buttons.insert(button);
        Ok(true)
    }

    pub fn release_button(&mut self, button: Button) -> ActuationResult<bool> {
        if !self.is_button_pressed(button) {
            return Ok(false);
        }
        self.actuator.release_button(button)?;
        self.state.pressed_buttons.remove(&button);
        Ok(true)
    }

    pub fn click(&mut self, button: Button, count: u32) -> ActuationResult<()> {
        self.actuator.click(button, count)
    }

    pub fn move_cursor_relative(&mut self, dx: i32, dy: i32) -> ActuationResult<bool> {
        if dx == 0 && dy == 0 {
            return Ok(false);
        }
        self.actuator.move_cursor_relative(dx, dy)?;
        Ok(true)
    }

    /// Skipped when the cursor is already at `(x, y)`
    pub fn set_cursor_absolute(&mut self, x: i32, y: i32) -> ActuationResult<bool> {
        if self.state.cursor == Some((x, y)) {
            return Ok(false);
        }
        self.actuator.set_cursor_absolute(x, y)?;
        self.state.cursor = Some((x, y));
        Ok(true)
    }

    pub fn scroll(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
        self.actuator.scroll(dx, dy)
    }

    pub fn clear_cursor(&mut self) {
        self.state.cursor = None;
    }

    /// Release every held button, attempting all of them
    pub fn release_buttons(&mut self) -> ActuationResult<()> {
        let buttons: Vec<Button> = self.state.pressed_buttons.iter().copied().collect();
        let mut first_error = None;
        for button in buttons {
            if let Err(err) = self.actuator.release_button(button) {
                tracing::warn!("Release of {} button failed: {}", button, err);
                first_error.get_or_insert(err);
            }
            self.state.pressed_buttons.remove(&button);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Release every held key and button, attempting all of them
    ///
    /// State is cleared even when a release fails, so a broken actuator
    /// cannot leave phantom held controls behind.
    pub fn release_all(&mut self) -> ActuationResult<()> {
        let keys: Vec<Key> = self.state.pressed_keys.iter().copied().collect();
        let mut first_error = None;
        for key in keys {
            if let Err(err) = self.actuator.release_key(key) {
                tracing::warn!("Release of key {} failed: {}", key, err);
                first_error.get_or_insert(err);
            }
            self.state.pressed_keys.remove(&key);
        }
        if let Err(err) = self.release_buttons() {
            first_error.get_or_insert(err);
        }
        first_error.map_or(Ok(()), Err)
    }
}
