//! Action coordinator
//!
//! Reduces the detections of one frame to a consistent stream of actuator
//! calls and drives the Gameplay / Menu mode machine.
//!
//! Arbitration in Gameplay:
//! - Movement: strafe left > strafe right > backward > forward, one key held
//! - Left hand: menu close (ignored) > inventory open (mode switch) > shield
//! - Right hand: placing > attack > mining; a winning tap releases the hold
//!
//! In Menu only the cursor and the menu-close gesture are honoured.

use std::collections::VecDeque;

use gestura_detect::{Detection, DetectorKind, FrameDetections, LeanDirection, ScrollDirection};

use crate::{Actuation, ActuationError, ActuationResult, Actuator, Button, ControlConfig, Key};

/// Which detectors the coordinator honours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMode {
    Gameplay,
    Menu,
}

/// A held action occupying a hand slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Shield,
    Mining,
}

impl SlotAction {
    pub fn button(self) -> Button {
        match self {
            SlotAction::Shield => Button::Right,
            SlotAction::Mining => Button::Left,
        }
    }
}

/// A discrete action issued by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShotAction {
    Click(Button),
    KeyTap(Key),
    Scroll(ScrollDirection),
}

/// Mode change performed in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: ControlMode,
    pub to: ControlMode,
    /// Triggered by a gesture rather than the pointer signal
    pub by_gesture: bool,
}

/// Result of one [`ActionCoordinator::execute`] call
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub mode: ControlMode,
    pub transition: Option<ModeTransition>,
    /// Actuator failure; the coordinator has already reset itself
    pub failure: Option<ActuationError>,
}

impl FrameOutcome {
    /// Detector state no longer matches the coordinator
    pub fn requires_detector_reset(&self) -> bool {
        self.transition.is_some() || self.failure.is_some()
    }
}

/// Snapshot of the coordinator for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ControlStatus {
    pub mode: ControlMode,
    pub movement: Option<Key>,
    pub left_slot: Option<SlotAction>,
    pub right_slot: Option<SlotAction>,
    pub pressed_keys: Vec<Key>,
    pub pressed_buttons: Vec<Button>,
    pub cursor: Option<(i32, i32)>,
    /// Most recent first
    pub recent_actions: Vec<OneShotAction>,
    /// Detections of the last frame that lost arbitration or were not
    /// honoured in the current mode
    pub suppressed: Vec<DetectorKind>,
}

/// Owns the actuation state and the mode machine
pub struct ActionCoordinator<A> {
    config: ControlConfig,
    actuation: Actuation<A>,
    mode: ControlMode,
    movement: Option<Key>,
    left_slot: Option<SlotAction>,
    right_slot: Option<SlotAction>,
    /// Held scroll direction and frames since its last notch
    scroll: Option<(ScrollDirection, u32)>,
    pointer_free: Option<bool>,
    recent: VecDeque<OneShotAction>,
    suppressed: Vec<DetectorKind>,
}

impl<A: Actuator> ActionCoordinator<A> {
    pub fn new(config: ControlConfig, actuator: A) -> Self {
        Self {
            config,
            actuation: Actuation::new(actuator),
            mode: ControlMode::Gameplay,
            movement: None,
            left_slot: None,
            right_slot: None,
            scroll: None,
            pointer_free: None,
            recent: VecDeque::new(),
            suppressed: Vec::new(),
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn actuation(&self) -> &Actuation<A> {
        &self.actuation
    }

    pub fn actuator(&self) -> &A {
        self.actuation.actuator()
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        self.actuation.actuator_mut()
    }

    pub fn into_actuator(self) -> A {
        self.actuation.into_inner()
    }

    /// Act on one frame of detections
    ///
    /// `pointer_free` is the OS report of whether the pointer is released
    /// (a game menu is showing). Its edges switch modes; the first sample
    /// only sets the baseline.
    pub fn execute(&mut self, detections: &FrameDetections, pointer_free: bool) -> FrameOutcome {
        self.suppressed.clear();
        let previous = self.pointer_free.replace(pointer_free);

        match self.dispatch(detections, previous, pointer_free) {
            Ok(transition) => FrameOutcome {
                mode: self.mode,
                transition,
                failure: None,
            },
            Err(err) => {
                tracing::error!("Actuation failed in {:?} mode: {}", self.mode, err);
                if let Err(reset_err) = self.reset() {
                    tracing::error!("Release after failure also failed: {}", reset_err);
                }
                FrameOutcome {
                    mode: self.mode,
                    transition: None,
                    failure: Some(err),
                }
            }
        }
    }

    /// Release everything and return to Gameplay
    ///
    /// State is cleared even if a release fails; the first failure is
    /// returned.
    pub fn reset(&mut self) -> ActuationResult<()> {
        let released = self.actuation.release_all();
        self.actuation.clear_cursor();
        if self.mode != ControlMode::Gameplay {
            tracing::info!("Mode {:?} -> Gameplay (reset)", self.mode);
        }
        self.mode = ControlMode::Gameplay;
        self.clear_actions();
        self.pointer_free = None;
        self.recent.clear();
        self.suppressed.clear();
        released
    }

    pub fn status(&self) -> ControlStatus {
        let state = self.actuation.state();
        ControlStatus {
            mode: self.mode,
            movement: self.movement,
            left_slot: self.left_slot,
            right_slot: self.right_slot,
            pressed_keys: state.pressed_keys.iter().copied().collect(),
            pressed_buttons: state.pressed_buttons.iter().copied().collect(),
            cursor: state.cursor,
            recent_actions: self.recent.iter().rev().copied().collect(),
            suppressed: self.suppressed.clone(),
        }
    }

    fn dispatch(
        &mut self,
        detections: &FrameDetections,
        previous_pointer: Option<bool>,
        pointer_free: bool,
    ) -> ActuationResult<Option<ModeTransition>> {
        if let Some((transition, trigger)) = self.mode_trigger(detections, previous_pointer, pointer_free) {
            self.suppress_all_except(detections, trigger);
            self.switch_mode(transition)?;
            return Ok(Some(transition));
        }
        match self.mode {
            ControlMode::Gameplay => self.gameplay(detections)?,
            ControlMode::Menu => self.menu(detections)?,
        }
        Ok(None)
    }

    /// Gesture triggers win over pointer edges
    fn mode_trigger(
        &self,
        detections: &FrameDetections,
        previous_pointer: Option<bool>,
        pointer_free: bool,
    ) -> Option<(ModeTransition, Option<DetectorKind>)> {
        let (to, gesture, pointer_edge) = match self.mode {
            ControlMode::Gameplay => (
                ControlMode::Menu,
                DetectorKind::InventoryOpen,
                previous_pointer == Some(false) && pointer_free,
            ),
            ControlMode::Menu => (
                ControlMode::Gameplay,
                DetectorKind::MenuClose,
                previous_pointer == Some(true) && !pointer_free,
            ),
        };
        let transition = |by_gesture| ModeTransition {
            from: self.mode,
            to,
            by_gesture,
        };
        if detections.contains(gesture) {
            Some((transition(true), Some(gesture)))
        } else if pointer_edge {
            Some((transition(false), None))
        } else {
            None
        }
    }

    fn switch_mode(&mut self, transition: ModeTransition) -> ActuationResult<()> {
        tracing::info!(
            "Mode {:?} -> {:?} ({})",
            transition.from,
            transition.to,
            if transition.by_gesture { "gesture" } else { "pointer" }
        );
        self.mode = transition.to;
        self.clear_actions();
        self.actuation.release_all()?;

        let (key, tap) = match transition.to {
            ControlMode::Menu => (self.config.keys.open_inventory, transition.by_gesture),
            ControlMode::Gameplay => {
                self.actuation.clear_cursor();
                (
                    self.config.keys.dismiss,
                    transition.by_gesture || self.config.tap_on_pointer_exit,
                )
            }
        };
        if tap {
            self.actuation.tap_key(key)?;
            self.record(OneShotAction::KeyTap(key));
        }
        Ok(())
    }

    fn gameplay(&mut self, detections: &FrameDetections) -> ActuationResult<()> {
        self.update_movement(detections)?;
        self.update_left_hand(detections)?;
        self.update_right_hand(detections)?;

        if let Some(Detection::Look { dx, dy, .. }) = detections.get(DetectorKind::Look) {
            let sensitivity = self.config.look_sensitivity;
            let dx = (dx * sensitivity).round() as i32;
            let dy = (dy * sensitivity).round() as i32;
            self.actuation.move_cursor_relative(dx, dy)?;
        }

        self.update_scroll(detections)?;
        self.suppress(detections, &[DetectorKind::Cursor, DetectorKind::MenuClose]);
        Ok(())
    }

    fn menu(&mut self, detections: &FrameDetections) -> ActuationResult<()> {
        for detection in detections.iter() {
            let Detection::Cursor { x, y, click, .. } = detection else {
                self.suppressed.push(detection.kind());
                continue;
            };
            self.actuation
                .set_cursor_absolute(x.round() as i32, y.round() as i32)?;
            if *click {
                self.actuation.click(Button::Left, 1)?;
                self.record(OneShotAction::Click(Button::Left));
            }
        }
        Ok(())
    }

    fn update_movement(&mut self, detections: &FrameDetections) -> ActuationResult<()> {
        let keys = &self.config.keys;
        let strafe = match detections.get(DetectorKind::Strafe) {
            Some(Detection::Strafe { direction, .. }) => Some(*direction),
            _ => None,
        };
        let (walking, backward) = match detections.get(DetectorKind::Walk) {
            Some(Detection::Walk {
                walking, backward, ..
            }) => (*walking, *backward),
            _ => (false, false),
        };

        let wanted = match strafe {
            Some(LeanDirection::Left) => Some(keys.left),
            Some(LeanDirection::Right) => Some(keys.right),
            None if backward => Some(keys.backward),
            None if walking => Some(keys.forward),
            None => None,
        };
        if strafe.is_some() && (walking || backward) {
            self.suppressed.push(DetectorKind::Walk);
        }
        if wanted == self.movement {
            return Ok(());
        }

        if let Some(old) = self.movement.take() {
            self.actuation.release_key(old)?;
        }
        if let Some(new) = wanted {
            self.actuation.press_key(new)?;
            self.movement = Some(new);
        }
        tracing::debug!("Movement -> {:?}", wanted);
        Ok(())
    }

    fn update_left_hand(&mut self, detections: &FrameDetections) -> ActuationResult<()> {
        let wanted = match detections.get(DetectorKind::Shield) {
            Some(Detection::Shield { phase, .. }) if phase.is_held() => Some(SlotAction::Shield),
            _ => None,
        };
        let slot = self.left_slot;
        self.left_slot = self.apply_slot(slot, wanted)?;
        Ok(())
    }

    fn update_right_hand(&mut self, detections: &FrameDetections) -> ActuationResult<()> {
        let tap = if detections.contains(DetectorKind::Placing) {
            self.suppress(detections, &[DetectorKind::Attack, DetectorKind::Mining]);
            Some(Button::Right)
        } else if detections.contains(DetectorKind::Attack) {
            self.suppress(detections, &[DetectorKind::Mining]);
            Some(Button::Left)
        } else {
            None
        };

        if let Some(button) = tap {
            let slot = self.right_slot;
            self.right_slot = self.apply_slot(slot, None)?;
            self.actuation.click(button, 1)?;
            self.record(OneShotAction::Click(button));
            return Ok(());
        }

        let wanted = match detections.get(DetectorKind::Mining) {
            Some(Detection::Mining { phase }) if phase.is_held() => Some(SlotAction::Mining),
            _ => None,
        };
        let slot = self.right_slot;
        self.right_slot = self.apply_slot(slot, wanted)?;
        Ok(())
    }

    /// Move a hand slot from `current` to `wanted`, returning the new holder
    fn apply_slot(
        &mut self,
        current: Option<SlotAction>,
        wanted: Option<SlotAction>,
    ) -> ActuationResult<Option<SlotAction>> {
        if current == wanted {
            return Ok(current);
        }
        if let Some(held) = current {
            self.actuation.release_button(held.button())?;
            tracing::debug!("Released {:?}", held);
        }
        if let Some(action) = wanted {
            self.actuation.press_button(action.button())?;
            tracing::debug!("Holding {:?}", action);
        }
        Ok(wanted)
    }

    fn update_scroll(&mut self, detections: &FrameDetections) -> ActuationResult<()> {
        let direction = match detections.get(DetectorKind::Scroll) {
            Some(Detection::Scroll { direction, .. }) => *direction,
            _ => None,
        };
        let Some(direction) = direction else {
            self.scroll = None;
            return Ok(());
        };

        let due = match self.scroll {
            Some((held, frames)) if held == direction => {
                let frames = frames + 1;
                let due = frames >= self.config.scroll_repeat_frames;
                self.scroll = Some((direction, if due { 0 } else { frames }));
                due
            }
            _ => {
                self.scroll = Some((direction, 0));
                true
            }
        };
        if due {
            let notch = match direction {
                ScrollDirection::Up => 1,
                ScrollDirection::Down => -1,
            };
            self.actuation.scroll(0, notch)?;
            self.record(OneShotAction::Scroll(direction));
        }
        Ok(())
    }

    fn clear_actions(&mut self) {
        self.movement = None;
        self.left_slot = None;
        self.right_slot = None;
        self.scroll = None;
    }

    fn record(&mut self, action: OneShotAction) {
        if self.recent.len() == self.config.recent_actions {
            self.recent.pop_front();
        }
        if self.config.recent_actions > 0 {
            self.recent.push_back(action);
        }
    }

    fn suppress(&mut self, detections: &FrameDetections, kinds: &[DetectorKind]) {
        for kind in kinds {
            if detections.contains(*kind) {
                self.suppressed.push(*kind);
            }
        }
    }

    fn suppress_all_except(&mut self, detections: &FrameDetections, trigger: Option<DetectorKind>) {
        for kind in detections.kinds() {
            if Some(kind) != trigger {
                self.suppressed.push(kind);
            }
        }
    }
}
