//! Recording actuator with failure injection
//!
//! Records every accepted call, tracks which controls the OS would consider
//! held, and flags any press that would hold two exclusive keys at once.

use std::collections::BTreeSet;

use gestura_control::{ActuationError, ActuationResult, Actuator, Button, Key};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One actuator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    PressKey(Key),
    ReleaseKey(Key),
    PressButton(Button),
    ReleaseButton(Button),
    Click(Button, u32),
    MoveRelative(i32, i32),
    SetAbsolute(i32, i32),
    Scroll(i32, i32),
}

impl ActuatorCall {
    /// Whether the call touches `button` in any way
    pub fn involves_button(&self, button: Button) -> bool {
        match self {
            ActuatorCall::PressButton(b) | ActuatorCall::ReleaseButton(b) | ActuatorCall::Click(b, _) => {
                *b == button
            }
            _ => false,
        }
    }
}

/// When injected failures happen
#[derive(Debug, Clone)]
pub enum FailurePlan {
    Never,
    /// Reject every call equal to this one
    On(ActuatorCall),
    /// Reject every n-th call
    Every(usize),
    /// Reject each call with probability `rate`
    Random { rate: f64, seed: u64 },
}

/// Actuator double for scenarios and chaos runs
#[derive(Debug)]
pub struct RecordingActuator {
    calls: Vec<ActuatorCall>,
    rejected: Vec<ActuatorCall>,
    held_keys: BTreeSet<Key>,
    held_buttons: BTreeSet<Button>,
    exclusive: Vec<Key>,
    violations: Vec<String>,
    plan: FailurePlan,
    rng: Option<StdRng>,
    attempts: usize,
}

impl Default for RecordingActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            rejected: Vec::new(),
            held_keys: BTreeSet::new(),
            held_buttons: BTreeSet::new(),
            exclusive: Vec::new(),
            violations: Vec::new(),
            plan: FailurePlan::Never,
            rng: None,
            attempts: 0,
        }
    }

    pub fn with_failures(mut self, plan: FailurePlan) -> Self {
        self.rng = match &plan {
            FailurePlan::Random { seed, .. } => Some(StdRng::seed_from_u64(*seed)),
            _ => None,
        };
        self.plan = plan;
        self
    }

    /// Keys of which at most one may be held at any moment
    pub fn with_exclusive_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.exclusive = keys.into_iter().collect();
        self
    }

    /// Accepted calls in order
    pub fn calls(&self) -> &[ActuatorCall] {
        &self.calls
    }

    /// Calls that were rejected by the failure plan
    pub fn rejected(&self) -> &[ActuatorCall] {
        &self.rejected
    }

    pub fn held_keys(&self) -> &BTreeSet<Key> {
        &self.held_keys
    }

    pub fn held_buttons(&self) -> &BTreeSet<Button> {
        &self.held_buttons
    }

    pub fn is_idle(&self) -> bool {
        self.held_keys.is_empty() && self.held_buttons.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn count(&self, call: ActuatorCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.rejected.clear();
    }

    fn should_fail(&mut self, call: ActuatorCall) -> bool {
        self.attempts += 1;
        match &self.plan {
            FailurePlan::Never => false,
            FailurePlan::On(target) => *target == call,
            FailurePlan::Every(n) => *n > 0 && self.attempts % *n == 0,
            FailurePlan::Random { rate, .. } => {
                let rate = rate.clamp(0.0, 1.0);
                self.rng.as_mut().map_or(false, |rng| rng.gen_bool(rate))
            }
        }
    }

    fn accept(&mut self, call: ActuatorCall) -> ActuationResult<()> {
        if self.should_fail(call) {
            self.rejected.push(call);
            return Err(ActuationError::rejected(format!("{:?}", call), "injected failure"));
        }

        match call {
            ActuatorCall::PressKey(key) => {
                if self.exclusive.contains(&key) {
                    if let Some(other) = self.held_keys.iter().find(|k| **k != key && self.exclusive.contains(*k)) {
                        self.violations
                            .push(format!("{} pressed while {} held", key, other));
                    }
                }
                self.held_keys.insert(key);
            }
            ActuatorCall::ReleaseKey(key) => {
                self.held_keys.remove(&key);
            }
            ActuatorCall::PressButton(button) => {
                self.held_buttons.insert(button);
            }
            ActuatorCall::ReleaseButton(button) => {
                self.held_buttons.remove(&button);
            }
            _ => {}
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Actuator for RecordingActuator {
    fn press_key(&mut self, key: Key) -> ActuationResult<()> {
        self.accept(ActuatorCall::PressKey(key))
    }

    fn release_key(&mut self, key: Key) -> ActuationResult<()> {
        self.accept(ActuatorCall::ReleaseKey(key))
    }

    fn press_button(&mut self, button: Button) -> ActuationResult<()> {
        self.accept(ActuatorCall::PressButton(button))
    }

    fn release_button(&mut self, button: Button) -> ActuationResult<()> {
        self.accept(ActuatorCall::ReleaseButton(button))
    }

    fn click(&mut self, button: Button, count: u32) -> ActuationResult<()> {
        self.accept(ActuatorCall::Click(button, count))
    }

    fn move_cursor_relative(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
        self.accept(ActuatorCall::MoveRelative(dx, dy))
    }

    fn set_cursor_absolute(&mut self, x: i32, y: i32) -> ActuationResult<()> {
        self.accept(ActuatorCall::SetAbsolute(x, y))
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
        self.accept(ActuatorCall::Scroll(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_held_controls() {
        let mut actuator = RecordingActuator::new();
        actuator.press_key(Key::Char('w')).unwrap();
        actuator.press_button(Button::Left).unwrap();
        assert!(!actuator.is_idle());
        actuator.release_key(Key::Char('w')).unwrap();
        actuator.release_button(Button::Left).unwrap();
        assert!(actuator.is_idle());
        assert_eq!(actuator.calls().len(), 4);
    }

    #[test]
    fn test_exclusive_violation_flagged() {
        let mut actuator = RecordingActuator::new().with_exclusive_keys([Key::Char('w'), Key::Char('s')]);
        actuator.press_key(Key::Char('w')).unwrap();
        actuator.press_key(Key::Space).unwrap();
        assert!(actuator.violations().is_empty());
        actuator.press_key(Key::Char('s')).unwrap();
        assert_eq!(actuator.violations().len(), 1);
    }

    #[test]
    fn test_failure_plans() {
        let mut actuator = RecordingActuator::new().with_failures(FailurePlan::Every(2));
        assert!(actuator.scroll(0, 1).is_ok());
        assert!(actuator.scroll(0, 1).is_err());
        assert_eq!(actuator.rejected().len(), 1);

        let mut actuator =
            RecordingActuator::new().with_failures(FailurePlan::On(ActuatorCall::PressKey(Key::Escape)));
        assert!(actuator.press_key(Key::Escape).is_err());
        assert!(actuator.held_keys().is_empty());
        assert!(actuator.press_key(Key::Space).is_ok());

        let mut never = RecordingActuator::new().with_failures(FailurePlan::Random { rate: 0.0, seed: 7 });
        let mut always = RecordingActuator::new().with_failures(FailurePlan::Random { rate: 1.0, seed: 7 });
        assert!(never.click(Button::Left, 1).is_ok());
        assert!(always.click(Button::Left, 1).is_err());
    }
}
