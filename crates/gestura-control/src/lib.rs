//! Gestura Control - Action coordination
//!
//! Turns per-frame detections into keyboard and mouse actions:
//! - Actuator trait for OS-level input injection
//! - Idempotent press/release bookkeeping
//! - Gameplay / Menu mode machine with hand-slot arbitration
//!
//! An actuator failure never escapes a frame: the coordinator releases
//! everything it holds, returns to Gameplay and reports the failure.

pub mod actuation;
pub mod actuator;
pub mod config;
pub mod coordinator;
pub mod error;

pub use actuation::*;
pub use actuator::*;
pub use config::*;
pub use coordinator::*;
pub use error::*;

#[cfg(test)]
pub(crate) mod testing {
    use crate::{ActuationError, ActuationResult, Actuator, Button, Key};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Call {
        PressKey(Key),
        ReleaseKey(Key),
        PressButton(Button),
        ReleaseButton(Button),
        Click(Button, u32),
        MoveRelative(i32, i32),
        SetAbsolute(i32, i32),
        Scroll(i32, i32),
    }

    /// Records successful calls and rejects one chosen call
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub calls: Vec<Call>,
        fail_on: Option<Call>,
    }

    impl Recorder {
        pub fn failing_on(call: Call) -> Self {
            Recorder {
                calls: Vec::new(),
                fail_on: Some(call),
            }
        }

        fn record(&mut self, call: Call) -> ActuationResult<()> {
            if self.fail_on == Some(call) {
                return Err(ActuationError::rejected(format!("{:?}", call), "injected"));
            }
            self.calls.push(call);
            Ok(())
        }
    }

    impl Actuator for Recorder {
        fn press_key(&mut self, key: Key) -> ActuationResult<()> {
            self.record(Call::PressKey(key))
        }

        fn release_key(&mut self, key: Key) -> ActuationResult<()> {
            self.record(Call::ReleaseKey(key))
        }

        fn press_button(&mut self, button: Button) -> ActuationResult<()> {
            self.record(Call::PressButton(button))
        }

        fn release_button(&mut self, button: Button) -> ActuationResult<()> {
            self.record(Call::ReleaseButton(button))
        }

        fn click(&mut self, button: Button, count: u32) -> ActuationResult<()> {
            self.record(Call::Click(button, count))
        }

        fn move_cursor_relative(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
            self.record(Call::MoveRelative(dx, dy))
        }

        fn set_cursor_absolute(&mut self, x: i32, y: i32) -> ActuationResult<()> {
            self.record(Call::SetAbsolute(x, y))
        }

        fn scroll(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
            self.record(Call::Scroll(dx, dy))
        }
    }
}
