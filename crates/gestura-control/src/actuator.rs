//! Input actuator seam
//!
//! The actuator injects keyboard and mouse events into the OS. Every call
//! returns a result; the coordinator treats a failure as a recoverable event.

use std::fmt;

use crate::ActuationResult;

/// Keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Printable key, lower case
    Char(char),
    Escape,
    Space,
    Shift,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Escape => write!(f, "escape"),
            Key::Space => write!(f, "space"),
            Key::Shift => write!(f, "shift"),
        }
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Button::Left => "left",
            Button::Right => "right",
            Button::Middle => "middle",
        };
        f.write_str(name)
    }
}

/// OS-level input injector
///
/// Cursor coordinates are screen pixels; scroll amounts are notches.
pub trait Actuator {
    fn press_key(&mut self, key: Key) -> ActuationResult<()>;
    fn release_key(&mut self, key: Key) -> ActuationResult<()>;
    fn press_button(&mut self, button: Button) -> ActuationResult<()>;
    fn release_button(&mut self, button: Button) -> ActuationResult<()>;
    fn click(&mut self, button: Button, count: u32) -> ActuationResult<()>;
    fn move_cursor_relative(&mut self, dx: i32, dy: i32) -> ActuationResult<()>;
    fn set_cursor_absolute(&mut self, x: i32, y: i32) -> ActuationResult<()>;
    fn scroll(&mut self, dx: i32, dy: i32) -> ActuationResult<()>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn press_key(&mut self, key: Key) -> ActuationResult<()> {
        (**self).press_key(key)
    }

    fn release_key(&mut self, key: Key) -> ActuationResult<()> {
        (**self).release_key(key)
    }

    fn press_button(&mut self, button: Button) -> ActuationResult<()> {
        (**self).press_button(button)
    }

    fn release_button(&mut self, button: Button) -> ActuationResult<()> {
        (**self).release_button(button)
    }

    fn click(&mut self, button: Button, count: u32) -> ActuationResult<()> {
        (**self).click(button, count)
    }

    fn move_cursor_relative(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
        (**self).move_cursor_relative(dx, dy)
    }

    fn set_cursor_absolute(&mut self, x: i32, y: i32) -> ActuationResult<()> {
        (**self).set_cursor_absolute(x, y)
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> ActuationResult<()> {
        (**self).scroll(dx, dy)
    }
}
