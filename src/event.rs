//! Event types for the Fn key monitor.

use std::time::SystemTime;

/// Logical state of the Fn key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FnKeyState {
    /// The Fn key is held down.
    Pressed,
    /// The Fn key was released.
    Released,
}

impl FnKeyState {
    /// Derive the state from a raw HID integer value (`!= 0` means pressed).
    pub fn from_value(value: i64) -> Self {
        if value != 0 {
            FnKeyState::Pressed
        } else {
            FnKeyState::Released
        }
    }

    /// Check if this state represents a press.
    pub fn is_pressed(&self) -> bool {
        matches!(self, FnKeyState::Pressed)
    }
}

/// A single Fn key state transition.
///
/// Emitted once per matching HID value record, synchronously on the thread
/// running the event loop. The raw usage pair that matched is carried along
/// for diagnostics; most consumers only need [`FnKeyEvent::is_pressed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnKeyEvent {
    /// The new state of the Fn key.
    pub state: FnKeyState,
    /// Usage page of the matching HID element.
    pub usage_page: u32,
    /// Usage of the matching HID element.
    pub usage: u32,
    /// Timestamp when the event was observed.
    pub time: SystemTime,
}

impl FnKeyEvent {
    /// Create a new event with the current timestamp.
    pub fn new(state: FnKeyState, usage_page: u32, usage: u32) -> Self {
        Self {
            state,
            usage_page,
            usage,
            time: SystemTime::now(),
        }
    }

    /// Create a pressed event.
    pub fn pressed(usage_page: u32, usage: u32) -> Self {
        Self::new(FnKeyState::Pressed, usage_page, usage)
    }

    /// Create a released event.
    pub fn released(usage_page: u32, usage: u32) -> Self {
        Self::new(FnKeyState::Released, usage_page, usage)
    }

    /// Check if this event is a press.
    pub fn is_pressed(&self) -> bool {
        self.state.is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_value() {
        assert_eq!(FnKeyState::from_value(1), FnKeyState::Pressed);
        assert_eq!(FnKeyState::from_value(42), FnKeyState::Pressed);
        assert_eq!(FnKeyState::from_value(-1), FnKeyState::Pressed);
        assert_eq!(FnKeyState::from_value(0), FnKeyState::Released);
    }

    #[test]
    fn test_event_constructors() {
        let event = FnKeyEvent::pressed(0xFF00, 0x0003);
        assert!(event.is_pressed());
        assert_eq!(event.usage_page, 0xFF00);
        assert_eq!(event.usage, 0x0003);

        let event = FnKeyEvent::released(0xFF, 0x0003);
        assert!(!event.is_pressed());
    }
}
