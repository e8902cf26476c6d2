//! Latest-input snapshot
//!
//! Hosts feed key and mouse events in as they arrive; readers only ever see
//! the most recent event. Nothing here blocks or gates ticking.

use glam::IVec2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    last_key: String,
    last_mouse: IVec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press by its display text ("A", "Space", "Left", ...)
    pub fn key_pressed(&mut self, key: &str) {
        self.last_key.clear();
        self.last_key.push_str(key);
    }

    /// Any key release clears the last key
    pub fn key_released(&mut self) {
        self.last_key.clear();
    }

    pub fn mouse_moved(&mut self, position: IVec2) {
        self.last_mouse = position;
    }

    /// Text of the key currently held, `""` when none is
    pub fn last_key_pressed(&self) -> &str {
        &self.last_key
    }

    pub fn last_mouse_position(&self) -> IVec2 {
        self.last_mouse
    }
}

/// Display text for a DOM `KeyboardEvent.key` value
pub fn key_text(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        "ArrowLeft" => "Left".to_string(),
        "ArrowRight" => "Right".to_string(),
        "ArrowUp" => "Up".to_string(),
        "ArrowDown" => "Down".to_string(),
        k if k.chars().count() == 1 => k.to_uppercase(),
        k => k.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let input = InputState::new();
        assert_eq!(input.last_key_pressed(), "");
        assert_eq!(input.last_mouse_position(), IVec2::ZERO);
    }

    #[test]
    fn test_press_release() {
        let mut input = InputState::new();
        input.key_pressed("A");
        assert_eq!(input.last_key_pressed(), "A");
        input.key_pressed("Space");
        assert_eq!(input.last_key_pressed(), "Space");
        input.key_released();
        assert_eq!(input.last_key_pressed(), "");
    }

    #[test]
    fn test_mouse_keeps_latest() {
        let mut input = InputState::new();
        input.mouse_moved(IVec2::new(3, 4));
        input.mouse_moved(IVec2::new(120, 45));
        assert_eq!(input.last_mouse_position(), IVec2::new(120, 45));
    }

    #[test]
    fn test_key_text() {
        assert_eq!(key_text(" "), "Space");
        assert_eq!(key_text("a"), "A");
        assert_eq!(key_text("ArrowUp"), "Up");
        assert_eq!(key_text("Enter"), "Enter");
    }
}
