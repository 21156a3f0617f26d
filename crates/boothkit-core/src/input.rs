//! Pointer and keyboard state for the editor surface.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key that engages panning while held.
pub const PAN_KEY: &str = "Space";

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Wheel { position: Point, delta: Vec2 },
}

/// Keyboard event carrying a key name (`"Space"`, `"Escape"`, `"a"`...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Tracks what is held down and where the pointer is.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Pointer position at the last primary-button press.
    pub press_position: Option<Point>,
    /// Accumulated wheel delta since the last [`InputState::take_wheel`].
    pub wheel_delta: Vec2,
    pressed_buttons: HashSet<MouseButton>,
    pressed_keys: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left {
                    self.press_position = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Left {
                    self.press_position = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
            PointerEvent::Wheel { position, delta } => {
                self.pointer_position = position;
                self.wheel_delta += delta;
            }
        }
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                self.pressed_keys.insert(key.clone());
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(key);
            }
        }
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    /// Whether the pan modifier is held.
    pub fn pan_engaged(&self) -> bool {
        self.is_key_pressed(PAN_KEY)
    }

    /// Return and reset the accumulated wheel delta.
    pub fn take_wheel(&mut self) -> Vec2 {
        std::mem::replace(&mut self.wheel_delta, Vec2::ZERO)
    }

    /// Forget everything held down (e.g. when the surface loses focus).
    pub fn release_all(&mut self) {
        self.pressed_buttons.clear();
        self.pressed_keys.clear();
        self.press_position = None;
    }
}
