use glam::Vec2;
use std::collections::HashSet;

/// Physical keys the controllers poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Space,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
}

impl KeyCode {
    pub const DIGITS: [KeyCode; 7] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
    ];
}

/// Polled input, as seen by the controllers.
///
/// Front-ends translate their own events into an implementation of this
/// trait; tests drive it directly.
pub trait InputSource {
    fn is_key_held(&self, key: KeyCode) -> bool;

    /// Primary (break) button level.
    fn break_held(&self) -> bool;

    /// Secondary (place) button level.
    fn place_held(&self) -> bool;

    /// Force the place button low until the next physical press.
    fn consume_place(&mut self);

    /// Pointer motion accumulated since the last call. Resets to zero.
    fn consume_look_delta(&mut self) -> Vec2;

    /// Whether the pointer is captured by the view. Held keys and buttons
    /// only steer the player while captured.
    fn pointer_captured(&self) -> bool;
}

/// Concrete input buffer a front-end writes into and the controllers poll.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    break_down: bool,
    place_down: bool,
    look: Vec2,
    captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input state with the pointer already captured.
    pub fn captured() -> Self {
        Self {
            captured: true,
            ..Self::default()
        }
    }

    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn set_break(&mut self, pressed: bool) {
        self.break_down = pressed;
    }

    pub fn set_place(&mut self, pressed: bool) {
        self.place_down = pressed;
    }

    pub fn set_captured(&mut self, captured: bool) {
        if captured != self.captured {
            tracing::debug!(captured, "pointer capture changed");
        }
        self.captured = captured;
    }

    /// Accumulate pointer motion. Ignored while the pointer is free.
    pub fn add_look(&mut self, dx: f32, dy: f32) {
        if self.captured {
            self.look += Vec2::new(dx, dy);
        }
    }

    /// Release every key and button.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.break_down = false;
        self.place_down = false;
        self.look = Vec2::ZERO;
    }
}

impl InputSource for InputState {
    fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    fn break_held(&self) -> bool {
        self.break_down
    }

    fn place_held(&self) -> bool {
        self.place_down
    }

    fn consume_place(&mut self) {
        self.place_down = false;
    }

    fn consume_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look)
    }

    fn pointer_captured(&self) -> bool {
        self.captured
    }
}
