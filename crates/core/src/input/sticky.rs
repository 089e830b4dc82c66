//! Edge detection ("sticky" buttons)
//!
//! A press is reported for exactly one tick regardless of how long the
//! button is held. The detector must be advanced exactly once per tick,
//! after every consumer of that tick has read [`EdgeDetector::pressed`];
//! advancing twice drops presses and skipping a tick duplicates them.

use super::gamepad::Buttons;

/// Buttons that are down in `current` but were up in `previous`
#[inline]
pub fn rising_edges(previous: Buttons, current: Buttons) -> Buttons {
    current.difference(previous)
}

/// Rising-edge tracker for one controller
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    /// Raw buttons captured at the last update
    last: Buttons,
    /// Rising edges computed at the last update
    pressed: Buttons,
}

impl EdgeDetector {
    /// Create a detector that treats every button as released
    pub const fn new() -> Self {
        Self {
            last: Buttons::empty(),
            pressed: Buttons::empty(),
        }
    }

    /// Advance with this tick's raw reading
    pub fn update(&mut self, raw: Buttons) {
        self.pressed = rising_edges(self.last, raw);
        self.last = raw;
    }

    /// Buttons freshly pressed as of the last update
    pub fn pressed(&self) -> Buttons {
        self.pressed
    }

    /// True if any of `buttons` was freshly pressed
    pub fn is_pressed(&self, buttons: Buttons) -> bool {
        self.pressed.intersects(buttons)
    }
}

/// Both controllers' edges for one tick
///
/// Most consumers accept a press from either controller ([`Edges::either`]);
/// a few are bound to one controller ([`Edges::one`], [`Edges::two`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub one: Buttons,
    pub two: Buttons,
}

impl Edges {
    pub fn new(one: Buttons, two: Buttons) -> Self {
        Self { one, two }
    }

    /// Snapshot both detectors
    pub fn from_detectors(one: &EdgeDetector, two: &EdgeDetector) -> Self {
        Self::new(one.pressed(), two.pressed())
    }

    /// Pressed on either controller
    pub fn either(&self, button: Buttons) -> bool {
        self.one.intersects(button) || self.two.intersects(button)
    }

    /// Pressed on controller one
    pub fn one(&self, button: Buttons) -> bool {
        self.one.intersects(button)
    }

    /// Pressed on controller two
    pub fn two(&self, button: Buttons) -> bool {
        self.two.intersects(button)
    }
}
