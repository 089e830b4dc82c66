//! Gamepad snapshot types

use bitflags::bitflags;

bitflags! {
    /// Digital gamepad buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u16 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const DPAD_UP = 1 << 4;
        const DPAD_DOWN = 1 << 5;
        const DPAD_LEFT = 1 << 6;
        const DPAD_RIGHT = 1 << 7;
        const LEFT_BUMPER = 1 << 8;
        const RIGHT_BUMPER = 1 << 9;
        const START = 1 << 10;
        const BACK = 1 << 11;
        /// Center "guide" button, the emergency stop
        const GUIDE = 1 << 12;
        const LEFT_STICK_BUTTON = 1 << 13;
        const RIGHT_STICK_BUTTON = 1 << 14;
    }
}

/// One polled snapshot of a controller
///
/// Stick axes are in [-1.0, 1.0] with **up reading negative** on the Y axes,
/// as the driver station reports them. Triggers are in [0.0, 1.0].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadState {
    pub left_stick_x: f32,
    pub left_stick_y: f32,
    pub right_stick_x: f32,
    pub right_stick_y: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub buttons: Buttons,
}

impl GamepadState {
    /// Idle controller: centered sticks, nothing pressed
    pub const IDLE: Self = Self {
        left_stick_x: 0.0,
        left_stick_y: 0.0,
        right_stick_x: 0.0,
        right_stick_y: 0.0,
        left_trigger: 0.0,
        right_trigger: 0.0,
        buttons: Buttons::empty(),
    };

    /// Same snapshot with `buttons` held
    pub fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Same snapshot with both stick Y axes set
    pub fn with_sticks_y(mut self, left: f32, right: f32) -> Self {
        self.left_stick_y = left;
        self.right_stick_y = right;
        self
    }

    /// True if any stick axis is deflected past `deadzone`
    pub fn joysticks_active(&self, deadzone: f64) -> bool {
        outside_deadzone(self.left_stick_x, deadzone)
            || outside_deadzone(self.left_stick_y, deadzone)
            || outside_deadzone(self.right_stick_x, deadzone)
            || outside_deadzone(self.right_stick_y, deadzone)
    }
}

/// True if the axis is deflected past `deadzone`
#[inline]
pub fn outside_deadzone(axis: f32, deadzone: f64) -> bool {
    libm::fabs(axis as f64) > deadzone
}
