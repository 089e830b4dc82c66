//! Drive arbitration
//!
//! Controller one drives tank style, controller two drives arcade style.
//! Exactly one controller may be deflected at a time; ambiguous or idle input
//! commands zero motion.

use crate::input::GamepadState;
use crate::parameters::OpModeParams;

/// Chassis velocity command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// Forward velocity
    pub forward: f64,
    /// Angular velocity, counter-clockwise positive
    pub rotate: f64,
}

impl DriveCommand {
    pub const ZERO: Self = Self {
        forward: 0.0,
        rotate: 0.0,
    };

    pub const fn new(forward: f64, rotate: f64) -> Self {
        Self { forward, rotate }
    }
}

/// Which mapping produced the drive command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveSource {
    /// Controller one alone
    Tank,
    /// Controller two alone
    Arcade,
    /// Neither or both controllers deflected
    Idle,
}

/// Stick-to-velocity scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveScaling {
    pub forward_scale: f64,
    pub rotate_scale: f64,
    /// Tank: rotate is zeroed when |right - left| is below this
    pub tank_deadzone: f64,
}

impl DriveScaling {
    pub fn from_params(params: &OpModeParams) -> Self {
        Self {
            forward_scale: params.forward_scale,
            rotate_scale: params.rotate_scale(),
            tank_deadzone: params.tank_deadzone,
        }
    }
}

/// Tank mapping
///
/// Forward is the mean of both stick Y axes; rotate is half their difference,
/// so right forward with left back turns clockwise.
pub fn tank(gamepad: &GamepadState, scaling: &DriveScaling) -> DriveCommand {
    let left = -(gamepad.left_stick_y as f64);
    let right = -(gamepad.right_stick_y as f64);

    let forward = (right + left) / 2.0 * scaling.forward_scale;
    let rotate = if libm::fabs(right - left) < scaling.tank_deadzone {
        0.0
    } else {
        -(right - left) / 2.0 * scaling.rotate_scale
    };

    DriveCommand::new(forward, rotate)
}

/// Arcade mapping: left stick Y drives, right stick X turns
pub fn arcade(gamepad: &GamepadState, scaling: &DriveScaling) -> DriveCommand {
    DriveCommand::new(
        -(gamepad.left_stick_y as f64) * scaling.forward_scale,
        -(gamepad.right_stick_x as f64) * scaling.rotate_scale,
    )
}

/// Pick the mapping from the controllers' joystick-active flags
pub fn arbitrate(
    one_active: bool,
    two_active: bool,
    gamepad1: &GamepadState,
    gamepad2: &GamepadState,
    scaling: &DriveScaling,
) -> (DriveSource, DriveCommand) {
    match (one_active, two_active) {
        (true, false) => (DriveSource::Tank, tank(gamepad1, scaling)),
        (false, true) => (DriveSource::Arcade, arcade(gamepad2, scaling)),
        _ => (DriveSource::Idle, DriveCommand::ZERO),
    }
}
