//! Pregame configuration
//!
//! Alliance, starting position and debug-telemetry selection, only reachable
//! while browsing. The alliance buttons double as "alliance + upper start"
//! shortcuts; upper/lower only move the start within the current alliance.

use crate::input::{Buttons, Edges};
use crate::robot::Pose2d;
use core::f64::consts::FRAC_PI_2;

/// Match-assigned team colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    /// Mechanism polarity (duck spinner direction)
    pub const fn modifier(self) -> i8 {
        match self {
            Alliance::Red => 1,
            Alliance::Blue => -1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Alliance::Red => "RED",
            Alliance::Blue => "BLUE",
        }
    }
}

/// Starting tile, one of {Red, Blue} x {Upper, Lower}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartingPosition {
    RedUp,
    RedDown,
    BlueUp,
    BlueDown,
}

impl StartingPosition {
    /// Upper start for `alliance`
    pub const fn upper(alliance: Alliance) -> Self {
        match alliance {
            Alliance::Red => StartingPosition::RedUp,
            Alliance::Blue => StartingPosition::BlueUp,
        }
    }

    /// Lower start for `alliance`
    pub const fn lower(alliance: Alliance) -> Self {
        match alliance {
            Alliance::Red => StartingPosition::RedDown,
            Alliance::Blue => StartingPosition::BlueDown,
        }
    }

    pub const fn alliance(self) -> Alliance {
        match self {
            StartingPosition::RedUp | StartingPosition::RedDown => Alliance::Red,
            StartingPosition::BlueUp | StartingPosition::BlueDown => Alliance::Blue,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StartingPosition::RedUp => "START_RED_UP",
            StartingPosition::RedDown => "START_RED_DOWN",
            StartingPosition::BlueUp => "START_BLUE_UP",
            StartingPosition::BlueDown => "START_BLUE_DOWN",
        }
    }

    /// Field pose in meters / radians, origin at field center
    pub fn pose(self) -> Pose2d {
        match self {
            StartingPosition::BlueUp => Pose2d::new(0.15, 1.6, -FRAC_PI_2),
            StartingPosition::BlueDown => Pose2d::new(-0.9, 1.6, -FRAC_PI_2),
            StartingPosition::RedUp => Pose2d::new(0.15, -1.6, FRAC_PI_2),
            StartingPosition::RedDown => Pose2d::new(-0.9, -1.6, FRAC_PI_2),
        }
    }
}

/// Operator's pregame selections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PregameConfig {
    pub alliance: Alliance,
    pub starting_position: StartingPosition,
    pub debug_telemetry: bool,
}

impl PregameConfig {
    /// Blue alliance, upper start
    pub fn new(debug_telemetry: bool) -> Self {
        Self {
            alliance: Alliance::Blue,
            starting_position: StartingPosition::BlueUp,
            debug_telemetry,
        }
    }

    /// Apply this tick's edges from either controller
    ///
    /// x selects Blue, b selects Red (each resetting to the upper start),
    /// y/a select the upper/lower start of the current alliance, and
    /// dpad-down toggles debug telemetry. Returns true if anything changed.
    pub fn handle(&mut self, edges: &Edges) -> bool {
        let before = *self;

        if edges.either(Buttons::X) {
            self.select_alliance(Alliance::Blue);
        } else if edges.either(Buttons::B) {
            self.select_alliance(Alliance::Red);
        } else if edges.either(Buttons::Y) {
            self.starting_position = StartingPosition::upper(self.alliance);
        } else if edges.either(Buttons::A) {
            self.starting_position = StartingPosition::lower(self.alliance);
        }

        if edges.either(Buttons::DPAD_DOWN) {
            self.debug_telemetry = !self.debug_telemetry;
            crate::log_info!("Debug telemetry {}", self.debug_telemetry);
        }

        if self.starting_position != before.starting_position {
            crate::log_info!(
                "Alliance {} start {}",
                self.alliance.label(),
                self.starting_position.label()
            );
        }

        *self != before
    }

    fn select_alliance(&mut self, alliance: Alliance) {
        self.alliance = alliance;
        self.starting_position = StartingPosition::upper(alliance);
    }
}

impl Default for PregameConfig {
    fn default() -> Self {
        Self::new(false)
    }
}
