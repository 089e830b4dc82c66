//! Subsystem, vision and routine contracts
//!
//! The core never owns subsystem internals. It issues commands through these
//! traits and polls articulations to completion. Every setter takes raw units
//! and clamps out-of-range values instead of failing.
//!
//! Ownership: the op-mode owns one [`Robot`] (which owns its subsystems) and
//! one [`AutonomousSuite`] (which owns the routines and the active vision
//! provider). Routines borrow the robot for the duration of one `execute`.

mod pose;

#[cfg(test)]
pub(crate) mod mock;

pub use pose::Pose2d;

use crate::articulation::{CraneArticulation, RobotArticulation};
use crate::error::VisionError;
use crate::state::{Alliance, StartingPosition};
use crate::telemetry::{FieldOverlay, TelemetryMap};
use crate::teleop::DriveCommand;

/// Valid servo target range in counts, shared by crane joints and gripper
pub const SERVO_MIN: i32 = 750;
pub const SERVO_MAX: i32 = 2250;

/// A named telemetry section
pub trait TelemetryProvider {
    /// Label/value pairs for this tick; `debug` adds verbose entries
    fn telemetry(&self, debug: bool) -> TelemetryMap;

    /// Stable section title
    fn telemetry_name(&self) -> &'static str;
}

/// Variable-length swerve drivetrain
pub trait DriveTrain: TelemetryProvider {
    fn set_drive_power(&mut self, command: DriveCommand);

    fn pose_estimate(&self) -> Pose2d;
    fn set_pose_estimate(&mut self, pose: Pose2d);

    /// Target wheelbase length in meters
    fn set_chassis_length(&mut self, length: f64);
    fn set_maintain_chassis_length_enabled(&mut self, enabled: bool);
    fn set_anti_tipping_enabled(&mut self, enabled: bool);

    /// Start the duck spinner in `direction` (+1/-1), or stop it if running
    fn toggle_duck_spinner(&mut self, direction: i8);
    fn set_duck_spinner_power(&mut self, power: f64);

    // Open-loop access for diagnostics
    fn set_left_velocity(&mut self, velocity: f64);
    fn set_right_velocity(&mut self, velocity: f64);
    fn set_swerve_velocity(&mut self, velocity: f64);
    fn set_swivel_angle(&mut self, angle: f64);
}

/// Articulated crane: turret, shoulder, elbow, wrist
pub trait Crane: TelemetryProvider {
    /// Request or continue a named motion; `true` once complete
    fn articulate(&mut self, articulation: CraneArticulation) -> bool;

    /// Release the held element
    fn dump(&mut self);

    fn shoulder_target(&self) -> i32;
    fn set_shoulder_target(&mut self, counts: i32);
    fn elbow_target(&self) -> i32;
    fn set_elbow_target(&mut self, counts: i32);
    fn wrist_target(&self) -> i32;
    fn set_wrist_target(&mut self, counts: i32);

    /// Turret heading target in radians
    fn turret_target_angle(&self) -> f64;
    fn set_turret_target_angle(&mut self, angle: f64);
}

/// Intake gripper on a pitch joint
pub trait Gripper: TelemetryProvider {
    /// Close on a game element
    fn set(&mut self);
    /// Raise toward the transfer position
    fn lift(&mut self);

    fn target_pos(&self) -> i32;
    fn set_target_pos(&mut self, counts: i32);
    fn pitch_target_pos(&self) -> i32;
    fn set_pitch_target_pos(&mut self, counts: i32);
}

/// Root aggregate owning every subsystem
pub trait Robot: TelemetryProvider {
    fn drive_train(&mut self) -> &mut dyn DriveTrain;
    fn crane(&mut self) -> &mut dyn Crane;
    fn gripper(&mut self) -> &mut dyn Gripper;

    /// Telemetry sections in report order: drivetrain, crane, gripper
    fn subsystems(&self) -> [&dyn TelemetryProvider; 3];

    /// Request or continue a robot-wide motion; `true` once complete
    fn articulate(&mut self, articulation: RobotArticulation) -> bool;

    /// Zero every actuator command and abandon in-flight articulations
    fn stop(&mut self);

    /// Advance in-flight motion and draw into the overlay; once per tick
    fn update(&mut self, overlay: &mut FieldOverlay);
}

/// Camera pipeline selected before the match
///
/// `initialize_vision` and `shutdown_vision` block and are only called while
/// browsing.
pub trait VisionProvider: TelemetryProvider {
    fn initialize_vision(&mut self) -> Result<(), VisionError>;
    fn shutdown_vision(&mut self) -> Result<(), VisionError>;

    /// Process the latest frame; non-blocking
    fn update(&mut self);

    fn save_dashboard_image(&mut self) -> Result<(), VisionError>;
}

/// Canned routine polled once per tick
///
/// `execute` never blocks and returns `true` once when the routine finishes.
/// Afterwards it must have no side effects until [`Routine::reset`].
pub trait Routine {
    fn execute(&mut self, robot: &mut dyn Robot) -> bool;
    fn reset(&mut self);
}

/// Routines owned by the autonomous suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    AutonomousRed,
    AutonomousBlue,
    BackAndForth,
    Square,
}

impl RoutineKind {
    /// Alliance-specific autonomous routine
    pub const fn autonomous(alliance: Alliance) -> Self {
        match alliance {
            Alliance::Red => RoutineKind::AutonomousRed,
            Alliance::Blue => RoutineKind::AutonomousBlue,
        }
    }
}

/// Autonomous routines plus the vision provider table
pub trait AutonomousSuite {
    /// Plan routines for the chosen alliance and start; called at match start
    fn build(&mut self, alliance: Alliance, start: StartingPosition);

    fn routine(&mut self, kind: RoutineKind) -> &mut dyn Routine;

    /// Number of entries in the vision provider table
    fn vision_provider_count(&self) -> usize;

    /// Replace the active provider with table entry `index`
    fn create_vision_provider(&mut self, index: usize);

    fn vision_provider(&mut self) -> &mut dyn VisionProvider;
    fn vision_provider_ref(&self) -> &dyn VisionProvider;
}
