//! Diagnostic actuator table
//!
//! Each step names one actuator and how controller one reaches it. Adding an
//! actuator means one enum variant, one table row and one `control` arm.

use crate::ordinal::Ordinal;
use crate::robot::{Robot, SERVO_MAX, SERVO_MIN};

/// Individually addressable actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStep {
    DrivetrainLeftMotor,
    DrivetrainRightMotor,
    DrivetrainMiddleMotor,
    DrivetrainMiddleSwivelMotor,
    CraneShoulderServo,
    CraneElbowServo,
    CraneWristServo,
    TurretMotor,
    GripperServo,
    GripperPitchServo,
    DuckSpinner,
}

impl Ordinal for DiagnosticStep {
    const ALL: &'static [Self] = &[
        DiagnosticStep::DrivetrainLeftMotor,
        DiagnosticStep::DrivetrainRightMotor,
        DiagnosticStep::DrivetrainMiddleMotor,
        DiagnosticStep::DrivetrainMiddleSwivelMotor,
        DiagnosticStep::CraneShoulderServo,
        DiagnosticStep::CraneElbowServo,
        DiagnosticStep::CraneWristServo,
        DiagnosticStep::TurretMotor,
        DiagnosticStep::GripperServo,
        DiagnosticStep::GripperPitchServo,
        DiagnosticStep::DuckSpinner,
    ];
}

/// How an actuator is driven from the sticks
#[derive(Clone, Copy)]
pub enum DiagnosticControl {
    /// Open loop: the value is `-right_stick_y`
    Direct(fn(&mut dyn Robot, f64)),
    /// Relative target: new target is `get() - right_stick_y`
    Increment {
        get: fn(&mut dyn Robot) -> f64,
        set: fn(&mut dyn Robot, f64),
    },
    /// Closed-loop servo counts, clamped to `[min, max]`
    Servo {
        get: fn(&mut dyn Robot) -> i32,
        set: fn(&mut dyn Robot, i32),
        min: i32,
        max: i32,
    },
}

impl core::fmt::Debug for DiagnosticControl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DiagnosticControl::Direct(_) => f.write_str("Direct"),
            DiagnosticControl::Increment { .. } => f.write_str("Increment"),
            DiagnosticControl::Servo { min, max, .. } => {
                write!(f, "Servo [{}, {}]", min, max)
            }
        }
    }
}

fn servo(get: fn(&mut dyn Robot) -> i32, set: fn(&mut dyn Robot, i32)) -> DiagnosticControl {
    DiagnosticControl::Servo {
        get,
        set,
        min: SERVO_MIN,
        max: SERVO_MAX,
    }
}

impl DiagnosticStep {
    pub const fn name(self) -> &'static str {
        match self {
            DiagnosticStep::DrivetrainLeftMotor => "DRIVETRAIN_LEFT_MOTOR",
            DiagnosticStep::DrivetrainRightMotor => "DRIVETRAIN_RIGHT_MOTOR",
            DiagnosticStep::DrivetrainMiddleMotor => "DRIVETRAIN_MIDDLE_MOTOR",
            DiagnosticStep::DrivetrainMiddleSwivelMotor => "DRIVETRAIN_MIDDLE_SWIVEL_MOTOR",
            DiagnosticStep::CraneShoulderServo => "CRANE_SHOULDER_SERVO",
            DiagnosticStep::CraneElbowServo => "CRANE_ELBOW_SERVO",
            DiagnosticStep::CraneWristServo => "CRANE_WRIST_SERVO",
            DiagnosticStep::TurretMotor => "TURRET_MOTOR",
            DiagnosticStep::GripperServo => "GRIPPER_SERVO",
            DiagnosticStep::GripperPitchServo => "GRIPPER_PITCH_SERVO",
            DiagnosticStep::DuckSpinner => "DUCK_SPINNER",
        }
    }

    /// Dispatch record for this actuator
    pub fn control(self) -> DiagnosticControl {
        match self {
            DiagnosticStep::DrivetrainLeftMotor => {
                DiagnosticControl::Direct(|r, v| r.drive_train().set_left_velocity(v))
            }
            DiagnosticStep::DrivetrainRightMotor => {
                DiagnosticControl::Direct(|r, v| r.drive_train().set_right_velocity(v))
            }
            DiagnosticStep::DrivetrainMiddleMotor => {
                DiagnosticControl::Direct(|r, v| r.drive_train().set_swerve_velocity(v))
            }
            DiagnosticStep::DrivetrainMiddleSwivelMotor => {
                DiagnosticControl::Direct(|r, v| r.drive_train().set_swivel_angle(v))
            }
            DiagnosticStep::CraneShoulderServo => servo(
                |r| r.crane().shoulder_target(),
                |r, c| r.crane().set_shoulder_target(c),
            ),
            DiagnosticStep::CraneElbowServo => servo(
                |r| r.crane().elbow_target(),
                |r, c| r.crane().set_elbow_target(c),
            ),
            DiagnosticStep::CraneWristServo => servo(
                |r| r.crane().wrist_target(),
                |r, c| r.crane().set_wrist_target(c),
            ),
            DiagnosticStep::TurretMotor => DiagnosticControl::Increment {
                get: |r| r.crane().turret_target_angle(),
                set: |r, a| r.crane().set_turret_target_angle(a),
            },
            DiagnosticStep::GripperServo => servo(
                |r| r.gripper().target_pos(),
                |r, c| r.gripper().set_target_pos(c),
            ),
            DiagnosticStep::GripperPitchServo => servo(
                |r| r.gripper().pitch_target_pos(),
                |r, c| r.gripper().set_pitch_target_pos(c),
            ),
            DiagnosticStep::DuckSpinner => {
                DiagnosticControl::Direct(|r, v| r.drive_train().set_duck_spinner_power(v))
            }
        }
    }
}
