//! Manual diagnostic sequencer

use super::step::{DiagnosticControl, DiagnosticStep};
use crate::input::{outside_deadzone, Buttons, Edges, GamepadState};
use crate::ordinal::Ordinal;
use crate::parameters::OpModeParams;
use crate::robot::Robot;

/// Servo counts per tick at full stick deflection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoStepSizes {
    /// Right stick, fine adjustment
    pub slow: i32,
    /// Left stick, coarse adjustment
    pub fast: i32,
}

impl ServoStepSizes {
    pub fn from_params(params: &OpModeParams) -> Self {
        Self {
            slow: params.diag_step_slow,
            fast: params.diag_step_fast,
        }
    }
}

/// Selected actuator and the last servo target it reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticSequencer {
    step: DiagnosticStep,
    servo_target_pos: i32,
}

impl Default for DiagnosticSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSequencer {
    pub const fn new() -> Self {
        Self {
            step: DiagnosticStep::DrivetrainLeftMotor,
            servo_target_pos: 0,
        }
    }

    pub fn step(&self) -> DiagnosticStep {
        self.step
    }

    pub fn index(&self) -> usize {
        self.step.ordinal()
    }

    /// Servo target read before the most recent adjustment
    pub fn servo_target_pos(&self) -> i32 {
        self.servo_target_pos
    }

    /// Bumpers on controller one move the selection; right wins a tie
    pub fn handle_step_switch(&mut self, edges: &Edges) -> bool {
        let delta = if edges.one(Buttons::RIGHT_BUMPER) {
            1
        } else if edges.one(Buttons::LEFT_BUMPER) {
            -1
        } else {
            return false;
        };
        self.step = self.step.step(delta);
        crate::log_info!("Diagnostic step {}", self.step.name());
        true
    }

    /// Route controller one's sticks to the selected actuator
    pub fn drive(
        &mut self,
        robot: &mut dyn Robot,
        gamepad1: &GamepadState,
        deadzone: f64,
        sizes: ServoStepSizes,
    ) {
        let right_y = gamepad1.right_stick_y as f64;

        match self.step.control() {
            DiagnosticControl::Direct(set) => set(robot, -right_y),
            DiagnosticControl::Increment { get, set } => {
                let target = get(robot) - right_y;
                set(robot, target);
            }
            DiagnosticControl::Servo { get, set, min, max } => {
                let target = get(robot);
                self.servo_target_pos = target;

                let adjusted = if outside_deadzone(gamepad1.right_stick_y, deadzone) {
                    Some(target as f64 - right_y * sizes.slow as f64)
                } else if outside_deadzone(gamepad1.left_stick_y, deadzone) {
                    Some(target as f64 - gamepad1.left_stick_y as f64 * sizes.fast as f64)
                } else {
                    None
                };

                if let Some(adjusted) = adjusted {
                    set(robot, (adjusted as i32).clamp(min, max));
                }
            }
        }
    }

    /// One diagnostic tick: selection, then actuation
    pub fn update(
        &mut self,
        edges: &Edges,
        robot: &mut dyn Robot,
        gamepad1: &GamepadState,
        deadzone: f64,
        sizes: ServoStepSizes,
    ) {
        self.handle_step_switch(edges);
        self.drive(robot, gamepad1, deadzone, sizes);
    }
}
