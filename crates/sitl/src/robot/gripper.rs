//! Simulated intake gripper on a pitch joint.

use reach_core::robot::{Gripper, TelemetryProvider, SERVO_MAX, SERVO_MIN};
use reach_core::telemetry::TelemetryMap;

use super::approach;

pub const GRIPPER_OPEN: i32 = 1_100;
pub const GRIPPER_CLOSED: i32 = 1_900;
/// Pitch facing the floor for intake
pub const PITCH_DOWN: i32 = 900;
/// Pitch lined up with the crane bucket
pub const PITCH_TRANSFER: i32 = 2_000;
/// Pitch tucked inside the starting envelope
pub const PITCH_FOLDED: i32 = SERVO_MAX;

#[derive(Debug, Clone)]
pub struct SimGripper {
    servo_slew_rate: f64,
    target_pos: i32,
    pitch_target_pos: i32,
    pos: f64,
    pitch_pos: f64,
    grabs: u32,
}

impl SimGripper {
    pub fn new(servo_slew_rate: f64) -> Self {
        Self {
            servo_slew_rate,
            target_pos: GRIPPER_OPEN,
            pitch_target_pos: PITCH_DOWN,
            pos: GRIPPER_OPEN as f64,
            pitch_pos: PITCH_DOWN as f64,
            grabs: 0,
        }
    }

    /// Let go of the held element.
    pub fn release(&mut self) {
        self.set_target_pos(GRIPPER_OPEN);
    }

    pub fn is_closed(&self) -> bool {
        self.target_pos == GRIPPER_CLOSED
    }

    pub fn grabs(&self) -> u32 {
        self.grabs
    }

    /// Move the servos toward their targets over `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let step = self.servo_slew_rate * dt;
        self.pos = approach(self.pos, self.target_pos as f64, step);
        self.pitch_pos = approach(self.pitch_pos, self.pitch_target_pos as f64, step);
    }
}

impl TelemetryProvider for SimGripper {
    fn telemetry(&self, debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Closed", self.is_closed());
        map.put("Target Pos", self.target_pos);
        map.put("Pitch Target Pos", self.pitch_target_pos);
        if debug {
            map.put("Pos", self.pos);
            map.put("Pitch Pos", self.pitch_pos);
            map.put("Grabs", self.grabs as i64);
        }
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Gripper"
    }
}

impl Gripper for SimGripper {
    fn set(&mut self) {
        self.set_pitch_target_pos(PITCH_DOWN);
        self.set_target_pos(GRIPPER_CLOSED);
        self.grabs += 1;
    }

    fn lift(&mut self) {
        self.set_pitch_target_pos(PITCH_TRANSFER);
    }

    fn target_pos(&self) -> i32 {
        self.target_pos
    }

    fn set_target_pos(&mut self, counts: i32) {
        self.target_pos = counts.clamp(SERVO_MIN, SERVO_MAX);
    }

    fn pitch_target_pos(&self) -> i32 {
        self.pitch_target_pos
    }

    fn set_pitch_target_pos(&mut self, counts: i32) {
        self.pitch_target_pos = counts.clamp(SERVO_MIN, SERVO_MAX);
    }
}
