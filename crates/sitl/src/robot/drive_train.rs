//! Simulated variable-length swerve drivetrain.
//!
//! Integrates unicycle kinematics from the commanded forward/rotate pair, or
//! differential kinematics when a diagnostic drives the wheels open loop.

use reach_core::robot::{DriveTrain, Pose2d, TelemetryProvider};
use reach_core::telemetry::TelemetryMap;
use reach_core::teleop::DriveCommand;

use super::{approach, normalize_angle};
use crate::config::SimConfig;

#[derive(Debug, Clone)]
pub struct SimDriveTrain {
    config: SimConfig,
    pose: Pose2d,
    command: DriveCommand,
    /// Wheels are driven directly instead of from `command`
    open_loop: bool,
    left_velocity: f64,
    right_velocity: f64,
    swerve_velocity: f64,
    swivel_angle: f64,
    chassis_length: f64,
    target_chassis_length: f64,
    maintain_chassis_length: bool,
    anti_tipping: bool,
    duck_spinner_power: f64,
    distance_traveled: f64,
}

impl SimDriveTrain {
    pub fn new(config: SimConfig) -> Self {
        let length = config.chassis_length_min;
        Self {
            config,
            pose: Pose2d::ORIGIN,
            command: DriveCommand::ZERO,
            open_loop: false,
            left_velocity: 0.0,
            right_velocity: 0.0,
            swerve_velocity: 0.0,
            swivel_angle: 0.0,
            chassis_length: length,
            target_chassis_length: length,
            maintain_chassis_length: false,
            anti_tipping: true,
            duck_spinner_power: 0.0,
            distance_traveled: 0.0,
        }
    }

    /// Longest length the slide is commanded to
    fn max_commanded_length(&self) -> f64 {
        (self.config.chassis_length_max - self.config.chassis_length_threshold)
            .max(self.config.chassis_length_min)
    }

    /// Linear and angular velocity for the current command
    fn body_velocity(&self) -> (f64, f64) {
        let (v, w) = if self.open_loop {
            (
                (self.left_velocity + self.right_velocity) / 2.0,
                (self.right_velocity - self.left_velocity) / self.config.track_width,
            )
        } else {
            (
                self.command.forward * self.config.meters_per_forward_unit,
                self.command.rotate * self.config.radians_per_rotate_unit,
            )
        };
        (
            v.clamp(-self.config.max_speed, self.config.max_speed),
            w.clamp(-self.config.max_turn_rate, self.config.max_turn_rate),
        )
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let (v, w) = self.body_velocity();

        self.pose.heading = normalize_angle(self.pose.heading + w * dt);
        self.pose.x += v * self.pose.heading.cos() * dt;
        self.pose.y += v * self.pose.heading.sin() * dt;
        self.distance_traveled += v.abs() * dt;

        if self.maintain_chassis_length {
            self.chassis_length = approach(
                self.chassis_length,
                self.target_chassis_length,
                self.config.chassis_slew_rate * dt,
            );
        }
    }

    /// Cut every motor.
    pub fn stop(&mut self) {
        self.command = DriveCommand::ZERO;
        self.open_loop = false;
        self.left_velocity = 0.0;
        self.right_velocity = 0.0;
        self.swerve_velocity = 0.0;
        self.duck_spinner_power = 0.0;
    }

    pub fn command(&self) -> DriveCommand {
        self.command
    }

    pub fn chassis_length(&self) -> f64 {
        self.chassis_length
    }

    pub fn target_chassis_length(&self) -> f64 {
        self.target_chassis_length
    }

    pub fn is_maintaining_chassis_length(&self) -> bool {
        self.maintain_chassis_length
    }

    pub fn is_anti_tipping_enabled(&self) -> bool {
        self.anti_tipping
    }

    pub fn duck_spinner_power(&self) -> f64 {
        self.duck_spinner_power
    }

    pub fn swivel_angle(&self) -> f64 {
        self.swivel_angle
    }

    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }
}

impl TelemetryProvider for SimDriveTrain {
    fn telemetry(&self, debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("X", self.pose.x);
        map.put("Y", self.pose.y);
        map.put("Heading", self.pose.heading.to_degrees());
        map.put("Forward", self.command.forward);
        map.put("Rotate", self.command.rotate);
        map.put("Chassis Length", self.chassis_length);
        map.put("Target Chassis Length", self.target_chassis_length);
        map.put("Duck Spinner Power", self.duck_spinner_power);

        if debug {
            map.put("Maintain Chassis Length", self.maintain_chassis_length);
            map.put("Anti-Tipping", self.anti_tipping);
            map.put("Swivel Angle", self.swivel_angle.to_degrees());
            map.put("Open Loop", self.open_loop);
            map.put("Left Velocity", self.left_velocity);
            map.put("Right Velocity", self.right_velocity);
            map.put("Swerve Velocity", self.swerve_velocity);
            map.put("Distance Traveled", self.distance_traveled);
        }
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Drive Train"
    }
}

impl DriveTrain for SimDriveTrain {
    fn set_drive_power(&mut self, command: DriveCommand) {
        self.command = command;
        self.open_loop = false;
    }

    fn pose_estimate(&self) -> Pose2d {
        self.pose
    }

    fn set_pose_estimate(&mut self, pose: Pose2d) {
        self.pose = pose;
    }

    fn set_chassis_length(&mut self, length: f64) {
        self.target_chassis_length = length.clamp(
            self.config.chassis_length_min,
            self.max_commanded_length(),
        );
    }

    fn set_maintain_chassis_length_enabled(&mut self, enabled: bool) {
        self.maintain_chassis_length = enabled;
    }

    fn set_anti_tipping_enabled(&mut self, enabled: bool) {
        self.anti_tipping = enabled;
    }

    fn toggle_duck_spinner(&mut self, direction: i8) {
        self.duck_spinner_power = if self.duck_spinner_power != 0.0 {
            0.0
        } else {
            f64::from(direction.signum()) * self.config.duck_spinner_power
        };
    }

    fn set_duck_spinner_power(&mut self, power: f64) {
        self.duck_spinner_power = power.clamp(-1.0, 1.0);
    }

    fn set_left_velocity(&mut self, velocity: f64) {
        self.open_loop = true;
        self.left_velocity = velocity.clamp(-self.config.max_speed, self.config.max_speed);
    }

    fn set_right_velocity(&mut self, velocity: f64) {
        self.open_loop = true;
        self.right_velocity = velocity.clamp(-self.config.max_speed, self.config.max_speed);
    }

    fn set_swerve_velocity(&mut self, velocity: f64) {
        self.open_loop = true;
        self.swerve_velocity = velocity.clamp(-self.config.max_speed, self.config.max_speed);
    }

    fn set_swivel_angle(&mut self, angle: f64) {
        self.swivel_angle = normalize_angle(angle);
    }
}
