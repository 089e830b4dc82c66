//! Simulated robot.
//!
//! [`SimRobot`] owns the simulated drivetrain, crane and gripper and
//! implements the core subsystem contracts, so the real op-mode can be run
//! against it without hardware. Time comes from a shared [`SitlTimeSource`];
//! `update` integrates the physics over the time elapsed since the previous
//! update.

mod crane;
mod drive_train;
mod gripper;

pub use crane::{crane_plan, CranePose, SimCrane};
pub use drive_train::SimDriveTrain;
pub use gripper::{
    SimGripper, GRIPPER_CLOSED, GRIPPER_OPEN, PITCH_DOWN, PITCH_FOLDED, PITCH_TRANSFER,
};

use reach_core::articulation::{
    ArticulationRunner, ArticulationStep, CraneArticulation, RobotArticulation,
};
use reach_core::robot::{Crane, DriveTrain, Gripper, Robot, TelemetryProvider};
use reach_core::telemetry::{FieldOverlay, TelemetryMap};
use reach_core::traits::TimeSource;

use crate::config::SimConfig;
use crate::time::SitlTimeSource;

pub(crate) const MS: u64 = 1_000_000;

const WHEEL_STROKE_COLOR: &str = "#006400";
const AXLE_STROKE_COLOR: &str = "#4D934D";
/// Drawn wheel radius in meters
const WHEEL_RADIUS: f64 = 0.1016;

/// One setpoint of a robot-wide articulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RobotAction {
    /// Start a crane articulation; the crane finishes it on its own
    Crane(CraneArticulation),
    GripperSet,
    GripperLift,
    GripperRelease,
    GripperPitch(i32),
    DuckSpinner(f64),
    ChassisLength(f64),
}

const INIT: [ArticulationStep<RobotAction>; 3] = [
    ArticulationStep::new(RobotAction::GripperPitch(PITCH_FOLDED), 300 * MS),
    ArticulationStep::new(RobotAction::Crane(CraneArticulation::Home), 600 * MS),
    ArticulationStep::new(RobotAction::ChassisLength(0.0), 0),
];

const START: [ArticulationStep<RobotAction>; 2] = [
    ArticulationStep::new(RobotAction::GripperPitch(PITCH_DOWN), 300 * MS),
    ArticulationStep::new(RobotAction::GripperRelease, 200 * MS),
];

const TRANSFER: [ArticulationStep<RobotAction>; 5] = [
    ArticulationStep::new(RobotAction::GripperSet, 300 * MS),
    ArticulationStep::new(RobotAction::Crane(CraneArticulation::Home), 600 * MS),
    ArticulationStep::new(RobotAction::GripperLift, 400 * MS),
    ArticulationStep::new(RobotAction::GripperRelease, 300 * MS),
    ArticulationStep::new(RobotAction::GripperPitch(PITCH_DOWN), 300 * MS),
];

const DIAGNOSTIC: [ArticulationStep<RobotAction>; 8] = [
    ArticulationStep::new(RobotAction::DuckSpinner(0.5), 500 * MS),
    ArticulationStep::new(RobotAction::DuckSpinner(0.0), 100 * MS),
    ArticulationStep::new(RobotAction::Crane(CraneArticulation::LowestTier), 800 * MS),
    ArticulationStep::new(RobotAction::Crane(CraneArticulation::Home), 600 * MS),
    ArticulationStep::new(RobotAction::GripperSet, 300 * MS),
    ArticulationStep::new(RobotAction::GripperLift, 300 * MS),
    ArticulationStep::new(RobotAction::GripperRelease, 300 * MS),
    ArticulationStep::new(RobotAction::GripperPitch(PITCH_DOWN), 300 * MS),
];

/// Step plan for a robot articulation
pub fn robot_plan(articulation: RobotArticulation) -> &'static [ArticulationStep<RobotAction>] {
    match articulation {
        RobotArticulation::Init => &INIT,
        RobotArticulation::Start => &START,
        RobotArticulation::Transfer => &TRANSFER,
        RobotArticulation::Diagnostic => &DIAGNOSTIC,
    }
}

/// Simulated robot aggregate
#[derive(Debug, Clone)]
pub struct SimRobot {
    time: SitlTimeSource,
    drive: SimDriveTrain,
    crane: SimCrane,
    gripper: SimGripper,
    runner: ArticulationRunner<RobotArticulation>,
    last_update_ns: u64,
    stops: u32,
}

impl SimRobot {
    pub fn new(config: &SimConfig, time: SitlTimeSource) -> Self {
        Self {
            last_update_ns: time.now_ns(),
            drive: SimDriveTrain::new(config.clone()),
            crane: SimCrane::new(config, time.clone()),
            gripper: SimGripper::new(config.servo_slew_rate),
            runner: ArticulationRunner::new(),
            stops: 0,
            time,
        }
    }

    /// Request or continue `articulation` along `steps`
    ///
    /// Every setpoint the runner releases is applied, including several
    /// zero-settle steps in one call.
    fn run_plan(
        &mut self,
        articulation: RobotArticulation,
        steps: &[ArticulationStep<RobotAction>],
    ) -> bool {
        let now = self.time.now_ns();
        let Self {
            runner,
            drive,
            crane,
            gripper,
            ..
        } = self;
        runner.advance(articulation, steps, now, |action| match action {
            RobotAction::Crane(articulation) => {
                crane.articulate(articulation);
            }
            RobotAction::GripperSet => gripper.set(),
            RobotAction::GripperLift => gripper.lift(),
            RobotAction::GripperRelease => gripper.release(),
            RobotAction::GripperPitch(counts) => gripper.set_pitch_target_pos(counts),
            RobotAction::DuckSpinner(power) => drive.set_duck_spinner_power(power),
            RobotAction::ChassisLength(length) => drive.set_chassis_length(length),
        })
    }

    pub fn sim_drive_train(&self) -> &SimDriveTrain {
        &self.drive
    }

    pub fn sim_crane(&self) -> &SimCrane {
        &self.crane
    }

    pub fn sim_gripper(&self) -> &SimGripper {
        &self.gripper
    }

    pub fn in_flight(&self) -> Option<RobotArticulation> {
        self.runner.in_flight()
    }

    pub fn completed(&self) -> Option<RobotArticulation> {
        self.runner.completed()
    }

    /// Times `stop` was called
    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl TelemetryProvider for SimRobot {
    fn telemetry(&self, debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put(
            "Articulation",
            self.runner.in_flight().map_or("IDLE", RobotArticulation::name),
        );
        if debug {
            map.put("Articulation Step", self.runner.step_index());
            map.put(
                "Last Completed",
                self.runner.completed().map_or("NONE", RobotArticulation::name),
            );
            map.put("Stops", self.stops as i64);
        }
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Robot"
    }
}

impl Robot for SimRobot {
    fn drive_train(&mut self) -> &mut dyn DriveTrain {
        &mut self.drive
    }

    fn crane(&mut self) -> &mut dyn Crane {
        &mut self.crane
    }

    fn gripper(&mut self) -> &mut dyn Gripper {
        &mut self.gripper
    }

    fn subsystems(&self) -> [&dyn TelemetryProvider; 3] {
        [&self.drive, &self.crane, &self.gripper]
    }

    fn articulate(&mut self, articulation: RobotArticulation) -> bool {
        self.run_plan(articulation, robot_plan(articulation))
    }

    fn stop(&mut self) {
        self.runner.cancel();
        self.crane.cancel();
        self.drive.stop();
        self.stops += 1;
        log::info!("Robot stopped");
    }

    fn update(&mut self, overlay: &mut FieldOverlay) {
        let now = self.time.now_ns();
        let dt = now.saturating_sub(self.last_update_ns) as f64 / 1e9;
        self.last_update_ns = now;

        if let Some(articulation) = self.runner.in_flight() {
            self.articulate(articulation);
        }
        self.drive.update(dt);
        self.crane.update(dt);
        self.gripper.update(dt);

        let pose = self.drive.pose_estimate();
        let (front_x, front_y) = pose.ahead(self.drive.chassis_length());
        overlay
            .set_stroke(AXLE_STROKE_COLOR)
            .stroke_line(pose.x, pose.y, front_x, front_y)
            .set_stroke(WHEEL_STROKE_COLOR)
            .stroke_circle(pose.x, pose.y, WHEEL_RADIUS)
            .stroke_circle(front_x, front_y, WHEEL_RADIUS);
    }
}

/// Move `current` toward `target` by at most `max_step`.
pub(crate) fn approach(current: f64, target: f64, max_step: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(delta)
    }
}

/// Normalize angle to [-pi, pi].
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * std::f64::consts::PI);
    if a > std::f64::consts::PI {
        a -= 2.0 * std::f64::consts::PI;
    } else if a < -std::f64::consts::PI {
        a += 2.0 * std::f64::consts::PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_core::telemetry::OverlayOp;
    use reach_core::teleop::DriveCommand;

    fn robot() -> (SimRobot, SitlTimeSource) {
        let time = SitlTimeSource::new();
        (SimRobot::new(&SimConfig::seeded(7), time.clone()), time)
    }

    /// Poll `articulation` once per simulated 20 ms tick until done
    fn run_to_completion(robot: &mut SimRobot, time: &SitlTimeSource, articulation: RobotArticulation) -> u32 {
        let mut overlay = FieldOverlay::new();
        let mut ticks = 0;
        while !robot.articulate(articulation) {
            time.advance_ms(20);
            overlay.clear();
            robot.update(&mut overlay);
            ticks += 1;
            assert!(ticks < 1_000, "articulation never completed");
        }
        ticks
    }

    #[test]
    fn test_approach() {
        assert!((approach(0.0, 1.0, 0.25) - 0.25).abs() < 1e-12);
        assert!((approach(0.0, -1.0, 0.25) + 0.25).abs() < 1e-12);
        assert!((approach(0.9, 1.0, 0.25) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f64::consts::PI;
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-9);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-9);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_init_articulation_folds_gripper() {
        let (mut robot, time) = robot();
        run_to_completion(&mut robot, &time, RobotArticulation::Init);
        assert_eq!(robot.completed(), Some(RobotArticulation::Init));
        assert_eq!(robot.sim_gripper().pitch_target_pos(), PITCH_FOLDED);
        assert_eq!(robot.sim_crane().completed(), Some(CraneArticulation::Home));
    }

    #[test]
    fn test_transfer_hands_over() {
        let (mut robot, time) = robot();
        let ticks = run_to_completion(&mut robot, &time, RobotArticulation::Transfer);
        // 1.9 s of settle time at 20 ms per tick
        assert_eq!(ticks, 95);
        assert_eq!(robot.sim_gripper().grabs(), 1);
        assert!(!robot.sim_gripper().is_closed());
        assert_eq!(robot.sim_gripper().pitch_target_pos(), PITCH_DOWN);
    }

    #[test]
    fn test_diagnostic_exercises_duck_spinner() {
        let (mut robot, time) = robot();
        robot.articulate(RobotArticulation::Diagnostic);
        assert!((robot.sim_drive_train().duck_spinner_power() - 0.5).abs() < 1e-9);
        run_to_completion(&mut robot, &time, RobotArticulation::Diagnostic);
        assert!(robot.sim_drive_train().duck_spinner_power().abs() < 1e-9);
        assert_eq!(robot.sim_crane().completed(), Some(CraneArticulation::Home));
    }

    #[test]
    fn test_zero_settle_steps_all_apply() {
        let (mut robot, _) = robot();
        let plan = [
            ArticulationStep::new(RobotAction::GripperPitch(PITCH_TRANSFER), 0),
            ArticulationStep::new(RobotAction::DuckSpinner(0.5), 0),
            ArticulationStep::new(RobotAction::ChassisLength(0.3), 0),
        ];
        assert!(robot.run_plan(RobotArticulation::Transfer, &plan));
        assert_eq!(robot.sim_gripper().pitch_target_pos(), PITCH_TRANSFER);
        assert!((robot.sim_drive_train().duck_spinner_power() - 0.5).abs() < 1e-9);
        assert!((robot.sim_drive_train().target_chassis_length() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_stop_abandons_articulation() {
        let (mut robot, time) = robot();
        robot.drive_train().set_drive_power(DriveCommand::new(10.0, 0.0));
        robot.articulate(RobotArticulation::Transfer);
        robot.stop();
        assert_eq!(robot.in_flight(), None);
        assert_eq!(robot.sim_drive_train().command(), DriveCommand::ZERO);

        time.advance_ms(20);
        robot.update(&mut FieldOverlay::new());
        assert_eq!(robot.in_flight(), None);
        assert_eq!(robot.stops(), 1);
    }

    #[test]
    fn test_update_integrates_elapsed_time() {
        let (mut robot, time) = robot();
        robot.drive_train().set_drive_power(DriveCommand::new(10.0, 0.0));
        time.advance_ms(500);
        robot.update(&mut FieldOverlay::new());
        assert!((robot.sim_drive_train().pose_estimate().x - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_update_draws_overlay() {
        let (mut robot, _) = robot();
        let mut overlay = FieldOverlay::new();
        robot.update(&mut overlay);
        assert_eq!(overlay.ops()[0], OverlayOp::Stroke(AXLE_STROKE_COLOR));
        assert_eq!(overlay.ops().len(), 5);
    }

    #[test]
    fn test_subsystem_section_order() {
        let (robot, _) = robot();
        let names: Vec<_> = robot.subsystems().iter().map(|s| s.telemetry_name()).collect();
        assert_eq!(names, ["Drive Train", "Crane", "Gripper"]);
    }
}
