//! Recording robot and autonomous suite for unit tests

use super::*;
use heapless::Vec;

#[derive(Debug, Default)]
pub struct MockDriveTrain {
    pub command: DriveCommand,
    pub pose: Pose2d,
    pub chassis_length: f64,
    pub maintain_chassis_length: bool,
    pub anti_tipping: bool,
    pub duck_direction: i8,
    pub duck_power: f64,
    pub left_velocity: f64,
    pub right_velocity: f64,
    pub swerve_velocity: f64,
    pub swivel_angle: f64,
}

impl TelemetryProvider for MockDriveTrain {
    fn telemetry(&self, _debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Forward", self.command.forward);
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Drive Train"
    }
}

impl DriveTrain for MockDriveTrain {
    fn set_drive_power(&mut self, command: DriveCommand) {
        self.command = command;
    }
    fn pose_estimate(&self) -> Pose2d {
        self.pose
    }
    fn set_pose_estimate(&mut self, pose: Pose2d) {
        self.pose = pose;
    }
    fn set_chassis_length(&mut self, length: f64) {
        self.chassis_length = length;
    }
    fn set_maintain_chassis_length_enabled(&mut self, enabled: bool) {
        self.maintain_chassis_length = enabled;
    }
    fn set_anti_tipping_enabled(&mut self, enabled: bool) {
        self.anti_tipping = enabled;
    }
    fn toggle_duck_spinner(&mut self, direction: i8) {
        self.duck_direction = if self.duck_direction == 0 { direction } else { 0 };
    }
    fn set_duck_spinner_power(&mut self, power: f64) {
        self.duck_power = power;
    }
    fn set_left_velocity(&mut self, velocity: f64) {
        self.left_velocity = velocity;
    }
    fn set_right_velocity(&mut self, velocity: f64) {
        self.right_velocity = velocity;
    }
    fn set_swerve_velocity(&mut self, velocity: f64) {
        self.swerve_velocity = velocity;
    }
    fn set_swivel_angle(&mut self, angle: f64) {
        self.swivel_angle = angle;
    }
}

#[derive(Debug)]
pub struct MockCrane {
    pub shoulder: i32,
    pub elbow: i32,
    pub wrist: i32,
    pub turret: f64,
    pub articulations: Vec<CraneArticulation, 16>,
    pub dumps: u32,
}

impl Default for MockCrane {
    fn default() -> Self {
        Self {
            shoulder: 1500,
            elbow: 1500,
            wrist: 1500,
            turret: 0.0,
            articulations: Vec::new(),
            dumps: 0,
        }
    }
}

impl TelemetryProvider for MockCrane {
    fn telemetry(&self, _debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Shoulder", self.shoulder);
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Crane"
    }
}

impl Crane for MockCrane {
    fn articulate(&mut self, articulation: CraneArticulation) -> bool {
        let _ = self.articulations.push(articulation);
        true
    }
    fn dump(&mut self) {
        self.dumps += 1;
    }
    fn shoulder_target(&self) -> i32 {
        self.shoulder
    }
    fn set_shoulder_target(&mut self, counts: i32) {
        self.shoulder = counts.clamp(SERVO_MIN, SERVO_MAX);
    }
    fn elbow_target(&self) -> i32 {
        self.elbow
    }
    fn set_elbow_target(&mut self, counts: i32) {
        self.elbow = counts.clamp(SERVO_MIN, SERVO_MAX);
    }
    fn wrist_target(&self) -> i32 {
        self.wrist
    }
    fn set_wrist_target(&mut self, counts: i32) {
        self.wrist = counts.clamp(SERVO_MIN, SERVO_MAX);
    }
    fn turret_target_angle(&self) -> f64 {
        self.turret
    }
    fn set_turret_target_angle(&mut self, angle: f64) {
        self.turret = angle;
    }
}

#[derive(Debug)]
pub struct MockGripper {
    pub pos: i32,
    pub pitch: i32,
    pub sets: u32,
    pub lifts: u32,
}

impl Default for MockGripper {
    fn default() -> Self {
        Self {
            pos: 1500,
            pitch: 1500,
            sets: 0,
            lifts: 0,
        }
    }
}

impl TelemetryProvider for MockGripper {
    fn telemetry(&self, _debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Gripper", self.pos);
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Gripper"
    }
}

impl Gripper for MockGripper {
    fn set(&mut self) {
        self.sets += 1;
    }
    fn lift(&mut self) {
        self.lifts += 1;
    }
    fn target_pos(&self) -> i32 {
        self.pos
    }
    fn set_target_pos(&mut self, counts: i32) {
        self.pos = counts.clamp(SERVO_MIN, SERVO_MAX);
    }
    fn pitch_target_pos(&self) -> i32 {
        self.pitch
    }
    fn set_pitch_target_pos(&mut self, counts: i32) {
        self.pitch = counts.clamp(SERVO_MIN, SERVO_MAX);
    }
}

/// Robot whose `Diagnostic` articulation completes after `diagnostic_ticks` calls
#[derive(Debug, Default)]
pub struct MockRobot {
    pub drive: MockDriveTrain,
    pub crane: MockCrane,
    pub gripper: MockGripper,
    pub articulations: Vec<RobotArticulation, 64>,
    pub diagnostic_ticks: u32,
    pub stops: u32,
    pub updates: u32,
}

impl TelemetryProvider for MockRobot {
    fn telemetry(&self, _debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Updates", self.updates as i64);
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Robot"
    }
}

impl Robot for MockRobot {
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
        let _ = self.articulations.push(articulation);
        if articulation == RobotArticulation::Diagnostic {
            let calls = self
                .articulations
                .iter()
                .filter(|a| **a == RobotArticulation::Diagnostic)
                .count() as u32;
            return calls >= self.diagnostic_ticks;
        }
        true
    }
    fn stop(&mut self) {
        self.stops += 1;
        self.drive.command = DriveCommand::ZERO;
    }
    fn update(&mut self, overlay: &mut FieldOverlay) {
        self.updates += 1;
        overlay.stroke_circle(self.drive.pose.x, self.drive.pose.y, 0.2);
    }
}

/// Routine that finishes on its `finish_after`-th call, then stays inert
#[derive(Debug, Default)]
pub struct MockRoutine {
    pub finish_after: Option<u32>,
    pub calls: u32,
    pub resets: u32,
    done: bool,
}

impl Routine for MockRoutine {
    fn execute(&mut self, _robot: &mut dyn Robot) -> bool {
        if self.done {
            return false;
        }
        self.calls += 1;
        self.done = self.finish_after == Some(self.calls);
        self.done
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.calls = 0;
        self.done = false;
    }
}

#[derive(Debug, Default)]
pub struct MockVision {
    pub index: usize,
    pub initialized: bool,
    pub fail_init: bool,
    pub updates: u32,
    pub saves: u32,
}

impl TelemetryProvider for MockVision {
    fn telemetry(&self, _debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Provider", self.index);
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Vision"
    }
}

impl VisionProvider for MockVision {
    fn initialize_vision(&mut self) -> Result<(), VisionError> {
        if self.fail_init {
            return Err(VisionError::InitFailed);
        }
        self.initialized = true;
        Ok(())
    }
    fn shutdown_vision(&mut self) -> Result<(), VisionError> {
        self.initialized = false;
        Ok(())
    }
    fn update(&mut self) {
        self.updates += 1;
    }
    fn save_dashboard_image(&mut self) -> Result<(), VisionError> {
        if !self.initialized {
            return Err(VisionError::NotInitialized);
        }
        self.saves += 1;
        Ok(())
    }
}

/// Four routines and a two-entry vision table
#[derive(Debug, Default)]
pub struct MockSuite {
    pub red: MockRoutine,
    pub blue: MockRoutine,
    pub back_and_forth: MockRoutine,
    pub square: MockRoutine,
    pub vision: MockVision,
    pub built: Option<(Alliance, StartingPosition)>,
    pub providers_created: u32,
}

impl AutonomousSuite for MockSuite {
    fn build(&mut self, alliance: Alliance, start: StartingPosition) {
        self.built = Some((alliance, start));
    }
    fn routine(&mut self, kind: RoutineKind) -> &mut dyn Routine {
        match kind {
            RoutineKind::AutonomousRed => &mut self.red,
            RoutineKind::AutonomousBlue => &mut self.blue,
            RoutineKind::BackAndForth => &mut self.back_and_forth,
            RoutineKind::Square => &mut self.square,
        }
    }
    fn vision_provider_count(&self) -> usize {
        2
    }
    fn create_vision_provider(&mut self, index: usize) {
        self.providers_created += 1;
        self.vision = MockVision {
            index,
            fail_init: self.vision.fail_init,
            ..MockVision::default()
        };
    }
    fn vision_provider(&mut self) -> &mut dyn VisionProvider {
        &mut self.vision
    }
    fn vision_provider_ref(&self) -> &dyn VisionProvider {
        &self.vision
    }
}
