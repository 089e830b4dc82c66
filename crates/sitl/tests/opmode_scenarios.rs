//! End-to-end scenarios: the real op-mode driving the simulated robot.

use reach_core::input::{Buttons, GamepadState};
use reach_core::parameters::ParameterStore;
use reach_core::robot::{Crane, DriveTrain, RoutineKind};
use reach_core::state::{Alliance, GameState, StartingPosition};
use reach_core::telemetry::{TelemetrySink, TelemetryValue};
use reach_core::teleop::{DriveCommand, DriveSource};
use reach_core::{OpMode, OpModeError, VisionError};
use reach_sitl::{
    ConsoleDisplay, ProviderKind, SimAutonomous, SimConfig, SimOpMode, SimRobot, SitlTimeSource,
};

const IDLE: GamepadState = GamepadState::IDLE;
const TICK_MS: u64 = 20;

struct Harness {
    opmode: SimOpMode,
    time: SitlTimeSource,
    console: ConsoleDisplay,
    playing: bool,
}

impl Harness {
    fn new(config: SimConfig) -> Self {
        let time = SitlTimeSource::new();
        let mut store = ParameterStore::new();
        let robot = SimRobot::new(&config, time.clone());
        let auto = SimAutonomous::new(config);
        let opmode = OpMode::init(robot, auto, time.clone(), &mut store).unwrap();
        Self {
            opmode,
            time,
            console: ConsoleDisplay::silent(),
            playing: false,
        }
    }

    fn seeded() -> Self {
        Self::new(SimConfig::seeded(5))
    }

    fn step(&mut self, gamepad1: &GamepadState, gamepad2: &GamepadState) {
        self.time.advance_ms(TICK_MS);
        let mut sinks: [&mut dyn TelemetrySink; 1] = [&mut self.console];
        if self.playing {
            self.opmode.tick(gamepad1, gamepad2, &mut sinks);
        } else {
            self.opmode
                .init_loop(gamepad1, gamepad2, &mut sinks)
                .unwrap();
        }
    }

    fn idle(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step(&IDLE, &IDLE);
        }
    }

    /// Hold for one tick, release for one; the press lands on the release tick
    fn tap(&mut self, pad: usize, buttons: Buttons) {
        let pressed = IDLE.with_buttons(buttons);
        if pad == 1 {
            self.step(&pressed, &IDLE);
        } else {
            self.step(&IDLE, &pressed);
        }
        self.step(&IDLE, &IDLE);
    }

    fn play(&mut self) {
        self.opmode.start().unwrap();
        self.playing = true;
    }

    /// Browse to `state` and activate it
    fn activate(&mut self, state: GameState) {
        while self.opmode.state() != state {
            self.tap(1, Buttons::RIGHT_BUMPER);
        }
        self.tap(1, Buttons::START);
        assert!(self.opmode.is_active());
    }

    fn robot(&self) -> &SimRobot {
        self.opmode.robot()
    }

    fn has_line(&self, line: &str) -> bool {
        self.console.lines().iter().any(|l| l == line)
    }
}

#[test]
fn test_vision_init_failure_is_fatal() {
    let config = SimConfig {
        fail_vision_init: true,
        ..SimConfig::seeded(5)
    };
    let time = SitlTimeSource::new();
    let result = OpMode::init(
        SimRobot::new(&config, time.clone()),
        SimAutonomous::new(config),
        time,
        &mut ParameterStore::new(),
    );
    assert!(matches!(
        result,
        Err(OpModeError::Vision(VisionError::InitFailed))
    ));
}

#[test]
fn test_init_seeds_pose_and_folds_robot() {
    let mut h = Harness::seeded();
    h.idle(60);
    let pose = h.robot().sim_drive_train().pose_estimate();
    assert_eq!(pose, StartingPosition::BlueUp.pose());
    assert_eq!(
        h.robot().completed(),
        Some(reach_core::articulation::RobotArticulation::Init)
    );
    assert!(h.opmode.autonomous().sim_vision().is_initialized());
}

#[test]
fn test_pregame_lower_then_red_selects_red_upper() {
    let mut h = Harness::seeded();
    h.tap(1, Buttons::A);
    assert_eq!(h.opmode.starting_position(), StartingPosition::BlueDown);
    assert_eq!(
        h.robot().sim_drive_train().pose_estimate(),
        StartingPosition::BlueDown.pose()
    );

    h.tap(1, Buttons::B);
    assert_eq!(h.opmode.pregame().alliance, Alliance::Red);
    assert_eq!(h.opmode.starting_position(), StartingPosition::RedUp);
}

#[test]
fn test_browse_round_trip() {
    let mut h = Harness::seeded();
    h.play();
    for n in [1, 5, 6, 7, 13] {
        for _ in 0..n {
            h.tap(1, Buttons::RIGHT_BUMPER);
        }
        for _ in 0..n {
            h.tap(1, Buttons::LEFT_BUMPER);
        }
        assert_eq!(h.opmode.state(), GameState::TeleOp);
    }
}

#[test]
fn test_tank_full_forward_drives_robot() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::TeleOp);

    let sticks = IDLE.with_sticks_y(-1.0, -1.0);
    // Joystick activity is sampled at the end of a tick
    h.step(&sticks, &IDLE);
    h.step(&sticks, &IDLE);
    assert_eq!(h.opmode.drive_source(), DriveSource::Tank);
    assert!((h.opmode.drive_command().forward - 48.0).abs() < 1e-9);
    assert_eq!(h.opmode.drive_command().rotate, 0.0);
    assert_eq!(h.robot().sim_drive_train().command(), h.opmode.drive_command());

    let start_y = h.robot().sim_drive_train().pose_estimate().y;
    for _ in 0..50 {
        h.step(&sticks, &IDLE);
    }
    // Blue upper start faces -y
    let pose = h.robot().sim_drive_train().pose_estimate();
    assert!(start_y - pose.y > 1.0);
}

#[test]
fn test_both_controllers_deflected_is_idle() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::TeleOp);

    let sticks = IDLE.with_sticks_y(-1.0, -1.0);
    h.step(&sticks, &sticks);
    h.step(&sticks, &sticks);
    assert_eq!(h.opmode.drive_source(), DriveSource::Idle);
    assert_eq!(h.opmode.drive_command(), DriveCommand::ZERO);
}

#[test]
fn test_arcade_from_gamepad_two() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::TeleOp);

    let mut stick = IDLE;
    stick.left_stick_y = -0.5;
    h.step(&IDLE, &stick);
    h.step(&IDLE, &stick);
    assert_eq!(h.opmode.drive_source(), DriveSource::Arcade);
    assert!((h.opmode.drive_command().forward - 24.0).abs() < 1e-9);
}

#[test]
fn test_autonomous_completion_returns_to_teleop() {
    let mut h = Harness::new(SimConfig {
        routine_leg_ticks: 5,
        duck_spin_ticks: 5,
        ..SimConfig::seeded(5)
    });
    h.tap(1, Buttons::B);
    h.play();
    h.activate(GameState::Autonomous);

    let mut ticks = 0;
    while h.opmode.is_active() {
        h.step(&IDLE, &IDLE);
        ticks += 1;
        assert!(ticks < 2_000, "autonomous never completed");
    }

    // Completion lands back on tele-op, inactive
    assert_eq!(h.opmode.state(), GameState::TeleOp);
    let auto = h.opmode.autonomous();
    assert_eq!(auto.sim_routine(RoutineKind::AutonomousRed).completions(), 1);
    assert_eq!(auto.sim_routine(RoutineKind::AutonomousBlue).completions(), 0);
    assert_eq!(h.robot().sim_crane().dumps(), 1);

    // The routine is not polled again
    h.idle(10);
    assert!(!h.opmode.is_active());
    assert_eq!(
        h.opmode
            .autonomous()
            .sim_routine(RoutineKind::AutonomousRed)
            .completions(),
        1
    );

    // Re-activating runs tele-op
    h.tap(1, Buttons::START);
    let sticks = IDLE.with_sticks_y(-1.0, -1.0);
    h.step(&sticks, &IDLE);
    h.step(&sticks, &IDLE);
    assert_eq!(h.opmode.drive_source(), DriveSource::Tank);
}

#[test]
fn test_canned_routine_stays_in_mode() {
    let mut h = Harness::new(SimConfig {
        routine_leg_ticks: 3,
        ..SimConfig::seeded(5)
    });
    h.play();
    h.activate(GameState::BackAndForth);
    h.idle(30);
    assert!(h.opmode.is_active());
    assert_eq!(h.opmode.state(), GameState::BackAndForth);
    assert_eq!(
        h.opmode
            .autonomous()
            .sim_routine(RoutineKind::BackAndForth)
            .completions(),
        1
    );
}

#[test]
fn test_emergency_stop_cuts_motion() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::TeleOp);

    let sticks = IDLE.with_sticks_y(-1.0, -1.0);
    h.step(&sticks.with_buttons(Buttons::A), &IDLE);
    h.step(&sticks, &IDLE);
    // Blue alliance spins the duck backwards
    assert!((h.robot().sim_drive_train().duck_spinner_power() + 0.5).abs() < 1e-9);

    h.step(&sticks, &IDLE.with_buttons(Buttons::GUIDE));
    h.step(&sticks, &IDLE);
    assert_eq!(h.opmode.drive_command(), DriveCommand::ZERO);
    assert_eq!(h.robot().sim_drive_train().command(), DriveCommand::ZERO);
    assert_eq!(h.robot().sim_drive_train().duck_spinner_power(), 0.0);
    assert_eq!(h.robot().stops(), 1);
}

#[test]
fn test_emergency_stop_halts_square_routine() {
    let mut h = Harness::new(SimConfig {
        routine_leg_ticks: 20,
        ..SimConfig::seeded(5)
    });
    h.play();
    h.activate(GameState::Square);
    h.idle(5);
    assert!(h.robot().sim_drive_train().command().forward > 0.0);

    h.tap(1, Buttons::GUIDE);
    assert_eq!(h.robot().stops(), 1);
    assert!(!h.opmode.is_active());
    assert_eq!(h.opmode.state(), GameState::Square);

    let pose = h.robot().sim_drive_train().pose_estimate();
    h.idle(40);
    assert_eq!(h.robot().sim_drive_train().command(), DriveCommand::ZERO);
    assert_eq!(h.robot().sim_drive_train().pose_estimate(), pose);
}

#[test]
fn test_chassis_level_extends_chassis() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::TeleOp);

    h.tap(2, Buttons::RIGHT_BUMPER);
    assert_eq!(h.opmode.chassis_level(), 1);
    h.idle(100);
    // Lengths travel through f32 tunables
    let drive = h.robot().sim_drive_train();
    assert!((drive.target_chassis_length() - 0.288).abs() < 1e-6);
    assert!((drive.chassis_length() - 0.288).abs() < 1e-6);
    assert!(h.has_line("Chassis Level Index: 1 / 4"));

    // Down from level 0 wraps to the longest level
    h.tap(2, Buttons::LEFT_BUMPER);
    h.tap(2, Buttons::LEFT_BUMPER);
    assert_eq!(h.opmode.chassis_level(), 3);
}

#[test]
fn test_crane_buttons_score_high() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::TeleOp);

    h.tap(2, Buttons::DPAD_UP);
    h.idle(80);
    assert_eq!(h.robot().sim_crane().shoulder_target(), 2150);

    h.tap(2, Buttons::B);
    assert_eq!(h.robot().sim_crane().dumps(), 1);
}

#[test]
fn test_manual_diagnostic_adjusts_shoulder() {
    let mut h = Harness::seeded();
    h.play();
    h.activate(GameState::ManualDiagnostic);

    for _ in 0..4 {
        h.tap(1, Buttons::RIGHT_BUMPER);
    }
    assert_eq!(h.opmode.diagnostic().step().name(), "CRANE_SHOULDER_SERVO");

    let fine = IDLE.with_sticks_y(0.0, -1.0);
    for _ in 0..3 {
        h.step(&fine, &IDLE);
    }
    assert_eq!(h.robot().sim_crane().shoulder_target(), 1515);
    assert_eq!(
        h.opmode
            .frame()
            .value("(3): Manual Diagnostic", "Servo Target Pos"),
        Some(&TelemetryValue::Int(1510))
    );
}

#[test]
fn test_vision_switch_selects_provider() {
    let mut h = Harness::seeded();
    h.tap(1, Buttons::DPAD_UP);
    assert!(!h.opmode.autonomous().sim_vision().is_initialized());

    h.tap(1, Buttons::DPAD_LEFT);
    assert_eq!(h.opmode.autonomous().sim_vision().kind(), ProviderKind::Fixed);

    h.tap(1, Buttons::DPAD_UP);
    assert!(h.opmode.autonomous().sim_vision().is_initialized());

    h.play();
    let auto = h.opmode.autonomous();
    assert_eq!(auto.tier(), reach_core::articulation::CraneArticulation::MiddleTier);
    assert_eq!(auto.built(), Some((Alliance::Blue, StartingPosition::BlueUp)));
    // Camera released at start
    assert!(!auto.sim_vision().is_initialized());
}

#[test]
fn test_save_image_while_active_in_init() {
    let mut h = Harness::seeded();
    h.tap(1, Buttons::START);
    assert!(h.opmode.is_active());
    h.tap(1, Buttons::DPAD_RIGHT);
    assert_eq!(h.opmode.autonomous().sim_vision().saved_images(), 1);
}

#[test]
fn test_telemetry_sections() {
    let mut h = Harness::seeded();
    h.idle(1);
    assert!(h.has_line("Starting Position: START_BLUE_UP"));
    for header in ["(0): Tele-Op", "Drive Train", "Crane", "Gripper", "Robot", "Vision"] {
        assert!(h.has_line(header), "missing section {}", header);
    }

    h.play();
    h.idle(1);
    assert!(!h
        .console
        .lines()
        .iter()
        .any(|l| l.starts_with("Starting Position")));
}
