//! The op-mode
//!
//! Per-tick order is fixed: consume last tick's edges (state switch, the
//! handler for the current mode, then the guide emergency stop so it wins),
//! then the shared update, which samples
//! joystick activity, advances both edge detectors exactly once, measures
//! loop timing and publishes telemetry.

use core::fmt::Write;

use crate::articulation::{RobotArticulation, RoutineLatch};
use crate::diagnostic::{DiagnosticSequencer, ServoStepSizes};
use crate::error::OpModeError;
use crate::input::{Buttons, EdgeDetector, Edges, GamepadState};
use crate::parameters::{OpModeParams, ParameterStore};
use crate::robot::{AutonomousSuite, Robot, RoutineKind};
use crate::state::{
    GameState, GameStateMachine, PregameConfig, StartingPosition, VisionAction, VisionSwitch,
};
use crate::telemetry::{
    format_loop_time, FieldOverlay, TelemetryFrame, TelemetryMap, TelemetrySink, TelemetryValue,
    TITLE_LEN,
};
use crate::teleop::{
    arbitrate, map_buttons, ChassisLengthLevels, DriveCommand, DriveScaling, DriveSource,
    TeleopCommand, CHASSIS_LEVEL_COUNT,
};
use crate::traits::TimeSource;

/// Provider table entry created at init
const DEFAULT_VISION_PROVIDER: usize = 0;

const NANOS_PER_MS: u64 = 1_000_000;

/// Tick orchestrator for one match program
pub struct OpMode<R: Robot, A: AutonomousSuite, T: TimeSource> {
    robot: R,
    auto: A,
    time: T,

    params: OpModeParams,
    scaling: DriveScaling,

    machine: GameStateMachine,
    pregame: PregameConfig,
    vision: VisionSwitch,
    chassis: ChassisLengthLevels,
    diagnostic: DiagnosticSequencer,
    diagnostic_latch: RoutineLatch,

    gamepad1: EdgeDetector,
    gamepad2: EdgeDetector,
    /// Joystick activity sampled at the end of the previous tick
    joysticks_active: [bool; 2],

    drive: DriveCommand,
    drive_source: DriveSource,

    timing: crate::scheduler::LoopTiming,
    frame: TelemetryFrame,
    overlay: FieldOverlay,
}

impl<R: Robot, A: AutonomousSuite, T: TimeSource> OpMode<R, A, T> {
    /// INIT: load parameters, seed the pose, bring up the default vision
    /// provider (blocking) and fold the robot
    ///
    /// Registers any missing op-mode parameters in `store` first. A vision
    /// initialization failure is fatal.
    pub fn init(
        mut robot: R,
        mut auto: A,
        time: T,
        store: &mut ParameterStore,
    ) -> Result<Self, OpModeError> {
        OpModeParams::register_defaults(store)?;
        let params = OpModeParams::from_store(store);
        store.clear_dirty();

        let pregame = PregameConfig::new(params.debug_telemetry);
        robot
            .drive_train()
            .set_pose_estimate(pregame.starting_position.pose());

        auto.create_vision_provider(DEFAULT_VISION_PROVIDER);
        auto.vision_provider().initialize_vision()?;
        let mut vision = VisionSwitch::new();
        vision.set_finalized(true);

        robot.articulate(RobotArticulation::Init);

        let timing = crate::scheduler::LoopTiming::new(
            params.loop_smoothing,
            params.telemetry_interval_ms as u64 * NANOS_PER_MS,
            time.now_ns(),
        );

        crate::log_info!(
            "Op-mode initialized, start {}",
            pregame.starting_position.label()
        );

        Ok(Self {
            robot,
            auto,
            time,
            scaling: DriveScaling::from_params(&params),
            chassis: ChassisLengthLevels::new(params.chassis_length_min, params.chassis_length_max),
            params,
            machine: GameStateMachine::new(),
            pregame,
            vision,
            diagnostic: DiagnosticSequencer::new(),
            diagnostic_latch: RoutineLatch::new(),
            gamepad1: EdgeDetector::new(),
            gamepad2: EdgeDetector::new(),
            joysticks_active: [false; 2],
            drive: DriveCommand::ZERO,
            drive_source: DriveSource::Idle,
            timing,
            frame: TelemetryFrame::new(),
            overlay: FieldOverlay::new(),
        })
    }

    /// Pre-start tick: state switch, vision provider switch, pregame
    /// configuration, then the shared update
    ///
    /// Vision initialize/shutdown block here; their failures propagate.
    pub fn init_loop(
        &mut self,
        gamepad1: &GamepadState,
        gamepad2: &GamepadState,
        sinks: &mut [&mut dyn TelemetrySink],
    ) -> Result<(), OpModeError> {
        let edges = self.edges();
        self.handle_state_switch(&edges);
        let vision_result = self.handle_vision_switch(&edges);
        if !self.machine.is_active() {
            self.pregame.handle(&edges);
        }
        if edges.either(Buttons::GUIDE) {
            self.emergency_stop();
        }

        // Detectors must advance even if vision failed, or edges repeat
        self.update(gamepad1, gamepad2, sinks);
        vision_result
    }

    /// PLAY: build routines, release the camera and unfold the robot
    pub fn start(&mut self) -> Result<(), OpModeError> {
        self.machine.finish_initializing();

        self.auto
            .build(self.pregame.alliance, self.pregame.starting_position);
        if self.vision.is_finalized() {
            self.auto.vision_provider().shutdown_vision()?;
            self.vision.set_finalized(false);
        }

        self.robot.articulate(RobotArticulation::Start);
        let drive_train = self.robot.drive_train();
        drive_train.set_maintain_chassis_length_enabled(true);
        drive_train.set_anti_tipping_enabled(false);
        self.chassis.reset();
        drive_train.set_chassis_length(self.chassis.length());

        self.timing.reset(self.time.now_ns());

        crate::log_info!(
            "Match started, alliance {} start {}",
            self.pregame.alliance.label(),
            self.pregame.starting_position.label()
        );
        Ok(())
    }

    /// One match tick
    ///
    /// Never fails: indices wrap and actuator targets clamp.
    pub fn tick(
        &mut self,
        gamepad1: &GamepadState,
        gamepad2: &GamepadState,
        sinks: &mut [&mut dyn TelemetrySink],
    ) {
        let edges = self.edges();
        self.handle_state_switch(&edges);

        if self.machine.is_active() {
            self.dispatch(&edges, gamepad1, gamepad2);
        } else {
            self.pregame.handle(&edges);
        }
        // After dispatch so it overrides anything issued this tick
        if edges.either(Buttons::GUIDE) {
            self.emergency_stop();
        }

        self.update(gamepad1, gamepad2, sinks);
    }

    /// Guide on either controller, in every mode and phase
    ///
    /// Active routine-driven modes drop back to browsing so the routine is
    /// not polled again; tele-op and manual diagnostic stay active.
    fn emergency_stop(&mut self) {
        self.robot.stop();
        self.drive = DriveCommand::ZERO;
        match self.machine.state() {
            GameState::TeleOp | GameState::ManualDiagnostic => {}
            GameState::Autonomous
            | GameState::AutonomousDiagnostic
            | GameState::BackAndForth
            | GameState::Square => self.machine.deactivate(),
        }
        crate::log_warn!("Emergency stop in {}", self.machine.state().name());
    }

    /// Teardown: cut all motion
    pub fn stop(&mut self) {
        self.robot.stop();
        self.drive = DriveCommand::ZERO;
        crate::log_info!("Op-mode stopped");
    }

    /// Reload tunables if the store was edited; only while browsing
    ///
    /// Returns true if new values were applied.
    pub fn reload_params(&mut self, store: &mut ParameterStore) -> bool {
        if self.machine.is_active() || !store.is_dirty() {
            return false;
        }
        self.params = OpModeParams::from_store(store);
        store.clear_dirty();

        self.scaling = DriveScaling::from_params(&self.params);
        let index = self.chassis.index();
        self.chassis = ChassisLengthLevels::new(
            self.params.chassis_length_min,
            self.params.chassis_length_max,
        );
        self.chassis.step(index as i32);

        crate::log_info!("Op-mode parameters reloaded");
        true
    }

    fn edges(&self) -> Edges {
        Edges::from_detectors(&self.gamepad1, &self.gamepad2)
    }

    fn handle_state_switch(&mut self, edges: &Edges) {
        let switch = self.machine.handle_state_switch(edges);
        if switch.activated {
            self.rearm(self.machine.state());
        }
    }

    /// Fresh entry into `state`: canned routines start over
    fn rearm(&mut self, state: GameState) {
        match state {
            GameState::Autonomous => self
                .auto
                .routine(RoutineKind::autonomous(self.pregame.alliance))
                .reset(),
            GameState::BackAndForth => self.auto.routine(RoutineKind::BackAndForth).reset(),
            GameState::Square => self.auto.routine(RoutineKind::Square).reset(),
            GameState::AutonomousDiagnostic => self.diagnostic_latch.rearm(),
            GameState::TeleOp | GameState::ManualDiagnostic => {}
        }
    }

    fn handle_vision_switch(&mut self, edges: &Edges) -> Result<(), OpModeError> {
        let actions = self.vision.handle(
            edges,
            self.machine.is_active(),
            self.auto.vision_provider_count(),
        );

        for action in actions {
            match action {
                VisionAction::Recreate(index) => {
                    self.auto.create_vision_provider(index);
                    crate::log_info!("Vision provider {}", index);
                }
                VisionAction::Initialize => {
                    self.auto.vision_provider().initialize_vision()?;
                    self.vision.set_finalized(true);
                    crate::log_info!("Vision initialized");
                }
                VisionAction::Shutdown => {
                    self.auto.vision_provider().shutdown_vision()?;
                    self.vision.set_finalized(false);
                    crate::log_info!("Vision shut down");
                }
                VisionAction::SaveImage => {
                    if self.auto.vision_provider().save_dashboard_image().is_err() {
                        crate::log_warn!("Failed to save dashboard image");
                    }
                }
            }
        }
        Ok(())
    }

    /// Run exactly one handler for the active game state
    fn dispatch(&mut self, edges: &Edges, gamepad1: &GamepadState, gamepad2: &GamepadState) {
        match self.machine.state() {
            GameState::TeleOp => self.handle_teleop(edges, gamepad1, gamepad2),
            GameState::Autonomous => {
                let kind = RoutineKind::autonomous(self.pregame.alliance);
                if self.auto.routine(kind).execute(&mut self.robot) {
                    self.machine.force_teleop();
                }
            }
            GameState::AutonomousDiagnostic => {
                let robot = &mut self.robot;
                if self
                    .diagnostic_latch
                    .poll(|| robot.articulate(RobotArticulation::Diagnostic))
                {
                    crate::log_info!("Autonomous diagnostic complete");
                }
            }
            GameState::ManualDiagnostic => self.diagnostic.update(
                edges,
                &mut self.robot,
                gamepad1,
                self.params.joystick_deadzone,
                ServoStepSizes::from_params(&self.params),
            ),
            GameState::BackAndForth => {
                self.auto
                    .routine(RoutineKind::BackAndForth)
                    .execute(&mut self.robot);
            }
            GameState::Square => {
                self.auto
                    .routine(RoutineKind::Square)
                    .execute(&mut self.robot);
            }
        }
    }

    fn handle_teleop(&mut self, edges: &Edges, gamepad1: &GamepadState, gamepad2: &GamepadState) {
        for command in map_buttons(edges) {
            match command {
                TeleopCommand::GripperSet => self.robot.gripper().set(),
                TeleopCommand::GripperLift => self.robot.gripper().lift(),
                TeleopCommand::ToggleDuckSpinner => self
                    .robot
                    .drive_train()
                    .toggle_duck_spinner(self.pregame.alliance.modifier()),
                TeleopCommand::Robot(articulation) => {
                    self.robot.articulate(articulation);
                }
                TeleopCommand::Crane(articulation) => {
                    self.robot.crane().articulate(articulation);
                }
                TeleopCommand::CraneDump => self.robot.crane().dump(),
                TeleopCommand::ChassisLevel(delta) => self.chassis.step(delta),
            }
        }

        self.robot
            .drive_train()
            .set_chassis_length(self.chassis.length());

        let (source, command) = arbitrate(
            self.joysticks_active[0],
            self.joysticks_active[1],
            gamepad1,
            gamepad2,
            &self.scaling,
        );
        self.drive_source = source;
        self.drive = command;
        self.robot.drive_train().set_drive_power(command);
    }

    /// Shared tail of every tick
    fn update(
        &mut self,
        gamepad1: &GamepadState,
        gamepad2: &GamepadState,
        sinks: &mut [&mut dyn TelemetrySink],
    ) {
        if self.machine.is_initializing() {
            self.auto.vision_provider().update();
            self.robot
                .drive_train()
                .set_pose_estimate(self.pregame.starting_position.pose());
        }

        let deadzone = self.params.joystick_deadzone;
        self.joysticks_active = [
            gamepad1.joysticks_active(deadzone),
            gamepad2.joysticks_active(deadzone),
        ];

        self.gamepad1.update(gamepad1.buttons);
        self.gamepad2.update(gamepad2.buttons);

        self.timing.update(self.time.now_ns());

        self.build_frame();

        self.overlay.clear();
        self.robot.update(&mut self.overlay);

        for sink in sinks.iter_mut() {
            sink.publish(&self.frame, &self.overlay);
        }
    }

    fn build_frame(&mut self) {
        let debug = self.pregame.debug_telemetry;
        self.frame.clear();

        let mut opmode = TelemetryMap::new();
        if self.machine.is_initializing() {
            opmode.put(
                "Starting Position",
                self.pregame.starting_position.label(),
            );
        }
        opmode.put(
            "Average Loop Time",
            format_loop_time(self.timing.average_loop_ns()),
        );
        opmode.put(
            "Last Loop Time",
            format_loop_time(self.timing.last_loop_ns() as f64),
        );
        opmode.put("Active", self.machine.is_active());
        opmode.put(
            "Chassis Level Index",
            TelemetryValue::formatted(format_args!(
                "{} / {}",
                self.chassis.index(),
                CHASSIS_LEVEL_COUNT
            )),
        );
        if self.machine.state() == GameState::ManualDiagnostic {
            opmode.put("Diagnostic Step", self.diagnostic.step().name());
            opmode.put("Servo Target Pos", self.diagnostic.servo_target_pos());
        }
        if debug {
            opmode.put("Alliance", self.pregame.alliance.label());
            opmode.put("Drive Source", drive_source_label(self.drive_source));
            opmode.put("Forward", self.drive.forward);
            opmode.put("Rotate", self.drive.rotate);
            opmode.put("Loop Overruns", self.timing.overruns() as i64);
        }

        let mut title = heapless::String::<TITLE_LEN>::new();
        let _ = write!(
            title,
            "({}): {}",
            self.machine.index(),
            self.machine.state().name()
        );
        self.frame.push_section(&title, opmode);

        for provider in self.robot.subsystems() {
            self.frame
                .push_section(provider.telemetry_name(), provider.telemetry(debug));
        }
        self.frame.push_section(
            self.robot.telemetry_name(),
            self.robot.telemetry(debug),
        );

        let vision = self.auto.vision_provider_ref();
        self.frame
            .push_section(vision.telemetry_name(), vision.telemetry(debug));
    }

    // ---- accessors ----

    pub fn state(&self) -> GameState {
        self.machine.state()
    }

    /// Index of the current game state
    pub fn state_index(&self) -> usize {
        self.machine.index()
    }

    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    pub fn is_initializing(&self) -> bool {
        self.machine.is_initializing()
    }

    pub fn pregame(&self) -> &PregameConfig {
        &self.pregame
    }

    pub fn starting_position(&self) -> StartingPosition {
        self.pregame.starting_position
    }

    pub fn vision_switch(&self) -> &VisionSwitch {
        &self.vision
    }

    pub fn chassis_level(&self) -> usize {
        self.chassis.index()
    }

    pub fn diagnostic(&self) -> &DiagnosticSequencer {
        &self.diagnostic
    }

    /// Drive command sent on the last tele-op tick
    pub fn drive_command(&self) -> DriveCommand {
        self.drive
    }

    pub fn drive_source(&self) -> DriveSource {
        self.drive_source
    }

    pub fn timing(&self) -> &crate::scheduler::LoopTiming {
        &self.timing
    }

    pub fn params(&self) -> &OpModeParams {
        &self.params
    }

    /// Frame published on the last tick
    pub fn frame(&self) -> &TelemetryFrame {
        &self.frame
    }

    pub fn overlay(&self) -> &FieldOverlay {
        &self.overlay
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    pub fn robot_mut(&mut self) -> &mut R {
        &mut self.robot
    }

    pub fn autonomous(&self) -> &A {
        &self.auto
    }

    pub fn autonomous_mut(&mut self) -> &mut A {
        &mut self.auto
    }

    pub fn time(&self) -> &T {
        &self.time
    }
}

fn drive_source_label(source: DriveSource) -> &'static str {
    match source {
        DriveSource::Tank => "Tank",
        DriveSource::Arcade => "Arcade",
        DriveSource::Idle => "Idle",
    }
}
