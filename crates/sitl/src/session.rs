//! Simulation session.
//!
//! Owns the op-mode, the simulated robot behind it, the parameter store, the
//! gamepad script and the telemetry sinks, and steps them at a fixed rate.
//! Before the script's `play` tick every step is an init-loop tick; from then
//! on every step is a match tick.

use std::io::Write;
use std::time::{Duration, Instant};

use reach_core::parameters::{ParamValue, ParameterStore};
use reach_core::telemetry::TelemetrySink;
use reach_core::{OpMode, OpModeError};

use crate::autonomous::SimAutonomous;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::robot::SimRobot;
use crate::script::ScriptedGamepads;
use crate::telemetry::{ConsoleDisplay, JsonDashboard};
use crate::time::{SitlTimeSource, TimeMode};

/// Op-mode running against the simulated robot
pub type SimOpMode = OpMode<SimRobot, SimAutonomous, SitlTimeSource>;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Control loop rate in Hz.
    pub rate_hz: u32,
    pub time_mode: TimeMode,
    pub sim: SimConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rate_hz: 50,
            time_mode: TimeMode::Lockstep,
            sim: SimConfig::default(),
        }
    }
}

pub struct SimSession {
    opmode: SimOpMode,
    time: SitlTimeSource,
    store: ParameterStore,
    script: ScriptedGamepads,
    console: ConsoleDisplay,
    dashboard: JsonDashboard,
    period_ns: u64,
    time_mode: TimeMode,
    deadline: Option<Instant>,
    tick: u64,
    started: bool,
    stopped: bool,
}

impl SimSession {
    /// Build the simulated robot and run op-mode INIT.
    pub fn new(config: SessionConfig, script: ScriptedGamepads) -> Result<Self, SimError> {
        if config.rate_hz == 0 {
            return Err(SimError::Args("rate must be positive".to_string()));
        }

        let time = SitlTimeSource::new();
        let mut store = ParameterStore::new();
        let robot = SimRobot::new(&config.sim, time.clone());
        let auto = SimAutonomous::new(config.sim.clone());
        let opmode = OpMode::init(robot, auto, time.clone(), &mut store)?;

        let interval_ms = u64::from(opmode.params().telemetry_interval_ms);
        Ok(Self {
            dashboard: JsonDashboard::new(time.clone(), interval_ms, None),
            console: ConsoleDisplay::silent(),
            opmode,
            time,
            store,
            script,
            period_ns: 1_000_000_000 / u64::from(config.rate_hz),
            time_mode: config.time_mode,
            deadline: None,
            tick: 0,
            started: false,
            stopped: false,
        })
    }

    pub fn with_console(mut self, console: ConsoleDisplay) -> Self {
        self.console = console;
        self
    }

    /// Write dashboard packets as JSON lines to `out`.
    pub fn with_json_output(mut self, out: Box<dyn Write + Send>) -> Self {
        let interval_ms = u64::from(self.opmode.params().telemetry_interval_ms);
        self.dashboard = JsonDashboard::new(self.time.clone(), interval_ms, Some(out));
        self
    }

    /// Edit a tunable; applied on the next step while browsing.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<(), SimError> {
        self.store.set(name, value).map_err(OpModeError::from)?;
        Ok(())
    }

    /// Run one tick: START on the play tick, init-loop before, match after.
    pub fn step(&mut self) -> Result<(), SimError> {
        if self.time_mode == TimeMode::Realtime {
            self.wait_for_deadline();
        }
        self.time.advance_ns(self.period_ns);

        if !self.started && self.script.play_tick().is_some_and(|t| self.tick >= t) {
            self.opmode.start()?;
            self.started = true;
        }

        if self.opmode.reload_params(&mut self.store) {
            log::info!("Parameters reloaded at tick {}", self.tick);
        }

        let [gamepad1, gamepad2] = self.script.sample(self.tick);
        let mut sinks: [&mut dyn TelemetrySink; 2] = [&mut self.console, &mut self.dashboard];
        if self.started {
            self.opmode.tick(&gamepad1, &gamepad2, &mut sinks);
        } else {
            self.opmode.init_loop(&gamepad1, &gamepad2, &mut sinks)?;
        }

        self.tick += 1;
        Ok(())
    }

    /// Run `ticks` steps.
    pub fn run(&mut self, ticks: u64) -> Result<(), SimError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Op-mode teardown; later calls are no-ops.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.opmode.stop();
            self.stopped = true;
        }
    }

    fn wait_for_deadline(&mut self) {
        let period = Duration::from_nanos(self.period_ns);
        let now = Instant::now();
        let deadline = self.deadline.map_or(now, |d| d + period);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.deadline = Some(deadline.max(now));
    }

    pub fn opmode(&self) -> &SimOpMode {
        &self.opmode
    }

    pub fn opmode_mut(&mut self) -> &mut SimOpMode {
        &mut self.opmode
    }

    pub fn robot(&self) -> &SimRobot {
        self.opmode.robot()
    }

    pub fn autonomous(&self) -> &SimAutonomous {
        self.opmode.autonomous()
    }

    pub fn console(&self) -> &ConsoleDisplay {
        &self.console
    }

    pub fn dashboard(&self) -> &JsonDashboard {
        &self.dashboard
    }

    pub fn time(&self) -> &SitlTimeSource {
        &self.time
    }

    pub fn script_mut(&mut self) -> &mut ScriptedGamepads {
        &mut self.script
    }

    /// Ticks run so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_core::state::GameState;
    use reach_core::traits::TimeSource;

    fn session(script: ScriptedGamepads) -> SimSession {
        SimSession::new(
            SessionConfig {
                sim: SimConfig::seeded(3),
                ..SessionConfig::default()
            },
            script,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = SessionConfig {
            rate_hz: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            SimSession::new(config, ScriptedGamepads::new()),
            Err(SimError::Args(_))
        ));
    }

    #[test]
    fn test_vision_failure_is_fatal() {
        let config = SessionConfig {
            sim: SimConfig {
                fail_vision_init: true,
                ..SimConfig::seeded(3)
            },
            ..SessionConfig::default()
        };
        assert!(matches!(
            SimSession::new(config, ScriptedGamepads::new()),
            Err(SimError::OpMode(OpModeError::Vision(_)))
        ));
    }

    #[test]
    fn test_steps_advance_time() {
        let mut session = session(ScriptedGamepads::new());
        session.run(5).unwrap();
        assert_eq!(session.tick(), 5);
        assert_eq!(session.time().now_ms(), 100);
        assert!(!session.is_started());
        assert!(session.opmode().is_initializing());
    }

    #[test]
    fn test_play_tick_starts_match() {
        let mut script = ScriptedGamepads::new();
        script.play_at(2);
        let mut session = session(script);
        session.run(2).unwrap();
        assert!(!session.is_started());
        session.step().unwrap();
        assert!(session.is_started());
        assert!(!session.opmode().is_initializing());
        assert_eq!(session.opmode().state(), GameState::TeleOp);
    }

    #[test]
    fn test_param_edit_applied_while_browsing() {
        let mut session = session(ScriptedGamepads::new());
        session
            .set_param("TELE_FWD_SCALE", ParamValue::Float(24.0))
            .unwrap();
        session.step().unwrap();
        assert!((session.opmode().params().forward_scale - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_param_rejected() {
        let mut session = session(ScriptedGamepads::new());
        assert!(session.set_param("NOPE", ParamValue::Int(1)).is_err());
    }

    #[test]
    fn test_sinks_receive_frames() {
        let mut session = session(ScriptedGamepads::new());
        session.run(3).unwrap();
        assert_eq!(session.console().frames(), 3);
        assert!(session.dashboard().sent() >= 1);
        assert!(session.console().lines()[0].starts_with("(0): Tele-Op"));
    }
}
