//! Op-mode Parameter Definitions
//!
//! Tunables read by the op-mode at init.
//!
//! # Parameters
//!
//! - `TELE_FWD_SCALE` - Forward velocity per unit of stick deflection
//! - `TELE_TRACK_W` - Drivetrain track width in meters (derives the rotate scale)
//! - `TELE_TANK_DZ` - Tank drive stick-difference deadzone
//! - `JOY_DZ` - Joystick deadzone for "sticks active" checks
//! - `LOOP_SMOOTH` - Loop time smoothing factor
//! - `DIAG_STEP_SLOW` / `DIAG_STEP_FAST` - Servo counts per tick in diagnostics
//! - `TELEM_DEBUG` - Debug telemetry enabled at startup
//! - `CHAS_LEN_MIN` / `CHAS_LEN_MAX` - Chassis length range in meters
//! - `TELEM_INTV_MS` - Telemetry transmission interval (read-only)

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_FORWARD_SCALE: f32 = 48.0;
const DEFAULT_TRACK_WIDTH: f32 = 0.308162;
const DEFAULT_TANK_DEADZONE: f32 = 0.3;
const DEFAULT_JOYSTICK_DEADZONE: f32 = 0.05;
const DEFAULT_LOOP_SMOOTHING: f32 = 0.1;
const DEFAULT_DIAG_STEP_SLOW: i32 = 5;
const DEFAULT_DIAG_STEP_FAST: i32 = 15;
const DEFAULT_DEBUG_TELEMETRY: bool = false;
const DEFAULT_CHASSIS_LENGTH_MIN: f32 = 0.0;
const DEFAULT_CHASSIS_LENGTH_MAX: f32 = 0.864;
const DEFAULT_TELEMETRY_INTERVAL_MS: i32 = 25;

const MIN_TRACK_WIDTH: f64 = 0.05;
const MAX_CHASSIS_LENGTH: f64 = 2.0;

/// Op-mode parameters loaded from the parameter store
#[derive(Debug, Clone, PartialEq)]
pub struct OpModeParams {
    /// Forward velocity per unit of stick deflection
    pub forward_scale: f64,
    /// Track width in meters
    pub track_width: f64,
    /// Tank drive: rotate is zeroed when |right - left| is below this
    pub tank_deadzone: f64,
    /// Sticks within this magnitude count as idle
    pub joystick_deadzone: f64,
    /// Loop time smoothing factor (0, 1]
    pub loop_smoothing: f64,
    /// Fine servo adjustment, counts per tick at full deflection
    pub diag_step_slow: i32,
    /// Coarse servo adjustment, counts per tick at full deflection
    pub diag_step_fast: i32,
    /// Debug telemetry enabled at startup
    pub debug_telemetry: bool,
    /// Shortest chassis length in meters
    pub chassis_length_min: f64,
    /// Longest chassis length in meters
    pub chassis_length_max: f64,
    /// Telemetry transmission interval in milliseconds
    pub telemetry_interval_ms: u32,
}

impl Default for OpModeParams {
    fn default() -> Self {
        Self {
            forward_scale: DEFAULT_FORWARD_SCALE as f64,
            track_width: DEFAULT_TRACK_WIDTH as f64,
            tank_deadzone: DEFAULT_TANK_DEADZONE as f64,
            joystick_deadzone: DEFAULT_JOYSTICK_DEADZONE as f64,
            loop_smoothing: DEFAULT_LOOP_SMOOTHING as f64,
            diag_step_slow: DEFAULT_DIAG_STEP_SLOW,
            diag_step_fast: DEFAULT_DIAG_STEP_FAST,
            debug_telemetry: DEFAULT_DEBUG_TELEMETRY,
            chassis_length_min: DEFAULT_CHASSIS_LENGTH_MIN as f64,
            chassis_length_max: DEFAULT_CHASSIS_LENGTH_MAX as f64,
            telemetry_interval_ms: DEFAULT_TELEMETRY_INTERVAL_MS as u32,
        }
    }
}

impl OpModeParams {
    /// Register op-mode parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let none = ParamFlags::empty();
        store.register(
            "TELE_FWD_SCALE",
            ParamValue::Float(DEFAULT_FORWARD_SCALE),
            none,
        )?;
        store.register("TELE_TRACK_W", ParamValue::Float(DEFAULT_TRACK_WIDTH), none)?;
        store.register(
            "TELE_TANK_DZ",
            ParamValue::Float(DEFAULT_TANK_DEADZONE),
            none,
        )?;
        store.register(
            "JOY_DZ",
            ParamValue::Float(DEFAULT_JOYSTICK_DEADZONE),
            none,
        )?;
        store.register(
            "LOOP_SMOOTH",
            ParamValue::Float(DEFAULT_LOOP_SMOOTHING),
            none,
        )?;
        store.register(
            "DIAG_STEP_SLOW",
            ParamValue::Int(DEFAULT_DIAG_STEP_SLOW),
            none,
        )?;
        store.register(
            "DIAG_STEP_FAST",
            ParamValue::Int(DEFAULT_DIAG_STEP_FAST),
            none,
        )?;
        store.register(
            "TELEM_DEBUG",
            ParamValue::Bool(DEFAULT_DEBUG_TELEMETRY),
            none,
        )?;
        store.register(
            "CHAS_LEN_MIN",
            ParamValue::Float(DEFAULT_CHASSIS_LENGTH_MIN),
            none,
        )?;
        store.register(
            "CHAS_LEN_MAX",
            ParamValue::Float(DEFAULT_CHASSIS_LENGTH_MAX),
            none,
        )?;
        store.register(
            "TELEM_INTV_MS",
            ParamValue::Int(DEFAULT_TELEMETRY_INTERVAL_MS),
            ParamFlags::READ_ONLY,
        )?;
        Ok(())
    }

    /// Load op-mode parameters from the store
    ///
    /// Missing or mistyped entries fall back to defaults; out-of-range
    /// values are clamped. Floats are stored as `f32`, so loaded values
    /// carry f32 rounding (0.864 reads back as 0.86400002...).
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();
        let float = |name: &str, default: f64| -> f64 {
            store
                .get(name)
                .and_then(ParamValue::as_f64)
                .unwrap_or(default)
        };
        let int = |name: &str, default: i32| -> i32 {
            match store.get(name) {
                Some(ParamValue::Int(v)) => *v,
                Some(ParamValue::Float(v)) => *v as i32,
                _ => default,
            }
        };

        let chassis_length_min = float("CHAS_LEN_MIN", defaults.chassis_length_min)
            .clamp(0.0, MAX_CHASSIS_LENGTH);
        let chassis_length_max = float("CHAS_LEN_MAX", defaults.chassis_length_max)
            .clamp(chassis_length_min, MAX_CHASSIS_LENGTH);

        Self {
            forward_scale: float("TELE_FWD_SCALE", defaults.forward_scale).max(0.0),
            track_width: float("TELE_TRACK_W", defaults.track_width).max(MIN_TRACK_WIDTH),
            tank_deadzone: float("TELE_TANK_DZ", defaults.tank_deadzone).clamp(0.0, 2.0),
            joystick_deadzone: float("JOY_DZ", defaults.joystick_deadzone).clamp(0.0, 1.0),
            loop_smoothing: float("LOOP_SMOOTH", defaults.loop_smoothing).clamp(0.001, 1.0),
            diag_step_slow: int("DIAG_STEP_SLOW", defaults.diag_step_slow).max(0),
            diag_step_fast: int("DIAG_STEP_FAST", defaults.diag_step_fast).max(0),
            debug_telemetry: match store.get("TELEM_DEBUG") {
                Some(ParamValue::Bool(v)) => *v,
                _ => defaults.debug_telemetry,
            },
            chassis_length_min,
            chassis_length_max,
            telemetry_interval_ms: int("TELEM_INTV_MS", DEFAULT_TELEMETRY_INTERVAL_MS).max(1)
                as u32,
        }
    }

    /// Angular velocity per unit of stick deflection
    ///
    /// Scaled so a full rotate command spins the wheels as fast as a full
    /// forward command drives them.
    pub fn rotate_scale(&self) -> f64 {
        self.forward_scale * (2.0 / self.track_width)
    }
}
