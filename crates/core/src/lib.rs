//! reach_core - Pure no_std control core for the reach robot
//!
//! This crate contains the tick-driven control logic of the robot: mode
//! arbitration, input edge detection, tele-op mapping, the manual diagnostic
//! sequencer and telemetry aggregation. Everything here is host testable
//! without hardware; subsystems are reached only through the contracts in
//! [`robot`].
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library, no allocator, fixed-capacity collections
//! - **Trait abstractions**: Hardware and time injected via traits
//! - **No hot-path failures**: Indices wrap, actuator targets clamp
//! - **Zero cfg**: No feature flags; logging always goes through `log`
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic time source (TimeSource, MockTime)
//! - [`parameters`]: Parameter store and op-mode tunables
//! - [`input`]: Gamepad snapshot, button flags and edge detection
//! - [`filter`]: Exponential smoothing
//! - [`ordinal`]: Ordered enumeration tables and wraparound arithmetic
//! - [`state`]: Game-state machine, pregame configuration, vision switching
//! - [`teleop`]: Drive arbitration, button mapping, chassis length levels
//! - [`diagnostic`]: Manual diagnostic sequencer and actuator dispatch table
//! - [`articulation`]: Articulation names and the step runner shared by subsystems
//! - [`robot`]: Subsystem, vision and routine contracts
//! - [`telemetry`]: Telemetry frame, values, field overlay and sinks
//! - [`scheduler`]: Loop timing statistics
//! - [`mode`]: The tick orchestrator (`OpMode`)

#![no_std]

pub mod logging;

pub mod articulation;
pub mod diagnostic;
pub mod error;
pub mod filter;
pub mod input;
pub mod mode;
pub mod ordinal;
pub mod parameters;
pub mod robot;
pub mod scheduler;
pub mod state;
pub mod telemetry;
pub mod teleop;
pub mod traits;

pub use error::{OpModeError, VisionError};
pub use mode::OpMode;
