//! reach_sitl - Software-in-the-loop harness for the reach control core
//!
//! Runs the real [`reach_core::OpMode`] against a simulated robot:
//!
//! - [`robot`]: simulated drivetrain, crane and gripper behind the core contracts
//! - [`autonomous`]: canned routines and the vision provider table
//! - [`vision`]: seedable barcode detection
//! - [`telemetry`]: driver-station console and JSON dashboard sinks
//! - [`script`]: gamepad input replayed from a timed script
//! - [`session`]: fixed-rate stepping of the whole stack

pub mod autonomous;
pub mod config;
pub mod error;
pub mod robot;
pub mod script;
pub mod session;
pub mod telemetry;
pub mod time;
pub mod vision;

pub use autonomous::{Leg, SimAutonomous, SimRoutine};
pub use config::SimConfig;
pub use error::SimError;
pub use robot::{SimCrane, SimDriveTrain, SimGripper, SimRobot};
pub use script::{Axis, ScriptedGamepads, DEFAULT_SCRIPT};
pub use session::{SessionConfig, SimOpMode, SimSession};
pub use telemetry::{ConsoleDisplay, DashboardPacket, JsonDashboard};
pub use time::{SitlTimeSource, TimeMode};
pub use vision::{BarcodePosition, ProviderKind, SimVision};
