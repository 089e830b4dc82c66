//! Tele-op input mapping
//!
//! - [`drive`]: tank/arcade arbitration between the two controllers
//! - [`commands`]: one-shot button edges to discrete subsystem commands
//! - [`chassis`]: chassis length level table

pub mod chassis;
pub mod commands;
pub mod drive;

pub use chassis::{ChassisLengthLevels, CHASSIS_LEVEL_COUNT};
pub use commands::{map_buttons, CommandList, TeleopCommand};
pub use drive::{arbitrate, arcade, tank, DriveCommand, DriveScaling, DriveSource};
