//! Tick orchestration
//!
//! [`OpMode`] owns the session state (game state, latches, edge detectors,
//! indices, timing) and drives the robot through the op-mode lifecycle:
//!
//! 1. `init` - once, when the driver presses INIT
//! 2. `init_loop` - every tick until PLAY
//! 3. `start` - once, when the driver presses PLAY
//! 4. `tick` - every tick until the match program ends
//! 5. `stop` - once, at teardown

mod opmode;

pub use opmode::OpMode;
