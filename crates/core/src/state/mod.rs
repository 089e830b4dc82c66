//! Game-state machine and pregame configuration
//!
//! # Contents
//!
//! - [`GameState`] / [`GameStateMachine`]: mode browsing and the activation latch
//! - [`Alliance`] / [`StartingPosition`] / [`PregameConfig`]: match setup
//! - [`VisionSwitch`]: vision provider selection while browsing

mod game_state;
mod pregame;
mod vision_switch;

pub use game_state::{ActivationLatch, GameState, GameStateMachine, StateSwitch};
pub use pregame::{Alliance, PregameConfig, StartingPosition};
pub use vision_switch::{VisionAction, VisionActions, VisionSwitch};
