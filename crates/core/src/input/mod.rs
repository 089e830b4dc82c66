//! Gamepad input and edge detection
//!
//! Raw gamepad polling is separated from the edge-detection algorithm so the
//! one-shot ("sticky") semantics can be tested without any hardware.
//!
//! # Contents
//!
//! - [`GamepadState`]: one polled snapshot of a controller
//! - [`Buttons`]: digital button flags
//! - [`EdgeDetector`]: rising-edge tracker, one per controller
//! - [`Edges`]: both controllers' edges for one tick

mod gamepad;
mod sticky;

pub use gamepad::{outside_deadzone, Buttons, GamepadState};
pub use sticky::{rising_edges, EdgeDetector, Edges};
