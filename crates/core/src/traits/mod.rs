//! Core traits for platform-agnostic control loop functionality.
//!
//! This module provides trait abstractions that decouple the tick logic
//! from platform-specific clocks.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Real clocks live in the sitl crate (and on the robot controller)

pub mod time;

pub use time::{MockTime, TimeSource};
