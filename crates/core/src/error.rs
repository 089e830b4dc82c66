//! Error types for the op-mode lifecycle
//!
//! Only the blocking, outside-of-play operations can fail. The tick path
//! never returns an error: indices wrap and actuator targets clamp.

use crate::parameters::ParameterError;

/// Errors reported by a vision provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionError {
    /// Camera or pipeline failed to start
    InitFailed,
    /// Camera or pipeline failed to stop cleanly
    ShutdownFailed,
    /// Operation needs an initialized provider
    NotInitialized,
    /// Dashboard image could not be captured or stored
    SaveFailed,
}

impl core::fmt::Display for VisionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VisionError::InitFailed => write!(f, "vision initialization failed"),
            VisionError::ShutdownFailed => write!(f, "vision shutdown failed"),
            VisionError::NotInitialized => write!(f, "vision provider not initialized"),
            VisionError::SaveFailed => write!(f, "failed to save dashboard image"),
        }
    }
}

/// Fatal op-mode lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpModeError {
    /// Vision provider failure during init, init loop or start
    Vision(VisionError),
    /// Parameter store could not be populated
    Parameter(ParameterError),
}

impl From<VisionError> for OpModeError {
    fn from(err: VisionError) -> Self {
        OpModeError::Vision(err)
    }
}

impl From<ParameterError> for OpModeError {
    fn from(err: ParameterError) -> Self {
        OpModeError::Parameter(err)
    }
}

impl core::fmt::Display for OpModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OpModeError::Vision(err) => write!(f, "vision: {}", err),
            OpModeError::Parameter(err) => write!(f, "parameters: {}", err),
        }
    }
}
