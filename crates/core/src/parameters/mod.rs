//! Parameter management types
//!
//! Tunable constants live in a [`ParameterStore`] so they can be adjusted
//! from a dashboard between matches without a rebuild. [`OpModeParams`] is
//! the typed view the op-mode reads once at init.

pub mod error;
pub mod opmode;
pub mod storage;

pub use error::ParameterError;
pub use opmode::OpModeParams;
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
