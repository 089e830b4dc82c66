//! Logging abstraction
//!
//! Provides unified logging macros for the core crate. They forward to the
//! `log` facade; the consuming binary installs the logger (an embedded build
//! bridges `log` to its own transport).
//!
//! Only transitions and operator actions are logged. Nothing in the
//! steady-state tick path logs, so the tick deadline is unaffected.
//!
//! Arguments must be primitives or `&str`; enums are logged via their labels.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        ::log::info!($($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        ::log::error!($($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        ::log::trace!($($arg)*)
    };
}
