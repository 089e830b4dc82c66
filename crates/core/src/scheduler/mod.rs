//! Loop timing
//!
//! The op-mode is invoked by an external periodic scheduler; this module only
//! measures it. See [`timing`].

pub mod timing;

pub use timing::LoopTiming;
