//! Manual diagnostic mode
//!
//! Controller one steps through the actuators with the bumpers and drives
//! the selected one with its sticks. Targets are proposed here; tracking is
//! left to the subsystem.

mod sequencer;
mod step;

pub use sequencer::{DiagnosticSequencer, ServoStepSizes};
pub use step::{DiagnosticControl, DiagnosticStep};
