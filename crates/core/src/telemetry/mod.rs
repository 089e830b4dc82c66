//! Telemetry aggregation
//!
//! The op-mode rebuilds one [`TelemetryFrame`] every tick from its own
//! section, every subsystem, the robot and the active vision provider, then
//! hands it with the [`FieldOverlay`] to each [`TelemetrySink`].
//!
//! Everything here is fixed-capacity. Entries past a section's capacity are
//! dropped rather than failing the tick.

mod frame;
mod overlay;
mod value;

pub use frame::{
    format_loop_time, TelemetryFrame, TelemetryLine, TelemetrySection, MAX_SECTIONS, TITLE_LEN,
};
pub use overlay::{FieldOverlay, OverlayOp, MAX_OVERLAY_OPS};
pub use value::{TelemetryMap, TelemetryValue, MAX_ENTRIES, TEXT_LEN};

/// Destination for a finished frame (driver station, dashboard)
pub trait TelemetrySink {
    /// Flush one tick's frame and overlay
    fn publish(&mut self, frame: &TelemetryFrame, overlay: &FieldOverlay);
}
