//! Telemetry sinks.
//!
//! [`ConsoleDisplay`] plays the driver-station screen: it keeps the rendered
//! lines of the latest frame and optionally prints them. [`JsonDashboard`]
//! plays the web dashboard: it serializes throttled packets as JSON lines.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use reach_core::telemetry::{
    FieldOverlay, OverlayOp, TelemetryFrame, TelemetrySink, TelemetryValue,
};
use reach_core::traits::TimeSource;

use crate::time::SitlTimeSource;

/// Driver-station text display
pub struct ConsoleDisplay {
    out: Option<Box<dyn Write + Send>>,
    /// Print every n-th frame
    every: u64,
    frames: u64,
    lines: Vec<String>,
}

impl ConsoleDisplay {
    /// Display printing every `every`-th frame to `out`.
    pub fn new(out: Option<Box<dyn Write + Send>>, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
            frames: 0,
            lines: Vec::new(),
        }
    }

    /// Display that only keeps the latest frame.
    pub fn silent() -> Self {
        Self::new(None, 1)
    }

    /// Lines of the latest frame
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn print(&mut self) -> std::io::Result<()> {
        if let Some(out) = self.out.as_mut() {
            writeln!(out, "==== frame {} ====", self.frames)?;
            for line in &self.lines {
                writeln!(out, "{}", line)?;
            }
            out.flush()?;
        }
        Ok(())
    }
}

impl TelemetrySink for ConsoleDisplay {
    fn publish(&mut self, frame: &TelemetryFrame, _overlay: &FieldOverlay) {
        self.lines.clear();
        self.lines.extend(frame.lines().map(|line| line.to_string()));
        self.frames += 1;

        if self.frames % self.every == 0 {
            if let Err(e) = self.print() {
                log::warn!("Console display write failed: {}", e);
            }
        }
    }
}

/// Overlay drawing operation as sent to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OverlayPacketOp {
    Stroke { color: String },
    Circle { x: f64, y: f64, radius: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl From<&OverlayOp> for OverlayPacketOp {
    fn from(op: &OverlayOp) -> Self {
        match *op {
            OverlayOp::Stroke(color) => OverlayPacketOp::Stroke {
                color: color.to_string(),
            },
            OverlayOp::Circle { x, y, radius } => OverlayPacketOp::Circle { x, y, radius },
            OverlayOp::Line { x1, y1, x2, y2 } => OverlayPacketOp::Line { x1, y1, x2, y2 },
        }
    }
}

/// One dashboard packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPacket {
    pub timestamp_ms: u64,
    /// Label to value; a label repeated in a later section is keyed
    /// `"<section>/<label>"`
    pub fields: BTreeMap<String, serde_json::Value>,
    pub lines: Vec<String>,
    pub overlay: Vec<OverlayPacketOp>,
}

impl DashboardPacket {
    pub fn from_frame(timestamp_ms: u64, frame: &TelemetryFrame, overlay: &FieldOverlay) -> Self {
        let mut fields = BTreeMap::new();
        for section in frame.sections() {
            for (label, value) in section.entries.iter() {
                let key = if fields.contains_key(label) {
                    format!("{}/{}", section.title, label)
                } else {
                    label.to_string()
                };
                fields.insert(key, json_value(value));
            }
        }

        Self {
            timestamp_ms,
            fields,
            lines: frame.lines().map(|line| line.to_string()).collect(),
            overlay: overlay.ops().iter().map(OverlayPacketOp::from).collect(),
        }
    }
}

fn json_value(value: &TelemetryValue) -> serde_json::Value {
    match value {
        TelemetryValue::Bool(v) => serde_json::Value::Bool(*v),
        TelemetryValue::Int(v) => serde_json::Value::from(*v),
        // NaN and infinities become null
        TelemetryValue::Float(v) => serde_json::Value::from(*v),
        TelemetryValue::Text(v) => serde_json::Value::String(v.as_str().to_string()),
    }
}

/// Web dashboard stand-in writing JSON lines
pub struct JsonDashboard {
    time: SitlTimeSource,
    interval_ms: u64,
    out: Option<Box<dyn Write + Send>>,
    last_sent_ms: Option<u64>,
    sent: u64,
    write_errors: u64,
    last_packet: Option<DashboardPacket>,
}

impl JsonDashboard {
    /// Dashboard sending at most one packet per `interval_ms`.
    pub fn new(time: SitlTimeSource, interval_ms: u64, out: Option<Box<dyn Write + Send>>) -> Self {
        Self {
            time,
            interval_ms,
            out,
            last_sent_ms: None,
            sent: 0,
            write_errors: 0,
            last_packet: None,
        }
    }

    pub fn last_packet(&self) -> Option<&DashboardPacket> {
        self.last_packet.as_ref()
    }

    /// Packets sent so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn write_errors(&self) -> u64 {
        self.write_errors
    }

    fn write(&mut self, packet: &DashboardPacket) -> Result<(), crate::SimError> {
        if let Some(out) = self.out.as_mut() {
            serde_json::to_writer(&mut *out, packet)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl TelemetrySink for JsonDashboard {
    fn publish(&mut self, frame: &TelemetryFrame, overlay: &FieldOverlay) {
        let now_ms = self.time.now_ms();
        if let Some(last) = self.last_sent_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return;
            }
        }

        let packet = DashboardPacket::from_frame(now_ms, frame, overlay);
        if let Err(e) = self.write(&packet) {
            self.write_errors += 1;
            log::warn!("Dashboard packet write failed: {}", e);
        }
        self.last_sent_ms = Some(now_ms);
        self.sent += 1;
        self.last_packet = Some(packet);
    }
}
