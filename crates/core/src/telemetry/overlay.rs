//! Field overlay graphic

use heapless::Vec;

/// Drawing operations per tick
pub const MAX_OVERLAY_OPS: usize = 32;

/// One drawing operation, field coordinates in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayOp {
    /// Colour for subsequent strokes, as a CSS colour string
    Stroke(&'static str),
    Circle { x: f64, y: f64, radius: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

/// Drawing commands sent alongside the dashboard packet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverlay {
    ops: Vec<OverlayOp, MAX_OVERLAY_OPS>,
}

impl FieldOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stroke(&mut self, colour: &'static str) -> &mut Self {
        let _ = self.ops.push(OverlayOp::Stroke(colour));
        self
    }

    pub fn stroke_circle(&mut self, x: f64, y: f64, radius: f64) -> &mut Self {
        let _ = self.ops.push(OverlayOp::Circle { x, y, radius });
        self
    }

    pub fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        let _ = self.ops.push(OverlayOp::Line { x1, y1, x2, y2 });
        self
    }

    pub fn ops(&self) -> &[OverlayOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}
