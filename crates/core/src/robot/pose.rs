//! Planar pose

/// Field pose: position in meters, heading in radians (CCW positive)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose2d {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Point `distance` meters ahead along the heading
    pub fn ahead(&self, distance: f64) -> (f64, f64) {
        (
            self.x + distance * libm::cos(self.heading),
            self.y + distance * libm::sin(self.heading),
        )
    }
}
