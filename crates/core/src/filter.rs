//! Exponential smoothing
//!
//! Used for the loop-time display and by subsystems for actuator command
//! shaping.

/// Exponential moving average
///
/// `average = factor * value + (1 - factor) * average`, seeded with the
/// first sample so the output never ramps up from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSmoother {
    factor: f64,
    average: f64,
    seeded: bool,
}

impl ExponentialSmoother {
    /// Create a smoother; `factor` is clamped to (0, 1]
    pub fn new(factor: f64) -> Self {
        Self {
            factor: factor.clamp(f64::EPSILON, 1.0),
            average: 0.0,
            seeded: false,
        }
    }

    /// Feed one sample, return the new average
    pub fn update(&mut self, value: f64) -> f64 {
        if self.seeded {
            self.average = self.factor * value + (1.0 - self.factor) * self.average;
        } else {
            self.average = value;
            self.seeded = true;
        }
        self.average
    }

    /// Current average (0.0 before the first sample)
    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        self.average = 0.0;
        self.seeded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_seeds_average() {
        let mut smoother = ExponentialSmoother::new(0.1);
        assert_eq!(smoother.update(20.0), 20.0);
    }

    #[test]
    fn test_ema_update() {
        let mut smoother = ExponentialSmoother::new(0.1);
        smoother.update(20.0);
        let avg = smoother.update(30.0);
        assert!((avg - 21.0).abs() < 1e-9);
        let avg = smoother.update(30.0);
        assert!((avg - 21.9).abs() < 1e-9);
    }

    #[test]
    fn test_factor_one_tracks_input() {
        let mut smoother = ExponentialSmoother::new(1.0);
        smoother.update(5.0);
        assert_eq!(smoother.update(9.0), 9.0);
    }

    #[test]
    fn test_factor_clamped() {
        assert_eq!(ExponentialSmoother::new(3.0).factor(), 1.0);
        assert!(ExponentialSmoother::new(-1.0).factor() > 0.0);
    }

    #[test]
    fn test_reset() {
        let mut smoother = ExponentialSmoother::new(0.5);
        smoother.update(10.0);
        smoother.reset();
        assert_eq!(smoother.average(), 0.0);
        assert_eq!(smoother.update(4.0), 4.0);
    }
}
