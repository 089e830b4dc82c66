//! Chassis length levels

use crate::ordinal::wrap_index;

/// Number of chassis length levels
pub const CHASSIS_LEVEL_COUNT: usize = 4;

/// Four chassis lengths spanning [min, max] in equal thirds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisLengthLevels {
    lengths: [f64; CHASSIS_LEVEL_COUNT],
    index: usize,
}

impl ChassisLengthLevels {
    pub fn new(min: f64, max: f64) -> Self {
        let span = (max - min) / (CHASSIS_LEVEL_COUNT - 1) as f64;
        let mut lengths = [min; CHASSIS_LEVEL_COUNT];
        for (i, length) in lengths.iter_mut().enumerate() {
            *length = min + span * i as f64;
        }
        Self { lengths, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Commanded length at the current level
    pub fn length(&self) -> f64 {
        self.lengths[self.index]
    }

    pub fn lengths(&self) -> &[f64; CHASSIS_LEVEL_COUNT] {
        &self.lengths
    }

    /// Move `delta` levels, wrapping at both ends
    pub fn step(&mut self, delta: i32) {
        self.index = wrap_index(self.index as i32 + delta, CHASSIS_LEVEL_COUNT);
    }

    /// Back to the shortest level
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_span_range_in_thirds() {
        let levels = ChassisLengthLevels::new(0.0, 0.864);
        let lengths = levels.lengths();
        assert!((lengths[0] - 0.0).abs() < 1e-9);
        assert!((lengths[1] - 0.288).abs() < 1e-9);
        assert!((lengths[2] - 0.576).abs() < 1e-9);
        assert!((lengths[3] - 0.864).abs() < 1e-9);
    }

    #[test]
    fn test_step_wraps_both_ends() {
        let mut levels = ChassisLengthLevels::new(0.0, 0.864);
        levels.step(-1);
        assert_eq!(levels.index(), 3);
        levels.step(-1);
        assert_eq!(levels.index(), 2);
        levels.step(1);
        levels.step(1);
        assert_eq!(levels.index(), 0);
    }

    #[test]
    fn test_index_always_in_range() {
        let mut levels = ChassisLengthLevels::new(0.1, 0.5);
        for delta in [-1, -1, -1, -1, -1, 1, 1, -1, 1, 1, 1, 1, 1] {
            levels.step(delta);
            assert!(levels.index() < CHASSIS_LEVEL_COUNT);
        }
    }

    #[test]
    fn test_reset() {
        let mut levels = ChassisLengthLevels::new(0.0, 0.864);
        levels.step(2);
        levels.reset();
        assert_eq!(levels.index(), 0);
        assert!(levels.length().abs() < 1e-9);
    }
}
