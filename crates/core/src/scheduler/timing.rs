//! Loop timing statistics
//!
//! Measured from a monotonic clock once per tick and consumed only for
//! telemetry.

use crate::filter::ExponentialSmoother;

/// Tick-to-tick duration statistics
#[derive(Debug, Clone, Copy)]
pub struct LoopTiming {
    /// Clock reading at the previous update
    last_clock_ns: u64,
    /// Duration of the last loop
    last_loop_ns: u64,
    /// Longest loop since reset
    max_loop_ns: u64,
    /// Smoothed loop duration
    average: ExponentialSmoother,
    /// Loops longer than `budget_ns`
    overruns: u32,
    /// Total updates since reset
    tick_count: u64,
    budget_ns: u64,
}

impl LoopTiming {
    /// Create statistics starting at `now_ns`
    ///
    /// # Arguments
    ///
    /// * `smoothing` - EMA factor for the average, (0, 1]
    /// * `budget_ns` - Loops longer than this count as overruns
    /// * `now_ns` - Current clock reading
    pub fn new(smoothing: f64, budget_ns: u64, now_ns: u64) -> Self {
        Self {
            last_clock_ns: now_ns,
            last_loop_ns: 0,
            max_loop_ns: 0,
            average: ExponentialSmoother::new(smoothing),
            overruns: 0,
            tick_count: 0,
            budget_ns,
        }
    }

    /// Record a tick ending at `now_ns`
    pub fn update(&mut self, now_ns: u64) {
        self.last_loop_ns = now_ns.saturating_sub(self.last_clock_ns);
        self.last_clock_ns = now_ns;
        self.average.update(self.last_loop_ns as f64);
        self.tick_count = self.tick_count.saturating_add(1);

        if self.last_loop_ns > self.max_loop_ns {
            self.max_loop_ns = self.last_loop_ns;
        }
        if self.last_loop_ns > self.budget_ns {
            self.overruns = self.overruns.saturating_add(1);
        }
    }

    /// Restart measurement at `now_ns` (match start)
    pub fn reset(&mut self, now_ns: u64) {
        self.last_clock_ns = now_ns;
        self.last_loop_ns = 0;
        self.max_loop_ns = 0;
        self.average.reset();
        self.overruns = 0;
        self.tick_count = 0;
    }

    pub fn last_loop_ns(&self) -> u64 {
        self.last_loop_ns
    }

    pub fn average_loop_ns(&self) -> f64 {
        self.average.average()
    }

    pub fn max_loop_ns(&self) -> u64 {
        self.max_loop_ns
    }

    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn test_first_update_seeds_average() {
        let mut timing = LoopTiming::new(0.1, 25 * MS, 0);
        timing.update(20 * MS);
        assert_eq!(timing.last_loop_ns(), 20 * MS);
        assert!((timing.average_loop_ns() - 20.0e6).abs() < 1.0);
        assert_eq!(timing.tick_count(), 1);
    }

    #[test]
    fn test_average_smooths() {
        let mut timing = LoopTiming::new(0.1, 25 * MS, 0);
        timing.update(20 * MS);
        timing.update(50 * MS); // 30 ms loop
        assert_eq!(timing.last_loop_ns(), 30 * MS);
        // 0.1 * 30 + 0.9 * 20 = 21 ms
        assert!((timing.average_loop_ns() - 21.0e6).abs() < 1.0);
        assert_eq!(timing.max_loop_ns(), 30 * MS);
        assert_eq!(timing.overruns(), 1);
    }

    #[test]
    fn test_clock_going_backwards_saturates() {
        let mut timing = LoopTiming::new(0.1, 25 * MS, 100 * MS);
        timing.update(50 * MS);
        assert_eq!(timing.last_loop_ns(), 0);
    }

    #[test]
    fn test_reset() {
        let mut timing = LoopTiming::new(0.1, 25 * MS, 0);
        timing.update(40 * MS);
        timing.reset(100 * MS);
        assert_eq!(timing.tick_count(), 0);
        assert_eq!(timing.overruns(), 0);
        timing.update(110 * MS);
        assert_eq!(timing.last_loop_ns(), 10 * MS);
        assert!((timing.average_loop_ns() - 10.0e6).abs() < 1.0);
    }
}
