//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over different
//! monotonic clocks (wall clock, simulation clock, mock) so loop timing can be
//! tested without real hardware.

use core::cell::Cell;

/// Platform-agnostic monotonic time source for the control loop.
///
/// Loop timing is measured in nanoseconds, matching the resolution the
/// telemetry formatting expects.
///
/// # Example
///
/// ```
/// use reach_core::traits::{MockTime, TimeSource};
///
/// fn loop_period<T: TimeSource>(time: &T, last_ns: &mut u64) -> u64 {
///     let period = time.elapsed_since(*last_ns);
///     *last_ns = time.now_ns();
///     period
/// }
///
/// let time = MockTime::new();
/// let mut last = 0;
/// time.advance_ms(20);
/// assert_eq!(loop_period(&time, &mut last), 20_000_000);
/// ```
pub trait TimeSource: Clone {
    /// Returns current time in nanoseconds since an arbitrary fixed origin.
    fn now_ns(&self) -> u64;

    /// Returns current time in microseconds.
    fn now_us(&self) -> u64 {
        self.now_ns() / 1_000
    }

    /// Returns current time in milliseconds.
    fn now_ms(&self) -> u64 {
        self.now_ns() / 1_000_000
    }

    /// Returns elapsed time in nanoseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_since(&self, reference_ns: u64) -> u64 {
        self.now_ns().saturating_sub(reference_ns)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// # Example
///
/// ```
/// use reach_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ns(), 0);
///
/// time.advance_ms(1);
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_ns: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ns: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(ns: u64) -> Self {
        Self {
            current_ns: Cell::new(ns),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ns: u64) {
        self.current_ns.set(ns);
    }

    /// Advances the current time by the specified amount of nanoseconds.
    pub fn advance(&self, ns: u64) {
        self.current_ns.set(self.current_ns.get() + ns);
    }

    /// Advances the current time by whole milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms * 1_000_000);
    }
}

impl TimeSource for MockTime {
    fn now_ns(&self) -> u64 {
        self.current_ns.get()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
