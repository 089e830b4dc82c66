//! Ordered enumeration tables and wraparound arithmetic
//!
//! Enumerations that operators cycle through with bumper presses
//! (game states, diagnostic steps) declare their order once in a table.
//! The same table drives both index -> value and value -> index lookups.

/// Wrap a possibly negative index into `[0, len)` using floored modulo
///
/// Unlike `(index % len).abs()`, this lands on the expected slot for any
/// step size: `-1` wraps to `len - 1`, `-len - 1` also wraps to `len - 1`.
///
/// `len` must be non-zero.
#[inline]
pub fn wrap_index(index: i32, len: usize) -> usize {
    index.rem_euclid(len as i32) as usize
}

/// An enumeration with a fixed, explicit order
pub trait Ordinal: Copy + PartialEq + 'static {
    /// Every value, in operator-facing order
    const ALL: &'static [Self];

    /// Position of `self` in [`Ordinal::ALL`]
    fn ordinal(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    /// Value at `index`, wrapped into range
    fn from_index(index: i32) -> Self {
        Self::ALL[wrap_index(index, Self::ALL.len())]
    }

    /// Value `delta` steps away from `self`, wrapping at both ends
    fn step(self, delta: i32) -> Self {
        Self::from_index(self.ordinal() as i32 + delta)
    }

    /// Number of values
    fn count() -> usize {
        Self::ALL.len()
    }
}
