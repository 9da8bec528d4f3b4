//! Depth budget shared by every composite codec.
//!
//! A decode that starts at a public entry point seeds the budget from the
//! codec's configured maximum (or from an explicit caller value). Every step
//! into a child codec passes `remaining - 1` along, so the outermost call alone
//! decides how deep a nested decode may go; the children's own maximums only
//! matter when they are themselves called as entry points.

use crate::error::DecodeError;

/// Remaining recursion budget during one decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Depth(i64);

impl Depth {
    /// Budget supplied explicitly by a caller.
    pub fn new(remaining: i64) -> Self {
        Self(remaining)
    }

    /// Budget seeded from a codec's configured maximum.
    pub fn seeded(max_depth: u32) -> Self {
        Self(i64::from(max_depth))
    }

    pub fn remaining(self) -> i64 {
        self.0
    }

    /// Fails once the budget has gone negative.
    #[inline]
    pub fn check(self) -> Result<(), DecodeError> {
        check_depth(self.0)
    }

    /// Budget handed to a child codec.
    #[inline]
    pub fn descend(self) -> Depth {
        Depth(self.0.saturating_sub(1))
    }
}

/// Fails with [`DecodeError::DepthExceeded`] when `remaining < 0`.
#[inline]
pub fn check_depth(remaining: i64) -> Result<(), DecodeError> {
    if remaining < 0 {
        tracing::trace!(remaining, "decode depth budget exhausted");
        return Err(DecodeError::DepthExceeded { remaining });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_boundary() {
        assert!(Depth::new(0).check().is_ok());
        assert!(Depth::seeded(3).check().is_ok());
        assert!(matches!(
            Depth::new(0).descend().check(),
            Err(DecodeError::DepthExceeded { remaining: -1 })
        ));
    }

    #[test]
    fn test_descend_saturates() {
        assert_eq!(Depth::new(i64::MIN).descend(), Depth::new(i64::MIN));
        assert_eq!(Depth::seeded(200).descend().remaining(), 199);
    }
}
