//! Revision counters for replication

use core::fmt;

/// Monotonically increasing revision of a replicated value.
///
/// A replica whose last acknowledged revision differs from the authority's
/// current one needs a fresh snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Revision(u64);

impl Revision {
    /// Initial revision
    pub const ZERO: Revision = Revision(0);

    /// Create from a raw counter value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw counter value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Advance the revision, returning the new value
    #[inline]
    pub fn bump(&mut self) -> Revision {
        self.0 = self.0.wrapping_add(1);
        *self
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
