//! Network role of a simulation instance

use core::fmt;

/// Which side of the authority split a component lives on.
///
/// Exactly one instance per entity is the [`NetRole::Authority`]; every other
/// instance observing it is a [`NetRole::Replica`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetRole {
    /// Canonical simulation (server)
    #[default]
    Authority,
    /// Observing copy (client)
    Replica,
}

impl NetRole {
    /// Check if mutations on this side are canonical
    #[inline]
    pub const fn has_authority(&self) -> bool {
        matches!(self, NetRole::Authority)
    }

    /// Check if this side only observes
    #[inline]
    pub const fn is_replica(&self) -> bool {
        matches!(self, NetRole::Replica)
    }
}

impl fmt::Display for NetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetRole::Authority => write!(f, "server"),
            NetRole::Replica => write!(f, "client"),
        }
    }
}
