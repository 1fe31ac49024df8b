//! # void_core - Void Engine Core
//!
//! Dependency-free primitives shared by the gameplay crates:
//! - **Identity**: stable [`EntityId`]s for actors, interactors and world objects
//! - **Authority**: the [`NetRole`] of a simulation instance (authority or replica)
//! - **Revisions**: monotonically increasing [`Revision`] counters used to decide
//!   whether a remote copy is stale
//!
//! Enable the `serde` feature to put these types on the wire.

pub mod id;
pub mod revision;
pub mod role;

pub use id::*;
pub use revision::*;
pub use role::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{EntityId, IdGenerator};
    pub use crate::revision::Revision;
    pub use crate::role::NetRole;
}
