//! Void Replication - Authority to Replica Synchronization
//!
//! This crate provides the transport seam used by replicated gameplay
//! components.
//!
//! # Features
//!
//! - [`ReplicationBridge`] trait: mark dirty, staleness check, snapshot push,
//!   refresh delivery
//! - Revision-gated full snapshots (no incremental diffs)
//! - In-memory [`ReplicationHub`] with ordered per-observer inboxes
//! - `bincode` payload encoding
//!
//! # Example
//!
//! ```ignore
//! use void_replication::prelude::*;
//!
//! let hub = Arc::new(ReplicationHub::new());
//! hub.connect(PeerId(1));
//!
//! if hub.is_stale(PeerId(1), entity, revision) {
//!     hub.push_snapshot(PeerId(1), entity, revision, encode_payload(&snapshot)?);
//! }
//! for message in hub.drain(PeerId(1)) {
//!     // apply on the replica
//! }
//! ```

pub mod bridge;
pub mod error;
pub mod hub;
pub mod message;

pub mod prelude {
    pub use crate::bridge::{PeerId, ReplicationBridge};
    pub use crate::error::{ReplicationError, Result};
    pub use crate::hub::ReplicationHub;
    pub use crate::message::{decode_payload, encode_payload, ReplicationMessage};
}

pub use prelude::*;
