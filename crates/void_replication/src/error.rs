//! Error types for replication

use thiserror::Error;

/// Replication errors
#[derive(Debug, Error)]
pub enum ReplicationError {
    /// Payload could not be encoded
    #[error("Failed to encode replication payload: {0}")]
    Encode(#[source] bincode::Error),

    /// Payload could not be decoded
    #[error("Failed to decode replication payload: {0}")]
    Decode(#[source] bincode::Error),

    /// Snapshot addressed to a different entity
    #[error("Snapshot for entity {received} delivered to entity {expected}")]
    EntityMismatch {
        expected: void_core::EntityId,
        received: void_core::EntityId,
    },
}

/// Result type for replication operations
pub type Result<T> = std::result::Result<T, ReplicationError>;
