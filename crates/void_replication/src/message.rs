//! Wire messages and payload encoding

use crate::error::{ReplicationError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use void_core::{EntityId, Revision};

/// Message delivered to a replica
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicationMessage {
    /// Full state of an entity
    Snapshot {
        /// Replicated entity
        entity: EntityId,
        /// Revision the payload was taken at
        revision: Revision,
        /// Encoded component state
        payload: Vec<u8>,
    },
    /// Presentation refresh without new state
    Refresh {
        /// Entity to refresh
        entity: EntityId,
    },
}

impl ReplicationMessage {
    /// Get the entity this message is about
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Snapshot { entity, .. } => *entity,
            Self::Refresh { entity } => *entity,
        }
    }

    /// Check if this is a snapshot
    pub fn is_snapshot(&self) -> bool {
        matches!(self, Self::Snapshot { .. })
    }
}

/// Encode a snapshot payload
pub fn encode_payload<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(ReplicationError::Encode)
}

/// Decode a snapshot payload
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(ReplicationError::Decode)
}
