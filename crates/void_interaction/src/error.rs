//! Interaction error types

use thiserror::Error;
use void_core::EntityId;

/// Interaction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// Target is missing, inactive, ownerless or already taken
    #[error("Interaction target {0} is unavailable")]
    TargetUnavailable(EntityId),

    /// Operation only allowed on the authority
    #[error("Interaction requests can only be handled by the authority")]
    NotAuthoritative,

    /// No tracker registered for this interactor
    #[error("No interaction tracker for {0}")]
    UnknownInteractor(EntityId),
}

/// Result type for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;
