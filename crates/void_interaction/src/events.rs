//! Interaction events

use void_core::EntityId;

/// Event published by an interaction target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    /// An actor started looking at the target
    BeginFocus { target: EntityId, interactor: EntityId },
    /// An actor stopped looking at the target
    EndFocus { target: EntityId, interactor: EntityId },
    /// An actor started interacting
    BeginInteract { target: EntityId, interactor: EntityId },
    /// An actor stopped interacting
    EndInteract { target: EntityId, interactor: EntityId },
    /// The interaction completed; domain effects hook in here
    Interact { target: EntityId, interactor: EntityId },
    /// Prompt text or limits changed
    PromptChanged { target: EntityId },
}

impl InteractionEvent {
    /// Target that published the event
    pub fn target(&self) -> EntityId {
        match *self {
            Self::BeginFocus { target, .. }
            | Self::EndFocus { target, .. }
            | Self::BeginInteract { target, .. }
            | Self::EndInteract { target, .. }
            | Self::Interact { target, .. }
            | Self::PromptChanged { target } => target,
        }
    }

    /// Actor involved, if any
    pub fn interactor(&self) -> Option<EntityId> {
        match *self {
            Self::BeginFocus { interactor, .. }
            | Self::EndFocus { interactor, .. }
            | Self::BeginInteract { interactor, .. }
            | Self::EndInteract { interactor, .. }
            | Self::Interact { interactor, .. } => Some(interactor),
            Self::PromptChanged { .. } => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeginFocus { .. } => "begin_focus",
            Self::EndFocus { .. } => "end_focus",
            Self::BeginInteract { .. } => "begin_interact",
            Self::EndInteract { .. } => "end_interact",
            Self::Interact { .. } => "interact",
            Self::PromptChanged { .. } => "prompt_changed",
        }
    }
}
