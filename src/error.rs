//! Error types for the effect engine.

use thiserror::Error;

use crate::core::{EntityId, PlayerId};
use crate::effects::{EffectInstanceId, EffectKey, TargetKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("Unknown effect key: {0}")]
    UnknownEffectKey(String),

    #[error("Effect {0} carries behavior and cannot be built from a value")]
    NotValueShaped(EffectKey),

    #[error("Invalid value for effect {0}")]
    InvalidValue(EffectKey),

    #[error("Effect {key} expects a {expected} target")]
    TargetMismatch { key: EffectKey, expected: TargetKind },

    #[error("{0} is already applied")]
    AlreadyApplied(EffectInstanceId),

    #[error("{0} is not applied")]
    NotApplied(EffectInstanceId),

    #[error("Effect instance not found: {0}")]
    InstanceNotFound(EffectInstanceId),

    #[error("Card not found: {0}")]
    CardNotFound(EntityId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),
}

pub type Result<T> = std::result::Result<T, EffectError>;
