//! Effect targets and ability contexts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::AbilityId;
use crate::core::{EntityId, PlayerId};

use super::definition::TargetKind;

/// What an effect instance is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    Card(EntityId),
    Player(PlayerId),
}

impl EffectTarget {
    /// Kind of target.
    #[must_use]
    pub const fn kind(self) -> TargetKind {
        match self {
            EffectTarget::Card(_) => TargetKind::Card,
            EffectTarget::Player(_) => TargetKind::Player,
        }
    }

    /// The card, if this targets a card.
    #[must_use]
    pub const fn as_card(self) -> Option<EntityId> {
        match self {
            EffectTarget::Card(id) => Some(id),
            EffectTarget::Player(_) => None,
        }
    }

    /// The player, if this targets a player.
    #[must_use]
    pub const fn as_player(self) -> Option<PlayerId> {
        match self {
            EffectTarget::Player(id) => Some(id),
            EffectTarget::Card(_) => None,
        }
    }
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectTarget::Card(id) => write!(f, "{}", id),
            EffectTarget::Player(id) => write!(f, "{}", id),
        }
    }
}

/// The ability an effect came from.
///
/// `source` is the card whose ability created the effect. It is an id,
/// not a reference: the source may leave play while its effects are
/// still being torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityContext {
    pub source: EntityId,
    pub controller: PlayerId,
    pub ability: Option<AbilityId>,
}

impl AbilityContext {
    /// Context for an effect created by `source`, controlled by `controller`.
    #[must_use]
    pub const fn new(source: EntityId, controller: PlayerId) -> Self {
        Self {
            source,
            controller,
            ability: None,
        }
    }

    /// Set the originating ability (builder pattern).
    #[must_use]
    pub const fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_accessors() {
        let card = EffectTarget::Card(EntityId(9));
        let player = EffectTarget::Player(PlayerId::new(1));

        assert_eq!(card.kind(), TargetKind::Card);
        assert_eq!(card.as_card(), Some(EntityId(9)));
        assert_eq!(card.as_player(), None);
        assert_eq!(player.kind(), TargetKind::Player);
        assert_eq!(player.as_player(), Some(PlayerId::new(1)));
        assert_eq!(format!("{}", player), "Player 1");
    }

    #[test]
    fn test_context_serialization() {
        let context = AbilityContext::new(EntityId(4), PlayerId::new(0)).with_ability(AbilityId::new(2));
        let json = serde_json::to_string(&context).unwrap();
        let deserialized: AbilityContext = serde_json::from_str(&json).unwrap();
        assert_eq!(context, deserialized);
    }
}
