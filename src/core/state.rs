//! Game state: the host objects effects act on.
//!
//! `GameState` owns every card, player and host registry. Effects reach
//! them through ids, so an effect never keeps a card or player alive and
//! lifetime stays with whoever destroys the card.
//!
//! The operations here are the host primitives the effect adapters
//! consume:
//! - `grant_ability` / `revoke_ability`
//! - `register_events` / `unregister_events`
//! - `register_terminal_condition` / `remove_terminal_condition`
//! - `register_delayed_effect` / `remove_delayed_effect`
//!
//! Every removal tolerates a missing target and reports it with `false`
//! or `None`.

use rustc_hash::FxHashMap;

use super::config::EngineConfig;
use super::entity::EntityId;
use super::player::{PlayerId, PlayerMap, PlayerState};
use crate::cards::{Ability, AbilityId, AbilityKind, AbilityProperties, CardInstance, UseLimit};
use crate::error::{EffectError, Result};
use crate::triggers::{
    ConditionFactory, ConditionHandle, ConditionKind, ConditionRegistry, Listener,
    ListenerRegistry,
};

/// Full host state.
pub struct GameState {
    config: EngineConfig,

    /// Per-player effect-visible state.
    players: PlayerMap<PlayerState>,

    /// Card instances by entity ID.
    cards: FxHashMap<EntityId, CardInstance>,

    /// Event listeners of reactions.
    pub listeners: ListenerRegistry,

    /// Delayed effects and terminal conditions.
    pub conditions: ConditionRegistry,

    next_entity_id: u32,
    next_ability_id: u32,
}

impl GameState {
    /// Create a new game state.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let players = PlayerMap::new(config.player_count, PlayerState::new);
        let next_entity_id = EntityId::first_non_player(config.player_count);

        Self {
            config,
            players,
            cards: FxHashMap::default(),
            listeners: ListenerRegistry::new(),
            conditions: ConditionRegistry::new(),
            next_entity_id,
            next_ability_id: 0,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    // === Entities ===

    /// Allocate a new entity ID.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Add a card instance.
    pub fn add_card(&mut self, card: CardInstance) {
        self.cards.insert(card.entity_id, card);
    }

    /// Remove a card, unregistering the listeners of its abilities.
    pub fn remove_card(&mut self, entity_id: EntityId) -> Option<CardInstance> {
        let card = self.cards.remove(&entity_id)?;
        for ability in card.abilities.actions.iter().chain(card.abilities.reactions.iter()) {
            self.listeners.unregister(ability.id);
        }
        Some(card)
    }

    /// Get a card instance.
    #[must_use]
    pub fn get_card(&self, entity_id: EntityId) -> Option<&CardInstance> {
        self.cards.get(&entity_id)
    }

    /// Get a mutable card instance.
    pub fn get_card_mut(&mut self, entity_id: EntityId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&entity_id)
    }

    /// Get a player.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players.get(player)
    }

    /// Get a player mutably.
    pub fn player_mut(&mut self, player: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(player)
    }

    // === Abilities ===

    /// Construct an ability of `kind` on `card` and add it to the matching list.
    ///
    /// Listeners are not registered; see `register_events`.
    pub fn grant_ability(
        &mut self,
        card: EntityId,
        kind: AbilityKind,
        properties: AbilityProperties,
    ) -> Result<AbilityId> {
        let limit = properties.limit.unwrap_or(self.config.default_ability_limit);
        let id = AbilityId::new(self.next_ability_id);
        let instance = self
            .cards
            .get_mut(&card)
            .ok_or(EffectError::CardNotFound(card))?;

        self.next_ability_id += 1;
        instance.abilities.push(Ability {
            id,
            kind,
            name: properties.name,
            printed: properties.printed,
            limit: UseLimit::new(limit),
        });
        Ok(id)
    }

    /// Remove an ability from `card` by identity.
    pub fn revoke_ability(&mut self, card: EntityId, ability: AbilityId) -> Option<Ability> {
        self.cards.get_mut(&card)?.abilities.remove(ability)
    }

    /// Register the listeners of an ability on `card`.
    ///
    /// Returns false if the ability does not exist, is an action, or is
    /// already registered.
    pub fn register_events(&mut self, card: EntityId, ability: AbilityId) -> bool {
        let Some(found) = self
            .cards
            .get(&card)
            .and_then(|c| c.abilities.get(ability))
        else {
            return false;
        };

        let event_types = found.kind.listens_for();
        if event_types.is_empty() {
            return false;
        }

        self.listeners.register(Listener {
            ability,
            card,
            event_types,
        })
    }

    /// Unregister the listeners of an ability.
    pub fn unregister_events(&mut self, ability: AbilityId) -> bool {
        self.listeners.unregister(ability).is_some()
    }

    // === Pending conditions ===

    /// Register a terminal condition on behalf of `source`.
    pub fn register_terminal_condition(
        &mut self,
        source: EntityId,
        factory: ConditionFactory,
    ) -> ConditionHandle {
        self.conditions.register(ConditionKind::Terminal, source, factory)
    }

    /// Register a delayed effect on behalf of `source`.
    pub fn register_delayed_effect(
        &mut self,
        source: EntityId,
        factory: ConditionFactory,
    ) -> ConditionHandle {
        self.conditions.register(ConditionKind::Delayed, source, factory)
    }

    /// Remove a terminal condition.
    pub fn remove_terminal_condition(&mut self, handle: ConditionHandle) -> bool {
        self.conditions.remove(ConditionKind::Terminal, handle)
    }

    /// Remove a delayed effect.
    pub fn remove_delayed_effect(&mut self, handle: ConditionHandle) -> bool {
        self.conditions.remove(ConditionKind::Delayed, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ZoneId;
    use crate::triggers::{events, ConditionProperties};
    use std::rc::Rc;

    fn state_with_card() -> (GameState, EntityId) {
        let mut state = GameState::new(EngineConfig::new(2));
        let id = state.alloc_entity();
        state.add_card(CardInstance::new(id, "Troll", PlayerId::new(0), ZoneId::new(1)));
        (state, id)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(EngineConfig::new(4));

        assert_eq!(state.player_count(), 4);
        assert!(state.player(PlayerId::new(3)).is_some());
        assert!(state.player(PlayerId::new(4)).is_none());
    }

    #[test]
    fn test_alloc_entity_skips_players() {
        let mut state = GameState::new(EngineConfig::new(3));

        assert_eq!(state.alloc_entity(), EntityId(3));
        assert_eq!(state.alloc_entity(), EntityId(4));
    }

    #[test]
    fn test_grant_uses_default_limit() {
        let mut state = GameState::new(EngineConfig::new(2).with_default_ability_limit(2));
        let card = state.alloc_entity();
        state.add_card(CardInstance::new(card, "Troll", PlayerId::new(0), ZoneId::new(1)));

        let id = state
            .grant_ability(card, AbilityKind::Reap, AbilityProperties::new("Reap: gain 1"))
            .unwrap();
        let ability = state.get_card(card).unwrap().abilities.get(id).unwrap();
        assert_eq!(ability.remaining_uses(), 2);
        assert!(ability.printed);
    }

    #[test]
    fn test_grant_to_missing_card() {
        let mut state = GameState::new(EngineConfig::new(2));
        let result = state.grant_ability(EntityId(50), AbilityKind::Action, AbilityProperties::new("x"));
        assert_eq!(result, Err(EffectError::CardNotFound(EntityId(50))));
    }

    #[test]
    fn test_register_events_for_reaction_only() {
        let (mut state, card) = state_with_card();
        let action = state
            .grant_ability(card, AbilityKind::Action, AbilityProperties::new("a"))
            .unwrap();
        let fight = state
            .grant_ability(card, AbilityKind::Fight, AbilityProperties::new("f"))
            .unwrap();

        assert!(!state.register_events(card, action));
        assert!(state.register_events(card, fight));
        assert!(!state.register_events(card, fight));
        assert_eq!(state.listeners.listeners_for(events::FIGHT).len(), 1);

        assert!(state.unregister_events(fight));
        assert!(!state.unregister_events(fight));
    }

    #[test]
    fn test_revoke_missing_ability() {
        let (mut state, card) = state_with_card();
        assert!(state.revoke_ability(card, AbilityId::new(9)).is_none());
        assert!(state.revoke_ability(EntityId(99), AbilityId::new(0)).is_none());
    }

    #[test]
    fn test_remove_card_drops_listeners() {
        let (mut state, card) = state_with_card();
        let reap = state
            .grant_ability(card, AbilityKind::Reap, AbilityProperties::new("r"))
            .unwrap();
        state.register_events(card, reap);

        assert!(state.remove_card(card).is_some());
        assert!(state.listeners.is_empty());
        assert!(state.remove_card(card).is_none());
    }

    #[test]
    fn test_condition_removal_is_kind_checked() {
        let (mut state, card) = state_with_card();
        let handle =
            state.register_delayed_effect(card, Rc::new(|| ConditionProperties::new("later")));

        assert!(!state.remove_terminal_condition(handle));
        assert!(state.remove_delayed_effect(handle));
        assert!(!state.remove_delayed_effect(handle));
    }
}
