//! Granted ability integration tests.
//!
//! These tests verify that granted abilities are reversed exactly and
//! that their remaining uses survive being revoked and granted again.

use std::rc::Rc;

use ccg_effects::effects::{catalog, AbilityContext, EffectEngine, EffectTarget};
use ccg_effects::triggers::events;
use ccg_effects::{
    AbilityId, AbilityKind, AbilityProperties, CardInstance, EngineConfig, EntityId, EventTypeId,
    GameState, GrantSlot, PlayerId, ZoneId,
};

const CREATURE_DIED: EventTypeId = EventTypeId::new(events::FIRST_HOST_EVENT);

fn setup() -> (GameState, EntityId, EntityId) {
    let mut state = GameState::new(EngineConfig::new(2));
    let source = state.alloc_entity();
    let card = state.alloc_entity();
    state.add_card(CardInstance::new(source, "Banner of Battle", PlayerId::new(0), ZoneId::new(1)));
    state.add_card(CardInstance::new(card, "Grunt", PlayerId::new(0), ZoneId::new(1)));
    (state, source, card)
}

fn granted_ids(state: &GameState, card: EntityId) -> Vec<AbilityId> {
    state
        .get_card(card)
        .map(|c| c.abilities.granted().map(|a| a.id).collect())
        .unwrap_or_default()
}

fn use_granted(state: &mut GameState, card: EntityId) -> bool {
    let Some(id) = granted_ids(state, card).first().copied() else {
        return false;
    };
    state
        .get_card_mut(card)
        .and_then(|c| c.abilities.get_mut(id))
        .is_some_and(|a| a.use_once())
}

fn remaining(state: &GameState, card: EntityId) -> Option<u32> {
    let id = granted_ids(state, card).first().copied()?;
    state
        .get_card(card)
        .and_then(|c| c.abilities.get(id))
        .map(|a| a.remaining_uses())
}

fn uses_by_kind(state: &GameState, card: EntityId) -> Vec<(AbilityKind, u32)> {
    state
        .get_card(card)
        .map(|c| c.abilities.granted().map(|a| (a.kind, a.remaining_uses())).collect())
        .unwrap_or_default()
}

fn use_kind(state: &GameState, card: EntityId, kind: AbilityKind) -> bool {
    state
        .get_card(card)
        .and_then(|c| c.abilities.granted().find(|a| a.kind == kind))
        .is_some_and(|a| a.use_once())
}

/// Every sub-kind is removed exactly, leaving printed abilities alone.
#[test]
fn test_grant_reversal_for_all_kinds() {
    let kinds = [
        AbilityKind::Action,
        AbilityKind::Fight,
        AbilityKind::Reap,
        AbilityKind::Play,
        AbilityKind::Triggered(CREATURE_DIED),
    ];

    for kind in kinds {
        let (mut state, source, card) = setup();
        let printed = state
            .grant_ability(card, AbilityKind::Reap, AbilityProperties::new("Reap: gain 1A"))
            .unwrap();
        assert!(state.register_events(card, printed));

        let context = AbilityContext::new(source, PlayerId::new(0));
        let mut engine = EffectEngine::new();
        engine
            .add(catalog::gain_ability(kind, AbilityProperties::new("granted")), EffectTarget::Card(card), context)
            .unwrap();

        engine.recalculate(&mut state, |_, _| true).unwrap();
        let granted = granted_ids(&state, card);
        assert_eq!(granted.len(), 1, "{:?} should be granted", kind);
        assert_eq!(
            state.listeners.contains(granted[0]),
            !kind.is_action(),
            "{:?} listener registration",
            kind
        );
        let card_state = state.get_card(card).unwrap();
        if kind.is_action() {
            assert_eq!(card_state.abilities.actions.len(), 1);
        } else {
            assert_eq!(card_state.abilities.reactions.len(), 2);
        }

        engine.recalculate(&mut state, |_, _| false).unwrap();
        let card_state = state.get_card(card).unwrap();
        assert!(granted_ids(&state, card).is_empty(), "{:?} should be revoked", kind);
        assert_eq!(card_state.abilities.len(), 1);
        assert!(card_state.abilities.get(printed).is_some());
        assert_eq!(state.listeners.len(), 1, "Only the printed listener should remain");
        assert!(state.listeners.contains(printed));
    }
}

/// Granted abilities fire with their host events.
#[test]
fn test_triggered_grant_listens_for_event() {
    let (mut state, source, card) = setup();
    let context = AbilityContext::new(source, PlayerId::new(0));
    let mut engine = EffectEngine::new();
    engine
        .add(
            catalog::gain_ability(AbilityKind::Triggered(CREATURE_DIED), AbilityProperties::new("Destroyed: draw")),
            EffectTarget::Card(card),
            context,
        )
        .unwrap();

    engine.recalculate(&mut state, |_, _| true).unwrap();
    let listeners = state.listeners.listeners_for(CREATURE_DIED);
    assert_eq!(listeners.len(), 1);
    assert_eq!(listeners[0].card, card);
    assert!(state.listeners.listeners_for(events::REAP).is_empty());
}

/// The reap flicker: a used reap ability stays used after leave/re-enter.
#[test]
fn test_reap_flicker_keeps_used_limit() {
    let (mut state, source, card) = setup();
    let context = AbilityContext::new(source, PlayerId::new(0));
    let mut engine = EffectEngine::new();
    engine
        .add(
            catalog::gain_ability(AbilityKind::Reap, AbilityProperties::new("Reap: steal 1A")),
            EffectTarget::Card(card),
            context,
        )
        .unwrap();

    engine.recalculate(&mut state, |_, _| true).unwrap();
    assert_eq!(remaining(&state, card), Some(1));
    assert!(use_granted(&mut state, card));
    assert_eq!(remaining(&state, card), Some(0));

    // Card leaves the affected area and comes back.
    engine.recalculate(&mut state, |_, _| false).unwrap();
    assert_eq!(remaining(&state, card), None);
    engine.recalculate(&mut state, |_, _| true).unwrap();

    assert_eq!(remaining(&state, card), Some(0), "Used ability should stay used");
    assert!(!use_granted(&mut state, card));
    assert_eq!(state.listeners.listeners_for(events::REAP).len(), 1);
}

/// Partial use of a multi-use ability persists too.
#[test]
fn test_limit_persists_partial_use() {
    let (mut state, source, card) = setup();
    let context = AbilityContext::new(source, PlayerId::new(0));
    let mut engine = EffectEngine::new();
    engine
        .add(
            catalog::gain_ability(AbilityKind::Action, AbilityProperties::new("Action: ready").with_limit(3)),
            EffectTarget::Card(card),
            context,
        )
        .unwrap();

    engine.recalculate(&mut state, |_, _| true).unwrap();
    assert!(use_granted(&mut state, card));
    engine.recalculate(&mut state, |_, _| false).unwrap();
    engine.recalculate(&mut state, |_, _| true).unwrap();

    assert_eq!(remaining(&state, card), Some(2));
    let slot = GrantSlot::new(card, AbilityKind::Action, "Action: ready");
    assert_eq!(state.get_card(source).unwrap().granted_limits.get(&slot), Some(2));
}

/// Another receiving card starts from the default.
#[test]
fn test_limit_is_per_receiving_card() {
    let (mut state, source, card) = setup();
    let other = state.alloc_entity();
    state.add_card(CardInstance::new(other, "Bystander", PlayerId::new(0), ZoneId::new(1)));

    let context = AbilityContext::new(source, PlayerId::new(0));
    let mut engine = EffectEngine::new();
    let grant = Rc::new(catalog::gain_ability(AbilityKind::Reap, AbilityProperties::new("Reap: gain 1A")));
    let on_card = engine.add(Rc::clone(&grant), EffectTarget::Card(card), context).unwrap();
    engine.add(grant, EffectTarget::Card(other), context).unwrap();

    // Only `card` is in range at first; it reaps.
    engine.recalculate(&mut state, |i, _| i.id() == on_card).unwrap();
    assert!(use_granted(&mut state, card));

    engine.recalculate(&mut state, |_, _| true).unwrap();
    assert_eq!(remaining(&state, card), Some(0));
    assert_eq!(remaining(&state, other), Some(1));
}

/// A second source granting to the same card keeps its own cache.
#[test]
fn test_limit_is_per_source() {
    let (mut state, source, card) = setup();
    let second = state.alloc_entity();
    state.add_card(CardInstance::new(second, "Second Banner", PlayerId::new(0), ZoneId::new(1)));

    let mut engine = EffectEngine::new();
    let grant = AbilityProperties::new("Fight: gain 1A");
    engine
        .add(
            catalog::gain_ability(AbilityKind::Fight, grant.clone()),
            EffectTarget::Card(card),
            AbilityContext::new(source, PlayerId::new(0)),
        )
        .unwrap();

    engine.recalculate(&mut state, |_, _| true).unwrap();
    assert!(use_granted(&mut state, card));

    engine
        .add(
            catalog::gain_ability(AbilityKind::Fight, grant),
            EffectTarget::Card(card),
            AbilityContext::new(second, PlayerId::new(0)),
        )
        .unwrap();
    engine.recalculate(&mut state, |_, _| true).unwrap();

    let uses: Vec<u32> = state
        .get_card(card)
        .unwrap()
        .abilities
        .granted()
        .map(|a| a.remaining_uses())
        .collect();
    assert_eq!(uses, vec![0, 1]);
}

/// One source granting two abilities to one card tracks each separately.
#[test]
fn test_flicker_keeps_each_grant_from_one_source() {
    let (mut state, source, card) = setup();
    let context = AbilityContext::new(source, PlayerId::new(0));
    let mut engine = EffectEngine::new();
    for (kind, name) in [(AbilityKind::Reap, "Reap: gain 1A"), (AbilityKind::Fight, "Fight: gain 1A")] {
        engine
            .add(catalog::gain_ability(kind, AbilityProperties::new(name)), EffectTarget::Card(card), context)
            .unwrap();
    }

    engine.recalculate(&mut state, |_, _| true).unwrap();
    assert!(use_kind(&state, card, AbilityKind::Reap));
    assert_eq!(uses_by_kind(&state, card), vec![(AbilityKind::Reap, 0), (AbilityKind::Fight, 1)]);

    engine.recalculate(&mut state, |_, _| false).unwrap();
    assert!(uses_by_kind(&state, card).is_empty());
    engine.recalculate(&mut state, |_, _| true).unwrap();

    assert_eq!(
        uses_by_kind(&state, card),
        vec![(AbilityKind::Reap, 0), (AbilityKind::Fight, 1)],
        "Used reap should not be refilled by the fight grant"
    );
    assert!(!use_kind(&state, card, AbilityKind::Reap));
    assert!(use_kind(&state, card, AbilityKind::Fight));
}

/// A card that leaves the game before the off pass still keeps its used limit.
#[test]
fn test_limit_survives_target_leaving_state() {
    let (mut state, source, card) = setup();
    let context = AbilityContext::new(source, PlayerId::new(0));
    let mut engine = EffectEngine::new();
    let grant = engine
        .add(
            catalog::gain_ability(AbilityKind::Reap, AbilityProperties::new("Reap: steal 1A")),
            EffectTarget::Card(card),
            context,
        )
        .unwrap();

    engine.recalculate(&mut state, |_, _| true).unwrap();
    assert!(use_granted(&mut state, card));

    // The card is gone before the pass that would revoke its ability.
    assert!(state.remove_card(card).is_some());
    engine.recalculate(&mut state, |_, _| false).unwrap();
    assert!(!engine.get(grant).unwrap().is_applied());

    state.add_card(CardInstance::new(card, "Grunt", PlayerId::new(0), ZoneId::new(1)));
    engine.recalculate(&mut state, |_, _| true).unwrap();

    assert_eq!(uses_by_kind(&state, card), vec![(AbilityKind::Reap, 0)]);
    assert!(!use_granted(&mut state, card));
    assert_eq!(state.listeners.listeners_for(events::REAP).len(), 1);
}
