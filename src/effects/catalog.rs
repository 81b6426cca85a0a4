//! Effect catalog: one constructor per effect key.
//!
//! ```
//! use ccg_effects::effects::{catalog, EffectKey, EffectKind};
//!
//! let boost = catalog::modify_power(2);
//! assert_eq!(boost.key(), EffectKey::ModifyPower);
//! assert!(matches!(boost.kind(), EffectKind::Flexible(2)));
//! ```

use crate::cards::{AbilityKind, AbilityProperties, CardInstance};
use crate::core::{EntityId, GameState, PlayerId, ZoneId};
use crate::error::{EffectError, Result};
use crate::triggers::ConditionProperties;

use super::definition::{
    CardMatcher, CostFactory, EffectBuilder, EffectDefinition, EffectKey, EffectValue, KeyShape, TargetKind,
};
use super::grant::GainAbility;
use super::registration::{CanPlayFromOwn, CustomDetached, DelayedEffect, TerminalCondition};
use super::restriction::{ActionRequest, CannotRestriction};

fn text(value: impl Into<String>) -> EffectValue {
    EffectValue::Text(value.into())
}

// === Card effects ===

pub fn add_house(house: impl Into<String>) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::AddHouse, text(house))
}

pub fn add_keyword(keyword: impl Into<String>) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::AddKeyword, text(keyword))
}

pub fn add_trait(name: impl Into<String>) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::AddTrait, text(name))
}

/// The card loses its printed text.
pub fn blank() -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::Blank, EffectValue::Flag)
}

/// Extra damage against cards `matches` accepts.
pub fn bonus_damage(matches: impl Fn(&CardInstance) -> bool + 'static) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::BonusDamage, EffectValue::Matcher(CardMatcher::new(matches)))
}

/// The card cannot `action_type` while `condition` holds.
pub fn card_cannot(
    action_type: impl Into<String>,
    condition: impl Fn(&ActionRequest) -> bool + 'static,
) -> EffectDefinition {
    EffectBuilder::card().static_value(
        EffectKey::AbilityRestrictions,
        EffectValue::Restriction(CannotRestriction::new(action_type, condition)),
    )
}

pub fn custom_detached_card(behavior: CustomDetached) -> EffectDefinition {
    EffectBuilder::card().detached(EffectKey::CustomEffect, behavior)
}

pub fn does_not_ready() -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::DoesNotReady, EffectValue::Flag)
}

/// The card gains an ability of `kind` while the effect is active.
pub fn gain_ability(kind: AbilityKind, properties: AbilityProperties) -> EffectDefinition {
    EffectBuilder::card().detached(EffectKey::GainAbility, GainAbility::new(kind, properties))
}

pub fn ignores(name: impl Into<String>) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::Ignores, text(name))
}

pub fn modify_armor(amount: i64) -> EffectDefinition {
    EffectBuilder::card().flexible(EffectKey::ModifyArmor, amount)
}

pub fn modify_power(amount: i64) -> EffectDefinition {
    EffectBuilder::card().flexible(EffectKey::ModifyPower, amount)
}

pub fn take_control(player: PlayerId) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::TakeControl, EffectValue::Player(player))
}

/// Registers a terminal condition bound to each targeted card.
pub fn terminal_condition(properties: ConditionProperties) -> EffectDefinition {
    EffectBuilder::card().detached(EffectKey::TerminalCondition, TerminalCondition::new(properties))
}

/// Damage dealt to the card goes to `card` instead.
pub fn transfer_damage(card: EntityId) -> EffectDefinition {
    EffectBuilder::card().static_value(EffectKey::TransferDamage, EffectValue::Entity(card))
}

// === Player effects ===

/// Extra amber the player pays to play a card, worked out per card at
/// play time.
pub fn additional_cost(factory: impl Fn(&GameState, &CardInstance) -> i64 + 'static) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::AdditionalCost, EffectValue::Cost(CostFactory::new(factory)))
}

pub fn can_play(matches: impl Fn(&CardInstance) -> bool + 'static) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::CanPlay, EffectValue::Matcher(CardMatcher::new(matches)))
}

/// The player may play cards from their own `zone`.
pub fn can_play_from_own(zone: ZoneId) -> EffectDefinition {
    EffectBuilder::player().detached(EffectKey::CanPlayFromOwn, CanPlayFromOwn::new(zone))
}

pub fn can_play_house(house: impl Into<String>) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::CanPlayHouse, text(house))
}

pub fn can_play_non_house(house: impl Into<String>) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::CanPlayNonHouse, text(house))
}

pub fn can_use(matches: impl Fn(&CardInstance) -> bool + 'static) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::CanUse, EffectValue::Matcher(CardMatcher::new(matches)))
}

pub fn can_use_house(house: impl Into<String>) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::CanUseHouse, text(house))
}

pub fn custom_detached_player(behavior: CustomDetached) -> EffectDefinition {
    EffectBuilder::player().detached(EffectKey::CustomEffect, behavior)
}

/// Registers a delayed effect for the targeted player.
pub fn delayed_effect(properties: ConditionProperties) -> EffectDefinition {
    EffectBuilder::player().detached(EffectKey::DelayedEffect, DelayedEffect::new(properties))
}

pub fn forge_amber_recipient(player: PlayerId) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::ForgeAmberRecipient, EffectValue::Player(player))
}

pub fn modify_key_cost(amount: i64) -> EffectDefinition {
    EffectBuilder::player().flexible(EffectKey::ModifyKeyCost, amount)
}

pub fn modify_hand_size(amount: i64) -> EffectDefinition {
    EffectBuilder::player().flexible(EffectKey::ModifyHandSize, amount)
}

/// The player cannot `action_type` while `condition` holds.
pub fn player_cannot(
    action_type: impl Into<String>,
    condition: impl Fn(&ActionRequest) -> bool + 'static,
) -> EffectDefinition {
    EffectBuilder::player().static_value(
        EffectKey::AbilityRestrictions,
        EffectValue::Restriction(CannotRestriction::new(action_type, condition)),
    )
}

pub fn redirect_amber(recipient: PlayerId) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::RedirectAmber, EffectValue::Player(recipient))
}

pub fn restrict_house_choice(house: impl Into<String>) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::RestrictHouseChoice, text(house))
}

pub fn stop_house_choice(house: impl Into<String>) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::StopHouseChoice, text(house))
}

pub fn show_top_conflict_card() -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::ShowTopConflictCard, EffectValue::Flag)
}

pub fn skip_step(step: impl Into<String>) -> EffectDefinition {
    EffectBuilder::player().static_value(EffectKey::SkipStep, text(step))
}

// === By name ===

/// Build a value-shaped effect from its key name.
///
/// Only static and flexible keys can be built this way; detached keys
/// need behavior and must use their constructor. Flexible keys need an
/// `Int` value.
pub fn from_name(target_kind: TargetKind, name: &str, value: EffectValue) -> Result<EffectDefinition> {
    let key: EffectKey = name.parse()?;
    if !key.allows(target_kind) {
        return Err(EffectError::TargetMismatch {
            key,
            expected: key.target_kinds()[0],
        });
    }

    let builder = match target_kind {
        TargetKind::Card => EffectBuilder::card(),
        TargetKind::Player => EffectBuilder::player(),
    };

    match key.shape() {
        KeyShape::Static => Ok(builder.static_value(key, value)),
        KeyShape::Flexible => {
            let amount = value.as_int().ok_or(EffectError::InvalidValue(key))?;
            Ok(builder.flexible(key, amount))
        }
        KeyShape::Detached => Err(EffectError::NotValueShaped(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{AppliedState, EffectKind};

    #[test]
    fn test_catalog_shapes_match_keys() {
        let built = [
            add_house("mars"),
            add_keyword("elusive"),
            add_trait("knight"),
            blank(),
            bonus_damage(|_| true),
            card_cannot("fight", |_| true),
            does_not_ready(),
            gain_ability(AbilityKind::Action, AbilityProperties::new("a")),
            ignores("taunt"),
            modify_armor(1),
            modify_power(1),
            take_control(PlayerId::new(1)),
            terminal_condition(ConditionProperties::new("t")),
            transfer_damage(EntityId(5)),
            additional_cost(|_, _| 1),
            can_play(|_| true),
            can_play_from_own(ZoneId::new(3)),
            can_play_house("dis"),
            can_play_non_house("dis"),
            can_use(|_| true),
            can_use_house("dis"),
            delayed_effect(ConditionProperties::new("d")),
            forge_amber_recipient(PlayerId::new(0)),
            modify_key_cost(2),
            modify_hand_size(-1),
            player_cannot("play", |_| true),
            redirect_amber(PlayerId::new(1)),
            restrict_house_choice("logos"),
            stop_house_choice("logos"),
            show_top_conflict_card(),
            skip_step("draw"),
            custom_detached_card(CustomDetached::new(|_, _, _| Ok(AppliedState::Token(0)), |_, _, _, _| Ok(()))),
            custom_detached_player(CustomDetached::new(|_, _, _| Ok(AppliedState::Token(0)), |_, _, _, _| Ok(()))),
        ];
        // Restrictions and custom effects come in card and player flavors.
        assert_eq!(built.len(), EffectKey::ALL.len() + 2);
        for key in EffectKey::ALL {
            assert!(built.iter().any(|def| def.key() == *key), "{} has no constructor", key);
        }

        for def in &built {
            assert!(def.key().allows(def.target_kind()), "{} on {}", def.key(), def.target_kind());
            let shape = match def.kind() {
                EffectKind::Static(_) => KeyShape::Static,
                EffectKind::Flexible(_) => KeyShape::Flexible,
                EffectKind::Detached(_) => KeyShape::Detached,
                EffectKind::Dynamic(_) => panic!("catalog builds no dynamic effects"),
            };
            assert_eq!(shape, def.key().shape(), "{}", def.key());
        }
    }

    #[test]
    fn test_additional_cost_is_computed_per_card() {
        use crate::core::EngineConfig;

        let mut state = GameState::new(EngineConfig::new(2));
        let card = state.alloc_entity();
        state.add_card(CardInstance::new(card, "Ether Spider", PlayerId::new(1), ZoneId::new(2)).with_state("amber", 2));

        let def = additional_cost(|_, card| 1 + card.get_state("amber", 0));
        assert_eq!(def.key(), EffectKey::AdditionalCost);
        assert_eq!(def.target_kind(), TargetKind::Player);

        let EffectKind::Static(value) = def.kind() else {
            panic!("additionalCost should be static");
        };
        let cost = value.as_cost().expect("cost factory value");
        assert_eq!(cost.cost_for(&state, state.get_card(card).unwrap()), 3);
        assert!(value.as_int().is_none());
    }

    #[test]
    fn test_from_name_static_and_flexible() {
        let house = from_name(TargetKind::Card, "addHouse", EffectValue::Text("untamed".into())).unwrap();
        assert_eq!(house.key(), EffectKey::AddHouse);

        let hand = from_name(TargetKind::Player, "modifyHandSize", EffectValue::Int(1)).unwrap();
        assert!(matches!(hand.kind(), EffectKind::Flexible(1)));
    }

    #[test]
    fn test_from_name_rejections() {
        assert_eq!(
            from_name(TargetKind::Card, "fly", EffectValue::Flag).unwrap_err(),
            EffectError::UnknownEffectKey("fly".to_string())
        );
        assert_eq!(
            from_name(TargetKind::Card, "gainAbility", EffectValue::Flag).unwrap_err(),
            EffectError::NotValueShaped(EffectKey::GainAbility)
        );
        assert_eq!(
            from_name(TargetKind::Card, "modifyPower", EffectValue::Flag).unwrap_err(),
            EffectError::InvalidValue(EffectKey::ModifyPower)
        );
        assert!(matches!(
            from_name(TargetKind::Card, "modifyHandSize", EffectValue::Int(1)),
            Err(EffectError::TargetMismatch { key: EffectKey::ModifyHandSize, expected: TargetKind::Player })
        ));
    }
}
