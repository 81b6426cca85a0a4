//! Effect definitions.
//!
//! An `EffectDefinition` is an immutable template: *what* is modified
//! (`EffectKey`), *who* can carry it (`TargetKind`), and *how* it lives
//! through recalculation (`EffectKind`).
//!
//! | Kind | Value | apply/unapply |
//! |---|---|---|
//! | `Static` | fixed at definition time | once per activation |
//! | `Dynamic` | recomputed every pass | never |
//! | `Flexible` | fixed amount, summed on read | never |
//! | `Detached` | behavior supplied by caller | once per activation |

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::{AbilityId, CardInstance};
use crate::core::{EntityId, GameState, LocationId, PlayerId};
use crate::error::{EffectError, Result};
use crate::triggers::ConditionHandle;

use super::context::{AbilityContext, EffectTarget};
use super::instance::EffectInstanceId;
use super::restriction::CannotRestriction;

/// Kind of object an effect attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Card,
    Player,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Card => write!(f, "card"),
            TargetKind::Player => write!(f, "player"),
        }
    }
}

/// Lifecycle shape an effect key is built with by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyShape {
    Static,
    Flexible,
    Detached,
}

macro_rules! effect_keys {
    ($( $variant:ident => $name:literal, $shape:ident, [$($target:ident),+]; )+) => {
        /// What an effect modifies.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum EffectKey {
            $( $variant, )+
        }

        impl EffectKey {
            /// Every key, in declaration order.
            pub const ALL: &'static [EffectKey] = &[ $( EffectKey::$variant, )+ ];

            /// Canonical name of the key.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( EffectKey::$variant => $name, )+
                }
            }

            /// Shape the catalog builds this key with.
            #[must_use]
            pub const fn shape(self) -> KeyShape {
                match self {
                    $( EffectKey::$variant => KeyShape::$shape, )+
                }
            }

            /// Target kinds this key can be attached to.
            #[must_use]
            pub const fn target_kinds(self) -> &'static [TargetKind] {
                match self {
                    $( EffectKey::$variant => &[ $( TargetKind::$target ),+ ], )+
                }
            }
        }

        impl FromStr for EffectKey {
            type Err = EffectError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $( $name => Ok(EffectKey::$variant), )+
                    _ => Err(EffectError::UnknownEffectKey(s.to_string())),
                }
            }
        }
    };
}

effect_keys! {
    // Card effects
    AddHouse => "addHouse", Static, [Card];
    AddKeyword => "addKeyword", Static, [Card];
    AddTrait => "addTrait", Static, [Card];
    Blank => "blank", Static, [Card];
    BonusDamage => "bonusDamage", Static, [Card];
    DoesNotReady => "doesNotReady", Static, [Card];
    GainAbility => "gainAbility", Detached, [Card];
    Ignores => "ignores", Static, [Card];
    ModifyArmor => "modifyArmor", Flexible, [Card];
    ModifyPower => "modifyPower", Flexible, [Card];
    TakeControl => "takeControl", Static, [Card];
    TerminalCondition => "terminalCondition", Detached, [Card];
    TransferDamage => "transferDamage", Static, [Card];
    // Player effects
    AdditionalCost => "additionalCost", Static, [Player];
    CanPlay => "canPlay", Static, [Player];
    CanPlayFromOwn => "canPlayFromOwn", Detached, [Player];
    CanPlayHouse => "canPlayHouse", Static, [Player];
    CanPlayNonHouse => "canPlayNonHouse", Static, [Player];
    CanUse => "canUse", Static, [Player];
    CanUseHouse => "canUseHouse", Static, [Player];
    DelayedEffect => "delayedEffect", Detached, [Player];
    ForgeAmberRecipient => "forgeAmberRecipient", Static, [Player];
    ModifyHandSize => "modifyHandSize", Flexible, [Player];
    ModifyKeyCost => "modifyKeyCost", Flexible, [Player];
    RedirectAmber => "redirectAmber", Static, [Player];
    RestrictHouseChoice => "restrictHouseChoice", Static, [Player];
    ShowTopConflictCard => "showTopConflictCard", Static, [Player];
    SkipStep => "skipStep", Static, [Player];
    StopHouseChoice => "stopHouseChoice", Static, [Player];
    // Either
    AbilityRestrictions => "abilityRestrictions", Static, [Card, Player];
    CustomEffect => "customEffect", Detached, [Card, Player];
}

impl EffectKey {
    /// Can this key be attached to `kind`?
    #[must_use]
    pub fn allows(self, kind: TargetKind) -> bool {
        self.target_kinds().contains(&kind)
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card predicate carried by matcher-valued effects (`canPlay`, `bonusDamage`).
#[derive(Clone)]
pub struct CardMatcher(Rc<dyn Fn(&CardInstance) -> bool>);

impl CardMatcher {
    pub fn new(predicate: impl Fn(&CardInstance) -> bool + 'static) -> Self {
        Self(Rc::new(predicate))
    }

    #[must_use]
    pub fn matches(&self, card: &CardInstance) -> bool {
        (self.0)(card)
    }
}

impl fmt::Debug for CardMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CardMatcher(..)")
    }
}

/// Extra cost for playing a card, computed when the card is played
/// (`additionalCost`).
#[derive(Clone)]
pub struct CostFactory(Rc<dyn Fn(&GameState, &CardInstance) -> i64>);

impl CostFactory {
    pub fn new(factory: impl Fn(&GameState, &CardInstance) -> i64 + 'static) -> Self {
        Self(Rc::new(factory))
    }

    /// Amount owed for playing `card` in the current state.
    #[must_use]
    pub fn cost_for(&self, state: &GameState, card: &CardInstance) -> i64 {
        (self.0)(state, card)
    }
}

impl fmt::Debug for CostFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CostFactory(..)")
    }
}

/// Value carried by an effect.
#[derive(Clone, Debug)]
pub enum EffectValue {
    /// Presence is the whole effect (`blank`, `doesNotReady`).
    Flag,
    Int(i64),
    Text(String),
    Player(PlayerId),
    Entity(EntityId),
    Restriction(CannotRestriction),
    Matcher(CardMatcher),
    Cost(CostFactory),
}

impl EffectValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EffectValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EffectValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            EffectValue::Player(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            EffectValue::Entity(e) => Some(*e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_restriction(&self) -> Option<&CannotRestriction> {
        match self {
            EffectValue::Restriction(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_matcher(&self) -> Option<&CardMatcher> {
        match self {
            EffectValue::Matcher(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_cost(&self) -> Option<&CostFactory> {
        match self {
            EffectValue::Cost(c) => Some(c),
            _ => None,
        }
    }
}

/// Computes a dynamic effect's value from live state.
pub type ValueFactory = Rc<dyn Fn(&GameState, EffectTarget, &AbilityContext) -> EffectValue>;

/// Whatever `apply` handed back, kept until `unapply` consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppliedState {
    /// A static value recorded in the target's ledger under this instance.
    Ledger(EffectInstanceId),
    /// A granted ability.
    Ability(AbilityId),
    /// A registered delayed effect or terminal condition.
    Condition(ConditionHandle),
    /// An opened playable location.
    Location(LocationId),
    /// Caller-defined token for custom detached effects.
    Token(i64),
}

/// Entry and exit actions of a detached effect.
///
/// `activate` runs once when the effect becomes active and returns the
/// state `deactivate` needs to undo it. The engine guarantees the two
/// alternate; implementations don't need to guard against repeats.
/// `deactivate` must tolerate the thing it undoes being gone already.
pub trait DetachedEffect {
    fn activate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
    ) -> Result<AppliedState>;

    fn deactivate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
        applied: AppliedState,
    ) -> Result<()>;
}

/// Lifecycle semantics of an effect.
#[derive(Clone)]
pub enum EffectKind {
    Static(EffectValue),
    Dynamic(ValueFactory),
    Flexible(i64),
    Detached(Rc<dyn DetachedEffect>),
}

impl fmt::Debug for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::Static(value) => f.debug_tuple("Static").field(value).finish(),
            EffectKind::Dynamic(_) => f.write_str("Dynamic(..)"),
            EffectKind::Flexible(amount) => f.debug_tuple("Flexible").field(amount).finish(),
            EffectKind::Detached(_) => f.write_str("Detached(..)"),
        }
    }
}

/// An immutable effect template.
#[derive(Clone, Debug)]
pub struct EffectDefinition {
    key: EffectKey,
    target_kind: TargetKind,
    kind: EffectKind,
}

impl EffectDefinition {
    #[must_use]
    pub fn key(&self) -> EffectKey {
        self.key
    }

    #[must_use]
    pub fn target_kind(&self) -> TargetKind {
        self.target_kind
    }

    #[must_use]
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Does this kind call apply/unapply?
    #[must_use]
    pub fn is_applied_kind(&self) -> bool {
        matches!(self.kind, EffectKind::Static(_) | EffectKind::Detached(_))
    }
}

/// Builds definitions for one target kind.
///
/// ```
/// use ccg_effects::effects::{EffectBuilder, EffectKey, EffectValue, TargetKind};
///
/// let def = EffectBuilder::card().static_value(EffectKey::AddKeyword, EffectValue::Text("elusive".into()));
/// assert_eq!(def.key(), EffectKey::AddKeyword);
/// assert_eq!(def.target_kind(), TargetKind::Card);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EffectBuilder {
    target_kind: TargetKind,
}

impl EffectBuilder {
    /// Builder for card effects.
    #[must_use]
    pub const fn card() -> Self {
        Self { target_kind: TargetKind::Card }
    }

    /// Builder for player effects.
    #[must_use]
    pub const fn player() -> Self {
        Self { target_kind: TargetKind::Player }
    }

    fn build(self, key: EffectKey, kind: EffectKind) -> EffectDefinition {
        EffectDefinition {
            key,
            target_kind: self.target_kind,
            kind,
        }
    }

    /// Fixed value, applied once per activation.
    #[must_use]
    pub fn static_value(self, key: EffectKey, value: EffectValue) -> EffectDefinition {
        self.build(key, EffectKind::Static(value))
    }

    /// Additive amount, summed with other active effects of the same key.
    #[must_use]
    pub fn flexible(self, key: EffectKey, amount: i64) -> EffectDefinition {
        self.build(key, EffectKind::Flexible(amount))
    }

    /// Value recomputed from live state on every pass.
    #[must_use]
    pub fn dynamic(
        self,
        key: EffectKey,
        factory: impl Fn(&GameState, EffectTarget, &AbilityContext) -> EffectValue + 'static,
    ) -> EffectDefinition {
        self.build(key, EffectKind::Dynamic(Rc::new(factory)))
    }

    /// Entry/exit behavior supplied by the caller.
    #[must_use]
    pub fn detached(self, key: EffectKey, behavior: impl DetachedEffect + 'static) -> EffectDefinition {
        self.build(key, EffectKind::Detached(Rc::new(behavior)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for &key in EffectKey::ALL {
            assert_eq!(key.as_str().parse::<EffectKey>(), Ok(key));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            "gainWings".parse::<EffectKey>(),
            Err(EffectError::UnknownEffectKey("gainWings".to_string()))
        );
    }

    #[test]
    fn test_key_metadata() {
        assert_eq!(EffectKey::ModifyPower.shape(), KeyShape::Flexible);
        assert_eq!(EffectKey::GainAbility.shape(), KeyShape::Detached);
        assert!(EffectKey::AbilityRestrictions.allows(TargetKind::Card));
        assert!(EffectKey::AbilityRestrictions.allows(TargetKind::Player));
        assert!(!EffectKey::ModifyHandSize.allows(TargetKind::Card));
        assert_eq!(format!("{}", EffectKey::AddHouse), "addHouse");
    }

    #[test]
    fn test_builder_kinds() {
        let flexible = EffectBuilder::player().flexible(EffectKey::ModifyKeyCost, 2);
        assert!(matches!(flexible.kind(), EffectKind::Flexible(2)));
        assert!(!flexible.is_applied_kind());

        let dynamic = EffectBuilder::card().dynamic(EffectKey::BonusDamage, |_, _, _| EffectValue::Int(1));
        assert!(matches!(dynamic.kind(), EffectKind::Dynamic(_)));

        let fixed = EffectBuilder::card().static_value(EffectKey::Blank, EffectValue::Flag);
        assert!(fixed.is_applied_kind());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(EffectValue::Int(3).as_int(), Some(3));
        assert_eq!(EffectValue::Text("mars".into()).as_text(), Some("mars"));
        assert_eq!(EffectValue::Flag.as_int(), None);
        assert_eq!(EffectValue::Player(PlayerId::new(1)).as_player(), Some(PlayerId::new(1)));
        assert_eq!(EffectValue::Entity(EntityId(8)).as_entity(), Some(EntityId(8)));
    }
}
