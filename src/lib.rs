//! # ccg-effects
//!
//! Effect and ability lifecycle for turn-based card games.
//!
//! Temporary rule changes (stat boosts, keyword grants, play restrictions,
//! granted abilities, delayed and terminal conditions) are attached to
//! cards or players, kept consistent as game state changes, and reversed
//! exactly when their scope ends.
//!
//! ## Design Principles
//!
//! 1. **Host decides when**: the embedding game supplies a
//!    `should_be_active` decision per effect per pass. The engine decides
//!    what happens on each transition and how concurrent effects compose.
//!
//! 2. **Exact reversal**: everything an effect does on activation is undone
//!    by identity on deactivation. Undoing something already gone is a
//!    no-op, never an error.
//!
//! 3. **Ids, not references**: effects reach cards and players through
//!    `EntityId` / `PlayerId`, so a source leaving play never dangles.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, configuration, host state
//! - `cards`: Card instances, abilities, granted-ability limits
//! - `triggers`: Event listeners, delayed effects, terminal conditions
//! - `effects`: Definitions, catalog, instances, recalculation engine
//!
//! ## Example
//!
//! ```
//! use ccg_effects::effects::{catalog, AbilityContext, EffectEngine, EffectTarget};
//! use ccg_effects::{CardInstance, EngineConfig, GameState, PlayerId, ZoneId};
//!
//! let mut state = GameState::new(EngineConfig::new(2));
//! let card = state.alloc_entity();
//! state.add_card(CardInstance::new(card, "Troll", PlayerId::new(0), ZoneId::new(1)).with_state("power", 8));
//!
//! let mut engine = EffectEngine::new();
//! let context = AbilityContext::new(card, PlayerId::new(0));
//! engine.add(catalog::modify_power(2), EffectTarget::Card(card), context)?;
//! engine.recalculate(&mut state, |_, _| true)?;
//!
//! assert_eq!(engine.effective_power(&state, card), 10);
//! # Ok::<(), ccg_effects::EffectError>(())
//! ```

pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig, EntityId, GameState, LocationId, PlayableLocation, PlayerId, PlayerMap,
    PlayerState, ZoneId,
};

pub use crate::cards::{
    Ability, AbilityId, AbilityKind, AbilityProperties, CardAbilities, CardInstance,
    GrantSlot, GrantedAbilityLimits, UseLimit,
};

pub use crate::effects::{
    AbilityContext, EffectBuilder, EffectDefinition, EffectEngine, EffectInstance,
    EffectInstanceId, EffectKey, EffectKind, EffectTarget, EffectValue, TargetKind,
};

pub use crate::triggers::{
    ConditionHandle, ConditionKind, ConditionProperties, ConditionRegistry, EventTypeId,
    ListenerRegistry,
};

pub use crate::error::{EffectError, Result};
