//! Effect lifecycle.
//!
//! Effects are temporary rule changes attached to a card or a player:
//! - `EffectDefinition`: immutable template (key, target kind, lifecycle kind)
//! - `catalog`: one constructor per effect key
//! - `EffectInstance`: one definition attached to one target
//! - `EffectEngine`: owns instances and runs recalculation passes
//!
//! ## Lifecycle kinds
//!
//! `Static` and `Detached` effects act once on the way in and once on the
//! way out. `Dynamic` and `Flexible` effects only carry a value, which is
//! recomputed every pass and read through the engine's queries.
//!
//! The engine never decides *when* an effect applies. The host supplies
//! that as a `should_be_active` decision per instance per pass.

pub mod catalog;
mod context;
mod definition;
mod engine;
mod grant;
mod instance;
mod ledger;
mod registration;
mod restriction;

pub use context::{AbilityContext, EffectTarget};
pub use definition::{
    AppliedState, CardMatcher, CostFactory, DetachedEffect, EffectBuilder, EffectDefinition, EffectKey,
    EffectKind, EffectValue, KeyShape, TargetKind, ValueFactory,
};
pub use engine::{EffectEngine, PassReport};
pub use grant::GainAbility;
pub use instance::{EffectInstance, EffectInstanceId, Transition};
pub use ledger::{EffectLedger, LedgerEntry};
pub use registration::{CanPlayFromOwn, CustomDetached, DelayedEffect, TerminalCondition};
pub use restriction::{is_forbidden, ActionRequest, CannotRestriction};
