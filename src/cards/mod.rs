//! Cards and their abilities.
//!
//! ## Key Types
//!
//! - `CardInstance`: a card in play, with its applied effects
//! - `Ability`, `AbilityKind`: printed or granted abilities
//! - `CardAbilities`: the action and reaction lists of a card
//! - `GrantedAbilityLimits`, `UseLimit`: shared remaining uses of granted abilities

pub mod ability;
pub mod instance;

pub use ability::{Ability, AbilityId, AbilityKind, AbilityProperties, CardAbilities, UseLimit};
pub use instance::{CardInstance, GrantSlot, GrantedAbilityLimits};
