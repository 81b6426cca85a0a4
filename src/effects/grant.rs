//! Granting abilities to cards.
//!
//! `GainAbility` is a detached effect: activation constructs a fresh,
//! non-printed ability on the target card (and registers its listeners
//! unless it is an action), deactivation takes that exact ability away.
//!
//! ## Remaining uses across re-grants
//!
//! Recalculation can revoke and re-grant an ability without the player
//! doing anything (the card left and re-entered the affected area). The
//! granting source keeps one `UseLimit` per receiving card and granted
//! ability in its `granted_limits`. Every copy of that ability handed to
//! that card counts down the cached handle, so revoking needs no
//! write-back and still holds when the card was already gone.
//!
//! A different card, ability or source starts from the default.

use tracing::{debug, warn};

use crate::cards::{AbilityKind, AbilityProperties, GrantSlot};
use crate::core::GameState;
use crate::error::{EffectError, Result};

use super::context::{AbilityContext, EffectTarget};
use super::definition::{AppliedState, DetachedEffect, EffectKey, TargetKind};

/// Detached behavior behind `gainAbility`.
#[derive(Clone, Debug)]
pub struct GainAbility {
    kind: AbilityKind,
    properties: AbilityProperties,
}

impl GainAbility {
    #[must_use]
    pub fn new(kind: AbilityKind, properties: AbilityProperties) -> Self {
        Self { kind, properties }
    }

    #[must_use]
    pub fn kind(&self) -> AbilityKind {
        self.kind
    }
}

impl DetachedEffect for GainAbility {
    fn activate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
    ) -> Result<AppliedState> {
        let card = target.as_card().ok_or(EffectError::TargetMismatch {
            key: EffectKey::GainAbility,
            expected: TargetKind::Card,
        })?;

        let mut properties = self.properties.clone();
        properties.printed = false;
        let ability_id = state.grant_ability(card, self.kind, properties)?;

        let initial = state
            .get_card(card)
            .and_then(|c| c.abilities.get(ability_id))
            .map_or(0, |a| a.remaining_uses());

        // Sources that are no longer in play keep no cache.
        let slot = GrantSlot::new(card, self.kind, self.properties.name.as_str());
        let cached = state
            .get_card_mut(context.source)
            .map(|source| source.granted_limits.get_or_insert(slot, initial));
        if let Some(cached) = cached {
            if let Some(ability) = state
                .get_card_mut(card)
                .and_then(|c| c.abilities.get_mut(ability_id))
            {
                ability.limit = cached;
            }
        }

        if !self.kind.is_action() {
            state.register_events(card, ability_id);
        }

        debug!(card = %card, ability = %ability_id, kind = ?self.kind, "ability granted");
        Ok(AppliedState::Ability(ability_id))
    }

    fn deactivate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        _context: &AbilityContext,
        applied: AppliedState,
    ) -> Result<()> {
        let AppliedState::Ability(ability_id) = applied else {
            warn!(state = ?applied, "gainAbility deactivated with foreign state");
            return Ok(());
        };
        let Some(card) = target.as_card() else {
            return Ok(());
        };

        if !self.kind.is_action() {
            state.unregister_events(ability_id);
        }

        match state.revoke_ability(card, ability_id) {
            Some(ability) => {
                debug!(card = %card, ability = %ability_id, remaining = ability.remaining_uses(), "ability revoked");
            }
            None => debug!(card = %card, ability = %ability_id, "granted ability already gone"),
        }
        Ok(())
    }
}
