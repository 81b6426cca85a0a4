//! Detached effects that register something with the host.
//!
//! - `TerminalCondition`: registers a terminal condition bound to the target card
//! - `DelayedEffect`: registers a delayed effect for the target player
//! - `CanPlayFromOwn`: opens one of the player's own zones for playing
//! - `CustomDetached`: caller-supplied entry and exit actions
//!
//! Each one undoes exactly what it registered, by the identity the host
//! handed back, and treats "already gone" as done.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::core::{GameState, ZoneId};
use crate::error::{EffectError, Result};
use crate::triggers::{ConditionHandle, ConditionProperties};

use super::context::{AbilityContext, EffectTarget};
use super::definition::{AppliedState, DetachedEffect, EffectKey, TargetKind};

fn expect_handle(applied: &AppliedState) -> Option<ConditionHandle> {
    match applied {
        AppliedState::Condition(handle) => Some(*handle),
        _ => None,
    }
}

/// Detached behavior behind `terminalCondition`.
#[derive(Clone, Debug)]
pub struct TerminalCondition {
    properties: ConditionProperties,
}

impl TerminalCondition {
    #[must_use]
    pub fn new(properties: ConditionProperties) -> Self {
        Self { properties }
    }
}

impl DetachedEffect for TerminalCondition {
    fn activate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
    ) -> Result<AppliedState> {
        let card = target.as_card().ok_or(EffectError::TargetMismatch {
            key: EffectKey::TerminalCondition,
            expected: TargetKind::Card,
        })?;

        // Each target gets its own bag so one broad effect doesn't share
        // a single condition across all the cards it covers.
        let mut properties = self.properties.clone();
        properties.target = Some(card);
        properties.context.get_or_insert(*context);

        let handle = state.register_terminal_condition(context.source, Rc::new(move || properties.clone()));
        debug!(card = %card, handle = %handle, "terminal condition registered");
        Ok(AppliedState::Condition(handle))
    }

    fn deactivate(
        &self,
        state: &mut GameState,
        _target: EffectTarget,
        _context: &AbilityContext,
        applied: AppliedState,
    ) -> Result<()> {
        if let Some(handle) = expect_handle(&applied) {
            if !state.remove_terminal_condition(handle) {
                debug!(handle = %handle, "terminal condition already removed");
            }
        }
        Ok(())
    }
}

/// Detached behavior behind `delayedEffect`.
#[derive(Clone, Debug)]
pub struct DelayedEffect {
    properties: ConditionProperties,
}

impl DelayedEffect {
    #[must_use]
    pub fn new(properties: ConditionProperties) -> Self {
        Self { properties }
    }
}

impl DetachedEffect for DelayedEffect {
    fn activate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
    ) -> Result<AppliedState> {
        if target.as_player().is_none() {
            return Err(EffectError::TargetMismatch {
                key: EffectKey::DelayedEffect,
                expected: TargetKind::Player,
            });
        }

        let mut properties = self.properties.clone();
        properties.context.get_or_insert(*context);

        let handle = state.register_delayed_effect(context.source, Rc::new(move || properties.clone()));
        debug!(target = %target, handle = %handle, "delayed effect registered");
        Ok(AppliedState::Condition(handle))
    }

    fn deactivate(
        &self,
        state: &mut GameState,
        _target: EffectTarget,
        _context: &AbilityContext,
        applied: AppliedState,
    ) -> Result<()> {
        if let Some(handle) = expect_handle(&applied) {
            if !state.remove_delayed_effect(handle) {
                debug!(handle = %handle, "delayed effect already removed");
            }
        }
        Ok(())
    }
}

/// Detached behavior behind `canPlayFromOwn`.
#[derive(Clone, Copy, Debug)]
pub struct CanPlayFromOwn {
    zone: ZoneId,
}

impl CanPlayFromOwn {
    #[must_use]
    pub fn new(zone: ZoneId) -> Self {
        Self { zone }
    }
}

impl DetachedEffect for CanPlayFromOwn {
    fn activate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        _context: &AbilityContext,
    ) -> Result<AppliedState> {
        let player = target.as_player().ok_or(EffectError::TargetMismatch {
            key: EffectKey::CanPlayFromOwn,
            expected: TargetKind::Player,
        })?;
        let location = state
            .player_mut(player)
            .ok_or(EffectError::PlayerNotFound(player))?
            .add_playable_location("play", player, self.zone);
        Ok(AppliedState::Location(location))
    }

    fn deactivate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        _context: &AbilityContext,
        applied: AppliedState,
    ) -> Result<()> {
        if let (Some(player), AppliedState::Location(location)) = (target.as_player(), applied) {
            if let Some(player_state) = state.player_mut(player) {
                player_state.remove_playable_location(location);
            }
        }
        Ok(())
    }
}

type ApplyFn = dyn Fn(&mut GameState, EffectTarget, &AbilityContext) -> Result<AppliedState>;
type UnapplyFn = dyn Fn(&mut GameState, EffectTarget, &AbilityContext, AppliedState) -> Result<()>;

/// Detached behavior from a pair of closures (`customEffect`).
#[derive(Clone)]
pub struct CustomDetached {
    apply: Rc<ApplyFn>,
    unapply: Rc<UnapplyFn>,
}

impl CustomDetached {
    pub fn new(
        apply: impl Fn(&mut GameState, EffectTarget, &AbilityContext) -> Result<AppliedState> + 'static,
        unapply: impl Fn(&mut GameState, EffectTarget, &AbilityContext, AppliedState) -> Result<()> + 'static,
    ) -> Self {
        Self {
            apply: Rc::new(apply),
            unapply: Rc::new(unapply),
        }
    }
}

impl fmt::Debug for CustomDetached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomDetached(..)")
    }
}

impl DetachedEffect for CustomDetached {
    fn activate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
    ) -> Result<AppliedState> {
        (self.apply)(state, target, context)
    }

    fn deactivate(
        &self,
        state: &mut GameState,
        target: EffectTarget,
        context: &AbilityContext,
        applied: AppliedState,
    ) -> Result<()> {
        (self.unapply)(state, target, context, applied)
    }
}
