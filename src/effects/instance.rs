//! Effect instances.
//!
//! An `EffectInstance` is one definition attached to one target. It
//! moves between inactive and active once per recalculation pass, as
//! told by the caller:
//!
//! | active | should be | Static / Detached | Dynamic / Flexible |
//! |---|---|---|---|
//! | no | yes | `apply`, keep state | compute value |
//! | yes | yes | nothing | recompute value |
//! | yes | no | `unapply(state)` | drop value |
//! | no | no | nothing | nothing |
//!
//! `applied_state` is `Some` exactly while a Static/Detached instance is
//! applied. It is only stored after `apply` succeeded and only cleared
//! after `unapply` succeeded, so a failed transition leaves the instance
//! where it was.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::GameState;
use crate::error::{EffectError, Result};

use super::context::{AbilityContext, EffectTarget};
use super::definition::{AppliedState, EffectDefinition, EffectKey, EffectKind, EffectValue};
use super::ledger::EffectLedger;

/// Unique identifier for an effect instance, in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectInstanceId(pub u32);

impl fmt::Display for EffectInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// What a single transition did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Activated,
    Recomputed,
    Deactivated,
    Unchanged,
}

/// One attachment of a definition to a target.
#[derive(Clone, Debug)]
pub struct EffectInstance {
    id: EffectInstanceId,
    definition: Rc<EffectDefinition>,
    target: EffectTarget,
    context: AbilityContext,
    active: bool,
    applied_state: Option<AppliedState>,
    current_value: Option<EffectValue>,
}

impl EffectInstance {
    /// Create an inactive instance.
    #[must_use]
    pub fn new(
        id: EffectInstanceId,
        definition: Rc<EffectDefinition>,
        target: EffectTarget,
        context: AbilityContext,
    ) -> Self {
        Self {
            id,
            definition,
            target,
            context,
            active: false,
            applied_state: None,
            current_value: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> EffectInstanceId {
        self.id
    }

    #[must_use]
    pub fn definition(&self) -> &EffectDefinition {
        &self.definition
    }

    #[must_use]
    pub fn key(&self) -> EffectKey {
        self.definition.key()
    }

    #[must_use]
    pub fn target(&self) -> EffectTarget {
        self.target
    }

    #[must_use]
    pub fn context(&self) -> &AbilityContext {
        &self.context
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Has `apply` run without a matching `unapply`?
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied_state.is_some()
    }

    #[must_use]
    pub fn applied_state(&self) -> Option<&AppliedState> {
        self.applied_state.as_ref()
    }

    /// The value this instance contributes while active.
    ///
    /// Detached effects contribute nothing: they act on entry and exit.
    #[must_use]
    pub fn value(&self) -> Option<&EffectValue> {
        if !self.active {
            return None;
        }
        match self.definition.kind() {
            EffectKind::Static(value) => Some(value),
            EffectKind::Dynamic(_) | EffectKind::Flexible(_) => self.current_value.as_ref(),
            EffectKind::Detached(_) => None,
        }
    }

    /// Move toward `should_be_active`.
    pub fn transition(&mut self, state: &mut GameState, should_be_active: bool) -> Result<Transition> {
        match (self.active, should_be_active) {
            (false, true) => {
                self.activate(state)?;
                Ok(Transition::Activated)
            }
            (true, true) => Ok(self.recompute(state)),
            (true, false) => {
                self.deactivate(state)?;
                Ok(Transition::Deactivated)
            }
            (false, false) => Ok(Transition::Unchanged),
        }
    }

    /// Inactive -> Active.
    pub fn activate(&mut self, state: &mut GameState) -> Result<()> {
        if self.active {
            return Err(EffectError::AlreadyApplied(self.id));
        }

        let definition = Rc::clone(&self.definition);
        match definition.kind() {
            EffectKind::Static(value) => {
                let ledger = ledger_mut(state, self.target).ok_or_else(|| missing(self.target))?;
                ledger.push(self.id, definition.key(), value.clone());
                self.applied_state = Some(AppliedState::Ledger(self.id));
            }
            EffectKind::Detached(behavior) => {
                let applied = behavior.activate(state, self.target, &self.context)?;
                self.applied_state = Some(applied);
            }
            EffectKind::Dynamic(factory) => {
                self.current_value = Some(factory(state, self.target, &self.context));
            }
            EffectKind::Flexible(amount) => {
                self.current_value = Some(EffectValue::Int(*amount));
            }
        }

        self.active = true;
        debug!(instance = %self.id, key = %definition.key(), target = %self.target, "effect activated");
        Ok(())
    }

    /// Active -> Inactive.
    pub fn deactivate(&mut self, state: &mut GameState) -> Result<()> {
        if !self.active {
            return Err(EffectError::NotApplied(self.id));
        }

        let definition = Rc::clone(&self.definition);
        match definition.kind() {
            EffectKind::Static(_) => {
                if self.applied_state.is_none() {
                    return Err(EffectError::NotApplied(self.id));
                }
                // The target may have left play since apply.
                let removed = ledger_mut(state, self.target).is_some_and(|l| l.remove(self.id));
                if !removed {
                    debug!(instance = %self.id, target = %self.target, "static effect already gone");
                }
            }
            EffectKind::Detached(behavior) => {
                let applied = self
                    .applied_state
                    .clone()
                    .ok_or(EffectError::NotApplied(self.id))?;
                behavior.deactivate(state, self.target, &self.context, applied)?;
            }
            EffectKind::Dynamic(_) | EffectKind::Flexible(_) => {}
        }

        self.applied_state = None;
        self.current_value = None;
        self.active = false;
        debug!(instance = %self.id, key = %definition.key(), target = %self.target, "effect deactivated");
        Ok(())
    }

    fn recompute(&mut self, state: &GameState) -> Transition {
        match self.definition.kind() {
            EffectKind::Dynamic(factory) => {
                self.current_value = Some(factory(state, self.target, &self.context));
            }
            EffectKind::Flexible(amount) => {
                self.current_value = Some(EffectValue::Int(*amount));
            }
            EffectKind::Static(_) | EffectKind::Detached(_) => return Transition::Unchanged,
        }
        trace!(instance = %self.id, value = ?self.current_value, "effect recomputed");
        Transition::Recomputed
    }
}

fn ledger_mut(state: &mut GameState, target: EffectTarget) -> Option<&mut EffectLedger> {
    match target {
        EffectTarget::Card(id) => state.get_card_mut(id).map(|c| &mut c.effects),
        EffectTarget::Player(id) => state.player_mut(id).map(|p| &mut p.effects),
    }
}

fn missing(target: EffectTarget) -> EffectError {
    match target {
        EffectTarget::Card(id) => EffectError::CardNotFound(id),
        EffectTarget::Player(id) => EffectError::PlayerNotFound(id),
    }
}
