//! Effect application engine.
//!
//! The engine owns every effect instance and drives them through
//! recalculation passes. The host decides which instances should be
//! active; the engine decides what happens on the way in and out.
//!
//! ## Pass order
//!
//! 1. Every `should_be_active` decision is taken against the state as it
//!    was before the pass.
//! 2. Instances leaving deactivate, in creation order.
//! 3. Instances entering activate and active ones recompute, in creation
//!    order.
//!
//! Deactivating first means an effect that replaces another (same key,
//! new source) never sees both applied at once. Aggregated values are
//! only meaningful after `recalculate` returns.
//!
//! ## Errors
//!
//! The first failing transition aborts the pass. Instances already
//! handled keep their new state; the failing one keeps its old state.

use std::rc::Rc;

use tracing::debug;

use crate::core::{EntityId, GameState, PlayerId};
use crate::error::{EffectError, Result};

use super::context::{AbilityContext, EffectTarget};
use super::definition::{EffectDefinition, EffectKey, EffectValue};
use super::instance::{EffectInstance, EffectInstanceId, Transition};
use super::restriction::{ActionRequest, CannotRestriction};

/// What one recalculation pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub activated: usize,
    pub deactivated: usize,
    pub recomputed: usize,
}

impl PassReport {
    /// Did any instance enter or leave?
    #[must_use]
    pub fn changed(&self) -> bool {
        self.activated > 0 || self.deactivated > 0
    }
}

/// Owns effect instances and runs recalculation passes.
#[derive(Debug, Default)]
pub struct EffectEngine {
    /// Instances in creation order.
    instances: Vec<EffectInstance>,
    next_id: u32,
}

impl EffectEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `definition` to `target`. The instance starts inactive.
    ///
    /// One `Rc<EffectDefinition>` can be shared by many targets.
    pub fn add(
        &mut self,
        definition: impl Into<Rc<EffectDefinition>>,
        target: EffectTarget,
        context: AbilityContext,
    ) -> Result<EffectInstanceId> {
        let definition = definition.into();
        if definition.target_kind() != target.kind() || !definition.key().allows(target.kind()) {
            return Err(EffectError::TargetMismatch {
                key: definition.key(),
                expected: definition.target_kind(),
            });
        }

        let id = EffectInstanceId(self.next_id);
        self.next_id += 1;
        debug!(instance = %id, key = %definition.key(), target = %target, "effect added");
        self.instances.push(EffectInstance::new(id, definition, target, context));
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: EffectInstanceId) -> Option<&EffectInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    /// All instances, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.instances.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Run one recalculation pass.
    pub fn recalculate<F>(&mut self, state: &mut GameState, mut should_be_active: F) -> Result<PassReport>
    where
        F: FnMut(&EffectInstance, &GameState) -> bool,
    {
        let decisions: Vec<bool> = self
            .instances
            .iter()
            .map(|instance| should_be_active(instance, &*state))
            .collect();

        let mut report = PassReport::default();

        for (instance, &wanted) in self.instances.iter_mut().zip(&decisions) {
            if instance.is_active() && !wanted {
                instance.transition(state, false)?;
                report.deactivated += 1;
            }
        }

        for (instance, &wanted) in self.instances.iter_mut().zip(&decisions) {
            if !wanted {
                continue;
            }
            match instance.transition(state, true)? {
                Transition::Activated => report.activated += 1,
                Transition::Recomputed => report.recomputed += 1,
                Transition::Deactivated | Transition::Unchanged => {}
            }
        }

        if report.changed() {
            debug!(
                activated = report.activated,
                deactivated = report.deactivated,
                "effects recalculated"
            );
        }
        Ok(report)
    }

    /// Remove an instance, deactivating it first if it is active.
    ///
    /// If deactivation fails the instance stays in the engine, still active.
    pub fn remove(&mut self, id: EffectInstanceId, state: &mut GameState) -> Result<EffectInstance> {
        let pos = self
            .instances
            .iter()
            .position(|i| i.id() == id)
            .ok_or(EffectError::InstanceNotFound(id))?;

        if self.instances[pos].is_active() {
            self.instances[pos].deactivate(state)?;
        }
        debug!(instance = %id, "effect removed");
        Ok(self.instances.remove(pos))
    }

    /// Remove every instance created by `source`. Returns how many went.
    pub fn remove_for_source(&mut self, source: EntityId, state: &mut GameState) -> Result<usize> {
        let ids: Vec<EffectInstanceId> = self
            .instances
            .iter()
            .filter(|i| i.context().source == source)
            .map(EffectInstance::id)
            .collect();

        for &id in &ids {
            self.remove(id, state)?;
        }
        Ok(ids.len())
    }

    // === Queries ===

    /// Values of active instances with `key` on `target`, in creation order.
    pub fn values(&self, target: EffectTarget, key: EffectKey) -> impl Iterator<Item = &EffectValue> {
        self.instances
            .iter()
            .filter(move |i| i.target() == target && i.key() == key)
            .filter_map(EffectInstance::value)
    }

    /// Is any active instance with `key` on `target`?
    #[must_use]
    pub fn has(&self, target: EffectTarget, key: EffectKey) -> bool {
        self.values(target, key).next().is_some()
    }

    /// Sum of the integer values with `key` on `target`.
    #[must_use]
    pub fn sum(&self, target: EffectTarget, key: EffectKey) -> i64 {
        self.values(target, key).filter_map(EffectValue::as_int).sum()
    }

    /// Active restrictions on `target`.
    pub fn restrictions(&self, target: EffectTarget) -> impl Iterator<Item = &CannotRestriction> {
        self.values(target, EffectKey::AbilityRestrictions)
            .filter_map(EffectValue::as_restriction)
    }

    /// Is `request` forbidden for `target`?
    #[must_use]
    pub fn is_forbidden(&self, target: EffectTarget, request: &ActionRequest) -> bool {
        super::restriction::is_forbidden(self.restrictions(target), request)
    }

    // === Aggregates ===

    /// Printed power plus every active `modifyPower`, floored at 0.
    #[must_use]
    pub fn effective_power(&self, state: &GameState, card: EntityId) -> i64 {
        let base = state.get_card(card).map_or(0, |c| c.get_state("power", 0));
        (base + self.sum(EffectTarget::Card(card), EffectKey::ModifyPower)).max(0)
    }

    /// Printed armor plus every active `modifyArmor`, floored at 0.
    #[must_use]
    pub fn effective_armor(&self, state: &GameState, card: EntityId) -> i64 {
        let base = state.get_card(card).map_or(0, |c| c.get_state("armor", 0));
        (base + self.sum(EffectTarget::Card(card), EffectKey::ModifyArmor)).max(0)
    }

    #[must_use]
    pub fn effective_hand_size(&self, state: &GameState, player: PlayerId) -> i64 {
        let base = state.config().base_hand_size;
        (base + self.sum(EffectTarget::Player(player), EffectKey::ModifyHandSize)).max(0)
    }

    #[must_use]
    pub fn effective_key_cost(&self, state: &GameState, player: PlayerId) -> i64 {
        let base = state.config().base_key_cost;
        (base + self.sum(EffectTarget::Player(player), EffectKey::ModifyKeyCost)).max(0)
    }
}
