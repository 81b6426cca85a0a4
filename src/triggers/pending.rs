//! Pending conditions: delayed effects and terminal conditions.
//!
//! A pending condition is a property bag produced on demand by a
//! factory. The registry owns the entries; effects that created them
//! keep only the `ConditionHandle` and remove the entry explicitly.
//! When and how the host evaluates entries is up to the host.

use std::fmt;
use std::rc::Rc;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::EntityId;
use crate::effects::AbilityContext;

use super::event::EventTypeId;

/// Handle to a registered pending condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionHandle(pub u32);

impl fmt::Display for ConditionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self.0)
    }
}

/// What a pending condition is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Fires once, later, when its events occur.
    Delayed,
    /// Ends something (usually its target's presence) when met.
    Terminal,
}

/// Properties of a pending condition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionProperties {
    /// Human-readable name.
    pub name: String,

    /// Event types the host should evaluate the condition on.
    pub when: SmallVec<[EventTypeId; 2]>,

    /// The card the condition is about (bound per target for terminal conditions).
    pub target: Option<EntityId>,

    /// Ability context the condition resolves in.
    pub context: Option<AbilityContext>,

    /// Optional message for the game log.
    pub message: Option<String>,
}

impl ConditionProperties {
    /// Create properties with a name and nothing else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an event type to evaluate on (builder pattern).
    #[must_use]
    pub fn on(mut self, event_type: EventTypeId) -> Self {
        if !self.when.contains(&event_type) {
            self.when.push(event_type);
        }
        self
    }

    /// Set the context (builder pattern).
    #[must_use]
    pub fn with_context(mut self, context: AbilityContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the log message (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Lazily evaluated property bag.
pub type ConditionFactory = Rc<dyn Fn() -> ConditionProperties>;

/// A registered pending condition.
#[derive(Clone)]
pub struct PendingCondition {
    pub handle: ConditionHandle,
    pub kind: ConditionKind,
    /// The card that registered the condition.
    pub source: EntityId,
    factory: ConditionFactory,
}

impl PendingCondition {
    /// Evaluate the property bag.
    #[must_use]
    pub fn properties(&self) -> ConditionProperties {
        (self.factory)()
    }
}

impl fmt::Debug for PendingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCondition")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Registry of pending conditions, in registration order.
#[derive(Clone, Debug, Default)]
pub struct ConditionRegistry {
    entries: Vector<PendingCondition>,
    next_handle: u32,
}

impl ConditionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a condition, returns its handle.
    pub fn register(
        &mut self,
        kind: ConditionKind,
        source: EntityId,
        factory: ConditionFactory,
    ) -> ConditionHandle {
        let handle = ConditionHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push_back(PendingCondition {
            handle,
            kind,
            source,
            factory,
        });
        handle
    }

    /// Remove a condition of `kind`.
    ///
    /// Returns false if no such entry exists (already removed, or the
    /// handle belongs to the other kind).
    pub fn remove(&mut self, kind: ConditionKind, handle: ConditionHandle) -> bool {
        match self
            .entries
            .iter()
            .position(|e| e.handle == handle && e.kind == kind)
        {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Get an entry by handle.
    #[must_use]
    pub fn get(&self, handle: ConditionHandle) -> Option<&PendingCondition> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    /// Entries of one kind, oldest first.
    pub fn of_kind(&self, kind: ConditionKind) -> impl Iterator<Item = &PendingCondition> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Get total entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
