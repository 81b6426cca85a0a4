//! "Cannot" restrictions.
//!
//! A `CannotRestriction` forbids one action type, optionally only when a
//! condition holds for the requested action. Restrictions arrive on a
//! target as static `abilityRestrictions` effects; any number may be
//! active at once and an action is forbidden if any matching one says so.
//!
//! Conditions only see the `ActionRequest`, never game state, so they
//! can be evaluated speculatively (legal-move lists) without effects.

use std::fmt;
use std::rc::Rc;

use crate::core::{EntityId, PlayerId};

/// An action being checked against restrictions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    /// Action type ("play", "use", "fight", "reap", "discard", ...).
    pub action_type: String,

    /// The card acting or being acted on.
    pub card: Option<EntityId>,

    /// The player taking the action.
    pub player: Option<PlayerId>,

    /// The card whose ability requests the action, if any.
    pub source: Option<EntityId>,
}

impl ActionRequest {
    /// Request for `action_type` with no further detail.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            card: None,
            player: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_card(mut self, card: EntityId) -> Self {
        self.card = Some(card);
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

type RestrictionCondition = Rc<dyn Fn(&ActionRequest) -> bool>;

/// Forbids `action_type` when `condition` holds (always, if there is none).
#[derive(Clone)]
pub struct CannotRestriction {
    action_type: String,
    condition: Option<RestrictionCondition>,
}

impl CannotRestriction {
    /// Forbid `action_type` whenever `condition` returns true.
    pub fn new(
        action_type: impl Into<String>,
        condition: impl Fn(&ActionRequest) -> bool + 'static,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            condition: Some(Rc::new(condition)),
        }
    }

    /// Forbid `action_type` outright.
    pub fn always(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            condition: None,
        }
    }

    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Does this restriction forbid `request`?
    #[must_use]
    pub fn forbids(&self, request: &ActionRequest) -> bool {
        request.action_type == self.action_type
            && self.condition.as_ref().map_or(true, |condition| condition(request))
    }
}

impl fmt::Debug for CannotRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CannotRestriction")
            .field("action_type", &self.action_type)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// Is `request` forbidden by any of `restrictions`?
pub fn is_forbidden<'a>(
    restrictions: impl IntoIterator<Item = &'a CannotRestriction>,
    request: &ActionRequest,
) -> bool {
    restrictions.into_iter().any(|r| r.forbids(request))
}
