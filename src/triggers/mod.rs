//! Host-side registries that effects register into.
//!
//! - [`ListenerRegistry`]: event listeners of granted reactions
//! - [`ConditionRegistry`]: delayed effects and terminal conditions
//!
//! Both follow the same contract: registration returns an identity,
//! removal by that identity is idempotent, and a removal that finds
//! nothing is not an error.

mod event;
mod pending;
mod registry;

pub use event::{events, EventTypeId};
pub use pending::{
    ConditionFactory, ConditionHandle, ConditionKind, ConditionProperties, ConditionRegistry,
    PendingCondition,
};
pub use registry::{Listener, ListenerRegistry};
