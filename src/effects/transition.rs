//! Compiled transitions and dispatch errors.

use super::action::{Action, ActionError};
use crate::core::{Condition, Event, Origin, State};
use crate::predicate::PredicateSet;
use std::fmt;

/// Errors that can occur while dispatching an event.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("Transition table has not been built")]
    TableNotBuilt,

    #[error("Transition from '{from}' on '{event}' has effect actions. Use handle_event_async")]
    AsyncActionInSyncContext { from: String, event: String },

    #[error("Action failed during transition from '{from}' to '{to}': {source}")]
    ActionFailed {
        from: String,
        to: String,
        #[source]
        source: ActionError,
    },
}

/// One entry of a built table: where the machine goes for a state,
/// predicate set and event.
///
/// `actions` already holds the row's own actions followed by the exit
/// actions of `state` and the entry actions of `next_state` when the
/// actions policy calls for them.
pub struct Transition<S, E, Env = ()> {
    pub state: S,
    pub predicates: PredicateSet,
    pub event: E,
    pub next_state: S,
    pub actions: Vec<Action<E, Env>>,
    pub condition: Option<Condition>,
    /// Where the deciding `when` was declared.
    pub origin: Origin,
}

impl<S: State, E: Event, Env> Transition<S, E, Env> {
    /// Check the runtime condition, if any.
    pub fn can_execute(&self) -> bool {
        self.condition.as_ref().is_none_or(Condition::check)
    }

    /// Whether any action needs async dispatch.
    pub fn is_async(&self) -> bool {
        self.actions.iter().any(Action::is_async)
    }

    pub fn changes_state(&self) -> bool {
        self.state != self.next_state
    }
}

impl<S: Clone, E: Clone, Env> Clone for Transition<S, E, Env> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            predicates: self.predicates.clone(),
            event: self.event.clone(),
            next_state: self.next_state.clone(),
            actions: self.actions.clone(),
            condition: self.condition.clone(),
            origin: self.origin,
        }
    }
}

impl<S: State, E: Event, Env> fmt::Debug for Transition<S, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("state", &self.state)
            .field("predicates", &self.predicates)
            .field("event", &self.event)
            .field("next_state", &self.next_state)
            .field("actions", &self.actions.len())
            .field("conditional", &self.condition.is_some())
            .field("origin", &self.origin)
            .finish()
    }
}
