//! Reusable groups of rules.

use super::node::Node;
use crate::core::{Event, Origin, State};
use crate::effects::Action;
use crate::pipeline::OverrideGroup;

/// Rules and entry/exit actions shared by every state that adopts them.
///
/// A superstate does not bind its rules to a state; each `define` that
/// adopts it binds them to its own states. Superstates may adopt other
/// superstates, and the parent's rules and actions come first.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{define, when, SuperState};
/// use statecraft::{event_enum, state_enum};
///
/// state_enum! {
///     enum Turnstile { Locked, Unlocked }
/// }
/// event_enum! {
///     enum Input { Coin, Reset }
/// }
///
/// let resettable: SuperState<Turnstile, Input> =
///     SuperState::new().rules([when(Input::Reset).then(Turnstile::Locked)]);
///
/// let unlocked = define(Turnstile::Unlocked).adopts([&resettable]);
/// # let _ = unlocked;
/// ```
pub struct SuperState<S, E, Env = ()> {
    pub(crate) adopted: Vec<SuperState<S, E, Env>>,
    pub(crate) on_entry: Vec<Action<E, Env>>,
    pub(crate) on_exit: Vec<Action<E, Env>>,
    pub(crate) rules: Option<Vec<Node<S, E, Env>>>,
    pub(crate) group: OverrideGroup,
    pub(crate) origin: Origin,
}

impl<S: State, E: Event, Env> SuperState<S, E, Env> {
    #[track_caller]
    pub fn new() -> Self {
        SuperState {
            adopted: Vec::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
            rules: None,
            group: OverrideGroup::new(),
            origin: Origin::here(),
        }
    }

    pub fn adopts<'a, I>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = &'a SuperState<S, E, Env>>,
        Env: 'a,
    {
        self.adopted.extend(parents.into_iter().cloned());
        self
    }

    pub fn on_entry<I: IntoIterator<Item = Action<E, Env>>>(mut self, actions: I) -> Self {
        self.on_entry.extend(actions);
        self
    }

    pub fn on_exit<I: IntoIterator<Item = Action<E, Env>>>(mut self, actions: I) -> Self {
        self.on_exit.extend(actions);
        self
    }

    pub fn rules<I: IntoIterator<Item = Node<S, E, Env>>>(mut self, rules: I) -> Self {
        self.rules.get_or_insert_with(Vec::new).extend(rules);
        self
    }

    /// Entry actions of every adopted superstate, parent first, then this
    /// superstate's own.
    pub fn entry_actions(&self) -> Vec<Action<E, Env>> {
        self.adopted
            .iter()
            .flat_map(SuperState::entry_actions)
            .chain(self.on_entry.iter().cloned())
            .collect()
    }

    /// Exit actions, in the same order as [`SuperState::entry_actions`].
    pub fn exit_actions(&self) -> Vec<Action<E, Env>> {
        self.adopted
            .iter()
            .flat_map(SuperState::exit_actions)
            .chain(self.on_exit.iter().cloned())
            .collect()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

impl<S: State, E: Event, Env> Default for SuperState<S, E, Env> {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone, E: Clone, Env> Clone for SuperState<S, E, Env> {
    fn clone(&self) -> Self {
        SuperState {
            adopted: self.adopted.clone(),
            on_entry: self.on_entry.clone(),
            on_exit: self.on_exit.clone(),
            rules: self.rules.clone(),
            group: self.group,
            origin: self.origin,
        }
    }
}
