//! State declarations.

use super::node::Node;
use super::superstate::SuperState;
use crate::core::{Event, Origin, State};
use crate::effects::Action;
use crate::pipeline::OverrideGroup;

/// The rules of one or more states.
///
/// Every rule declared here is bound to each of the given states. Rows
/// from adopted superstates come before the define's own rows.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{define, matching, when};
/// use statecraft::{event_enum, predicate_enum, state_enum};
///
/// state_enum! {
///     enum Turnstile { Locked, Unlocked, Alarming }
/// }
/// event_enum! {
///     enum Input { Coin, Pass }
/// }
/// predicate_enum! {
///     enum Enforcement { Weak, Strong }
/// }
///
/// let locked = define(Turnstile::Locked).rules([
///     when(Input::Coin).then(Turnstile::Unlocked),
///     when(Input::Pass).block([
///         matching(Enforcement::Weak).then(Turnstile::Locked),
///         matching(Enforcement::Strong).then(Turnstile::Alarming),
///     ]),
/// ]);
/// # let _: statecraft::builder::Define<Turnstile, Input> = locked;
/// ```
pub struct Define<S, E, Env = ()> {
    pub(crate) states: Vec<S>,
    pub(crate) superstates: Vec<SuperState<S, E, Env>>,
    pub(crate) on_entry: Vec<Action<E, Env>>,
    pub(crate) on_exit: Vec<Action<E, Env>>,
    pub(crate) rules: Option<Vec<Node<S, E, Env>>>,
    pub(crate) group: OverrideGroup,
    pub(crate) origin: Origin,
}

/// Declare rules for a single state.
#[track_caller]
pub fn define<S: State, E: Event, Env>(state: S) -> Define<S, E, Env> {
    Define::new(vec![state], Origin::here())
}

/// Declare the same rules for several states.
#[track_caller]
pub fn define_all<S, E, Env, I>(states: I) -> Define<S, E, Env>
where
    S: State,
    E: Event,
    I: IntoIterator<Item = S>,
{
    Define::new(states.into_iter().collect(), Origin::here())
}

impl<S: State, E: Event, Env> Define<S, E, Env> {
    fn new(states: Vec<S>, origin: Origin) -> Self {
        Define {
            states,
            superstates: Vec::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
            rules: None,
            group: OverrideGroup::new(),
            origin,
        }
    }

    pub fn adopts<'a, I>(mut self, superstates: I) -> Self
    where
        I: IntoIterator<Item = &'a SuperState<S, E, Env>>,
        Env: 'a,
    {
        self.superstates.extend(superstates.into_iter().cloned());
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

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Entry actions from adopted superstates, parent first, then the
    /// define's own.
    pub fn entry_actions(&self) -> Vec<Action<E, Env>> {
        self.superstates
            .iter()
            .flat_map(SuperState::entry_actions)
            .chain(self.on_entry.iter().cloned())
            .collect()
    }

    pub fn exit_actions(&self) -> Vec<Action<E, Env>> {
        self.superstates
            .iter()
            .flat_map(SuperState::exit_actions)
            .chain(self.on_exit.iter().cloned())
            .collect()
    }
}
