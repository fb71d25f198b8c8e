//! Statecraft: a rule-table state machine compiler.
//!
//! Rules are declared per state as small trees of `matching` / `when` /
//! `then` / `actions` nodes. Building the machine folds those trees into
//! flat rows, checks them all at once, and resolves them into an
//! immutable table keyed by `(state, predicates, event)`. Dispatch is a
//! table lookup followed by the transition's actions.
//!
//! # Core Concepts
//!
//! - **State / Event**: plain enums implementing the traits in [`core`]
//! - **Predicates**: external condition axes with a closed set of values
//! - **Superstates**: shared rules and entry/exit actions that states adopt
//! - **Overrides**: rows that deliberately replace earlier ones
//! - **Strategies**: eager tables cover the closed world at build time,
//!   lazy tables probe subsets of the supplied predicates at dispatch
//!
//! # Example
//!
//! ```rust
//! use statecraft::prelude::*;
//! use statecraft::{event_enum, state_enum};
//! use std::sync::{Arc, Mutex};
//!
//! state_enum! {
//!     enum Turnstile { Locked, Unlocked, Alarming }
//! }
//! event_enum! {
//!     enum Input { Coin, Pass, Reset }
//! }
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let say = |word: &'static str| {
//!     let log = Arc::clone(&log);
//!     Action::new(move || log.lock().unwrap().push(word))
//! };
//!
//! let resettable = SuperState::new().rules([when(Input::Reset).then(Turnstile::Locked)]);
//!
//! let mut fsm: Fsm<Turnstile, Input> = Fsm::new(Turnstile::Locked);
//! fsm.build_table(vec![
//!     define(Turnstile::Locked)
//!         .adopts([&resettable])
//!         .on_entry([say("lock")])
//!         .rules([
//!             when(Input::Coin).then(Turnstile::Unlocked),
//!             when(Input::Pass).then(Turnstile::Alarming),
//!         ]),
//!     define(Turnstile::Unlocked)
//!         .adopts([&resettable])
//!         .on_entry([say("unlock")])
//!         .rules([
//!             when(Input::Coin).actions([say("thankyou")]),
//!             when(Input::Pass).then(Turnstile::Locked),
//!         ]),
//!     define(Turnstile::Alarming)
//!         .adopts([&resettable])
//!         .on_entry([say("alarmOn")])
//!         .on_exit([say("alarmOff")]),
//! ])
//! .unwrap();
//!
//! for input in [Input::Coin, Input::Pass, Input::Pass, Input::Reset] {
//!     fsm.fire(input).unwrap();
//! }
//!
//! assert_eq!(fsm.state(), &Turnstile::Locked);
//! assert_eq!(
//!     *log.lock().unwrap(),
//!     vec!["unlock", "lock", "alarmOn", "alarmOff", "lock"]
//! );
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod matching;
pub mod pipeline;
pub mod predicate;
pub mod table;
mod validation;

// Re-export commonly used types
pub use builder::{BuildError, BuildErrors, Define, SuperState};
pub use crate::core::{Event, State, StateHistory, StateTransition};
pub use effects::{Action, DispatchError, DispatchOutcome, Fsm, FsmConfig};
pub use predicate::{AnyPredicate, Predicate, PredicateSet};

/// Everything needed to declare and run a machine.
pub mod prelude {
    pub use crate::builder::{
        actions, define, define_all, matching, matching_all, matching_any, matching_condition,
        matching_descriptor, overriding, then, when, when_any, BuildError, BuildErrors, Define,
        SuperState,
    };
    pub use crate::core::{Event, State};
    pub use crate::effects::{
        Action, ActionError, ActionsPolicy, DispatchError, DispatchOutcome, Fsm, FsmConfig,
        TableStrategy,
    };
    pub use crate::matching::MatchDescriptor;
    pub use crate::predicate::{AnyPredicate, Predicate, PredicateSet};
}
