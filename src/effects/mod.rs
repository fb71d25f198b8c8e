//! The runtime side: actions, compiled transitions and the dispatcher.
//!
//! Plain actions are closures; effectful actions are Stillwater effects
//! built fresh on every run and executed against the environment handed
//! to [`Fsm::handle_event_async`].

mod action;
mod config;
mod machine;
mod observer;
mod transition;

pub use action::{Action, ActionError, EffectFactory, EventEffectFactory};
pub use config::{ActionsPolicy, FsmConfig, TableStrategy};
pub use machine::{DispatchOutcome, Fsm};
pub use observer::{DispatchObserver, SilentObserver, TracingObserver};
pub use transition::{DispatchError, Transition};
