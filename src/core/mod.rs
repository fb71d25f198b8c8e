//! Core state machine types.
//!
//! This module contains the value types every other layer builds on:
//! - State and event definitions via the `State` and `Event` traits
//! - Runtime `Condition`s attached to match descriptors
//! - Source `Origin`s carried by declarations for diagnostics
//! - Immutable history of executed transitions

mod condition;
mod history;
mod origin;
mod state;

pub use condition::Condition;
pub use history::{StateHistory, StateTransition};
pub use origin::Origin;
pub(crate) use origin::join_origins;
pub use state::{Event, State};
