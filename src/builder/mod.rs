//! Declaring a machine's rules.
//!
//! Rules are written per state with [`define`], as trees of [`Node`]s
//! built from the free functions in this module. Shared rules and
//! entry/exit actions live in [`SuperState`]s that defines adopt. The
//! macros implement the core traits for plain enums.

pub mod error;
mod define;
mod macros;
pub(crate) mod node;
mod superstate;

pub use define::{define, define_all, Define};
pub use error::{BuildError, BuildErrors, ImplicitClash, NodeKind, RowSummary};
pub use node::{
    actions, matching, matching_all, matching_any, matching_condition, matching_descriptor,
    overriding, then, when, when_any, Node,
};
pub use superstate::SuperState;
