//! Folding declarations into flat candidate rows.
//!
//! Every `define` is folded leaves first: match scopes are chained onto
//! the rows below them, events multiply rows, `then` fills the next state
//! and actions are prepended. Superstate rows come before the define's own
//! rows, and each declaration stamps its rows with its override group.

mod fold;
mod row;

pub use row::OverrideGroup;

pub(crate) use fold::fold_all;
pub(crate) use row::{Row, RuleKey};
