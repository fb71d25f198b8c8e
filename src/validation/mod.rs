//! Validation of folded rows.
//!
//! Uses Stillwater's `Validation` type to accumulate ALL build errors
//! instead of stopping at the first one: a single build reports every
//! duplicate, clash and misplaced override.
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::{define, when, BuildError};
//! use statecraft::effects::Fsm;
//! use statecraft::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum Door { Open, Closed }
//! }
//! event_enum! {
//!     enum Push { Hard }
//! }
//!
//! let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
//! let errors = fsm
//!     .build_table(vec![define(Door::Closed).rules([
//!         when(Push::Hard).then(Door::Open),
//!         when(Push::Hard).then(Door::Closed),
//!     ])])
//!     .unwrap_err();
//!
//! assert!(matches!(errors.errors()[0], BuildError::Clashes { .. }));
//! ```

mod rules;

pub(crate) use rules::validate_rows;

use crate::builder::error::BuildError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of a build stage: a value, or every error the stage found.
pub(crate) type Checked<T> = Validation<T, NonEmptyVec<BuildError>>;

/// Succeeds when `errors` is empty.
pub(crate) fn checked(errors: Vec<BuildError>) -> Checked<()> {
    let checks: Vec<Checked<()>> = errors.into_iter().map(Validation::fail).collect();
    Validation::all_vec(checks).map(|_| ())
}

pub(crate) fn collect<T>(validation: Checked<T>) -> Result<T, Vec<BuildError>> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}
