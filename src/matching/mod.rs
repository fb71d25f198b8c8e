//! Match descriptors and their resolution.
//!
//! A descriptor is a boolean expression over predicates. Descriptors
//! declared at nested scopes form a [`MatchChain`], which resolves into one
//! validated descriptor. A resolved descriptor expands into the concrete
//! predicate sets it accepts, each ranked by how specific it is.

mod chain;
mod descriptor;
mod error;

pub use chain::MatchChain;
pub use descriptor::{MatchDescriptor, MatchKey, RankedPredicates};
pub use error::{MatchError, MatchErrorKind};
