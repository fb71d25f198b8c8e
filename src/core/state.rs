//! State and Event traits for rule-table state machines.
//!
//! States and events are used as hash keys in the compiled transition
//! table, so both traits require value equality and hashing. A type that
//! compares by identity cannot satisfy these bounds.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe the current position in a state machine.
///
/// # Required Traits
///
/// - `Clone`: States are copied into every table row that mentions them
/// - `Eq` + `Hash`: States are part of the table key
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States appear in the serializable history
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Broken,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Broken => "Broken",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Trait for events that drive a state machine.
///
/// Events may carry data, but that data takes part in equality: two
/// events only select the same row when they compare equal.
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
