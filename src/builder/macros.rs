//! Macros that implement the core traits for plain enums.

/// Generate a State trait implementation for a simple enum.
///
/// # Example
///
/// ```
/// use statecraft::state_enum;
///
/// state_enum! {
///     pub enum WorkflowState {
///         Start,
///         Processing,
///         Done,
///         Failed,
///     }
///     final: [Done, Failed]
///     error: [Failed]
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate an Event trait implementation for a simple enum.
///
/// # Example
///
/// ```
/// use statecraft::core::Event;
/// use statecraft::event_enum;
///
/// event_enum! {
///     pub enum TurnstileEvent {
///         Coin,
///         Pass,
///     }
/// }
///
/// assert_eq!(TurnstileEvent::Coin.name(), "Coin");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a Predicate trait implementation for a simple enum. Variants
/// are listed by `all_cases` in declaration order.
///
/// # Example
///
/// ```
/// use statecraft::predicate::Predicate;
/// use statecraft::predicate_enum;
///
/// predicate_enum! {
///     pub enum Enforcement {
///         Weak,
///         Strong,
///     }
/// }
///
/// assert_eq!(Enforcement::all_cases(), vec![Enforcement::Weak, Enforcement::Strong]);
/// ```
#[macro_export]
macro_rules! predicate_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::predicate::Predicate for $name {
            fn all_cases() -> Vec<Self> {
                vec![$(Self::$variant),*]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};
    use crate::predicate::Predicate;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Failed,
        }
        final: [Complete, Failed]
        error: [Failed]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Initial;
        assert_eq!(state.name(), "Initial");
        assert!(!state.is_final());
        assert!(!state.is_error());

        let complete = TestState::Complete;
        assert!(complete.is_final());
        assert!(!complete.is_error());

        let failed = TestState::Failed;
        assert!(failed.is_final());
        assert!(failed.is_error());
        assert_ne!(TestState::Processing, TestState::Initial);
    }

    #[test]
    fn state_enum_works_without_final_error() {
        state_enum! {
            pub enum MinimalState {
                One,
                Two,
            }
        }

        let state = MinimalState::One;
        assert!(!state.is_final());
        assert!(!state.is_error());
        assert_eq!(MinimalState::Two.name(), "Two");
    }

    #[test]
    fn event_enum_names_variants() {
        event_enum! {
            enum Signal {
                Start,
                Stop,
            }
        }

        assert_eq!(Signal::Start.name(), "Start");
        assert_eq!(Signal::Stop.name(), "Stop");
    }

    #[test]
    fn predicate_enum_lists_cases_in_order() {
        predicate_enum! {
            enum Light {
                Red,
                Amber,
                Green,
            }
        }

        assert_eq!(
            Light::all_cases(),
            vec![Light::Red, Light::Amber, Light::Green]
        );
        assert_eq!(Light::Amber.erase().to_string(), "Light.Amber");
    }
}
