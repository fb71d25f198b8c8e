//! Per-machine configuration.

use serde::{Deserialize, Serialize};

/// How the transition table is built and searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStrategy {
    /// Expand every row against the full closed world of predicate values
    /// at build time. Dispatch is an exact lookup.
    #[default]
    Eager,
    /// Store each row under the predicate sets it names. Dispatch probes
    /// the supplied set and its subsets, largest first.
    Lazy,
}

/// When entry and exit actions run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionsPolicy {
    /// Only when the state actually changes.
    #[default]
    ExecuteOnChangeOnly,
    /// On self-transitions too.
    ExecuteAlways,
}

/// Configuration fixed when a machine is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    pub strategy: TableStrategy,
    pub actions_policy: ActionsPolicy,
}

impl FsmConfig {
    pub fn lazy() -> Self {
        FsmConfig {
            strategy: TableStrategy::Lazy,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: TableStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_actions_policy(mut self, actions_policy: ActionsPolicy) -> Self {
        self.actions_policy = actions_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_eager_and_change_only() {
        let config = FsmConfig::default();
        assert_eq!(config.strategy, TableStrategy::Eager);
        assert_eq!(config.actions_policy, ActionsPolicy::ExecuteOnChangeOnly);
    }

    #[test]
    fn config_serializes_to_snake_case() {
        let config = FsmConfig::lazy().with_actions_policy(ActionsPolicy::ExecuteAlways);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"strategy":"lazy","actions_policy":"execute_always"}"#
        );
        let parsed: FsmConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: FsmConfig = serde_json::from_str(r#"{"strategy":"lazy"}"#).unwrap();
        assert_eq!(parsed, FsmConfig::lazy());
    }
}
