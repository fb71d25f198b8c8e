//! Actions run when a transition fires.

use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use thiserror::Error;

/// Failure reported by an effectful action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        ActionError {
            message: message.into(),
        }
    }
}

/// Type alias for effect factories.
/// These functions create a fresh effect on each invocation.
pub type EffectFactory<Env> = Arc<dyn Fn() -> BoxedEffect<(), ActionError, Env> + Send + Sync>;

/// Type alias for effect factories that receive the triggering event.
pub type EventEffectFactory<E, Env> =
    Arc<dyn Fn(&E) -> BoxedEffect<(), ActionError, Env> + Send + Sync>;

/// Something to do when a transition fires.
///
/// Plain actions run anywhere. Effect actions build a stillwater effect
/// that is run against the environment passed to
/// [`Fsm::handle_event_async`](crate::effects::Fsm::handle_event_async);
/// blocking dispatch refuses them.
pub enum Action<E, Env = ()> {
    Sync(Arc<dyn Fn() + Send + Sync>),
    SyncWithEvent(Arc<dyn Fn(&E) + Send + Sync>),
    Effect(EffectFactory<Env>),
    EffectWithEvent(EventEffectFactory<E, Env>),
}

impl<E, Env> Action<E, Env> {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action::Sync(Arc::new(action))
    }

    pub fn with_event<F>(action: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        Action::SyncWithEvent(Arc::new(action))
    }

    pub fn effect<F>(factory: F) -> Self
    where
        F: Fn() -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        Action::Effect(Arc::new(factory))
    }

    pub fn effect_with_event<F>(factory: F) -> Self
    where
        F: Fn(&E) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        Action::EffectWithEvent(Arc::new(factory))
    }

    /// True when the action can only run under async dispatch.
    pub fn is_async(&self) -> bool {
        matches!(self, Action::Effect(_) | Action::EffectWithEvent(_))
    }

    /// Run a plain action. Returns `false` without doing anything when the
    /// action is an effect.
    pub(crate) fn run_blocking(&self, event: &E) -> bool {
        match self {
            Action::Sync(action) => action(),
            Action::SyncWithEvent(action) => action(event),
            Action::Effect(_) | Action::EffectWithEvent(_) => return false,
        }
        true
    }
}

impl<E, Env> Action<E, Env>
where
    Env: Clone + Send + Sync + 'static,
{
    /// Run any kind of action, awaiting effects against `env`.
    pub(crate) async fn run(&self, event: &E, env: &Env) -> Result<(), ActionError> {
        match self {
            Action::Sync(action) => {
                action();
                Ok(())
            }
            Action::SyncWithEvent(action) => {
                action(event);
                Ok(())
            }
            Action::Effect(factory) => factory().run(env).await,
            Action::EffectWithEvent(factory) => factory(event).run(env).await,
        }
    }
}

impl<E, Env> Clone for Action<E, Env> {
    fn clone(&self) -> Self {
        match self {
            Action::Sync(action) => Action::Sync(Arc::clone(action)),
            Action::SyncWithEvent(action) => Action::SyncWithEvent(Arc::clone(action)),
            Action::Effect(factory) => Action::Effect(Arc::clone(factory)),
            Action::EffectWithEvent(factory) => Action::EffectWithEvent(Arc::clone(factory)),
        }
    }
}

impl<E, Env> fmt::Debug for Action<E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Sync(_) => "Action::Sync",
            Action::SyncWithEvent(_) => "Action::SyncWithEvent",
            Action::Effect(_) => "Action::Effect",
            Action::EffectWithEvent(_) => "Action::EffectWithEvent",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct TestEnv {
        healthy: bool,
    }

    fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn blocking_run_calls_plain_actions() {
        let calls = log();
        let sink = Arc::clone(&calls);
        let plain: Action<u8> = Action::new(move || sink.lock().unwrap().push("plain".into()));
        let sink = Arc::clone(&calls);
        let with_event: Action<u8> =
            Action::with_event(move |e: &u8| sink.lock().unwrap().push(format!("event {e}")));

        assert!(plain.run_blocking(&7));
        assert!(with_event.run_blocking(&7));
        assert_eq!(*calls.lock().unwrap(), vec!["plain", "event 7"]);
    }

    #[test]
    fn blocking_run_refuses_effects() {
        let effect: Action<u8> = Action::effect(|| pure(()).boxed());
        assert!(effect.is_async());
        assert!(!effect.run_blocking(&0));
        assert!(!Action::<u8>::new(|| {}).is_async());
    }

    #[tokio::test]
    async fn effect_runs_against_environment() {
        let effect: Action<u8, TestEnv> = Action::effect(|| {
            from_fn(|env: &TestEnv| {
                if env.healthy {
                    Ok(())
                } else {
                    Err(ActionError::new("environment unavailable"))
                }
            })
            .boxed()
        });

        assert!(effect.run(&0, &TestEnv { healthy: true }).await.is_ok());
        let error = effect
            .run(&0, &TestEnv { healthy: false })
            .await
            .unwrap_err();
        assert_eq!(error.message, "environment unavailable");
    }

    #[tokio::test]
    async fn effect_with_event_sees_event() {
        let effect: Action<u8, TestEnv> = Action::effect_with_event(|e: &u8| {
            if *e > 3 {
                fail(ActionError::new("too large")).boxed()
            } else {
                pure(()).boxed()
            }
        });
        let env = TestEnv { healthy: true };

        assert!(effect.run(&2, &env).await.is_ok());
        assert!(effect.run(&9, &env).await.is_err());
    }

    #[test]
    fn debug_names_variant() {
        let action: Action<u8> = Action::new(|| {});
        assert_eq!(format!("{action:?}"), "Action::Sync");
    }
}
