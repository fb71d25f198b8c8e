//! End-to-end tests: declaring, building and driving a turnstile.

use statecraft::builder::{
    define, define_all, matching, matching_any, overriding, when, when_any, BuildError, Define,
    SuperState,
};
use statecraft::effects::{
    Action, ActionError, DispatchError, DispatchOutcome, Fsm, FsmConfig, SilentObserver,
};
use statecraft::predicate::Predicate;
use statecraft::{event_enum, predicate_enum, state_enum};
use std::sync::{Arc, Mutex};
use stillwater::prelude::*;

state_enum! {
    enum Turnstile {
        Locked,
        Unlocked,
        Alarming,
    }
}

event_enum! {
    enum Input {
        Coin,
        Pass,
        Reset,
    }
}

predicate_enum! {
    enum Enforcement {
        Weak,
        Strong,
    }
}

predicate_enum! {
    enum Shift {
        Day,
        Night,
    }
}

type Log = Arc<Mutex<Vec<&'static str>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn say<Env>(log: &Log, word: &'static str) -> Action<Input, Env> {
    let log = Arc::clone(log);
    Action::new(move || log.lock().unwrap().push(word))
}

fn turnstile(log: &Log) -> Vec<Define<Turnstile, Input>> {
    let resettable = SuperState::new().rules([when(Input::Reset).then(Turnstile::Locked)]);
    vec![
        define(Turnstile::Locked)
            .adopts([&resettable])
            .on_entry([say(log, "lock")])
            .rules([
                when(Input::Coin).then(Turnstile::Unlocked),
                when(Input::Pass).then(Turnstile::Alarming),
            ]),
        define(Turnstile::Unlocked)
            .adopts([&resettable])
            .on_entry([say(log, "unlock")])
            .rules([
                when(Input::Coin).actions([say(log, "thankyou")]),
                when(Input::Pass).then(Turnstile::Locked),
            ]),
        define(Turnstile::Alarming)
            .adopts([&resettable])
            .on_entry([say(log, "alarmOn")])
            .on_exit([say(log, "alarmOff")]),
    ]
}

fn built(defines: Vec<Define<Turnstile, Input>>, config: FsmConfig) -> Fsm<Turnstile, Input> {
    let mut fsm = Fsm::with_config(Turnstile::Locked, config).with_observer(SilentObserver);
    if let Err(errors) = fsm.build_table(defines) {
        panic!("build failed: {errors}");
    }
    fsm
}

fn build_errors(defines: Vec<Define<Turnstile, Input>>) -> Vec<BuildError> {
    let mut fsm: Fsm<Turnstile, Input> = Fsm::new(Turnstile::Locked);
    fsm.build_table(defines).unwrap_err().into_vec()
}

#[test]
fn turnstile_runs_actions_in_order() {
    let log = new_log();
    let mut fsm = built(turnstile(&log), FsmConfig::default());

    for input in [
        Input::Coin,
        Input::Pass,
        Input::Pass,
        Input::Reset,
        Input::Coin,
        Input::Coin,
    ] {
        assert!(fsm.fire(input).unwrap().is_executed());
    }

    assert_eq!(
        *log.lock().unwrap(),
        vec!["unlock", "lock", "alarmOn", "alarmOff", "lock", "unlock", "thankyou"]
    );
    assert_eq!(fsm.state(), &Turnstile::Unlocked);
    assert_eq!(fsm.history().transitions().len(), 6);
}

#[test]
fn lazy_turnstile_behaves_like_eager() {
    let eager_log = new_log();
    let lazy_log = new_log();
    let mut eager = built(turnstile(&eager_log), FsmConfig::default());
    let mut lazy = built(turnstile(&lazy_log), FsmConfig::lazy());

    for input in [Input::Pass, Input::Reset, Input::Coin, Input::Pass] {
        assert_eq!(eager.fire(input), lazy.fire(input));
    }
    assert_eq!(*eager_log.lock().unwrap(), *lazy_log.lock().unwrap());
}

fn enforced() -> Vec<Define<Turnstile, Input>> {
    vec![define(Turnstile::Locked).rules([
        matching(Enforcement::Weak).when(Input::Pass).then(Turnstile::Locked),
        matching(Enforcement::Strong).when(Input::Pass).then(Turnstile::Alarming),
    ])]
}

#[test]
fn predicates_choose_the_next_state() {
    let mut weak = built(enforced(), FsmConfig::default());
    weak.handle_event(Input::Pass, [Enforcement::Weak.erase()])
        .unwrap();
    assert_eq!(weak.state(), &Turnstile::Locked);

    let mut strong = built(enforced(), FsmConfig::default());
    strong
        .handle_event(Input::Pass, [Enforcement::Strong.erase()])
        .unwrap();
    assert_eq!(strong.state(), &Turnstile::Alarming);
}

#[test]
fn lazy_without_predicates_or_fallback_finds_nothing() {
    let mut fsm = built(enforced(), FsmConfig::lazy());
    assert_eq!(fsm.fire(Input::Pass).unwrap(), DispatchOutcome::NotFound);
    assert_eq!(fsm.state(), &Turnstile::Locked);
}

#[test]
fn lazy_ignores_predicates_no_row_mentions() {
    let mut fsm = built(enforced(), FsmConfig::lazy());
    fsm.handle_event(Input::Pass, [Enforcement::Strong.erase(), Shift::Night.erase()])
        .unwrap();
    assert_eq!(fsm.state(), &Turnstile::Alarming);
}

#[test]
fn any_of_several_values_matches() {
    let mut fsm = built(
        vec![define(Turnstile::Locked).rules([matching_any([Shift::Day, Shift::Night])
            .when(Input::Coin)
            .then(Turnstile::Unlocked)])],
        FsmConfig::default(),
    );
    fsm.handle_event(Input::Coin, [Shift::Night.erase()]).unwrap();
    assert_eq!(fsm.state(), &Turnstile::Unlocked);
}

#[test]
fn shared_rules_bind_to_every_state() {
    let mut fsm = built(
        vec![define_all([Turnstile::Locked, Turnstile::Unlocked])
            .rules([when_any([Input::Pass, Input::Reset]).then(Turnstile::Alarming)])],
        FsmConfig::default(),
    );

    assert_eq!(fsm.table().map(|table| table.len()), Some(4));
    fsm.fire(Input::Reset).unwrap();
    assert_eq!(fsm.state(), &Turnstile::Alarming);
}

#[test]
fn override_replaces_superstate_rule() {
    let log = new_log();
    let resettable = SuperState::new().rules([when(Input::Reset).then(Turnstile::Locked)]);
    let mut fsm: Fsm<Turnstile, Input> =
        Fsm::new(Turnstile::Alarming).with_observer(SilentObserver);
    fsm.build_table(vec![define(Turnstile::Alarming)
        .adopts([&resettable])
        .rules([overriding([when(Input::Reset)
            .then(Turnstile::Unlocked)
            .actions([say(&log, "override")])])])])
        .unwrap();

    fsm.fire(Input::Reset).unwrap();
    assert_eq!(fsm.state(), &Turnstile::Unlocked);
    assert_eq!(*log.lock().unwrap(), vec!["override"]);
}

#[test]
fn nothing_to_override_is_reported() {
    let errors = build_errors(vec![define(Turnstile::Locked).rules([overriding([
        when(Input::Coin).then(Turnstile::Unlocked),
    ])])]);
    assert!(matches!(errors[0], BuildError::NothingToOverride { .. }));
}

#[test]
fn override_before_its_target_is_out_of_order() {
    let strict = SuperState::new().rules([overriding([when(Input::Pass).then(Turnstile::Alarming)])]);
    let errors = build_errors(vec![define(Turnstile::Locked)
        .adopts([&strict])
        .rules([when(Input::Pass).then(Turnstile::Locked)])]);
    assert!(errors
        .iter()
        .any(|error| matches!(error, BuildError::OverrideOutOfOrder { .. })));
}

#[test]
fn every_build_error_is_reported_at_once() {
    let errors = build_errors(vec![
        define(Turnstile::Locked).rules([
            when(Input::Coin).then(Turnstile::Unlocked),
            when(Input::Coin).then(Turnstile::Unlocked),
        ]),
        define(Turnstile::Unlocked).rules([
            when(Input::Pass).then(Turnstile::Locked),
            when(Input::Pass).then(Turnstile::Alarming),
        ]),
    ]);

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], BuildError::Duplicates { .. }));
    assert!(matches!(errors[1], BuildError::Clashes { .. }));
}

#[test]
fn errors_point_at_the_declaration() {
    let errors = build_errors(vec![define(Turnstile::Locked).rules([when(Input::Coin).block([])])]);
    assert!(matches!(errors[0], BuildError::EmptyBuilder { .. }));
    assert!(errors[0].to_string().contains("turnstile.rs"));
}

#[test]
fn conflicting_matches_are_rejected() {
    let errors = build_errors(vec![define(Turnstile::Locked).rules([matching(Enforcement::Weak)
        .block([matching(Enforcement::Strong).when(Input::Pass).then(Turnstile::Alarming)])])]);
    assert!(matches!(errors[0], BuildError::Match(_)));
}

#[test]
fn nothing_declared_is_an_empty_table() {
    assert_eq!(build_errors(Vec::new()), vec![BuildError::EmptyTable]);
}

#[test]
fn history_serializes() {
    let log = new_log();
    let mut fsm = built(turnstile(&log), FsmConfig::default());
    fsm.fire(Input::Coin).unwrap();
    fsm.fire(Input::Pass).unwrap();

    let json = serde_json::to_string(fsm.history()).unwrap();
    assert!(json.contains("\"Unlocked\""));
    assert_eq!(fsm.history().events(), vec!["Coin", "Pass"]);
}

#[derive(Clone)]
struct CoinBox {
    coins: Arc<Mutex<u32>>,
    jammed: bool,
}

fn coin_box_machine() -> Fsm<Turnstile, Input, CoinBox> {
    let collect = Action::effect_with_event(|input: &Input| {
        let counted = *input == Input::Coin;
        from_fn(move |env: &CoinBox| {
            if env.jammed {
                return Err(ActionError::new("coin box jammed"));
            }
            if counted {
                *env.coins.lock().unwrap() += 1;
            }
            Ok(())
        })
        .boxed()
    });

    let mut fsm = Fsm::new(Turnstile::Locked).with_observer(SilentObserver);
    fsm.build_table(vec![
        define(Turnstile::Locked).rules([when(Input::Coin)
            .then(Turnstile::Unlocked)
            .actions([collect.clone()])]),
        define(Turnstile::Unlocked).rules([
            when(Input::Coin).actions([collect]),
            when(Input::Pass).then(Turnstile::Locked),
        ]),
    ])
    .unwrap();
    fsm
}

#[tokio::test]
async fn effects_run_against_the_environment() {
    let env = CoinBox {
        coins: Arc::new(Mutex::new(0)),
        jammed: false,
    };
    let mut fsm = coin_box_machine();

    for input in [Input::Coin, Input::Coin, Input::Pass] {
        fsm.fire_async(input, &env).await.unwrap();
    }

    assert_eq!(*env.coins.lock().unwrap(), 2);
    assert_eq!(fsm.state(), &Turnstile::Locked);
}

#[tokio::test]
async fn failing_effect_surfaces_as_action_failure() {
    let env = CoinBox {
        coins: Arc::new(Mutex::new(0)),
        jammed: true,
    };
    let mut fsm = coin_box_machine();

    let error = fsm.fire_async(Input::Coin, &env).await.unwrap_err();
    match error {
        DispatchError::ActionFailed { from, to, source } => {
            assert_eq!(from, "Locked");
            assert_eq!(to, "Unlocked");
            assert_eq!(source.message, "coin box jammed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn blocking_dispatch_refuses_effects() {
    let mut fsm = coin_box_machine();
    assert!(matches!(
        fsm.fire(Input::Coin),
        Err(DispatchError::AsyncActionInSyncContext { .. })
    ));
    assert_eq!(fsm.state(), &Turnstile::Locked);
}
