//! Turnstile State Machine
//!
//! This example declares a coin-operated turnstile with an alarm.
//!
//! Key concepts:
//! - Per-state rules with `define`
//! - A superstate sharing the reset rule
//! - Entry and exit actions
//! - Predicates choosing between transitions
//!
//! Run with: cargo run --example turnstile

use statecraft::prelude::*;
use statecraft::{event_enum, predicate_enum, state_enum};

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

fn say(word: &'static str) -> Action<Input> {
    Action::new(move || println!("  -> {word}"))
}

fn main() {
    println!("=== Turnstile State Machine ===\n");

    let resettable = SuperState::new().rules([when(Input::Reset).then(Turnstile::Locked)]);

    let mut fsm: Fsm<Turnstile, Input> = Fsm::new(Turnstile::Locked);
    let built = fsm.build_table(vec![
        define(Turnstile::Locked)
            .adopts([&resettable])
            .on_entry([say("lock")])
            .rules([
                when(Input::Coin).then(Turnstile::Unlocked),
                when(Input::Pass).block([
                    matching(Enforcement::Weak).then(Turnstile::Locked),
                    matching(Enforcement::Strong).then(Turnstile::Alarming),
                ]),
            ]),
        define(Turnstile::Unlocked)
            .adopts([&resettable])
            .on_entry([say("unlock")])
            .rules([
                when(Input::Coin).actions([say("thankyou")]),
                when(Input::Pass).then(Turnstile::Locked),
            ]),
        define(Turnstile::Alarming)
            .adopts([&resettable])
            .on_entry([say("alarmOn")])
            .on_exit([say("alarmOff")]),
    ]);
    if let Err(errors) = built {
        eprintln!("Build failed:\n{errors}");
        return;
    }

    println!("Table built with {} entries", fsm.table().map_or(0, |t| t.len()));
    println!("Initial state: {:?}\n", fsm.state());

    let script = [
        (Input::Coin, Enforcement::Weak),
        (Input::Pass, Enforcement::Weak),
        (Input::Pass, Enforcement::Weak),
        (Input::Pass, Enforcement::Strong),
        (Input::Reset, Enforcement::Strong),
        (Input::Coin, Enforcement::Strong),
        (Input::Coin, Enforcement::Strong),
    ];

    for (input, enforcement) in script {
        println!("{input:?} ({enforcement:?}):");
        match fsm.handle_event(input, [enforcement.erase()]) {
            Ok(DispatchOutcome::Executed { from, to }) => println!("  {from:?} -> {to:?}"),
            Ok(outcome) => println!("  {outcome:?}"),
            Err(error) => println!("  error: {error}"),
        }
    }

    println!("\nFinal state: {:?}", fsm.state());
    let path: Vec<_> = fsm.history().get_path().into_iter().map(|s| s.name()).collect();
    println!("Path: {}", path.join(" -> "));
}
