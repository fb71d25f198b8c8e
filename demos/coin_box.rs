//! Effectful Turnstile
//!
//! This example runs transition actions as Stillwater effects against an
//! environment holding the coin box.
//!
//! Key concepts:
//! - Effect actions built fresh for every transition
//! - Async dispatch with `handle_event_async`
//! - Effect failures surfacing as `DispatchError::ActionFailed`
//!
//! Run with: cargo run --example coin_box

use statecraft::builder::{define, when};
use statecraft::effects::{Action, ActionError, Fsm};
use statecraft::{event_enum, state_enum};
use std::sync::{Arc, Mutex};
use stillwater::prelude::*;

state_enum! {
    enum Turnstile {
        Locked,
        Unlocked,
    }
}

event_enum! {
    enum Input {
        Coin,
        Pass,
    }
}

#[derive(Clone)]
struct CoinBox {
    coins: Arc<Mutex<u32>>,
    capacity: u32,
}

fn collect_coin() -> Action<Input, CoinBox> {
    Action::effect(|| {
        from_fn(|env: &CoinBox| {
            let Ok(mut coins) = env.coins.lock() else {
                return Err(ActionError::new("coin box poisoned"));
            };
            if *coins >= env.capacity {
                return Err(ActionError::new("coin box full"));
            }
            *coins += 1;
            Ok(())
        })
        .boxed()
    })
}

#[tokio::main]
async fn main() {
    println!("=== Effectful Turnstile ===\n");

    let mut fsm: Fsm<Turnstile, Input, CoinBox> = Fsm::new(Turnstile::Locked);
    let built = fsm.build_table(vec![
        define(Turnstile::Locked).rules([when(Input::Coin)
            .then(Turnstile::Unlocked)
            .actions([collect_coin()])]),
        define(Turnstile::Unlocked).rules([
            when(Input::Coin).actions([collect_coin()]),
            when(Input::Pass).then(Turnstile::Locked),
        ]),
    ]);
    if let Err(errors) = built {
        eprintln!("Build failed:\n{errors}");
        return;
    }

    let env = CoinBox {
        coins: Arc::new(Mutex::new(0)),
        capacity: 2,
    };

    for input in [Input::Coin, Input::Pass, Input::Coin, Input::Coin] {
        match fsm.fire_async(input, &env).await {
            Ok(outcome) => println!("{input:?}: {outcome:?}"),
            Err(error) => println!("{input:?}: {error}"),
        }
    }

    // Blocking dispatch refuses effect actions before touching the state.
    if let Err(error) = fsm.fire(Input::Coin) {
        println!("\nBlocking dispatch: {error}");
    }

    let coins = env.coins.lock().map(|c| *c).unwrap_or_default();
    println!("\nFinal state: {:?}, coins collected: {coins}", fsm.state());
}
