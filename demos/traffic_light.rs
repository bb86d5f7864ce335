//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine driven entirely by events.
//!
//! Key concepts:
//! - Event handlers requesting transitions through their own state
//! - Entry callbacks receiving a payload
//! - Reading back the transition history
//!
//! Run with: cargo run --example traffic_light

use stance::{FsmError, HandlerResult, MachineConfig, State, StateMachine};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Signal {
    Timer,
    Emergency,
}

type Light = State<Signal, &'static str>;

struct Lights {
    red: Light,
    yellow: Light,
    green: Light,
}

fn lights(slot: &OnceLock<Lights>) -> Result<&Lights, FsmError> {
    slot.get().ok_or_else(|| FsmError::handler("lights not installed"))
}

fn main() -> Result<(), FsmError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let fsm: StateMachine<Signal, &'static str> =
        StateMachine::with_config(MachineConfig::default().with_label("traffic"));
    let slot: Arc<OnceLock<Lights>> = Arc::default();

    let announce = |state: &Light, reason: Option<&'static str>| -> HandlerResult {
        println!("  {:<6} ({})", state.name(), reason.unwrap_or("start"));
        Ok(())
    };

    let red = fsm
        .state_builder("Red")
        .on_entry(announce)
        .on_event({
            let slot = slot.clone();
            move |state, signal| match signal {
                Signal::Timer => state.transition_to_with(&lights(&slot)?.green, "timer"),
                Signal::Emergency => Ok(()),
            }
        })
        .build()?;

    let green = fsm
        .state_builder("Green")
        .on_entry(announce)
        .on_event({
            let slot = slot.clone();
            move |state, signal| {
                let lights = lights(&slot)?;
                match signal {
                    Signal::Timer => state.transition_to_with(&lights.yellow, "timer"),
                    Signal::Emergency => state.transition_to_with(&lights.red, "emergency"),
                }
            }
        })
        .build()?;

    let yellow = fsm
        .state_builder("Yellow")
        .on_entry(announce)
        .on_event({
            let slot = slot.clone();
            move |state, _| state.transition_to_with(&lights(&slot)?.red, "timer")
        })
        .build()?;

    let _ = slot.set(Lights {
        red: red.clone(),
        yellow,
        green,
    });

    println!("Transition sequence:");
    fsm.start(&red)?;
    for signal in [
        Signal::Timer,
        Signal::Timer,
        Signal::Timer,
        Signal::Timer,
        Signal::Emergency,
        Signal::Emergency,
    ] {
        fsm.post_event(signal)?;
    }

    println!("\nPath: {}", fsm.history().path().join(" -> "));
    println!("\n=== Example Complete ===");
    Ok(())
}
