//! Elevator
//!
//! This example models an elevator with three states:
//! - `open`: stationary with the doors open
//! - `closed`: stationary with the doors closed
//! - `moving`: travelling towards a requested level
//!
//! Door and travel delays are scheduled by the application with tokio timers;
//! when a timer fires it asks the machine for the next transition.
//!
//! Run with: cargo run --example elevator

use parking_lot::Mutex;
use stance::{FsmError, HandlerResult, MachineConfig, State, StateMachine};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

const TIME_PER_LEVEL: Duration = Duration::from_millis(300);
const DOOR_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
enum Request {
    GoToLevel(u32),
}

type Door = State<Request>;

struct Doors {
    open: Door,
    closed: Door,
    moving: Door,
}

/// Current level and the queue of pending levels.
#[derive(Default)]
struct Cabin {
    level: u32,
    queue: Vec<u32>,
}

impl Cabin {
    /// Schedule a level unless it is already queued.
    fn push_level(&mut self, level: u32) {
        if !self.queue.contains(&level) {
            self.queue.push(level);
        }
    }
}

struct Elevator {
    fsm: StateMachine<Request>,
    cabin: Arc<Mutex<Cabin>>,
}

fn doors(slot: &OnceLock<Doors>) -> Result<&Doors, FsmError> {
    slot.get().ok_or_else(|| FsmError::handler("doors not installed"))
}

/// Run `next` on `state` after `delay`, logging any failure.
fn after(delay: Duration, state: &Door, slot: &Arc<OnceLock<Doors>>, next: fn(&Doors) -> &Door) {
    let (state, slot) = (state.clone(), slot.clone());
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let result = doors(&slot).and_then(|doors| state.transition_to(next(doors)));
        if let Err(err) = result {
            warn!(state = state.name(), error = %err, "Delayed transition failed");
        }
    });
}

impl Elevator {
    fn new() -> Result<Self, FsmError> {
        let fsm: StateMachine<Request> =
            StateMachine::with_config(MachineConfig::default().with_label("elevator"));
        let cabin = Arc::new(Mutex::new(Cabin::default()));
        let slot: Arc<OnceLock<Doors>> = Arc::default();

        let open = fsm
            .state_builder("open")
            .on_entry({
                let (cabin, slot) = (cabin.clone(), slot.clone());
                move |state, _| {
                    println!("Door opened at level {}", cabin.lock().level);
                    after(DOOR_DELAY, state, &slot, |d| &d.closed);
                    Ok(())
                }
            })
            .on_event({
                let cabin = cabin.clone();
                move |_, request| {
                    let Request::GoToLevel(level) = *request;
                    let mut cabin = cabin.lock();
                    if level != cabin.level {
                        cabin.push_level(level);
                    }
                    Ok(())
                }
            })
            .build()?;

        let closed = fsm
            .state_builder("closed")
            .on_entry({
                let (cabin, slot) = (cabin.clone(), slot.clone());
                move |state, _| -> HandlerResult {
                    println!("Door closed");
                    let pending = !cabin.lock().queue.is_empty();
                    if pending {
                        state.transition_to(&doors(&slot)?.moving)?;
                    }
                    Ok(())
                }
            })
            .on_event({
                let (cabin, slot) = (cabin.clone(), slot.clone());
                move |state, request| {
                    let Request::GoToLevel(level) = *request;
                    let doors = doors(&slot)?;
                    let here = {
                        let mut cabin = cabin.lock();
                        let here = level == cabin.level;
                        if !here {
                            cabin.push_level(level);
                        }
                        here
                    };
                    if here {
                        state.transition_to(&doors.open)
                    } else {
                        state.transition_to(&doors.moving)
                    }
                }
            })
            .build()?;

        let moving = fsm
            .state_builder("moving")
            .on_entry({
                let (cabin, slot) = (cabin.clone(), slot.clone());
                move |state, _| {
                    let (next, from) = {
                        let mut cabin = cabin.lock();
                        if cabin.queue.is_empty() {
                            return Err(FsmError::handler("moving without a requested level"));
                        }
                        (cabin.queue.remove(0), cabin.level)
                    };
                    println!("Moving to level {next}");

                    let (state, cabin, slot) = (state.clone(), cabin.clone(), slot.clone());
                    tokio::spawn(async move {
                        tokio::time::sleep(TIME_PER_LEVEL * next.abs_diff(from)).await;
                        println!("Reached level {next}");
                        cabin.lock().level = next;
                        let result = doors(&slot).and_then(|doors| state.transition_to(&doors.open));
                        if let Err(err) = result {
                            warn!(error = %err, "Arrival transition failed");
                        }
                    });
                    Ok(())
                }
            })
            .on_event({
                let cabin = cabin.clone();
                move |_, request| {
                    let Request::GoToLevel(level) = *request;
                    cabin.lock().push_level(level);
                    Ok(())
                }
            })
            .build()?;

        let _ = slot.set(Doors {
            open,
            closed: closed.clone(),
            moving,
        });

        fsm.start(&closed)?;
        Ok(Self { fsm, cabin })
    }

    /// Request the elevator to go to `level`.
    fn go_to_level(&self, level: u32) -> Result<(), FsmError> {
        self.fsm.post_event(Request::GoToLevel(level))
    }
}

#[tokio::main]
async fn main() -> Result<(), FsmError> {
    tracing_subscriber::fmt().init();

    println!("=== Elevator ===\n");

    let elevator = Elevator::new()?;
    elevator.go_to_level(1)?;
    elevator.go_to_level(5)?;

    tokio::time::sleep(Duration::from_secs(4)).await;

    println!(
        "\nFinal level: {}, state: {:?}",
        elevator.cabin.lock().level,
        elevator.fsm.state().map(|s| s.name().to_string())
    );
    println!("Path: {}", elevator.fsm.history().path().join(" -> "));
    Ok(())
}
