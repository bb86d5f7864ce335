//! Stance: a minimal finite state machine runtime
//!
//! A [`StateMachine`] holds exactly one current [`State`] and mediates
//! transitions and event dispatch between states. Everything runs
//! synchronously: each call completes, including any transitions requested
//! from inside callbacks, before it returns.
//!
//! # Core Concepts
//!
//! - **State**: a named handle with optional `on_entry`, `on_exit` and
//!   `on_event` callbacks, bound to one machine
//! - **Transition**: leaving the current state (exit callback) and entering
//!   another (entry callback, with an optional payload)
//! - **Event**: an application value delivered to the current state's event
//!   callback, which may request a transition
//!
//! # Example
//!
//! ```rust
//! use stance::{State, StateMachine};
//! use std::sync::OnceLock;
//! use std::sync::Arc;
//!
//! let fsm: StateMachine<&str> = StateMachine::new();
//! let green: Arc<OnceLock<State<&str>>> = Arc::default();
//!
//! let target = green.clone();
//! let red = fsm
//!     .state_builder("red")
//!     .on_event(move |state, event| match (*event, target.get()) {
//!         ("go", Some(green)) => state.transition_to(green),
//!         _ => Ok(()),
//!     })
//!     .build()
//!     .unwrap();
//! let _ = green.set(State::new(&fsm, "green"));
//!
//! fsm.start(&red).unwrap();
//! fsm.post_event("go").unwrap();
//!
//! assert_eq!(fsm.state().unwrap().name(), "green");
//! ```

pub mod builder;
pub mod config;
pub mod core;

// Re-export commonly used types
pub use crate::builder::StateBuilder;
pub use crate::config::MachineConfig;
pub use crate::core::{ErrorKind, FsmError, HandlerResult, State, StateMachine};
