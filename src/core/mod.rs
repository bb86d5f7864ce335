//! Core state machine types.
//!
//! This module contains the runtime itself:
//! - `StateMachine`, the holder of the current state
//! - `State`, the handle bundling entry, exit and event callbacks
//! - Bounded transition history
//! - The `FsmError` taxonomy

mod error;
mod history;
pub(crate) mod machine;
pub(crate) mod state;

pub use error::{BoxError, ErrorKind, FsmError};
pub use history::{TransitionHistory, TransitionRecord};
pub use machine::StateMachine;
pub use state::{EntryHandler, EventHandler, ExitHandler, HandlerResult, State};
