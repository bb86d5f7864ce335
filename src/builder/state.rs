//! Builder for constructing states.

use crate::core::machine::MachineInner;
use crate::core::state::StateInner;
use crate::core::{
    EntryHandler, EventHandler, ExitHandler, FsmError, HandlerResult, State, StateMachine,
};
use std::sync::Weak;
use tracing::trace;

/// Builder for constructing states with a fluent API.
///
/// A machine is required; callbacks and data are optional.
///
/// # Example
///
/// ```rust
/// use stance::{StateBuilder, StateMachine};
///
/// let fsm: StateMachine<&str> = StateMachine::new();
///
/// let door = StateBuilder::new("door")
///     .machine(&fsm)
///     .on_event(|state, event| {
///         println!("{} got {}", state.name(), event);
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// fsm.start(&door).unwrap();
/// fsm.post_event("knock").unwrap();
/// ```
pub struct StateBuilder<E = (), P = (), D = ()> {
    name: String,
    machine: Option<Weak<MachineInner<E, P, D>>>,
    on_entry: Option<EntryHandler<E, P, D>>,
    on_exit: Option<ExitHandler<E, P, D>>,
    on_event: Option<EventHandler<E, P, D>>,
    data: D,
}

impl<E, P, D: Default> StateBuilder<E, P, D> {
    /// Create a new builder with default data.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_data(name, D::default())
    }
}

impl<E, P, D> StateBuilder<E, P, D> {
    /// Create a new builder carrying application data.
    pub fn with_data(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            machine: None,
            on_entry: None,
            on_exit: None,
            on_event: None,
            data,
        }
    }

    /// Bind the state to its owning machine (required).
    pub fn machine(mut self, machine: &StateMachine<E, P, D>) -> Self {
        self.machine = Some(machine.downgrade());
        self
    }

    /// Set the entry callback (optional).
    pub fn on_entry<F>(mut self, handler: F) -> Self
    where
        F: Fn(&State<E, P, D>, Option<P>) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_entry = Some(Box::new(handler));
        self
    }

    /// Set the exit callback (optional).
    pub fn on_exit<F>(mut self, handler: F) -> Self
    where
        F: Fn(&State<E, P, D>) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_exit = Some(Box::new(handler));
        self
    }

    /// Set the event callback (optional).
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&State<E, P, D>, &E) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_event = Some(Box::new(handler));
        self
    }

    /// Replace the application data.
    pub fn data(mut self, data: D) -> Self {
        self.data = data;
        self
    }

    /// Build the state.
    pub fn build(self) -> Result<State<E, P, D>, FsmError> {
        let machine = self.machine.ok_or_else(|| FsmError::MissingMachine {
            state: self.name.clone(),
        })?;

        trace!(state = %self.name, "Built state");

        Ok(State::from_inner(StateInner {
            name: self.name,
            machine,
            on_entry: self.on_entry,
            on_exit: self.on_exit,
            on_event: self.on_event,
            data: self.data,
        }))
    }
}
