//! States and their lifecycle callbacks.
//!
//! A [`State`] is a cheap, cloneable handle. Clones refer to the same state,
//! and equality is identity: two states built with the same name are still
//! different states.

use super::error::FsmError;
use super::machine::{MachineInner, StateMachine};
use std::fmt;
use std::sync::{Arc, Weak};

/// Result returned by lifecycle callbacks.
pub type HandlerResult = Result<(), FsmError>;

/// Callback run when a state becomes current. Receives the entry payload, if any.
pub type EntryHandler<E, P, D> =
    Box<dyn Fn(&State<E, P, D>, Option<P>) -> HandlerResult + Send + Sync>;

/// Callback run when a state stops being current.
pub type ExitHandler<E, P, D> = Box<dyn Fn(&State<E, P, D>) -> HandlerResult + Send + Sync>;

/// Callback run for each event posted while the state is current.
pub type EventHandler<E, P, D> =
    Box<dyn Fn(&State<E, P, D>, &E) -> HandlerResult + Send + Sync>;

pub(crate) struct StateInner<E, P, D> {
    pub(crate) name: String,
    pub(crate) machine: Weak<MachineInner<E, P, D>>,
    pub(crate) on_entry: Option<EntryHandler<E, P, D>>,
    pub(crate) on_exit: Option<ExitHandler<E, P, D>>,
    pub(crate) on_event: Option<EventHandler<E, P, D>>,
    pub(crate) data: D,
}

/// A named bundle of optional entry, exit and event callbacks bound to one machine.
///
/// Every callback receives the state itself as its first argument, so it can
/// request transitions through [`State::transition_to`] without capturing the
/// machine.
///
/// # Example
///
/// ```rust
/// use stance::{State, StateMachine};
///
/// let fsm: StateMachine<&str> = StateMachine::new();
/// let idle = State::new(&fsm, "idle");
/// let copy = idle.clone();
/// let other = State::new(&fsm, "idle");
///
/// assert_eq!(idle, copy);
/// assert_ne!(idle, other);
/// ```
pub struct State<E = (), P = (), D = ()> {
    pub(crate) inner: Arc<StateInner<E, P, D>>,
}

impl<E, P, D: Default> State<E, P, D> {
    /// Create a state without callbacks, bound to `machine`.
    pub fn new(machine: &StateMachine<E, P, D>, name: impl Into<String>) -> Self {
        Self::from_inner(StateInner {
            name: name.into(),
            machine: machine.downgrade(),
            on_entry: None,
            on_exit: None,
            on_event: None,
            data: D::default(),
        })
    }
}

impl<E, P, D> State<E, P, D> {
    pub(crate) fn from_inner(inner: StateInner<E, P, D>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Application data attached when the state was built.
    pub fn data(&self) -> &D {
        &self.inner.data
    }

    /// Get the owning machine, or `None` if it has been dropped.
    pub fn machine(&self) -> Option<StateMachine<E, P, D>> {
        self.inner.machine.upgrade().map(StateMachine::from_inner)
    }

    /// Ask the owning machine to transition to `target` without a payload.
    pub fn transition_to(&self, target: &State<E, P, D>) -> Result<(), FsmError> {
        self.owner()?.transition_to(target)
    }

    /// Ask the owning machine to transition to `target`, handing `payload` to its entry callback.
    pub fn transition_to_with(&self, target: &State<E, P, D>, payload: P) -> Result<(), FsmError> {
        self.owner()?.transition_to_with(target, payload)
    }

    fn owner(&self) -> Result<StateMachine<E, P, D>, FsmError> {
        self.machine().ok_or_else(|| FsmError::MachineDropped {
            state: self.inner.name.clone(),
        })
    }

    pub(crate) fn belongs_to(&self, machine: &Arc<MachineInner<E, P, D>>) -> bool {
        std::ptr::eq(self.inner.machine.as_ptr(), Arc::as_ptr(machine))
    }

    pub(crate) fn enter(&self, payload: Option<P>) -> HandlerResult {
        match &self.inner.on_entry {
            Some(handler) => handler(self, payload),
            None => Ok(()),
        }
    }

    pub(crate) fn exit(&self) -> HandlerResult {
        match &self.inner.on_exit {
            Some(handler) => handler(self),
            None => Ok(()),
        }
    }

    pub(crate) fn handle_event(&self, event: &E) -> HandlerResult {
        match &self.inner.on_event {
            Some(handler) => handler(self, event),
            None => Ok(()),
        }
    }
}

impl<E, P, D> Clone for State<E, P, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, P, D> PartialEq for State<E, P, D> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E, P, D> Eq for State<E, P, D> {}

impl<E, P, D> fmt::Debug for State<E, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.inner.name)
            .field("on_entry", &self.inner.on_entry.is_some())
            .field("on_exit", &self.inner.on_exit.is_some())
            .field("on_event", &self.inner.on_event.is_some())
            .finish()
    }
}
