//! State machine runtime.

use super::error::FsmError;
use super::history::{TransitionHistory, TransitionRecord};
use super::state::State;
use crate::builder::StateBuilder;
use crate::config::MachineConfig;
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};
use uuid::Uuid;

pub(crate) struct MachineInner<E, P, D> {
    id: Uuid,
    config: MachineConfig,
    current: Mutex<Option<State<E, P, D>>>,
    history: Mutex<TransitionHistory>,
}

/// Holds the current state and runs entry/exit callbacks on every transition.
///
/// The handle is cheap to clone; clones drive the same machine. The internal
/// lock is never held while a callback runs, so callbacks may call back into
/// the machine.
///
/// # Example
///
/// ```rust
/// use stance::StateMachine;
///
/// let fsm: StateMachine<&str> = StateMachine::new();
/// let red = fsm.state_builder("red").build().unwrap();
/// let green = fsm.state_builder("green").build().unwrap();
///
/// fsm.start(&red).unwrap();
/// fsm.transition_to(&green).unwrap();
///
/// assert_eq!(fsm.state(), Some(green));
/// assert_eq!(fsm.history().path(), vec!["red", "green"]);
/// ```
pub struct StateMachine<E = (), P = (), D = ()> {
    pub(crate) inner: Arc<MachineInner<E, P, D>>,
}

impl<E, P, D> StateMachine<E, P, D> {
    /// Create an unstarted machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create an unstarted machine.
    pub fn with_config(config: MachineConfig) -> Self {
        let history = TransitionHistory::with_limit(config.history_limit);
        Self::from_inner(Arc::new(MachineInner {
            id: Uuid::new_v4(),
            config,
            current: Mutex::new(None),
            history: Mutex::new(history),
        }))
    }

    pub(crate) fn from_inner(inner: Arc<MachineInner<E, P, D>>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<MachineInner<E, P, D>> {
        Arc::downgrade(&self.inner)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.inner.config
    }

    /// Start building a state bound to this machine.
    pub fn state_builder(&self, name: impl Into<String>) -> StateBuilder<E, P, D>
    where
        D: Default,
    {
        StateBuilder::new(name).machine(self)
    }

    /// Enter `initial` and run its entry callback without a payload.
    ///
    /// Fails if `initial` belongs to another machine, or if a current state
    /// already exists.
    pub fn start(&self, initial: &State<E, P, D>) -> Result<(), FsmError> {
        self.ensure_owned(initial)?;
        if let Some(current) = self.inner.current.lock().as_ref() {
            return Err(FsmError::AlreadyStarted {
                current: current.name().to_string(),
            });
        }
        debug!(
            machine = %self.inner.config.label,
            id = %self.inner.id,
            state = initial.name(),
            "Starting state machine"
        );
        self.enter(initial, None)
    }

    /// Transition to `target` without a payload.
    ///
    /// Transitioning to the current state does nothing. Otherwise the current
    /// state's exit callback completes before `target`'s entry callback runs.
    /// Before `start`, this behaves like `start` without the already-started check.
    pub fn transition_to(&self, target: &State<E, P, D>) -> Result<(), FsmError> {
        self.enter(target, None)
    }

    /// Transition to `target`, handing `payload` to its entry callback.
    pub fn transition_to_with(&self, target: &State<E, P, D>, payload: P) -> Result<(), FsmError> {
        self.enter(target, Some(payload))
    }

    /// Deliver `event` to the current state's event handler.
    ///
    /// Does nothing if the machine has not started or the current state has no
    /// handler. Transitions requested by the handler complete before this returns.
    pub fn post_event(&self, event: E) -> Result<(), FsmError> {
        let current = self.inner.current.lock().clone();
        match current {
            Some(state) => {
                trace!(machine = %self.inner.config.label, state = state.name(), "Posting event");
                state.handle_event(&event)
            }
            None => {
                trace!(machine = %self.inner.config.label, "Event posted before start, ignoring");
                Ok(())
            }
        }
    }

    /// Get the current state (pure).
    pub fn state(&self) -> Option<State<E, P, D>> {
        self.inner.current.lock().clone()
    }

    pub fn is_started(&self) -> bool {
        self.inner.current.lock().is_some()
    }

    /// Get a snapshot of the transition history.
    pub fn history(&self) -> TransitionHistory {
        self.inner.history.lock().clone()
    }

    fn ensure_owned(&self, state: &State<E, P, D>) -> Result<(), FsmError> {
        if state.belongs_to(&self.inner) {
            Ok(())
        } else {
            Err(FsmError::InvalidState {
                state: state.name().to_string(),
            })
        }
    }

    fn enter(&self, target: &State<E, P, D>, payload: Option<P>) -> Result<(), FsmError> {
        self.ensure_owned(target)?;

        let previous = {
            let current = self.inner.current.lock();
            if current.as_ref() == Some(target) {
                trace!(
                    machine = %self.inner.config.label,
                    state = target.name(),
                    "Already in target state, skipping transition"
                );
                return Ok(());
            }
            current.clone()
        };

        if let Some(previous) = &previous {
            previous.exit()?;
        }

        *self.inner.current.lock() = Some(target.clone());

        let from = previous.as_ref().map(|s| s.name().to_string());
        debug!(
            machine = %self.inner.config.label,
            id = %self.inner.id,
            from = from.as_deref().unwrap_or("<none>"),
            to = target.name(),
            "Transitioned"
        );
        self.inner.history.lock().record(TransitionRecord {
            from,
            to: target.name().to_string(),
            timestamp: Utc::now(),
        });

        target.enter(payload)
    }
}

impl<E, P, D> Clone for StateMachine<E, P, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, P, D> Default for StateMachine<E, P, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P, D> fmt::Debug for StateMachine<E, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.inner.current.lock();
        f.debug_struct("StateMachine")
            .field("id", &self.inner.id)
            .field("label", &self.inner.config.label)
            .field("current", &current.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}
