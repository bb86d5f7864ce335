//! Errors raised by the state machine runtime.

use thiserror::Error;

/// Boxed application error returned from a lifecycle callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of an [`FsmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A state reference was unusable at a validation point
    InvalidArgument,

    /// `start` was called on a machine that already has a current state
    AlreadyStarted,

    /// A user callback failed
    Handler,
}

/// Errors that can occur while building states or driving a machine.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("State '{state}' is not bound to this machine")]
    InvalidState { state: String },

    #[error("State '{state}' has no owning machine. Call .machine(&fsm) before .build()")]
    MissingMachine { state: String },

    #[error("Machine already started in state '{current}'")]
    AlreadyStarted { current: String },

    #[error("Machine owning state '{state}' has been dropped")]
    MachineDropped { state: String },

    #[error(transparent)]
    Handler(BoxError),
}

impl FsmError {
    /// Wrap an application error raised inside a callback.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stance::{ErrorKind, FsmError};
    ///
    /// let err = FsmError::handler("door jammed");
    /// assert_eq!(err.kind(), ErrorKind::Handler);
    /// assert_eq!(err.to_string(), "door jammed");
    /// ```
    pub fn handler(error: impl Into<BoxError>) -> Self {
        FsmError::Handler(error.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState { .. } | Self::MissingMachine { .. } | Self::MachineDropped { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::AlreadyStarted { .. } => ErrorKind::AlreadyStarted,
            Self::Handler(_) => ErrorKind::Handler,
        }
    }
}
