//! Builder API for state construction.
//!
//! States are assembled with a fluent [`StateBuilder`] that binds them to a
//! machine and attaches their lifecycle callbacks.

pub mod state;

pub use state::StateBuilder;
