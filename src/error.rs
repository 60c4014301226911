//! Error types for the polebalance crate

use thiserror::Error;

use crate::types::Transition;

/// Main error type for the polebalance crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid hyperparameter {name} = {value}: expected {expected}")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("bound vectors disagree: low has {low} entries, high has {high}, observation has {dims}")]
    BoundsMismatch { low: usize, high: usize, dims: usize },

    #[error("malformed observation: expected {expected} values, got {got}")]
    ObservationShape { expected: usize, got: usize },

    #[error("state {state} is out of range (table has {n_states} states)")]
    StateOutOfRange { state: usize, n_states: usize },

    #[error("action {action} is out of range (table has {n_actions} actions)")]
    ActionOutOfRange { action: usize, n_actions: usize },

    #[error("value update rejected for transition {transition}: {reason}")]
    TransitionOutOfRange {
        transition: Transition,
        reason: String,
    },

    #[error("environment failure: {message}")]
    Environment { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Shorthand for environment-side failures raised by simulator adapters.
    pub fn environment(message: impl Into<String>) -> Self {
        Error::Environment {
            message: message.into(),
        }
    }
}
