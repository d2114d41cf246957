use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Both kinds are surfaced synchronously to the caller; the driver treats
/// either one as fatal for the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A run parameter is out of range or has the wrong type.
    /// Raised at construction, before any step runs.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A cell index passed to a state mutation is out of range or repeated.
    #[error("Invalid cell index {index}: {reason}")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Why the index was rejected.
        reason: String,
    },
}

impl SimulationError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SimulationError::InvalidConfiguration(msg.into())
    }
}

/// Shorthand for results carrying a [`SimulationError`].
pub type SimResult<T> = std::result::Result<T, SimulationError>;
