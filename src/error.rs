use uuid::Uuid;

/// Errors raised by the simulation core and the session layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Mass, inertia or actuator matrix cannot be inverted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("State diverged (non-finite) at t={time:.4}s")]
    Divergence { time: f64 },

    #[error("No vehicle initialized for session {0}")]
    UninitializedState(Uuid),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
