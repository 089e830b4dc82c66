use reach_core::OpModeError;

/// Errors that can occur while running the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid arguments: {0}")]
    Args(String),

    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Op-mode error: {0}")]
    OpMode(OpModeError),
}

impl From<OpModeError> for SimError {
    fn from(err: OpModeError) -> Self {
        SimError::OpMode(err)
    }
}
