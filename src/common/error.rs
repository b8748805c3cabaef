use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridWorldError {
    #[error("'{0}' is not a valid action!")]
    InvalidAction(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Environment has no current state. Call reset or set_state first.")]
    NotReset,

    #[error("{phase} did not converge within {limit} steps")]
    ConvergenceTimeout { phase: &'static str, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridWorldError>;
