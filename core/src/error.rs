use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Degenerate level shape {width}x{height}: {reason}")]
    GenerationDegenerate {
        width: i32,
        height: i32,
        reason: String,
    },

    #[error("Start position ({x},{y}) is not an interior cell")]
    StartOutsideInterior { x: i32, y: i32 },

    #[error("Malformed command '{line}': {reason}")]
    MalformedCommand { line: String, reason: String },

    #[error("Session {id} not found")]
    SessionNotFound { id: u64 },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
