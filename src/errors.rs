use thiserror::Error;

/// Errors surfaced by the command registry and settings loading.
///
/// The normalizer and state store never fail; malformed input degrades to
/// defaults instead of landing here.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid arguments for {command}: {reason}")]
    InvalidArguments { command: String, reason: String },

    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings are not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContextError>;
