//! Domain error types.

/// Top-level error type for traderewind.
#[derive(Debug, thiserror::Error)]
pub enum RewindError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown strategy '{name}' (registered: {registered})")]
    UnknownStrategy { name: String, registered: String },

    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("no data for '{query}': {reason}")]
    NotFound { query: String, reason: String },

    #[error("'{name}' maps to multiple tickers: {}", tickers.join(", "))]
    AmbiguousTicker { name: String, tickers: Vec<String> },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RewindError> for std::process::ExitCode {
    fn from(err: &RewindError) -> Self {
        let code: u8 = match err {
            RewindError::Io(_) => 1,
            RewindError::ConfigParse { .. }
            | RewindError::ConfigMissing { .. }
            | RewindError::ConfigInvalid { .. } => 2,
            RewindError::Data { .. } => 3,
            RewindError::InvalidInput { .. } | RewindError::UnknownStrategy { .. } => 4,
            RewindError::NotFound { .. }
            | RewindError::AmbiguousTicker { .. }
            | RewindError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
