//! Error type for logger setup.

/// Errors raised while installing the global subscriber
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The filter directives could not be parsed
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// Directives as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}

impl LogError {
    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "LOG_FILTER",
            Self::AlreadyInitialized(_) => "LOG_ALREADY_INITIALIZED",
        }
    }
}

/// Result type for logger operations
pub type LogResult<T> = Result<T, LogError>;
