use thiserror::Error;

/// Support engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    /// Referenced queue item or conversation does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// State transition not permitted from the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by an external conversation source
    #[error("Source error: {0}")]
    Source(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SupportError {
    /// Create a new NotFound error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new InvalidState error
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a new AlreadyExists error
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create a new InvalidInput error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Source error
    pub fn source_failed<S: Into<String>>(msg: S) -> Self {
        Self::Source(msg.into())
    }

    /// Create a new Internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller can recover by re-fetching or re-rendering.
    ///
    /// Every failing operation leaves its collection untouched, so only
    /// internal faults are treated as unrecoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

impl From<serde_json::Error> for SupportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for support engine operations
pub type Result<T> = std::result::Result<T, SupportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SupportError::not_found("Queue item not found: 7").to_string(),
            "Not found: Queue item not found: 7"
        );
        assert_eq!(
            SupportError::invalid_state("already assigned").to_string(),
            "Invalid state: already assigned"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(SupportError::not_found("x").is_recoverable());
        assert!(SupportError::invalid_state("x").is_recoverable());
        assert!(SupportError::source_failed("gateway down").is_recoverable());
        assert!(!SupportError::internal("poisoned").is_recoverable());
    }
}
