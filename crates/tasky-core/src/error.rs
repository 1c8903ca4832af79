use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskyError {
    /// Rejected locally, before any remote call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote store or auth provider reported a failure.
    #[error("Remote error: {0}")]
    Remote(String),

    /// The remote call succeeded but the confirmed state differs from the requested one.
    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskyError {
    /// Text shown to the user in a notification.
    ///
    /// Provider and validation messages are surfaced verbatim; an empty
    /// message falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Validation(m)
            | Self::Remote(m)
            | Self::Consistency(m)
            | Self::Unauthenticated(m)
            | Self::NotFound(m) => m.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_provider_text() {
        let err = TaskyError::Remote("duplicate key value".to_string());
        assert_eq!(err.user_message("Failed to move task"), "duplicate key value");
    }

    #[test]
    fn test_user_message_falls_back_when_empty() {
        let err = TaskyError::Remote("   ".to_string());
        assert_eq!(err.user_message("Failed to move task"), "Failed to move task");
    }

    #[test]
    fn test_user_message_for_ambient_errors_uses_display() {
        let err = TaskyError::Config("missing supabase url".to_string());
        assert_eq!(
            err.user_message("fallback"),
            "Configuration error: missing supabase url"
        );
    }
}
