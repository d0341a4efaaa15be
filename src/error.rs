use thiserror::Error;

/// Error raised when a configuration value violates one of its invariants.
///
/// Every config constructor reports the first violation it finds. The error
/// names the violated field by its external property key (for example
/// `scan.max.depth`), so callers can match on [`key()`](Self::key) instead of
/// parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {key}: {message}")]
pub struct ConfigValidationError {
    key: &'static str,
    message: String,
}

impl ConfigValidationError {
    pub fn new(key: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(key, %message, "configuration rejected");
        Self { key, message }
    }

    /// External property key of the field that failed validation.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Human readable description of the violation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced while turning external property sources into configs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read configuration source: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
}

impl LoadError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}

pub type ValidationResult<T> = std::result::Result<T, ConfigValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_key_and_message() {
        let err = ConfigValidationError::new("scan.max.depth", "must be >= 0 or -1");
        assert_eq!(err.to_string(), "invalid scan.max.depth: must be >= 0 or -1");
        assert_eq!(err.key(), "scan.max.depth");
        assert_eq!(err.message(), "must be >= 0 or -1");
    }

    #[test]
    fn test_validation_converts_into_load_error() {
        let err: LoadError = ConfigValidationError::new("app.name", "empty").into();
        assert!(matches!(err, LoadError::Validation(ref e) if e.key() == "app.name"));
        assert_eq!(err.to_string(), "invalid app.name: empty");
    }
}
