//! Error types for taskroute.

use thiserror::Error;

/// Primary error type for all taskroute operations.
#[derive(Error, Debug)]
pub enum RouteError {
    /// Task input was malformed or insufficient. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registry failed to load or holds zero usable profiles. Fatal to init.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Selection was attempted with an empty available-profile set.
    #[error("No available models: {0}")]
    NoAvailableModels(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Provider error: {model}: {message}")]
    Provider { model: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RouteError {
    /// Create a provider error for a named model.
    pub fn provider(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole request rather than a single attempt.
    ///
    /// Validation, configuration, and availability problems surface
    /// immediately; transport and timeout errors are absorbed by the
    /// fallback loop and only reported in aggregate.
    pub fn aborts_request(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Configuration(_) | Self::NoAvailableModels(_)
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_level_errors_abort() {
        assert!(RouteError::Validation("too short".into()).aborts_request());
        assert!(RouteError::Configuration("no profiles".into()).aborts_request());
        assert!(RouteError::NoAvailableModels("none".into()).aborts_request());
    }

    #[test]
    fn attempt_level_errors_do_not_abort() {
        assert!(!RouteError::Timeout(60_000).aborts_request());
        assert!(!RouteError::provider("m", "boom").aborts_request());
    }
}
