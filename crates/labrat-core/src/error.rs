//! Unified error types for labrat

use thiserror::Error;

/// Unified error type for all harness operations
#[derive(Error, Debug)]
pub enum LabratError {
    // Browser errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out after {waited_ms}ms waiting for '{selector}' to {expectation}")]
    Timeout {
        selector: String,
        expectation: String,
        waited_ms: u64,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    // Fixture errors
    #[error("Fixture task failed: {0}")]
    Fixture(String),

    // Orchestration errors
    #[error("Spec discovery error: {0}")]
    Discovery(String),

    #[error("Spec parse error: {0}")]
    SpecParse(String),

    #[error("Journey not registered: {0}")]
    UnknownJourney(String),

    #[error("Backend not ready: {0}")]
    BackendNotReady(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl LabratError {
    /// True for errors that abort the suite before any browser interaction.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingEnv(_))
    }
}

/// Result type alias using LabratError
pub type Result<T> = std::result::Result<T, LabratError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_is_descriptive() {
        let err = LabratError::Timeout {
            selector: "[data-cy='add-button']".to_string(),
            expectation: "become visible".to_string(),
            waited_ms: 30000,
        };
        let msg = err.to_string();
        assert!(msg.contains("30000ms"));
        assert!(msg.contains("[data-cy='add-button']"));
        assert!(msg.contains("become visible"));
    }

    #[test]
    fn test_fatal_setup_classification() {
        assert!(LabratError::MissingEnv("TEST_USER").is_fatal_setup());
        assert!(LabratError::Config("loader script not found".into()).is_fatal_setup());
        assert!(!LabratError::Fixture("psql exited 1".into()).is_fatal_setup());
        assert!(!LabratError::Discovery("walk failed".into()).is_fatal_setup());
    }
}
