//! Error types for the model-invocation seam and its configuration.
//!
//! Extraction and normalization are total and never produce these errors;
//! they only surface from [`crate::analyzer`] and [`crate::config`].

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur while running an analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The model client failed to produce a response.
    #[error("Model invocation failed: {message}")]
    Model {
        /// Description of the failure reported by the client.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error from serde_json.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Creates a model invocation error.
    #[inline]
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }
}

/// Errors raised while building an [`crate::config::AnalyzerConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{name} not found in environment variables")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// A variable is present but does not parse as a number.
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber {
        /// Name of the offending variable.
        name: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A `.env` file could not be read or parsed.
    #[error("failed to load {path}: {message}")]
    EnvFile {
        /// Path of the file.
        path: String,
        /// Reason reported by the loader.
        message: String,
    },
}
