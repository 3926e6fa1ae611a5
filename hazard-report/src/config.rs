//! Settings for the model-invocation seam.
//!
//! Configuration is an explicit value handed to [`crate::analyzer::Analyzer`]
//! at construction. Extraction and normalization take no configuration.

use std::{collections::HashMap, fmt, path::Path};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Model settings and credentials.
#[derive(Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// API key passed to the model client.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Log full reports at debug level.
    pub debug: bool,
}

impl AnalyzerConfig {
    /// Creates a config with default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            debug: false,
        }
    }

    /// Loads the config from process environment variables.
    ///
    /// A `.env` file in the current directory or its parents is loaded
    /// first; variables already set in the process take precedence.
    /// Reads `GEMINI_API_KEY` (required), `DEFAULT_MODEL`, `MAX_TOKENS`,
    /// `TEMPERATURE` and `DEBUG`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` if the API key is absent or empty,
    /// and `ConfigError::InvalidNumber` if a numeric setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the config from a `.env` file only, without touching the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvFile` if the file cannot be read or has a
    /// malformed line, otherwise the same errors as [`Self::from_lookup`].
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |e: dotenvy::Error| ConfigError::EnvFile {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(file_error)? {
            let (key, value) = item.map_err(file_error)?;
            vars.insert(key, value);
        }
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    /// Loads the config through an arbitrary variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use hazard_report::config::AnalyzerConfig;
    ///
    /// let config = AnalyzerConfig::from_lookup(|name| match name {
    ///     "GEMINI_API_KEY" => Some("secret".to_string()),
    ///     "MAX_TOKENS" => Some("2048".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.max_tokens, 2048);
    /// assert_eq!(config.model, "gemini-1.5-flash");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar {
                name: "GEMINI_API_KEY",
            })?;

        let model = lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let max_tokens = parse_number(&lookup, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let temperature = parse_number(&lookup, "TEMPERATURE", DEFAULT_TEMPERATURE)?;
        let debug = lookup("DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true"));

        Ok(Self {
            api_key,
            model,
            max_tokens,
            temperature,
            debug,
        })
    }
}

fn parse_number<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
        None => Ok(default),
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("debug", &self.debug)
            .finish()
    }
}
