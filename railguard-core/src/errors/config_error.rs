//! Configuration errors.

/// Errors loading an [`crate::config::AnalyzerConfig`] override.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid regex in config field {field}: {message}")]
    InvalidPattern { field: String, message: String },
}
