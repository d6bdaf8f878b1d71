//! Configuration errors.

use thiserror::Error;

/// Why `uihealth.toml` could not be turned into a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Malformed substitution pattern: {0}")]
    InvalidFormat(String),

    /// `${VAR}` referenced a variable missing from the environment.
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Also covers unknown expectation or indicator kinds.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
