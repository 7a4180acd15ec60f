//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Entry name that can never match a method
    #[error("Invalid entry name '{0}': must be an identifier that is not a reserved word")]
    InvalidEntryName(String),

    #[error("Unknown output format '{0}'. Valid formats: text, mermaid, json")]
    UnknownFormat(String),

    #[error("Unknown flow direction '{0}'. Valid directions: TD, LR")]
    UnknownDirection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
