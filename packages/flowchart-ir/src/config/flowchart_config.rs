//! Engine configuration
//!
//! ```rust,ignore
//! use flowchart_ir::config::{FlowchartConfig, OutputFormat};
//!
//! let config = FlowchartConfig::default()
//!     .with_entry("isPrime")
//!     .with_format(OutputFormat::Mermaid);
//!
//! let config = FlowchartConfig::from_yaml("flowchart.yaml")?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigFileV1;
use super::options::{FlowDirection, OutputFormat};
use super::validation::Validatable;
use crate::features::lexing::Keyword;

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowchartConfig {
    /// Method whose body becomes the diagram
    pub entry_name: String,
    /// Use the first declared method when `entry_name` is absent
    pub fallback_to_first: bool,
    pub format: OutputFormat,
    /// Mermaid only
    pub direction: FlowDirection,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            entry_name: "main".to_string(),
            fallback_to_first: true,
            format: OutputFormat::default(),
            direction: FlowDirection::default(),
        }
    }
}

impl FlowchartConfig {
    pub fn with_entry(mut self, name: impl Into<String>) -> Self {
        self.entry_name = name.into();
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback_to_first = fallback;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_direction(mut self, direction: FlowDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Load and validate a YAML v1 file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(entry_name) = file.entry_name {
            config.entry_name = entry_name;
        }
        if let Some(fallback) = file.fallback_to_first {
            config.fallback_to_first = fallback;
        }
        if let Some(format) = file.format {
            config.format = format.parse()?;
        }
        if let Some(direction) = file.direction {
            config.direction = direction.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            entry_name: Some(self.entry_name.clone()),
            fallback_to_first: Some(self.fallback_to_first),
            format: Some(self.format.to_string()),
            direction: Some(self.direction.to_string()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

/// Identifier rules of the parsed language
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && Keyword::lookup(name).is_none()
}

impl Validatable for FlowchartConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !is_valid_identifier(&self.entry_name) {
            return Err(ConfigError::InvalidEntryName(self.entry_name.clone()));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "FlowchartConfig"
    }
}
