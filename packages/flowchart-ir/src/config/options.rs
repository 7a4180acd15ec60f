//! Output options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Serialized form of the emitted diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One node or edge per line
    #[default]
    Text,
    Mermaid,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Mermaid => "mermaid",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mermaid layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlowDirection {
    /// Top down
    #[default]
    TD,
    /// Left to right
    LR,
}

impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TD => "TD",
            Self::LR => "LR",
        }
    }
}

impl FromStr for FlowDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TD" | "TB" => Ok(Self::TD),
            "LR" => Ok(Self::LR),
            _ => Err(ConfigError::UnknownDirection(s.to_string())),
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("mermaid".parse::<OutputFormat>().unwrap(), OutputFormat::Mermaid);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "svg".parse::<OutputFormat>(),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("lr".parse::<FlowDirection>().unwrap(), FlowDirection::LR);
        assert_eq!("TB".parse::<FlowDirection>().unwrap(), FlowDirection::TD);
        assert!("up".parse::<FlowDirection>().is_err());
    }

    #[test]
    fn test_defaults_and_display() {
        assert_eq!(OutputFormat::default().to_string(), "text");
        assert_eq!(FlowDirection::default().to_string(), "TD");
    }
}
