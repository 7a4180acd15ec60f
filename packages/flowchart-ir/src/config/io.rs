//! YAML file schema

use serde::{Deserialize, Serialize};

/// YAML Schema v1. Every key but `version` is optional and falls back to
/// the default configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1); optional here so a missing key gets
    /// its own error
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_to_first: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}
