//! Configuration
//!
//! One flat `FlowchartConfig`, buildable in code or loaded from a versioned
//! YAML file (schema v1):
//!
//! ```yaml
//! version: 1
//! entry_name: main
//! fallback_to_first: true
//! format: mermaid
//! direction: LR
//! ```

pub mod error;
pub mod flowchart_config;
pub mod io;
pub mod options;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use flowchart_config::FlowchartConfig;
pub use io::ConfigFileV1;
pub use options::{FlowDirection, OutputFormat};
pub use validation::Validatable;
