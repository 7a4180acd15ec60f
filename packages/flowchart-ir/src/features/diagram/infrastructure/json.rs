//! JSON form of the diagram, via serde

use crate::features::diagram::domain::Diagram;
use crate::features::diagram::ports::DiagramRenderer;
use crate::shared::models::{FlowchartError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl DiagramRenderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, diagram: &Diagram) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(diagram)
        } else {
            serde_json::to_string(diagram)
        };
        rendered.map_err(|e| FlowchartError::render(format!("json serialization failed: {}", e)))
    }
}
