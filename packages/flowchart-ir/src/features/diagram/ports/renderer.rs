use crate::features::diagram::domain::Diagram;
use crate::shared::models::Result;

/// Serializes a diagram for a downstream diagram-as-code tool
pub trait DiagramRenderer: Send + Sync {
    /// Short format name, used in logs
    fn name(&self) -> &'static str;

    fn render(&self, diagram: &Diagram) -> Result<String>;
}
