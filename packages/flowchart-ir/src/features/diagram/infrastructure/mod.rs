//! Diagram infrastructure: the emitter and the renderer adapters

pub mod emitter;
pub mod json;
pub mod mermaid;
pub mod text;

pub use emitter::{edge_label, emit};
pub use json::JsonRenderer;
pub use mermaid::{sanitize_label, MermaidRenderer};
pub use text::TextRenderer;

use crate::config::{FlowDirection, OutputFormat};
use crate::features::diagram::ports::DiagramRenderer;

/// Renderer adapter for a configured output format
pub fn renderer_for(format: OutputFormat, direction: FlowDirection) -> Box<dyn DiagramRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer),
        OutputFormat::Mermaid => Box::new(MermaidRenderer::new(direction)),
        OutputFormat::Json => Box::new(JsonRenderer { pretty: true }),
    }
}
