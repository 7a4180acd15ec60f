//! Mermaid flowchart syntax
//!
//! Labels lose their double quotes (Mermaid has no escape for them inside a
//! quoted label) and multi-statement process labels break with `<br/>`.

use crate::config::FlowDirection;
use crate::features::diagram::domain::Diagram;
use crate::features::diagram::ports::DiagramRenderer;
use crate::features::shape::domain::Shape;
use crate::shared::models::Result;

#[derive(Debug, Default, Clone, Copy)]
pub struct MermaidRenderer {
    pub direction: FlowDirection,
}

impl MermaidRenderer {
    pub fn new(direction: FlowDirection) -> Self {
        Self { direction }
    }
}

/// Strip double quotes, trim, and wrap in quotes
pub fn sanitize_label(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| *c != '"').collect();
    format!("\"{}\"", stripped.trim().replace('\n', "<br/>"))
}

fn node_shape(shape: Shape, label: &str) -> String {
    let label = sanitize_label(label);
    match shape {
        Shape::Start | Shape::End => format!("([{}])", label),
        Shape::Process => format!("[{}]", label),
        Shape::Decision => format!("{{{}}}", label),
        Shape::Io => format!("[/{}/]", label),
    }
}

/// Edge labels sit between pipes; pipes and quotes are dropped
fn edge_text(label: &str) -> String {
    label
        .chars()
        .filter(|c| *c != '"' && *c != '|')
        .collect::<String>()
        .trim()
        .to_string()
}

impl DiagramRenderer for MermaidRenderer {
    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn render(&self, diagram: &Diagram) -> Result<String> {
        let mut lines = Vec::with_capacity(diagram.nodes.len() + diagram.edges.len() + 1);
        lines.push(format!("flowchart {}", self.direction));
        for node in &diagram.nodes {
            lines.push(format!("{}{}", node.id, node_shape(node.shape, &node.label)));
        }
        for edge in &diagram.edges {
            match edge.label.as_deref().map(edge_text) {
                Some(label) if !label.is_empty() => {
                    lines.push(format!("{} -->|{}| {}", edge.from, label, edge.to))
                }
                _ => lines.push(format!("{} --> {}", edge.from, edge.to)),
            }
        }
        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}
