//! Line-oriented text form
//!
//! ```text
//! flowchart main
//! node START start "start"
//! node N1 decision "i < 5"
//! edge START -> N1
//! edge N1 -> N2 "true"
//! ```
//!
//! Labels are JSON string literals, so embedded quotes and newlines never
//! break the one-item-per-line layout.

use std::fmt::Write as _;

use crate::features::diagram::domain::Diagram;
use crate::features::diagram::ports::DiagramRenderer;
use crate::shared::models::{FlowchartError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

fn quote(label: &str) -> Result<String> {
    serde_json::to_string(label).map_err(|e| FlowchartError::render(e.to_string()))
}

impl DiagramRenderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, diagram: &Diagram) -> Result<String> {
        let mut out = String::new();
        let fmt_err = |e: std::fmt::Error| FlowchartError::render(e.to_string());

        writeln!(out, "flowchart {}", diagram.method).map_err(fmt_err)?;
        for node in &diagram.nodes {
            writeln!(out, "node {} {} {}", node.id, node.shape, quote(&node.label)?)
                .map_err(fmt_err)?;
        }
        for edge in &diagram.edges {
            write!(out, "edge {} -> {}", edge.from, edge.to).map_err(fmt_err)?;
            if let Some(label) = &edge.label {
                write!(out, " {}", quote(label)?).map_err(fmt_err)?;
            }
            out.push('\n');
        }
        Ok(out)
    }
}
