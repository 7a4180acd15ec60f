//! Diagram feature
//!
//! Turns a classified CFG into the ordered node/edge description the engine
//! hands to diagram tools, and renders it as text, Mermaid or JSON.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::{emit, renderer_for, JsonRenderer, MermaidRenderer, TextRenderer};
pub use ports::DiagramRenderer;
