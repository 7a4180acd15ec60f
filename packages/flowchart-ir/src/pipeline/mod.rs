//! Pipeline
//!
//! Lexer → Parser → CFG Builder → Classifier → Emitter → Renderer for one
//! source unit, and the same chain fanned out over a batch of units.

pub mod batch;
pub mod processor;

pub use batch::{process_batch, render_batch, SourceUnit, UnitResult};
pub use processor::FlowchartPipeline;
