/*
 * Flowchart IR - Control-flow extraction engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, Location, FlowchartError)
 * - features/    : Vertical slices (lexing → parsing → flow_graph → shape → diagram)
 * - config/      : FlowchartConfig and its YAML v1 file schema
 * - pipeline/    : End-to-end orchestration, rayon batch runs
 *
 * One source unit yields one AST, one CFG and one diagram description.
 * Nothing is shared between runs.
 */

pub mod config;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use config::{FlowDirection, FlowchartConfig, OutputFormat};
pub use features::diagram::{Diagram, DiagramEdge, DiagramNode, DiagramRenderer};
pub use features::flow_graph::{ControlFlowGraph, EdgeKind};
pub use features::shape::Shape;
pub use pipeline::{process_batch, render_batch, FlowchartPipeline, SourceUnit, UnitResult};
pub use shared::models::{ErrorKind, FlowchartError, Result, Stage};
