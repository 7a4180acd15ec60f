pub mod build_flow_graph;

pub use build_flow_graph::{BuildFlowGraphUseCase, StructuredFlowAnalyzer};
