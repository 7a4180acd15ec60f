use crate::features::flow_graph::domain::ControlFlowGraph;
use crate::features::parsing::domain::ast::MethodDecl;
use crate::shared::models::Result;

/// Turns a method body into a finalized control flow graph
pub trait FlowAnalyzer: Send + Sync {
    fn build_cfg(&self, method: &MethodDecl) -> Result<ControlFlowGraph>;
}
