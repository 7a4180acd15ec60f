use crate::features::flow_graph::domain::ControlFlowGraph;
use crate::features::flow_graph::infrastructure::build_cfg;
use crate::features::flow_graph::ports::FlowAnalyzer;
use crate::features::parsing::domain::ast::MethodDecl;
use crate::shared::models::Result;

/// Default analyzer: the recursive builder followed by finalization
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredFlowAnalyzer;

impl FlowAnalyzer for StructuredFlowAnalyzer {
    fn build_cfg(&self, method: &MethodDecl) -> Result<ControlFlowGraph> {
        build_cfg(method)
    }
}

pub struct BuildFlowGraphUseCase<A: FlowAnalyzer> {
    analyzer: A,
}

impl<A: FlowAnalyzer> BuildFlowGraphUseCase<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub fn execute(&self, method: &MethodDecl) -> Result<ControlFlowGraph> {
        self.analyzer.build_cfg(method)
    }
}

impl Default for BuildFlowGraphUseCase<StructuredFlowAnalyzer> {
    fn default() -> Self {
        Self::new(StructuredFlowAnalyzer)
    }
}
