/*
 * Flowchart Pipeline
 *
 * Chains every stage for a single source unit. Each stage returns its own
 * error and `?` hands it to the caller unchanged. The pipeline holds only the
 * validated configuration, so one instance can serve any number of units,
 * from any number of threads.
 */

use tracing::{debug, info};

use crate::config::{ConfigResult, FlowchartConfig, Validatable};
use crate::features::diagram::{emit, renderer_for, Diagram};
use crate::features::flow_graph::{
    BuildFlowGraphUseCase, ControlFlowGraph, FlowAnalyzer, StructuredFlowAnalyzer,
};
use crate::features::lexing::tokenize;
use crate::features::parsing::{parse, select_entry};
use crate::features::shape::{classify, ClassifiedCfg};
use crate::shared::models::Result;

pub struct FlowchartPipeline<A: FlowAnalyzer = StructuredFlowAnalyzer> {
    config: FlowchartConfig,
    flow_graphs: BuildFlowGraphUseCase<A>,
}

impl FlowchartPipeline<StructuredFlowAnalyzer> {
    /// Validates `config` up front; a bad entry name never reaches the parser
    pub fn new(config: FlowchartConfig) -> ConfigResult<Self> {
        Self::with_analyzer(config, StructuredFlowAnalyzer)
    }
}

impl<A: FlowAnalyzer> FlowchartPipeline<A> {
    pub fn with_analyzer(config: FlowchartConfig, analyzer: A) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            flow_graphs: BuildFlowGraphUseCase::new(analyzer),
        })
    }

    pub fn config(&self) -> &FlowchartConfig {
        &self.config
    }

    /// Finalized CFG of the entry method
    pub fn build_graph(&self, source: &str) -> Result<ControlFlowGraph> {
        let tokens = tokenize(source);
        debug!(tokens = tokens.len(), "lexed source unit");

        let program = parse(tokens)?;
        let method = select_entry(
            &program,
            &self.config.entry_name,
            self.config.fallback_to_first,
        )?;
        self.flow_graphs.execute(method)
    }

    pub fn classify(&self, source: &str) -> Result<ClassifiedCfg> {
        Ok(classify(&self.build_graph(source)?))
    }

    /// Diagram description of the entry method
    pub fn run(&self, source: &str) -> Result<Diagram> {
        let diagram = emit(&self.classify(source)?);
        info!(
            method = %diagram.method,
            nodes = diagram.nodes.len(),
            edges = diagram.edges.len(),
            "flowchart built"
        );
        Ok(diagram)
    }

    /// Diagram serialized in the configured output format
    pub fn render(&self, source: &str) -> Result<String> {
        let diagram = self.run(source)?;
        renderer_for(self.config.format, self.config.direction).render(&diagram)
    }
}
