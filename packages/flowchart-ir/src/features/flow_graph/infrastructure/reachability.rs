//! Graph queries over a CFG, backed by petgraph

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::flow_graph::domain::{BlockId, ControlFlowGraph, EdgeKind};

/// petgraph view of a CFG plus the block-to-node index
pub struct CfgGraph {
    pub graph: DiGraph<BlockId, EdgeKind>,
    pub index: FxHashMap<BlockId, NodeIndex>,
}

impl CfgGraph {
    pub fn from_cfg(cfg: &ControlFlowGraph) -> Self {
        let mut graph = DiGraph::with_capacity(cfg.len(), cfg.edge_count());
        let mut index = FxHashMap::default();
        for block in cfg.blocks() {
            index.insert(block.id, graph.add_node(block.id));
        }
        for (from, to, kind) in cfg.edges() {
            if let (Some(&a), Some(&b)) = (index.get(&from), index.get(&to)) {
                graph.add_edge(a, b, kind.clone());
            }
        }
        Self { graph, index }
    }

    /// Blocks reachable from `start` following edges forward
    pub fn reachable_from(&self, start: BlockId) -> FxHashSet<BlockId> {
        let mut seen = FxHashSet::default();
        let Some(&root) = self.index.get(&start) else {
            return seen;
        };
        let mut dfs = Dfs::new(&self.graph, root);
        while let Some(node) = dfs.next(&self.graph) {
            seen.insert(self.graph[node]);
        }
        seen
    }

    /// Blocks from which `target` is reachable
    pub fn reaching(&self, target: BlockId) -> FxHashSet<BlockId> {
        let mut seen = FxHashSet::default();
        let Some(&root) = self.index.get(&target) else {
            return seen;
        };
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, root);
        while let Some(node) = dfs.next(reversed) {
            seen.insert(self.graph[node]);
        }
        seen
    }
}

pub fn reachable_from_entry(cfg: &ControlFlowGraph) -> FxHashSet<BlockId> {
    CfgGraph::from_cfg(cfg).reachable_from(cfg.entry)
}

pub fn reaching_exit(cfg: &ControlFlowGraph) -> FxHashSet<BlockId> {
    CfgGraph::from_cfg(cfg).reaching(cfg.exit)
}
