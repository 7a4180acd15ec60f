//! Shape domain model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::flow_graph::domain::{BlockId, EdgeKind};

/// Diagram shape category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Start,
    End,
    Process,
    Io,
    Decision,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Start => "start",
            Shape::End => "end",
            Shape::Process => "process",
            Shape::Io => "io",
            Shape::Decision => "decision",
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Shape::Start | Shape::End)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CFG block, or one part of a block the classifier split.
///
/// Ordering is creation order of the block, then position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey {
    pub block: BlockId,
    pub part: usize,
}

impl NodeKey {
    pub fn new(block: BlockId, part: usize) -> Self {
        Self { block, part }
    }

    pub fn first(block: BlockId) -> Self {
        Self::new(block, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedNode {
    pub key: NodeKey,
    pub shape: Shape,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedEdge {
    pub from: NodeKey,
    pub to: NodeKey,
    pub kind: EdgeKind,
}

/// CFG with one shape per node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedCfg {
    pub method: String,
    pub start: NodeKey,
    pub end: NodeKey,
    /// Sorted by key
    pub nodes: Vec<ClassifiedNode>,
    /// Grouped by source in key order, each group in successor order
    pub edges: Vec<ClassifiedEdge>,
}

impl ClassifiedCfg {
    pub fn node(&self, key: NodeKey) -> Option<&ClassifiedNode> {
        self.nodes
            .binary_search_by_key(&key, |n| n.key)
            .ok()
            .map(|i| &self.nodes[i])
    }

    pub fn outgoing(&self, key: NodeKey) -> impl Iterator<Item = &ClassifiedEdge> {
        self.edges.iter().filter(move |e| e.from == key)
    }

    pub fn count(&self, shape: Shape) -> usize {
        self.nodes.iter().filter(|n| n.shape == shape).count()
    }
}
