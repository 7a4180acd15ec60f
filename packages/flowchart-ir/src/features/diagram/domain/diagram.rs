//! Diagram domain model: the engine's externally visible output

use serde::{Deserialize, Serialize};

use crate::features::shape::domain::Shape;

pub const START_ID: &str = "START";
pub const END_ID: &str = "END";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub shape: Shape,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Ordered node and edge lists for one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub method: String,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// First node whose label matches exactly
    pub fn node_labeled(&self, label: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DiagramEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DiagramEdge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    pub fn count(&self, shape: Shape) -> usize {
        self.nodes.iter().filter(|n| n.shape == shape).count()
    }
}
