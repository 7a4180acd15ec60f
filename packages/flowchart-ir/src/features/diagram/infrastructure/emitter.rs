/*
 * Diagram Emitter
 *
 * Linearizes a classified CFG by breadth-first traversal from `start`.
 * Newly discovered successors are queued in node-key order (block creation
 * order, then split position), so identical input always yields identical
 * output. Node ids are `START`, `END`, and `N1..` in visit order.
 */

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::debug;

use crate::features::diagram::domain::{Diagram, DiagramEdge, DiagramNode, END_ID, START_ID};
use crate::features::flow_graph::domain::EdgeKind;
use crate::features::shape::domain::{ClassifiedCfg, ClassifiedEdge, NodeKey, Shape};

pub fn emit(cfg: &ClassifiedCfg) -> Diagram {
    let mut adjacency: FxHashMap<NodeKey, Vec<&ClassifiedEdge>> = FxHashMap::default();
    for edge in &cfg.edges {
        adjacency.entry(edge.from).or_default().push(edge);
    }

    let order = bfs_order(cfg, &adjacency);

    let mut ids: FxHashMap<NodeKey, String> = FxHashMap::default();
    let mut counter = 0usize;
    for key in &order {
        let id = if *key == cfg.start {
            START_ID.to_string()
        } else if *key == cfg.end {
            END_ID.to_string()
        } else {
            counter += 1;
            format!("N{}", counter)
        };
        ids.insert(*key, id);
    }

    let mut nodes = Vec::with_capacity(order.len());
    let mut edges = Vec::new();
    for key in &order {
        let Some(node) = cfg.node(*key) else {
            continue;
        };
        let from = ids[key].clone();
        nodes.push(DiagramNode {
            id: from.clone(),
            shape: node.shape,
            label: node.label.clone(),
        });
        for edge in adjacency.get(key).into_iter().flatten() {
            let Some(to) = ids.get(&edge.to) else {
                continue;
            };
            edges.push(DiagramEdge {
                from: from.clone(),
                to: to.clone(),
                label: edge_label(&edge.kind, node.shape == Shape::Decision),
            });
        }
    }

    debug!(
        method = %cfg.method,
        nodes = nodes.len(),
        edges = edges.len(),
        "emitted diagram"
    );
    Diagram {
        method: cfg.method.clone(),
        nodes,
        edges,
    }
}

/// Visit order; `end` is appended if no path reaches it
fn bfs_order(
    cfg: &ClassifiedCfg,
    adjacency: &FxHashMap<NodeKey, Vec<&ClassifiedEdge>>,
) -> Vec<NodeKey> {
    let mut order = Vec::with_capacity(cfg.nodes.len());
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();
    seen.insert(cfg.start);
    queue.push_back(cfg.start);

    while let Some(key) = queue.pop_front() {
        order.push(key);
        let mut next: Vec<NodeKey> = adjacency
            .get(&key)
            .into_iter()
            .flatten()
            .map(|e| e.to)
            .filter(|k| !seen.contains(k))
            .collect();
        next.sort();
        next.dedup();
        for k in next {
            seen.insert(k);
            queue.push_back(k);
        }
    }

    if !seen.contains(&cfg.end) {
        order.push(cfg.end);
    }
    order
}

/// Branch that produced an edge: `true`/`false` out of decisions, the case
/// constant, `default`; nothing for plain flow
pub fn edge_label(kind: &EdgeKind, from_decision: bool) -> Option<String> {
    match kind {
        EdgeKind::TrueBranch => Some("true".to_string()),
        EdgeKind::FalseBranch => Some("false".to_string()),
        EdgeKind::CaseMatch(value) => Some(value.clone()),
        EdgeKind::SwitchDefault => Some("default".to_string()),
        // do-while repeats when its test holds
        EdgeKind::LoopBack if from_decision => Some("true".to_string()),
        EdgeKind::LoopBack | EdgeKind::Unconditional | EdgeKind::Fallthrough => None,
    }
}
