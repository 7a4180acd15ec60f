//! Shape classifier
//!
//! Structural, never textual:
//! - entry/exit sentinels become `start`/`end`
//! - decision blocks become `decision`
//! - basic blocks split into maximal runs, each `print`/`read` alone as `io`
//!   and consecutive other statements grouped as one `process`
//!
//! Splitting only ever subdivides a block. Its first part keeps the block's
//! incoming edges, its last part the outgoing ones, and the parts are chained
//! with unconditional edges.
//!
//! Empty basic blocks with a single successor (joins, empty arms and bodies)
//! get no node. Edges into them are redirected to where they lead, keeping
//! their own kind unless it is `unconditional`, in which case they take the
//! skipped block's outgoing kind. The CFG itself is never modified.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::features::flow_graph::domain::{
    BasicBlock, BlockId, BlockKind, ControlFlowGraph, EdgeKind, Successor,
};
use crate::features::parsing::domain::ast::Statement;
use crate::features::shape::domain::{
    ClassifiedCfg, ClassifiedEdge, ClassifiedNode, NodeKey, Shape,
};

pub fn classify(cfg: &ControlFlowGraph) -> ClassifiedCfg {
    let mut nodes = Vec::with_capacity(cfg.len());
    let mut edges = Vec::with_capacity(cfg.edge_count());

    let skipped = skippable_blocks(cfg);

    for block in cfg.blocks() {
        if skipped.contains_key(&block.id) {
            continue;
        }
        let parts = split_block(block);
        let last = NodeKey::new(block.id, parts.len().saturating_sub(1));

        for (i, (shape, label)) in parts.into_iter().enumerate() {
            let key = NodeKey::new(block.id, i);
            if i > 0 {
                edges.push(ClassifiedEdge {
                    from: NodeKey::new(block.id, i - 1),
                    to: key,
                    kind: EdgeKind::Unconditional,
                });
            }
            nodes.push(ClassifiedNode { key, shape, label });
        }
        let mut outgoing: Vec<Successor> = Vec::with_capacity(block.successors.len());
        for succ in &block.successors {
            let resolved = skip_through(&skipped, succ.clone());
            if !outgoing.contains(&resolved) {
                outgoing.push(resolved);
            }
        }
        for succ in outgoing {
            edges.push(ClassifiedEdge {
                from: last,
                to: NodeKey::first(succ.target),
                kind: succ.kind,
            });
        }
    }

    trace!(
        blocks = cfg.len(),
        skipped = skipped.len(),
        nodes = nodes.len(),
        "classified cfg"
    );
    ClassifiedCfg {
        method: cfg.method.clone(),
        start: NodeKey::first(cfg.entry),
        end: NodeKey::first(cfg.exit),
        nodes,
        edges,
    }
}

/// Empty basic blocks with one successor, mapped to that successor
fn skippable_blocks(cfg: &ControlFlowGraph) -> FxHashMap<BlockId, Successor> {
    cfg.blocks()
        .iter()
        .filter(|b| b.is_empty_basic() && b.successors.len() == 1)
        .filter(|b| b.successors[0].target != b.id)
        .map(|b| (b.id, b.successors[0].clone()))
        .collect()
}

fn skip_through(skipped: &FxHashMap<BlockId, Successor>, mut succ: Successor) -> Successor {
    let mut seen = FxHashSet::default();
    while let Some(next) = skipped.get(&succ.target) {
        // a cycle made only of empty blocks keeps its last hop
        if !seen.insert(succ.target) {
            break;
        }
        let kind = match succ.kind {
            EdgeKind::Unconditional => next.kind.clone(),
            kind => kind,
        };
        succ = Successor {
            target: next.target,
            kind,
        };
    }
    succ
}

/// Shape and label of each part of a block, in order; never empty
fn split_block(block: &BasicBlock) -> Vec<(Shape, String)> {
    match &block.kind {
        BlockKind::Entry => vec![(Shape::Start, "start".to_string())],
        BlockKind::Exit => vec![(Shape::End, "end".to_string())],
        BlockKind::Decision(condition) => vec![(Shape::Decision, condition.to_string())],
        BlockKind::Basic => {
            let mut parts: Vec<(Shape, String)> = Vec::new();
            let mut run: Vec<&Statement> = Vec::new();
            for stmt in &block.statements {
                if stmt.is_io() {
                    if !run.is_empty() {
                        parts.push((Shape::Process, join_labels(&run)));
                        run.clear();
                    }
                    parts.push((Shape::Io, stmt.to_string()));
                } else {
                    run.push(stmt);
                }
            }
            if !run.is_empty() || parts.is_empty() {
                parts.push((Shape::Process, join_labels(&run)));
            }
            parts
        }
    }
}

fn join_labels(stmts: &[&Statement]) -> String {
    stmts
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
