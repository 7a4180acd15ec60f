//! CFG finalization
//!
//! Runs once after construction and only removes blocks unreachable from the
//! entry (code after jumps, joins whose arms all jumped away). Join blocks,
//! back edges and edge kinds are left exactly as the builder made them.
//!
//! The exit sentinel is always kept, even if no path reaches it.

use tracing::debug;

use crate::features::flow_graph::domain::ControlFlowGraph;

use super::reachability::reachable_from_entry;

pub fn finalize(cfg: &mut ControlFlowGraph) {
    let pruned = prune_unreachable(cfg);
    debug!(
        method = %cfg.method,
        pruned,
        blocks = cfg.len(),
        "finalized cfg"
    );
}

/// Remove blocks with no path from the entry. Returns the number removed.
pub fn prune_unreachable(cfg: &mut ControlFlowGraph) -> usize {
    let reachable = reachable_from_entry(cfg);
    let exit = cfg.exit;
    let before = cfg.len();
    cfg.retain_blocks(|id| id == exit || reachable.contains(&id));
    before - cfg.len()
}
