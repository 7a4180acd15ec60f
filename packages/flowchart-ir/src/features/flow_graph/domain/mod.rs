pub mod cfg;

pub use cfg::{BasicBlock, BlockId, BlockKind, Condition, ControlFlowGraph, EdgeKind, Successor};
