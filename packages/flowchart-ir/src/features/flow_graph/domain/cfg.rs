//! Control flow graph domain model
//!
//! Blocks live in a vector ordered by id. Ids are assigned monotonically at
//! creation and never reused, so the vector stays sorted after pruning and the
//! id doubles as the creation-order tie breaker for emission.

use serde::Serialize;
use std::fmt;

use crate::features::parsing::domain::ast::{Expr, Statement, TypeName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// Why control may move along an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum EdgeKind {
    Unconditional,
    TrueBranch,
    FalseBranch,
    LoopBack,
    /// Switch case, carrying the rendered case constant
    CaseMatch(String),
    Fallthrough,
    SwitchDefault,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Unconditional => "unconditional",
            EdgeKind::TrueBranch => "true_branch",
            EdgeKind::FalseBranch => "false_branch",
            EdgeKind::LoopBack => "loop_back",
            EdgeKind::CaseMatch(_) => "case_match",
            EdgeKind::Fallthrough => "fallthrough",
            EdgeKind::SwitchDefault => "switch_default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Successor {
    pub target: BlockId,
    pub kind: EdgeKind,
}

/// What a decision block tests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Condition {
    /// `if`, `while`, `for` and `do-while` conditions
    Test(Expr),
    ForEach {
        ty: TypeName,
        var: String,
        iterable: Expr,
    },
    Switch(Expr),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Test(expr) => write!(f, "{}", expr),
            Condition::ForEach { ty, var, iterable } => {
                write!(f, "{} {} : {}", ty, var, iterable)
            }
            Condition::Switch(expr) => write!(f, "switch ({})", expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlockKind {
    /// Synthetic start sentinel
    Entry,
    /// Synthetic end sentinel
    Exit,
    /// Straight-line statements
    Basic,
    Decision(Condition),
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Entry => "entry",
            BlockKind::Exit => "exit",
            BlockKind::Basic => "basic",
            BlockKind::Decision(_) => "decision",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Leaf statements in source order; always empty for sentinels and decisions
    pub statements: Vec<Statement>,
    /// Outgoing edges in insertion order
    pub successors: Vec<Successor>,
}

impl BasicBlock {
    pub fn is_decision(&self) -> bool {
        matches!(self.kind, BlockKind::Decision(_))
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, BlockKind::Entry | BlockKind::Exit)
    }

    pub fn is_empty_basic(&self) -> bool {
        self.kind == BlockKind::Basic && self.statements.is_empty()
    }
}

/// Control flow graph of one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlFlowGraph {
    pub method: String,
    pub entry: BlockId,
    pub exit: BlockId,
    blocks: Vec<BasicBlock>,
    next_id: usize,
}

impl ControlFlowGraph {
    /// New graph holding only the entry and exit sentinels
    pub fn new(method: impl Into<String>) -> Self {
        let mut cfg = Self {
            method: method.into(),
            entry: BlockId(0),
            exit: BlockId(1),
            blocks: Vec::new(),
            next_id: 0,
        };
        cfg.entry = cfg.add_block(BlockKind::Entry);
        cfg.exit = cfg.add_block(BlockKind::Exit);
        cfg
    }

    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.push(BasicBlock {
            id,
            kind,
            statements: Vec::new(),
            successors: Vec::new(),
        });
        id
    }

    pub fn add_edge(&mut self, from: BlockId, to: BlockId, kind: EdgeKind) {
        if let Some(block) = self.block_mut(from) {
            block.successors.push(Successor { target: to, kind });
        }
    }

    pub fn push_statement(&mut self, id: BlockId, stmt: Statement) {
        if let Some(block) = self.block_mut(id) {
            block.statements.push(stmt);
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.blocks[i])
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        match self.blocks.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => Some(&mut self.blocks[i]),
            Err(_) => None,
        }
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [BasicBlock] {
        &mut self.blocks
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    pub fn successors(&self, id: BlockId) -> &[Successor] {
        self.block(id).map(|b| b.successors.as_slice()).unwrap_or(&[])
    }

    /// Incoming edges as `(source, kind)`, ordered by source id
    pub fn predecessors(&self, id: BlockId) -> Vec<(BlockId, &EdgeKind)> {
        self.blocks
            .iter()
            .flat_map(|b| {
                b.successors
                    .iter()
                    .filter(move |s| s.target == id)
                    .map(move |s| (b.id, &s.kind))
            })
            .collect()
    }

    /// All edges as `(from, to, kind)`, ordered by source id then insertion
    pub fn edges(&self) -> impl Iterator<Item = (BlockId, BlockId, &EdgeKind)> {
        self.blocks
            .iter()
            .flat_map(|b| b.successors.iter().map(move |s| (b.id, s.target, &s.kind)))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.blocks.iter().map(|b| b.successors.len()).sum()
    }

    pub fn decision_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_decision()).count()
    }

    /// Drop every block not in `keep`, along with edges pointing at them
    pub fn retain_blocks(&mut self, keep: impl Fn(BlockId) -> bool) {
        self.blocks.retain(|b| keep(b.id));
        for block in &mut self.blocks {
            block.successors.retain(|s| keep(s.target));
        }
    }
}
