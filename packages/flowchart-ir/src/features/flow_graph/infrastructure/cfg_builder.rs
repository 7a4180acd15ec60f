/*
 * CFG Builder
 *
 * Single recursive pass over a method body. Two pieces of state are threaded
 * through the recursion:
 * - `current`: the basic block statements are appended to
 * - `frames`: the enclosing loop/switch frames, innermost last
 *
 * Jumps (`break`, `continue`, `return`) end the current block with an edge to
 * their resolved target and continue in a fresh block with no predecessors.
 * Anything appended there is unreachable and removed by `finalize`.
 */

use tracing::{debug, trace};

use crate::features::flow_graph::domain::{
    BlockId, BlockKind, Condition, ControlFlowGraph, EdgeKind,
};
use crate::features::parsing::domain::ast::*;
use crate::shared::models::{ErrorKind, FlowchartError, Location, Result};

use super::finalize::finalize;

/// Build the finalized CFG of one method
pub fn build_cfg(method: &MethodDecl) -> Result<ControlFlowGraph> {
    let mut cfg = CfgBuilder::new(&method.name).build(&method.body)?;
    finalize(&mut cfg);
    Ok(cfg)
}

/// Enclosing loop or switch
#[derive(Debug)]
struct Frame {
    label: Option<String>,
    break_target: BlockId,
    /// `None` for a switch, which `continue` passes through
    continue_target: Option<BlockId>,
}

pub struct CfgBuilder {
    cfg: ControlFlowGraph,
    current: BlockId,
    frames: Vec<Frame>,
    /// Label seen on a `Labeled` statement, taken by the loop it wraps
    pending_label: Option<String>,
}

impl CfgBuilder {
    pub fn new(method: &str) -> Self {
        let mut cfg = ControlFlowGraph::new(method);
        let first = cfg.add_block(BlockKind::Basic);
        cfg.add_edge(cfg.entry, first, EdgeKind::Unconditional);
        Self {
            cfg,
            current: first,
            frames: Vec::new(),
            pending_label: None,
        }
    }

    /// Build the raw graph. Dead blocks and empty joins are still present;
    /// see `finalize`.
    pub fn build(mut self, body: &[Statement]) -> Result<ControlFlowGraph> {
        self.visit_all(body)?;
        let exit = self.cfg.exit;
        self.cfg.add_edge(self.current, exit, EdgeKind::Unconditional);
        debug!(
            method = %self.cfg.method,
            blocks = self.cfg.len(),
            edges = self.cfg.edge_count(),
            "built raw cfg"
        );
        Ok(self.cfg)
    }

    fn new_block(&mut self) -> BlockId {
        self.cfg.add_block(BlockKind::Basic)
    }

    fn new_decision(&mut self, condition: Condition) -> BlockId {
        self.cfg.add_block(BlockKind::Decision(condition))
    }

    /// Edge from the current block to `target`
    fn flow_into(&mut self, target: BlockId, kind: EdgeKind) {
        self.cfg.add_edge(self.current, target, kind);
    }

    /// After a jump, keep appending into an unreachable block
    fn start_dead_block(&mut self) {
        self.current = self.new_block();
    }

    fn visit_all(&mut self, stmts: &[Statement]) -> Result<()> {
        for stmt in stmts {
            self.visit(stmt)?;
        }
        Ok(())
    }

    fn visit(&mut self, stmt: &Statement) -> Result<()> {
        match &stmt.kind {
            StmtKind::VarDecl(_)
            | StmtKind::Assign { .. }
            | StmtKind::Expr(_)
            | StmtKind::Print(_)
            | StmtKind::Read(_) => {
                self.cfg.push_statement(self.current, stmt.clone());
            }
            StmtKind::Return(_) => {
                self.cfg.push_statement(self.current, stmt.clone());
                let exit = self.cfg.exit;
                self.flow_into(exit, EdgeKind::Unconditional);
                self.start_dead_block();
            }
            StmtKind::Block(stmts) => self.visit_all(stmts)?,
            StmtKind::Empty => {}
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.visit_if(cond, then_branch, else_branch.as_deref())?,
            StmtKind::While { cond, body } => {
                let label = self.pending_label.take();
                self.visit_pretest_loop(Condition::Test(cond.clone()), body, label)?;
            }
            StmtKind::ForEach {
                ty,
                var,
                iterable,
                body,
            } => {
                let label = self.pending_label.take();
                let condition = Condition::ForEach {
                    ty: ty.clone(),
                    var: var.clone(),
                    iterable: iterable.clone(),
                };
                self.visit_pretest_loop(condition, body, label)?;
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                let label = self.pending_label.take();
                self.visit_for(init, cond.as_ref(), update, body, stmt, label)?;
            }
            StmtKind::DoWhile { body, cond } => {
                let label = self.pending_label.take();
                self.visit_do_while(body, cond, label)?;
            }
            StmtKind::Switch { scrutinee, cases } => self.visit_switch(scrutinee, cases)?,
            StmtKind::Labeled { label, body } => {
                self.pending_label = Some(label.clone());
                self.visit(body)?;
                self.pending_label = None;
            }
            StmtKind::Break(label) => {
                let target = self.resolve_break(label.as_deref(), stmt.span.start())?;
                trace!(from = %self.current, to = %target, "break");
                self.flow_into(target, EdgeKind::Unconditional);
                self.start_dead_block();
            }
            StmtKind::Continue(label) => {
                let target = self.resolve_continue(label.as_deref(), stmt.span.start())?;
                trace!(from = %self.current, to = %target, "continue");
                self.flow_into(target, EdgeKind::Unconditional);
                self.start_dead_block();
            }
        }
        Ok(())
    }

    fn visit_if(
        &mut self,
        cond: &Expr,
        then_branch: &Statement,
        else_branch: Option<&Statement>,
    ) -> Result<()> {
        let decision = self.new_decision(Condition::Test(cond.clone()));
        self.flow_into(decision, EdgeKind::Unconditional);

        let then_block = self.new_block();
        self.cfg.add_edge(decision, then_block, EdgeKind::TrueBranch);
        self.current = then_block;
        self.visit(then_branch)?;
        let then_end = self.current;

        let else_end = match else_branch {
            Some(else_branch) => {
                let else_block = self.new_block();
                self.cfg.add_edge(decision, else_block, EdgeKind::FalseBranch);
                self.current = else_block;
                self.visit(else_branch)?;
                Some(self.current)
            }
            None => None,
        };

        let join = self.new_block();
        self.cfg.add_edge(then_end, join, EdgeKind::Unconditional);
        match else_end {
            Some(end) => self.cfg.add_edge(end, join, EdgeKind::Unconditional),
            None => self.cfg.add_edge(decision, join, EdgeKind::FalseBranch),
        }
        self.current = join;
        Ok(())
    }

    /// `while` and for-each: header decides, body loops back to the header
    fn visit_pretest_loop(
        &mut self,
        condition: Condition,
        body: &Statement,
        label: Option<String>,
    ) -> Result<()> {
        let header = self.new_decision(condition);
        self.flow_into(header, EdgeKind::Unconditional);
        let body_block = self.new_block();
        let after = self.new_block();
        self.cfg.add_edge(header, body_block, EdgeKind::TrueBranch);
        self.cfg.add_edge(header, after, EdgeKind::FalseBranch);

        self.frames.push(Frame {
            label,
            break_target: after,
            continue_target: Some(header),
        });
        self.current = body_block;
        self.visit(body)?;
        self.flow_into(header, EdgeKind::LoopBack);
        self.frames.pop();

        self.current = after;
        Ok(())
    }

    /// Init runs in the current block; updates get their own block, which is
    /// the `continue` target and owns the back edge.
    fn visit_for(
        &mut self,
        init: &[Statement],
        cond: Option<&Expr>,
        update: &[Expr],
        body: &Statement,
        stmt: &Statement,
        label: Option<String>,
    ) -> Result<()> {
        self.visit_all(init)?;

        let test = cond.cloned().unwrap_or(Expr::Bool(true));
        let header = self.new_decision(Condition::Test(test));
        self.flow_into(header, EdgeKind::Unconditional);
        let body_block = self.new_block();
        let update_block = if update.is_empty() {
            None
        } else {
            let block = self.new_block();
            for expr in update {
                self.cfg
                    .push_statement(block, Statement::new(update_statement(expr), stmt.span));
            }
            Some(block)
        };
        let after = self.new_block();
        self.cfg.add_edge(header, body_block, EdgeKind::TrueBranch);
        self.cfg.add_edge(header, after, EdgeKind::FalseBranch);

        self.frames.push(Frame {
            label,
            break_target: after,
            continue_target: Some(update_block.unwrap_or(header)),
        });
        self.current = body_block;
        self.visit(body)?;
        match update_block {
            Some(block) => {
                self.flow_into(block, EdgeKind::Unconditional);
                self.cfg.add_edge(block, header, EdgeKind::LoopBack);
            }
            None => self.flow_into(header, EdgeKind::LoopBack),
        }
        self.frames.pop();

        self.current = after;
        Ok(())
    }

    /// Body first, then the test; the back edge targets the body start
    fn visit_do_while(
        &mut self,
        body: &Statement,
        cond: &Expr,
        label: Option<String>,
    ) -> Result<()> {
        let body_block = self.new_block();
        self.flow_into(body_block, EdgeKind::Unconditional);
        let test = self.new_decision(Condition::Test(cond.clone()));
        let after = self.new_block();

        self.frames.push(Frame {
            label,
            break_target: after,
            continue_target: Some(test),
        });
        self.current = body_block;
        self.visit(body)?;
        self.flow_into(test, EdgeKind::Unconditional);
        self.frames.pop();

        self.cfg.add_edge(test, body_block, EdgeKind::LoopBack);
        self.cfg.add_edge(test, after, EdgeKind::FalseBranch);
        self.current = after;
        Ok(())
    }

    fn visit_switch(&mut self, scrutinee: &Expr, cases: &[Case]) -> Result<()> {
        let decision = self.new_decision(Condition::Switch(scrutinee.clone()));
        self.flow_into(decision, EdgeKind::Unconditional);

        let case_blocks: Vec<BlockId> = cases.iter().map(|_| self.new_block()).collect();
        let after = self.new_block();

        for (case, &block) in cases.iter().zip(&case_blocks) {
            let kind = match &case.label {
                CaseLabel::Value(value) => EdgeKind::CaseMatch(value.to_string()),
                CaseLabel::Default => EdgeKind::SwitchDefault,
            };
            self.cfg.add_edge(decision, block, kind);
        }
        if !cases.iter().any(|c| c.label == CaseLabel::Default) {
            self.cfg.add_edge(decision, after, EdgeKind::SwitchDefault);
        }

        self.frames.push(Frame {
            label: self.pending_label.take(),
            break_target: after,
            continue_target: None,
        });
        for (i, case) in cases.iter().enumerate() {
            self.current = case_blocks[i];
            self.visit_all(&case.body)?;
            // A case that did not jump falls into the next one
            match case_blocks.get(i + 1) {
                Some(&next) => self.flow_into(next, EdgeKind::Fallthrough),
                None => self.flow_into(after, EdgeKind::Unconditional),
            }
        }
        self.frames.pop();

        self.current = after;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Jump resolution
    // ------------------------------------------------------------------------

    fn resolve_break(&self, label: Option<&str>, at: Location) -> Result<BlockId> {
        match label {
            None => self
                .frames
                .last()
                .map(|f| f.break_target)
                .ok_or_else(|| jump_outside("break outside of loop or switch", at)),
            Some(label) => self
                .find_labeled(label)
                .map(|f| f.break_target)
                .ok_or_else(|| FlowchartError::unresolved_label(label, at)),
        }
    }

    fn resolve_continue(&self, label: Option<&str>, at: Location) -> Result<BlockId> {
        match label {
            None => self
                .frames
                .iter()
                .rev()
                .find_map(|f| f.continue_target)
                .ok_or_else(|| jump_outside("continue outside of loop", at)),
            Some(label) => self
                .find_labeled(label)
                .and_then(|f| f.continue_target)
                .ok_or_else(|| FlowchartError::unresolved_label(label, at)),
        }
    }

    fn find_labeled(&self, label: &str) -> Option<&Frame> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.label.as_deref() == Some(label))
    }
}

fn jump_outside(message: &str, at: Location) -> FlowchartError {
    FlowchartError::new(ErrorKind::JumpOutsideLoop, message, at)
}

fn update_statement(expr: &Expr) -> StmtKind {
    match expr {
        Expr::Assign { target, op, value } => StmtKind::Assign {
            target: (**target).clone(),
            op: *op,
            value: (**value).clone(),
        },
        other => StmtKind::Expr(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::parse_source;
    use crate::shared::models::Stage;

    fn raw_cfg(body: &str) -> Result<ControlFlowGraph> {
        let source = format!("class T {{ static void main() {{ {} }} }}", body);
        let program = parse_source(&source)?;
        CfgBuilder::new("main").build(&program.methods[0].body)
    }

    fn decisions(cfg: &ControlFlowGraph) -> Vec<String> {
        cfg.blocks()
            .iter()
            .filter_map(|b| match &b.kind {
                BlockKind::Decision(c) => Some(c.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_straight_line_stays_in_one_block() {
        let cfg = raw_cfg("int a = 1; a = a + 1; System.out.println(a);").unwrap();
        // entry, exit, first block
        assert_eq!(cfg.len(), 3);
        assert_eq!(cfg.blocks()[2].statements.len(), 3);
    }

    #[test]
    fn test_if_else_shape() {
        let cfg = raw_cfg("if (a > b) x = 1; else x = 2;").unwrap();
        assert_eq!(decisions(&cfg), vec!["a > b"]);
        let decision = cfg.blocks().iter().find(|b| b.is_decision()).unwrap();
        let kinds: Vec<_> = decision.successors.iter().map(|s| &s.kind).collect();
        assert_eq!(kinds, vec![&EdgeKind::TrueBranch, &EdgeKind::FalseBranch]);
    }

    #[test]
    fn test_while_has_single_back_edge() {
        let cfg = raw_cfg("while (j <= 3) { j++; }").unwrap();
        let back: Vec<_> = cfg
            .edges()
            .filter(|(_, _, k)| **k == EdgeKind::LoopBack)
            .collect();
        assert_eq!(back.len(), 1);
        let header = cfg.blocks().iter().find(|b| b.is_decision()).unwrap().id;
        assert_eq!(back[0].1, header);
    }

    #[test]
    fn test_for_continue_targets_update_block() {
        let cfg = raw_cfg("for (int i = 0; i < 3; i++) { if (i == 1) continue; x(); }").unwrap();
        let update = cfg
            .blocks()
            .iter()
            .find(|b| b.statements.first().map(|s| s.to_string()) == Some("i++".to_string()))
            .unwrap();
        // fall-through and `continue` both enter the update block
        assert_eq!(cfg.predecessors(update.id).len(), 2);
        assert_eq!(update.successors[0].kind, EdgeKind::LoopBack);
    }

    #[test]
    fn test_do_while_continue_targets_condition() {
        let cfg = raw_cfg("do { if (a) continue; b(); } while (i < 5);").unwrap();
        let test = cfg
            .blocks()
            .iter()
            .find(|b| matches!(&b.kind, BlockKind::Decision(c) if c.to_string() == "i < 5"))
            .unwrap();
        assert_eq!(cfg.predecessors(test.id).len(), 2);
        assert_eq!(test.successors[0].kind, EdgeKind::LoopBack);
        assert_eq!(test.successors[1].kind, EdgeKind::FalseBranch);
    }

    #[test]
    fn test_labeled_break_skips_inner_frame() {
        let cfg = raw_cfg(
            "outer: for (int i = 0; i < 2; i++) { for (int m = 0; m < 3; m++) { break outer; } }",
        )
        .unwrap();
        let outer_header = cfg.blocks().iter().find(|b| b.is_decision()).unwrap();
        let outer_after = outer_header.successors[1].target;
        let breaks: Vec<_> = cfg
            .predecessors(outer_after)
            .into_iter()
            .filter(|(from, _)| *from != outer_header.id)
            .collect();
        assert_eq!(breaks.len(), 1);
    }

    #[test]
    fn test_switch_edges() {
        let cfg = raw_cfg("switch (d) { case 1: a(); break; case 2: b(); }").unwrap();
        let decision = cfg.blocks().iter().find(|b| b.is_decision()).unwrap();
        let kinds: Vec<_> = decision.successors.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                EdgeKind::CaseMatch("1".to_string()),
                EdgeKind::CaseMatch("2".to_string()),
                EdgeKind::SwitchDefault,
            ]
        );
    }

    #[test]
    fn test_unresolved_label() {
        let err = raw_cfg("while (a) { break missing; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnresolvedLabel);
        assert_eq!(err.stage, Stage::Build);
        assert!(err.message.contains("missing"));
        assert!(err.line > 0);
    }

    #[test]
    fn test_continue_to_switch_label_is_unresolved() {
        // only loops take labels, so a label on a switch never exists; a
        // labeled continue whose loop is not enclosing fails the same way
        let err = raw_cfg("a: while (x) { } while (y) { continue a; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnresolvedLabel);
    }

    #[test]
    fn test_jump_outside_loop() {
        let err = raw_cfg("x = 1; break;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::JumpOutsideLoop);
        let err = raw_cfg("switch (d) { case 1: continue; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::JumpOutsideLoop);
    }

    #[test]
    fn test_continue_inside_switch_reaches_loop() {
        let cfg = raw_cfg("while (a) { switch (d) { case 1: continue; } }");
        assert!(cfg.is_ok());
    }
}
