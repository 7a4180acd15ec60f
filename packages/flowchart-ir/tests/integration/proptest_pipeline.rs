//! Property tests: lexer totality, pipeline determinism, reachability

#[path = "../common/mod.rs"]
mod common;

use common::*;
use flowchart_ir::features::flow_graph::domain::EdgeKind;
use flowchart_ir::features::flow_graph::{reachable_from_entry, reaching_exit};
use flowchart_ir::features::lexing::{tokenize, TokenKind};
use flowchart_ir::{ErrorKind, Stage};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

/// Builds a structured method body from a byte stream. Jumps are only
/// emitted where an enclosing frame accepts them, so every program builds.
struct BodyGen<'a> {
    ops: std::slice::Iter<'a, u8>,
    budget: usize,
    out: String,
}

#[derive(Clone, Copy)]
struct Scope {
    depth: usize,
    in_loop: bool,
    breakable: bool,
}

impl<'a> BodyGen<'a> {
    fn new(ops: &'a [u8]) -> Self {
        Self {
            ops: ops.iter(),
            budget: 40,
            out: String::new(),
        }
    }

    fn next(&mut self) -> u8 {
        self.ops.next().copied().unwrap_or(0)
    }

    fn block(&mut self, scope: Scope) {
        self.out.push_str("{ ");
        let count = self.next() % 3 + 1;
        for _ in 0..count {
            self.statement(scope);
        }
        self.out.push_str("} ");
    }

    fn statement(&mut self, scope: Scope) {
        if self.budget == 0 {
            self.out.push_str("x++; ");
            return;
        }
        self.budget -= 1;
        let nested = Scope {
            depth: scope.depth + 1,
            ..scope
        };
        let looped = Scope {
            depth: scope.depth + 1,
            in_loop: true,
            breakable: true,
        };
        let op = if scope.depth >= 3 {
            self.next() % 4
        } else {
            self.next() % 12
        };
        match op {
            0 => self.out.push_str("x = x + 1; "),
            1 => self.out.push_str("System.out.println(x); "),
            2 => self.out.push_str("y = sc.nextInt(); "),
            3 => self.out.push_str("return; "),
            4 => {
                self.out.push_str("if (x > 2) ");
                self.block(nested);
            }
            5 => {
                self.out.push_str("if (x < y) ");
                self.block(nested);
                self.out.push_str("else ");
                self.block(nested);
            }
            6 => {
                self.out.push_str("while (x < 10) ");
                self.block(looped);
            }
            7 => {
                self.out.push_str("for (int i = 0; i < y; i++) ");
                self.block(looped);
            }
            8 => {
                self.out.push_str("do ");
                self.block(looped);
                self.out.push_str("while (y > 0); ");
            }
            9 => {
                let switched = Scope {
                    breakable: true,
                    ..nested
                };
                self.out.push_str("switch (x) { case 1: ");
                self.statement(switched);
                self.out.push_str("case 2: ");
                self.statement(switched);
                self.out.push_str("break; default: ");
                self.statement(switched);
                self.out.push_str("} ");
            }
            10 if scope.breakable => self.out.push_str("break; "),
            11 if scope.in_loop => self.out.push_str("continue; "),
            _ => self.out.push_str("y--; "),
        }
    }
}

fn structured_body(ops: &[u8]) -> String {
    let mut gen = BodyGen::new(ops);
    let top = Scope {
        depth: 0,
        in_loop: false,
        breakable: false,
    };
    let count = gen.next() % 4 + 1;
    for _ in 0..count {
        gen.statement(top);
    }
    gen.out
}

proptest! {
    #[test]
    fn test_lexer_is_total(source in "\\PC{0,200}") {
        let tokens = tokenize(&source);
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
        prop_assert_eq!(tokenize(&source), tokens);
    }

    #[test]
    fn test_arbitrary_text_never_panics(source in "[a-z{}();=+<> \\n\"#@0-9]{0,120}") {
        if let Err(err) = pipeline().run(&source) {
            prop_assert!(matches!(err.stage, Stage::Lex | Stage::Parse | Stage::Build));
        }
    }

    #[test]
    fn test_unrecognized_character_located(prefix in "[a-z ]{0,20}") {
        let source = method_body(&format!("int {}x = 1 ` 2;", prefix.trim().replace(' ', "")));
        let err = pipeline().run(&source).unwrap_err();
        prop_assert_eq!(err.kind, ErrorKind::Lex);
        prop_assert_eq!(err.line, 3);
    }

    #[test]
    fn test_structured_programs_build(ops in proptest::collection::vec(any::<u8>(), 0..64)) {
        let source = method_body(&structured_body(&ops));
        let cfg = pipeline().build_graph(&source).unwrap();

        let forward = reachable_from_entry(&cfg);
        let backward = reaching_exit(&cfg);
        for block in cfg.blocks() {
            prop_assert!(forward.contains(&block.id));
            prop_assert!(backward.contains(&block.id));
        }
        prop_assert!(cfg.contains(cfg.entry));
        prop_assert!(cfg.contains(cfg.exit));

        // one back edge per loop, always into a different block than it leaves
        let mut back_targets = FxHashSet::default();
        for (from, to, kind) in cfg.edges() {
            if *kind == EdgeKind::LoopBack {
                prop_assert!(back_targets.insert(to), "two back edges into {}", to);
                prop_assert_ne!(from, to);
            }
        }
    }

    #[test]
    fn test_pipeline_is_deterministic(ops in proptest::collection::vec(any::<u8>(), 0..64)) {
        let source = method_body(&structured_body(&ops));
        let first = pipeline().render(&source).unwrap();
        let second = pipeline().render(&source).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_diagram_is_well_formed(ops in proptest::collection::vec(any::<u8>(), 0..64)) {
        let diagram = diagram_of(&method_body(&structured_body(&ops)));

        prop_assert_eq!(diagram.nodes.first().map(|n| n.id.as_str()), Some("START"));
        let ids: FxHashSet<&str> = diagram.nodes.iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids.len(), diagram.nodes.len());
        prop_assert!(ids.contains("END"));
        for edge in &diagram.edges {
            prop_assert!(ids.contains(edge.from.as_str()));
            prop_assert!(ids.contains(edge.to.as_str()));
            prop_assert!(edge.to != "START");
        }
        prop_assert_eq!(diagram.edges_from("END").count(), 0);
    }
}
