//! Structural properties of built graphs: jump resolution, fallthrough,
//! else binding, reachability and byte-stable output

#[path = "../common/mod.rs"]
mod common;

use common::*;
use flowchart_ir::config::{FlowchartConfig, OutputFormat};
use flowchart_ir::features::flow_graph::{reachable_from_entry, reaching_exit, EdgeKind};
use flowchart_ir::{ErrorKind, FlowchartPipeline, Stage};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

// ═══════════════════════════════════════════════════════════════════════════
// Label resolution
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_labeled_continue_skips_inner_update() {
    let diagram = diagram_of(&method_body(
        "outer: for (int i = 0; i < 3; i++) {
             for (int j = 0; j < 3; j++) {
                 if (j == i) {
                     System.out.println(\"skip\");
                     continue outer;
                 }
             }
         }",
    ));
    // straight to the outer update, never through `j++`
    assert_eq!(
        targets_of(&diagram, "println \"skip\""),
        vec![id_of(&diagram, "i++")]
    );
}

#[test]
fn test_labeled_while_break() {
    let diagram = diagram_of(&method_body(
        "scan: while (a < 10) {
             do {
                 if (b > a) break scan;
                 b++;
             } while (b < 5);
             a++;
         }
         done();",
    ));
    let decision = id_of(&diagram, "b > a");
    let done = id_of(&diagram, "done()");
    assert!(diagram
        .edges_from(decision)
        .any(|e| e.to == done && e.label.as_deref() == Some("true")));
}

#[test]
fn test_unknown_label_is_reported() {
    let err = pipeline()
        .run(&method_body(
            "outer: for (;;) {\n            break inner;\n        }",
        ))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvedLabel);
    assert_eq!(err.stage, Stage::Build);
    assert!(err.message.contains("inner"));
    assert_eq!((err.line, err.column), (4, 13));
}

#[test]
fn test_label_of_closed_loop_is_unresolved() {
    let err = pipeline()
        .run(&method_body(
            "first: while (x) { x--; }\n        while (y) { break first; }",
        ))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvedLabel);
    assert_eq!(err.line, 4);
}

#[test]
fn test_jump_outside_loop() {
    let err = pipeline().run(&method_body("continue;")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::JumpOutsideLoop);

    // `break` may leave a switch, `continue` may not
    assert!(pipeline()
        .run(&method_body("switch (x) { case 1: break; }"))
        .is_ok());
    let err = pipeline()
        .run(&method_body("switch (x) { case 1: continue; }"))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::JumpOutsideLoop);
}

// ═══════════════════════════════════════════════════════════════════════════
// Switch fallthrough
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_case_without_break_falls_through() {
    let diagram = diagram_of(&method_body(
        "switch (x) {
             case 1: a();
             case 2: b(); break;
             case 3: c();
         }
         after();",
    ));
    let b = id_of(&diagram, "b()");
    let after = id_of(&diagram, "after()");

    assert_eq!(targets_of(&diagram, "a()"), vec![b]);
    assert_eq!(targets_of(&diagram, "b()"), vec![after]);
    assert_eq!(targets_of(&diagram, "c()"), vec![after]);

    // no `default` case: the decision can skip every case
    let switch = id_of(&diagram, "switch (x)");
    assert!(diagram
        .edges_from(switch)
        .any(|e| e.to == after && e.label.as_deref() == Some("default")));
}

#[test]
fn test_fallthrough_edge_kind_in_cfg() {
    let cfg = cfg_of(&method_body("switch (x) { case 1: a(); case 2: b(); }"));
    let fallthroughs = cfg
        .edges()
        .filter(|(_, _, kind)| **kind == EdgeKind::Fallthrough)
        .count();
    assert_eq!(fallthroughs, 1);
}

#[test]
fn test_break_in_case_short_circuits_fallthrough() {
    let diagram = diagram_of(&method_body(
        "switch (x) { case 1: if (y) break; a(); case 2: b(); }",
    ));
    let b = id_of(&diagram, "b()");
    assert_eq!(targets_of(&diagram, "a()"), vec![b]);

    let y = id_of(&diagram, "y");
    let true_target = diagram
        .edges_from(y)
        .find(|e| e.label.as_deref() == Some("true"))
        .map(|e| e.to.as_str());
    assert_eq!(true_target, Some("END"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Dangling else
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_dangling_else_binds_to_inner_if() {
    let diagram = diagram_of(&method_body("if (a) if (b) s1(); else s2();"));
    let a = id_of(&diagram, "a");
    let b = id_of(&diagram, "b");
    let s1 = id_of(&diagram, "s1()");
    let s2 = id_of(&diagram, "s2()");

    let from_b: Vec<_> = diagram
        .edges_from(b)
        .map(|e| (e.to.as_str(), e.label.as_deref()))
        .collect();
    assert_eq!(from_b, vec![(s1, Some("true")), (s2, Some("false"))]);

    // outer `if` has no else arm: false skips straight past the inner one
    let from_a: Vec<_> = diagram
        .edges_from(a)
        .map(|e| (e.to.as_str(), e.label.as_deref()))
        .collect();
    assert_eq!(from_a, vec![(b, Some("true")), ("END", Some("false"))]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Reachability
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fixture_blocks_reach_both_ends() {
    for (name, source) in ALL_FIXTURES {
        for entry in ["main", "isPrime"] {
            let Ok(cfg) = pipeline_for(entry).build_graph(source) else {
                continue;
            };
            let forward = reachable_from_entry(&cfg);
            let backward = reaching_exit(&cfg);
            for block in cfg.blocks() {
                assert!(forward.contains(&block.id), "{name}: {} unreachable", block.id);
                assert!(backward.contains(&block.id), "{name}: {} cannot exit", block.id);
            }
        }
    }
}

#[test]
fn test_dead_code_after_return_is_pruned() {
    let diagram = diagram_of(&method_body("a(); return; b(); while (x) c();"));
    assert!(diagram.node_labeled("b()").is_none());
    assert!(diagram.node_labeled("c()").is_none());
    assert!(diagram.node_labeled("x").is_none());
    // `return` ends the block it was appended to
    assert_eq!(targets_of(&diagram, "a()\nreturn"), vec!["END"]);
}

#[test]
fn test_end_present_for_infinite_loop() {
    let diagram = diagram_of(&method_body("while (true) { tick(); }"));
    assert!(diagram.node("END").is_some());
    // `true` still has its structural exit edge
    assert_eq!(diagram.edges_to("END").count(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Determinism and output formats
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_text_output_golden() {
    let source = method_body(
        "int n = sc.nextInt();
         if (n % 2 == 0) {
             System.out.println(\"even\");
         } else {
             System.out.println(\"odd\");
         }",
    );
    let expected = r#"flowchart main
node START start "start"
node N1 io "read n"
node N2 decision "n % 2 == 0"
node N3 io "println \"even\""
node N4 io "println \"odd\""
node END end "end"
edge START -> N1
edge N1 -> N2
edge N2 -> N3 "true"
edge N2 -> N4 "false"
edge N3 -> END
edge N4 -> END
"#;
    assert_eq!(pipeline().render(&source).unwrap(), expected);
}

#[test]
fn test_mermaid_output_golden() {
    let config = FlowchartConfig::default().with_format(OutputFormat::Mermaid);
    let pipeline = FlowchartPipeline::new(config).unwrap();
    let out = pipeline
        .render(&method_body("while (i < 3) { i++; }"))
        .unwrap();
    // the end sentinel predates the loop body, so it is queued first
    let expected = "flowchart TD
START([\"start\"])
N1{\"i < 3\"}
END([\"end\"])
N2[\"i++\"]
START --> N1
N1 -->|true| N2
N1 -->|false| END
N2 --> N1
";
    assert_eq!(out, expected);
}

#[test]
fn test_fixture_output_is_byte_stable() {
    for (_, source) in ALL_FIXTURES {
        let first = pipeline().render(source).unwrap();
        let second = pipeline().render(source).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_config_file_drives_pipeline() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "version: 1\nentry_name: isPrime\nformat: mermaid\ndirection: LR").unwrap();

    let config = FlowchartConfig::from_yaml(file.path()).unwrap();
    let out = FlowchartPipeline::new(config)
        .unwrap()
        .render(PRIME_CHECKER)
        .unwrap();
    assert!(out.starts_with("flowchart LR\n"));
    assert!(out.contains("{\"n <= 1\"}"));
    assert!(out.contains("[\"return true\"]"));
}
