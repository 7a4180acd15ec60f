//! End-to-end scenarios over the fixture programs

#[path = "../common/mod.rs"]
mod common;

use common::*;
use flowchart_ir::features::flow_graph::{BlockKind, EdgeKind};
use flowchart_ir::features::shape::Shape;
use flowchart_ir::FlowchartError;
use pretty_assertions::assert_eq;

#[test]
fn test_do_while_runs_body_before_test() {
    let source = method_body(
        "int i = 0;
         do {
             System.out.println(i);
             i++;
         } while (i < 5);",
    );
    let diagram = diagram_of(&source);

    let labels: Vec<_> = diagram
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.shape, n.label.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("START", Shape::Start, "start"),
            ("N1", Shape::Process, "int i = 0"),
            ("N2", Shape::Io, "println i"),
            ("N3", Shape::Process, "i++"),
            ("N4", Shape::Decision, "i < 5"),
            ("END", Shape::End, "end"),
        ]
    );
    assert_eq!(
        edge_list(&diagram),
        vec![
            "START -> N1",
            "N1 -> N2",
            "N2 -> N3",
            "N3 -> N4",
            "N4 -true-> N2",
            "N4 -false-> END",
        ]
    );
}

#[test]
fn test_do_while_cfg_shape() {
    let cfg = cfg_of(&method_body(
        "int i = 0; do { System.out.println(i); i++; } while (i < 5);",
    ));
    let test = cfg
        .blocks()
        .iter()
        .find(|b| b.is_decision())
        .expect("test block");
    let kinds: Vec<_> = test.successors.iter().map(|s| s.kind.clone()).collect();
    assert_eq!(kinds, vec![EdgeKind::LoopBack, EdgeKind::FalseBranch]);

    let body = test.successors[0].target;
    assert_eq!(cfg.block(body).map(|b| b.statements.len()), Some(2));
    // the false edge lands on an empty join that falls through to exit
    let after = test.successors[1].target;
    assert!(cfg.block(after).map_or(false, |b| b.is_empty_basic()));
    assert_eq!(cfg.successors(after)[0].target, cfg.exit);
}

#[test]
fn test_labeled_break_targets_outer_exit() {
    let source = method_body(
        "outer: for (int i = 0; i < 2; i++) {
             for (int m = 0; m < 3; m++) {
                 if (i == 1 && m == 1) {
                     System.out.println(\"break\");
                     break outer;
                 }
                 System.out.println(m);
             }
         }
         System.out.println(\"done\");",
    );
    let diagram = diagram_of(&source);

    let done = id_of(&diagram, "println \"done\"");
    assert_eq!(targets_of(&diagram, "println \"break\""), vec![done]);
    // nothing after the jump survives
    assert!(diagram.nodes.iter().all(|n| !n.label.is_empty()));
    assert_eq!(diagram.count(Shape::Decision), 3);
}

#[test]
fn test_fixture_labeled_loop_break() {
    let diagram = diagram_of(COMPREHENSIVE_LOOP_TEST);
    let label = "println \"   Breaking from outer loop at (\" + i + \",\" + m + \")\"";
    let targets = targets_of(&diagram, label);
    assert_eq!(targets.len(), 1);

    // outer's exit holds the statement right after the labeled loop
    let target = diagram.node(targets[0]).unwrap();
    assert_eq!(target.shape, Shape::Io);
    assert_eq!(target.label, "println");
}

#[test]
fn test_switch_without_trailing_break() {
    let diagram = diagram_of(TEST_SWITCH_NO_BREAK);

    let switch = id_of(&diagram, "switch (day)");
    let labels: Vec<_> = diagram
        .edges_from(switch)
        .map(|e| e.label.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(labels, vec!["1", "2", "default"]);

    let after = id_of(&diagram, "println \"After switch statement\"");
    assert_eq!(targets_of(&diagram, "println \"Monday\""), vec![after]);
    assert_eq!(targets_of(&diagram, "println \"Tuesday\""), vec![after]);
    assert_eq!(targets_of(&diagram, "println \"Weekday\""), vec![after]);
    assert_eq!(diagram.edges_to(after).count(), 3);
    assert_eq!(targets_of(&diagram, "println \"After switch statement\""), vec!["END"]);
}

#[test]
fn test_is_prime_paths() {
    let pipeline = pipeline_for("isPrime");
    let cfg = pipeline.build_graph(PRIME_CHECKER).unwrap();
    assert_eq!(cfg.method, "isPrime");
    assert_eq!(cfg.decision_count(), 3);

    let conditions: Vec<String> = cfg
        .blocks()
        .iter()
        .filter_map(|b| match &b.kind {
            BlockKind::Decision(c) => Some(c.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(conditions, vec!["n <= 1", "i <= n / 2", "n % i == 0"]);

    // three returns, one shared end
    let into_end = cfg.predecessors(cfg.exit);
    assert_eq!(into_end.len(), 3);
    for (block, _) in into_end {
        let last = cfg.block(block).and_then(|b| b.statements.last()).unwrap();
        assert!(last.to_string().starts_with("return"), "{}", last);
    }

    let diagram = pipeline.run(PRIME_CHECKER).unwrap();
    assert_eq!(diagram.count(Shape::End), 1);
    assert_eq!(diagram.edges_to("END").count(), 3);
}

#[test]
fn test_prime_checker_main_io() {
    let diagram = diagram_of(PRIME_CHECKER);
    assert_eq!(diagram.method, "main");
    assert_eq!(diagram.count(Shape::Io), 4);
    assert!(diagram.node_labeled("read num").is_some());
    assert!(diagram.node_labeled("isPrime(num)").is_some());

    let decision = id_of(&diagram, "isPrime(num)");
    let labels: Vec<_> = diagram
        .edges_from(decision)
        .map(|e| e.label.clone().unwrap_or_default())
        .collect();
    assert_eq!(labels, vec!["true", "false"]);
}

#[test]
fn test_fixtures_render_in_every_format() {
    use flowchart_ir::config::{FlowchartConfig, OutputFormat};
    use flowchart_ir::FlowchartPipeline;

    for format in [OutputFormat::Text, OutputFormat::Mermaid, OutputFormat::Json] {
        let pipeline =
            FlowchartPipeline::new(FlowchartConfig::default().with_format(format)).unwrap();
        for (name, source) in ALL_FIXTURES {
            let out = pipeline
                .render(source)
                .unwrap_or_else(|e: FlowchartError| panic!("{}: {}", name, e));
            assert!(!out.is_empty(), "{} {}", name, format);
        }
    }
}
