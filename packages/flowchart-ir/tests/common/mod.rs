//! Shared fixtures for integration tests

#![allow(dead_code)]

use flowchart_ir::config::FlowchartConfig;
use flowchart_ir::features::diagram::Diagram;
use flowchart_ir::features::flow_graph::ControlFlowGraph;
use flowchart_ir::FlowchartPipeline;

pub const COMPREHENSIVE_LOOP_TEST: &str = r#"
// Loop constructs side by side
public class ComprehensiveLoopTest {
    public static void main(String[] args) {
        System.out.println("=== LOOPS ===\n");

        for (int i = 0; i < 3; i++) {
            System.out.println("   for loop iteration: " + i);
        }
        System.out.println();

        int j = 0;
        while (j < 3) {
            System.out.println("   while loop iteration: " + j);
            j++;
        }
        System.out.println();

        int k = 0;
        do {
            System.out.println("   do-while loop iteration: " + k);
            k++;
        } while (k < 3);
        System.out.println();

        String[] languages = {"Java", "C", "C++"};
        for (String lang : languages) {
            System.out.println("   Language: " + lang);
        }
        System.out.println();

        for (int row = 0; row < 2; row++) {
            for (int col = 0; col < 2; col++) {
                System.out.println("   nested loop (" + row + "," + col + ")");
            }
        }
        System.out.println();

        for (int i = 0; i < 5; i++) {
            if (i == 1) {
                System.out.println("   Skipping iteration " + i + " (continue)");
                continue;
            }
            if (i == 3) {
                System.out.println("   Breaking at iteration " + i + " (break)");
                break;
            }
            System.out.println("   control loop iteration: " + i);
        }
        System.out.println();

        outerLoop: for (int i = 0; i < 2; i++) {
            for (int m = 0; m < 3; m++) {
                if (i == 1 && m == 1) {
                    System.out.println("   Breaking from outer loop at (" + i + "," + m + ")");
                    break outerLoop;
                }
                System.out.println("   labeled loop (" + i + "," + m + ")");
            }
        }
        System.out.println();

        System.out.println("=== SUMMARY ===");
    }
}
"#;

pub const TEST_SWITCH_NO_BREAK: &str = r#"
public class TestSwitchNoBreak {
    public static void main(String[] args) {
        int day = 5;

        switch (day) {
            case 1:
                System.out.println("Monday");
                break;
            case 2:
                System.out.println("Tuesday");
                break;
            default:
                System.out.println("Weekday");
                // No break statement here
        }

        System.out.println("After switch statement");
    }
}
"#;

pub const PRIME_CHECKER: &str = r#"
import java.util.Scanner;

public class PrimeChecker {

    // Check whether n is prime
    public static boolean isPrime(int n) {
        int i;

        if (n <= 1)
            return false;

        for (i = 2; i <= n / 2; i++) {
            if (n % i == 0)
                return false;
        }

        return true;
    }

    public static void main(String[] args) {
        int num;
        Scanner scanner = new Scanner(System.in);

        System.out.print("Enter a number: ");
        num = scanner.nextInt();

        if (isPrime(num))
            System.out.println("Prime number");
        else
            System.out.println("Not a prime number");

        scanner.close();
    }
}
"#;

pub const ALL_FIXTURES: &[(&str, &str)] = &[
    ("ComprehensiveLoopTest.java", COMPREHENSIVE_LOOP_TEST),
    ("TestSwitchNoBreak.java", TEST_SWITCH_NO_BREAK),
    ("PrimeChecker.java", PRIME_CHECKER),
];

/// Wrap statements in `class T { static void main() { ... } }`
pub fn method_body(body: &str) -> String {
    format!("class T {{\n    static void main() {{\n{}\n    }}\n}}\n", body)
}

pub fn pipeline() -> FlowchartPipeline {
    pipeline_for("main")
}

pub fn pipeline_for(entry: &str) -> FlowchartPipeline {
    FlowchartPipeline::new(FlowchartConfig::default().with_entry(entry))
        .expect("valid test config")
}

pub fn diagram_of(source: &str) -> Diagram {
    pipeline().run(source).expect("pipeline succeeds")
}

pub fn cfg_of(source: &str) -> ControlFlowGraph {
    pipeline().build_graph(source).expect("cfg builds")
}

/// Edges as `FROM -> TO` or `FROM -label-> TO`, in emission order
pub fn edge_list(diagram: &Diagram) -> Vec<String> {
    diagram
        .edges
        .iter()
        .map(|e| match &e.label {
            Some(label) => format!("{} -{}-> {}", e.from, label, e.to),
            None => format!("{} -> {}", e.from, e.to),
        })
        .collect()
}

/// Id of the node carrying `label`; panics if absent
pub fn id_of<'d>(diagram: &'d Diagram, label: &str) -> &'d str {
    diagram
        .node_labeled(label)
        .map(|n| n.id.as_str())
        .unwrap_or_else(|| panic!("no node labeled {:?}", label))
}

/// Targets of every edge out of the node labeled `label`
pub fn targets_of<'d>(diagram: &'d Diagram, label: &str) -> Vec<&'d str> {
    let id = id_of(diagram, label);
    diagram.edges_from(id).map(|e| e.to.as_str()).collect()
}
