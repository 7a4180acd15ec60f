//! Flowchart CLI
//!
//! # Usage
//!
//! ```bash
//! # Text description of `main` (or the first method)
//! flowchart Demo.java
//!
//! # Mermaid for a named method, left to right
//! flowchart PrimeChecker.java --entry isPrime --format mermaid --direction LR
//!
//! # Settings from a YAML v1 file, overridden by flags
//! flowchart --config flowchart.yaml A.java B.java
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flowchart_ir::config::{FlowDirection, FlowchartConfig, OutputFormat};
use flowchart_ir::{render_batch, FlowchartPipeline, SourceUnit};

#[derive(Parser)]
#[command(name = "flowchart")]
#[command(about = "Extract a flowchart description from a method's control flow", long_about = None)]
struct Cli {
    /// Source files, one diagram each
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Entry method name
    #[arg(short, long)]
    entry: Option<String>,

    /// Output format: text, mermaid or json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Mermaid direction: TD or LR
    #[arg(short, long)]
    direction: Option<FlowDirection>,

    /// YAML configuration file (schema v1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail instead of using the first declared method
    #[arg(long)]
    no_fallback: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FlowchartConfig, String> {
    let mut config = match &cli.config {
        Some(path) => FlowchartConfig::from_yaml(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => FlowchartConfig::default(),
    };
    if let Some(entry) = &cli.entry {
        config = config.with_entry(entry.clone());
    }
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    if let Some(direction) = cli.direction {
        config = config.with_direction(direction);
    }
    if cli.no_fallback {
        config = config.with_fallback(false);
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let pipeline = match FlowchartPipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    let mut units = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match std::fs::read_to_string(path) {
            Ok(source) => units.push(SourceUnit::new(path.display().to_string(), source)),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    let multiple = units.len() > 1;
    for unit in render_batch(&pipeline, &units) {
        match unit.result {
            Ok(output) => {
                if multiple {
                    println!("%% {}", unit.name);
                }
                print!("{}", output);
            }
            Err(e) => {
                eprintln!("{}: {}", unit.name, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
