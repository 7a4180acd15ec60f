//! Batch processing
//!
//! Units share nothing, so they run on the rayon pool and results come back
//! in input order. A failed unit is logged and reported in its own slot.

use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use super::processor::FlowchartPipeline;
use crate::features::diagram::Diagram;
use crate::features::flow_graph::FlowAnalyzer;
use crate::shared::models::Result;

/// One named source text (usually a file path and its contents)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitResult<T> {
    pub name: String,
    pub result: Result<T>,
}

impl<T> UnitResult<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Diagram for every unit
pub fn process_batch<A: FlowAnalyzer>(
    pipeline: &FlowchartPipeline<A>,
    units: &[SourceUnit],
) -> Vec<UnitResult<Diagram>> {
    run_units(units, |source| pipeline.run(source))
}

/// Rendered output for every unit
pub fn render_batch<A: FlowAnalyzer>(
    pipeline: &FlowchartPipeline<A>,
    units: &[SourceUnit],
) -> Vec<UnitResult<String>> {
    run_units(units, |source| pipeline.render(source))
}

fn run_units<T, F>(units: &[SourceUnit], stage: F) -> Vec<UnitResult<T>>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    units
        .par_iter()
        .map(|unit| {
            let result = stage(&unit.source);
            if let Err(e) = &result {
                warn!(unit = %unit.name, error = %e, "source unit failed");
            }
            UnitResult {
                name: unit.name.clone(),
                result,
            }
        })
        .collect()
}
