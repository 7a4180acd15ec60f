//! Entry point selection

use tracing::debug;

use crate::features::parsing::domain::ast::{MethodDecl, Program};
use crate::shared::models::{ErrorKind, FlowchartError, Location, Result};

/// Pick the method whose body becomes the diagram.
///
/// The method named `entry_name` wins. Otherwise, when `fallback_to_first`
/// is set, the first declared method is used.
pub fn select_entry<'p>(
    program: &'p Program,
    entry_name: &str,
    fallback_to_first: bool,
) -> Result<&'p MethodDecl> {
    if let Some(method) = program.method(entry_name) {
        return Ok(method);
    }
    match program.methods.first() {
        Some(first) if fallback_to_first => {
            debug!(
                requested = entry_name,
                selected = %first.name,
                "entry method not found, falling back to first declared method"
            );
            Ok(first)
        }
        _ => Err(FlowchartError::new(
            ErrorKind::EntryNotFound,
            format!("entry method '{}' not found", entry_name),
            Location::new(0, 0),
        )),
    }
}
