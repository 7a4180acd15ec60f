//! Shared models

mod error;
mod span;

pub use error::{ErrorKind, FlowchartError, Result, Stage};
pub use span::{Location, Span};
