//! Flow graph feature
//!
//! Builds the control flow graph of one method: a start and end sentinel
//! around basic blocks and decision blocks, with typed edges. Labeled jumps
//! are ordinary edges resolved against a stack of loop/switch frames.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{BuildFlowGraphUseCase, StructuredFlowAnalyzer};
pub use domain::*;
pub use infrastructure::{build_cfg, finalize, reachable_from_entry, reaching_exit, CfgBuilder};
pub use ports::FlowAnalyzer;
