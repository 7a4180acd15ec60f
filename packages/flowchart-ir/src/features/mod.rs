//! Feature modules, leaf-first: each depends only on the ones above it.

pub mod lexing;
pub mod parsing;
pub mod flow_graph;
pub mod shape;
pub mod diagram;
