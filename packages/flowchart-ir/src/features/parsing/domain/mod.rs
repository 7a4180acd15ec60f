//! AST domain model

pub mod ast;
