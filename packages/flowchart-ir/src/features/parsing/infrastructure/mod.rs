//! Parsing infrastructure

pub mod entry;
mod expression;
pub mod parser;
