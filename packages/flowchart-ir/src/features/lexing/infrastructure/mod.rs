//! Lexing infrastructure

pub mod lexer;

pub use lexer::{tokenize, Lexer};
