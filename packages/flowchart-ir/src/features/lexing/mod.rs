//! Lexing feature
//!
//! Turns source text into a stream of typed tokens. Total over any input:
//! bad characters become `UnrecognizedCharacter` tokens so the parser can
//! report them at their exact position.

pub mod domain;
pub mod infrastructure;

pub use domain::{Keyword, Token, TokenKind};
pub use infrastructure::{tokenize, Lexer};
