mod token;

pub use token::{Keyword, Token, TokenKind};
