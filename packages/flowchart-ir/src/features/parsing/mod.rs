//! Parsing feature
//!
//! Recursive-descent parser for the supported Java subset, producing an
//! owned AST (`Program` → `MethodDecl` → `Statement`/`Expr`). Parsing stops at
//! the first error.

pub mod domain;
pub mod infrastructure;

pub use domain::ast::*;
pub use infrastructure::entry::select_entry;
pub use infrastructure::parser::{parse, parse_source, Parser};
