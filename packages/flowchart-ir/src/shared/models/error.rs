//! Error types for the flowchart-ir crate
//!
//! One structured error value flows from every pipeline stage to the caller:
//! `{stage, message, line, column}`. Stages never catch and rewrap an earlier
//! stage's error.

use serde::Serialize;
use std::fmt;

use super::span::Location;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lex,
    Parse,
    Build,
    Emit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Lex => "lex",
            Stage::Parse => "parse",
            Stage::Build => "build",
            Stage::Emit => "emit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unrecognized character or unterminated literal reached by the parser
    Lex,
    /// Malformed grammar
    Parse,
    /// Grammar form recognized but outside the supported statement set
    UnsupportedConstruct,
    /// No method matches the configured entry point
    EntryNotFound,
    /// Labeled `break`/`continue` with no matching enclosing frame
    UnresolvedLabel,
    /// Unlabeled `break`/`continue` with no enclosing loop or switch
    JumpOutsideLoop,
    /// Diagram serialization failure
    Render,
}

impl ErrorKind {
    pub fn stage(&self) -> Stage {
        match self {
            ErrorKind::Lex => Stage::Lex,
            ErrorKind::Parse | ErrorKind::UnsupportedConstruct | ErrorKind::EntryNotFound => {
                Stage::Parse
            }
            ErrorKind::UnresolvedLabel | ErrorKind::JumpOutsideLoop => Stage::Build,
            ErrorKind::Render => Stage::Emit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Lex => "lex_error",
            ErrorKind::Parse => "parse_error",
            ErrorKind::UnsupportedConstruct => "unsupported_construct",
            ErrorKind::EntryNotFound => "entry_not_found",
            ErrorKind::UnresolvedLabel => "unresolved_label",
            ErrorKind::JumpOutsideLoop => "jump_outside_loop",
            ErrorKind::Render => "render_error",
        }
    }
}

/// Unified error type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowchartError {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl FlowchartError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, at: Location) -> Self {
        Self {
            stage: kind.stage(),
            kind,
            message: message.into(),
            line: at.line,
            column: at.column,
        }
    }

    // Convenience constructors
    pub fn lex(message: impl Into<String>, at: Location) -> Self {
        Self::new(ErrorKind::Lex, message, at)
    }

    pub fn parse(message: impl Into<String>, at: Location) -> Self {
        Self::new(ErrorKind::Parse, message, at)
    }

    pub fn unsupported(construct: impl Into<String>, at: Location) -> Self {
        Self::new(
            ErrorKind::UnsupportedConstruct,
            format!("unsupported construct: {}", construct.into()),
            at,
        )
    }

    pub fn unresolved_label(label: &str, at: Location) -> Self {
        Self::new(
            ErrorKind::UnresolvedLabel,
            format!("undefined label: {}", label),
            at,
        )
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Render, message, Location::new(0, 0))
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

impl fmt::Display for FlowchartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if self.line > 0 {
            write!(f, " at {}:{}", self.line, self.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for FlowchartError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, FlowchartError>;
