//! Token domain model

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::shared::models::Location;

/// Reserved words of the supported Java subset
///
/// Primitive type names (`int`, `boolean`, ...) are lexed as identifiers;
/// the parser decides from context whether a name is a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Package,
    Import,
    Class,
    Interface,
    Enum,
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
    Void,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    New,
    True,
    False,
    Null,
    Try,
    Catch,
    Finally,
    Throw,
    Throws,
}

static KEYWORDS: Lazy<FxHashMap<&'static str, Keyword>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.insert("package", Keyword::Package);
    map.insert("import", Keyword::Import);
    map.insert("class", Keyword::Class);
    map.insert("interface", Keyword::Interface);
    map.insert("enum", Keyword::Enum);
    map.insert("public", Keyword::Public);
    map.insert("private", Keyword::Private);
    map.insert("protected", Keyword::Protected);
    map.insert("static", Keyword::Static);
    map.insert("final", Keyword::Final);
    map.insert("abstract", Keyword::Abstract);
    map.insert("void", Keyword::Void);
    map.insert("if", Keyword::If);
    map.insert("else", Keyword::Else);
    map.insert("for", Keyword::For);
    map.insert("while", Keyword::While);
    map.insert("do", Keyword::Do);
    map.insert("switch", Keyword::Switch);
    map.insert("case", Keyword::Case);
    map.insert("default", Keyword::Default);
    map.insert("break", Keyword::Break);
    map.insert("continue", Keyword::Continue);
    map.insert("return", Keyword::Return);
    map.insert("new", Keyword::New);
    map.insert("true", Keyword::True);
    map.insert("false", Keyword::False);
    map.insert("null", Keyword::Null);
    map.insert("try", Keyword::Try);
    map.insert("catch", Keyword::Catch);
    map.insert("finally", Keyword::Finally);
    map.insert("throw", Keyword::Throw);
    map.insert("throws", Keyword::Throws);
    map
});

impl Keyword {
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS.get(word).copied()
    }

    /// Modifiers that may prefix a class, field or method declaration
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Keyword::Public
                | Keyword::Private
                | Keyword::Protected
                | Keyword::Static
                | Keyword::Final
                | Keyword::Abstract
        )
    }
}

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    At,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,

    // Recoverable lexical failures, reported by the parser
    UnrecognizedCharacter,
    UnterminatedString,

    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        *self == TokenKind::Keyword(keyword)
    }

    pub fn is_lex_error(&self) -> bool {
        matches!(
            self,
            TokenKind::UnrecognizedCharacter | TokenKind::UnterminatedString
        )
    }
}

/// A lexed token; immutable once produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}
