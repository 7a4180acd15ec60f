/*
 * Lexer
 *
 * Single pass over the source characters. Whitespace and comments are
 * skipped, but every consumed character advances the line/column cursor so
 * positions stay exact. Never fails: a character outside the grammar becomes
 * an `UnrecognizedCharacter` token and lexing continues.
 */

use crate::features::lexing::domain::{Keyword, Token, TokenKind};

/// Tokenize a whole source unit. The stream always ends with `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let (line, column) = (self.line, self.column);
            let Some(ch0) = self.peek_nth(0) else {
                tokens.push(Token::new(TokenKind::Eof, "", line, column));
                break;
            };

            // 1. Words and literals
            if ch0.is_alphabetic() || ch0 == '_' || ch0 == '$' {
                tokens.push(self.lex_word(line, column));
                continue;
            }
            if ch0.is_ascii_digit() {
                tokens.push(self.lex_number(line, column));
                continue;
            }
            if ch0 == '"' {
                tokens.push(self.lex_quoted('"', TokenKind::StringLiteral, line, column));
                continue;
            }
            if ch0 == '\'' {
                tokens.push(self.lex_quoted('\'', TokenKind::CharLiteral, line, column));
                continue;
            }

            // 2. Double character operators
            if let Some(ch1) = self.peek_nth(1) {
                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume();
                    self.consume();
                    tokens.push(Token::new(kind, format!("{ch0}{ch1}"), line, column));
                    continue;
                }
            }

            // 3. Single character tokens
            self.consume();
            let kind = single_char_token(ch0).unwrap_or(TokenKind::UnrecognizedCharacter);
            tokens.push(Token::new(kind, ch0.to_string(), line, column));
        }
        tokens
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl Lexer {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek_nth(0) {
            if !pred(ch) {
                break;
            }
            out.push(ch);
            self.consume();
        }
        out
    }

    /// Whitespace, `// line` comments and `/* block */` comments
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek_nth(0), self.peek_nth(1)) {
                (Some(ch), _) if ch.is_whitespace() => {
                    self.consume();
                }
                (Some('/'), Some('/')) => {
                    self.consume_while(|c| c != '\n');
                }
                (Some('/'), Some('*')) => {
                    self.consume();
                    self.consume();
                    // An unterminated block comment runs to end of input
                    while self.peek_nth(0).is_some() {
                        if self.peek_nth(0) == Some('*') && self.peek_nth(1) == Some('/') {
                            self.consume();
                            self.consume();
                            break;
                        }
                        self.consume();
                    }
                }
                _ => return,
            }
        }
    }

    fn lex_word(&mut self, line: u32, column: u32) -> Token {
        let word = self.consume_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let kind = match Keyword::lookup(&word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        };
        Token::new(kind, word, line, column)
    }

    fn lex_number(&mut self, line: u32, column: u32) -> Token {
        let mut text = self.consume_while(|c| c.is_ascii_digit() || c == '_');
        let mut kind = TokenKind::IntLiteral;

        let has_fraction = self.peek_nth(0) == Some('.')
            && self.peek_nth(1).map_or(false, |c| c.is_ascii_digit());
        if has_fraction {
            self.consume();
            text.push('.');
            text.push_str(&self.consume_while(|c| c.is_ascii_digit() || c == '_'));
            kind = TokenKind::FloatLiteral;
        }

        // Type suffixes: 10L, 1.5f, 2d
        if let Some(suffix) = self.peek_nth(0) {
            match suffix {
                'l' | 'L' => {
                    self.consume();
                    text.push(suffix);
                }
                'f' | 'F' | 'd' | 'D' => {
                    self.consume();
                    text.push(suffix);
                    kind = TokenKind::FloatLiteral;
                }
                _ => {}
            }
        }
        Token::new(kind, text, line, column)
    }

    /// String or char literal; the lexeme keeps its quotes and escapes verbatim
    fn lex_quoted(&mut self, quote: char, kind: TokenKind, line: u32, column: u32) -> Token {
        let mut text = String::new();
        if let Some(open) = self.consume() {
            text.push(open);
        }
        loop {
            match self.peek_nth(0) {
                None | Some('\n') => {
                    return Token::new(TokenKind::UnterminatedString, text, line, column);
                }
                Some('\\') => {
                    text.push('\\');
                    self.consume();
                    if let Some(escaped) = self.peek_nth(0).filter(|c| *c != '\n') {
                        text.push(escaped);
                        self.consume();
                    }
                }
                Some(ch) if ch == quote => {
                    text.push(ch);
                    self.consume();
                    return Token::new(kind, text, line, column);
                }
                Some(ch) => {
                    text.push(ch);
                    self.consume();
                }
            }
        }
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('+', '+') => Some(TokenKind::PlusPlus),
        ('-', '-') => Some(TokenKind::MinusMinus),
        ('+', '=') => Some(TokenKind::PlusAssign),
        ('-', '=') => Some(TokenKind::MinusAssign),
        ('*', '=') => Some(TokenKind::StarAssign),
        ('/', '=') => Some(TokenKind::SlashAssign),
        ('%', '=') => Some(TokenKind::PercentAssign),
        ('=', '=') => Some(TokenKind::EqEq),
        ('!', '=') => Some(TokenKind::NotEq),
        ('<', '=') => Some(TokenKind::LtEq),
        ('>', '=') => Some(TokenKind::GtEq),
        ('&', '&') => Some(TokenKind::AndAnd),
        ('|', '|') => Some(TokenKind::OrOr),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Dot),
        ':' => Some(TokenKind::Colon),
        '?' => Some(TokenKind::Question),
        '@' => Some(TokenKind::At),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        '=' => Some(TokenKind::Assign),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '!' => Some(TokenKind::Bang),
        '&' => Some(TokenKind::Amp),
        '|' => Some(TokenKind::Pipe),
        '^' => Some(TokenKind::Caret),
        '~' => Some(TokenKind::Tilde),
        _ => None,
    }
}
