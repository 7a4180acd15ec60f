/*
 * Statement Parser
 *
 * Recursive descent over the token stream. Grammar decisions:
 * - `else` binds to the nearest unmatched `if` (falls out of the recursion)
 * - `identifier :` is only a label when followed by `for`, `while` or `do`
 * - `switch` cases keep their statement lists verbatim, no implicit `break`
 * - print/read calls are recognized here and become dedicated statements
 *
 * The first error stops the parse; there is no resynchronization.
 */

use tracing::trace;

use crate::features::lexing::domain::{Keyword, Token, TokenKind};
use crate::features::lexing::tokenize;
use crate::features::parsing::domain::ast::*;
use crate::shared::models::{FlowchartError, Location, Result, Span};

/// Parse a token stream into a `Program`
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}

/// Tokenize and parse in one step
pub fn parse_source(source: &str) -> Result<Program> {
    parse(tokenize(source))
}

pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
}

// ----------------------------------------------------------------------------
// Token cursor
// ----------------------------------------------------------------------------

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.lexeme.chars().count() as u32))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Self { tokens, pos: 0 }
    }

    pub(super) fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    pub(super) fn peek_at(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().kind.is_keyword(keyword)
    }

    pub(super) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("expected {}", what)))
        }
    }

    pub(super) fn expect_identifier(&mut self, what: &str) -> Result<String> {
        Ok(self.expect(TokenKind::Identifier, what)?.lexeme)
    }

    pub(super) fn location(&self) -> Location {
        self.peek().location()
    }

    /// End position of the most recently consumed token
    fn prev_end(&self) -> Location {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(t) => {
                let len = t.lexeme.chars().count().max(1) as u32;
                Location::new(t.line, t.column + len - 1)
            }
            None => Location::new(1, 1),
        }
    }

    pub(super) fn span_from(&self, start: Location) -> Span {
        let end = self.prev_end();
        Span::new(start.line, start.column, end.line, end.column)
    }

    /// Error at the current token. A lexical failure token is reported as a
    /// lex error no matter what the grammar expected there.
    pub(super) fn error_here(&self, message: String) -> FlowchartError {
        let token = self.peek();
        match token.kind {
            TokenKind::UnrecognizedCharacter => FlowchartError::lex(
                format!("unrecognized character '{}'", token.lexeme),
                token.location(),
            ),
            TokenKind::UnterminatedString => {
                FlowchartError::lex("unterminated literal", token.location())
            }
            TokenKind::Eof => {
                FlowchartError::parse(format!("{}, found end of input", message), token.location())
            }
            _ => FlowchartError::parse(
                format!("{}, found '{}'", message, token.lexeme),
                token.location(),
            ),
        }
    }
}

// ----------------------------------------------------------------------------
// Program structure
// ----------------------------------------------------------------------------

impl Parser {
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut program = Program {
            imports: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        };

        if self.check_keyword(Keyword::Package) {
            self.advance();
            self.parse_qualified_name()?;
            self.expect(TokenKind::Semicolon, "';' after package declaration")?;
        }
        while self.check_keyword(Keyword::Import) {
            self.advance();
            self.eat(TokenKind::Keyword(Keyword::Static));
            let mut name = self.parse_qualified_name()?;
            if self.eat(TokenKind::Dot) {
                self.expect(TokenKind::Star, "'*' in import")?;
                name.push_str(".*");
            }
            self.expect(TokenKind::Semicolon, "';' after import")?;
            program.imports.push(name);
        }

        while !self.check(TokenKind::Eof) {
            self.skip_modifiers()?;
            if self.check_keyword(Keyword::Class) {
                self.parse_class(&mut program)?;
            } else {
                self.parse_member(None, &mut program)?;
            }
        }

        trace!(
            methods = program.methods.len(),
            imports = program.imports.len(),
            "parsed program"
        );
        Ok(program)
    }

    fn parse_qualified_name(&mut self) -> Result<String> {
        let mut name = self.expect_identifier("a name")?;
        while self.check(TokenKind::Dot) && self.peek_at(1).kind == TokenKind::Identifier {
            self.advance();
            name.push('.');
            name.push_str(&self.advance().lexeme);
        }
        Ok(name)
    }

    fn skip_modifiers(&mut self) -> Result<()> {
        loop {
            match self.peek().kind {
                TokenKind::Keyword(k) if k.is_modifier() => {
                    self.advance();
                }
                TokenKind::At => {
                    return Err(FlowchartError::unsupported("annotation", self.location()));
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_class(&mut self, program: &mut Program) -> Result<()> {
        self.expect(TokenKind::Keyword(Keyword::Class), "'class'")?;
        let name = self.expect_identifier("class name")?;
        if self.check(TokenKind::Lt) {
            return Err(FlowchartError::unsupported("generic class", self.location()));
        }
        if self.check(TokenKind::Identifier) {
            // extends / implements
            return Err(FlowchartError::unsupported(
                "class inheritance",
                self.location(),
            ));
        }
        self.expect(TokenKind::LBrace, "'{' to open class body")?;
        while !self.check(TokenKind::RBrace) {
            if self.check(TokenKind::Eof) {
                return Err(self.error_here("expected '}' to close class body".to_string()));
            }
            self.skip_modifiers()?;
            self.parse_member(Some(&name), program)?;
        }
        self.advance();
        Ok(())
    }

    /// Method or static field, after modifiers
    fn parse_member(&mut self, class: Option<&str>, program: &mut Program) -> Result<()> {
        let start = self.location();
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Class)
            | TokenKind::Keyword(Keyword::Interface)
            | TokenKind::Keyword(Keyword::Enum) => {
                return Err(FlowchartError::unsupported("nested type declaration", start));
            }
            TokenKind::Identifier if self.peek_at(1).kind == TokenKind::LParen => {
                return Err(FlowchartError::unsupported("constructor", start));
            }
            TokenKind::LBrace => {
                return Err(FlowchartError::unsupported("initializer block", start));
            }
            _ => {}
        }

        let return_type = if self.eat(TokenKind::Keyword(Keyword::Void)) {
            TypeName::void()
        } else {
            self.parse_type()?
        };
        let name_token = self.expect(TokenKind::Identifier, "member name")?;

        if !self.check(TokenKind::LParen) {
            let decl = self.parse_declarators(return_type, name_token.lexeme)?;
            self.expect(TokenKind::Semicolon, "';' after field declaration")?;
            program
                .fields
                .push(Statement::new(StmtKind::VarDecl(decl), self.span_from(start)));
            return Ok(());
        }

        self.advance();
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                self.eat(TokenKind::Keyword(Keyword::Final));
                let ty = self.parse_type()?;
                let name = self.expect_identifier("parameter name")?;
                params.push(Param { ty, name });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after parameters")?;
        if self.eat(TokenKind::Keyword(Keyword::Throws)) {
            loop {
                self.parse_qualified_name()?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::LBrace, "'{' to open method body")?;
        let body = self.parse_block_body()?;
        program.methods.push(MethodDecl {
            class: class.map(str::to_string),
            name: name_token.lexeme,
            return_type,
            params,
            body,
            span: self.span_from(start),
        });
        Ok(())
    }

    /// `Name`, `a.b.Name`, optionally followed by `[]` pairs
    pub(super) fn parse_type(&mut self) -> Result<TypeName> {
        let name = self.parse_qualified_name()?;
        if self.check(TokenKind::Lt) {
            return Err(FlowchartError::unsupported("generic type", self.location()));
        }
        let mut ty = TypeName::new(name);
        while self.check(TokenKind::LBracket) && self.peek_at(1).kind == TokenKind::RBracket {
            self.advance();
            self.advance();
            ty.array_dims += 1;
        }
        Ok(ty)
    }

    /// Lookahead: does a local variable declaration start here?
    fn at_declaration(&self) -> bool {
        let mut i = 0;
        if self.peek_at(i).kind != TokenKind::Identifier {
            return false;
        }
        i += 1;
        while self.peek_at(i).kind == TokenKind::Dot
            && self.peek_at(i + 1).kind == TokenKind::Identifier
        {
            i += 2;
        }
        if self.at_type_arguments(i) {
            return true;
        }
        while self.peek_at(i).kind == TokenKind::LBracket
            && self.peek_at(i + 1).kind == TokenKind::RBracket
        {
            i += 2;
        }
        self.peek_at(i).kind == TokenKind::Identifier
    }

    /// `<T>`, `<T,`, `<T<`, `<a.T`, `<T[` or `<?` after a type name. None of
    /// these can open an expression statement, so `parse_type` gets to reject
    /// the generic type.
    fn at_type_arguments(&self, i: usize) -> bool {
        if self.peek_at(i).kind != TokenKind::Lt {
            return false;
        }
        match self.peek_at(i + 1).kind {
            TokenKind::Question => true,
            TokenKind::Identifier => matches!(
                self.peek_at(i + 2).kind,
                TokenKind::Gt
                    | TokenKind::Comma
                    | TokenKind::Lt
                    | TokenKind::Dot
                    | TokenKind::LBracket
            ),
            _ => false,
        }
    }

    /// Declarators after the type and first name: `x = 1, y, z[] = {..}`
    fn parse_declarators(&mut self, ty: TypeName, first: String) -> Result<VarDecl> {
        let mut ty = ty;
        let mut declarators = Vec::new();
        let mut name = first;
        loop {
            // C-style `int a[] = ...`
            while self.check(TokenKind::LBracket) && self.peek_at(1).kind == TokenKind::RBracket {
                self.advance();
                self.advance();
                ty.array_dims += 1;
            }
            let init = if self.eat(TokenKind::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            declarators.push(Declarator { name, init });
            if !self.eat(TokenKind::Comma) {
                break;
            }
            name = self.expect_identifier("variable name")?;
        }
        Ok(VarDecl { ty, declarators })
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl Parser {
    /// Statements up to and including the closing `}`
    fn parse_block_body(&mut self) -> Result<Vec<Statement>> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) {
            if self.check(TokenKind::Eof) {
                return Err(self.error_here("expected '}' to close block".to_string()));
            }
            body.push(self.parse_statement()?);
        }
        self.advance();
        Ok(body)
    }

    pub fn parse_statement(&mut self) -> Result<Statement> {
        let start = self.location();
        let kind = match self.peek().kind {
            TokenKind::LBrace => {
                self.advance();
                StmtKind::Block(self.parse_block_body()?)
            }
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if()?,
            TokenKind::Keyword(Keyword::While) => self.parse_while()?,
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while()?,
            TokenKind::Keyword(Keyword::For) => self.parse_for()?,
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch()?,
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                let label = self.parse_jump_label()?;
                StmtKind::Break(label)
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                let label = self.parse_jump_label()?;
                StmtKind::Continue(label)
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semicolon, "';' after return")?;
                StmtKind::Return(value)
            }
            TokenKind::Keyword(Keyword::Try) => {
                return Err(FlowchartError::unsupported("try statement", start))
            }
            TokenKind::Keyword(Keyword::Throw) => {
                return Err(FlowchartError::unsupported("throw statement", start))
            }
            TokenKind::Keyword(Keyword::Class)
            | TokenKind::Keyword(Keyword::Interface)
            | TokenKind::Keyword(Keyword::Enum) => {
                return Err(FlowchartError::unsupported("local type declaration", start))
            }
            TokenKind::Identifier if self.peek_at(1).kind == TokenKind::Colon => {
                self.parse_labeled()?
            }
            TokenKind::Keyword(Keyword::Final) => {
                self.advance();
                self.parse_local_declaration()?
            }
            _ if self.at_declaration() => self.parse_local_declaration()?,
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "';' after expression")?;
                expression_statement(expr)
            }
        };
        Ok(Statement::new(kind, self.span_from(start)))
    }

    fn parse_jump_label(&mut self) -> Result<Option<String>> {
        let label = if self.check(TokenKind::Identifier) {
            Some(self.advance().lexeme)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "';' after jump")?;
        Ok(label)
    }

    fn parse_local_declaration(&mut self) -> Result<StmtKind> {
        let kind = self.parse_declaration_kind()?;
        self.expect(TokenKind::Semicolon, "';' after declaration")?;
        Ok(kind)
    }

    /// Declaration without its terminator (shared with `for` init)
    fn parse_declaration_kind(&mut self) -> Result<StmtKind> {
        let ty = self.parse_type()?;
        let name = self.expect_identifier("variable name")?;
        let mut decl = self.parse_declarators(ty, name)?;

        // `int num = sc.nextInt();` is an input statement
        let is_read = decl.declarators.len() == 1
            && decl.declarators[0].init.as_ref().map_or(false, is_read_call);
        if is_read {
            let declarator = decl.declarators.remove(0);
            if let Some(call) = declarator.init {
                return Ok(StmtKind::Read(ReadCall {
                    declared: Some(decl.ty),
                    target: Some(Expr::Ident(declarator.name)),
                    call,
                }));
            }
        }
        Ok(StmtKind::VarDecl(decl))
    }

    fn parse_labeled(&mut self) -> Result<StmtKind> {
        let label = self.advance().lexeme;
        self.advance(); // ':'
        let is_loop = matches!(
            self.peek().kind,
            TokenKind::Keyword(Keyword::For)
                | TokenKind::Keyword(Keyword::While)
                | TokenKind::Keyword(Keyword::Do)
        );
        if !is_loop {
            return Err(self.error_here(format!(
                "label '{}' must be followed by 'for', 'while' or 'do'",
                label
            )));
        }
        let body = self.parse_statement()?;
        Ok(StmtKind::Labeled {
            label,
            body: Box::new(body),
        })
    }

    fn parse_paren_condition(&mut self, keyword: &str) -> Result<Expr> {
        self.expect(TokenKind::LParen, &format!("'(' after '{}'", keyword))?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<StmtKind> {
        self.advance();
        let cond = self.parse_paren_condition("if")?;
        let then_branch = Box::new(self.parse_statement()?);
        // Nearest unmatched `if` takes the `else`: the innermost recursive
        // call sees it first.
        let else_branch = if self.eat(TokenKind::Keyword(Keyword::Else)) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<StmtKind> {
        self.advance();
        let cond = self.parse_paren_condition("while")?;
        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::While { cond, body })
    }

    fn parse_do_while(&mut self) -> Result<StmtKind> {
        self.advance();
        let body = Box::new(self.parse_statement()?);
        self.expect(TokenKind::Keyword(Keyword::While), "'while' after do body")?;
        let cond = self.parse_paren_condition("while")?;
        self.expect(TokenKind::Semicolon, "';' after do-while")?;
        Ok(StmtKind::DoWhile { body, cond })
    }

    fn parse_for(&mut self) -> Result<StmtKind> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'for'")?;
        self.eat(TokenKind::Keyword(Keyword::Final));

        // for (Type name : iterable)
        if self.at_declaration() && self.at_foreach_colon() {
            let ty = self.parse_type()?;
            let var = self.expect_identifier("loop variable")?;
            self.expect(TokenKind::Colon, "':' in for-each")?;
            let iterable = self.parse_expr()?;
            self.expect(TokenKind::RParen, "')' after for-each header")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(StmtKind::ForEach {
                ty,
                var,
                iterable,
                body,
            });
        }

        let mut init = Vec::new();
        if !self.check(TokenKind::Semicolon) {
            let start = self.location();
            if self.at_declaration() {
                let kind = self.parse_declaration_kind()?;
                init.push(Statement::new(kind, self.span_from(start)));
            } else {
                loop {
                    let start = self.location();
                    let expr = self.parse_expr()?;
                    init.push(Statement::new(
                        expression_statement(expr),
                        self.span_from(start),
                    ));
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
        }
        self.expect(TokenKind::Semicolon, "';' after for initializer")?;

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "';' after for condition")?;

        let mut update = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                update.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after for header")?;
        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::For {
            init,
            cond,
            update,
            body,
        })
    }

    /// After a declaration start, is the token following the name a `:`?
    fn at_foreach_colon(&self) -> bool {
        let mut i = 1;
        while self.peek_at(i).kind == TokenKind::Dot {
            i += 2;
        }
        while self.peek_at(i).kind == TokenKind::LBracket {
            i += 2;
        }
        // peek_at(i) is the variable name
        self.peek_at(i + 1).kind == TokenKind::Colon
    }

    fn parse_switch(&mut self) -> Result<StmtKind> {
        self.advance();
        let scrutinee = self.parse_paren_condition("switch")?;
        self.expect(TokenKind::LBrace, "'{' to open switch body")?;

        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let start = self.location();
            let label = match self.peek().kind {
                TokenKind::Keyword(Keyword::Case) => {
                    self.advance();
                    let value = self.parse_expr()?;
                    CaseLabel::Value(value)
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.advance();
                    CaseLabel::Default
                }
                _ => return Err(self.error_here("expected 'case' or 'default'".to_string())),
            };
            self.expect(TokenKind::Colon, "':' after case label")?;

            let mut body = Vec::new();
            while !matches!(
                self.peek().kind,
                TokenKind::Keyword(Keyword::Case)
                    | TokenKind::Keyword(Keyword::Default)
                    | TokenKind::RBrace
                    | TokenKind::Eof
            ) {
                body.push(self.parse_statement()?);
            }
            cases.push(Case {
                label,
                body,
                span: self.span_from(start),
            });
        }
        self.advance();
        Ok(StmtKind::Switch { scrutinee, cases })
    }
}

// ----------------------------------------------------------------------------
// Print / read recognition
// ----------------------------------------------------------------------------

/// `System.out.println(..)`, `System.err.print(..)`, C `printf(..)`
pub(super) fn print_kind(expr: &Expr) -> Option<PrintKind> {
    let Expr::Call { callee, .. } = expr else {
        return None;
    };
    match callee.as_ref() {
        Expr::Field { object, name } => {
            let stream = object.path()?;
            if stream != "System.out" && stream != "System.err" {
                return None;
            }
            match name.as_str() {
                "print" => Some(PrintKind::Print),
                "println" => Some(PrintKind::Println),
                "printf" | "format" => Some(PrintKind::Printf),
                _ => None,
            }
        }
        Expr::Ident(name) => match name.as_str() {
            "printf" => Some(PrintKind::Printf),
            "puts" => Some(PrintKind::Println),
            _ => None,
        },
        _ => None,
    }
}

/// `java.util.Scanner` token readers
const SCANNER_READS: &[&str] = &[
    "next",
    "nextLine",
    "nextInt",
    "nextLong",
    "nextShort",
    "nextByte",
    "nextDouble",
    "nextFloat",
    "nextBoolean",
    "nextBigInteger",
    "nextBigDecimal",
];

/// `sc.nextInt()`, `reader.readLine()`, `System.in.read()`, C `scanf(..)`.
/// Matched by method name only; the receiver's type is unknown here.
pub(super) fn is_read_call(expr: &Expr) -> bool {
    let Expr::Call { callee, .. } = expr else {
        return false;
    };
    match callee.as_ref() {
        Expr::Field { name, .. } => {
            SCANNER_READS.contains(&name.as_str()) || name == "readLine" || name == "read"
        }
        Expr::Ident(name) => name == "scanf",
        _ => false,
    }
}

/// Classify a bare expression used as a statement
fn expression_statement(expr: Expr) -> StmtKind {
    if let Some(kind) = print_kind(&expr) {
        if let Expr::Call { args, .. } = expr {
            return StmtKind::Print(PrintCall { kind, args });
        }
    }
    if is_read_call(&expr) {
        return StmtKind::Read(ReadCall {
            declared: None,
            target: None,
            call: expr,
        });
    }
    match expr {
        Expr::Assign { target, op, value } => {
            if op == AssignOp::Assign && is_read_call(&value) {
                StmtKind::Read(ReadCall {
                    declared: None,
                    target: Some(*target),
                    call: *value,
                })
            } else {
                StmtKind::Assign {
                    target: *target,
                    op,
                    value: *value,
                }
            }
        }
        other => StmtKind::Expr(other),
    }
}
