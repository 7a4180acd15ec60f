//! Expression parsing by precedence climbing
//!
//! Binding powers come from the AST's precedence table so parsing and
//! label rendering agree on grouping.

use crate::features::lexing::domain::{Keyword, TokenKind};
use crate::features::parsing::domain::ast::*;
use crate::shared::models::{FlowchartError, Result};

use super::parser::Parser;

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::OrOr => Some(BinaryOp::Or),
        TokenKind::AndAnd => Some(BinaryOp::And),
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::Ne),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::Le),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::Ge),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Rem),
        _ => None,
    }
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Assign => Some(AssignOp::Assign),
        TokenKind::PlusAssign => Some(AssignOp::Add),
        TokenKind::MinusAssign => Some(AssignOp::Sub),
        TokenKind::StarAssign => Some(AssignOp::Mul),
        TokenKind::SlashAssign => Some(AssignOp::Div),
        TokenKind::PercentAssign => Some(AssignOp::Rem),
        _ => None,
    }
}

fn is_assignable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Ident(_) | Expr::Field { .. } | Expr::Index { .. }
    )
}

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_assignment()
    }

    /// Right associative: `a = b = c` is `a = (b = c)`
    fn parse_assignment(&mut self) -> Result<Expr> {
        let start = self.location();
        let lhs = self.parse_conditional()?;
        let Some(op) = assign_op(self.peek().kind) else {
            return Ok(lhs);
        };
        if !is_assignable(&lhs) {
            return Err(FlowchartError::parse(
                format!("invalid assignment target '{}'", lhs),
                start,
            ));
        }
        self.advance();
        let value = self.parse_assignment()?;
        Ok(Expr::Assign {
            target: Box::new(lhs),
            op,
            value: Box::new(value),
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr> {
        let cond = self.parse_binary(PREC_OR)?;
        if !self.eat(TokenKind::Question) {
            return Ok(cond);
        }
        let then_value = self.parse_expr()?;
        self.expect(TokenKind::Colon, "':' in conditional expression")?;
        let else_value = self.parse_conditional()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
        })
    }

    /// Left associative binary operators at or above `min_prec`
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = binary_op(self.peek().kind) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_identifier("member name after '.'")?;
                    expr = Expr::Field {
                        object: Box::new(expr),
                        name,
                    };
                }
                TokenKind::LParen if matches!(expr, Expr::Ident(_) | Expr::Field { .. }) => {
                    self.advance();
                    let args = self.parse_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "']' after index")?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.advance().kind == TokenKind::PlusPlus {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    expr = Expr::Unary {
                        op,
                        operand: Box::new(expr),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma separated expressions up to the closing `)`; the `(` is consumed
    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after arguments")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        let expr = match token.kind {
            TokenKind::IntLiteral => Expr::Int(token.lexeme),
            TokenKind::FloatLiteral => Expr::Float(token.lexeme),
            TokenKind::StringLiteral => Expr::Str(token.lexeme),
            TokenKind::CharLiteral => Expr::Char(token.lexeme),
            TokenKind::Keyword(Keyword::True) => Expr::Bool(true),
            TokenKind::Keyword(Keyword::False) => Expr::Bool(false),
            TokenKind::Keyword(Keyword::Null) => Expr::Null,
            TokenKind::Identifier => Expr::Ident(token.lexeme),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')' to close group")?;
                return Ok(inner);
            }
            TokenKind::LBrace => {
                self.advance();
                return self.parse_array_init();
            }
            TokenKind::Keyword(Keyword::New) => {
                self.advance();
                return self.parse_new();
            }
            _ => return Err(self.error_here("expected an expression".to_string())),
        };
        self.advance();
        Ok(expr)
    }

    /// `{a, b, c}` after the opening brace; a trailing comma is allowed
    fn parse_array_init(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        while !self.check(TokenKind::RBrace) {
            items.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}' to close array initializer")?;
        Ok(Expr::ArrayInit(items))
    }

    /// `new Type(args)` or `new Type[size]`
    fn parse_new(&mut self) -> Result<Expr> {
        let ty = self.parse_type()?;
        if self.eat(TokenKind::LParen) {
            let args = self.parse_arguments()?;
            return Ok(Expr::New { ty, args });
        }
        self.expect(TokenKind::LBracket, "'(' or '[' after type in 'new'")?;
        let size = self.parse_expr()?;
        self.expect(TokenKind::RBracket, "']' after array size")?;
        Ok(Expr::NewArray {
            ty,
            size: Box::new(size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lexing::tokenize;
    use crate::shared::models::ErrorKind;

    fn expr(source: &str) -> Expr {
        Parser::new(tokenize(source)).parse_expr().unwrap()
    }

    #[test]
    fn test_precedence_climbing() {
        assert_eq!(expr("a + b * c - d").to_string(), "a + b * c - d");
        assert_eq!(expr("(a + b) * c").to_string(), "(a + b) * c");
        assert_eq!(expr("i <= n / 2 && !found").to_string(), "i <= n / 2 && !found");
    }

    #[test]
    fn test_redundant_parentheses_are_dropped() {
        assert_eq!(expr("((n % i) == 0)").to_string(), "n % i == 0");
    }

    #[test]
    fn test_left_associativity() {
        let Expr::Binary { lhs, .. } = expr("a - b - c") else {
            panic!("expected binary");
        };
        assert_eq!(lhs.to_string(), "a - b");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let Expr::Assign { value, .. } = expr("a = b = 3") else {
            panic!("expected assignment");
        };
        assert!(matches!(*value, Expr::Assign { .. }));
    }

    #[test]
    fn test_postfix_and_calls() {
        assert_eq!(expr("arr[i]++").to_string(), "arr[i]++");
        assert_eq!(expr("sc.nextInt()").call_name(), Some("nextInt"));
        assert_eq!(expr("new Scanner(System.in)").to_string(), "new Scanner(System.in)");
        assert_eq!(expr("new int[n + 1]").to_string(), "new int[n + 1]");
    }

    #[test]
    fn test_conditional() {
        assert_eq!(expr("a > b ? a : b").to_string(), "a > b ? a : b");
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = Parser::new(tokenize("1 = x"))
            .parse_expr()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }
}
