//! Abstract syntax tree
//!
//! Every node owns its children; nothing is shared. `Display` renders an
//! expression or leaf statement in canonical form (minimal parentheses), which
//! is what ends up as diagram labels.

use serde::Serialize;
use std::fmt;

use crate::shared::models::Span;

/// Parsed source unit: every method in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub imports: Vec<String>,
    /// Static fields; parsed so a class body is accepted, not part of any CFG
    pub fields: Vec<Statement>,
    pub methods: Vec<MethodDecl>,
}

impl Program {
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDecl {
    /// Enclosing class, `None` for C-style top-level functions
    pub class: Option<String>,
    pub name: String,
    pub return_type: TypeName,
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub ty: TypeName,
    pub name: String,
}

/// A (possibly qualified) type name with array dimensions, e.g. `String[]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeName {
    pub name: String,
    pub array_dims: u8,
}

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            array_dims: 0,
        }
    }

    pub fn void() -> Self {
        Self::new("void")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub kind: StmtKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Straight-line statements that live inside a basic block
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::VarDecl(_)
                | StmtKind::Assign { .. }
                | StmtKind::Expr(_)
                | StmtKind::Print(_)
                | StmtKind::Read(_)
                | StmtKind::Return(_)
        )
    }

    pub fn is_io(&self) -> bool {
        matches!(self.kind, StmtKind::Print(_) | StmtKind::Read(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    VarDecl(VarDecl),
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    Expr(Expr),
    Print(PrintCall),
    Read(ReadCall),
    If {
        cond: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    For {
        init: Vec<Statement>,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Statement>,
    },
    ForEach {
        ty: TypeName,
        var: String,
        iterable: Expr,
        body: Box<Statement>,
    },
    While {
        cond: Expr,
        body: Box<Statement>,
    },
    DoWhile {
        body: Box<Statement>,
        cond: Expr,
    },
    Switch {
        scrutinee: Expr,
        cases: Vec<Case>,
    },
    /// Only ever wraps a `for`, `while` or `do` statement
    Labeled {
        label: String,
        body: Box<Statement>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Return(Option<Expr>),
    Block(Vec<Statement>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub ty: TypeName,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrintKind {
    Print,
    Println,
    Printf,
}

impl PrintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintKind::Print => "print",
            PrintKind::Println => "println",
            PrintKind::Printf => "printf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintCall {
    pub kind: PrintKind,
    pub args: Vec<Expr>,
}

/// Input statement: `num = sc.nextInt();`, `int num = sc.nextInt();` or a
/// bare `sc.nextLine();`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadCall {
    pub declared: Option<TypeName>,
    pub target: Option<Expr>,
    pub call: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub label: CaseLabel,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CaseLabel {
    Value(Expr),
    Default,
}

impl fmt::Display for CaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseLabel::Value(expr) => write!(f, "{}", expr),
            CaseLabel::Default => f.write_str("default"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Leaf statements render as their diagram label. Compound statements render
/// as their keyword only; their structure is expressed by the CFG.
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::VarDecl(decl) => {
                write!(f, "{} ", decl.ty)?;
                for (i, d) in decl.declarators.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&d.name)?;
                    if let Some(init) = &d.init {
                        write!(f, " = {}", init)?;
                    }
                }
                Ok(())
            }
            StmtKind::Assign { target, op, value } => {
                write!(f, "{} {} {}", target, op.as_str(), value)
            }
            StmtKind::Expr(expr) => write!(f, "{}", expr),
            StmtKind::Print(print) => {
                f.write_str(print.kind.as_str())?;
                if !print.args.is_empty() {
                    f.write_str(" ")?;
                    write_list(f, &print.args)?;
                }
                Ok(())
            }
            StmtKind::Read(read) => match &read.target {
                Some(target) => write!(f, "read {}", target),
                None => write!(f, "read {}", read.call),
            },
            StmtKind::Return(Some(value)) => write!(f, "return {}", value),
            StmtKind::Return(None) => f.write_str("return"),
            StmtKind::Break(Some(label)) => write!(f, "break {}", label),
            StmtKind::Break(None) => f.write_str("break"),
            StmtKind::Continue(Some(label)) => write!(f, "continue {}", label),
            StmtKind::Continue(None) => f.write_str("continue"),
            StmtKind::If { .. } => f.write_str("if"),
            StmtKind::For { .. } => f.write_str("for"),
            StmtKind::ForEach { .. } => f.write_str("for each"),
            StmtKind::While { .. } => f.write_str("while"),
            StmtKind::DoWhile { .. } => f.write_str("do"),
            StmtKind::Switch { .. } => f.write_str("switch"),
            StmtKind::Labeled { label, .. } => write!(f, "{}:", label),
            StmtKind::Block(_) => f.write_str("{}"),
            StmtKind::Empty => f.write_str(";"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Numeric literals keep their source spelling (`10L`, `2.5f`)
    Int(String),
    Float(String),
    /// String and char literals keep their quotes and escapes
    Str(String),
    Char(String),
    Bool(bool),
    Null,
    Ident(String),
    Field {
        object: Box<Expr>,
        name: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        ty: TypeName,
        args: Vec<Expr>,
    },
    NewArray {
        ty: TypeName,
        size: Box<Expr>,
    },
    ArrayInit(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then_value: Box<Expr>,
        else_value: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding power; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => PREC_OR,
            BinaryOp::And => PREC_AND,
            BinaryOp::Eq | BinaryOp::Ne => PREC_EQUALITY,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => PREC_RELATIONAL,
            BinaryOp::Add | BinaryOp::Sub => PREC_ADDITIVE,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => PREC_MULTIPLICATIVE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
        }
    }
}

pub const PREC_ASSIGN: u8 = 1;
pub const PREC_CONDITIONAL: u8 = 2;
pub const PREC_OR: u8 = 3;
pub const PREC_AND: u8 = 4;
pub const PREC_EQUALITY: u8 = 5;
pub const PREC_RELATIONAL: u8 = 6;
pub const PREC_ADDITIVE: u8 = 7;
pub const PREC_MULTIPLICATIVE: u8 = 8;
pub const PREC_UNARY: u8 = 9;
pub const PREC_POSTFIX: u8 = 10;
const PREC_PRIMARY: u8 = 11;

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Assign { .. } => PREC_ASSIGN,
            Expr::Conditional { .. } => PREC_CONDITIONAL,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { op, .. } if op.is_postfix() => PREC_POSTFIX,
            Expr::Unary { .. } => PREC_UNARY,
            _ => PREC_PRIMARY,
        }
    }

    /// Name of the called method for `a.b.name(...)` or `name(...)`
    pub fn call_name(&self) -> Option<&str> {
        match self {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Ident(name) => Some(name),
                Expr::Field { name, .. } => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Dotted path of a field chain, e.g. `System.out`
    pub fn path(&self) -> Option<String> {
        match self {
            Expr::Ident(name) => Some(name.clone()),
            Expr::Field { object, name } => object.path().map(|p| format!("{}.{}", p, name)),
            _ => None,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        let own = self.precedence();
        if own < min {
            f.write_str("(")?;
            self.fmt_bare(f)?;
            return f.write_str(")");
        }
        self.fmt_bare(f)
    }

    fn fmt_bare(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(text) | Expr::Float(text) | Expr::Str(text) | Expr::Char(text) => {
                f.write_str(text)
            }
            Expr::Bool(value) => write!(f, "{}", value),
            Expr::Null => f.write_str("null"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Field { object, name } => {
                object.fmt_prec(f, PREC_POSTFIX)?;
                write!(f, ".{}", name)
            }
            Expr::Index { object, index } => {
                object.fmt_prec(f, PREC_POSTFIX)?;
                write!(f, "[{}]", index)
            }
            Expr::Call { callee, args } => {
                callee.fmt_prec(f, PREC_POSTFIX)?;
                f.write_str("(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::New { ty, args } => {
                write!(f, "new {}(", ty)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::NewArray { ty, size } => write!(f, "new {}[{}]", ty, size),
            Expr::ArrayInit(items) => {
                f.write_str("{")?;
                write_list(f, items)?;
                f.write_str("}")
            }
            Expr::Unary { op, operand } if op.is_postfix() => {
                operand.fmt_prec(f, PREC_POSTFIX)?;
                f.write_str(op.as_str())
            }
            Expr::Unary { op, operand } => {
                f.write_str(op.as_str())?;
                // `- -y` and `+ ++y` must not print as `--y` and `+++y`
                if let Expr::Unary { op: inner, .. } = operand.as_ref() {
                    let sign = |op: &UnaryOp| match op {
                        UnaryOp::Neg | UnaryOp::PreDec => Some('-'),
                        UnaryOp::Plus | UnaryOp::PreInc => Some('+'),
                        _ => None,
                    };
                    if !inner.is_postfix() && sign(op).is_some() && sign(op) == sign(inner) {
                        f.write_str(" ")?;
                    }
                }
                operand.fmt_prec(f, PREC_UNARY)
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                lhs.fmt_prec(f, prec)?;
                write!(f, " {} ", op.as_str())?;
                rhs.fmt_prec(f, prec + 1)
            }
            Expr::Conditional {
                cond,
                then_value,
                else_value,
            } => {
                cond.fmt_prec(f, PREC_CONDITIONAL + 1)?;
                f.write_str(" ? ")?;
                then_value.fmt_prec(f, PREC_CONDITIONAL + 1)?;
                f.write_str(" : ")?;
                else_value.fmt_prec(f, PREC_CONDITIONAL)
            }
            Expr::Assign { target, op, value } => {
                target.fmt_prec(f, PREC_POSTFIX)?;
                write!(f, " {} ", op.as_str())?;
                value.fmt_prec(f, PREC_ASSIGN)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}
