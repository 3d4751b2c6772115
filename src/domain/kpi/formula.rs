//! Arithmetic formulas over project variables.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := number | ident | ident '(' expr (',' expr)* ')' | '(' expr ')' | '-' factor
//! ```
//!
//! Functions: `min`, `max` (one or more arguments) and `abs` (one argument).
//! Identifiers are case-insensitive.
//!
//! Formulas are limited to [`MAX_TOKENS`] tokens and [`MAX_DEPTH`] levels of
//! parentheses, negations and calls, which bounds the recursion of parsing
//! and evaluation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::progress::{project_progress, ProjectHierarchy};

/// Maximum number of tokens in a formula.
pub const MAX_TOKENS: usize = 512;

/// Maximum nesting of parentheses, negations and function calls.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unexpected character '{found}' at {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("Unexpected token '{found}' at {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("Formula exceeds {limit} tokens")]
    TooLong { limit: usize },

    #[error("Formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Function '{function}' takes {expected} argument(s), got {actual}")]
    WrongArity {
        function: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result is not a finite number")]
    NonFinite,
}

impl FormulaError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::CalculationFailed
    }
}

/// Named values a formula may reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaVariables {
    values: BTreeMap<String, f64>,
}

impl FormulaVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_ascii_lowercase(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Binds the standard project variables.
    ///
    /// Budget variables come from the first active budget and are zero
    /// when the project has none.
    pub fn for_project(hierarchy: &ProjectHierarchy) -> Self {
        let budget = hierarchy.active_budget();
        Self::new()
            .with("progress", project_progress(hierarchy).value())
            .with("action_count", hierarchy.action_count() as f64)
            .with("completed_actions", hierarchy.completed_action_count() as f64)
            .with("sub_action_count", hierarchy.sub_action_count() as f64)
            .with(
                "completed_sub_actions",
                hierarchy.completed_sub_action_count() as f64,
            )
            .with("planning_count", hierarchy.plannings.len() as f64)
            .with(
                "budget_initial",
                budget.and_then(|b| b.initial()).unwrap_or(0.0),
            )
            .with(
                "budget_consumed",
                budget.and_then(|b| b.consumed()).unwrap_or(0.0),
            )
            .with(
                "budget_remaining",
                budget.map(|b| b.remaining()).unwrap_or(0.0),
            )
            .with(
                "budget_utilization",
                budget.map(|b| b.consumption_percentage()).unwrap_or(0.0),
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Plus => "+".into(),
            TokenKind::Minus => "-".into(),
            TokenKind::Star => "*".into(),
            TokenKind::Slash => "/".into(),
            TokenKind::LParen => "(".into(),
            TokenKind::RParen => ")".into(),
            TokenKind::Comma => ",".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            c if c.is_ascii_digit() || c == '.' => {
                let mut text = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber(text.clone()))?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    position,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut text = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        text.push(d.to_ascii_lowercase());
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(text),
                    position,
                });
                continue;
            }
            other => {
                return Err(FormulaError::UnexpectedChar {
                    found: other,
                    position,
                })
            }
        };
        chars.next();
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Min,
    Max,
    Abs,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Function::Min),
            "max" => Some(Function::Max),
            "abs" => Some(Function::Abs),
            _ => None,
        }
    }

    fn check_arity(self, name: &str, actual: usize) -> Result<(), FormulaError> {
        let (ok, expected) = match self {
            Function::Min | Function::Max => (actual >= 1, "one or more"),
            Function::Abs => (actual == 1, "exactly one"),
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::WrongArity {
                function: name.to_string(),
                expected,
                actual,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Variable(String),
    Negate(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.cursor).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), FormulaError> {
        match self.advance() {
            Some(token) if token.kind == expected => Ok(()),
            Some(token) => Err(FormulaError::UnexpectedToken {
                found: token.kind.describe(),
                position: token.position,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.cursor += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.cursor += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        let token = self.advance().ok_or(FormulaError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Minus => {
                let inner = self.nested(Self::factor)?;
                Ok(Expr::Negate(Box::new(inner)))
            }
            TokenKind::LParen => self.nested(|p| {
                let inner = p.expr()?;
                p.expect(TokenKind::RParen)?;
                Ok(inner)
            }),
            TokenKind::Ident(name) if self.peek() == Some(&TokenKind::LParen) => {
                self.cursor += 1;
                let function =
                    Function::lookup(&name).ok_or(FormulaError::UnknownFunction(name.clone()))?;
                let args = self.nested(|p| {
                    let mut args = vec![p.expr()?];
                    while p.peek() == Some(&TokenKind::Comma) {
                        p.cursor += 1;
                        args.push(p.expr()?);
                    }
                    p.expect(TokenKind::RParen)?;
                    Ok(args)
                })?;
                function.check_arity(&name, args.len())?;
                Ok(Expr::Call(function, args))
            }
            TokenKind::Ident(name) => Ok(Expr::Variable(name)),
            other => Err(FormulaError::UnexpectedToken {
                found: other.describe(),
                position: token.position,
            }),
        }
    }
}

impl Expr {
    fn eval(&self, vars: &FormulaVariables) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Variable(name) => vars
                .get(name)
                .ok_or_else(|| FormulaError::UnknownVariable(name.clone())),
            Expr::Negate(inner) => Ok(-inner.eval(vars)?),
            Expr::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(vars)?, rhs.eval(vars)?);
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok(a * b),
                    BinaryOp::Div if b == 0.0 => Err(FormulaError::DivisionByZero),
                    BinaryOp::Div => Ok(a / b),
                }
            }
            Expr::Call(function, args) => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval(vars))
                    .collect::<Result<Vec<_>, _>>()?;
                let result = match function {
                    Function::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
                    Function::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    Function::Abs => values.first().copied().unwrap_or_default().abs(),
                };
                Ok(result)
            }
        }
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Negate(inner) => inner.collect_variables(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Expr::Call(_, args) => args.iter().for_each(|arg| arg.collect_variables(out)),
        }
    }
}

/// A parsed formula, ready to evaluate against any set of variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    root: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(FormulaError::TooLong { limit: MAX_TOKENS });
        }

        let mut parser = Parser::new(tokens);
        let root = parser.expr()?;
        if let Some(trailing) = parser.advance() {
            return Err(FormulaError::UnexpectedToken {
                found: trailing.kind.describe(),
                position: trailing.position,
            });
        }

        Ok(Self {
            source: source.trim().to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Variables referenced by the formula, in first-use order.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.collect_variables(&mut out);
        out
    }

    pub fn evaluate(&self, vars: &FormulaVariables) -> Result<f64, FormulaError> {
        let value = self.root.eval(vars)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite)
        }
    }
}
