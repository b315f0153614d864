//! Restricted arithmetic expressions.
//!
//! Grammar (whitespace allowed between tokens):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := ('+' | '-') factor | primary
//! primary := NUMBER | '(' expr ')'
//! NUMBER  := [0-9.]+  (must parse as a decimal)
//! ```
//!
//! `×` and `÷` are accepted as aliases for `*` and `/`. Nothing else is a
//! valid token, so user input can only ever describe arithmetic.

use std::fmt;
use thiserror::Error;

/// Nesting limit for parentheses and unary signs
pub const MAX_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected '{token}' at position {pos}")]
    UnexpectedToken { token: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("expression nests deeper than {MAX_DEPTH} levels")]
    TooDeep,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NonFinite,
}

/// Binary arithmetic operators, in the order the solver tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    pub fn symbol(&self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        }
    }

    /// Raw IEEE application; callers decide how to treat small divisors
    #[inline]
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Op::Add => lhs + rhs,
            Op::Sub => lhs - rhs,
            Op::Mul => lhs * rhs,
            Op::Div => lhs / rhs,
        }
    }
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: Op,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: Op, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0, depth: 0 };
        let expr = parser.expr()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(expr),
            Some(t) => Err(ExpressionError::UnexpectedToken {
                token: t.kind.to_string(),
                pos: t.pos,
            }),
        }
    }

    pub fn eval(&self) -> Result<f64, ExpressionError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.eval()?,
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval()?;
                let r = rhs.eval()?;
                if *op == Op::Div && r == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                op.apply(l, r)
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExpressionError::NonFinite)
        }
    }

    /// Numeric literals in source order. Unary signs are operators, so `-5`
    /// contributes the literal 5.
    pub fn literals(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.collect_literals(&mut out);
        out
    }

    fn collect_literals(&self, out: &mut Vec<f64>) {
        match self {
            Expr::Number(n) => out.push(*n),
            Expr::Neg(inner) => inner.collect_literals(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_literals(out);
                rhs.collect_literals(out);
            }
        }
    }
}

/// Every binary node is parenthesised, so the rendering re-parses to the
/// same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Op(Op),
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Op(op) => write!(f, "{}", op.symbol()),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let kind = match ch {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value: f64 = text
                    .parse()
                    .map_err(|_| ExpressionError::InvalidNumber(text.clone()))?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    pos: start,
                });
                continue;
            }
            '+' => TokenKind::Op(Op::Add),
            '-' | '−' => TokenKind::Op(Op::Sub),
            '*' | '×' => TokenKind::Op(Op::Mul),
            '/' | '÷' => TokenKind::Op(Op::Div),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => return Err(ExpressionError::UnexpectedChar { ch: other, pos: i }),
        };
        tokens.push(Token { kind, pos: i });
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.term()?;
        while let Some(TokenKind::Op(op @ (Op::Add | Op::Sub))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.factor()?;
        while let Some(TokenKind::Op(op @ (Op::Mul | Op::Div))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, ExpressionError> {
        match self.peek() {
            Some(TokenKind::Op(Op::Sub)) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.factor()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(TokenKind::Op(Op::Add)) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.factor()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        let token = match self.tokens.get(self.pos) {
            Some(t) => t.clone(),
            None => return Err(ExpressionError::UnexpectedEnd),
        };
        self.pos += 1;

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.tokens.get(self.pos) {
                    Some(Token { kind: TokenKind::RParen, .. }) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(t) => Err(ExpressionError::UnexpectedToken {
                        token: t.kind.to_string(),
                        pos: t.pos,
                    }),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            other => Err(ExpressionError::UnexpectedToken {
                token: other.to_string(),
                pos: token.pos,
            }),
        }
    }
}
