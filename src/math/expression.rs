//! Load intensity expressions in the beam coordinate `x`
//!
//! Accepts plain arithmetic with explicit operators, e.g. `"2*x + 5"`,
//! `"3*x^2 - x/4"` or `"10*sin(pi*x/6)"`. Expressions that reduce to a
//! polynomial in `x` are kept in that exact form so they can be integrated
//! in closed form; anything else is evaluated numerically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::polynomial::Polynomial;
use crate::error::{BeamError, BeamResult};

/// Highest integer power expanded into an exact polynomial
const MAX_POLY_POWER: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Abs,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "exp" => Some(Func::Exp),
            "ln" | "log" => Some(Func::Ln),
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            _ => None,
        }
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Exp => v.exp(),
            Func::Ln => v.ln(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Num(f64),
    X,
    Neg(Box<Node>),
    Add(Box<Node>, Box<Node>),
    Sub(Box<Node>, Box<Node>),
    Mul(Box<Node>, Box<Node>),
    Div(Box<Node>, Box<Node>),
    Pow(Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

impl Node {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Node::Num(v) => *v,
            Node::X => x,
            Node::Neg(a) => -a.eval(x),
            Node::Add(a, b) => a.eval(x) + b.eval(x),
            Node::Sub(a, b) => a.eval(x) - b.eval(x),
            Node::Mul(a, b) => a.eval(x) * b.eval(x),
            Node::Div(a, b) => a.eval(x) / b.eval(x),
            Node::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Node::Call(f, a) => f.apply(a.eval(x)),
        }
    }

    /// Exact polynomial form in global `x`, if there is one
    fn to_polynomial(&self) -> Option<Polynomial> {
        match self {
            Node::Num(v) => Some(Polynomial::constant(*v)),
            Node::X => Some(Polynomial::monomial(1.0, 1)),
            Node::Neg(a) => Some(-&a.to_polynomial()?),
            Node::Add(a, b) => Some(&a.to_polynomial()? + &b.to_polynomial()?),
            Node::Sub(a, b) => Some(&a.to_polynomial()? + &(-&b.to_polynomial()?)),
            Node::Mul(a, b) => Some(a.to_polynomial()?.product(&b.to_polynomial()?)),
            Node::Div(a, b) => {
                let denom = b.to_polynomial()?;
                match denom.degree() {
                    Some(0) => Some(a.to_polynomial()?.scaled(1.0 / denom.coeffs()[0])),
                    _ => None,
                }
            }
            Node::Pow(a, b) => {
                let exponent = b.to_polynomial()?;
                let n = match exponent.degree() {
                    None => 0.0,
                    Some(0) => exponent.coeffs()[0],
                    _ => return None,
                };
                if n < 0.0 || n.fract() != 0.0 || n > MAX_POLY_POWER as f64 {
                    return None;
                }
                let base = a.to_polynomial()?;
                let mut out = Polynomial::constant(1.0);
                for _ in 0..n as u32 {
                    out = out.product(&base);
                }
                Some(out)
            }
            Node::Call(f, a) => {
                // Only constant arguments fold to a polynomial
                let arg = a.to_polynomial()?;
                match arg.degree() {
                    None => Some(Polynomial::constant(f.apply(0.0))),
                    Some(0) => Some(Polynomial::constant(f.apply(arg.coeffs()[0]))),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation, e.g. 1.5e-3
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("malformed number '{}'", text))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token stream
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(format!("expected {:?}, found {:?}", expected, tok)),
            None => Err(format!("expected {:?}, found end of input", expected)),
        }
    }

    fn parse_expr(&mut self) -> Result<Node, String> {
        let mut lhs = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    lhs = Node::Add(Box::new(lhs), Box::new(self.parse_term()?));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    lhs = Node::Sub(Box::new(lhs), Box::new(self.parse_term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Node, String> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    lhs = Node::Mul(Box::new(lhs), Box::new(self.parse_unary()?));
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    lhs = Node::Div(Box::new(lhs), Box::new(self.parse_unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Node, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Node::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Node, String> {
        let base = self.parse_primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            // Right associative: 2^3^2 = 2^(3^2)
            let exponent = self.parse_unary()?;
            return Ok(Node::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Node, String> {
        match self.next() {
            Some(Token::Num(v)) => Ok(Node::Num(v)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "x" => Ok(Node::X),
                "pi" => Ok(Node::Num(std::f64::consts::PI)),
                "e" => Ok(Node::Num(std::f64::consts::E)),
                _ => {
                    let func = Func::from_name(&name)
                        .ok_or_else(|| format!("unknown symbol '{}' (only x is allowed)", name))?;
                    self.expect(Token::LParen)?;
                    let arg = self.parse_expr()?;
                    self.expect(Token::RParen)?;
                    Ok(Node::Call(func, Box::new(arg)))
                }
            },
            Some(tok) => Err(format!("unexpected {:?}", tok)),
            None => Err("unexpected end of input".to_string()),
        }
    }
}

/// A parsed load intensity expression `f(x)`.
///
/// Equality and hashing use the whitespace-free source text, so two loads
/// written the same way compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoadExpression {
    source: String,
    tree: Node,
    polynomial: Option<Polynomial>,
}

impl LoadExpression {
    /// Parse an expression in the variable `x`
    pub fn parse(src: &str) -> BeamResult<Self> {
        let invalid = |reason: String| BeamError::InvalidExpression {
            expr: src.to_string(),
            reason,
        };
        let tokens = tokenize(src).map_err(invalid)?;
        if tokens.is_empty() {
            return Err(invalid("expression is empty".to_string()));
        }
        let mut parser = Parser { tokens, pos: 0 };
        let tree = parser.parse_expr().map_err(invalid)?;
        if let Some(tok) = parser.peek() {
            return Err(invalid(format!(
                "unexpected trailing {:?} (use * between coefficients and x)",
                tok
            )));
        }
        let polynomial = tree.to_polynomial();
        if let Some(p) = &polynomial {
            if p.coeffs().iter().any(|c| !c.is_finite()) {
                return Err(invalid("expression evaluates to a non-finite value".to_string()));
            }
        }
        Ok(Self {
            source: src.split_whitespace().collect(),
            tree,
            polynomial,
        })
    }

    /// Expression from an exact polynomial in global `x`
    pub fn from_polynomial(poly: Polynomial) -> Self {
        let mut tree = Node::Num(0.0);
        let mut terms = Vec::new();
        for (k, &c) in poly.coeffs().iter().enumerate() {
            let term = Node::Mul(
                Box::new(Node::Num(c)),
                Box::new(Node::Pow(Box::new(Node::X), Box::new(Node::Num(k as f64)))),
            );
            tree = Node::Add(Box::new(tree), Box::new(term));
            terms.push(match k {
                0 => format!("({})", c),
                1 => format!("({})*x", c),
                _ => format!("({})*x^{}", c, k),
            });
        }
        let source = if terms.is_empty() { "0".to_string() } else { terms.join("+") };
        Self {
            source,
            tree,
            polynomial: Some(poly),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate at beam coordinate `x`
    pub fn eval(&self, x: f64) -> f64 {
        match &self.polynomial {
            Some(p) => p.eval(x),
            None => self.tree.eval(x),
        }
    }

    /// Exact polynomial form in global `x`, when the expression has one
    pub fn polynomial(&self) -> Option<&Polynomial> {
        self.polynomial.as_ref()
    }
}

impl PartialEq for LoadExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for LoadExpression {}

impl Hash for LoadExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Display for LoadExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl TryFrom<String> for LoadExpression {
    type Error = BeamError;

    fn try_from(value: String) -> BeamResult<Self> {
        Self::parse(&value)
    }
}

impl From<LoadExpression> for String {
    fn from(value: LoadExpression) -> Self {
        value.source
    }
}
