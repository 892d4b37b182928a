//! Arithmetic typed into numeric inputs (`10 * 2`, `16px + 4`).
//!
//! Only numbers and the four basic operators are understood; anything else
//! makes the whole expression fail, so user text is never executed.

use serde::{Deserialize, Serialize};

use crate::style::Unit;

/// Result of [`evaluate_unit_value`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitValue {
    /// The evaluated number, or `None` if the expression is malformed.
    pub math_result: Option<f64>,
    /// The first unit found in the expression.
    pub matched_unit: Option<Unit>,
}

/// Evaluate a plain arithmetic expression.
///
/// Standard precedence, left associative, with unary `+`/`-`. Returns `None`
/// for empty or malformed input, characters outside digits, whitespace and
/// `.+-*/`, and non-finite results such as division by zero.
pub fn evaluate_math(expr: &str) -> Option<f64> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return None;
    }
    let mut parser = MathParser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

/// Evaluate an expression that may carry units, e.g. `10px + 5`.
///
/// Unit tokens are stripped (longest match, ASCII case-insensitive) and the
/// first one is reported. Units are not converted: `10px - 5rem` is `5` in
/// `px`. Nothing is left where a unit was, so `10px5` reads as `105`.
pub fn evaluate_unit_value(expr: &str) -> UnitValue {
    let mut stripped = String::with_capacity(expr.len());
    let mut matched_unit = None;
    let mut rest = expr;

    while let Some(c) = rest.chars().next() {
        if c.is_ascii_alphabetic() || c == '%' {
            if let Some((unit, len)) = Unit::longest_prefix(rest) {
                matched_unit.get_or_insert(unit);
                rest = &rest[len..];
                continue;
            }
        }
        stripped.push(c);
        rest = &rest[c.len_utf8()..];
    }

    UnitValue {
        math_result: evaluate_math(&stripped),
        matched_unit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tok {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
}

fn tokenize(expr: &str) -> Option<Vec<Tok>> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b if b.is_ascii_whitespace() => i += 1,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // Rejects `.`, `1.2.3` and similar.
                let number: f64 = expr[start..i].parse().ok()?;
                tokens.push(Tok::Num(number));
            }
            b'+' | b'-' => {
                // `++` and `--` are increment/decrement, not two signs.
                if bytes.get(i + 1) == Some(&b) {
                    return None;
                }
                tokens.push(if b == b'+' { Tok::Plus } else { Tok::Minus });
                i += 1;
            }
            b'*' => {
                tokens.push(Tok::Star);
                i += 1;
            }
            b'/' => {
                tokens.push(Tok::Slash);
                i += 1;
            }
            _ => return None,
        }
    }

    Some(tokens)
}

struct MathParser {
    tokens: Vec<Tok>,
    pos: usize,
}

impl MathParser {
    fn peek(&self) -> Option<Tok> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op @ (Tok::Plus | Tok::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Tok::Plus { value + rhs } else { value - rhs };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        while let Some(op @ (Tok::Star | Tok::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == Tok::Star { value * rhs } else { value / rhs };
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        match self.bump()? {
            Tok::Num(n) => Some(n),
            Tok::Plus => self.unary(),
            Tok::Minus => self.unary().map(|v| -v),
            Tok::Star | Tok::Slash => None,
        }
    }
}
