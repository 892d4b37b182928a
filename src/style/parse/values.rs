//! Parsing of text typed into a style control.

use cssparser::{Parser, ParserInput, Token};

use super::validate::ValueValidator;
use crate::style::{Property, StyleMap, ToCss, Unit, Value, write_number};

/// How the leading tokens of an input look.
#[derive(Debug, PartialEq)]
enum Shape {
    /// Not a lone number: treat the whole input as a keyword.
    Keyword,
    /// A number followed by anything but a single unit, e.g. `10p` or `10 +`.
    Partial,
    /// A number with an optional unit and nothing after it.
    Numeric { number: f64, unit: Option<Unit> },
}

/// Parse user input for `property` into a [`Value`].
///
/// A bare number inherits the unit of the property's current value in
/// `current_style`, so typing `10` into a field showing `5em` yields `10em`.
/// When a `validator` is given, values it rejects become unitless (if the
/// bare number is accepted) or `invalid`. This never fails: unusable input
/// becomes [`Value::Invalid`] carrying the original text.
pub fn parse_value(
    property: &Property,
    input: &str,
    current_style: &StyleMap,
    validator: Option<&dyn ValueValidator>,
) -> Value {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Value::invalid(input);
    }

    match classify(trimmed) {
        Shape::Partial => Value::invalid(input),
        Shape::Keyword => match validator {
            Some(validator) if !validator.supports(property, trimmed) => Value::invalid(input),
            _ => Value::keyword(trimmed),
        },
        Shape::Numeric { number, unit } => {
            let unit = unit
                .or_else(|| current_style.get(property).and_then(Value::unit_of))
                .unwrap_or(Unit::Number);
            let value = Value::unit(number, unit);

            let Some(validator) = validator else {
                return value;
            };
            if validator.supports(property, &value.to_css_string()) {
                return value;
            }

            let mut bare = String::new();
            write_number(&mut bare, number);
            if !unit.is_number() && validator.supports(property, &bare) {
                Value::number(number)
            } else {
                Value::invalid(input)
            }
        }
    }
}

fn classify(text: &str) -> Shape {
    let mut parser_input = ParserInput::new(text);
    let mut parser = Parser::new(&mut parser_input);

    let start = parser.position();
    let Ok(first) = parser.next().cloned() else {
        return Shape::Keyword;
    };
    let raw = parser.slice_from(start);

    // cssparser keeps numbers as f32; reparse the source text for full precision.
    let (number, mut unit) = match first {
        Token::Number { value, .. } => (parse_number(raw, f64::from(value)), None),
        Token::Percentage { unit_value, .. } => {
            let digits = raw.strip_suffix('%').unwrap_or(raw);
            (
                parse_number(digits, f64::from(unit_value) * 100.0),
                Some(Unit::Percent),
            )
        }
        Token::Dimension {
            value, ref unit, ..
        } => match Unit::from_token(unit) {
            Some(known) => {
                let digits = raw.get(..raw.len().saturating_sub(unit.len())).unwrap_or(raw);
                (parse_number(digits, f64::from(value)), Some(known))
            }
            None => return Shape::Partial,
        },
        _ => return Shape::Keyword,
    };

    // `10 px`: a separate unit token after a bare number.
    if unit.is_none() {
        match parser.next() {
            Err(_) => return Shape::Numeric { number, unit },
            Ok(Token::Ident(ident)) => match Unit::from_token(ident) {
                Some(known) => unit = Some(known),
                None => return Shape::Partial,
            },
            Ok(Token::Delim('%')) => unit = Some(Unit::Percent),
            Ok(_) => return Shape::Partial,
        }
    }

    // Anything after the unit (`10px 20`, `10-`, `5.px`) is still being typed.
    if parser.is_exhausted() {
        Shape::Numeric { number, unit }
    } else {
        Shape::Partial
    }
}

fn parse_number(text: &str, fallback: f64) -> f64 {
    text.parse().unwrap_or(fallback)
}
