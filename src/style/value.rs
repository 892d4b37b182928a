//! The closed set of style values.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::ToCss;
use super::parse::is_complete_css;
use super::units::Unit;

/// A style value.
///
/// Serialized with a `"type"` tag (`keyword`, `unit`, `hex-color`, `rgb`,
/// `position`, `tuple`, `function`, `invalid`) and the payload fields inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Value {
    /// A keyword or any other value kept as text (`auto`, `red`, `calc(…)`).
    Keyword { value: String },
    /// A number with a unit; [`Unit::Number`] for unitless values.
    Unit { value: f64, unit: Unit },
    /// A hex colour including the leading `#`.
    HexColor { value: String },
    /// An sRGB colour; channels 0–255, alpha 0–1.
    Rgb { r: f64, g: f64, b: f64, alpha: f64 },
    /// A two-axis position.
    Position { x: Box<Value>, y: Box<Value> },
    /// Space-separated layers, e.g. a transform list.
    Tuple { value: Vec<Value> },
    /// A CSS function call such as `blur(4px)`.
    Function { name: String, args: Box<Value> },
    /// Input that could not be parsed yet. Never committed.
    Invalid { raw: String },
}

impl Value {
    pub fn keyword(value: impl Into<String>) -> Self {
        Value::Keyword {
            value: value.into(),
        }
    }

    pub fn unit(value: f64, unit: Unit) -> Self {
        Value::Unit { value, unit }
    }

    pub fn px(value: f64) -> Self {
        Value::Unit {
            value,
            unit: Unit::Px,
        }
    }

    pub fn number(value: f64) -> Self {
        Value::Unit {
            value,
            unit: Unit::Number,
        }
    }

    pub fn invalid(raw: impl Into<String>) -> Self {
        Value::Invalid { raw: raw.into() }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid { .. })
    }

    /// Whether this value or anything nested in it is [`Value::Invalid`].
    pub fn contains_invalid(&self) -> bool {
        match self {
            Value::Invalid { .. } => true,
            Value::Position { x, y } => x.contains_invalid() || y.contains_invalid(),
            Value::Tuple { value } => value.iter().any(Value::contains_invalid),
            Value::Function { args, .. } => args.contains_invalid(),
            _ => false,
        }
    }

    /// The unit carried by this value, if it is a `unit` value.
    pub fn unit_of(&self) -> Option<Unit> {
        match self {
            Value::Unit { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    /// Why this value cannot be written to a stylesheet, if it cannot.
    ///
    /// Nested values are checked recursively.
    pub fn unsupported_reason(&self) -> Option<String> {
        match self {
            Value::Invalid { raw } => Some(format!("invalid value {raw:?}")),
            Value::Keyword { value } => {
                if value.trim().is_empty() {
                    Some("empty keyword".to_string())
                } else if !is_complete_css(value) {
                    Some(format!("keyword {value:?} is not a complete CSS value"))
                } else {
                    None
                }
            }
            Value::Unit { value, .. } => {
                (!value.is_finite()).then(|| format!("non-finite number {value}"))
            }
            Value::HexColor { value } => {
                let digits = value.strip_prefix('#').unwrap_or(value);
                let valid = matches!(digits.len(), 3 | 4 | 6 | 8)
                    && digits.chars().all(|c| c.is_ascii_hexdigit());
                (!valid).then(|| format!("malformed hex colour {value:?}"))
            }
            Value::Rgb { r, g, b, alpha } => [r, g, b, alpha]
                .iter()
                .any(|c| !c.is_finite())
                .then(|| "non-finite colour channel".to_string()),
            Value::Position { x, y } => x.unsupported_reason().or_else(|| y.unsupported_reason()),
            Value::Tuple { value } => {
                if value.is_empty() {
                    Some("empty tuple".to_string())
                } else {
                    value.iter().find_map(Value::unsupported_reason)
                }
            }
            Value::Function { name, args } => {
                let valid_name = !name.is_empty()
                    && name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                if valid_name {
                    args.unsupported_reason()
                } else {
                    Some(format!("malformed function name {name:?}"))
                }
            }
        }
    }
}

/// Write a number in its shortest round-trippable form.
pub(crate) fn write_number(buf: &mut String, value: f64) {
    // Normalize -0 so equal values always print the same text.
    let value = if value == 0.0 { 0.0 } else { value };
    write!(buf, "{value}").unwrap();
}

impl ToCss for Value {
    fn to_css(&self, buf: &mut String) {
        match self {
            Value::Keyword { value } => buf.push_str(value.trim()),
            Value::Unit { value, unit } => {
                write_number(buf, *value);
                unit.to_css(buf);
            }
            Value::HexColor { value } => {
                if !value.starts_with('#') {
                    buf.push('#');
                }
                buf.push_str(value);
            }
            Value::Rgb { r, g, b, alpha } => {
                let channel = |c: f64| c.round().clamp(0.0, 255.0);
                if *alpha >= 1.0 {
                    write!(buf, "rgb({}, {}, {})", channel(*r), channel(*g), channel(*b)).unwrap();
                } else {
                    write!(buf, "rgba({}, {}, {}, ", channel(*r), channel(*g), channel(*b))
                        .unwrap();
                    write_number(buf, alpha.clamp(0.0, 1.0));
                    buf.push(')');
                }
            }
            Value::Position { x, y } => {
                x.to_css(buf);
                buf.push(' ');
                y.to_css(buf);
            }
            Value::Tuple { value } => {
                for (i, item) in value.iter().enumerate() {
                    if i > 0 {
                        buf.push(' ');
                    }
                    item.to_css(buf);
                }
            }
            Value::Function { name, args } => {
                buf.push_str(name);
                buf.push('(');
                match args.as_ref() {
                    // Function arguments are comma-separated.
                    Value::Tuple { value } => {
                        for (i, item) in value.iter().enumerate() {
                            if i > 0 {
                                buf.push_str(", ");
                            }
                            item.to_css(buf);
                        }
                    }
                    other => other.to_css(buf),
                }
                buf.push(')');
            }
            Value::Invalid { raw } => buf.push_str(raw),
        }
    }
}
