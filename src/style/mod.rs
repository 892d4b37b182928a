//! Style values, parsing and the cascade.
//!
//! This module contains:
//! - The closed [`Value`] type with its units and CSS serialization
//! - Property identifiers and their CSS names
//! - The forgiving value parser and arithmetic evaluator
//! - The cascade resolver computing effective values

mod cascade;
pub(crate) mod parse;
mod properties;
mod units;
mod value;

/// Serialization to CSS text.
pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

// Re-export value types
pub use properties::Property;
pub use units::Unit;
pub use value::Value;
pub(crate) use value::write_number;

// Re-export parser entry points
pub use parse::{
    CssSyntaxValidator, UnitValue, ValueValidator, evaluate_math, evaluate_unit_value,
    parse_color_value, parse_value,
};

// Re-export cascade functions
pub use cascade::{ResolvedValue, StyleMap, active_breakpoints, resolve, resolve_style, resolve_with_origin};
