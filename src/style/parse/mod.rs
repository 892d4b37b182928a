//! Parsing of user-typed style values.

pub(crate) mod color;
pub(crate) mod math;
pub(crate) mod validate;
pub(crate) mod values;

pub use color::parse_color_value;
pub use math::{UnitValue, evaluate_math, evaluate_unit_value};
pub use validate::{CssSyntaxValidator, ValueValidator};
pub(crate) use validate::is_complete_css;
pub use values::parse_value;
