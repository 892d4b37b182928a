//! # strata
//!
//! A breakpoint-aware style cascade for visual editors.
//!
//! ## Features
//!
//! - Style declarations scoped to a style source, breakpoint and pseudo-state
//! - Resolve the single effective value of any property at any breakpoint
//! - Forgiving parsing of typed values, including unit inheritance and
//!   safe arithmetic
//! - Deterministic stylesheet generation that reproduces the resolver in
//!   any browser, as per-source or atomic classes
//!
//! ## Quick Start
//!
//! ```
//! use strata::{InstanceId, Snapshot, StyleDecl, Value, resolve};
//!
//! let box_id = InstanceId::from("box");
//! let snapshot = Snapshot::new()
//!     .create_token("t1", "Card")?
//!     .attach_token(&box_id, &"t1".into(), None)?
//!     .set_decl(StyleDecl::new("t1", "base", "width", Value::px(200.0)))?;
//!
//! // The base declaration cascades down to every max-width breakpoint.
//! let width = resolve(&snapshot, &box_id, &"width".into(), &"mobile-portrait".into(), None);
//! assert_eq!(width, Some(Value::px(200.0)));
//! # Ok::<(), strata::Error>(())
//! ```
//!
//! ## Parsing Input
//!
//! ```
//! use strata::{Property, StyleMap, Unit, Value, parse_value};
//!
//! let mut current = StyleMap::new();
//! current.insert(Property::from("width"), Value::unit(5.0, Unit::Em));
//!
//! // A bare number keeps the unit the field already shows.
//! let parsed = parse_value(&Property::from("width"), "10", &current, None);
//! assert_eq!(parsed, Value::unit(10.0, Unit::Em));
//! ```

pub mod error;
pub mod export;
pub mod model;
pub mod style;

pub use error::{Error, Result, StructuralError};
pub use export::{GenerateOptions, GeneratedCss, Warning, WarningKind, generate};
pub use model::{
    Breakpoint, BreakpointId, InstanceId, Snapshot, SnapshotData, StyleDecl, StyleSource,
    StyleSourceId, StyleSourceSelection, compare_media,
};
pub use style::{
    CssSyntaxValidator, Property, StyleMap, ToCss, Unit, UnitValue, Value, ValueValidator,
    evaluate_math, evaluate_unit_value, parse_color_value, parse_value, resolve, resolve_style,
    resolve_with_origin,
};
