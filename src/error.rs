//! Error types for strata operations.

use thiserror::Error;

use crate::model::{BreakpointId, InstanceId, StyleSourceId};

/// Errors returned by snapshot edits, loading and stylesheet generation.
///
/// Parsing user input and resolving the cascade never fail; see
/// [`parse_value`](crate::parse_value) and [`resolve`](crate::resolve).
#[derive(Error, Debug)]
pub enum Error {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("refusing to commit an invalid value for `{property}`: {raw:?}")]
    InvalidValue { property: String, raw: String },

    #[error("unknown breakpoint: {0}")]
    UnknownBreakpoint(BreakpointId),

    #[error("unknown style source: {0}")]
    UnknownStyleSource(StyleSourceId),

    #[error("instance has no style source selection: {0}")]
    UnknownInstance(InstanceId),

    #[error("instance has no local style source: {0}")]
    NoLocalSource(InstanceId),

    #[error("style source {0} is not a token")]
    NotAToken(StyleSourceId),

    #[error("new order for {0} is not a permutation of its selection")]
    SelectionMismatch(InstanceId),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error(
        "duplicate declaration for {property} on {style_source_id} at {breakpoint_id} (state {})",
        .state.as_deref().unwrap_or("none")
    )]
    DuplicateDeclaration {
        style_source_id: StyleSourceId,
        breakpoint_id: BreakpointId,
        state: Option<String>,
        property: String,
    },

    #[error("invalid breakpoint: {0}")]
    BaseBreakpoint(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inconsistencies in a snapshot detected before a stylesheet is generated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("declaration for `{property}` on {style_source_id} references unknown breakpoint {breakpoint_id}")]
    DeclUnknownBreakpoint {
        style_source_id: StyleSourceId,
        breakpoint_id: BreakpointId,
        property: String,
    },

    #[error("declaration for `{property}` references unknown style source {style_source_id}")]
    DeclUnknownStyleSource {
        style_source_id: StyleSourceId,
        property: String,
    },

    #[error("selection of instance {instance_id} references unknown style source {style_source_id}")]
    SelectionUnknownStyleSource {
        instance_id: InstanceId,
        style_source_id: StyleSourceId,
    },

    #[error("local style source {style_source_id} is selected by both {first} and {second}")]
    SharedLocalSource {
        style_source_id: StyleSourceId,
        first: InstanceId,
        second: InstanceId,
    },

    #[error("instance {0} selects more than one local style source")]
    MultipleLocalSources(InstanceId),

    #[error("no base breakpoint")]
    MissingBaseBreakpoint,

    #[error("more than one base breakpoint: {0} and {1}")]
    MultipleBaseBreakpoints(BreakpointId, BreakpointId),

    #[error("breakpoint {0} has both minWidth and maxWidth")]
    BothBounds(BreakpointId),

    #[error("breakpoints {0} and {1} share the same condition")]
    DuplicateCondition(BreakpointId, BreakpointId),
}

pub type Result<T> = std::result::Result<T, Error>;
