//! Stylesheet export.
//!
//! Turns a [`Snapshot`](crate::model::Snapshot) into publishable CSS plus the
//! class names each instance needs.
//!
//! # Architecture
//!
//! Generation runs in two steps:
//! - `plan` lays out cascade layers, media blocks and rules
//! - the plan is printed with [`ToCss`](crate::style::ToCss)
//!
//! Rules either target one class per style source, or (atomic mode) one
//! interned class per distinct declaration.

mod atomic;
mod css_gen;
mod layers;
mod plan;

pub use css_gen::{GenerateOptions, GeneratedCss, LOCAL_LAYER, Warning, WarningKind, generate};
