//! Breakpoints and their cascade ordering.
//!
//! Breakpoints follow "mobile-first" media semantics. The base breakpoint has
//! no condition and always applies; `maxWidth` breakpoints narrow the viewport
//! and `minWidth` breakpoints widen it. [`compare_media`] is the single order
//! used both to resolve values and to emit `@media` blocks, so the generated
//! stylesheet cascades exactly like the resolver.

use std::cmp::Ordering;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::BreakpointId;

/// A named viewport condition scoping style declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub id: BreakpointId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

impl Breakpoint {
    /// The unconditional base breakpoint.
    pub fn base(id: impl Into<BreakpointId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            min_width: None,
            max_width: None,
        }
    }

    /// A breakpoint applying at `width` pixels and wider.
    pub fn min(id: impl Into<BreakpointId>, width: u32) -> Self {
        Self {
            min_width: Some(width),
            ..Self::base(id)
        }
    }

    /// A breakpoint applying at `width` pixels and narrower.
    pub fn max(id: impl Into<BreakpointId>, width: u32) -> Self {
        Self {
            max_width: Some(width),
            ..Self::base(id)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_base(&self) -> bool {
        self.min_width.is_none() && self.max_width.is_none()
    }

    /// The canvas width this breakpoint previews at (`None` for base).
    pub fn representative_width(&self) -> Option<u32> {
        self.min_width.or(self.max_width)
    }

    /// Whether this breakpoint's condition holds for a viewport `width` pixels wide.
    pub fn matches_width(&self, width: u32) -> bool {
        self.min_width.is_none_or(|min| min <= width)
            && self.max_width.is_none_or(|max| max >= width)
    }

    /// Whether this breakpoint applies while previewing `active`.
    ///
    /// The base breakpoint applies everywhere; while previewing the base
    /// breakpoint itself nothing else applies.
    pub fn applies_within(&self, active: &Breakpoint) -> bool {
        if self.is_base() {
            return true;
        }
        match active.representative_width() {
            Some(width) => self.matches_width(width),
            None => false,
        }
    }

    /// The media condition, e.g. `(min-width: 768px)`. `None` for base.
    pub fn media_query(&self) -> Option<String> {
        let mut query = String::new();
        if let Some(min) = self.min_width {
            write!(query, "(min-width: {min}px)").ok()?;
        }
        if let Some(max) = self.max_width {
            if !query.is_empty() {
                query.push_str(" and ");
            }
            write!(query, "(max-width: {max}px)").ok()?;
        }
        if query.is_empty() { None } else { Some(query) }
    }

    /// The display label, falling back to the media condition.
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        self.media_query().unwrap_or_else(|| "Base".to_string())
    }
}

/// Cascade order of two breakpoints.
///
/// - the base breakpoint sorts first
/// - `maxWidth` breakpoints sort by descending `maxWidth`
/// - `minWidth` breakpoints sort by ascending `minWidth`
/// - every `maxWidth` breakpoint sorts before every `minWidth` breakpoint
///
/// Equal conditions fall back to the id so the order stays total.
pub fn compare_media(a: &Breakpoint, b: &Breakpoint) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| a.id.cmp(&b.id))
}

/// Sort key: (group, width within group).
fn rank(bp: &Breakpoint) -> (u8, i64) {
    match (bp.min_width, bp.max_width) {
        (None, None) => (0, 0),
        (None, Some(max)) => (1, -i64::from(max)),
        (Some(min), _) => (2, i64::from(min)),
    }
}

/// Breakpoints created for a new project: base plus tablet and two mobile sizes.
pub fn initial_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint::base("base").with_label("Base"),
        Breakpoint::max("tablet", 991).with_label("Tablet"),
        Breakpoint::max("mobile-landscape", 767).with_label("Mobile landscape"),
        Breakpoint::max("mobile-portrait", 479).with_label("Mobile portrait"),
    ]
}
