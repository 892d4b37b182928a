//! Style property identifiers and their CSS names.
//!
//! Properties are stored under a canonical camelCase identifier
//! (`backgroundColor`) and written to CSS under their hyphenated name
//! (`background-color`). Custom properties and identifiers missing from the
//! table are written verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier of a style property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Property(String);

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build a property from a CSS name (`background-color` → `backgroundColor`).
    ///
    /// Names missing from the table are kept as given.
    pub fn from_css_name(css: &str) -> Self {
        match canonical_of(css) {
            Some(canonical) => Self(canonical.to_string()),
            None => Self(css.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The CSS property name this identifier maps to.
    pub fn css_name(&self) -> &str {
        css_name_of(&self.0).unwrap_or(&self.0)
    }

    /// Whether the property is in the known table.
    pub fn is_known(&self) -> bool {
        css_name_of(&self.0).is_some()
    }

    /// Custom properties (`--name`).
    pub fn is_custom(&self) -> bool {
        self.0.starts_with("--")
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Property {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Generate the canonical ⇄ CSS name lookup functions.
macro_rules! known_properties {
    ($($canonical:ident => $css:literal),* $(,)?) => {
        fn css_name_of(canonical: &str) -> Option<&'static str> {
            match canonical {
                $(stringify!($canonical) => Some($css),)*
                _ => None,
            }
        }

        fn canonical_of(css: &str) -> Option<&'static str> {
            match css {
                $($css => Some(stringify!($canonical)),)*
                _ => None,
            }
        }
    };
}

known_properties! {
    // Layout
    display => "display",
    position => "position",
    top => "top",
    right => "right",
    bottom => "bottom",
    left => "left",
    zIndex => "z-index",
    float => "float",
    clear => "clear",
    boxSizing => "box-sizing",
    overflow => "overflow",
    overflowX => "overflow-x",
    overflowY => "overflow-y",
    visibility => "visibility",
    // Sizing
    width => "width",
    height => "height",
    minWidth => "min-width",
    maxWidth => "max-width",
    minHeight => "min-height",
    maxHeight => "max-height",
    aspectRatio => "aspect-ratio",
    objectFit => "object-fit",
    objectPosition => "object-position",
    // Spacing
    marginTop => "margin-top",
    marginRight => "margin-right",
    marginBottom => "margin-bottom",
    marginLeft => "margin-left",
    paddingTop => "padding-top",
    paddingRight => "padding-right",
    paddingBottom => "padding-bottom",
    paddingLeft => "padding-left",
    // Flex and grid
    flexDirection => "flex-direction",
    flexWrap => "flex-wrap",
    flexGrow => "flex-grow",
    flexShrink => "flex-shrink",
    flexBasis => "flex-basis",
    order => "order",
    alignItems => "align-items",
    alignContent => "align-content",
    alignSelf => "align-self",
    justifyContent => "justify-content",
    justifyItems => "justify-items",
    justifySelf => "justify-self",
    rowGap => "row-gap",
    columnGap => "column-gap",
    gridTemplateColumns => "grid-template-columns",
    gridTemplateRows => "grid-template-rows",
    gridColumnStart => "grid-column-start",
    gridColumnEnd => "grid-column-end",
    gridRowStart => "grid-row-start",
    gridRowEnd => "grid-row-end",
    gridAutoFlow => "grid-auto-flow",
    // Typography
    color => "color",
    fontFamily => "font-family",
    fontSize => "font-size",
    fontWeight => "font-weight",
    fontStyle => "font-style",
    lineHeight => "line-height",
    letterSpacing => "letter-spacing",
    wordSpacing => "word-spacing",
    textAlign => "text-align",
    textIndent => "text-indent",
    textTransform => "text-transform",
    textDecorationLine => "text-decoration-line",
    textDecorationStyle => "text-decoration-style",
    textDecorationColor => "text-decoration-color",
    textShadow => "text-shadow",
    whiteSpace => "white-space",
    wordBreak => "word-break",
    overflowWrap => "overflow-wrap",
    hyphens => "hyphens",
    verticalAlign => "vertical-align",
    // Backgrounds and borders
    backgroundColor => "background-color",
    backgroundImage => "background-image",
    backgroundPosition => "background-position",
    backgroundSize => "background-size",
    backgroundRepeat => "background-repeat",
    borderTopWidth => "border-top-width",
    borderRightWidth => "border-right-width",
    borderBottomWidth => "border-bottom-width",
    borderLeftWidth => "border-left-width",
    borderTopStyle => "border-top-style",
    borderRightStyle => "border-right-style",
    borderBottomStyle => "border-bottom-style",
    borderLeftStyle => "border-left-style",
    borderTopColor => "border-top-color",
    borderRightColor => "border-right-color",
    borderBottomColor => "border-bottom-color",
    borderLeftColor => "border-left-color",
    borderTopLeftRadius => "border-top-left-radius",
    borderTopRightRadius => "border-top-right-radius",
    borderBottomLeftRadius => "border-bottom-left-radius",
    borderBottomRightRadius => "border-bottom-right-radius",
    outlineWidth => "outline-width",
    outlineStyle => "outline-style",
    outlineColor => "outline-color",
    outlineOffset => "outline-offset",
    // Effects
    opacity => "opacity",
    boxShadow => "box-shadow",
    filter => "filter",
    backdropFilter => "backdrop-filter",
    mixBlendMode => "mix-blend-mode",
    cursor => "cursor",
    pointerEvents => "pointer-events",
    userSelect => "user-select",
    // Transforms and motion
    transform => "transform",
    transformOrigin => "transform-origin",
    translate => "translate",
    rotate => "rotate",
    scale => "scale",
    transitionProperty => "transition-property",
    transitionDuration => "transition-duration",
    transitionTimingFunction => "transition-timing-function",
    transitionDelay => "transition-delay",
    // Lists
    listStyleType => "list-style-type",
    listStylePosition => "list-style-position",
}
