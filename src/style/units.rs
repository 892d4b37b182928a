//! CSS units recognized by the value parser and the arithmetic evaluator.

use serde::{Deserialize, Serialize};

use super::ToCss;

/// Macro for defining the unit enum with its CSS token table.
///
/// Each variant maps to the token used in CSS text and in serialized values.
macro_rules! unit_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $css:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $css)]
                $variant,
            )*
        }

        impl $name {
            /// Every unit, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Returns the serialized token for this unit.
            #[inline]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $css,)*
                }
            }

            /// Parse a serialized unit token (exact match).
            #[inline]
            pub fn from_css(s: &str) -> Option<Self> {
                match s {
                    $($css => Some($name::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

unit_table! {
    /// A CSS unit, or `Number` for unitless values.
    pub enum Unit {
        /// Unitless number (serialized as `"number"`, written without a suffix).
        Number => "number",
        Percent => "%",
        // Absolute lengths
        Px => "px",
        Cm => "cm",
        Mm => "mm",
        Q => "q",
        In => "in",
        Pt => "pt",
        Pc => "pc",
        // Font-relative lengths
        Em => "em",
        Rem => "rem",
        Ex => "ex",
        Rex => "rex",
        Cap => "cap",
        Rcap => "rcap",
        Ch => "ch",
        Rch => "rch",
        Lh => "lh",
        Rlh => "rlh",
        Ic => "ic",
        Ric => "ric",
        // Viewport lengths
        Vw => "vw",
        Svw => "svw",
        Lvw => "lvw",
        Dvw => "dvw",
        Vh => "vh",
        Svh => "svh",
        Lvh => "lvh",
        Dvh => "dvh",
        Vi => "vi",
        Svi => "svi",
        Lvi => "lvi",
        Dvi => "dvi",
        Vb => "vb",
        Svb => "svb",
        Lvb => "lvb",
        Dvb => "dvb",
        Vmin => "vmin",
        Svmin => "svmin",
        Lvmin => "lvmin",
        Dvmin => "dvmin",
        Vmax => "vmax",
        Svmax => "svmax",
        Lvmax => "lvmax",
        Dvmax => "dvmax",
        // Container query lengths
        Cqw => "cqw",
        Cqh => "cqh",
        Cqi => "cqi",
        Cqb => "cqb",
        Cqmin => "cqmin",
        Cqmax => "cqmax",
        // Angles, times, frequencies, resolutions, flex
        Deg => "deg",
        Grad => "grad",
        Rad => "rad",
        Turn => "turn",
        S => "s",
        Ms => "ms",
        Hz => "hz",
        Khz => "khz",
        Dpi => "dpi",
        Dpcm => "dpcm",
        Dppx => "dppx",
        X => "x",
        Fr => "fr",
    }
}

impl Unit {
    /// Recognize a unit typed by a user (ASCII case-insensitive).
    ///
    /// `number` is a serialization tag, not something a user types after a
    /// value, so it is never recognized here.
    pub fn from_token(token: &str) -> Option<Self> {
        match Self::from_css(&token.to_ascii_lowercase()) {
            Some(Unit::Number) | None => None,
            unit => unit,
        }
    }

    /// The longest unit token at the start of `s`, with its byte length.
    pub fn longest_prefix(s: &str) -> Option<(Self, usize)> {
        Self::ALL
            .iter()
            .filter(|unit| **unit != Unit::Number)
            .filter_map(|unit| {
                let token = unit.as_str();
                let candidate = s.get(..token.len())?;
                candidate
                    .eq_ignore_ascii_case(token)
                    .then_some((*unit, token.len()))
            })
            .max_by_key(|(_, len)| *len)
    }

    pub fn is_number(&self) -> bool {
        *self == Unit::Number
    }
}

impl ToCss for Unit {
    fn to_css(&self, buf: &mut String) {
        if !self.is_number() {
            buf.push_str(self.as_str());
        }
    }
}
