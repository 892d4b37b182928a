//! Document data model for styling.
//!
//! This module contains:
//! - Identifier newtypes for instances, breakpoints and style sources
//! - Breakpoints and the media ordering shared by the resolver and generator
//! - Style sources (local overrides and named tokens) and per-instance selections
//! - Style declarations and the copy-on-write [`Snapshot`] that owns them

mod breakpoint;
mod snapshot;
mod source;

use std::fmt;

use serde::{Deserialize, Serialize};

// Re-export breakpoint types
pub use breakpoint::{Breakpoint, compare_media, initial_breakpoints};

// Re-export style source types
pub use source::{StyleSource, StyleSourceSelection};

// Re-export snapshot types
pub use snapshot::{DeclKey, Snapshot, SnapshotData, StyleDecl};

/// Define a string identifier newtype with serde, display and conversions.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Identifier of a UI instance in the document tree.
    InstanceId
}

string_id! {
    /// Identifier of a [`Breakpoint`].
    BreakpointId
}

string_id! {
    /// Identifier of a [`StyleSource`].
    StyleSourceId
}
