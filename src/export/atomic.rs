//! Atom pool for atomic stylesheets.
//!
//! In atomic mode every declaration becomes its own single-property class.
//! Atoms are interned: identical declarations share one class, whichever
//! style sources declare them.

use std::collections::HashMap;

use sha1_smol::Sha1;

use crate::model::BreakpointId;
use crate::style::Property;

/// Number of hex digits of the SHA-1 kept in generated class names.
pub(crate) const HASH_LEN: usize = 12;

/// Everything that distinguishes one atomic rule from another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct AtomKey {
    pub layer: String,
    pub breakpoint: BreakpointId,
    pub state: Option<String>,
    pub property: Property,
    /// The value as written to CSS.
    pub value: String,
}

impl AtomKey {
    fn fingerprint(&self) -> String {
        // Unit separators keep `a|bc` and `ab|c` apart.
        [
            self.layer.as_str(),
            self.breakpoint.as_str(),
            self.state.as_deref().unwrap_or(""),
            self.property.as_str(),
            self.value.as_str(),
        ]
        .join("\u{1f}")
    }
}

/// `prefix` followed by the leading hex digits of `data`'s SHA-1.
pub(crate) fn hashed_class(prefix: &str, data: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data.as_bytes());
    let mut digest = hasher.digest().to_string();
    digest.truncate(HASH_LEN);
    format!("{prefix}{digest}")
}

/// Interns atom keys into content-addressed class names.
#[derive(Clone)]
pub(crate) struct AtomPool {
    prefix: String,
    classes: Vec<String>,
    intern_map: HashMap<AtomKey, usize>,
}

impl AtomPool {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            classes: Vec::new(),
            intern_map: HashMap::new(),
        }
    }

    /// Intern an atom, returning its class and whether it was new.
    pub fn intern(&mut self, key: AtomKey) -> (String, bool) {
        if let Some(&index) = self.intern_map.get(&key) {
            return (self.classes[index].clone(), false);
        }

        let class = hashed_class(&self.prefix, &key.fingerprint());
        self.intern_map.insert(key, self.classes.len());
        self.classes.push(class.clone());
        (class, true)
    }

    /// Number of distinct atoms.
    pub fn len(&self) -> usize {
        self.classes.len()
    }
}

impl std::fmt::Debug for AtomPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomPool")
            .field("count", &self.classes.len())
            .finish()
    }
}
