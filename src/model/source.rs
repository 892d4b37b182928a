//! Style sources and per-instance selections.

use serde::{Deserialize, Serialize};

use super::{InstanceId, StyleSourceId};

/// The unit of ownership for a set of declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StyleSource {
    /// Private overrides owned by a single instance.
    Local { id: StyleSourceId },
    /// A named, reusable set of declarations.
    Token { id: StyleSourceId, name: String },
}

impl StyleSource {
    pub fn id(&self) -> &StyleSourceId {
        match self {
            StyleSource::Local { id } | StyleSource::Token { id, .. } => id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, StyleSource::Local { .. })
    }

    /// Token name, if this is a token.
    pub fn name(&self) -> Option<&str> {
        match self {
            StyleSource::Token { name, .. } => Some(name),
            StyleSource::Local { .. } => None,
        }
    }
}

/// The ordered list of style sources applied to one instance.
///
/// Order is ascending precedence. The instance's local source outranks every
/// token wherever it appears in `values`; see [`StyleSourceSelection::ordered`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSourceSelection {
    pub instance_id: InstanceId,
    pub values: Vec<StyleSourceId>,
}

impl StyleSourceSelection {
    pub fn new(instance_id: impl Into<InstanceId>, values: Vec<StyleSourceId>) -> Self {
        Self {
            instance_id: instance_id.into(),
            values,
        }
    }

    /// Sources in cascade order: tokens in list order, then the local source.
    ///
    /// `is_local` classifies an id; unknown ids are treated as tokens so a
    /// dangling reference never changes the local source's rank.
    pub fn ordered<'a>(
        &'a self,
        is_local: impl Fn(&StyleSourceId) -> bool,
    ) -> impl Iterator<Item = &'a StyleSourceId> {
        let (locals, tokens): (Vec<_>, Vec<_>) = self.values.iter().partition(|id| is_local(id));
        tokens.into_iter().chain(locals)
    }

    pub fn contains(&self, id: &StyleSourceId) -> bool {
        self.values.contains(id)
    }
}
