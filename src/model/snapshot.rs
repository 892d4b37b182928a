//! Style declarations and the per-revision document snapshot.
//!
//! A [`Snapshot`] is immutable: every edit returns a new revision and leaves
//! the receiver untouched, so a reader holding an older snapshot never sees
//! a partially applied edit. Collections live behind `Arc` and are only
//! cloned when a revision actually changes them.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::breakpoint::{Breakpoint, compare_media};
use super::source::{StyleSource, StyleSourceSelection};
use super::{BreakpointId, InstanceId, StyleSourceId};
use crate::error::{Error, Result, StructuralError};
use crate::style::{Property, ToCss, Value};

/// One property assignment scoped to a style source, breakpoint and state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDecl {
    pub style_source_id: StyleSourceId,
    pub breakpoint_id: BreakpointId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub property: Property,
    pub value: Value,
}

impl StyleDecl {
    pub fn new(
        style_source_id: impl Into<StyleSourceId>,
        breakpoint_id: impl Into<BreakpointId>,
        property: impl Into<Property>,
        value: Value,
    ) -> Self {
        Self {
            style_source_id: style_source_id.into(),
            breakpoint_id: breakpoint_id.into(),
            state: None,
            property: property.into(),
            value,
        }
    }

    /// Scope this declaration to a pseudo-state such as `:hover`.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn key(&self) -> DeclKey {
        DeclKey {
            style_source_id: self.style_source_id.clone(),
            breakpoint_id: self.breakpoint_id.clone(),
            state: self.state.clone(),
            property: self.property.clone(),
        }
    }
}

/// The unique key of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclKey {
    pub style_source_id: StyleSourceId,
    pub breakpoint_id: BreakpointId,
    pub state: Option<String>,
    pub property: Property,
}

impl DeclKey {
    pub fn new(
        style_source_id: &StyleSourceId,
        breakpoint_id: &BreakpointId,
        state: Option<&str>,
        property: &Property,
    ) -> Self {
        Self {
            style_source_id: style_source_id.clone(),
            breakpoint_id: breakpoint_id.clone(),
            state: state.map(str::to_string),
            property: property.clone(),
        }
    }
}

/// The persisted, field-for-field shape of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    #[serde(default)]
    pub breakpoints: Vec<Breakpoint>,
    #[serde(default)]
    pub style_sources: Vec<StyleSource>,
    #[serde(default, alias = "styleSourceSelections")]
    pub selections: Vec<StyleSourceSelection>,
    #[serde(default, alias = "styles")]
    pub decls: Vec<StyleDecl>,
}

impl SnapshotData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One immutable revision of a document's style data.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    breakpoints: Arc<BTreeMap<BreakpointId, Breakpoint>>,
    style_sources: Arc<BTreeMap<StyleSourceId, StyleSource>>,
    selections: Arc<BTreeMap<InstanceId, StyleSourceSelection>>,
    decls: Arc<BTreeMap<DeclKey, Value>>,
}

impl Snapshot {
    /// An empty document with the starter breakpoints.
    pub fn new() -> Self {
        let breakpoints = super::initial_breakpoints()
            .into_iter()
            .map(|bp| (bp.id.clone(), bp))
            .collect();
        Self {
            breakpoints: Arc::new(breakpoints),
            ..Self::default()
        }
    }

    /// Build a snapshot from its persisted shape.
    ///
    /// Duplicate ids and duplicate declaration keys are rejected here because
    /// the indexed form cannot represent them. Dangling references are kept
    /// and reported by [`Snapshot::validate`].
    pub fn from_data(data: SnapshotData) -> Result<Self> {
        let mut breakpoints = BTreeMap::new();
        for bp in data.breakpoints {
            if breakpoints.contains_key(&bp.id) {
                return Err(Error::DuplicateId(bp.id.0));
            }
            breakpoints.insert(bp.id.clone(), bp);
        }

        let mut style_sources = BTreeMap::new();
        for source in data.style_sources {
            if style_sources.contains_key(source.id()) {
                return Err(Error::DuplicateId(source.id().0.clone()));
            }
            style_sources.insert(source.id().clone(), source);
        }

        let mut selections = BTreeMap::new();
        for selection in data.selections {
            if selections.contains_key(&selection.instance_id) {
                return Err(Error::DuplicateId(selection.instance_id.0));
            }
            selections.insert(selection.instance_id.clone(), selection);
        }

        let mut decls = BTreeMap::new();
        for decl in data.decls {
            let key = decl.key();
            if decls.contains_key(&key) {
                return Err(Error::DuplicateDeclaration {
                    style_source_id: key.style_source_id,
                    breakpoint_id: key.breakpoint_id,
                    state: key.state,
                    property: key.property.to_string(),
                });
            }
            decls.insert(key, decl.value);
        }

        Ok(Self {
            breakpoints: Arc::new(breakpoints),
            style_sources: Arc::new(style_sources),
            selections: Arc::new(selections),
            decls: Arc::new(decls),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_data(SnapshotData::from_json(json)?)
    }

    /// The persisted shape; breakpoints in cascade order, everything else by id.
    pub fn to_data(&self) -> SnapshotData {
        SnapshotData {
            breakpoints: self.breakpoints().into_iter().cloned().collect(),
            style_sources: self.style_sources.values().cloned().collect(),
            selections: self.selections.values().cloned().collect(),
            decls: self
                .decls
                .iter()
                .map(|(key, value)| StyleDecl {
                    style_source_id: key.style_source_id.clone(),
                    breakpoint_id: key.breakpoint_id.clone(),
                    state: key.state.clone(),
                    property: key.property.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn breakpoint(&self, id: &BreakpointId) -> Option<&Breakpoint> {
        self.breakpoints.get(id)
    }

    /// All breakpoints in cascade order.
    pub fn breakpoints(&self) -> Vec<&Breakpoint> {
        let mut bps: Vec<_> = self.breakpoints.values().collect();
        bps.sort_by(|a, b| compare_media(a, b));
        bps
    }

    pub fn base_breakpoint(&self) -> Option<&Breakpoint> {
        self.breakpoints.values().find(|bp| bp.is_base())
    }

    pub fn style_source(&self, id: &StyleSourceId) -> Option<&StyleSource> {
        self.style_sources.get(id)
    }

    pub fn style_sources(&self) -> impl Iterator<Item = &StyleSource> {
        self.style_sources.values()
    }

    pub fn is_local(&self, id: &StyleSourceId) -> bool {
        self.style_sources
            .get(id)
            .is_some_and(StyleSource::is_local)
    }

    pub fn selection(&self, instance: &InstanceId) -> Option<&StyleSourceSelection> {
        self.selections.get(instance)
    }

    pub fn selections(&self) -> impl Iterator<Item = &StyleSourceSelection> {
        self.selections.values()
    }

    /// The local source selected by `instance`, if any.
    pub fn local_source_of(&self, instance: &InstanceId) -> Option<&StyleSourceId> {
        self.selections
            .get(instance)?
            .values
            .iter()
            .find(|id| self.is_local(id))
    }

    /// The value declared under exactly this key.
    pub fn decl(&self, key: &DeclKey) -> Option<&Value> {
        self.decls.get(key)
    }

    /// Look up one declaration without building a [`DeclKey`] by hand.
    pub fn lookup(
        &self,
        source: &StyleSourceId,
        breakpoint: &BreakpointId,
        state: Option<&str>,
        property: &Property,
    ) -> Option<&Value> {
        self.decls
            .get(&DeclKey::new(source, breakpoint, state, property))
    }

    /// Every declaration, ordered by key.
    pub fn decls(&self) -> impl Iterator<Item = (&DeclKey, &Value)> {
        self.decls.iter()
    }

    /// Declarations owned by one style source.
    pub fn decls_of<'a>(
        &'a self,
        source: &'a StyleSourceId,
    ) -> impl Iterator<Item = (&'a DeclKey, &'a Value)> + 'a {
        self.decls
            .iter()
            .filter(move |(key, _)| &key.style_source_id == source)
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Check referential integrity and breakpoint invariants.
    pub fn validate(&self) -> std::result::Result<(), StructuralError> {
        let mut base: Option<&BreakpointId> = None;
        let mut conditions: BTreeMap<(Option<u32>, Option<u32>), &BreakpointId> = BTreeMap::new();
        for bp in self.breakpoints.values() {
            if bp.min_width.is_some() && bp.max_width.is_some() {
                return Err(StructuralError::BothBounds(bp.id.clone()));
            }
            if bp.is_base() {
                if let Some(first) = base {
                    return Err(StructuralError::MultipleBaseBreakpoints(
                        first.clone(),
                        bp.id.clone(),
                    ));
                }
                base = Some(&bp.id);
            } else if let Some(other) = conditions.insert((bp.min_width, bp.max_width), &bp.id) {
                return Err(StructuralError::DuplicateCondition(
                    other.clone(),
                    bp.id.clone(),
                ));
            }
        }
        if base.is_none() {
            return Err(StructuralError::MissingBaseBreakpoint);
        }

        let mut local_owner: BTreeMap<&StyleSourceId, &InstanceId> = BTreeMap::new();
        for selection in self.selections.values() {
            let mut locals = 0;
            for id in &selection.values {
                let Some(source) = self.style_sources.get(id) else {
                    return Err(StructuralError::SelectionUnknownStyleSource {
                        instance_id: selection.instance_id.clone(),
                        style_source_id: id.clone(),
                    });
                };
                if !source.is_local() {
                    continue;
                }
                locals += 1;
                if let Some(first) = local_owner.insert(id, &selection.instance_id) {
                    return Err(StructuralError::SharedLocalSource {
                        style_source_id: id.clone(),
                        first: first.clone(),
                        second: selection.instance_id.clone(),
                    });
                }
            }
            if locals > 1 {
                return Err(StructuralError::MultipleLocalSources(
                    selection.instance_id.clone(),
                ));
            }
        }

        for key in self.decls.keys() {
            if !self.style_sources.contains_key(&key.style_source_id) {
                return Err(StructuralError::DeclUnknownStyleSource {
                    style_source_id: key.style_source_id.clone(),
                    property: key.property.to_string(),
                });
            }
            if !self.breakpoints.contains_key(&key.breakpoint_id) {
                return Err(StructuralError::DeclUnknownBreakpoint {
                    style_source_id: key.style_source_id.clone(),
                    breakpoint_id: key.breakpoint_id.clone(),
                    property: key.property.to_string(),
                });
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Edits (each returns a new revision)
    // ------------------------------------------------------------------

    /// Insert or replace one declaration.
    pub fn set_decl(&self, decl: StyleDecl) -> Result<Self> {
        if decl.value.contains_invalid() {
            let raw = match &decl.value {
                Value::Invalid { raw } => raw.clone(),
                nested => nested.to_css_string(),
            };
            return Err(Error::InvalidValue {
                property: decl.property.to_string(),
                raw,
            });
        }
        if !self.breakpoints.contains_key(&decl.breakpoint_id) {
            return Err(Error::UnknownBreakpoint(decl.breakpoint_id));
        }
        if !self.style_sources.contains_key(&decl.style_source_id) {
            return Err(Error::UnknownStyleSource(decl.style_source_id));
        }

        let mut next = self.clone();
        let key = decl.key();
        Arc::make_mut(&mut next.decls).insert(key, decl.value);
        Ok(next)
    }

    /// Remove one declaration. Removing an absent key returns an equal revision.
    pub fn delete_decl(&self, key: &DeclKey) -> Self {
        if !self.decls.contains_key(key) {
            return self.clone();
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.decls).remove(key);
        next
    }

    pub fn add_breakpoint(&self, breakpoint: Breakpoint) -> Result<Self> {
        if self.breakpoints.contains_key(&breakpoint.id) {
            return Err(Error::DuplicateId(breakpoint.id.0));
        }
        if breakpoint.min_width.is_some() && breakpoint.max_width.is_some() {
            return Err(StructuralError::BothBounds(breakpoint.id).into());
        }
        if let Some(existing) = self.breakpoints.values().find(|bp| {
            bp.min_width == breakpoint.min_width && bp.max_width == breakpoint.max_width
        }) {
            if breakpoint.is_base() {
                return Err(StructuralError::MultipleBaseBreakpoints(
                    existing.id.clone(),
                    breakpoint.id,
                )
                .into());
            }
            return Err(
                StructuralError::DuplicateCondition(existing.id.clone(), breakpoint.id).into(),
            );
        }

        let mut next = self.clone();
        Arc::make_mut(&mut next.breakpoints).insert(breakpoint.id.clone(), breakpoint);
        Ok(next)
    }

    /// Remove a breakpoint together with every declaration scoped to it.
    pub fn remove_breakpoint(&self, id: &BreakpointId) -> Result<Self> {
        let Some(bp) = self.breakpoints.get(id) else {
            return Err(Error::UnknownBreakpoint(id.clone()));
        };
        if bp.is_base() {
            return Err(Error::BaseBreakpoint(format!(
                "the base breakpoint {id} cannot be removed"
            )));
        }

        let mut next = self.clone();
        Arc::make_mut(&mut next.breakpoints).remove(id);
        Arc::make_mut(&mut next.decls).retain(|key, _| &key.breakpoint_id != id);
        Ok(next)
    }

    /// Return the instance's local source, creating it as `new_id` if needed.
    ///
    /// A new local source is appended to the instance's selection.
    pub fn ensure_local_source(
        &self,
        instance: &InstanceId,
        new_id: impl Into<StyleSourceId>,
    ) -> Result<(Self, StyleSourceId)> {
        if let Some(existing) = self.local_source_of(instance) {
            return Ok((self.clone(), existing.clone()));
        }
        let id = new_id.into();
        if self.style_sources.contains_key(&id) {
            return Err(Error::DuplicateId(id.0));
        }

        let mut next = self.clone();
        Arc::make_mut(&mut next.style_sources)
            .insert(id.clone(), StyleSource::Local { id: id.clone() });
        Arc::make_mut(&mut next.selections)
            .entry(instance.clone())
            .or_insert_with(|| StyleSourceSelection::new(instance.clone(), Vec::new()))
            .values
            .push(id.clone());
        debug!(instance = %instance, source = %id, "created local style source");
        Ok((next, id))
    }

    pub fn create_token(&self, id: impl Into<StyleSourceId>, name: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if self.style_sources.contains_key(&id) {
            return Err(Error::DuplicateId(id.0));
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.style_sources).insert(
            id.clone(),
            StyleSource::Token {
                id,
                name: name.into(),
            },
        );
        Ok(next)
    }

    pub fn rename_token(&self, id: &StyleSourceId, name: impl Into<String>) -> Result<Self> {
        self.expect_token(id)?;
        let mut next = self.clone();
        if let Some(StyleSource::Token { name: current, .. }) =
            Arc::make_mut(&mut next.style_sources).get_mut(id)
        {
            *current = name.into();
        }
        Ok(next)
    }

    /// Delete a token, its declarations, and every reference to it.
    pub fn delete_token(&self, id: &StyleSourceId) -> Result<Self> {
        self.expect_token(id)?;
        let mut next = self.clone();
        Arc::make_mut(&mut next.style_sources).remove(id);
        Arc::make_mut(&mut next.decls).retain(|key, _| &key.style_source_id != id);
        for selection in Arc::make_mut(&mut next.selections).values_mut() {
            selection.values.retain(|value| value != id);
        }
        Ok(next)
    }

    /// Select a token on an instance, at `position` among its sources or last.
    ///
    /// Attaching an already selected token moves it.
    pub fn attach_token(
        &self,
        instance: &InstanceId,
        token: &StyleSourceId,
        position: Option<usize>,
    ) -> Result<Self> {
        self.expect_token(token)?;
        let mut next = self.clone();
        let selection = Arc::make_mut(&mut next.selections)
            .entry(instance.clone())
            .or_insert_with(|| StyleSourceSelection::new(instance.clone(), Vec::new()));
        selection.values.retain(|value| value != token);
        let index = position
            .unwrap_or(selection.values.len())
            .min(selection.values.len());
        selection.values.insert(index, token.clone());
        Ok(next)
    }

    pub fn detach_token(&self, instance: &InstanceId, token: &StyleSourceId) -> Self {
        let attached = self
            .selections
            .get(instance)
            .is_some_and(|selection| selection.contains(token));
        if !attached {
            return self.clone();
        }
        let mut next = self.clone();
        if let Some(selection) = Arc::make_mut(&mut next.selections).get_mut(instance) {
            selection.values.retain(|value| value != token);
        }
        next
    }

    /// Replace an instance's source order with a permutation of itself.
    pub fn reorder_sources(&self, instance: &InstanceId, order: Vec<StyleSourceId>) -> Result<Self> {
        let Some(selection) = self.selections.get(instance) else {
            return Err(Error::UnknownInstance(instance.clone()));
        };
        let current: BTreeSet<_> = selection.values.iter().collect();
        let proposed: BTreeSet<_> = order.iter().collect();
        if order.len() != selection.values.len() || current != proposed {
            return Err(Error::SelectionMismatch(instance.clone()));
        }
        let mut next = self.clone();
        if let Some(selection) = Arc::make_mut(&mut next.selections).get_mut(instance) {
            selection.values = order;
        }
        Ok(next)
    }

    /// Turn an instance's local overrides into a new, reusable token.
    ///
    /// The token takes the highest token precedence on the instance, so the
    /// instance resolves to the same values before and after.
    pub fn convert_local_to_token(
        &self,
        instance: &InstanceId,
        token_id: impl Into<StyleSourceId>,
        name: impl Into<String>,
    ) -> Result<Self> {
        if !self.selections.contains_key(instance) {
            return Err(Error::UnknownInstance(instance.clone()));
        }
        let Some(local) = self.local_source_of(instance).cloned() else {
            return Err(Error::NoLocalSource(instance.clone()));
        };
        let token_id = token_id.into();
        if self.style_sources.contains_key(&token_id) {
            return Err(Error::DuplicateId(token_id.0));
        }

        let mut next = self.clone();
        let sources = Arc::make_mut(&mut next.style_sources);
        sources.remove(&local);
        sources.insert(
            token_id.clone(),
            StyleSource::Token {
                id: token_id.clone(),
                name: name.into(),
            },
        );

        let decls = Arc::make_mut(&mut next.decls);
        let moved: Vec<_> = decls
            .iter()
            .filter(|(key, _)| key.style_source_id == local)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in moved {
            decls.remove(&key);
            decls.insert(
                DeclKey {
                    style_source_id: token_id.clone(),
                    ..key
                },
                value,
            );
        }

        if let Some(selection) = Arc::make_mut(&mut next.selections).get_mut(instance) {
            selection.values.retain(|value| value != &local);
            selection.values.push(token_id);
        }
        Ok(next)
    }

    fn expect_token(&self, id: &StyleSourceId) -> Result<()> {
        match self.style_sources.get(id) {
            Some(StyleSource::Token { .. }) => Ok(()),
            Some(StyleSource::Local { .. }) => Err(Error::NotAToken(id.clone())),
            None => Err(Error::UnknownStyleSource(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Unit;

    fn instance(id: &str) -> InstanceId {
        InstanceId::from(id)
    }

    #[test]
    fn test_new_snapshot_is_valid() {
        let snapshot = Snapshot::new();
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.base_breakpoint().map(|bp| bp.id.as_str()), Some("base"));
    }

    #[test]
    fn test_set_decl_replaces_by_key() {
        let snapshot = Snapshot::new().create_token("t1", "Heading").unwrap();
        let first = snapshot
            .set_decl(StyleDecl::new("t1", "base", "color", Value::keyword("red")))
            .unwrap();
        let second = first
            .set_decl(StyleDecl::new("t1", "base", "color", Value::keyword("blue")))
            .unwrap();

        assert_eq!(second.decl_count(), 1);
        let key = DeclKey::new(&"t1".into(), &"base".into(), None, &"color".into());
        assert_eq!(second.decl(&key), Some(&Value::keyword("blue")));
        // The earlier revision is untouched.
        assert_eq!(first.decl(&key), Some(&Value::keyword("red")));
    }

    #[test]
    fn test_set_decl_rejects_invalid_and_dangling() {
        let snapshot = Snapshot::new().create_token("t1", "Heading").unwrap();
        assert!(matches!(
            snapshot.set_decl(StyleDecl::new("t1", "base", "width", Value::invalid("10p"))),
            Err(Error::InvalidValue { .. })
        ));
        let nested = Value::Tuple {
            value: vec![Value::px(1.0), Value::invalid("10p")],
        };
        let err = snapshot
            .set_decl(StyleDecl::new("t1", "base", "transform", nested))
            .unwrap_err();
        assert!(matches!(&err, Error::InvalidValue { raw, .. } if raw.contains("10p")));
        assert!(matches!(
            snapshot.set_decl(StyleDecl::new("t1", "nope", "width", Value::px(1.0))),
            Err(Error::UnknownBreakpoint(_))
        ));
        assert!(matches!(
            snapshot.set_decl(StyleDecl::new("t2", "base", "width", Value::px(1.0))),
            Err(Error::UnknownStyleSource(_))
        ));
    }

    #[test]
    fn test_stated_and_stateless_decls_coexist() {
        let snapshot = Snapshot::new()
            .create_token("t1", "Link")
            .unwrap()
            .set_decl(StyleDecl::new("t1", "base", "color", Value::keyword("red")))
            .unwrap()
            .set_decl(StyleDecl::new("t1", "base", "color", Value::keyword("blue")).with_state(":hover"))
            .unwrap();
        assert_eq!(snapshot.decl_count(), 2);
    }

    #[test]
    fn test_delete_decl() {
        let snapshot = Snapshot::new()
            .create_token("t1", "Heading")
            .unwrap()
            .set_decl(StyleDecl::new("t1", "base", "width", Value::unit(10.0, Unit::Rem)))
            .unwrap();
        let key = DeclKey::new(&"t1".into(), &"base".into(), None, &"width".into());
        let next = snapshot.delete_decl(&key);
        assert_eq!(next.decl_count(), 0);
        assert_eq!(snapshot.decl_count(), 1);
    }

    #[test]
    fn test_breakpoint_edits() {
        let snapshot = Snapshot::new();
        let with_desktop = snapshot.add_breakpoint(Breakpoint::min("desktop", 1280)).unwrap();
        assert_eq!(with_desktop.breakpoints().len(), 5);

        assert!(matches!(
            with_desktop.add_breakpoint(Breakpoint::min("wide", 1280)),
            Err(Error::Structural(StructuralError::DuplicateCondition(..)))
        ));
        assert!(matches!(
            with_desktop.add_breakpoint(Breakpoint::base("other-base")),
            Err(Error::Structural(StructuralError::MultipleBaseBreakpoints(..)))
        ));
        assert!(matches!(
            with_desktop.remove_breakpoint(&"base".into()),
            Err(Error::BaseBreakpoint(_))
        ));
    }

    #[test]
    fn test_remove_breakpoint_drops_its_decls() {
        let snapshot = Snapshot::new()
            .create_token("t1", "Heading")
            .unwrap()
            .set_decl(StyleDecl::new("t1", "tablet", "width", Value::px(10.0)))
            .unwrap()
            .set_decl(StyleDecl::new("t1", "base", "width", Value::px(20.0)))
            .unwrap();
        let next = snapshot.remove_breakpoint(&"tablet".into()).unwrap();
        assert_eq!(next.decl_count(), 1);
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_ensure_local_source_is_idempotent() {
        let box_id = instance("box");
        let (snapshot, local) = Snapshot::new().ensure_local_source(&box_id, "local-box").unwrap();
        let (again, same) = snapshot.ensure_local_source(&box_id, "other").unwrap();
        assert_eq!(local, same);
        assert_eq!(again.selection(&box_id).unwrap().values.len(), 1);
        assert!(again.is_local(&local));
    }

    #[test]
    fn test_attach_detach_reorder() {
        let box_id = instance("box");
        let snapshot = Snapshot::new()
            .create_token("t1", "One")
            .unwrap()
            .create_token("t2", "Two")
            .unwrap()
            .attach_token(&box_id, &"t1".into(), None)
            .unwrap()
            .attach_token(&box_id, &"t2".into(), Some(0))
            .unwrap();
        let values: Vec<_> = snapshot.selection(&box_id).unwrap().values.iter().map(|v| v.as_str()).collect();
        assert_eq!(values, vec!["t2", "t1"]);

        let reordered = snapshot
            .reorder_sources(&box_id, vec!["t1".into(), "t2".into()])
            .unwrap();
        assert_eq!(reordered.selection(&box_id).unwrap().values[0].as_str(), "t1");
        assert!(matches!(
            snapshot.reorder_sources(&box_id, vec!["t1".into()]),
            Err(Error::SelectionMismatch(_))
        ));

        let detached = reordered.detach_token(&box_id, &"t1".into());
        assert_eq!(detached.selection(&box_id).unwrap().values.len(), 1);
    }

    #[test]
    fn test_attach_rejects_local() {
        let box_id = instance("box");
        let (snapshot, local) = Snapshot::new().ensure_local_source(&box_id, "local-box").unwrap();
        assert!(matches!(
            snapshot.attach_token(&instance("other"), &local, None),
            Err(Error::NotAToken(_))
        ));
    }

    #[test]
    fn test_delete_token_detaches_everywhere() {
        let snapshot = Snapshot::new()
            .create_token("t1", "One")
            .unwrap()
            .attach_token(&instance("a"), &"t1".into(), None)
            .unwrap()
            .attach_token(&instance("b"), &"t1".into(), None)
            .unwrap()
            .set_decl(StyleDecl::new("t1", "base", "color", Value::keyword("red")))
            .unwrap();
        let next = snapshot.delete_token(&"t1".into()).unwrap();
        assert_eq!(next.decl_count(), 0);
        assert!(next.selections().all(|s| s.values.is_empty()));
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_convert_local_to_token() {
        let box_id = instance("box");
        let (snapshot, local) = Snapshot::new().ensure_local_source(&box_id, "local-box").unwrap();
        let snapshot = snapshot
            .set_decl(StyleDecl::new(local.clone(), "base", "color", Value::keyword("red")))
            .unwrap();
        let converted = snapshot.convert_local_to_token(&box_id, "t-red", "Red").unwrap();

        assert!(converted.style_source(&local).is_none());
        assert_eq!(converted.local_source_of(&box_id), None);
        assert_eq!(
            converted.lookup(&"t-red".into(), &"base".into(), None, &"color".into()),
            Some(&Value::keyword("red"))
        );
        assert!(converted.validate().is_ok());
    }

    #[test]
    fn test_convert_without_local_source() {
        let snapshot = Snapshot::new()
            .create_token("t1", "Heading")
            .unwrap()
            .attach_token(&instance("card"), &"t1".into(), None)
            .unwrap();
        assert!(matches!(
            snapshot.convert_local_to_token(&instance("card"), "t2", "Card"),
            Err(Error::NoLocalSource(id)) if id == instance("card")
        ));
        assert!(matches!(
            snapshot.convert_local_to_token(&instance("ghost"), "t2", "Ghost"),
            Err(Error::UnknownInstance(_))
        ));
    }

    #[test]
    fn test_from_data_rejects_duplicate_keys() {
        let data = SnapshotData {
            breakpoints: vec![Breakpoint::base("base")],
            style_sources: vec![StyleSource::Local { id: "l".into() }],
            selections: vec![],
            decls: vec![
                StyleDecl::new("l", "base", "color", Value::keyword("red")),
                StyleDecl::new("l", "base", "color", Value::keyword("blue")),
            ],
        };
        assert!(matches!(
            Snapshot::from_data(data),
            Err(Error::DuplicateDeclaration { state: None, .. })
        ));

        let data = SnapshotData {
            breakpoints: vec![Breakpoint::base("base")],
            style_sources: vec![StyleSource::Local { id: "l".into() }],
            selections: vec![],
            decls: vec![
                StyleDecl::new("l", "base", "color", Value::keyword("red")),
                StyleDecl::new("l", "base", "color", Value::keyword("blue")).with_state(":hover"),
                StyleDecl::new("l", "base", "color", Value::keyword("navy")).with_state(":hover"),
            ],
        };
        let err = Snapshot::from_data(data).unwrap_err();
        assert!(matches!(&err, Error::DuplicateDeclaration { state: Some(s), .. } if s == ":hover"));
        assert!(err.to_string().contains(":hover"), "{err}");
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let data = SnapshotData {
            breakpoints: vec![Breakpoint::base("base")],
            style_sources: vec![StyleSource::Local { id: "l".into() }],
            selections: vec![],
            decls: vec![StyleDecl::new("l", "gone", "color", Value::keyword("red"))],
        };
        let snapshot = Snapshot::from_data(data).unwrap();
        assert!(matches!(
            snapshot.validate(),
            Err(StructuralError::DeclUnknownBreakpoint { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_shared_local() {
        let data = SnapshotData {
            breakpoints: vec![Breakpoint::base("base")],
            style_sources: vec![StyleSource::Local { id: "l".into() }],
            selections: vec![
                StyleSourceSelection::new("a", vec!["l".into()]),
                StyleSourceSelection::new("b", vec!["l".into()]),
            ],
            decls: vec![],
        };
        let snapshot = Snapshot::from_data(data).unwrap();
        assert!(matches!(
            snapshot.validate(),
            Err(StructuralError::SharedLocalSource { .. })
        ));
    }

    #[test]
    fn test_data_round_trip() {
        let (snapshot, local) = Snapshot::new()
            .ensure_local_source(&instance("box"), "local-box")
            .unwrap();
        let snapshot = snapshot
            .set_decl(StyleDecl::new(local, "tablet", "width", Value::px(100.0)))
            .unwrap();
        let json = snapshot.to_data().to_json_pretty().unwrap();
        let back = Snapshot::from_json(&json).unwrap();
        assert_eq!(back.to_data(), snapshot.to_data());
    }
}
