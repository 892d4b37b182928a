//! Cascade resolution over a snapshot.
//!
//! The effective value of a property is found by walking the instance's
//! style sources in precedence order (tokens in selection order, then the
//! local source) and, inside each source, the active breakpoints in
//! [`compare_media`](crate::model::compare_media) order. The last declaration found wins, so any
//! declaration in a higher-precedence source outranks every declaration in a
//! lower one regardless of breakpoint.

use std::collections::BTreeMap;

use tracing::trace;

use super::properties::Property;
use super::value::Value;
use crate::model::{Breakpoint, BreakpointId, InstanceId, Snapshot, StyleSourceId};

/// Computed style of one instance: property → effective value.
pub type StyleMap = BTreeMap<Property, Value>;

/// An effective value together with the declaration it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue<'a> {
    pub value: &'a Value,
    pub style_source_id: &'a StyleSourceId,
    pub breakpoint_id: &'a BreakpointId,
    /// Whether a stated declaration applied rather than the stateless fallback.
    pub stated: bool,
}

impl ResolvedValue<'_> {
    /// Whether the value was declared at a breakpoint other than `active`.
    pub fn is_cascaded(&self, active: &BreakpointId) -> bool {
        self.breakpoint_id != active
    }
}

/// Breakpoints whose conditions hold while previewing `active`, in cascade order.
///
/// Returns an empty list when `active` is not in the snapshot.
pub fn active_breakpoints<'a>(snapshot: &'a Snapshot, active: &BreakpointId) -> Vec<&'a Breakpoint> {
    let Some(active) = snapshot.breakpoint(active) else {
        return Vec::new();
    };
    snapshot
        .breakpoints()
        .into_iter()
        .filter(|bp| bp.id == active.id || bp.applies_within(active))
        .collect()
}

/// Source ids of `instance` in ascending precedence.
fn ordered_sources<'a>(snapshot: &'a Snapshot, instance: &InstanceId) -> Vec<&'a StyleSourceId> {
    match snapshot.selection(instance) {
        Some(selection) => selection.ordered(|id| snapshot.is_local(id)).collect(),
        None => Vec::new(),
    }
}

/// Resolve the effective value and its origin.
pub fn resolve_with_origin<'a>(
    snapshot: &'a Snapshot,
    instance: &InstanceId,
    property: &Property,
    active: &BreakpointId,
    state: Option<&str>,
) -> Option<ResolvedValue<'a>> {
    let breakpoints = active_breakpoints(snapshot, active);
    let mut found = None;

    for source in ordered_sources(snapshot, instance) {
        for bp in &breakpoints {
            // A stateless declaration only stands in when this exact
            // (source, breakpoint) has no declaration for the state.
            let stated = state.and_then(|state| {
                snapshot
                    .lookup(source, &bp.id, Some(state), property)
                    .map(|value| (value, true))
            });
            let hit = stated.or_else(|| {
                snapshot
                    .lookup(source, &bp.id, None, property)
                    .map(|value| (value, false))
            });
            if let Some((value, stated)) = hit {
                found = Some(ResolvedValue {
                    value,
                    style_source_id: source,
                    breakpoint_id: &bp.id,
                    stated,
                });
            }
        }
    }

    found
}

/// Resolve the single effective value of `property` on `instance`.
///
/// Returns `None` when no selected source declares the property at any
/// active breakpoint; callers supply their own defaults.
pub fn resolve(
    snapshot: &Snapshot,
    instance: &InstanceId,
    property: &Property,
    active: &BreakpointId,
    state: Option<&str>,
) -> Option<Value> {
    let resolved = resolve_with_origin(snapshot, instance, property, active, state)?;
    trace!(
        instance = %instance,
        property = %property,
        source = %resolved.style_source_id,
        breakpoint = %resolved.breakpoint_id,
        "resolved"
    );
    Some(resolved.value.clone())
}

/// Every property declared for `instance`, resolved at `active`/`state`.
pub fn resolve_style(
    snapshot: &Snapshot,
    instance: &InstanceId,
    active: &BreakpointId,
    state: Option<&str>,
) -> StyleMap {
    let mut properties: Vec<&Property> = ordered_sources(snapshot, instance)
        .into_iter()
        .flat_map(|source| snapshot.decls_of(source).map(|(key, _)| &key.property))
        .collect();
    properties.sort();
    properties.dedup();

    properties
        .into_iter()
        .filter_map(|property| {
            resolve(snapshot, instance, property, active, state)
                .map(|value| (property.clone(), value))
        })
        .collect()
}
