//! Stylesheet generation from a snapshot.
//!
//! The stylesheet must make a browser compute exactly what
//! [`resolve`](crate::style::resolve) computes. Three CSS mechanisms carry
//! the resolver's rules:
//!
//! - **Cascade layers** give every token its own `@layer`, ordered like the
//!   selections rank them, followed by one `local` layer. A declaration in a
//!   later layer beats any declaration in an earlier one, whatever its media
//!   condition or selector, just as a later style source outranks an earlier
//!   one.
//! - **Source order** inside a layer follows the breakpoint cascade order:
//!   the base block first, then one `@media` block per breakpoint.
//! - **State fallback**: `.x:hover` has higher specificity than `.x`, so a
//!   stated rule would beat stateless rules of later breakpoints. Those
//!   stateless declarations are repeated under the state's selector.
//!
//! # Example
//!
//! ```
//! use strata::export::{GenerateOptions, generate};
//! use strata::model::{Snapshot, StyleDecl};
//! use strata::style::Value;
//!
//! let snapshot = Snapshot::new()
//!     .create_token("t1", "Heading")?
//!     .attach_token(&"box".into(), &"t1".into(), None)?
//!     .set_decl(StyleDecl::new("t1", "base", "color", Value::keyword("red")))?;
//!
//! let css = generate(&snapshot, &GenerateOptions::default())?;
//! assert!(css.css_text.contains("color: red;"));
//! assert_eq!(css.classes_of(&"box".into()).len(), 1);
//! # Ok::<(), strata::Error>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::atomic::{AtomKey, AtomPool, hashed_class};
use super::layers::order_tokens;
use super::plan::{Block, Layer, Rule, StylePlan, is_writable_property, state_suffix};
use crate::error::Result;
use crate::model::{Breakpoint, BreakpointId, DeclKey, InstanceId, Snapshot, StyleSourceId};
use crate::style::{Property, ToCss, Value};

/// Name of the layer holding every local style source.
pub const LOCAL_LAYER: &str = "local";

/// Options for [`generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateOptions {
    /// Emit one single-declaration class per distinct declaration.
    pub atomic: bool,
    /// Prefix of every generated class name.
    pub class_prefix: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            atomic: false,
            class_prefix: "s".to_string(),
        }
    }
}

/// Why a declaration or ranking was left out of the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The value is `invalid`.
    InvalidValue,
    /// The value cannot be written as CSS (non-finite number, empty keyword, ...).
    UnsupportedValue,
    /// The property name cannot be written as CSS.
    InvalidProperty,
    /// The state cannot be written as a selector.
    InvalidState,
    /// An instance ranks tokens differently from the layer order.
    TokenOrderConflict,
}

/// A non-fatal problem found while generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A generated stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCss {
    pub css_text: String,
    /// Classes to put on each instance, in precedence order.
    pub class_map: BTreeMap<InstanceId, Vec<String>>,
    pub warnings: Vec<Warning>,
}

impl GeneratedCss {
    /// The classes of an instance; empty when it has no selection.
    pub fn classes_of(&self, instance: &InstanceId) -> &[String] {
        self.class_map
            .get(instance)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the stylesheet has no rules.
    pub fn is_empty(&self) -> bool {
        self.css_text.is_empty()
    }
}

/// Generate the stylesheet for every selected style source.
///
/// The snapshot is validated first; a structural problem fails the whole
/// generation with [`Error::Structural`](crate::Error::Structural). Bad
/// individual declarations are skipped and reported in
/// [`GeneratedCss::warnings`]. Identical snapshots always produce
/// byte-identical output.
pub fn generate(snapshot: &Snapshot, options: &GenerateOptions) -> Result<GeneratedCss> {
    let planned = plan(snapshot, options)?;
    let css_text = planned.plan.to_css_string();
    debug!(
        layers = planned.plan.layers.len(),
        rules = planned.plan.rule_count(),
        warnings = planned.warnings.len(),
        "generated stylesheet"
    );
    Ok(GeneratedCss {
        css_text,
        class_map: planned.class_map,
        warnings: planned.warnings,
    })
}

/// A rule plan with its class map, before printing.
#[derive(Debug, Clone)]
pub(crate) struct Planned {
    pub plan: StylePlan,
    pub class_map: BTreeMap<InstanceId, Vec<String>>,
    pub warnings: Vec<Warning>,
}

/// Declarations of one source grouped by (breakpoint index, state).
type Groups = BTreeMap<(usize, Option<String>), Vec<(Property, Value)>>;

/// The stable class of a style source.
pub(crate) fn source_class(prefix: &str, id: &StyleSourceId) -> String {
    hashed_class(prefix, id.as_str())
}

pub(crate) fn plan(snapshot: &Snapshot, options: &GenerateOptions) -> Result<Planned> {
    snapshot.validate()?;

    let prefix = options.class_prefix.as_str();
    let breakpoints = snapshot.breakpoints();
    let bp_index: BTreeMap<_, _> = breakpoints
        .iter()
        .enumerate()
        .map(|(i, bp)| (&bp.id, i))
        .collect();

    let referenced: BTreeSet<&StyleSourceId> = snapshot
        .selections()
        .flat_map(|selection| &selection.values)
        .collect();
    for source in snapshot.style_sources() {
        if !referenced.contains(source.id()) {
            debug!(source = %source.id(), "omitting unselected style source");
        }
    }

    let mut warnings = Vec::new();
    let token_order = order_tokens(snapshot);
    for instance in &token_order.unsatisfied {
        let warning = Warning::new(
            WarningKind::TokenOrderConflict,
            format!("token order of instance {instance} conflicts with other instances"),
        );
        warn!("{warning}");
        warnings.push(warning);
    }

    // (layer name, its sources)
    let mut layer_members: Vec<(String, Vec<&StyleSourceId>)> = token_order
        .tokens
        .iter()
        .map(|token| (source_class(prefix, token), vec![*token]))
        .collect();
    let locals = referenced
        .iter()
        .copied()
        .filter(|id| snapshot.is_local(id))
        .collect();
    layer_members.push((LOCAL_LAYER.to_string(), locals));

    let mut pool = AtomPool::new(prefix);
    let mut source_atoms: BTreeMap<&StyleSourceId, Vec<String>> = BTreeMap::new();
    let mut layers = Vec::new();

    for (name, members) in layer_members {
        let mut blocks: BTreeMap<usize, Vec<Rule>> = BTreeMap::new();
        for source in members {
            let groups = group_source(snapshot, source, &bp_index, &mut warnings);
            if options.atomic {
                let atoms = source_atoms.entry(source).or_default();
                for ((bp, state), declarations) in groups {
                    for (property, value) in declarations {
                        let key = AtomKey {
                            layer: name.clone(),
                            breakpoint: breakpoints[bp].id.clone(),
                            state: state.clone(),
                            property: property.clone(),
                            value: value.to_css_string(),
                        };
                        let (class, fresh) = pool.intern(key);
                        if fresh {
                            blocks.entry(bp).or_default().push(Rule {
                                class: class.clone(),
                                state: state.clone(),
                                declarations: vec![(property, value)],
                            });
                        }
                        atoms.push(class);
                    }
                }
            } else {
                let class = source_class(prefix, source);
                for ((bp, state), declarations) in groups {
                    blocks.entry(bp).or_default().push(Rule {
                        class: class.clone(),
                        state,
                        declarations,
                    });
                }
            }
        }

        if blocks.is_empty() {
            continue;
        }
        layers.push(Layer {
            name,
            blocks: blocks
                .into_iter()
                .map(|(bp, rules)| block(breakpoints[bp], rules))
                .collect(),
        });
    }

    let mut class_map = BTreeMap::new();
    for selection in snapshot.selections() {
        let mut seen = BTreeSet::new();
        let classes: Vec<String> = selection
            .ordered(|id| snapshot.is_local(id))
            .flat_map(|source| {
                if options.atomic {
                    source_atoms.get(source).cloned().unwrap_or_default()
                } else {
                    vec![source_class(prefix, source)]
                }
            })
            .filter(|class| seen.insert(class.clone()))
            .collect();
        class_map.insert(selection.instance_id.clone(), classes);
    }
    if options.atomic {
        debug!(atoms = pool.len(), "interned atomic classes");
    }

    Ok(Planned {
        plan: StylePlan { layers },
        class_map,
        warnings,
    })
}

fn block(breakpoint: &Breakpoint, rules: Vec<Rule>) -> Block {
    Block {
        breakpoint: breakpoint.id.clone(),
        media: breakpoint.media_query(),
        rules,
    }
}

/// Why a declaration cannot be written, if it cannot.
fn check_decl(key: &DeclKey, value: &Value) -> Option<Warning> {
    let at = format!(
        "{} on {} at {}",
        key.property, key.style_source_id, key.breakpoint_id
    );
    if !is_writable_property(key.property.css_name()) {
        return Some(Warning::new(
            WarningKind::InvalidProperty,
            format!("skipped {at}: property name cannot be written"),
        ));
    }
    if let Some(state) = &key.state {
        if state_suffix(state).is_none() {
            return Some(Warning::new(
                WarningKind::InvalidState,
                format!("skipped {at}: state {state:?} cannot be written"),
            ));
        }
    }
    let reason = value.unsupported_reason()?;
    let kind = if value.contains_invalid() {
        WarningKind::InvalidValue
    } else {
        WarningKind::UnsupportedValue
    };
    Some(Warning::new(kind, format!("skipped {at}: {reason}")))
}

fn group_source(
    snapshot: &Snapshot,
    source: &StyleSourceId,
    bp_index: &BTreeMap<&BreakpointId, usize>,
    warnings: &mut Vec<Warning>,
) -> Groups {
    let mut groups = Groups::new();
    for (key, value) in snapshot.decls_of(source) {
        if let Some(warning) = check_decl(key, value) {
            warn!("{warning}");
            warnings.push(warning);
            continue;
        }
        let Some(&bp) = bp_index.get(&key.breakpoint_id) else {
            continue;
        };
        groups
            .entry((bp, key.state.clone()))
            .or_default()
            .push((key.property.clone(), value.clone()));
    }
    add_state_fallbacks(&mut groups);
    groups
}

/// Repeat stateless declarations under a state's selector wherever a stated
/// declaration of the same property at an earlier breakpoint would otherwise
/// win on specificity.
fn add_state_fallbacks(groups: &mut Groups) {
    let mut first_stated: BTreeMap<(String, Property), usize> = BTreeMap::new();
    for ((bp, state), declarations) in groups.iter() {
        let Some(state) = state else {
            continue;
        };
        for (property, _) in declarations {
            first_stated
                .entry((state.clone(), property.clone()))
                .or_insert(*bp);
        }
    }

    let mut copies = Vec::new();
    for ((state, property), first) in &first_stated {
        for ((bp, group_state), declarations) in groups.range((first + 1, None)..) {
            if group_state.is_some() {
                continue;
            }
            let Some((_, value)) = declarations.iter().find(|(p, _)| p == property) else {
                continue;
            };
            let key = (*bp, Some(state.clone()));
            let stated_here = groups
                .get(&key)
                .is_some_and(|stated| stated.iter().any(|(p, _)| p == property));
            if !stated_here {
                copies.push((key, (property.clone(), value.clone())));
            }
        }
    }

    for (key, declaration) in copies {
        groups.entry(key).or_default().push(declaration);
    }
    for declarations in groups.values_mut() {
        declarations.sort_by(|a, b| a.0.cmp(&b.0));
    }
}
