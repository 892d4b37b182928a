//! Linear order of token layers.
//!
//! Every selection ranks its tokens; one stylesheet can only have one layer
//! order, so the per-instance rankings are merged with a topological sort.
//! When rankings contradict each other the cycle is broken at the token with
//! the fewest unmet predecessors (smallest id on ties) and the affected
//! instances are reported.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{InstanceId, Snapshot, StyleSourceId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TokenOrder<'a> {
    /// Every selected token, lowest precedence first.
    pub tokens: Vec<&'a StyleSourceId>,
    /// Instances whose token ranking the order does not honour.
    pub unsatisfied: Vec<&'a InstanceId>,
}

fn selected_tokens<'a>(snapshot: &'a Snapshot) -> impl Iterator<Item = (&'a InstanceId, Vec<&'a StyleSourceId>)> {
    snapshot.selections().map(|selection| {
        let tokens = selection
            .values
            .iter()
            .filter(|id| !snapshot.is_local(id))
            .collect();
        (&selection.instance_id, tokens)
    })
}

pub(crate) fn order_tokens(snapshot: &Snapshot) -> TokenOrder<'_> {
    let mut remaining: BTreeSet<&StyleSourceId> = BTreeSet::new();
    let mut edges: BTreeMap<&StyleSourceId, BTreeSet<&StyleSourceId>> = BTreeMap::new();

    for (_, tokens) in selected_tokens(snapshot) {
        remaining.extend(tokens.iter().copied());
        for pair in tokens.windows(2) {
            if pair[0] != pair[1] {
                edges.entry(pair[0]).or_default().insert(pair[1]);
            }
        }
    }

    let mut in_degree: BTreeMap<&StyleSourceId, usize> =
        remaining.iter().map(|id| (*id, 0)).collect();
    for target in edges.values().flatten() {
        if let Some(degree) = in_degree.get_mut(*target) {
            *degree += 1;
        }
    }

    let mut tokens = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let degree = |id: &StyleSourceId| in_degree.get(id).copied().unwrap_or(0);
        let next = remaining
            .iter()
            .copied()
            .find(|id| degree(*id) == 0)
            .or_else(|| remaining.iter().copied().min_by_key(|id| (degree(*id), *id)));
        let Some(next) = next else {
            break;
        };

        remaining.remove(next);
        tokens.push(next);
        for target in edges.get(next).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(*target) {
                *degree = degree.saturating_sub(1);
            }
        }
    }

    let position: BTreeMap<&StyleSourceId, usize> =
        tokens.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let unsatisfied = selected_tokens(snapshot)
        .filter(|(_, ranked)| {
            !ranked
                .windows(2)
                .all(|pair| position.get(pair[0]) < position.get(pair[1]))
        })
        .map(|(instance, _)| instance)
        .collect();

    TokenOrder {
        tokens,
        unsatisfied,
    }
}
