//! Transitive groups
//!
//! Two groups with too few transition tiles between them cannot be painted
//! next to each other directly. The resolver then goes through intermediate
//! groups: water -> grass -> mountain when no water/mountain tiles exist.

use crate::{GroupTransition, Transition, TransitionCatalog};
use bevy_map_core::TileRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Minimum chain length worth scanning for cycles
const REDUCE_MIN_HOPS: usize = 4;

/// Hop chains between every pair of groups lacking a direct transition
#[derive(Debug, Clone, Default)]
pub struct TransitiveGroup {
    /// Groups with enough transitions between them, both directions
    strong: BTreeMap<String, BTreeSet<String>>,
    transitives: HashMap<GroupTransition, Vec<GroupTransition>>,
}

impl TransitiveGroup {
    /// Compute the chains of a catalog. Two groups are directly linked when
    /// they share at least `valid_transitions` distinct transitions.
    pub fn new(catalog: &TransitionCatalog, valid_transitions: usize) -> Self {
        let groups: Vec<String> = catalog.groups().into_iter().map(str::to_string).collect();

        let mut strong: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for a in &groups {
            for b in &groups {
                if a != b && catalog.count_between(a, b) >= valid_transitions {
                    strong.entry(a.clone()).or_default().insert(b.clone());
                }
            }
        }

        let mut transitive = Self {
            strong,
            transitives: HashMap::new(),
        };

        for group_in in &groups {
            for group_out in &groups {
                if group_in == group_out {
                    continue;
                }
                let chain = transitive.find_chain(group_in, group_out);
                if !chain.is_empty() {
                    debug!(
                        "Transitive {} -> {}: {}",
                        group_in,
                        group_out,
                        chain.iter().map(|hop| hop.to_string()).collect::<Vec<_>>().join(", ")
                    );
                }
                transitive
                    .transitives
                    .insert(GroupTransition::new(group_in.clone(), group_out.clone()), chain);
            }
        }

        transitive
    }

    /// Whether two groups are directly linked
    pub fn is_direct(&self, group_in: &str, group_out: &str) -> bool {
        self.strong
            .get(group_in)
            .map(|out| out.contains(group_out))
            .unwrap_or(false)
    }

    /// Hops from `group_in` to `group_out`, empty when direct or unreachable
    pub fn transitives(&self, group_in: &str, group_out: &str) -> &[GroupTransition] {
        self.transitives
            .get(&GroupTransition::new(group_in, group_out))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every non-empty chain
    pub fn chains(&self) -> impl Iterator<Item = (&GroupTransition, &[GroupTransition])> {
        self.transitives
            .iter()
            .filter(|(_, chain)| !chain.is_empty())
            .map(|(pair, chain)| (pair, chain.as_slice()))
    }

    /// Tiles standing in for a transition whose groups are two hops apart:
    /// the tiles of the same type between `in` and the middle group.
    pub fn direct_transitive_tiles(
        &self,
        catalog: &TransitionCatalog,
        transition: &Transition,
    ) -> BTreeSet<TileRef> {
        match self.transitives(transition.group_in(), transition.group_out()) {
            [first, _] => {
                let middle = first.group_out.as_str();
                catalog
                    .tiles(&Transition::new(transition.kind(), transition.group_in(), middle))
                    .cloned()
                    .unwrap_or_default()
            }
            _ => BTreeSet::new(),
        }
    }

    fn find_chain(&self, group_in: &str, group_out: &str) -> Vec<GroupTransition> {
        if self.is_direct(group_in, group_out) {
            return Vec::new();
        }

        let mut chain = Vec::new();
        if !self.check_transitive(group_in, group_out, group_in, &mut chain) {
            return Vec::new();
        }

        if chain.len() >= REDUCE_MIN_HOPS {
            chain = reduce_transitive(chain);
        }
        chain
    }

    /// Depth-first search for a hop chain from `current` to `end`.
    /// Edges already on the chain and edges back to `start` are refused.
    fn check_transitive(
        &self,
        start: &str,
        end: &str,
        current: &str,
        chain: &mut Vec<GroupTransition>,
    ) -> bool {
        let Some(next_groups) = self.strong.get(current) else {
            return false;
        };

        for next in next_groups {
            if next == start {
                continue;
            }
            let hop = GroupTransition::new(current, next.as_str());
            if chain.contains(&hop) {
                continue;
            }

            chain.push(hop);
            if next == end || self.check_transitive(start, end, next, chain) {
                return true;
            }
            chain.pop();
        }

        false
    }
}

/// Drop cycles: when a later hop ends on the same group as an earlier one,
/// every hop after the earlier one up to the later one is removed.
fn reduce_transitive(chain: Vec<GroupTransition>) -> Vec<GroupTransition> {
    let mut reduced: Vec<GroupTransition> = Vec::with_capacity(chain.len());
    for hop in chain {
        if let Some(pos) = reduced.iter().position(|h| h.group_out == hop.group_out) {
            reduced.truncate(pos + 1);
            continue;
        }
        reduced.push(hop);
    }
    reduced
}
