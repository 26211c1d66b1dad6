//! Transition catalog: which tiles render which transition

use crate::{GroupTransition, Transition, TransitionType};
use bevy_map_core::TileRef;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Bidirectional mapping between transitions and tile references.
///
/// A tile may render more than one transition (catalogs merged from several
/// sample maps can be ambiguous).
#[derive(Debug, Clone, Default)]
pub struct TransitionCatalog {
    tiles: HashMap<Transition, BTreeSet<TileRef>>,
    transitions: HashMap<TileRef, Vec<Transition>>,
}

impl TransitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `tile` renders `transition`
    pub fn add(&mut self, transition: Transition, tile: TileRef) {
        let of_tile = self.transitions.entry(tile).or_default();
        if !of_tile.contains(&transition) {
            of_tile.push(transition.clone());
        }
        self.tiles.entry(transition).or_default().insert(tile);
    }

    /// Union another catalog into this one
    pub fn merge(&mut self, other: &TransitionCatalog) {
        for (transition, tiles) in other.iter() {
            for &tile in tiles {
                self.add(transition.clone(), tile);
            }
        }
    }

    /// Tiles rendering a transition
    pub fn tiles(&self, transition: &Transition) -> Option<&BTreeSet<TileRef>> {
        self.tiles.get(transition).filter(|tiles| !tiles.is_empty())
    }

    /// Transitions a tile renders, in insertion order
    pub fn transitions_of(&self, tile: TileRef) -> &[Transition] {
        self.transitions.get(&tile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a tile renders exactly this transition
    pub fn renders(&self, tile: TileRef, transition: &Transition) -> bool {
        self.transitions_of(tile).contains(transition)
    }

    /// Tiles rendering more than one transition, ascending
    pub fn ambiguous_tiles(&self) -> Vec<TileRef> {
        let mut tiles: Vec<TileRef> = self
            .transitions
            .iter()
            .filter(|(_, transitions)| transitions.len() > 1)
            .map(|(tile, _)| *tile)
            .collect();
        tiles.sort_unstable();
        tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Transition, &BTreeSet<TileRef>)> {
        self.tiles.iter()
    }

    /// Entries ordered by `(in, out, type)`
    pub fn sorted(&self) -> Vec<(&Transition, &BTreeSet<TileRef>)> {
        let mut entries: Vec<_> = self.tiles.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Number of transitions with at least one tile
    pub fn len(&self) -> usize {
        self.tiles.values().filter(|tiles| !tiles.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every group referenced by the catalog, sorted
    pub fn groups(&self) -> BTreeSet<&str> {
        self.tiles
            .keys()
            .flat_map(|t| [t.group_in(), t.group_out()])
            .collect()
    }

    /// Number of distinct transitions between two different groups
    pub fn count_between(&self, a: &str, b: &str) -> usize {
        if a == b {
            return 0;
        }
        self.tiles
            .iter()
            .filter(|(t, tiles)| !tiles.is_empty() && t.joins(a, b))
            .count()
    }

    /// Group pairs (both directions) having at least one transition tile
    pub fn group_links(&self) -> HashSet<GroupTransition> {
        let mut links = HashSet::new();
        for (transition, tiles) in &self.tiles {
            if transition.is_self_loop() || tiles.is_empty() {
                continue;
            }
            links.insert(transition.groups().clone());
            links.insert(transition.groups().reversed());
        }
        links
    }

    /// Non-uniform types with no tile between `group_in` and `group_out`,
    /// expressed with `group_in` as inner group
    pub fn missing_types(&self, group_in: &str, group_out: &str) -> Vec<TransitionType> {
        TransitionType::ALL
            .iter()
            .copied()
            .filter(|kind| !kind.is_uniform())
            .filter(|&kind| self.tiles(&Transition::new(kind, group_in, group_out)).is_none())
            .collect()
    }
}

impl From<HashMap<Transition, BTreeSet<TileRef>>> for TransitionCatalog {
    fn from(map: HashMap<Transition, BTreeSet<TileRef>>) -> Self {
        let mut catalog = Self::new();
        for (transition, tiles) in map {
            for tile in tiles {
                catalog.add(transition.clone(), tile);
            }
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_records_both_directions() {
        let mut catalog = TransitionCatalog::new();
        catalog.add(Transition::new(TransitionType::Up, "water", "grass"), 3);

        let mirror = Transition::new(TransitionType::Down, "grass", "water");
        assert!(catalog.tiles(&mirror).unwrap().contains(&3));
        assert_eq!(catalog.transitions_of(3), &[mirror]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_tile_in_several_transitions() {
        let mut catalog = TransitionCatalog::new();
        catalog.add(Transition::new(TransitionType::Up, "grass", "water"), 3);
        catalog.add(Transition::new(TransitionType::Up, "grass", "sand"), 3);
        catalog.add(Transition::new(TransitionType::Up, "grass", "sand"), 3);

        assert_eq!(catalog.transitions_of(3).len(), 2);
        assert!(catalog.transitions_of(99).is_empty());
        assert_eq!(catalog.ambiguous_tiles(), vec![3]);
    }

    #[test]
    fn test_merge_unions_tiles() {
        let up = Transition::new(TransitionType::Up, "grass", "water");
        let mut a = TransitionCatalog::new();
        a.add(up.clone(), 1);
        let mut b = TransitionCatalog::new();
        b.add(up.clone(), 2);
        b.add(Transition::new(TransitionType::Center, "grass", "grass"), 0);

        a.merge(&b);

        assert_eq!(a.tiles(&up).unwrap().iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_group_links_skip_self_loops() {
        let mut catalog = TransitionCatalog::new();
        catalog.add(Transition::new(TransitionType::Center, "grass", "grass"), 0);
        catalog.add(Transition::new(TransitionType::Left, "grass", "water"), 5);

        let links = catalog.group_links();
        assert_eq!(links.len(), 2);
        assert!(links.contains(&GroupTransition::new("water", "grass")));
        assert!(!links.contains(&GroupTransition::new("grass", "grass")));
    }

    #[test]
    fn test_count_and_missing_types() {
        let mut catalog = TransitionCatalog::new();
        catalog.add(Transition::new(TransitionType::Up, "grass", "water"), 1);
        catalog.add(Transition::new(TransitionType::Down, "grass", "water"), 2);
        catalog.add(Transition::new(TransitionType::Center, "grass", "grass"), 0);

        assert_eq!(catalog.count_between("water", "grass"), 2);
        assert_eq!(catalog.count_between("grass", "grass"), 0);

        let missing = catalog.missing_types("grass", "water");
        assert_eq!(missing.len(), 12);
        assert!(!missing.contains(&TransitionType::Up));

        // Seen from water, grass UP is water DOWN
        let missing = catalog.missing_types("water", "grass");
        assert!(!missing.contains(&TransitionType::Down));
        assert!(!missing.contains(&TransitionType::Up));
    }
}
