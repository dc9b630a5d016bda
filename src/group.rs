use crate::cell::CellId;
use std::collections::{BTreeMap, BTreeSet};

static EMPTY: BTreeSet<CellId> = BTreeSet::new();

/// Named groups of cell identifiers, used by assembly code to address whole
/// regions ("insert into the combined void of these groups") without
/// enumerating cells.
///
/// A cell may belong to any number of groups. Sets are ordered numerically;
/// insertion order is not significant.
#[derive(Debug, Default)]
pub struct GroupTracker {
    groups: BTreeMap<String, BTreeSet<CellId>>,
}

impl GroupTracker {
    /// Creates a new, empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell to the named group, creating the group if needed.
    pub fn add_to_group(&mut self, name: &str, cell: CellId) {
        self.groups.entry(name.to_owned()).or_default().insert(cell);
    }

    /// Removes a cell from every group it belongs to. Groups stay registered
    /// even when emptied.
    pub fn remove_cell(&mut self, cell: CellId) {
        for members in self.groups.values_mut() {
            members.remove(&cell);
        }
    }

    /// Returns the members of the named group in numeric order. Unknown
    /// groups are empty.
    #[must_use]
    pub fn cells_in_group(&self, name: &str) -> &BTreeSet<CellId> {
        self.groups.get(name).unwrap_or(&EMPTY)
    }

    /// Whether the named group contains the cell.
    #[must_use]
    pub fn contains(&self, name: &str, cell: CellId) -> bool {
        self.cells_in_group(name).contains(&cell)
    }

    /// Members of either group, in numeric order.
    #[must_use]
    pub fn union(&self, a: &str, b: &str) -> BTreeSet<CellId> {
        self.cells_in_group(a)
            .union(self.cells_in_group(b))
            .copied()
            .collect()
    }

    /// Members of `a` that are not in `b`, in numeric order.
    #[must_use]
    pub fn difference(&self, a: &str, b: &str) -> BTreeSet<CellId> {
        self.cells_in_group(a)
            .difference(self.cells_in_group(b))
            .copied()
            .collect()
    }

    /// Drops a group entirely, returning its members if it existed.
    pub fn remove_group(&mut self, name: &str) -> Option<BTreeSet<CellId>> {
        self.groups.remove(name)
    }

    /// Iterates over registered group names.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Clears every group.
    pub fn reset(&mut self) {
        self.groups.clear();
    }
}
