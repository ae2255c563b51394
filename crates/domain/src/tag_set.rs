//! Insertion-ordered set of tag ids.

use std::collections::HashSet;

use crate::ids::TagId;

/// A set of tag ids that remembers the order ids were first inserted in.
///
/// The catalog server treats a scene's tags as a set, but keeping the
/// server's order for existing tags (and appending new ones) makes the
/// mutation payload stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    order: Vec<TagId>,
    members: HashSet<TagId>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id, returning `true` if it was not already present.
    pub fn insert(&mut self, id: TagId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Union `other` into this set.
    pub fn extend_from<'a>(&mut self, other: impl IntoIterator<Item = &'a TagId>) {
        for id in other {
            self.insert(id.clone());
        }
    }

    pub fn contains(&self, id: &TagId) -> bool {
        self.members.contains(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagId> {
        self.order.iter()
    }

    pub fn is_superset(&self, other: &TagSet) -> bool {
        other.iter().all(|id| self.contains(id))
    }

    /// Ids present here but not in `other`, in insertion order.
    pub fn difference(&self, other: &TagSet) -> Vec<TagId> {
        self.order
            .iter()
            .filter(|id| !other.contains(id))
            .cloned()
            .collect()
    }

    pub fn into_vec(self) -> Vec<TagId> {
        self.order
    }
}

impl FromIterator<TagId> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagId>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a TagId;
    type IntoIter = std::slice::Iter<'a, TagId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
