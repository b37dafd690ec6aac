//! Visited-set guard for alias graph walks.

use crate::model::item::ItemId;
use std::collections::HashSet;

/// Items already entered by one traversal.
///
/// A walk enters each item at most once, so traversal terminates on any
/// finite item map, cyclic or not.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    items: HashSet<ItemId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set whose walk never enters `excluded`.
    pub fn excluding(excluded: ItemId) -> Self {
        let mut set = Self::new();
        set.items.insert(excluded);
        set
    }

    /// Marks `item` as entered. Returns `false` when it was entered before.
    pub fn enter(&mut self, item: ItemId) -> bool {
        self.items.insert(item)
    }
}
