//! Manual item-name to identifier overrides.
//!
//! Consulted only for items that resolve to no identifier through the
//! item map.

use crate::model::pdgid::PdgId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<String, PdgId>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the identifier for `item_name`.
    pub fn insert(&mut self, item_name: impl Into<String>, pdgid: PdgId) -> Option<PdgId> {
        self.entries.insert(item_name.into(), pdgid)
    }

    pub fn get(&self, item_name: &str) -> Option<&PdgId> {
        self.entries.get(item_name)
    }
}

impl<N: Into<String>, P: AsRef<str>> FromIterator<(N, P)> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, pdgid) in iter {
            table.insert(name, PdgId::new(pdgid));
        }
        table
    }
}
