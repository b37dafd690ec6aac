//! Per-run memoization of store lookups.
//!
//! # Invariants
//! - A cache belongs to one store instance, i.e. one report run.
//! - Failed loads are never cached.
//! - No `RefCell` borrow is held while a loader runs.

use crate::model::item::{AliasEdge, ItemId, ItemRecord, ParticleRecord};
use crate::model::pdgid::{IdentifierMeta, PdgId};
use crate::store::StoreResult;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;

/// Hit/miss counters of a [`RunCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Lookup cache scoped to one report-generation run.
#[derive(Debug, Default)]
pub struct RunCache {
    items: RefCell<HashMap<ItemId, ItemRecord>>,
    particles: RefCell<HashMap<ItemId, Option<ParticleRecord>>>,
    targets: RefCell<HashMap<ItemId, Vec<AliasEdge>>>,
    identifiers: RefCell<HashMap<PdgId, IdentifierMeta>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(
        &self,
        id: ItemId,
        load: impl FnOnce() -> StoreResult<ItemRecord>,
    ) -> StoreResult<ItemRecord> {
        self.get_or_load(&self.items, id, load)
    }

    pub fn particle(
        &self,
        id: ItemId,
        load: impl FnOnce() -> StoreResult<Option<ParticleRecord>>,
    ) -> StoreResult<Option<ParticleRecord>> {
        self.get_or_load(&self.particles, id, load)
    }

    pub fn targets(
        &self,
        id: ItemId,
        load: impl FnOnce() -> StoreResult<Vec<AliasEdge>>,
    ) -> StoreResult<Vec<AliasEdge>> {
        self.get_or_load(&self.targets, id, load)
    }

    pub fn identifier(
        &self,
        pdgid: &PdgId,
        load: impl FnOnce() -> StoreResult<IdentifierMeta>,
    ) -> StoreResult<IdentifierMeta> {
        self.get_or_load(&self.identifiers, pdgid.clone(), load)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }

    /// Drops every memoized entry and resets counters.
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
        self.particles.borrow_mut().clear();
        self.targets.borrow_mut().clear();
        self.identifiers.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }

    fn get_or_load<K, V>(
        &self,
        map: &RefCell<HashMap<K, V>>,
        key: K,
        load: impl FnOnce() -> StoreResult<V>,
    ) -> StoreResult<V>
    where
        K: Eq + Hash,
        V: Clone,
    {
        if let Some(value) = map.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Ok(value.clone());
        }

        self.misses.set(self.misses.get() + 1);
        let value = load()?;
        map.borrow_mut().insert(key, value.clone());
        Ok(value)
    }
}
