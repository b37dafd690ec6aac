//! Item store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define read-only lookups for items, aliasing edges, particle
//!   associations and identifier metadata.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - Absent keys surface as [`StoreError::NotFound`], never as empty results.
//!   An identifier is absent when it has neither a `pdgid` row nor particle
//!   rows.
//! - Edge listings are ordered by edge `sort`, then edge id.
//! - Transport errors (`Db`, `InvalidData`) are fatal for a run; callers may
//!   only recover from `NotFound`.

use crate::db::DbError;
use crate::model::item::{AliasEdge, ItemId, ItemKind, ItemRecord, ItemRow, ParticleRecord};
use crate::model::pdgid::{IdentifierMeta, PdgId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cache;
pub mod sqlite;

pub use cache::{CacheStats, RunCache};
pub use sqlite::SqliteItemStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Key of a record looked up through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKey {
    Item(ItemId),
    ItemName(String),
    Identifier(PdgId),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item(id) => write!(f, "item {id}"),
            Self::ItemName(name) => write!(f, "item named `{name}`"),
            Self::Identifier(pdgid) => write!(f, "identifier {pdgid}"),
        }
    }
}

/// Store-level error for lookups against the PDG database.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Referenced key has no backing record.
    NotFound(StoreKey),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::InvalidData(message) => write!(f, "invalid PDG data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lenient-mode conversion of `NotFound` into `None`.
///
/// Other errors are passed through unchanged.
pub trait NotFoundExt<T> {
    fn not_found_as_none(self) -> StoreResult<Option<T>>;
}

impl<T> NotFoundExt<T> for StoreResult<T> {
    fn not_found_as_none(self) -> StoreResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Read-only lookups over the four PDG item relations.
pub trait ItemStore {
    /// Loads one item record.
    fn item(&self, id: ItemId) -> StoreResult<ItemRecord>;
    /// Finds one item by exact name. The lowest id wins on duplicates.
    fn find_item(&self, name: &str) -> StoreResult<Option<ItemRecord>>;
    /// Loads the direct particle association of an item, if any.
    fn particle(&self, id: ItemId) -> StoreResult<Option<ParticleRecord>>;
    /// Lists outgoing aliasing edges of an item.
    fn targets(&self, id: ItemId) -> StoreResult<Vec<AliasEdge>>;
    /// Lists incoming aliasing edges of an item.
    fn referrers(&self, id: ItemId) -> StoreResult<Vec<AliasEdge>>;
    /// Loads identifier metadata.
    fn identifier(&self, pdgid: &PdgId) -> StoreResult<IdentifierMeta>;
    /// Lists ids of items directly associated with an identifier.
    fn items_for_identifier(&self, pdgid: &PdgId) -> StoreResult<Vec<ItemId>>;
    /// Lists particle rows of an identifier.
    fn particles_for_identifier(&self, pdgid: &PdgId) -> StoreResult<Vec<ParticleRecord>>;
    /// Lists all items ordered by id, skipping the excluded kinds.
    fn list_items(&self, excluded: &[ItemKind]) -> StoreResult<Vec<ItemRecord>>;
    /// Reads one `pdginfo` value.
    fn info(&self, key: &str) -> StoreResult<Option<String>>;

    /// Loads an item joined with its optional particle association.
    fn item_row(&self, id: ItemId) -> StoreResult<ItemRow> {
        Ok(ItemRow {
            item: self.item(id)?,
            particle: self.particle(id)?,
        })
    }

    /// Edition of the Review of Particle Physics held by the database.
    fn edition(&self) -> StoreResult<Option<String>> {
        self.info("edition")
    }

    /// Lookup cache counters, for stores that memoize.
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}
