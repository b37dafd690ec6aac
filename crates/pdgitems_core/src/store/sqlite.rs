//! SQLite-backed item store.
//!
//! # Invariants
//! - Only `SELECT` statements are issued.
//! - Item, particle, outgoing-edge and identifier lookups go through the
//!   per-run [`RunCache`].
//! - Relation lookups check their key first: an unknown item or identifier
//!   is `NotFound`, a known one without relations is an empty result.

use crate::db::schema::verify_schema;
use crate::model::item::{AliasEdge, ItemId, ItemKind, ItemRecord, ParticleRecord};
use crate::model::pdgid::{IdentifierMeta, PdgId};
use crate::store::cache::{CacheStats, RunCache};
use crate::store::{ItemStore, StoreError, StoreKey, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    name_tex,
    item_type
FROM pdgitem";

const PARTICLE_SELECT_SQL: &str = "SELECT
    pdgid,
    pdgitem_id,
    name,
    mcid,
    charge,
    quantum_i,
    quantum_g,
    quantum_j,
    quantum_p,
    quantum_c
FROM pdgparticle";

const EDGE_SELECT_SQL: &str = "SELECT
    id,
    pdgitem_id,
    name,
    target_id,
    sort
FROM pdgitem_map";

/// Read-only item store over a PDG SQLite connection.
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
    cache: RunCache,
}

impl<'conn> SqliteItemStore<'conn> {
    /// Creates a store after verifying the PDG schema on `conn`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        verify_schema(conn)?;
        Ok(Self {
            conn,
            cache: RunCache::new(),
        })
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Forgets memoized lookups, e.g. between two runs on one store.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// `NotFound` unless the identifier has a `pdgid` row.
    fn require_identifier(&self, pdgid: &PdgId) -> StoreResult<()> {
        self.identifier(pdgid).map(|_| ())
    }

    fn query_edges(&self, column: &str, id: ItemId) -> StoreResult<Vec<AliasEdge>> {
        self.item(id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{EDGE_SELECT_SQL}
             WHERE {column} = ?1
             ORDER BY sort ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([id])?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            edges.push(parse_edge_row(row)?);
        }
        Ok(edges)
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn item(&self, id: ItemId) -> StoreResult<ItemRecord> {
        self.cache.item(id, || {
            let mut stmt = self
                .conn
                .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => parse_item_row(row),
                None => Err(StoreError::NotFound(StoreKey::Item(id))),
            }
        })
    }

    fn find_item(&self, name: &str) -> StoreResult<Option<ItemRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn particle(&self, id: ItemId) -> StoreResult<Option<ParticleRecord>> {
        self.cache.particle(id, || {
            self.item(id)?;
            let mut stmt = self
                .conn
                .prepare(&format!("{PARTICLE_SELECT_SQL} WHERE pdgitem_id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            let mut particles = Vec::new();
            while let Some(row) = rows.next()? {
                particles.push(parse_particle_row(row)?);
            }
            if particles.len() > 1 {
                return Err(StoreError::InvalidData(format!(
                    "item {id} has {} particle associations, expected at most one",
                    particles.len()
                )));
            }
            Ok(particles.pop())
        })
    }

    fn targets(&self, id: ItemId) -> StoreResult<Vec<AliasEdge>> {
        self.cache
            .targets(id, || self.query_edges("pdgitem_id", id))
    }

    fn referrers(&self, id: ItemId) -> StoreResult<Vec<AliasEdge>> {
        self.query_edges("target_id", id)
    }

    fn identifier(&self, pdgid: &PdgId) -> StoreResult<IdentifierMeta> {
        self.cache.identifier(pdgid, || {
            self.conn
                .query_row(
                    "SELECT pdgid, description, sort, data_type
                     FROM pdgid
                     WHERE pdgid = ?1
                     ORDER BY id ASC
                     LIMIT 1;",
                    [pdgid.as_str()],
                    |row| {
                        Ok(IdentifierMeta {
                            pdgid: PdgId::new(row.get::<_, String>("pdgid")?),
                            description: row.get("description")?,
                            sort: row.get("sort")?,
                            data_type: row.get("data_type")?,
                        })
                    },
                )
                .optional()?
                .ok_or_else(|| StoreError::NotFound(StoreKey::Identifier(pdgid.clone())))
        })
    }

    fn items_for_identifier(&self, pdgid: &PdgId) -> StoreResult<Vec<ItemId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT pdgitem_id
             FROM pdgparticle
             WHERE pdgid = ?1
               AND pdgitem_id IS NOT NULL
             ORDER BY pdgitem_id ASC;",
        )?;
        let mut rows = stmt.query([pdgid.as_str()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        if ids.is_empty() {
            self.require_identifier(pdgid)?;
        }
        Ok(ids)
    }

    fn particles_for_identifier(&self, pdgid: &PdgId) -> StoreResult<Vec<ParticleRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARTICLE_SELECT_SQL}
             WHERE pdgid = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([pdgid.as_str()])?;
        let mut particles = Vec::new();
        while let Some(row) = rows.next()? {
            particles.push(parse_particle_row(row)?);
        }
        if particles.is_empty() {
            self.require_identifier(pdgid)?;
        }
        Ok(particles)
    }

    fn list_items(&self, excluded: &[ItemKind]) -> StoreResult<Vec<ItemRecord>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !excluded.is_empty() {
            let placeholders = vec!["?"; excluded.len()].join(", ");
            sql.push_str(&format!(" AND item_type NOT IN ({placeholders})"));
            bind_values.extend(
                excluded
                    .iter()
                    .map(|kind| Value::Text(kind.code().to_string())),
            );
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn info(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT value
                 FROM pdginfo
                 WHERE name = ?1
                 ORDER BY id ASC
                 LIMIT 1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.cache.stats())
    }
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<ItemRecord> {
    let id: ItemId = row.get("id")?;
    let type_text: String = row.get("item_type")?;
    let kind = ItemKind::from_code(&type_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid item type `{type_text}` in pdgitem.item_type for item {id}"
        ))
    })?;

    Ok(ItemRecord {
        id,
        name: row.get("name")?,
        display_name: row.get("name_tex")?,
        kind,
    })
}

fn parse_particle_row(row: &Row<'_>) -> StoreResult<ParticleRecord> {
    let pdgid_text: String = row.get("pdgid")?;
    if pdgid_text.trim().is_empty() {
        return Err(StoreError::InvalidData(
            "empty identifier in pdgparticle.pdgid".to_string(),
        ));
    }

    Ok(ParticleRecord {
        pdgid: PdgId::new(pdgid_text),
        item_id: row.get("pdgitem_id")?,
        name: row.get("name")?,
        mcid: row.get("mcid")?,
        charge: row.get("charge")?,
        quantum_i: row.get("quantum_i")?,
        quantum_g: row.get("quantum_g")?,
        quantum_j: row.get("quantum_j")?,
        quantum_p: row.get("quantum_p")?,
        quantum_c: row.get("quantum_c")?,
    })
}

fn parse_edge_row(row: &Row<'_>) -> StoreResult<AliasEdge> {
    Ok(AliasEdge {
        id: row.get("id")?,
        source: row.get("pdgitem_id")?,
        target: row.get("target_id")?,
        name: row.get("name")?,
        sort: row.get("sort")?,
    })
}
