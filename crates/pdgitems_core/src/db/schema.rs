//! PDG schema subset and verification.
//!
//! # Invariants
//! - `REQUIRED_COLUMNS` lists every column core queries read.
//! - `pdgdata` is only required by particle data lookups, which verify it
//!   themselves.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// DDL for the PDG tables read by core. Used to build fixture databases.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("pdginfo", &["id", "name", "value"]),
    ("pdgid", &["id", "pdgid", "description", "data_type", "sort"]),
    ("pdgitem", &["id", "name", "name_tex", "item_type"]),
    ("pdgitem_map", &["id", "pdgitem_id", "name", "target_id", "sort"]),
    (
        "pdgparticle",
        &[
            "id",
            "pdgid",
            "pdgitem_id",
            "name",
            "mcid",
            "charge",
            "quantum_i",
            "quantum_g",
            "quantum_j",
            "quantum_p",
            "quantum_c",
        ],
    ),
];

const PARTICLE_DATA_COLUMNS: &[(&str, &[&str])] = &[
    (
        "pdgid",
        &["id", "pdgid", "parent_pdgid", "description", "data_type", "sort"],
    ),
    ("pdgparticle", &["pdgid", "name", "mcid"]),
    (
        "pdgdata",
        &[
            "id",
            "pdgid",
            "edition",
            "in_summary_table",
            "value",
            "unit_text",
            "sort",
        ],
    ),
];

/// Creates the PDG schema subset on a writable connection.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Verifies the tables and columns used by item resolution and grouping.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    verify_columns(conn, REQUIRED_COLUMNS)
}

/// Verifies the tables and columns used by particle lookups and mass data.
pub fn verify_particle_data_schema(conn: &Connection) -> DbResult<()> {
    verify_columns(conn, PARTICLE_DATA_COLUMNS)
}

fn verify_columns(conn: &Connection, required: &[(&'static str, &[&'static str])]) -> DbResult<()> {
    for &(table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingRequiredTable(table));
        }
        let present = table_columns(conn, table)?;
        for &column in columns {
            if !present.iter().any(|name| name == column) {
                return Err(DbError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type IN ('table', 'view') AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?.to_ascii_lowercase());
    }
    Ok(columns)
}
