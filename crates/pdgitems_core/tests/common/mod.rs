#![allow(dead_code)]

use pdgitems_core::db::open_db_in_memory;
use rusqlite::{params, Connection};

pub fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

pub fn insert_info(conn: &Connection, name: &str, value: &str) {
    conn.execute(
        "INSERT INTO pdginfo (name, value) VALUES (?1, ?2);",
        params![name, value],
    )
    .unwrap();
}

pub fn insert_item(conn: &Connection, id: i64, name: &str, item_type: &str) {
    conn.execute(
        "INSERT INTO pdgitem (id, name, item_type) VALUES (?1, ?2, ?3);",
        params![id, name, item_type],
    )
    .unwrap();
}

pub fn insert_edge(conn: &Connection, source: i64, target: i64, sort: i64) {
    conn.execute(
        "INSERT INTO pdgitem_map (pdgitem_id, name, target_id, sort) VALUES (?1, NULL, ?2, ?3);",
        params![source, target, sort],
    )
    .unwrap();
}

pub fn insert_named_edge(conn: &Connection, source: i64, name: &str, target: i64, sort: i64) {
    conn.execute(
        "INSERT INTO pdgitem_map (pdgitem_id, name, target_id, sort) VALUES (?1, ?2, ?3, ?4);",
        params![source, name, target, sort],
    )
    .unwrap();
}

pub fn insert_particle(
    conn: &Connection,
    item_id: i64,
    pdgid: &str,
    name: &str,
    mcid: Option<i64>,
    charge: Option<f64>,
) {
    conn.execute(
        "INSERT INTO pdgparticle (pdgid, pdgitem_id, name, mcid, charge, quantum_j)
         VALUES (?1, ?2, ?3, ?4, ?5, '0');",
        params![pdgid, item_id, name, mcid, charge],
    )
    .unwrap();
}

pub fn insert_identifier(conn: &Connection, pdgid: &str, description: &str, sort: Option<i64>) {
    conn.execute(
        "INSERT INTO pdgid (pdgid, description, data_type, sort) VALUES (?1, ?2, 'PART', ?3);",
        params![pdgid, description, sort],
    )
    .unwrap();
}

pub fn insert_mass_identifier(conn: &Connection, pdgid: &str, parent: &str) {
    conn.execute(
        "INSERT INTO pdgid (pdgid, parent_pdgid, description, data_type)
         VALUES (?1, ?2, 'mass', 'M');",
        params![pdgid, parent],
    )
    .unwrap();
}

/// Summary-table value in MeV for edition 2024.
pub fn insert_data_value(conn: &Connection, pdgid: &str, value: Option<f64>) {
    insert_summary_value(conn, pdgid, "2024", value, "MeV", true);
}

pub fn insert_summary_value(
    conn: &Connection,
    pdgid: &str,
    edition: &str,
    value: Option<f64>,
    unit: &str,
    in_summary_table: bool,
) {
    conn.execute(
        "INSERT INTO pdgdata (pdgid, edition, value, unit_text, in_summary_table)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![pdgid, edition, value, unit, in_summary_table],
    )
    .unwrap();
}

pub const PI_PLUS: i64 = 1;
pub const PI_MINUS: i64 = 2;
pub const PI_ZERO: i64 = 3;
pub const PI_PLUS_MINUS: i64 = 4;
pub const PION: i64 = 5;
pub const X_3915: i64 = 6;
pub const PI_LIST: i64 = 7;
pub const ELECTRON: i64 = 8;
pub const X_3872: i64 = 9;
pub const PI_PLUS_ALIAS: i64 = 10;

/// Small pion-centered dataset.
///
/// - `pi+` (S008), `pi-` (S009) and `pi0` (S010) are specific.
/// - `pi+-` is generic over `pi+` and `pi-`; `pion` is a shortcut to `pi+-`.
/// - `pi(+)` is a "was" alias of `pi+`; `pi list` lists `pi+`.
/// - `X(3915)` has neither edges nor a particle.
/// - `X(3872)` maps to M176, which has no `pdgid` row.
pub fn seed_pions(conn: &Connection) {
    insert_info(conn, "edition", "2024");

    insert_identifier(conn, "S003", "e", Some(3));
    insert_identifier(conn, "S008", "pi+-", Some(30));
    insert_identifier(conn, "S009", "pi-", Some(31));
    insert_identifier(conn, "S010", "pi0", Some(32));

    insert_item(conn, PI_PLUS, "pi+", "P");
    insert_item(conn, PI_MINUS, "pi-", "P");
    insert_item(conn, PI_ZERO, "pi0", "P");
    insert_item(conn, PI_PLUS_MINUS, "pi+-", "G");
    insert_item(conn, PION, "pion", "S");
    insert_item(conn, X_3915, "X(3915)", "P");
    insert_item(conn, PI_LIST, "pi list", "L");
    insert_item(conn, ELECTRON, "e-", "P");
    insert_item(conn, X_3872, "X(3872)", "P");
    insert_item(conn, PI_PLUS_ALIAS, "pi(+)", "W");

    insert_particle(conn, PI_PLUS, "S008", "pi+", Some(211), Some(1.0));
    insert_particle(conn, PI_MINUS, "S009", "pi-", Some(-211), Some(-1.0));
    insert_particle(conn, PI_ZERO, "S010", "pi0", Some(111), Some(0.0));
    insert_particle(conn, ELECTRON, "S003", "e-", Some(11), Some(-1.0));
    insert_particle(conn, X_3872, "M176", "X(3872)", None, Some(0.0));

    insert_named_edge(conn, PI_PLUS_MINUS, "pi+", PI_MINUS, 2);
    insert_named_edge(conn, PI_PLUS_MINUS, "pi+", PI_PLUS, 1);
    insert_edge(conn, PION, PI_PLUS_MINUS, 1);
    insert_edge(conn, PI_LIST, PI_PLUS, 1);
    insert_named_edge(conn, PI_PLUS_ALIAS, "pi(+)", PI_PLUS, 1);
}
