mod common;

use common::*;
use pdgitems_core::db::{open_db_in_memory, DbError};
use pdgitems_core::store::{CacheStats, StoreKey};
use pdgitems_core::{ItemKind, ItemStore, PdgId, SqliteItemStore, StoreError};
use rusqlite::Connection;

fn seeded() -> Connection {
    let conn = setup();
    seed_pions(&conn);
    conn
}

#[test]
fn item_lookup_returns_record_or_not_found() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let item = store.item(PI_PLUS_MINUS).unwrap();
    assert_eq!(item.name, "pi+-");
    assert_eq!(item.kind, ItemKind::Generic);
    assert_eq!(item.display_name, None);

    let err = store.item(999).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(StoreKey::Item(999))));
}

#[test]
fn particle_is_optional_and_unique_per_item() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let particle = store.particle(PI_PLUS).unwrap().unwrap();
    assert_eq!(particle.pdgid, PdgId::new("S008"));
    assert_eq!(particle.charge, Some(1.0));
    assert_eq!(particle.mcid, Some(211));
    assert!(store.particle(PION).unwrap().is_none());

    insert_particle(&conn, PI_ZERO, "S011", "pi0 again", None, None);
    let err = store.particle(PI_ZERO).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn edges_are_ordered_by_sort_then_id() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let targets: Vec<i64> = store
        .targets(PI_PLUS_MINUS)
        .unwrap()
        .iter()
        .map(|edge| edge.target)
        .collect();
    assert_eq!(targets, vec![PI_PLUS, PI_MINUS]);

    let referrers: Vec<i64> = store
        .referrers(PI_PLUS)
        .unwrap()
        .iter()
        .map(|edge| edge.source)
        .collect();
    assert_eq!(referrers, vec![PI_PLUS_MINUS, PI_LIST, PI_PLUS_ALIAS]);

    assert!(store.targets(PI_PLUS).unwrap().is_empty());
}

#[test]
fn list_items_skips_excluded_kinds_in_id_order() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let all = store.list_items(&[]).unwrap();
    assert_eq!(all.len(), 10);

    let ids: Vec<i64> = store
        .list_items(&ItemKind::NON_PARTICLE)
        .unwrap()
        .iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 8, 9, 10]);
}

#[test]
fn identifier_lookups() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let meta = store.identifier(&PdgId::new("s008")).unwrap();
    assert_eq!(meta.description.as_deref(), Some("pi+-"));
    assert_eq!(meta.sort, Some(30));

    let err = store.identifier(&PdgId::new("M176")).unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(
        store.items_for_identifier(&PdgId::new("S009")).unwrap(),
        vec![PI_MINUS]
    );
    let particles = store.particles_for_identifier(&PdgId::new("S010")).unwrap();
    assert_eq!(particles.len(), 1);
    assert_eq!(particles[0].item_id, Some(PI_ZERO));
}

#[test]
fn find_item_and_edition() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    assert_eq!(store.find_item("pion").unwrap().map(|item| item.id), Some(PION));
    assert!(store.find_item("kaon").unwrap().is_none());
    assert_eq!(store.edition().unwrap().as_deref(), Some("2024"));
    assert_eq!(store.info("citation").unwrap(), None);
}

#[test]
fn relation_lookups_reject_unknown_keys() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    assert!(matches!(
        store.targets(999).unwrap_err(),
        StoreError::NotFound(StoreKey::Item(999))
    ));
    assert!(store.referrers(999).unwrap_err().is_not_found());
    assert!(store.particle(999).unwrap_err().is_not_found());
    assert!(matches!(
        store.items_for_identifier(&PdgId::new("ZZZ")).unwrap_err(),
        StoreError::NotFound(StoreKey::Identifier(_))
    ));
    assert!(store
        .particles_for_identifier(&PdgId::new("ZZZ"))
        .unwrap_err()
        .is_not_found());

    // Known keys without relations stay empty.
    assert!(store.targets(PI_ZERO).unwrap().is_empty());
    assert!(store.referrers(PI_ZERO).unwrap().is_empty());
    assert!(store.particle(PION).unwrap().is_none());
    insert_identifier(&conn, "S099", "unused", None);
    assert!(store
        .items_for_identifier(&PdgId::new("S099"))
        .unwrap()
        .is_empty());
    // Particle rows alone make an identifier known.
    assert_eq!(
        store.items_for_identifier(&PdgId::new("M176")).unwrap(),
        vec![X_3872]
    );
}

#[test]
fn repeated_lookups_are_served_from_the_run_cache() {
    let conn = seeded();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    store.item(PI_PLUS).unwrap();
    store.item(PI_PLUS).unwrap();
    store.targets(PI_PLUS_MINUS).unwrap();
    store.targets(PI_PLUS_MINUS).unwrap();

    // The first edge lookup also loads its source item.
    let stats = store.cache_stats().unwrap();
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.hits, 2);

    store.clear_cache();
    store.item(PI_PLUS).unwrap();
    assert_eq!(
        store.cache_stats().unwrap(),
        CacheStats { hits: 0, misses: 1 }
    );
}

#[test]
fn store_requires_the_item_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE pdginfo (id INTEGER PRIMARY KEY, name TEXT, value TEXT);
         CREATE TABLE pdgid (id INTEGER PRIMARY KEY, pdgid TEXT, description TEXT, data_type TEXT, sort INTEGER);",
    )
    .unwrap();

    let err = SqliteItemStore::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        StoreError::Db(DbError::MissingRequiredTable("pdgitem"))
    ));

    assert!(SqliteItemStore::try_new(&open_db_in_memory().unwrap()).is_ok());
}
