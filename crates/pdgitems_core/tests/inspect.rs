mod common;

use common::*;
use pdgitems_core::inspect::{inspect_identifier, render_inspection, ReferrerNode};
use pdgitems_core::store::StoreKey;
use pdgitems_core::{ItemKind, PdgId, SqliteItemStore, StoreError};

fn names(nodes: &[ReferrerNode]) -> Vec<&str> {
    nodes.iter().map(|node| node.item.name.as_str()).collect()
}

#[test]
fn splits_referrers_into_alias_and_generic_trees() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let inspection = inspect_identifier(&store, &PdgId::new("S008")).unwrap();

    assert_eq!(inspection.particles.len(), 1);
    let entry = &inspection.particles[0];
    assert_eq!(entry.item.as_ref().map(|item| item.id), Some(PI_PLUS));

    assert_eq!(names(&entry.aliases), vec!["pi(+)"]);
    assert_eq!(entry.aliases[0].edge_name.as_deref(), Some("pi(+)"));

    assert_eq!(names(&entry.generics), vec!["pi+-", "pi list"]);
    assert_eq!(entry.generics[0].item.kind, ItemKind::Generic);
    assert!(entry.generics[0].children.is_empty());
    assert_eq!(entry.generics[1].edge_name, None);
}

#[test]
fn alias_tree_descends_through_alias_chains() {
    let conn = setup();
    seed_pions(&conn);
    insert_item(&conn, 80, "pi(+) old", "A");
    insert_edge(&conn, 80, PI_PLUS_ALIAS, 1);
    // Loops back onto an item already in the tree.
    insert_edge(&conn, PI_PLUS_ALIAS, 80, 2);
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let inspection = inspect_identifier(&store, &PdgId::new("S008")).unwrap();

    let aliases = &inspection.particles[0].aliases;
    assert_eq!(names(aliases), vec!["pi(+)"]);
    assert_eq!(names(&aliases[0].children), vec!["pi(+) old"]);
    assert!(aliases[0].children[0].children.is_empty());
}

#[test]
fn renders_an_indented_text_tree() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let inspection = inspect_identifier(&store, &PdgId::new("S008")).unwrap();

    assert_eq!(
        render_inspection(&inspection),
        "S008 pi+-\n\
         \n\
         particle pi+ mcid=211\n\
         \x20 item 1 `pi+` [P]\n\
         \x20 aliases:\n\
         \x20   pi(+) [W] via `pi(+)`\n\
         \x20 generics:\n\
         \x20   pi+- [G] via `pi+`\n\
         \x20   pi list [L]\n"
    );
}

#[test]
fn identifier_without_rows_is_not_found() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let err = inspect_identifier(&store, &PdgId::new("S999")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound(StoreKey::Identifier(ref pdgid)) if pdgid == &PdgId::new("S999")
    ));

    // Particle rows alone are enough.
    let inspection = inspect_identifier(&store, &PdgId::new("M176")).unwrap();
    assert!(inspection.meta.is_none());
    assert_eq!(inspection.particles[0].item.as_ref().unwrap().name, "X(3872)");
    assert!(render_inspection(&inspection).starts_with("M176 -\n"));
}
