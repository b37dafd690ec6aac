mod common;

use common::*;
use pdgitems_core::render::{ReportError, SUMMARY_FILE_NAME};
use pdgitems_core::{ReportConfig, ReportService, ReportServiceError, SqliteItemStore};
use serde_json::Value;
use std::path::PathBuf;

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("missing `{needle}` in page"))
}

#[test]
fn writes_one_page_per_category_and_a_summary() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();
    let service = ReportService::new(&store, ReportConfig::default());
    let root = tempfile::tempdir().unwrap();
    let out_dir = root.path().join("printouts");

    let written = service.write_printouts(&out_dir).unwrap();

    assert_eq!(
        file_names(&written),
        vec![
            "Pions.html",
            "Leptons.html",
            "Other_mesons.html",
            SUMMARY_FILE_NAME
        ]
    );
    assert!(written.iter().all(|path| path.is_file()));
}

#[test]
fn pion_page_lists_groups_in_display_order() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();
    let service = ReportService::new(&store, ReportConfig::default());
    let root = tempfile::tempdir().unwrap();

    service.write_printouts(root.path()).unwrap();
    let html = std::fs::read_to_string(root.path().join("Pions.html")).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Pions</title>"));
    assert_eq!(html.matches("<tbody class=\"group\">").count(), 2);

    let order = [
        "<td>pi(+)</td>",
        "<td>pion</td>",
        "<td>pi+-</td>",
        "<td>pi+</td>",
        "<td>pi-</td>",
        "<td>pi0</td>",
    ];
    let positions: Vec<usize> = order.iter().map(|cell| position(&html, cell)).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{positions:?}");

    assert!(html.contains(">pi+</span><br><span"));
    assert!(html.contains("<td>S008</td>"));
    assert!(html.contains("<td>211</td>"));
    assert!(html.contains("<td>1.0</td>"));
    assert!(!html.contains("pi list"));
    assert!(!html.contains("X(3915)"));
}

#[test]
fn summary_records_run_settings_groups_and_skips() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();
    let service = ReportService::new(&store, ReportConfig::default());
    let root = tempfile::tempdir().unwrap();

    service.write_printouts(root.path()).unwrap();
    let text = std::fs::read_to_string(root.path().join(SUMMARY_FILE_NAME)).unwrap();
    let summary: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(summary["edition"], "2024");
    assert_eq!(summary["resolve_policy"], "up_when_empty");
    assert_eq!(summary["grouping"], "first_match");

    let pions = &summary["categories"][0];
    assert_eq!(pions["category"], "Pions");
    assert_eq!(pions["file"], "Pions.html");
    assert_eq!(pions["groups"][0]["sort_order"], 30);
    assert_eq!(
        pions["groups"][0]["pdgids"],
        serde_json::json!(["S008", "S009"])
    );
    assert_eq!(
        pions["groups"][0]["members"],
        serde_json::json!(["pi+", "pi-", "pi+-", "pion", "pi(+)"])
    );
    assert_eq!(summary["categories"][2]["groups"][0]["sort_order"], -1000);

    let skipped = summary["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["item"], X_3915);
    assert_eq!(skipped[0]["name"], "X(3915)");
}

#[test]
fn refuses_to_overwrite_an_earlier_run() {
    let conn = setup();
    seed_pions(&conn);
    let store = SqliteItemStore::try_new(&conn).unwrap();
    let service = ReportService::new(&store, ReportConfig::default());
    let root = tempfile::tempdir().unwrap();

    service.write_printouts(root.path()).unwrap();
    let err = service.write_printouts(root.path()).unwrap_err();

    assert!(matches!(
        err,
        ReportServiceError::Report(ReportError::OutputNotEmpty(_))
    ));
}

#[test]
fn configured_edition_relabels_exotic_categories() {
    let conn = setup();
    seed_pions(&conn);
    insert_identifier(&conn, "B172", "P_c(4312)+", Some(900));
    insert_item(&conn, 70, "P_c(4312)+", "P");
    insert_particle(&conn, 70, "B172", "P_c(4312)+", None, Some(1.0));
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let default_run = ReportService::new(&store, ReportConfig::default())
        .build_printouts()
        .unwrap();
    assert!(default_run
        .buckets
        .iter()
        .any(|bucket| bucket.category == "Pentaquarks and tetraquarks"));

    let config = ReportConfig {
        edition: Some("2023".to_string()),
        ..ReportConfig::default()
    };
    let service = ReportService::new(&store, config);
    let root = tempfile::tempdir().unwrap();
    let written = service.write_printouts(root.path()).unwrap();

    assert!(file_names(&written).contains(&"Pentaquarks.html".to_string()));
    let text = std::fs::read_to_string(root.path().join(SUMMARY_FILE_NAME)).unwrap();
    let summary: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(summary["edition"], "2023");
}
