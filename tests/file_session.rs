//! File-backed Session Tests
//!
//! A session over a document file and a directory store, configured the
//! way the CLI configures it.

use std::fs;
use std::path::Path;
use std::process::Command;

use component_overrides::{
    ComponentStore, EngineConfig, FileHost, FileStore, Mode, OverrideRecord, Session,
    VariantRename,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_document(dir: &Path) -> (String, std::path::PathBuf) {
    let file = dir.join("component/button.html").to_string_lossy().to_string();
    let document = json!({
        "components": {
            file.clone(): {"variants": {"size": {"large": {"e0label": {"inner": "BIG"}}}}}
        },
        "root": {
            "ref": "e0body",
            "children": [{
                "kind": "root",
                "data": {"ref": "e0btn1", "file": file, "variants": {"size": "large"}},
                "children": [{"ref": "e0label", "componentElement": true}]
            }]
        }
    });
    let path = dir.join("index.json");
    fs::write(&path, document.to_string()).unwrap();
    (file, path)
}

fn config(dir: &Path) -> EngineConfig {
    let cli = json!({"project_root": dir.to_string_lossy()});
    EngineConfig::load(None, Some(cli)).unwrap().config
}

fn open(config: &EngineConfig, document: &Path) -> Session<FileStore, FileHost> {
    let store = FileStore::new(&config.project_root, config.store_root(), &config.rename_log);
    Session::open(store, FileHost::new(document))
        .unwrap()
        .with_project_root(&config.project_root)
}

#[test]
fn test_saved_master_outlives_the_session() {
    let dir = TempDir::new().unwrap();
    let (file, document) = write_document(dir.path());
    let config = config(dir.path());

    let mut session = open(&config, &document);
    let btn = session.document().node_by_ref("e0btn1").unwrap();
    let overrides: OverrideRecord =
        serde_json::from_value(json!({"e0label": {"inner": "dark"}})).unwrap();
    session
        .save_variant(btn, "tone", "dark", overrides.clone(), false)
        .unwrap();

    assert!(dir.path().join("components/component/button.html.json").exists());
    assert_eq!(
        session.store().load_component_data(&file).unwrap().as_ref(),
        session.master_of(btn)
    );

    // the persisted master replaces the one embedded in the document
    let reopened = open(&config, &document);
    let btn = reopened.document().node_by_ref("e0btn1").unwrap();
    let master = reopened.master_of(btn).unwrap();
    assert_eq!(master.variant("tone", "dark"), Some(&overrides));
    assert!(master.variant("size", "large").is_some());
}

#[test]
fn test_rename_is_logged_and_reselects() {
    let dir = TempDir::new().unwrap();
    let (_, document) = write_document(dir.path());
    let config = config(dir.path());

    let mut session = open(&config, &document);
    let btn = session.document().node_by_ref("e0btn1").unwrap();
    let rename = VariantRename {
        name: "scale".to_string(),
        old_name: "size".to_string(),
        value: "large".to_string(),
        old_value: "large".to_string(),
    };
    let reselected = session.rename_variant(btn, "e0btn1", &rename).unwrap();

    assert_eq!(reselected, Some(btn));
    assert_eq!(session.host().selected(), reselected);
    assert!(session.master_of(btn).unwrap().variant("scale", "large").is_some());

    let history = session.store().rename_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].file, "component/button.html");
    assert_eq!(history[0].rename, rename);
    assert!(dir.path().join("components/variant-renames.jsonl").exists());
}

#[test]
fn test_resolve_reads_persisted_master() {
    let dir = TempDir::new().unwrap();
    let (file, document) = write_document(dir.path());
    let config = config(dir.path());

    let mut store = FileStore::new(&config.project_root, config.store_root(), &config.rename_log);
    let mut master = component_overrides::MasterRecord::default();
    master.add_variant(
        "size",
        "large",
        serde_json::from_value(json!({"e0label": {"inner": "HUGE"}})).unwrap(),
    );
    store.save_component_data(&file, &master).unwrap();

    let session = Session::open(store, FileHost::new(&document)).unwrap();
    let label = session.document().node_by_ref("e0label").unwrap();
    let resolved = session.resolve_overrides(label, Mode::Element).unwrap();
    assert_eq!(resolved.get("inner"), Some(&json!("HUGE")));
}

// =============================================================================
// CLI
// =============================================================================

fn ovr(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ovr"))
        .current_dir(dir)
        .arg("--project-root")
        .arg(dir)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_cli_resolve_prints_json() {
    let dir = TempDir::new().unwrap();
    let (_, document) = write_document(dir.path());
    let document = document.to_string_lossy().to_string();

    let output = ovr(
        dir.path(),
        &["resolve", "--document", &document, "--ref", "e0label", "--mode", "element"],
    );
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"inner": "BIG"}));

    let output = ovr(
        dir.path(),
        &["frames", "--document", &document, "--ref", "e0btn1", "--mode", "component"],
    );
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["top_level"], true);
    assert_eq!(value[0]["data"]["ref"], "e0btn1");

    // inspection leaves the store untouched
    assert!(!dir.path().join("components").exists());
}

#[test]
fn test_cli_unknown_ref_fails() {
    let dir = TempDir::new().unwrap();
    let (_, document) = write_document(dir.path());
    let document = document.to_string_lossy().to_string();

    let output = ovr(dir.path(), &["materialize", "--document", &document, "--ref", "e0nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("e0nope"));
}

#[test]
fn test_cli_highlight() {
    let dir = TempDir::new().unwrap();
    let (_, document) = write_document(dir.path());
    let document = document.to_string_lossy().to_string();
    let surface = dir.path().join("surface.json");
    fs::write(
        &surface,
        json!({
            "fields": [
                {"kind": "toggle", "name": "inner"},
                {"kind": "attribute", "name": "href"}
            ],
            "warnings": [{"kind": "text", "tooltip": "Text overridden"}],
            "elementType": "text"
        })
        .to_string(),
    )
    .unwrap();
    let surface = surface.to_string_lossy().to_string();

    let output = ovr(
        dir.path(),
        &["highlight", "--document", &document, "--ref", "e0label", "--surface", &surface],
    );
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["class"], "override");
    assert_eq!(value["overridden"], json!([0]));
    assert_eq!(value["warnings"][0]["kind"], "text");
}
