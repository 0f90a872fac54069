//! Configuration Loader Tests

use serde_json::json;
use spindle_domain::Error;
use spindle_infrastructure::config::ConfigLoader;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_root_merge_importer_keys_win() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        "imports:\n  - extra.yml\na: 1\n",
    );
    write(&dir, "extra.yml", "a: 2\nb: 2\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(tree, json!({"a": 1, "b": 2}));
}

#[tokio::test]
async fn test_filename_merge_nests_under_stripped_name() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        "imports:\n  - path: extra.yml\n    merge: filename\na: 1\n",
    );
    write(&dir, "extra.yml", "a: 2\nb: 2\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(tree, json!({"a": 1, "extra": {"a": 2, "b": 2}}));
}

#[tokio::test]
async fn test_sibling_imports_later_wins() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        "imports:\n  - first.yml\n  - second.yml\n",
    );
    write(&dir, "first.yml", "shared: first\nonly_first: 1\n");
    write(&dir, "second.yml", "shared: second\nonly_second: 2\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(tree["shared"], json!("second"));
    assert_eq!(tree["only_first"], json!(1));
    assert_eq!(tree["only_second"], json!(2));
}

#[tokio::test]
async fn test_imports_resolve_transitively() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "app.yml", "imports:\n  - middle.yml\ntop: true\n");
    write(&dir, "middle.yml", "imports:\n  - leaf.yml\nmiddle: true\n");
    write(&dir, "leaf.yml", "leaf: true\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(tree, json!({"top": true, "middle": true, "leaf": true}));
}

#[tokio::test]
async fn test_circular_import_reports_chain() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "a.yml", "imports:\n  - b.yml\n");
    write(&dir, "b.yml", "imports:\n  - a.yml\n");

    let error = ConfigLoader::new().load(&entry).await.unwrap_err();
    match error {
        Error::CircularImport { chain } => {
            assert_eq!(chain.len(), 3);
            assert!(chain[0].ends_with("a.yml"));
            assert!(chain[1].ends_with("b.yml"));
            assert!(chain[2].ends_with("a.yml"));
        }
        other => panic!("Expected CircularImport, got {other}"),
    }
}

#[tokio::test]
async fn test_diamond_import_is_not_circular() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "a.yml", "imports:\n  - b.yml\n  - c.yml\n");
    write(&dir, "b.yml", "imports:\n  - d.yml\nb: 1\n");
    write(&dir, "c.yml", "imports:\n  - d.yml\nc: 1\n");
    write(&dir, "d.yml", "d: 1\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(tree, json!({"b": 1, "d": 1, "c": 1}));
}

#[tokio::test]
async fn test_glob_import_merges_in_lexicographic_order() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "app.yml", "imports:\n  - \"conf/*.yml\"\n");
    write(&dir, "conf/10-base.yml", "key: base\nbase: true\n");
    write(&dir, "conf/20-override.yml", "key: override\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(tree["key"], json!("override"));
    assert_eq!(tree["base"], json!(true));
}

#[tokio::test]
async fn test_mixed_formats_merge() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        "imports:\n  - extra.json\n  - extra.toml\nfrom_yaml: true\n",
    );
    write(&dir, "extra.json", "{\"from_json\": true}");
    write(&dir, "extra.toml", "from_toml = true\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert_eq!(
        tree,
        json!({"from_yaml": true, "from_json": true, "from_toml": true})
    );
}

#[tokio::test]
async fn test_missing_import_fails_with_file_not_found() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "app.yml", "imports:\n  - gone.yml\n");

    let error = ConfigLoader::new().load(&entry).await.unwrap_err();
    match error {
        Error::FileNotFound { target, .. } => assert_eq!(target, "gone.yml"),
        other => panic!("Expected FileNotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "app.ini", "a = 1\n");

    let error = ConfigLoader::new().load(&entry).await.unwrap_err();
    assert!(matches!(error, Error::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_malformed_import_entry_fails_schema() {
    let dir = TempDir::new().unwrap();
    let entry = write(
        &dir,
        "app.yml",
        "imports:\n  - path: extra.yml\n    merge: sideways\n",
    );
    write(&dir, "extra.yml", "a: 1\n");

    let error = ConfigLoader::new().load(&entry).await.unwrap_err();
    assert!(matches!(error, Error::Schema { .. }));
}

#[tokio::test]
async fn test_imports_key_absent_from_merged_tree() {
    let dir = TempDir::new().unwrap();
    let entry = write(&dir, "app.yml", "imports:\n  - extra.yml\n");
    write(&dir, "extra.yml", "a: 1\n");

    let tree = ConfigLoader::new().load(&entry).await.unwrap();
    assert!(tree.get("imports").is_none());
}
