//! Filesystem Path Resolver Tests

use spindle_domain::ports::PathResolver;
use spindle_domain::Error;
use spindle_infrastructure::config::FsPathResolver;
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
async fn test_get_content_relative_to_parent_file() {
    let dir = TempDir::new().unwrap();
    let parent = write(&dir, "app.yml", "root: true\n");
    write(&dir, "extra.yml", "extra: true\n");

    let resolver = FsPathResolver::new();
    let content = resolver
        .get_content("extra.yml", Some(&parent))
        .await
        .unwrap();
    assert_eq!(content, b"extra: true\n");
}

#[tokio::test]
async fn test_get_content_missing_is_not_found() {
    let dir = TempDir::new().unwrap();
    let parent = write(&dir, "app.yml", "root: true\n");

    let error = FsPathResolver::new()
        .get_content("gone.yml", Some(&parent))
        .await
        .unwrap_err();
    match error {
        Error::FileNotFound { target, parent } => {
            assert_eq!(target, "gone.yml");
            assert!(parent.unwrap().ends_with("app.yml"));
        }
        other => panic!("Expected FileNotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_resolve_single_file() {
    let dir = TempDir::new().unwrap();
    let parent = write(&dir, "app.yml", "");
    write(&dir, "extra.yml", "");

    let files = FsPathResolver::new()
        .resolve_import("extra.yml", None, Some(&parent))
        .await
        .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "extra.yml");
    assert_eq!(files[0].name_stripped, "extra");
    assert_eq!(files[0].ext, "yml");
    assert_eq!(files[0].relpath, Some(PathBuf::from("extra.yml")));
}

#[tokio::test]
async fn test_resolve_glob_is_sorted() {
    let dir = TempDir::new().unwrap();
    let parent = write(&dir, "app.yml", "");
    write(&dir, "conf/b.yml", "");
    write(&dir, "conf/a.yml", "");
    write(&dir, "conf/c.yaml", "");

    let files = FsPathResolver::new()
        .resolve_import("conf/*.yml", None, Some(&parent))
        .await
        .unwrap();

    let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, vec!["a.yml", "b.yml"]);
}

#[tokio::test]
async fn test_resolve_directory_expands_recursively() {
    let dir = TempDir::new().unwrap();
    let parent = write(&dir, "app.yml", "");
    write(&dir, "conf/a.yml", "");
    write(&dir, "conf/nested/b.yml", "");

    let files = FsPathResolver::new()
        .resolve_import("conf", None, Some(&parent))
        .await
        .unwrap();

    let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, vec!["a.yml", "b.yml"]);
}

#[tokio::test]
async fn test_resolve_missing_specifier_is_not_found() {
    let dir = TempDir::new().unwrap();
    let parent = write(&dir, "app.yml", "");

    let error = FsPathResolver::new()
        .resolve_import("missing/*.yml", None, Some(&parent))
        .await
        .unwrap_err();
    assert!(matches!(error, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_base_dir_used_without_parent() {
    let dir = TempDir::new().unwrap();
    write(&dir, "extra.yml", "x: 1\n");

    let resolver = FsPathResolver::new().with_base_dir(dir.path());
    let content = resolver.get_content("extra.yml", None).await.unwrap();
    assert_eq!(content, b"x: 1\n");
}
