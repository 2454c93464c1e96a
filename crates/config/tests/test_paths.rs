//! Tests for path utilities

use stocksense_config::paths::{config_path, data_dir, datasets_dir, docs_dir, ensure_dir};
use tempfile::TempDir;

/// Helper to create a temporary directory
fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Test that all well-known paths hang off the state directory
#[test]
fn test_paths_share_root() {
    let root = data_dir();

    assert!(root.ends_with(".stocksense"));
    assert!(config_path().starts_with(&root));
    assert!(datasets_dir().starts_with(&root));
    assert!(docs_dir().starts_with(&root));
}

/// Test config path filename
#[test]
fn test_config_path_filename() {
    assert_eq!(
        config_path().file_name().and_then(|n| n.to_str()),
        Some("config.json")
    );
}

/// Test ensure_dir creates nested directories
#[tokio::test]
async fn test_ensure_dir_creates_nested() {
    let dir = temp_dir();
    let nested = dir.path().join("a").join("b").join("c");

    ensure_dir(&nested).await.unwrap();
    assert!(nested.is_dir());
}

/// Test ensure_dir is idempotent
#[tokio::test]
async fn test_ensure_dir_idempotent() {
    let dir = temp_dir();
    let nested = dir.path().join("x");

    ensure_dir(&nested).await.unwrap();
    ensure_dir(&nested).await.unwrap();
    assert!(nested.is_dir());
}
