//! Integration tests for snapshot persistence and reference-table
//! display-name resolution, using real temp directories.

use dogsync::resource::{ReferenceTableResourceType, Registry, ResourceId, ResourceType};
use dogsync::storage::write_canonical_json;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const APP_BASE: &str = "https://app.datadoghq.com";

fn reference_tables(root: &TempDir) -> ReferenceTableResourceType {
    ReferenceTableResourceType::new(root.path().to_path_buf(), APP_BASE.to_string(), 4)
}

/// Writing the same logical value twice produces byte-identical files.
#[tokio::test]
async fn test_canonical_writer_is_idempotent() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("resource.json");

    // Key order in the input must not matter.
    write_canonical_json(br#"{"zebra": 1, "apple": 2}"#, &path)
        .await
        .unwrap();
    let first = std::fs::read(&path).unwrap();

    write_canonical_json(br#"{"apple": 2, "zebra": 1}"#, &path)
        .await
        .unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    assert!(text.find("apple").unwrap() < text.find("zebra").unwrap());
}

/// No temp file is left behind after a successful write.
#[tokio::test]
async fn test_canonical_writer_leaves_only_the_target() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("v1/monitor/7.json");

    write_canonical_json(br#"{"id": 7}"#, &path).await.unwrap();

    let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("7.json")]);
}

/// The display-name cache outlives the backing file within one process:
/// the second lookup succeeds even after the file is deleted.
#[tokio::test]
async fn test_reference_table_name_cache_outlives_file() {
    let root = TempDir::new().unwrap();
    let rt = reference_tables(&root);
    let id = ResourceId::Str("q5h-xae-8b2".into());

    let body = json!({
        "data": {
            "id": "q5h-xae-8b2",
            "attributes": {"table_name": "service-owners"}
        }
    });
    let path = rt.local_path(Some(&id));
    write_canonical_json(&serde_json::to_vec(&body).unwrap(), &path)
        .await
        .unwrap();

    // First lookup reads the file and populates the cache.
    assert_eq!(
        rt.webpage_url(&id),
        format!("{APP_BASE}/reference-tables/service-owners")
    );

    std::fs::remove_file(&path).unwrap();

    // Second lookup is served from the cache.
    assert_eq!(
        rt.webpage_url(&id),
        format!("{APP_BASE}/reference-tables/service-owners")
    );
}

/// With neither cache nor file, the raw id is used.
#[tokio::test]
async fn test_reference_table_url_falls_back_to_raw_id() {
    let root = TempDir::new().unwrap();
    let rt = reference_tables(&root);
    let id = ResourceId::Str("unknown-uuid".into());

    assert_eq!(
        rt.webpage_url(&id),
        format!("{APP_BASE}/reference-tables/unknown-uuid")
    );
}

/// Reverse lookup pairs a snapshot file with its governing type, including
/// the specialized reference-table type.
#[tokio::test]
async fn test_reverse_lookup_on_real_snapshot_layout() {
    let root = TempDir::new().unwrap();
    let rt = reference_tables(&root);
    let id = ResourceId::Str("q5h-xae-8b2".into());
    let path = rt.local_path(Some(&id));

    write_canonical_json(br#"{"data": {}}"#, &path).await.unwrap();

    let registry = Registry::from_types(vec![Arc::new(reference_tables(&root))]);
    let found = registry.for_local_path(&path).unwrap();
    assert_eq!(found.rest_path(None), "v2/reference-tables/tables");

    let err = registry
        .for_local_path(std::path::Path::new("/somewhere/else.json"))
        .unwrap_err();
    assert!(matches!(err, dogsync::error::Error::Lookup { .. }));
}
