//! Local snapshot persistence
//!
//! Resources are stored as canonical JSON: object keys sorted so that
//! re-saving an unchanged resource never produces version-control diff
//! noise. `serde_json` maps are ordered (BTreeMap-backed), so a parse and
//! re-serialize round trip is the canonicalization step.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

fn persistence_error(path: &Path, message: String) -> Error {
    Error::Persistence {
        path: path.to_path_buf(),
        message,
    }
}

/// Canonicalize a JSON body: sorted object keys, stable two-space
/// indentation, trailing newline.
pub fn canonical_json(json: &[u8]) -> std::result::Result<Vec<u8>, String> {
    let value: Value =
        serde_json::from_slice(json).map_err(|e| format!("invalid JSON: {e}"))?;
    let mut out =
        serde_json::to_vec_pretty(&value).map_err(|e| format!("serialization failed: {e}"))?;
    out.push(b'\n');
    Ok(out)
}

/// Write a JSON body to `path` in canonical form.
///
/// A canonicalization failure is fatal for this write and carries the
/// offending path; the file is never silently skipped. The content goes
/// through a sibling temp file and a rename, so a crash mid-write cannot
/// leave a truncated snapshot behind.
pub async fn write_canonical_json(json: &[u8], path: &Path) -> Result<()> {
    let canonical =
        canonical_json(json).map_err(|message| persistence_error(path, message))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| persistence_error(path, format!("failed to create {}: {e}", parent.display())))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &canonical)
        .await
        .map_err(|e| persistence_error(path, format!("failed to write temp file: {e}")))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| persistence_error(path, format!("failed to rename into place: {e}")))?;

    tracing::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_json_sorts_keys() {
        let out = canonical_json(br#"{"zebra":1,"apple":{"nested_z":1,"nested_a":2}}"#).unwrap();
        let text = String::from_utf8(out).unwrap();
        let apple = text.find("\"apple\"").unwrap();
        let zebra = text.find("\"zebra\"").unwrap();
        assert!(apple < zebra);
        let nested_a = text.find("\"nested_a\"").unwrap();
        let nested_z = text.find("\"nested_z\"").unwrap();
        assert!(nested_a < nested_z);
    }

    #[test]
    fn test_canonical_json_is_idempotent() {
        let first = canonical_json(br#"{"b":1,"a":[1,2,3]}"#).unwrap();
        let second = canonical_json(&first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_json_rejects_garbage() {
        assert!(canonical_json(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_write_failure_carries_path() {
        let err = write_canonical_json(b"not json", Path::new("/tmp/x/y.json"))
            .await
            .unwrap_err();
        match err {
            Error::Persistence { path, .. } => {
                assert_eq!(path, Path::new("/tmp/x/y.json"));
            }
            other => panic!("expected Persistence error, got {other:?}"),
        }
    }
}
