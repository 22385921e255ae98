//! `put` subcommand
//!
//! Push a locally edited snapshot file back to the API. The governing
//! resource type is recovered from the file path, the id from the file
//! name.

use crate::datadog::DatadogClient;
use crate::resource::{Registry, ResourceId};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Recover the resource id from a snapshot file name like `1234.json`.
pub fn id_from_path(path: &Path) -> Result<ResourceId> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty());
    match stem {
        Some(stem) => Ok(ResourceId::parse(stem)),
        None => bail!("Cannot derive a resource id from {}", path.display()),
    }
}

/// Push one local file back to the remote API.
pub async fn run(registry: &Registry, client: &DatadogClient, file: &Path) -> Result<()> {
    let rt = registry.for_local_path(file)?;
    let id = id_from_path(file)?;

    let body = rt
        .read_local_json(&id)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    rt.put(client, &id, &body)
        .await
        .with_context(|| format!("Failed to push {}", file.display()))?;

    println!("Pushed {} to {}", file.display(), rt.rest_path(Some(&id)));
    Ok(())
}
