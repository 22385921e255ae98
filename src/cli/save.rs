//! `save` subcommand
//!
//! Mirrors remote resources into the local snapshot: enumerate ids, fetch
//! each body, write it canonically. Fetches within one type are bounded by
//! that type's limiter; types run concurrently in a `JoinSet`.

use crate::datadog::DatadogClient;
use crate::error::Result as CoreResult;
use crate::resource::{Registry, ResourceType};
use crate::storage::write_canonical_json;
use anyhow::{bail, Result};
use futures::stream::TryStreamExt;
use std::sync::Arc;
use tokio::task::JoinSet;

/// How many fetch futures to keep in flight per type. The per-type
/// semaphore is what actually bounds remote calls; this only caps future
/// buildup for types with very large collections.
const SAVE_BUFFER: usize = 32;

async fn save_type(rt: Arc<dyn ResourceType>, client: DatadogClient) -> CoreResult<usize> {
    let type_path = rt.rest_path(None);
    let ids: Vec<_> = rt.list_ids(&client).try_collect().await?;
    let total = ids.len();
    tracing::info!("save {type_path}: {total} resources");

    futures::stream::iter(ids.into_iter().map(CoreResult::Ok))
        .try_for_each_concurrent(SAVE_BUFFER, |id| {
            let rt = Arc::clone(&rt);
            let client = client.clone();
            async move {
                let body = rt.get(&client, &id).await?;
                write_canonical_json(&body, &rt.local_path(Some(&id))).await
            }
        })
        .await?;

    Ok(total)
}

/// Mirror one named type, or every non-disabled type.
pub async fn run(
    registry: &Registry,
    client: &DatadogClient,
    type_path: Option<&str>,
) -> Result<()> {
    let selected: Vec<Arc<dyn ResourceType>> = match type_path {
        // Naming a type explicitly overrides its disabled flag.
        Some(path) => match registry.find(path) {
            Some(rt) => vec![Arc::clone(rt)],
            None => bail!("Unknown resource type {path:?}"),
        },
        None => registry
            .iter()
            .filter(|rt| !rt.disabled())
            .map(Arc::clone)
            .collect(),
    };

    let mut tasks = JoinSet::new();
    for rt in selected {
        let client = client.clone();
        let type_path = rt.rest_path(None);
        tasks.spawn(async move { (type_path, save_type(rt, client).await) });
    }

    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((type_path, Ok(count))) => {
                println!("{type_path}: saved {count} resources");
            }
            Ok((type_path, Err(e))) => {
                failed += 1;
                tracing::error!("save {type_path}: {e}");
                eprintln!("{type_path}: ERROR: {e}");
            }
            Err(e) => {
                failed += 1;
                tracing::error!("save: task failed to complete: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} resource type(s) failed to save");
    }
    Ok(())
}
