//! Listing engine
//!
//! Walks one resource type's collection with full detail when it has a
//! pagination strategy, degrading to id-only enumeration when the walk
//! fails, and fans out across the whole registry under one `JoinSet`.

use crate::datadog::DatadogClient;
use crate::error::{Error, Result};
use crate::resource::contract::{Collection, ResourceType};
use crate::resource::id::ResourceId;
use crate::resource::registry::Registry;
use futures::stream::TryStreamExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Outcome of listing one resource type.
#[derive(Debug)]
pub enum Listed {
    /// Full item records, first-seen page order.
    Full(Vec<Value>),
    /// Id-only fallback: detail was unavailable but enumeration survived.
    Degraded(Vec<ResourceId>),
}

impl Listed {
    pub fn len(&self) -> usize {
        match self {
            Listed::Full(items) => items.len(),
            Listed::Degraded(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item records for rendering; degraded listings become minimal
    /// `{"id": ...}` records.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Listed::Full(items) => items,
            Listed::Degraded(ids) => ids
                .into_iter()
                .map(|id| serde_json::json!({ "id": id }))
                .collect(),
        }
    }
}

/// Result of one type's slot in an aggregate run.
pub struct TypeReport {
    pub resource_type: Arc<dyn ResourceType>,
    pub outcome: Result<Listed>,
}

/// Walk all pages of a paged type, wrapping any failure as
/// `Error::Pagination` so the caller can tell "the walk broke" apart from
/// everything else.
async fn walk_pages(rt: &dyn ResourceType, client: &DatadogClient) -> Result<Vec<Value>> {
    let Collection::Paged(strategy) = rt.collection() else {
        return Ok(Vec::new());
    };
    let type_path = rt.rest_path(None);
    let path = format!("api/{type_path}");

    strategy
        .pages(client, &path, rt.limiter())
        .try_fold(Vec::new(), |mut items, page| async move {
            items.extend(page.items);
            Ok(items)
        })
        .await
        .map_err(|e| Error::Pagination {
            type_path: type_path.clone(),
            source: Box::new(e),
        })
}

/// Collect every id the type's enumeration yields, one minimal record each.
async fn walk_ids(rt: &dyn ResourceType, client: &DatadogClient) -> Result<Vec<ResourceId>> {
    rt.list_ids(client).try_collect().await
}

/// List one resource type.
///
/// Paged types get a full-detail walk first; if that walk fails with
/// anything other than an auth rejection, the failure is logged and the
/// type degrades to id enumeration. Auth failures surface loudly rather
/// than masquerading as "pagination unsupported". Id-only types go
/// straight to enumeration.
pub async fn list_one(rt: &dyn ResourceType, client: &DatadogClient) -> Result<Listed> {
    let type_path = rt.rest_path(None);
    tracing::debug!("list {type_path}: starting");

    let listed = match rt.collection() {
        Collection::Paged(_) => match walk_pages(rt, client).await {
            Ok(items) => Listed::Full(items),
            Err(e) if e.is_auth_failure() => return Err(e),
            Err(e @ Error::Pagination { .. }) => {
                tracing::warn!("list {type_path}: pagination failed ({e}), falling back to ids");
                Listed::Degraded(walk_ids(rt, client).await?)
            }
            Err(e) => return Err(e),
        },
        Collection::IdOnly => Listed::Degraded(walk_ids(rt, client).await?),
    };

    tracing::debug!("list {type_path}: listed {} items", listed.len());
    Ok(listed)
}

/// List every resource type in the registry concurrently.
///
/// One task per type in a `JoinSet`; a failure in one type's slot is
/// reported there and never cancels siblings. Dropping the returned
/// future drops the set, aborting whatever is still in flight. Disabled
/// types are skipped unless `include_disabled` is set.
pub async fn list_all(
    registry: &Registry,
    client: &DatadogClient,
    include_disabled: bool,
) -> Vec<TypeReport> {
    let mut tasks = JoinSet::new();

    for rt in registry.iter() {
        if rt.disabled() && !include_disabled {
            tracing::debug!("list all: skipping disabled type {}", rt.rest_path(None));
            continue;
        }
        let rt = Arc::clone(rt);
        let client = client.clone();
        tasks.spawn(async move {
            let outcome = list_one(rt.as_ref(), &client).await;
            TypeReport {
                resource_type: rt,
                outcome,
            }
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            // A panicked task loses its slot; siblings keep running.
            Err(e) => tracing::error!("list all: task failed to complete: {e}"),
        }
    }

    // Stable output order regardless of completion order.
    reports.sort_by_key(|r| {
        registry
            .iter()
            .position(|rt| rt.rest_path(None) == r.resource_type.rest_path(None))
    });
    reports
}
