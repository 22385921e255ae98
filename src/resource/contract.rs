//! The resource-type contract
//!
//! Every category of Datadog resource (dashboards, monitors, reference
//! tables, ...) implements [`ResourceType`]. The listing engine, the save
//! path, and the CLI only speak through this trait, so differing REST
//! shapes stay contained in the implementations.

use crate::datadog::DatadogClient;
use crate::error::Result;
use crate::resource::id::ResourceId;
use crate::resource::pagination::LimitOffsetPagination;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// How a resource type enumerates its collection, fixed at construction.
///
/// The listing engine matches on this instead of probing instances for an
/// optional strategy at call time.
pub enum Collection<'a> {
    /// Full-detail listing via a limit/offset page walk.
    Paged(&'a LimitOffsetPagination),
    /// No pagination protocol; id enumeration is the only listing path.
    IdOnly,
}

/// A Datadog resource type that can have multiple instances, like
/// dashboards, monitors, and metrics.
#[async_trait]
pub trait ResourceType: Send + Sync {
    /// REST path relative to the API base: the collection path without an
    /// id, the single-resource path with one. Pure, no I/O.
    fn rest_path(&self, id: Option<&ResourceId>) -> String;

    /// Local snapshot path: the storage directory without an id, the
    /// `.json` file with one. Pure, no I/O.
    fn local_path(&self, id: Option<&ResourceId>) -> PathBuf;

    /// The construction-time listing choice for this type.
    fn collection(&self) -> Collection<'_>;

    /// Bounds simultaneous in-flight remote calls for this type,
    /// regardless of how many pages or sibling types are active.
    fn limiter(&self) -> &Arc<Semaphore>;

    /// Disabled types are skipped by aggregate operations unless
    /// explicitly included.
    fn disabled(&self) -> bool {
        false
    }

    /// Fetch one resource body. Fails with `Error::Remote` on a
    /// non-success response or transport failure; no retry here.
    async fn get(&self, client: &DatadogClient, id: &ResourceId) -> Result<Vec<u8>>;

    /// Upsert one resource body. Idempotent; error behavior matches `get`.
    async fn put(&self, client: &DatadogClient, id: &ResourceId, body: &[u8]) -> Result<()>;

    /// Enumerate ids without fetching full bodies. Finite, lazy, and
    /// restartable: each call re-enumerates from scratch. Independent of
    /// the pagination strategy so it stays usable as a fallback.
    fn list_ids<'a>(&'a self, client: &'a DatadogClient) -> BoxStream<'a, Result<ResourceId>>;

    /// Read the last saved local body for this id.
    /// Fails with `Error::NotFound` when no file exists.
    async fn read_local_json(&self, id: &ResourceId) -> Result<Vec<u8>>;

    /// URL of the resource's page in the Datadog app. No remote calls.
    fn webpage_url(&self, id: &ResourceId) -> String;
}

impl std::fmt::Debug for dyn ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceType")
            .field("rest_path", &self.rest_path(None))
            .finish()
    }
}
