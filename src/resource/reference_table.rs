//! Reference table resource type
//!
//! Reference tables are addressed by UUID over REST but by table name in
//! the app, so `webpage_url` resolves the name instead of using the raw
//! id. Resolution never touches the network: the name is learned as a side
//! effect of `get`, or recovered from the local snapshot file.

use crate::datadog::DatadogClient;
use crate::error::Result;
use crate::resource::contract::{Collection, ResourceType};
use crate::resource::id::ResourceId;
use crate::resource::pagination::LimitOffsetPagination;
use crate::resource::standard::{Listing, StandardResourceType};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

const REST_BASE_PATH: &str = "v2/reference-tables/tables";
const WEBPAGE_BASE_PATH: &str = "reference-tables";

/// Extract `data.attributes.table_name` from a reference table body.
fn table_name_of(body: &Value) -> Option<String> {
    body.get("data")?
        .get("attributes")?
        .get("table_name")?
        .as_str()
        .map(str::to_string)
}

/// A Datadog reference table resource. Overrides `webpage_url` to use the
/// table name from the resource attributes instead of the UUID id.
pub struct ReferenceTableResourceType {
    inner: StandardResourceType,
    /// Lazily populated id -> table name map, private to this instance and
    /// never persisted; always re-derivable from the local file or the
    /// remote record.
    names: Mutex<HashMap<ResourceId, String>>,
}

impl ReferenceTableResourceType {
    pub fn new(local_root: PathBuf, app_base: String, max_concurrency: usize) -> Self {
        let inner = StandardResourceType::new(
            REST_BASE_PATH,
            WEBPAGE_BASE_PATH,
            Some("data"),
            Listing::Paginated(LimitOffsetPagination {
                limit: 100,
                limit_param: "page[limit]",
                offset_param: "page[offset]",
                items_key: Some("data"),
            }),
            local_root,
            app_base.clone(),
            max_concurrency,
            false,
        );
        Self {
            inner,
            names: Mutex::new(HashMap::new()),
        }
    }

    fn cached_name(&self, id: &ResourceId) -> Option<String> {
        self.names.lock().ok()?.get(id).cloned()
    }

    fn remember_name(&self, id: &ResourceId, name: String) {
        if let Ok(mut names) = self.names.lock() {
            names.insert(id.clone(), name);
        }
    }

    /// Recover the table name from the last saved local file, populating
    /// the cache on success.
    fn name_from_local_file(&self, id: &ResourceId) -> Option<String> {
        let path = self.inner.local_path(Some(id));
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read table_name from {}: {e}", path.display());
                return None;
            }
        };
        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read table_name from {}: {e}", path.display());
                return None;
            }
        };
        let name = table_name_of(&body)?;
        self.remember_name(id, name.clone());
        Some(name)
    }
}

#[async_trait]
impl ResourceType for ReferenceTableResourceType {
    fn rest_path(&self, id: Option<&ResourceId>) -> String {
        self.inner.rest_path(id)
    }

    fn local_path(&self, id: Option<&ResourceId>) -> PathBuf {
        self.inner.local_path(id)
    }

    fn collection(&self) -> Collection<'_> {
        self.inner.collection()
    }

    fn limiter(&self) -> &Arc<Semaphore> {
        self.inner.limiter()
    }

    fn disabled(&self) -> bool {
        self.inner.disabled()
    }

    async fn get(&self, client: &DatadogClient, id: &ResourceId) -> Result<Vec<u8>> {
        let bytes = self.inner.get(client, id).await?;
        // Learn the display name from the fetched body while we have it.
        if let Ok(body) = serde_json::from_slice::<Value>(&bytes) {
            if let Some(name) = table_name_of(&body) {
                self.remember_name(id, name);
            }
        }
        Ok(bytes)
    }

    async fn put(&self, client: &DatadogClient, id: &ResourceId, body: &[u8]) -> Result<()> {
        self.inner.put(client, id, body).await
    }

    fn list_ids<'a>(&'a self, client: &'a DatadogClient) -> BoxStream<'a, Result<ResourceId>> {
        self.inner.list_ids(client)
    }

    async fn read_local_json(&self, id: &ResourceId) -> Result<Vec<u8>> {
        self.inner.read_local_json(id).await
    }

    /// Cache first, then the saved local file, then the raw id with a
    /// warning. Synchronous and network-free by contract.
    fn webpage_url(&self, id: &ResourceId) -> String {
        let name = self
            .cached_name(id)
            .or_else(|| self.name_from_local_file(id))
            .unwrap_or_else(|| {
                tracing::warn!("Could not find table_name for reference table {id}, using id in URL");
                id.to_string()
            });
        self.inner.webpage_url(&ResourceId::Str(name))
    }
}
