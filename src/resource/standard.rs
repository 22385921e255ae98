//! Standard resource type
//!
//! Conventional Datadog REST shape: `GET/PUT <base>/<id>` for single
//! resources, one collection endpoint for enumeration, local snapshot files
//! under `<root>/<base>/<id>.json`.

use crate::datadog::DatadogClient;
use crate::error::{Error, Result};
use crate::resource::contract::{Collection, ResourceType};
use crate::resource::id::ResourceId;
use crate::resource::pagination::LimitOffsetPagination;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Listing mode, chosen when the type is constructed.
///
/// A type either carries a pagination strategy for full-detail listing or
/// it explicitly does not; nothing inspects instances at call time to find
/// out.
pub enum Listing {
    Paginated(LimitOffsetPagination),
    IdOnly,
}

/// A resource type following the conventional REST shape.
pub struct StandardResourceType {
    rest_base_path: &'static str,
    webpage_base_path: &'static str,
    /// Key of the item array in the plain collection response, used by
    /// `list_ids`. `None` when the response body is the array itself.
    collection_items_key: Option<&'static str>,
    listing: Listing,
    local_root: PathBuf,
    app_base: String,
    limiter: Arc<Semaphore>,
    disabled: bool,
}

impl StandardResourceType {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rest_base_path: &'static str,
        webpage_base_path: &'static str,
        collection_items_key: Option<&'static str>,
        listing: Listing,
        local_root: PathBuf,
        app_base: String,
        max_concurrency: usize,
        disabled: bool,
    ) -> Self {
        Self {
            rest_base_path,
            webpage_base_path,
            collection_items_key,
            listing,
            local_root,
            app_base,
            limiter: Arc::new(Semaphore::new(max_concurrency)),
            disabled,
        }
    }

    /// One unpaginated GET of the collection endpoint, returning ids in
    /// response order. This is the enumeration `list_ids` streams from.
    async fn fetch_ids(&self, client: &DatadogClient) -> Result<Vec<ResourceId>> {
        let path = format!("api/{}", self.rest_base_path);
        let body = {
            let _permit = self.acquire().await?;
            client.get_json(&path, &[]).await?
        };

        let array = match self.collection_items_key {
            Some(key) => body.get(key),
            None => Some(&body),
        };
        let items = array.and_then(Value::as_array).ok_or_else(|| Error::Remote {
            method: "GET",
            path: path.clone(),
            status: None,
            message: match self.collection_items_key {
                Some(key) => format!("collection response has no array under key {key:?}"),
                None => "collection response is not an array".to_string(),
            },
        })?;

        let mut skipped = 0usize;
        let ids: Vec<ResourceId> = items
            .iter()
            .filter_map(|item| {
                let id = ResourceId::from_item(item);
                if id.is_none() {
                    skipped += 1;
                }
                id
            })
            .collect();
        if skipped > 0 {
            tracing::warn!(
                "list {}: skipped {skipped} record(s) without a usable id field",
                self.rest_base_path
            );
        }

        Ok(ids)
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>> {
        self.limiter.acquire().await.map_err(|_| Error::Remote {
            method: "GET",
            path: self.rest_base_path.to_string(),
            status: None,
            message: "concurrency limiter closed".to_string(),
        })
    }
}

#[async_trait]
impl ResourceType for StandardResourceType {
    fn rest_path(&self, id: Option<&ResourceId>) -> String {
        match id {
            Some(id) => format!("{}/{}", self.rest_base_path, id),
            None => self.rest_base_path.to_string(),
        }
    }

    fn local_path(&self, id: Option<&ResourceId>) -> PathBuf {
        let dir = self.local_root.join(self.rest_base_path);
        match id {
            Some(id) => dir.join(format!("{id}.json")),
            None => dir,
        }
    }

    fn collection(&self) -> Collection<'_> {
        match &self.listing {
            Listing::Paginated(strategy) => Collection::Paged(strategy),
            Listing::IdOnly => Collection::IdOnly,
        }
    }

    fn limiter(&self) -> &Arc<Semaphore> {
        &self.limiter
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    async fn get(&self, client: &DatadogClient, id: &ResourceId) -> Result<Vec<u8>> {
        let path = format!("api/{}", self.rest_path(Some(id)));
        let _permit = self.acquire().await?;
        client.get_bytes(&path).await
    }

    async fn put(&self, client: &DatadogClient, id: &ResourceId, body: &[u8]) -> Result<()> {
        let path = format!("api/{}", self.rest_path(Some(id)));
        let _permit = self.acquire().await?;
        client.put_bytes(&path, body).await
    }

    fn list_ids<'a>(&'a self, client: &'a DatadogClient) -> BoxStream<'a, Result<ResourceId>> {
        // Lazy: nothing is fetched until the stream is first polled, and
        // each call starts a fresh enumeration.
        stream::once(async move { self.fetch_ids(client).await })
            .flat_map(|result| match result {
                Ok(ids) => stream::iter(ids.into_iter().map(Ok).collect::<Vec<_>>()),
                Err(e) => stream::iter(vec![Err(e)]),
            })
            .boxed()
    }

    async fn read_local_json(&self, id: &ResourceId) -> Result<Vec<u8>> {
        let path = self.local_path(Some(id));
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound { path: path.clone() }
            } else {
                Error::Persistence {
                    path: path.clone(),
                    message: format!("failed to read: {e}"),
                }
            }
        })
    }

    fn webpage_url(&self, id: &ResourceId) -> String {
        format!("{}/{}/{}", self.app_base, self.webpage_base_path, id)
    }
}
