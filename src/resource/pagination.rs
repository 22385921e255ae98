//! Limit/offset pagination
//!
//! Turns one collection endpoint into a lazy sequence of pages. Parameter
//! names and the response key holding the item array vary per API version
//! (`limit`/`offset` for v1 endpoints, `page[limit]`/`page[offset]` for
//! v2), so they are configured per resource type.

use crate::datadog::DatadogClient;
use crate::error::{Error, Result};
use futures::stream::{self, Stream};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// One page of a collection walk.
#[derive(Debug, Clone)]
pub struct Page {
    /// Item records in response order.
    pub items: Vec<Value>,
    /// Offset this page was requested at.
    pub offset: usize,
    /// True when this is the last page of the walk.
    pub terminal: bool,
}

/// Limit/offset walk over a collection endpoint.
///
/// Next offset = previous offset + limit; the walk stops when a page
/// returns strictly fewer than `limit` items. Any fetch failure propagates
/// to the caller; the strategy performs no fallback of its own.
#[derive(Debug, Clone)]
pub struct LimitOffsetPagination {
    pub limit: usize,
    pub limit_param: &'static str,
    pub offset_param: &'static str,
    /// Response key under which the item array is nested; `None` when the
    /// response body is the array itself.
    pub items_key: Option<&'static str>,
}

impl LimitOffsetPagination {
    /// Lazily walk all pages of `path`.
    ///
    /// The semaphore permit is acquired around each single page request
    /// and released before the page is yielded, so one type's multi-page
    /// walk never holds capacity while the consumer works.
    pub fn pages<'a>(
        &'a self,
        client: &'a DatadogClient,
        path: &'a str,
        limiter: &'a Arc<Semaphore>,
    ) -> impl Stream<Item = Result<Page>> + 'a {
        stream::try_unfold((0usize, false), move |(offset, done)| async move {
            if done {
                return Ok(None);
            }

            let page = self.fetch_page(client, path, limiter, offset).await?;
            let next = (offset + self.limit, page.terminal);
            Ok(Some((page, next)))
        })
    }

    async fn fetch_page(
        &self,
        client: &DatadogClient,
        path: &str,
        limiter: &Arc<Semaphore>,
        offset: usize,
    ) -> Result<Page> {
        let query = [
            (self.limit_param.to_string(), self.limit.to_string()),
            (self.offset_param.to_string(), offset.to_string()),
        ];

        let body = {
            // Permit scope covers exactly one request.
            let _permit = limiter.acquire().await.map_err(|_| Error::Remote {
                method: "GET",
                path: path.to_string(),
                status: None,
                message: "concurrency limiter closed".to_string(),
            })?;
            client.get_json(path, &query).await?
        };

        let items = self.extract_items(&body, path)?;
        let terminal = items.len() < self.limit;

        tracing::debug!(
            "page {} offset={} items={} terminal={}",
            path,
            offset,
            items.len(),
            terminal
        );

        Ok(Page {
            items,
            offset,
            terminal,
        })
    }

    fn extract_items(&self, body: &Value, path: &str) -> Result<Vec<Value>> {
        let array = match self.items_key {
            Some(key) => body.get(key),
            None => Some(body),
        };
        match array.and_then(Value::as_array) {
            Some(items) => Ok(items.clone()),
            None => Err(Error::Remote {
                method: "GET",
                path: path.to_string(),
                status: None,
                message: match self.items_key {
                    Some(key) => format!("response has no array under key {key:?}"),
                    None => "response body is not an array".to_string(),
                },
            }),
        }
    }
}
