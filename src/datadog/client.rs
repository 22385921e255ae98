//! HTTP client wrapper for Datadog API calls

use crate::config::Config;
use crate::error::{Error, Result};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Time to establish a TCP connection
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Overall time for one request
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body for logging.
fn truncate_for_log(body: &str) -> String {
    if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX_LOG_BODY_LENGTH)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    }
}

/// HTTP client for the Datadog API.
///
/// Cheap to clone; `reqwest::Client` is an `Arc` internally.
#[derive(Clone)]
pub struct DatadogClient {
    client: Client,
    base: Url,
}

impl DatadogClient {
    /// Create a client for the configured site, with the API and
    /// application keys applied as default headers.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "DD-API-KEY",
            HeaderValue::from_str(&config.api_key).context("API key is not a valid header value")?,
        );
        headers.insert(
            "DD-APPLICATION-KEY",
            HeaderValue::from_str(&config.app_key)
                .context("Application key is not a valid header value")?,
        );

        let client = Client::builder()
            .user_agent(concat!("dogsync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base: config.api_base()?,
        })
    }

    /// Create a client against an explicit base URL with no auth headers.
    /// Used by tests to point at a mock server.
    pub fn for_base(base: Url) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dogsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, base })
    }

    fn url_for(&self, method_name: &'static str, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| Error::Remote {
            method: method_name,
            path: path.to_string(),
            status: None,
            message: format!("invalid request path: {e}"),
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        let method_name: &'static str = if method == Method::GET {
            "GET"
        } else if method == Method::PUT {
            "PUT"
        } else {
            "HTTP"
        };
        let url = self.url_for(method_name, path)?;

        tracing::debug!("{} {}", method_name, url);

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|e| Error::Remote {
            method: method_name,
            path: path.to_string(),
            status: e.status().map(|s| s.as_u16()),
            message: format!("failed to send request: {e}"),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| Error::Remote {
            method: method_name,
            path: path.to_string(),
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let body_text = String::from_utf8_lossy(&bytes);
            tracing::debug!("API error: {} - {}", status, truncate_for_log(&body_text));
            return Err(Error::Remote {
                method: method_name,
                path: path.to_string(),
                status: Some(status.as_u16()),
                message: truncate_for_log(&body_text),
            });
        }

        Ok(bytes.to_vec())
    }

    /// GET a path relative to the API base, returning the raw body.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.send(Method::GET, path, &[], None).await
    }

    /// GET a path with query parameters, parsing the body as JSON.
    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let bytes = self.send(Method::GET, path, query, None).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Remote {
            method: "GET",
            path: path.to_string(),
            status: None,
            message: format!("failed to parse response JSON: {e}"),
        })
    }

    /// PUT a JSON body to a path relative to the API base.
    ///
    /// Upsert semantics are the server's; calling this twice with the same
    /// body is safe.
    pub async fn put_bytes(&self, path: &str, body: &[u8]) -> Result<()> {
        self.send(Method::PUT, path, &[], Some(body.to_vec())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_body() {
        assert_eq!(truncate_for_log("ok"), "ok");
    }

    #[test]
    fn test_truncate_for_log_long_body() {
        let body = "x".repeat(500);
        let truncated = truncate_for_log(&body);
        assert!(truncated.len() < body.len());
        assert!(truncated.contains("500 bytes total"));
    }
}
