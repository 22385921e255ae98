//! Configuration Management
//!
//! Runtime configuration for dogsync, resolved from the environment once at
//! startup and threaded through explicitly. There is no ambient global.

use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

/// Default Datadog site when `DD_SITE` is unset.
const DEFAULT_SITE: &str = "datadoghq.com";

/// Default directory the local snapshot is written under.
const DEFAULT_LOCAL_ROOT: &str = "saved";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Datadog site, e.g. `datadoghq.com` or `datadoghq.eu`
    pub site: String,
    /// API key sent as `DD-API-KEY`
    pub api_key: String,
    /// Application key sent as `DD-APPLICATION-KEY`
    pub app_key: String,
    /// Root directory of the local snapshot
    pub local_root: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment.
    ///
    /// `DD_API_KEY` and `DD_APP_KEY` are required; `DD_SITE` and
    /// `DD_LOCAL_ROOT` have defaults.
    pub fn from_env() -> Result<Self> {
        let site = std::env::var("DD_SITE").unwrap_or_else(|_| DEFAULT_SITE.to_string());
        let api_key = std::env::var("DD_API_KEY")
            .context("DD_API_KEY is not set. Export a Datadog API key to continue")?;
        let app_key = std::env::var("DD_APP_KEY")
            .context("DD_APP_KEY is not set. Export a Datadog application key to continue")?;
        let local_root = std::env::var("DD_LOCAL_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOCAL_ROOT));

        Ok(Self {
            site,
            api_key,
            app_key,
            local_root,
        })
    }

    /// Base URL for API calls, e.g. `https://api.datadoghq.com/`
    pub fn api_base(&self) -> Result<Url> {
        Url::parse(&format!("https://api.{}/", self.site))
            .with_context(|| format!("Invalid Datadog site: {}", self.site))
    }

    /// Base URL for resource webpages, e.g. `https://app.datadoghq.com/`
    pub fn app_base(&self) -> String {
        format!("https://app.{}", self.site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_from_site() {
        let config = Config {
            site: "datadoghq.eu".to_string(),
            api_key: "k".to_string(),
            app_key: "a".to_string(),
            local_root: PathBuf::from("saved"),
        };
        assert_eq!(config.api_base().unwrap().as_str(), "https://api.datadoghq.eu/");
        assert_eq!(config.app_base(), "https://app.datadoghq.eu");
    }
}
