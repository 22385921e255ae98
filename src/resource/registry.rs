//! Resource Registry
//!
//! The catalog of resource-type instances this tool knows about. Built
//! once from [`Config`] at startup and passed to whatever needs it; there
//! is deliberately no process-wide singleton.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::resource::contract::ResourceType;
use crate::resource::pagination::LimitOffsetPagination;
use crate::resource::reference_table::ReferenceTableResourceType;
use crate::resource::standard::{Listing, StandardResourceType};
use std::path::Path;
use std::sync::Arc;

/// Catalog of resource-type instances, immutable for the process lifetime.
pub struct Registry {
    types: Vec<Arc<dyn ResourceType>>,
}

impl Registry {
    /// Build the standard catalog of Datadog resource types.
    pub fn standard(config: &Config) -> Self {
        let root = config.local_root.clone();
        let app = config.app_base();

        let types: Vec<Arc<dyn ResourceType>> = vec![
            // Dashboards: ids are strings, collection endpoint returns
            // everything under "dashboards" without pagination.
            Arc::new(StandardResourceType::new(
                "v1/dashboard",
                "dashboard",
                Some("dashboards"),
                Listing::IdOnly,
                root.clone(),
                app.clone(),
                10,
                false,
            )),
            // Monitors: collection endpoint returns a bare array.
            Arc::new(StandardResourceType::new(
                "v1/monitor",
                "monitors",
                None,
                Listing::IdOnly,
                root.clone(),
                app.clone(),
                10,
                false,
            )),
            Arc::new(StandardResourceType::new(
                "v1/slo",
                "slo",
                Some("data"),
                Listing::Paginated(LimitOffsetPagination {
                    limit: 100,
                    limit_param: "limit",
                    offset_param: "offset",
                    items_key: Some("data"),
                }),
                root.clone(),
                app.clone(),
                8,
                false,
            )),
            Arc::new(StandardResourceType::new(
                "v1/notebooks",
                "notebook",
                Some("data"),
                Listing::Paginated(LimitOffsetPagination {
                    limit: 100,
                    limit_param: "count",
                    offset_param: "start",
                    items_key: Some("data"),
                }),
                root.clone(),
                app.clone(),
                5,
                false,
            )),
            Arc::new(ReferenceTableResourceType::new(root.clone(), app.clone(), 5)),
            // Metrics: the collection is huge, so the type is disabled
            // unless explicitly included.
            Arc::new(StandardResourceType::new(
                "v2/metrics",
                "metric/summary",
                Some("data"),
                Listing::IdOnly,
                root,
                app,
                10,
                true,
            )),
        ];

        Self { types }
    }

    /// Build a catalog from explicit instances. Used by tests.
    pub fn from_types(types: Vec<Arc<dyn ResourceType>>) -> Self {
        Self { types }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ResourceType>> {
        self.types.iter()
    }

    /// Look up a type by its REST base path, e.g. `v1/monitor`.
    pub fn find(&self, rest_base_path: &str) -> Option<&Arc<dyn ResourceType>> {
        self.types
            .iter()
            .find(|rt| rt.rest_path(None) == rest_base_path)
    }

    /// Reverse lookup: which resource type governs a local file?
    ///
    /// Matches on whether the (absolutized) path contains the type's local
    /// storage directory. No match is fatal for the caller, which cannot
    /// interpret or push back the file without this mapping.
    pub fn for_local_path(&self, path: &Path) -> Result<&Arc<dyn ResourceType>> {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let haystack = absolute.to_string_lossy();

        self.types
            .iter()
            .find(|rt| {
                let root = rt.local_path(None);
                haystack.contains(&*root.to_string_lossy())
            })
            .ok_or_else(|| Error::Lookup {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn registry() -> Registry {
        let config = Config {
            site: "datadoghq.com".to_string(),
            api_key: "k".to_string(),
            app_key: "a".to_string(),
            local_root: PathBuf::from("saved"),
        };
        Registry::standard(&config)
    }

    #[test]
    fn test_standard_catalog_is_populated() {
        let registry = registry();
        assert!(registry.iter().count() >= 5);
        assert!(registry.find("v1/dashboard").is_some());
        assert!(registry.find("v2/reference-tables/tables").is_some());
    }

    #[test]
    fn test_metrics_type_is_disabled() {
        let registry = registry();
        let metrics = registry.find("v2/metrics").expect("metrics type");
        assert!(metrics.disabled());
    }

    #[test]
    fn test_for_local_path_matches_governing_type() {
        let registry = registry();
        let rt = registry
            .for_local_path(Path::new("saved/v1/monitor/123456.json"))
            .expect("monitor path should match");
        assert_eq!(rt.rest_path(None), "v1/monitor");
    }

    #[test]
    fn test_for_local_path_without_match_is_error() {
        let registry = registry();
        let err = registry
            .for_local_path(Path::new("/tmp/unrelated/file.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Lookup { .. }));
    }
}
