//! Configuration structures.

use machina_core::{DaoResult, ExampleMatcher, LoggingConfig, PageRequest, SortCriterion};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Reference store configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Pagination limits.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Default query-by-example matcher.
    #[serde(default)]
    pub example: ExampleMatcher,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "machina".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// How a store assigns keys to entities saved without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// Keys must be supplied by the caller.
    #[default]
    None,
    /// Monotonic integer sequence.
    Sequence,
    /// Time-ordered UUIDs.
    Uuid,
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key assignment strategy.
    pub key_strategy: KeyStrategy,
    /// First value handed out by the sequence strategy.
    pub sequence_start: i64,
    /// Default sort criteria, e.g. `["name asc", "id desc"]`.
    pub default_sort: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_strategy: KeyStrategy::None,
            sequence_start: 1,
            default_sort: Vec::new(),
        }
    }
}

impl StoreConfig {
    /// Parses [`default_sort`](Self::default_sort) into criteria.
    pub fn default_sort_criteria(&self) -> DaoResult<Vec<SortCriterion>> {
        self.default_sort.iter().map(|s| s.parse()).collect()
    }
}

/// Pagination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a caller gives none.
    pub default_page_size: usize,
    /// Upper bound for any requested page size.
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Builds a page request, applying the configured default and limit.
    #[must_use]
    pub fn page_request(&self, page: usize, size: Option<usize>) -> PageRequest {
        self.limit(PageRequest::new(page, size.unwrap_or(self.default_page_size)))
    }

    /// Caps the size of `request` at [`max_page_size`](Self::max_page_size).
    #[must_use]
    pub fn limit(&self, request: PageRequest) -> PageRequest {
        request.capped(self.max_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaoConfig::default();
        assert_eq!(config.app.name, "machina");
        assert_eq!(config.store.key_strategy, KeyStrategy::None);
        assert_eq!(config.store.sequence_start, 1);
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.pagination.max_page_size, 100);
        assert_eq!(config.example, ExampleMatcher::default());
    }

    #[test]
    fn test_default_sort_criteria() {
        let store = StoreConfig {
            default_sort: vec!["name".to_string(), "id desc".to_string()],
            ..StoreConfig::default()
        };
        let criteria = store.default_sort_criteria().unwrap();
        assert_eq!(
            criteria,
            vec![
                SortCriterion::asc("name"),
                SortCriterion::desc("id")
            ]
        );
    }

    #[test]
    fn test_bad_default_sort() {
        let store = StoreConfig {
            default_sort: vec!["name upward".to_string()],
            ..StoreConfig::default()
        };
        assert!(store.default_sort_criteria().is_err());
    }

    #[test]
    fn test_page_request_limits() {
        let pagination = PaginationConfig {
            default_page_size: 10,
            max_page_size: 50,
        };
        assert_eq!(pagination.page_request(2, None), PageRequest::new(2, 10));
        assert_eq!(pagination.page_request(0, Some(500)).size, 50);
        assert_eq!(pagination.page_request(3, Some(5)), PageRequest::new(3, 5));
    }

    #[test]
    fn test_max_page_size_above_hundred_is_honored() {
        let pagination = PaginationConfig {
            default_page_size: 250,
            max_page_size: 500,
        };
        assert_eq!(pagination.page_request(0, None).size, 250);
        assert_eq!(pagination.limit(PageRequest::new(1, 400)).size, 400);
        assert_eq!(pagination.limit(PageRequest::new(1, 900)).size, 500);
    }

    #[test]
    fn test_key_strategy_deserialize() {
        let strategy: KeyStrategy = serde_json::from_str("\"sequence\"").unwrap();
        assert_eq!(strategy, KeyStrategy::Sequence);
    }
}
