//! Configuration validation.
//!
//! Validation collects every problem found so a bad configuration file is
//! reported in one pass.

use crate::{DaoConfig, KeyStrategy, PaginationConfig, StoreConfig};
use machina_core::rules::property_path;
use machina_core::SortCriterion;
use std::collections::HashSet;
use std::fmt;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A default sort entry does not parse.
    InvalidSortCriterion { value: String, message: String },
    /// The same property appears twice in the default sort.
    DuplicateSortProperty { property: String },
    /// A page size is zero.
    ZeroPageSize { name: String },
    /// The default page size exceeds the maximum.
    DefaultPageSizeTooLarge { default: usize, maximum: usize },
    /// The sequence must start at a positive value.
    InvalidSequenceStart { value: i64 },
    /// A sort or matcher setting names something that is not a dotted
    /// property path.
    InvalidPropertyPath { setting: &'static str, path: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSortCriterion { value, message } => {
                write!(f, "Invalid default sort '{value}': {message}")
            }
            Self::DuplicateSortProperty { property } => {
                write!(f, "Property '{property}' appears more than once in default sort")
            }
            Self::ZeroPageSize { name } => write!(f, "{name} must be positive"),
            Self::DefaultPageSizeTooLarge { default, maximum } => write!(
                f,
                "Default page size ({default}) cannot exceed max page size ({maximum})"
            ),
            Self::InvalidSequenceStart { value } => {
                write!(f, "Sequence start must be positive, got {value}")
            }
            Self::InvalidPropertyPath { setting, path } => {
                write!(f, "{setting} contains invalid property path '{path}'")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration.
    ///
    /// Returns `Ok(())` if valid, or `Err` with every error found.
    pub fn validate(config: &DaoConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_store(&config.store, &mut errors);
        Self::validate_pagination(&config.pagination, &mut errors);

        for path in &config.example.ignored_properties {
            Self::check_path("example.ignored_properties", path, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_store(config: &StoreConfig, errors: &mut Vec<ConfigValidationError>) {
        let mut seen = HashSet::new();
        for value in &config.default_sort {
            match value.parse::<SortCriterion>() {
                Ok(criterion) => {
                    Self::check_path("store.default_sort", criterion.property(), errors);
                    if !seen.insert(criterion.property().to_string()) {
                        errors.push(ConfigValidationError::DuplicateSortProperty {
                            property: criterion.property().to_string(),
                        });
                    }
                }
                Err(e) => errors.push(ConfigValidationError::InvalidSortCriterion {
                    value: value.clone(),
                    message: e.to_string(),
                }),
            }
        }

        if config.key_strategy == KeyStrategy::Sequence && config.sequence_start < 1 {
            errors.push(ConfigValidationError::InvalidSequenceStart {
                value: config.sequence_start,
            });
        }
    }

    fn check_path(setting: &'static str, path: &str, errors: &mut Vec<ConfigValidationError>) {
        if property_path(path).is_err() {
            errors.push(ConfigValidationError::InvalidPropertyPath {
                setting,
                path: path.to_string(),
            });
        }
    }

    fn validate_pagination(config: &PaginationConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.default_page_size == 0 {
            errors.push(ConfigValidationError::ZeroPageSize {
                name: "default_page_size".to_string(),
            });
        }
        if config.max_page_size == 0 {
            errors.push(ConfigValidationError::ZeroPageSize {
                name: "max_page_size".to_string(),
            });
        }
        if config.default_page_size > config.max_page_size {
            errors.push(ConfigValidationError::DefaultPageSizeTooLarge {
                default: config.default_page_size,
                maximum: config.max_page_size,
            });
        }
    }
}
