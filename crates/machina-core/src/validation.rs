//! Validation utilities.

use crate::DaoError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the entity and returns a `DaoError` on failure.
    fn validate_entity(&self) -> Result<(), DaoError> {
        self.validate().map_err(validation_errors_to_dao_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `DaoError`.
///
/// Field messages are sorted by field name and joined with `"; "`.
#[must_use]
pub fn validation_errors_to_dao_error(errors: ValidationErrors) -> DaoError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    messages.sort();

    DaoError::Validation(messages.join("; "))
}

/// Validation rules for property names in sort and matcher settings.
pub mod rules {
    use validator::ValidationError;

    /// Validates a dotted property path such as `address.city`.
    pub fn property_path(path: &str) -> Result<(), ValidationError> {
        let valid = !path.is_empty()
            && path.split('.').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
            });
        if valid {
            Ok(())
        } else {
            Err(ValidationError::new("invalid_property_path"))
        }
    }
}
