//! Sort criteria applied to methods returning lists of entities.

use crate::{property, DaoError, DaoResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Sorts by one property path, ascending or descending.
///
/// Instances are immutable. Equality and hashing cover both the property
/// path and the direction, so criteria can be used as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SortCriterion {
    property: String,
    ascending: bool,
}

impl SortCriterion {
    /// Creates a sort criterion for a property path such as `"address.city"`.
    ///
    /// Any string is accepted and returned unchanged by
    /// [`property`](Self::property); a path that does not resolve fails when
    /// the criterion is applied.
    #[must_use]
    pub fn new(property: impl Into<String>, ascending: bool) -> Self {
        Self {
            property: property.into(),
            ascending,
        }
    }

    /// Creates a sort criterion from a property that may be absent.
    ///
    /// Fails with [`DaoError::InvalidArgument`] if `property` is `None`.
    pub fn try_new(property: Option<&str>, ascending: bool) -> DaoResult<Self> {
        property
            .map(|property| Self::new(property, ascending))
            .ok_or_else(|| DaoError::invalid_argument("Parameter property cannot be null"))
    }

    /// Ascending criterion for `property`.
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, true)
    }

    /// Descending criterion for `property`.
    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, false)
    }

    /// Returns the property path.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Returns `true` for ascending order.
    #[must_use]
    pub const fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Returns the same property sorted in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            property: self.property.clone(),
            ascending: !self.ascending,
        }
    }

    /// Compares two property values under this criterion's direction.
    #[must_use]
    pub fn compare(&self, left: &Value, right: &Value) -> Ordering {
        let ordering = property::compare_values(left, right);
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.ascending { "asc" } else { "desc" };
        write!(f, "{} {}", self.property, direction)
    }
}

impl FromStr for SortCriterion {
    type Err = DaoError;

    /// Parses `"name"`, `"name asc"` or `"name desc"`. Blank input is
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let property = parts
            .next()
            .ok_or_else(|| DaoError::invalid_argument("Sort criterion cannot be blank"))?;

        let ascending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => true,
            Some("desc") => false,
            Some(other) => {
                return Err(DaoError::invalid_argument(format!(
                    "Unknown sort direction '{other}' in '{s}'"
                )))
            }
        };

        if parts.next().is_some() {
            return Err(DaoError::invalid_argument(format!(
                "Unexpected trailing input in sort criterion '{s}'"
            )));
        }

        Ok(Self::new(property, ascending))
    }
}

impl<'de> Deserialize<'de> for SortCriterion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            property: Option<String>,
            #[serde(default = "default_ascending")]
            ascending: bool,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::try_new(raw.property.as_deref(), raw.ascending).map_err(serde::de::Error::custom)
    }
}

fn default_ascending() -> bool {
    true
}
