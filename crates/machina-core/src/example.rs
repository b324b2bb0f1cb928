//! Query-by-example matching.
//!
//! An example is an entity instance whose populated properties describe the
//! entities to find. Populated means a non-null leaf of the example's
//! serialized form, so `None` fields never constrain the result. The key
//! property is never compared. Nested objects match field by field, arrays
//! must be equal as a whole, and booleans always count as populated.

use crate::property::{compare_values, to_value};
use crate::{DaoResult, Entity};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// How string properties of the example are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMatch {
    /// Whole-string equality.
    #[default]
    Exact,
    /// Candidate starts with the example value.
    Start,
    /// Candidate ends with the example value.
    End,
    /// Candidate contains the example value.
    Anywhere,
}

/// Options controlling which example properties count and how they compare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleMatcher {
    /// Compare strings case-insensitively.
    pub ignore_case: bool,
    /// Treat numeric zero in the example as unpopulated.
    pub exclude_zeroes: bool,
    /// String comparison mode.
    pub string_match: StringMatch,
    /// Property paths never compared.
    pub ignored_properties: Vec<String>,
}

impl ExampleMatcher {
    /// Creates the default matcher: exact, case-sensitive, zeroes included.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares strings case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Ignores numeric zero values of the example.
    #[must_use]
    pub fn exclude_zeroes(mut self) -> Self {
        self.exclude_zeroes = true;
        self
    }

    /// Sets the string comparison mode.
    #[must_use]
    pub fn with_string_match(mut self, string_match: StringMatch) -> Self {
        self.string_match = string_match;
        self
    }

    /// Excludes a property path from matching.
    #[must_use]
    pub fn ignore_property(mut self, path: impl Into<String>) -> Self {
        self.ignored_properties.push(path.into());
        self
    }

    /// Prepares `example` for matching against many candidates.
    pub fn compile<T: Entity>(&self, example: &T) -> DaoResult<CompiledExample<'_>> {
        Ok(CompiledExample {
            matcher: self,
            example: to_value(example)?,
            key_property: T::KEY_PROPERTY,
        })
    }

    /// Checks a single candidate against an example.
    pub fn matches<T: Entity>(&self, example: &T, candidate: &T) -> DaoResult<bool> {
        self.compile(example)?.matches(candidate)
    }

    fn node_matches(&self, key_property: &str, path: &str, example: &Value, candidate: &Value) -> bool {
        if path == key_property || self.ignored_properties.iter().any(|p| p == path) {
            return true;
        }

        match example {
            Value::Null => true,
            Value::Object(fields) => fields.iter().all(|(name, value)| {
                let child = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{path}.{name}")
                };
                let other = candidate.get(name).unwrap_or(&Value::Null);
                self.node_matches(key_property, &child, value, other)
            }),
            Value::Number(n) if self.exclude_zeroes && is_zero(n) => true,
            Value::String(expected) => match candidate {
                Value::String(actual) => self.strings_match(expected, actual),
                _ => false,
            },
            _ => compare_values(example, candidate).is_eq(),
        }
    }

    fn strings_match(&self, expected: &str, actual: &str) -> bool {
        let (expected, actual) = if self.ignore_case {
            (expected.to_lowercase(), actual.to_lowercase())
        } else {
            (expected.to_string(), actual.to_string())
        };

        match self.string_match {
            StringMatch::Exact => actual == expected,
            StringMatch::Start => actual.starts_with(&expected),
            StringMatch::End => actual.ends_with(&expected),
            StringMatch::Anywhere => actual.contains(&expected),
        }
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().is_some_and(|v| v == 0.0)
}

/// An example ready to be matched against candidates.
#[derive(Debug)]
pub struct CompiledExample<'a> {
    matcher: &'a ExampleMatcher,
    example: Value,
    key_property: &'static str,
}

impl CompiledExample<'_> {
    /// Returns `true` if every populated property of the example matches.
    pub fn matches<T: Serialize>(&self, candidate: &T) -> DaoResult<bool> {
        let candidate = to_value(candidate)?;
        Ok(self
            .matcher
            .node_matches(self.key_property, "", &self.example, &candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, Serialize)]
    struct Book {
        id: Option<i64>,
        title: Option<String>,
        pages: u32,
        in_print: Option<bool>,
        publisher: Option<Publisher>,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    struct Publisher {
        name: Option<String>,
        city: Option<String>,
    }

    impl Entity for Book {
        type Key = i64;
        const NAME: &'static str = "Book";

        fn key(&self) -> Option<i64> {
            self.id
        }

        fn set_key(&mut self, key: i64) {
            self.id = Some(key);
        }
    }

    fn book(id: i64, title: &str, pages: u32, publisher: Option<(&str, &str)>) -> Book {
        Book {
            id: Some(id),
            title: Some(title.to_string()),
            pages,
            in_print: Some(true),
            publisher: publisher.map(|(name, city)| Publisher {
                name: Some(name.to_string()),
                city: Some(city.to_string()),
            }),
        }
    }

    #[test]
    fn test_empty_example_matches_everything() {
        let matcher = ExampleMatcher::new().exclude_zeroes();
        let example = Book::default();
        assert!(matcher.matches(&example, &book(1, "Dune", 412, None)).unwrap());
    }

    #[test]
    fn test_key_property_is_ignored() {
        let matcher = ExampleMatcher::new();
        let example = Book {
            id: Some(99),
            title: Some("Dune".to_string()),
            pages: 412,
            ..Book::default()
        };
        assert!(matcher.matches(&example, &book(1, "Dune", 412, None)).unwrap());
    }

    #[test]
    fn test_exact_string_match() {
        let matcher = ExampleMatcher::new().exclude_zeroes();
        let example = Book {
            title: Some("Dune".to_string()),
            ..Book::default()
        };
        assert!(matcher.matches(&example, &book(1, "Dune", 412, None)).unwrap());
        assert!(!matcher.matches(&example, &book(2, "Dune Messiah", 256, None)).unwrap());
        assert!(!matcher.matches(&example, &book(3, "dune", 412, None)).unwrap());
    }

    #[test]
    fn test_zero_counts_unless_excluded() {
        let example = Book::default();
        let candidate = book(1, "Dune", 412, None);
        assert!(!ExampleMatcher::new().matches(&example, &candidate).unwrap());
        assert!(ExampleMatcher::new()
            .exclude_zeroes()
            .matches(&example, &candidate)
            .unwrap());
    }

    #[test]
    fn test_ignore_case_and_partial_match() {
        let matcher = ExampleMatcher::new()
            .exclude_zeroes()
            .ignore_case()
            .with_string_match(StringMatch::Anywhere);
        let example = Book {
            title: Some("MESSIAH".to_string()),
            ..Book::default()
        };
        assert!(matcher.matches(&example, &book(1, "Dune Messiah", 256, None)).unwrap());
        assert!(!matcher.matches(&example, &book(2, "Dune", 412, None)).unwrap());
    }

    #[test]
    fn test_start_and_end_match() {
        let example = Book {
            title: Some("Dune".to_string()),
            ..Book::default()
        };
        let candidate = book(1, "Dune Messiah", 256, None);
        let start = ExampleMatcher::new()
            .exclude_zeroes()
            .with_string_match(StringMatch::Start);
        let end = ExampleMatcher::new()
            .exclude_zeroes()
            .with_string_match(StringMatch::End);
        assert!(start.matches(&example, &candidate).unwrap());
        assert!(!end.matches(&example, &candidate).unwrap());
    }

    #[test]
    fn test_nested_properties() {
        let matcher = ExampleMatcher::new().exclude_zeroes();
        let example = Book {
            publisher: Some(Publisher {
                name: None,
                city: Some("Philadelphia".to_string()),
            }),
            ..Book::default()
        };
        assert!(matcher
            .matches(&example, &book(1, "Dune", 412, Some(("Chilton", "Philadelphia"))))
            .unwrap());
        assert!(!matcher
            .matches(&example, &book(2, "Emma", 300, Some(("Murray", "London"))))
            .unwrap());
        assert!(!matcher.matches(&example, &book(3, "Ubik", 202, None)).unwrap());
    }

    #[test]
    fn test_ignored_properties() {
        let matcher = ExampleMatcher::new()
            .exclude_zeroes()
            .ignore_property("title");
        let example = Book {
            title: Some("Something else".to_string()),
            in_print: Some(true),
            ..Book::default()
        };
        assert!(matcher.matches(&example, &book(1, "Dune", 412, None)).unwrap());
    }

    #[test]
    fn test_boolean_false_is_populated() {
        let matcher = ExampleMatcher::new().exclude_zeroes();
        let example = Book {
            in_print: Some(false),
            ..Book::default()
        };
        assert!(!matcher.matches(&example, &book(1, "Dune", 412, None)).unwrap());
    }

    #[test]
    fn test_compiled_example_reused_across_candidates() {
        let matcher = ExampleMatcher::new();
        let example = Book {
            pages: 412,
            ..Book::default()
        };
        let compiled = matcher.compile(&example).unwrap();
        assert!(compiled.matches(&book(1, "Dune", 412, None)).unwrap());
        assert!(!compiled.matches(&book(2, "Ubik", 202, None)).unwrap());
    }
}
