//! Common test fixtures for DAO integration tests.

#![allow(dead_code)]

use machina_core::{init_tracing, Entity, ExampleMatcher, LoggingConfig, SortCriterion};
use machina_repository::{InMemoryDao, SequenceKeyGenerator};
use serde::Serialize;
use std::sync::Once;
use validator::Validate;

static TRACING: Once = Once::new();

/// Installs a subscriber once per test binary. `RUST_LOG=machina=debug`
/// shows every DAO call.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        if let Err(e) = init_tracing(&config) {
            eprintln!("tracing not installed: {e}");
        }
    });
}

/// Postal address embedded in [`Customer`].
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct Address {
    #[validate(length(min = 1))]
    pub city: String,
    pub zip: Option<String>,
}

/// Test entity with a generated integer key.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct Customer {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(max = 150))]
    pub age: Option<u32>,
    #[validate(nested)]
    pub address: Option<Address>,
}

impl Entity for Customer {
    type Key = i64;
    const NAME: &'static str = "Customer";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }
}

impl Customer {
    /// Creates a transient customer with only a name.
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: None,
            age: None,
            address: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn living_in(mut self, city: &str) -> Self {
        self.address = Some(Address {
            city: city.to_string(),
            zip: None,
        });
        self
    }
}

/// Five keyed customers, inserted out of key order.
pub fn customers() -> Vec<Customer> {
    vec![
        Customer::named("Carol").with_id(3).with_age(41).living_in("Oslo"),
        Customer::named("alice")
            .with_id(1)
            .with_age(29)
            .with_email("alice@example.com")
            .living_in("Berlin"),
        Customer::named("Bob").with_id(2).living_in("berlin"),
        Customer::named("Dave").with_id(5).with_age(29),
        Customer::named("Eve")
            .with_id(4)
            .with_age(35)
            .with_email("eve@example.org")
            .living_in("Paris"),
    ]
}

/// Empty DAO handing out keys from 1.
pub fn empty_dao() -> InMemoryDao<Customer> {
    init_test_tracing();
    InMemoryDao::new().with_key_generator(SequenceKeyGenerator::new(1))
}

/// DAO seeded with [`customers`] and a `name asc` default sort.
pub fn seeded_dao() -> InMemoryDao<Customer> {
    init_test_tracing();
    InMemoryDao::new()
        .with_key_generator(SequenceKeyGenerator::new(100))
        .with_default_sort(vec![SortCriterion::asc("name")])
        .with_example_matcher(ExampleMatcher::new())
        .with_entities(customers())
        .expect("fixtures have distinct keys")
}

/// Extracts keys in result order.
pub fn ids(customers: &[Customer]) -> Vec<i64> {
    customers.iter().filter_map(|c| c.id).collect()
}
