//! Key generation for entities saved without a primary key.

use machina_config::{KeyStrategy, StoreConfig};
use machina_core::{DaoError, DaoResult, EntityKey};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Produces fresh primary keys.
pub trait KeyGenerator<K>: Send + Sync {
    /// Returns the next key.
    fn next_key(&self) -> K;
}

/// Monotonic integer sequence.
#[derive(Debug)]
pub struct SequenceKeyGenerator {
    next: AtomicI64,
}

impl SequenceKeyGenerator {
    /// Creates a sequence whose first key is `start`.
    #[must_use]
    pub const fn new(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }

    /// Returns the value the next call will hand out.
    #[must_use]
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::SeqCst)
    }

    fn advance(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for SequenceKeyGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl KeyGenerator<i64> for SequenceKeyGenerator {
    fn next_key(&self) -> i64 {
        self.advance()
    }
}

impl KeyGenerator<String> for SequenceKeyGenerator {
    fn next_key(&self) -> String {
        self.advance().to_string()
    }
}

/// Time-ordered UUID (v7) keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeyGenerator;

impl KeyGenerator<Uuid> for UuidKeyGenerator {
    fn next_key(&self) -> Uuid {
        Uuid::now_v7()
    }
}

impl KeyGenerator<String> for UuidKeyGenerator {
    fn next_key(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Key types that can be generated according to a [`StoreConfig`].
pub trait ConfiguredKey: EntityKey {
    /// Builds the generator selected by `config.key_strategy`.
    ///
    /// Fails with a configuration error when the strategy cannot produce
    /// this key type.
    fn generator_for(config: &StoreConfig) -> DaoResult<Option<Arc<dyn KeyGenerator<Self>>>>;
}

fn unsupported(strategy: KeyStrategy, key_type: &str) -> DaoError {
    DaoError::Configuration(format!(
        "Key strategy {strategy:?} cannot generate {key_type} keys"
    ))
}

impl ConfiguredKey for i64 {
    fn generator_for(config: &StoreConfig) -> DaoResult<Option<Arc<dyn KeyGenerator<Self>>>> {
        match config.key_strategy {
            KeyStrategy::None => Ok(None),
            KeyStrategy::Sequence => Ok(Some(Arc::new(SequenceKeyGenerator::new(
                config.sequence_start,
            )))),
            KeyStrategy::Uuid => Err(unsupported(KeyStrategy::Uuid, "i64")),
        }
    }
}

impl ConfiguredKey for Uuid {
    fn generator_for(config: &StoreConfig) -> DaoResult<Option<Arc<dyn KeyGenerator<Self>>>> {
        match config.key_strategy {
            KeyStrategy::None => Ok(None),
            KeyStrategy::Uuid => Ok(Some(Arc::new(UuidKeyGenerator))),
            KeyStrategy::Sequence => Err(unsupported(KeyStrategy::Sequence, "UUID")),
        }
    }
}

impl ConfiguredKey for String {
    fn generator_for(config: &StoreConfig) -> DaoResult<Option<Arc<dyn KeyGenerator<Self>>>> {
        match config.key_strategy {
            KeyStrategy::None => Ok(None),
            KeyStrategy::Sequence => Ok(Some(Arc::new(SequenceKeyGenerator::new(
                config.sequence_start,
            )))),
            KeyStrategy::Uuid => Ok(Some(Arc::new(UuidKeyGenerator))),
        }
    }
}
