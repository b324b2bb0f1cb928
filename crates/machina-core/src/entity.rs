//! Entity and key contracts for DAO-managed types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Primary key of an entity.
///
/// Keys are serializable, totally ordered values such as integers, strings
/// or UUIDs. This trait is implemented for every type meeting the bounds.
pub trait EntityKey:
    Clone + Eq + Ord + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<K> EntityKey for K where
    K: Clone + Eq + Ord + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// A persistable domain type.
///
/// Properties are addressed by dotted paths over the serialized form of the
/// entity, so field names follow any `serde` renames.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    /// Primary key type.
    type Key: EntityKey;

    /// Entity name used in errors and logs.
    const NAME: &'static str;

    /// Property path holding the primary key.
    const KEY_PROPERTY: &'static str = "id";

    /// Returns the primary key, or `None` for a transient entity without one.
    fn key(&self) -> Option<Self::Key>;

    /// Assigns the primary key.
    fn set_key(&mut self, key: Self::Key);
}
