//! Persistence context: the set of instances a DAO currently manages.

use machina_core::Entity;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Tracks managed instances by primary key.
///
/// One context belongs to one DAO instance and represents its unit of work;
/// [`clear`](Self::clear) ends the unit of work. All callers of that DAO
/// share the context. Transient instances (without a key) are never tracked.
pub struct PersistenceContext<T: Entity> {
    managed: Mutex<HashMap<T::Key, T>>,
}

impl<T: Entity> PersistenceContext<T> {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            managed: Mutex::new(HashMap::new()),
        }
    }

    /// Makes `entity` the managed instance for its key and returns it.
    pub fn attach(&self, entity: T) -> T {
        if let Some(key) = entity.key() {
            self.managed.lock().insert(key, entity.clone());
        }
        entity
    }

    /// Attaches every entity, returning them in the same order.
    pub fn attach_all(&self, entities: Vec<T>) -> Vec<T> {
        let mut managed = self.managed.lock();
        for entity in &entities {
            if let Some(key) = entity.key() {
                managed.insert(key, entity.clone());
            }
        }
        entities
    }

    /// Returns the managed instance for `key`.
    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.managed.lock().get(key).cloned()
    }

    /// Returns `true` if an instance is managed under `key`.
    pub fn contains(&self, key: &T::Key) -> bool {
        self.managed.lock().contains_key(key)
    }

    /// Stops managing the instance under `key`. Returns `true` if one was
    /// managed.
    pub fn evict(&self, key: &T::Key) -> bool {
        self.managed.lock().remove(key).is_some()
    }

    /// Stops managing every instance.
    pub fn clear(&self) {
        self.managed.lock().clear();
    }

    /// Returns the number of managed instances.
    pub fn len(&self) -> usize {
        self.managed.lock().len()
    }

    /// Returns `true` if nothing is managed.
    pub fn is_empty(&self) -> bool {
        self.managed.lock().is_empty()
    }
}

impl<T: Entity> Default for PersistenceContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> std::fmt::Debug for PersistenceContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceContext")
            .field("managed", &self.len())
            .finish()
    }
}
