//! Reference DAO adapter backed by an ordered map.

use crate::context::PersistenceContext;
use crate::keys::{ConfiguredKey, KeyGenerator};
use machina_config::{DaoConfig, PaginationConfig};
use machina_core::property::sort_entities;
use machina_core::{
    DaoError, DaoResult, Entity, ExampleMatcher, Page, PageRequest, ReadableDao, ResultWindow,
    SortCriterion, WriteableDao,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// DAO over an in-process `BTreeMap`.
///
/// Rows are kept in key order, which is the order of [`find_all`] when no
/// default sort criteria are configured and the tie-break order otherwise.
/// Every call holds the store lock for its whole duration, including the
/// update of the persistence context, so single calls are atomic and the DAO
/// may be shared between threads. Sequences of calls are not transactional.
/// Locks are always taken store first, context second.
///
/// Read and write operations register their results in the DAO's
/// [`PersistenceContext`], which records which keys are managed. It is not an
/// identity map: every read returns a fresh copy of the stored row, never the
/// instance held by the context, and two reads of one key yield two
/// independent values. The store always holds the authoritative state.
///
/// [`find_page`] caps the requested size at the configured
/// [`max_page_size`](PaginationConfig::max_page_size).
///
/// [`find_all`]: ReadableDao::find_all
/// [`find_page`]: ReadableDao::find_page
pub struct InMemoryDao<T: Entity> {
    store: RwLock<BTreeMap<T::Key, T>>,
    context: PersistenceContext<T>,
    default_sort: Vec<SortCriterion>,
    matcher: ExampleMatcher,
    pagination: PaginationConfig,
    key_generator: Option<Arc<dyn KeyGenerator<T::Key>>>,
}

impl<T: Entity> InMemoryDao<T> {
    /// Creates an empty DAO without default sort and key generation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
            context: PersistenceContext::new(),
            default_sort: Vec::new(),
            matcher: ExampleMatcher::default(),
            pagination: PaginationConfig::default(),
            key_generator: None,
        }
    }

    /// Sets the criteria applied when callers give none.
    #[must_use]
    pub fn with_default_sort(mut self, criteria: Vec<SortCriterion>) -> Self {
        self.default_sort = criteria;
        self
    }

    /// Sets the matcher used by [`find_by_example`](ReadableDao::find_by_example).
    #[must_use]
    pub fn with_example_matcher(mut self, matcher: ExampleMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Sets the page size default and limit.
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Builds a request for `page`, using the configured default size when
    /// `size` is `None` and capping it at the configured maximum.
    #[must_use]
    pub fn page_request(&self, page: usize, size: Option<usize>) -> PageRequest {
        self.pagination.page_request(page, size)
    }

    /// Assigns keys to entities saved without one.
    #[must_use]
    pub fn with_key_generator(mut self, generator: impl KeyGenerator<T::Key> + 'static) -> Self {
        self.key_generator = Some(Arc::new(generator));
        self
    }

    /// Saves every entity, failing on the first error.
    pub fn with_entities(self, entities: impl IntoIterator<Item = T>) -> DaoResult<Self> {
        for mut entity in entities {
            self.save(&mut entity)?;
        }
        self.context.clear();
        Ok(self)
    }

    /// Returns the persistence context.
    #[must_use]
    pub fn context(&self) -> &PersistenceContext<T> {
        &self.context
    }

    /// Returns `true` if `object` is managed by the persistence context.
    pub fn is_managed(&self, object: &T) -> bool {
        object
            .key()
            .is_some_and(|key| self.context.contains(&key))
    }

    /// Executes a query by example with an explicit matcher.
    pub fn find_by_example_with(&self, example: &T, matcher: &ExampleMatcher) -> DaoResult<Vec<T>> {
        debug!(entity = T::NAME, "find_by_example");
        let compiled = matcher.compile(example)?;

        let store = self.store.read();
        let mut matches = Vec::new();
        for candidate in store.values() {
            if compiled.matches(candidate)? {
                matches.push(candidate.clone());
            }
        }

        let sorted = sort_entities(matches, &self.default_sort)?;
        Ok(self.context.attach_all(sorted))
    }

    /// Sorts every stored row and cuts out `window`.
    fn sorted_window(
        &self,
        store: &BTreeMap<T::Key, T>,
        window: ResultWindow,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Vec<T>> {
        let criteria = if sorting_constraints.is_empty() {
            self.default_sort.as_slice()
        } else {
            sorting_constraints
        };
        let sorted = sort_entities(store.values().cloned().collect(), criteria)?;
        Ok(window.apply(sorted))
    }

    fn key_of(object: &T) -> DaoResult<T::Key> {
        object
            .key()
            .ok_or_else(|| DaoError::not_persistent::<T::Key>(T::NAME, None))
    }

    fn next_free_key(&self, store: &BTreeMap<T::Key, T>) -> DaoResult<T::Key> {
        let generator = self.key_generator.as_ref().ok_or_else(|| {
            DaoError::invalid_argument(format!(
                "{} has no key and no key generator is configured",
                T::NAME
            ))
        })?;

        for _ in 0..=store.len() {
            let key = generator.next_key();
            if !store.contains_key(&key) {
                return Ok(key);
            }
            warn!(entity = T::NAME, id = %key, "Generated key already in use, skipping");
        }

        Err(DaoError::backend(format!(
            "Key generator for {} produced no free key",
            T::NAME
        )))
    }

    /// Replaces the stored state under the object's key.
    fn store_existing(&self, object: &T) -> DaoResult<T> {
        let key = Self::key_of(object)?;
        let mut store = self.store.write();
        let row = store
            .get_mut(&key)
            .ok_or_else(|| DaoError::not_persistent(T::NAME, Some(&key)))?;
        *row = object.clone();
        Ok(self.context.attach(object.clone()))
    }
}

impl<T: Entity> InMemoryDao<T>
where
    T::Key: ConfiguredKey,
{
    /// Creates an empty DAO configured from `config`.
    pub fn from_config(config: &DaoConfig) -> DaoResult<Self> {
        let mut dao = Self::new()
            .with_default_sort(config.store.default_sort_criteria()?)
            .with_example_matcher(config.example.clone())
            .with_pagination(config.pagination.clone());
        dao.key_generator = T::Key::generator_for(&config.store)?;
        Ok(dao)
    }
}

impl<T: Entity> Default for InMemoryDao<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> std::fmt::Debug for InMemoryDao<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDao")
            .field("entity", &T::NAME)
            .field("rows", &self.store.read().len())
            .field("default_sort", &self.default_sort)
            .field("max_page_size", &self.pagination.max_page_size)
            .finish_non_exhaustive()
    }
}

impl<T: Entity> ReadableDao<T> for InMemoryDao<T> {
    fn count_all(&self) -> DaoResult<u64> {
        Ok(self.store.read().len() as u64)
    }

    fn find_by_id(&self, id: &T::Key) -> DaoResult<Option<T>> {
        debug!(entity = T::NAME, id = %id, "find_by_id");
        let store = self.store.read();
        Ok(store.get(id).cloned().map(|entity| self.context.attach(entity)))
    }

    fn find_by_ids(&self, ids: &[T::Key]) -> DaoResult<Vec<T>> {
        debug!(entity = T::NAME, count = ids.len(), "find_by_ids");
        let store = self.store.read();
        let found = ids.iter().filter_map(|id| store.get(id).cloned()).collect();
        Ok(self.context.attach_all(found))
    }

    fn find_all(&self) -> DaoResult<Vec<T>> {
        debug!(entity = T::NAME, "find_all");
        let store = self.store.read();
        let sorted = sort_entities(store.values().cloned().collect(), &self.default_sort)?;
        Ok(self.context.attach_all(sorted))
    }

    fn find_by_example(&self, example: &T) -> DaoResult<Vec<T>> {
        self.find_by_example_with(example, &self.matcher)
    }

    fn refresh(&self, object: &mut T) -> DaoResult<()> {
        let key = Self::key_of(object)?;
        debug!(entity = T::NAME, id = %key, "refresh");
        let store = self.store.read();
        let stored = store
            .get(&key)
            .cloned()
            .ok_or_else(|| DaoError::not_persistent(T::NAME, Some(&key)))?;
        *object = self.context.attach(stored);
        Ok(())
    }

    fn reattach(&self, object: T) -> DaoResult<T> {
        let key = Self::key_of(&object)?;
        debug!(entity = T::NAME, id = %key, "reattach");
        let store = self.store.read();
        if !store.contains_key(&key) {
            return Err(DaoError::not_persistent(T::NAME, Some(&key)));
        }
        Ok(self.context.attach(object))
    }

    fn find_all_paged(
        &self,
        first_result: i64,
        max_results: i64,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Vec<T>> {
        let window = ResultWindow::new(first_result, max_results)?;
        let sort: Vec<String> = sorting_constraints.iter().map(ToString::to_string).collect();
        debug!(
            entity = T::NAME,
            first_result,
            max_results,
            sort = ?sort,
            "find_all_paged"
        );

        let store = self.store.read();
        let rows = self.sorted_window(&store, window, sorting_constraints)?;
        Ok(self.context.attach_all(rows))
    }

    fn find_page(
        &self,
        request: PageRequest,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Page<T>> {
        let request = self.pagination.limit(request);
        let window = request.window()?;
        debug!(entity = T::NAME, page = request.page, size = request.size, "find_page");

        let store = self.store.read();
        let total = store.len() as u64;
        let rows = self.sorted_window(&store, window, sorting_constraints)?;
        Ok(Page::new(self.context.attach_all(rows), request, total))
    }

    fn default_sort_criteria(&self) -> &[SortCriterion] {
        &self.default_sort
    }
}

impl<T: Entity> WriteableDao<T> for InMemoryDao<T> {
    fn delete(&self, object: &T) -> DaoResult<()> {
        let key = Self::key_of(object)?;
        self.delete_by_id(&key)
    }

    fn delete_by_id(&self, id: &T::Key) -> DaoResult<()> {
        debug!(entity = T::NAME, id = %id, "delete");
        let mut store = self.store.write();
        store
            .remove(id)
            .ok_or_else(|| DaoError::not_found(T::NAME, id))?;
        self.context.evict(id);
        Ok(())
    }

    fn save(&self, object: &mut T) -> DaoResult<()> {
        let mut store = self.store.write();
        let key = match object.key() {
            Some(key) => key,
            None => {
                let key = self.next_free_key(&store)?;
                object.set_key(key.clone());
                key
            }
        };
        debug!(entity = T::NAME, id = %key, "save");

        if store.contains_key(&key) {
            return Err(DaoError::conflict(format!(
                "{} with id {} already exists",
                T::NAME,
                key
            )));
        }
        store.insert(key, object.clone());
        self.context.attach(object.clone());
        Ok(())
    }

    fn update(&self, object: &T) -> DaoResult<T> {
        debug!(entity = T::NAME, id = ?object.key(), "update");
        self.store_existing(object)
    }

    fn merge(&self, object: T) -> DaoResult<T> {
        debug!(entity = T::NAME, id = ?object.key(), "merge");
        self.store_existing(&object)
    }

    fn evict(&self, object: &T) -> DaoResult<()> {
        if let Some(key) = object.key() {
            debug!(entity = T::NAME, id = %key, "evict");
            self.context.evict(&key);
        }
        Ok(())
    }

    fn is_persistent(&self, object: &T) -> DaoResult<bool> {
        Ok(object
            .key()
            .is_some_and(|key| self.store.read().contains_key(&key)))
    }
}
