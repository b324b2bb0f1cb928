//! Generic Data Access Object contracts.
//!
//! Adapters implement [`ReadableDao`] and [`WriteableDao`] for an entity
//! type; [`Dao`] is the union of both and is implemented automatically.
//! Every call is synchronous and runs to completion. Thread-safety beyond
//! the `Send + Sync` bounds is documented by each adapter.

use crate::{DaoResult, Entity, Page, PageRequest, SortCriterion};

/// Read-only access to the stored instances of `T`.
///
/// Absence is never an error for lookups: [`find_by_id`] returns `Ok(None)`
/// and [`find_by_ids`] leaves missing keys out.
///
/// [`find_by_id`]: ReadableDao::find_by_id
/// [`find_by_ids`]: ReadableDao::find_by_ids
pub trait ReadableDao<T: Entity>: Send + Sync {
    /// Returns the total number of stored instances.
    fn count_all(&self) -> DaoResult<u64>;

    /// Returns the instance with the given primary key, if any.
    fn find_by_id(&self, id: &T::Key) -> DaoResult<Option<T>>;

    /// Returns the instances with the given primary keys.
    ///
    /// Results follow the order of `ids`. Keys with no stored instance are
    /// omitted; a key given twice yields its instance twice.
    fn find_by_ids(&self, ids: &[T::Key]) -> DaoResult<Vec<T>>;

    /// Returns every stored instance, ordered by the default sort criteria.
    fn find_all(&self) -> DaoResult<Vec<T>>;

    /// Executes a query by example.
    ///
    /// Matching rules are those of [`ExampleMatcher`](crate::ExampleMatcher)
    /// unless the adapter documents otherwise.
    fn find_by_example(&self, example: &T) -> DaoResult<Vec<T>>;

    /// Overwrites `object` with the state held by the store.
    ///
    /// Fails with `NotPersistent` if `object` has no stored counterpart.
    fn refresh(&self, object: &mut T) -> DaoResult<()>;

    /// Attaches `object` to the persistence context without touching the
    /// store, returning the managed instance.
    fn reattach(&self, object: T) -> DaoResult<T>;

    /// Returns one window of instances.
    ///
    /// `first_result` is a zero-based offset and `max_results` the maximum
    /// number of returned instances. An empty `sorting_constraints` falls back
    /// to [`default_sort_criteria`](ReadableDao::default_sort_criteria).
    /// Fails with `InvalidArgument` if `first_result < 0` or
    /// `max_results <= 0`.
    fn find_all_paged(
        &self,
        first_result: i64,
        max_results: i64,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Vec<T>>;

    /// Criteria used when a caller gives none. May be empty.
    fn default_sort_criteria(&self) -> &[SortCriterion];

    /// Returns one page of instances together with the total count.
    fn find_page(
        &self,
        request: PageRequest,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Page<T>> {
        let window = request.window()?;
        let total = self.count_all()?;
        let content = self.find_all_paged(
            i64::try_from(window.first_result()).unwrap_or(i64::MAX),
            i64::try_from(window.max_results()).unwrap_or(i64::MAX),
            sorting_constraints,
        )?;
        Ok(Page::new(content, request, total))
    }
}

/// Mutating access to the stored instances of `T`.
pub trait WriteableDao<T: Entity>: Send + Sync {
    /// Removes the stored counterpart of `object`.
    ///
    /// Fails with `NotPersistent` if `object` has no key and with `NotFound`
    /// if nothing is stored under its key.
    fn delete(&self, object: &T) -> DaoResult<()>;

    /// Removes the instance stored under `id`.
    ///
    /// Fails with `NotFound` if nothing is stored under `id`.
    fn delete_by_id(&self, id: &T::Key) -> DaoResult<()>;

    /// Inserts `object`.
    ///
    /// An adapter that generates keys writes the new key into `object`.
    /// Fails with `Conflict` if `object` is already persistent.
    fn save(&self, object: &mut T) -> DaoResult<()>;

    /// Stores the state of an already persistent `object`.
    ///
    /// Returns the managed instance, which reflects the stored state and is
    /// not necessarily the argument. Fails with `NotPersistent` for a
    /// transient or deleted instance.
    fn update(&self, object: &T) -> DaoResult<T>;

    /// Copies the state of a detached `object` into the persistence context,
    /// returning the managed instance.
    ///
    /// Adapters without managed instances apply update semantics and return
    /// the stored state.
    fn merge(&self, object: T) -> DaoResult<T>;

    /// Removes `object` from the persistence context. The store is not
    /// touched; adapters without a persistence context do nothing.
    fn evict(&self, object: &T) -> DaoResult<()>;

    /// Returns `true` if `object` has a stored counterpart.
    fn is_persistent(&self, object: &T) -> DaoResult<bool>;
}

/// Complete read-write DAO contract.
pub trait Dao<T: Entity>: ReadableDao<T> + WriteableDao<T> {}

impl<T: Entity, D> Dao<T> for D where D: ReadableDao<T> + WriteableDao<T> {}
