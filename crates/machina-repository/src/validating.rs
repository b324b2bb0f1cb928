//! DAO decorator that validates entities before they are written.

use machina_core::{
    DaoResult, Entity, Page, PageRequest, ReadableDao, SortCriterion, ValidateExt, WriteableDao,
};
use tracing::debug;
use validator::Validate;

/// Wraps a DAO and runs `validator` rules on every entity passed to
/// [`save`](WriteableDao::save), [`update`](WriteableDao::update) and
/// [`merge`](WriteableDao::merge).
///
/// A rejected entity yields `DaoError::Validation` and the inner DAO is not
/// called. Reads are forwarded unchanged.
#[derive(Debug, Default)]
pub struct ValidatingDao<D> {
    inner: D,
}

impl<D> ValidatingDao<D> {
    /// Wraps `inner`.
    pub const fn new(inner: D) -> Self {
        Self { inner }
    }

    /// Returns the wrapped DAO.
    pub const fn inner(&self) -> &D {
        &self.inner
    }

    /// Unwraps the decorator.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<T, D> ReadableDao<T> for ValidatingDao<D>
where
    T: Entity,
    D: ReadableDao<T>,
{
    fn count_all(&self) -> DaoResult<u64> {
        self.inner.count_all()
    }

    fn find_by_id(&self, id: &T::Key) -> DaoResult<Option<T>> {
        self.inner.find_by_id(id)
    }

    fn find_by_ids(&self, ids: &[T::Key]) -> DaoResult<Vec<T>> {
        self.inner.find_by_ids(ids)
    }

    fn find_all(&self) -> DaoResult<Vec<T>> {
        self.inner.find_all()
    }

    fn find_by_example(&self, example: &T) -> DaoResult<Vec<T>> {
        self.inner.find_by_example(example)
    }

    fn refresh(&self, object: &mut T) -> DaoResult<()> {
        self.inner.refresh(object)
    }

    fn reattach(&self, object: T) -> DaoResult<T> {
        self.inner.reattach(object)
    }

    fn find_all_paged(
        &self,
        first_result: i64,
        max_results: i64,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Vec<T>> {
        self.inner
            .find_all_paged(first_result, max_results, sorting_constraints)
    }

    fn default_sort_criteria(&self) -> &[SortCriterion] {
        self.inner.default_sort_criteria()
    }

    fn find_page(
        &self,
        request: PageRequest,
        sorting_constraints: &[SortCriterion],
    ) -> DaoResult<Page<T>> {
        self.inner.find_page(request, sorting_constraints)
    }
}

impl<T, D> WriteableDao<T> for ValidatingDao<D>
where
    T: Entity + Validate,
    D: WriteableDao<T>,
{
    fn delete(&self, object: &T) -> DaoResult<()> {
        self.inner.delete(object)
    }

    fn delete_by_id(&self, id: &T::Key) -> DaoResult<()> {
        self.inner.delete_by_id(id)
    }

    fn save(&self, object: &mut T) -> DaoResult<()> {
        validated(object)?;
        self.inner.save(object)
    }

    fn update(&self, object: &T) -> DaoResult<T> {
        validated(object)?;
        self.inner.update(object)
    }

    fn merge(&self, object: T) -> DaoResult<T> {
        validated(&object)?;
        self.inner.merge(object)
    }

    fn evict(&self, object: &T) -> DaoResult<()> {
        self.inner.evict(object)
    }

    fn is_persistent(&self, object: &T) -> DaoResult<bool> {
        self.inner.is_persistent(object)
    }
}

fn validated<T: Entity + Validate>(object: &T) -> DaoResult<()> {
    object.validate_entity().map_err(|e| {
        debug!(entity = T::NAME, id = ?object.key(), error = %e, "Entity rejected");
        e
    })
}
