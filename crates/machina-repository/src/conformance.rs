//! Reusable checks for DAO adapters.
//!
//! Each check builds a fresh DAO from `factory`, drives it through one part of
//! the [`Dao`] contract and panics with a descriptive message on the first
//! violation. Adapters call [`run_suite`] from their own tests:
//!
//! ```ignore
//! #[test]
//! fn in_memory_dao_conforms() {
//!     conformance::run_suite(InMemoryDao::new, &fixtures(), |c: &mut Customer| {
//!         c.name.push('!');
//!     });
//! }
//! ```
//!
//! Fixtures must carry distinct keys and `modify` must change some non-key
//! property.

use machina_core::{Dao, DaoError, DaoResult, Entity, PageRequest};
use std::fmt::Debug;

fn ok<V>(result: DaoResult<V>, operation: &str) -> V {
    result.unwrap_or_else(|e| panic!("{operation} failed: {e}"))
}

fn key_of<T: Entity>(entity: &T) -> T::Key {
    entity
        .key()
        .unwrap_or_else(|| panic!("{} fixture has no key", T::NAME))
}

fn seeded<T, D, F>(factory: &F, fixtures: &[T]) -> D
where
    T: Entity,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = factory();
    for fixture in fixtures {
        ok(dao.save(&mut fixture.clone()), "save");
    }
    dao
}

fn assert_not_persistent<V: Debug>(result: DaoResult<V>, operation: &str) {
    match result {
        Err(DaoError::NotPersistent { .. }) => {}
        other => panic!("{operation} on a transient instance returned {other:?}"),
    }
}

/// A saved instance can be found by its key and counts towards `count_all`.
pub fn check_save_then_find<T, D, F>(factory: &F, fixture: &T)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = factory();
    let key = key_of(fixture);
    assert_eq!(ok(dao.find_by_id(&key), "find_by_id"), None);

    ok(dao.save(&mut fixture.clone()), "save");
    assert_eq!(ok(dao.find_by_id(&key), "find_by_id"), Some(fixture.clone()));
    assert_eq!(ok(dao.count_all(), "count_all"), 1);
}

/// Saving an already stored key fails with `Conflict`.
pub fn check_save_duplicate<T, D, F>(factory: &F, fixture: &T)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = seeded(factory, std::slice::from_ref(fixture));
    match dao.save(&mut fixture.clone()) {
        Err(DaoError::Conflict(_)) => {}
        other => panic!("save of a stored key returned {other:?}"),
    }
    assert_eq!(ok(dao.count_all(), "count_all"), 1);
}

/// A deleted instance can no longer be found and a second delete fails.
pub fn check_delete<T, D, F>(factory: &F, fixture: &T)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = seeded(factory, std::slice::from_ref(fixture));
    let key = key_of(fixture);

    ok(dao.delete(fixture), "delete");
    assert_eq!(ok(dao.find_by_id(&key), "find_by_id"), None);
    assert_eq!(ok(dao.count_all(), "count_all"), 0);

    match dao.delete_by_id(&key) {
        Err(e) if e.is_not_found() => {}
        other => panic!("delete of a missing row returned {other:?}"),
    }
}

/// An update is visible to later lookups.
pub fn check_update<T, D, F, M>(factory: &F, fixture: &T, modify: &M)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
    M: Fn(&mut T),
{
    let dao = seeded(factory, std::slice::from_ref(fixture));
    let mut changed = fixture.clone();
    modify(&mut changed);
    assert_ne!(&changed, fixture, "modify must change the fixture");

    let managed = ok(dao.update(&changed), "update");
    assert_eq!(managed, changed);
    assert_eq!(ok(dao.find_by_id(&key_of(fixture)), "find_by_id"), Some(changed));
}

/// `update`, `merge`, `refresh` and `reattach` reject instances that were
/// never saved.
pub fn check_transient_rejected<T, D, F>(factory: &F, fixture: &T)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = factory();
    assert_not_persistent(dao.update(fixture), "update");
    assert_not_persistent(dao.merge(fixture.clone()), "merge");
    assert_not_persistent(dao.refresh(&mut fixture.clone()), "refresh");
    assert_not_persistent(dao.reattach(fixture.clone()), "reattach");
    assert_eq!(ok(dao.count_all(), "count_all"), 0);
}

/// `refresh` discards local changes.
pub fn check_refresh<T, D, F, M>(factory: &F, fixture: &T, modify: &M)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
    M: Fn(&mut T),
{
    let dao = seeded(factory, std::slice::from_ref(fixture));
    let mut local = fixture.clone();
    modify(&mut local);
    ok(dao.refresh(&mut local), "refresh");
    assert_eq!(&local, fixture);
}

/// `is_persistent` follows the save/delete life cycle.
pub fn check_persistence_flags<T, D, F>(factory: &F, fixture: &T)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = factory();
    assert!(!ok(dao.is_persistent(fixture), "is_persistent"));
    ok(dao.save(&mut fixture.clone()), "save");
    assert!(ok(dao.is_persistent(fixture), "is_persistent"));
    ok(dao.evict(fixture), "evict");
    assert!(ok(dao.is_persistent(fixture), "is_persistent"));
    ok(dao.delete(fixture), "delete");
    assert!(!ok(dao.is_persistent(fixture), "is_persistent"));
}

/// Negative offsets and non-positive window sizes fail with
/// `InvalidArgument`.
pub fn check_invalid_windows<T, D, F>(factory: &F)
where
    T: Entity,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = factory();
    for (first, max) in [(-1, 10), (0, 0), (0, -5)] {
        match dao.find_all_paged(first, max, &[]) {
            Err(DaoError::InvalidArgument(_)) => {}
            Err(e) => panic!("find_all_paged({first}, {max}) failed with {e}"),
            Ok(_) => panic!("find_all_paged({first}, {max}) was accepted"),
        }
    }
}

/// Consecutive windows without sort criteria concatenate to `find_all`.
pub fn check_paging_concatenation<T, D, F>(factory: &F, fixtures: &[T], page_size: i64)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = seeded(factory, fixtures);
    let all = ok(dao.find_all(), "find_all");
    assert_eq!(all.len(), fixtures.len());

    let mut paged = Vec::new();
    let mut first = 0;
    loop {
        let window = ok(dao.find_all_paged(first, page_size, &[]), "find_all_paged");
        assert!(window.len() as i64 <= page_size, "window exceeds max_results");
        if window.is_empty() {
            break;
        }
        first += window.len() as i64;
        paged.extend(window);
    }
    assert_eq!(paged, all);

    let size = usize::try_from(page_size).unwrap_or(1);
    let page = ok(dao.find_page(PageRequest::new(0, size), &[]), "find_page");
    assert_eq!(page.total_elements(), fixtures.len() as u64);
}

/// Empty sort criteria fall back to the default ones, explicit criteria
/// replace them.
pub fn check_default_sort_fallback<T, D, F>(factory: &F, fixtures: &[T])
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = seeded(factory, fixtures);
    let everything = i64::try_from(fixtures.len()).unwrap_or(i64::MAX);
    let all = ok(dao.find_all(), "find_all");

    let unsorted = ok(dao.find_all_paged(0, everything, &[]), "find_all_paged");
    assert_eq!(unsorted, all);

    let defaults = dao.default_sort_criteria().to_vec();
    let explicit = ok(
        dao.find_all_paged(0, everything, &defaults),
        "find_all_paged",
    );
    assert_eq!(explicit, all);
}

/// `find_by_ids` keeps argument order, drops unknown keys and repeats
/// duplicates.
pub fn check_find_by_ids<T, D, F>(factory: &F, fixtures: &[T])
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    assert!(fixtures.len() >= 2, "find_by_ids check needs two fixtures");
    let dao = seeded(factory, &fixtures[1..]);

    let missing = key_of(&fixtures[0]);
    let last = &fixtures[fixtures.len() - 1];
    let keys = vec![key_of(last), missing, key_of(&fixtures[1]), key_of(last)];
    let found = ok(dao.find_by_ids(&keys), "find_by_ids");
    assert_eq!(found, vec![last.clone(), fixtures[1].clone(), last.clone()]);

    assert!(ok(dao.find_by_ids(&[]), "find_by_ids").is_empty());
}

/// Every fixture used as an example finds at least itself.
pub fn check_find_by_example<T, D, F>(factory: &F, fixtures: &[T])
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
{
    let dao = seeded(factory, fixtures);
    for fixture in fixtures {
        let found = ok(dao.find_by_example(fixture), "find_by_example");
        assert!(
            found.contains(fixture),
            "find_by_example did not find {fixture:?}"
        );
    }
}

/// Runs every check against the adapter built by `factory`.
pub fn run_suite<T, D, F, M>(factory: F, fixtures: &[T], modify: M)
where
    T: Entity + PartialEq + Debug,
    D: Dao<T>,
    F: Fn() -> D,
    M: Fn(&mut T),
{
    assert!(fixtures.len() >= 2, "the conformance suite needs two fixtures");
    let first = &fixtures[0];

    check_save_then_find(&factory, first);
    check_save_duplicate(&factory, first);
    check_delete(&factory, first);
    check_update(&factory, first, &modify);
    check_transient_rejected(&factory, first);
    check_refresh(&factory, first, &modify);
    check_persistence_flags(&factory, first);
    check_invalid_windows(&factory);
    check_paging_concatenation(&factory, fixtures, 2);
    check_default_sort_fallback(&factory, fixtures);
    check_find_by_ids(&factory, fixtures);
    check_find_by_example(&factory, fixtures);
}
