//! Integration tests for `InMemoryDao` through the public DAO contracts.

mod common;

use common::{customers, empty_dao, ids, seeded_dao, Customer};
use machina_core::{
    DaoError, ExampleMatcher, PageRequest, ReadableDao, SortCriterion, StringMatch, WriteableDao,
};

// =============================================================================
// Basic life cycle
// =============================================================================

#[test]
fn test_save_update_delete_life_cycle() {
    let dao = empty_dao();

    let mut customer = Customer::named("a");
    dao.save(&mut customer).unwrap();
    assert_eq!(customer.id, Some(1));

    customer.name = "b".to_string();
    dao.update(&customer).unwrap();
    assert_eq!(dao.find_by_id(&1).unwrap().unwrap().name, "b");

    dao.delete(&customer).unwrap();
    assert_eq!(dao.find_by_id(&1).unwrap(), None);
}

#[test]
fn test_count_all() {
    assert_eq!(empty_dao().count_all().unwrap(), 0);
    assert_eq!(seeded_dao().count_all().unwrap(), 5);
}

#[test]
fn test_find_by_id_absent_is_not_an_error() {
    let dao = seeded_dao();
    assert!(dao.find_by_id(&42).unwrap().is_none());
}

#[test]
fn test_update_of_deleted_instance_fails() {
    let dao = seeded_dao();
    let carol = dao.find_by_id(&3).unwrap().unwrap();
    dao.delete_by_id(&3).unwrap();

    let err = dao.update(&carol).unwrap_err();
    assert!(matches!(err, DaoError::NotPersistent { .. }));
    assert_eq!(dao.count_all().unwrap(), 4);
}

#[test]
fn test_update_returns_stored_state() {
    let dao = seeded_dao();
    let mut eve = dao.find_by_id(&4).unwrap().unwrap();
    eve.age = Some(36);

    let managed = dao.update(&eve).unwrap();
    assert_eq!(managed, eve);
    assert!(dao.is_managed(&managed));
}

// =============================================================================
// Ordering and paging
// =============================================================================

#[test]
fn test_find_all_follows_default_sort() {
    let dao = seeded_dao();
    assert_eq!(ids(&dao.find_all().unwrap()), vec![2, 3, 5, 4, 1]);
}

#[test]
fn test_find_all_paged_with_explicit_criteria() {
    let dao = seeded_dao();
    let criteria = [
        SortCriterion::desc("age"),
        SortCriterion::asc("name"),
    ];

    let first = dao.find_all_paged(0, 2, &criteria).unwrap();
    assert_eq!(ids(&first), vec![3, 4]);

    let rest = dao.find_all_paged(2, 10, &criteria).unwrap();
    // alice and Dave share an age; Bob has none and sorts last descending.
    assert_eq!(ids(&rest), vec![5, 1, 2]);
}

#[test]
fn test_find_all_paged_nested_property() {
    let dao = seeded_dao();
    let by_city = dao
        .find_all_paged(0, 10, &["address.city asc".parse().unwrap()])
        .unwrap();
    assert_eq!(ids(&by_city), vec![5, 1, 3, 4, 2]);
}

#[test]
fn test_find_all_paged_past_the_end_is_empty() {
    let dao = seeded_dao();
    assert!(dao.find_all_paged(5, 3, &[]).unwrap().is_empty());
    assert!(dao.find_all_paged(i64::MAX, 3, &[]).unwrap().is_empty());
}

#[test]
fn test_find_all_paged_invalid_window() {
    let dao = seeded_dao();
    let err = dao.find_all_paged(-1, 10, &[]).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    let err = dao.find_all_paged(0, 0, &[]).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");
}

#[test]
fn test_find_all_paged_absent_property_sorts_as_null() {
    let dao = seeded_dao();
    let found = dao
        .find_all_paged(0, 10, &[SortCriterion::asc("shoe_size")])
        .unwrap();
    assert_eq!(ids(&found), vec![1, 2, 3, 4, 5]);

    let found = dao
        .find_all_paged(0, 10, &[SortCriterion::desc("address.zip"), SortCriterion::asc("name")])
        .unwrap();
    assert_eq!(ids(&found), vec![2, 3, 5, 4, 1]);
}

#[test]
fn test_find_all_paged_malformed_property() {
    let dao = seeded_dao();
    let err = dao
        .find_all_paged(0, 10, &[SortCriterion::asc("name.first")])
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");
}

#[test]
fn test_find_page() {
    let dao = seeded_dao();
    let page = dao.find_page(PageRequest::new(2, 2), &[]).unwrap();
    assert_eq!(ids(&page.content), vec![1]);
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.total_pages(), 3);
    assert!(!page.has_next());
    assert!(page.has_previous());
}

// =============================================================================
// Query by example
// =============================================================================

#[test]
fn test_find_by_example_exact() {
    let dao = seeded_dao();
    let found = dao.find_by_example(&Customer::named("Bob")).unwrap();
    assert_eq!(ids(&found), vec![2]);
}

#[test]
fn test_find_by_example_ignores_key() {
    let dao = seeded_dao();
    let found = dao
        .find_by_example(&Customer::named("Eve").with_id(999))
        .unwrap();
    assert_eq!(ids(&found), vec![4]);
}

#[test]
fn test_find_by_example_with_matcher() {
    let dao = seeded_dao();
    let matcher = ExampleMatcher::new()
        .ignore_case()
        .with_string_match(StringMatch::Anywhere);

    let berliners = dao
        .find_by_example_with(&Customer::named("").living_in("BERLIN"), &matcher)
        .unwrap();
    assert_eq!(ids(&berliners), vec![2, 1]);

    let same_age = dao
        .find_by_example_with(&Customer::named("").with_age(29), &matcher)
        .unwrap();
    assert_eq!(ids(&same_age), vec![5, 1]);
}

#[test]
fn test_find_by_example_ignored_property() {
    let dao = seeded_dao();
    let matcher = ExampleMatcher::new().ignore_property("name");
    let found = dao
        .find_by_example_with(&Customer::named("nobody").with_email("eve@example.org"), &matcher)
        .unwrap();
    assert_eq!(ids(&found), vec![4]);
}

// =============================================================================
// Bulk lookups and persistence context
// =============================================================================

#[test]
fn test_find_by_ids() {
    let dao = seeded_dao();
    let found = dao.find_by_ids(&[4, 8, 2]).unwrap();
    assert_eq!(ids(&found), vec![4, 2]);
}

#[test]
fn test_evict_keeps_row() {
    let dao = seeded_dao();
    let bob = dao.find_by_id(&2).unwrap().unwrap();
    assert!(dao.is_managed(&bob));

    dao.evict(&bob).unwrap();
    assert!(!dao.is_managed(&bob));
    assert!(dao.is_persistent(&bob).unwrap());

    // Evicting an unmanaged or transient instance is a no-op.
    dao.evict(&bob).unwrap();
    dao.evict(&Customer::named("draft")).unwrap();
}

#[test]
fn test_merge_then_refresh() {
    let dao = seeded_dao();
    let detached = customers().remove(0).with_age(42);

    let merged = dao.merge(detached).unwrap();
    assert_eq!(merged.age, Some(42));

    let mut local = merged.clone();
    local.name = "Caroline".to_string();
    dao.refresh(&mut local).unwrap();
    assert_eq!(local, merged);
}

#[test]
fn test_save_generated_keys_skip_seeded_rows() {
    let dao = seeded_dao();
    let mut frank = Customer::named("Frank");
    dao.save(&mut frank).unwrap();
    assert_eq!(frank.id, Some(100));
    assert!(dao.is_persistent(&frank).unwrap());
}
