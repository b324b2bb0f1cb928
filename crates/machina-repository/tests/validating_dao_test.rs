//! Integration tests for the validating decorator.

mod common;

use common::{empty_dao, Customer};
use machina_core::{DaoError, ReadableDao, WriteableDao};
use machina_repository::ValidatingDao;

#[test]
fn test_save_rejects_invalid_email() {
    let dao = ValidatingDao::new(empty_dao());
    let mut customer = Customer::named("Gina").with_email("not-an-email");

    let err = dao.save(&mut customer).unwrap_err();
    match err {
        DaoError::Validation(message) => assert!(message.starts_with("email:")),
        other => panic!("unexpected error: {other:?}"),
    }
    // No key is assigned to a rejected entity.
    assert_eq!(customer.id, None);
    assert_eq!(dao.count_all().unwrap(), 0);
}

#[test]
fn test_nested_rules_are_checked() {
    let dao = ValidatingDao::new(empty_dao());
    let mut customer = Customer::named("Hank").living_in("");
    assert!(dao.save(&mut customer).is_err());
}

#[test]
fn test_update_rejects_invalid_state() {
    let dao = ValidatingDao::new(empty_dao());
    let mut customer = Customer::named("Ivy").with_age(30);
    dao.save(&mut customer).unwrap();

    customer.age = Some(200);
    let err = dao.update(&customer).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(dao.find_by_id(&1).unwrap().unwrap().age, Some(30));
}

#[test]
fn test_deletes_are_not_validated() {
    let dao = ValidatingDao::new(empty_dao());
    let mut customer = Customer::named("Jo");
    dao.save(&mut customer).unwrap();

    customer.name.clear();
    dao.delete(&customer).unwrap();
    assert_eq!(dao.into_inner().count_all().unwrap(), 0);
}
