//! Object creation below organizational units.
//!
//! Covers:
//! - Creating units, users and groups returns fully materialized objects
//! - Created objects are found by the regular finders
//! - Names that need DN escaping
//! - Duplicate names, empty names and store failures

mod common;

use adobjects::prelude::*;
use common::*;

async fn corp(connection: &SharedConnection) -> OrganizationalUnitObject {
    OrganizationalUnitObject::find_one_by_dn(connection, CORP_DN)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_create_organizational_unit() {
    let (_directory, connection) = connect();
    let corp = corp(&connection).await;

    let sales = corp.add_organizational_unit("Sales").await.unwrap();
    assert_eq!(sales.dn(), "ou=Sales,ou=Corp,dc=example,dc=com");
    assert_eq!(sales.ou(), "Sales");
    assert_eq!(sales.name(), "Sales");
    assert_eq!(sales.object_guid().unwrap().len(), 36);
    assert!(sales.when_created().unwrap().is_some());

    let found = OrganizationalUnitObject::find_one_by_ou(&connection, "Sales")
        .await
        .unwrap()
        .expect("created unit is searchable");
    assert_eq!(found.dn(), sales.dn());
    assert_eq!(found.ou(), "Sales");
}

#[tokio::test]
async fn test_nested_creation() {
    let (_directory, connection) = connect();
    let corp = corp(&connection).await;

    let emea = corp.add_organizational_unit("EMEA").await.unwrap();
    let france = emea.add_organizational_unit("France").await.unwrap();
    assert_eq!(france.dn(), "ou=France,ou=EMEA,ou=Corp,dc=example,dc=com");

    let units = OrganizationalUnitObject::find_all(&connection).await.unwrap();
    assert!(units.iter().any(|u| u.dn() == france.dn()));
}

#[tokio::test]
async fn test_same_name_in_two_parents() {
    let (_directory, connection) = connect();
    let corp = corp(&connection).await;
    let staff = OrganizationalUnitObject::find_one_by_ou(&connection, "Staff")
        .await
        .unwrap()
        .unwrap();

    let first = corp.add_organizational_unit("Sales").await.unwrap();
    let second = staff.add_organizational_unit("Sales").await.unwrap();
    assert_ne!(first.dn(), second.dn());

    let err = OrganizationalUnitObject::find_one_by_ou(&connection, "Sales")
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::AmbiguousResult { count: 2, .. }));
}

#[tokio::test]
async fn test_create_user() {
    let (_directory, connection) = connect();
    let corp = corp(&connection).await;

    let dana = corp.add_user("Dana Scully").await.unwrap();
    assert_eq!(dana.dn(), "cn=Dana Scully,ou=Corp,dc=example,dc=com");
    assert_eq!(dana.cn(), "Dana Scully");
    assert_eq!(dana.sam_account_name(), "Dana Scully");
    assert!(dana
        .object_sid()
        .unwrap()
        .starts_with("S-1-5-21-1004336348-1177238915-682003330-"));
    assert!(dana.object_classes().iter().any(|c| c == "user"));

    let found = UserObject::find_one_by_sid(&connection, dana.object_sid().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.dn(), dana.dn());

    // A created user is never mistaken for a computer.
    let computer = ComputerObject::find_one_by_cn(&connection, "Dana Scully")
        .await
        .unwrap();
    assert!(computer.is_none());
}

#[tokio::test]
async fn test_create_group_and_add_member() {
    let (directory, connection) = connect();
    let corp = corp(&connection).await;

    let mut auditors = corp.add_group("Auditors").await.unwrap();
    assert_eq!(auditors.dn(), "cn=Auditors,ou=Corp,dc=example,dc=com");
    assert!(auditors.members().is_empty());

    auditors.set_members(vec![ALICE_DN.to_string()]).await.unwrap();

    let stored = directory.entry(auditors.dn()).await.unwrap();
    let members = stored.get("member").map(|v| v.as_strings()).unwrap_or_default();
    assert_eq!(members, [ALICE_DN]);

    let groups = GroupObject::find_all(&connection).await.unwrap();
    assert_eq!(groups.len(), 2);
}

#[tokio::test]
async fn test_create_name_with_special_characters() {
    let (_directory, connection) = connect();
    let corp = corp(&connection).await;

    let doe = corp.add_user("Doe, John").await.unwrap();
    assert_eq!(doe.dn(), "cn=Doe\\, John,ou=Corp,dc=example,dc=com");
    assert_eq!(doe.cn(), "Doe, John");

    let again = UserObject::find_one_by_dn(&connection, doe.dn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.cn(), "Doe, John");
}

#[tokio::test]
async fn test_create_duplicate_fails() {
    let (_directory, connection) = connect();
    let corp = corp(&connection).await;

    corp.add_group("Auditors").await.unwrap();
    let err = corp.add_group("Auditors").await.unwrap_err();
    assert_eq!(err.error_code(), "OBJECT_EXISTS");
}

#[tokio::test]
async fn test_create_empty_name_fails() {
    let (directory, connection) = connect();
    let corp = corp(&connection).await;
    let before = directory.search_count();

    let err = corp.add_organizational_unit("").await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATA");
    assert_eq!(directory.search_count(), before);
}

#[tokio::test]
async fn test_create_store_failure() {
    let (directory, connection) = connect();
    let corp = corp(&connection).await;
    directory.fail_writes_with("read-only replica").await;

    let err = corp.add_user("Fox Mulder").await.unwrap_err();
    assert_eq!(err.error_code(), "STORE_IO");
    assert!(UserObject::find_one_by_cn(&connection, "Fox Mulder")
        .await
        .unwrap()
        .is_none());
}
