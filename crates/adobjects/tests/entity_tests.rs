//! Property caching, reference resolution and write-through tests.
//!
//! Covers:
//! - Decoded properties are computed once per object
//! - DN references resolve lazily and at most once
//! - Writes update the cached value and commit to the store
//! - Failed writes keep the cached value and report the store error

mod common;

use adobjects::prelude::*;
use common::*;

async fn srv01(connection: &SharedConnection) -> ComputerObject {
    ComputerObject::find_one_by_cn(connection, "SRV01")
        .await
        .unwrap()
        .unwrap()
}

async fn alice(connection: &SharedConnection) -> UserObject {
    UserObject::find_one_by_sam_account_name(connection, "asmith")
        .await
        .unwrap()
        .unwrap()
}

async fn stored_line(directory: &InMemoryDirectory, dn: &str, attribute: &str) -> Option<String> {
    directory
        .entry(dn)
        .await
        .and_then(|entry| entry.get(attribute).and_then(|v| v.first().map(String::from)))
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_properties_are_decoded_once() {
    let (_directory, connection) = connect();
    let srv = srv01(&connection).await;

    let first = srv.operating_system_name();
    let second = srv.operating_system_name();
    assert!(std::ptr::eq(first, second));

    let sid = srv.object_sid().unwrap();
    assert!(std::ptr::eq(sid, srv.object_sid().unwrap()));

    let groups = srv.member_of();
    assert!(std::ptr::eq(groups, srv.member_of()));
    assert_eq!(groups, [ADMINS_DN.to_string()]);
}

#[tokio::test]
async fn test_absent_and_typed_properties() {
    let (_directory, connection) = connect();
    let ws = ComputerObject::find_one_by_cn(&connection, "WS01")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ws.operating_system_name(), "Windows 11 Pro");
    assert_eq!(ws.operating_system_version(), "");
    assert_eq!(ws.managed_by(), "");
    assert!(ws.member_of().is_empty());
    assert!(ws.when_created().unwrap().is_none());

    let srv = srv01(&connection).await;
    let created = srv.when_created().unwrap().unwrap();
    assert_eq!(created.to_rfc3339(), "2024-01-15T10:30:00+00:00");
}

#[tokio::test]
async fn test_account_flags() {
    let (_directory, connection) = connect();

    let bob = UserObject::find_one_by_dn(&connection, BOB_DN)
        .await
        .unwrap()
        .unwrap();
    let flags = bob.user_account_control().unwrap();
    assert!(flags.password_never_expires());
    assert!(flags.is_active());

    let carol = UserObject::find_one_by_dn(&connection, CAROL_DN)
        .await
        .unwrap()
        .unwrap();
    assert!(carol.is_disabled().unwrap());
}

#[tokio::test]
async fn test_group_properties() {
    let (_directory, connection) = connect();
    let admins = GroupObject::find_one_by_cn(&connection, "Server Admins")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(admins.group_type().unwrap(), GroupType::Security);
    assert_eq!(admins.group_scope().unwrap(), GroupScope::Global);
    assert_eq!(admins.members(), [ALICE_DN.to_string(), SRV01_DN.to_string()]);
    assert_eq!(admins.object_sid().unwrap(), "S-1-5-21-1-2-3-1201");
}

// =============================================================================
// References
// =============================================================================

#[tokio::test]
async fn test_managed_by_resolves_once() {
    let (directory, connection) = connect();
    let srv = srv01(&connection).await;
    let before = directory.search_count();

    let first = srv.managed_by_object().await.unwrap().expect("manager exists");
    let second = srv.managed_by_object().await.unwrap().expect("manager exists");

    assert!(std::ptr::eq(first, second));
    assert_eq!(directory.search_count(), before + 1);

    let manager = first.as_user().expect("managed by a user");
    assert_eq!(manager.dn(), ALICE_DN);
    assert_eq!(manager.first_name(), "Alice");
}

#[tokio::test]
async fn test_empty_reference_does_not_search() {
    let (directory, connection) = connect();
    let ws = ComputerObject::find_one_by_cn(&connection, "WS01")
        .await
        .unwrap()
        .unwrap();
    let before = directory.search_count();

    assert!(ws.managed_by_object().await.unwrap().is_none());
    assert_eq!(directory.search_count(), before);
}

#[tokio::test]
async fn test_dangling_reference_is_none() {
    let (directory, connection) = connect();
    directory
        .insert(
            RawEntry::new("cn=Orphan,ou=Staff,dc=example,dc=com")
                .with("objectClass", vec!["top", "person", "user"])
                .with(
                    "objectCategory",
                    "CN=Person,CN=Schema,CN=Configuration,dc=example,dc=com",
                )
                .with("cn", "Orphan")
                .with("manager", "cn=Gone,ou=Staff,dc=example,dc=com"),
        )
        .await;

    let orphan = UserObject::find_one_by_cn(&connection, "Orphan")
        .await
        .unwrap()
        .unwrap();
    assert!(orphan.manager_object().await.unwrap().is_none());
}

#[tokio::test]
async fn test_chained_references() {
    let (_directory, connection) = connect();
    let alice = alice(&connection).await;

    let bob = alice.manager_object().await.unwrap().unwrap();
    let bob = bob.as_user().unwrap();
    assert_eq!(bob.sam_account_name(), "bjones");
    assert!(bob.manager_object().await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_managed_by_resets_reference() {
    let (directory, connection) = connect();
    let mut srv = srv01(&connection).await;

    let resolved = srv.managed_by_object().await.unwrap().unwrap().dn().to_string();
    assert_eq!(resolved, ALICE_DN);

    srv.set_managed_by(ADMINS_DN).await.unwrap();
    assert_eq!(srv.managed_by(), ADMINS_DN);

    let before = directory.search_count();
    let manager = srv.managed_by_object().await.unwrap().unwrap();
    assert_eq!(manager.dn(), ADMINS_DN);
    assert!(manager.as_group().is_some());
    assert_eq!(directory.search_count(), before + 1);
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_write_commits_and_caches() {
    let (directory, connection) = connect();
    let mut alice = alice(&connection).await;

    alice.set_title("Account Manager").await.unwrap();
    alice.set_description("Key accounts").await.unwrap();

    assert_eq!(alice.title(), "Account Manager");
    assert_eq!(alice.description(), "Key accounts");
    assert_eq!(
        stored_line(&directory, ALICE_DN, "title").await.as_deref(),
        Some("Account Manager")
    );

    let commits = directory.commits().await;
    let attributes: Vec<&str> = commits.iter().map(|c| c.attribute.as_str()).collect();
    assert_eq!(attributes, ["title", "description"]);
    assert!(commits.iter().all(|c| c.dn == ALICE_DN));
}

#[tokio::test]
async fn test_failed_write_keeps_cached_value() {
    let (directory, connection) = connect();
    let mut srv = srv01(&connection).await;
    directory.fail_writes_with("insufficient access rights").await;

    let err = srv.set_managed_by(BOB_DN).await.unwrap_err();
    assert_eq!(err.error_code(), "STORE_IO");

    assert_eq!(srv.managed_by(), BOB_DN);
    assert_eq!(
        stored_line(&directory, SRV01_DN, "managedBy").await.as_deref(),
        Some(ALICE_DN)
    );
    assert!(directory.commits().await.is_empty());
}

#[tokio::test]
async fn test_empty_write_clears_attribute() {
    let (directory, connection) = connect();
    let mut admins = GroupObject::find_one_by_cn(&connection, "Server Admins")
        .await
        .unwrap()
        .unwrap();

    admins.set_members(Vec::new()).await.unwrap();

    assert!(admins.members().is_empty());
    let stored = directory.entry(ADMINS_DN).await.unwrap();
    assert!(!stored.has("member"));
}

#[tokio::test]
async fn test_disable_keeps_other_flags() {
    let (directory, connection) = connect();
    let mut bob = UserObject::find_one_by_dn(&connection, BOB_DN)
        .await
        .unwrap()
        .unwrap();

    bob.set_disabled(true).await.unwrap();

    assert!(bob.is_disabled().unwrap());
    assert!(bob.user_account_control().unwrap().password_never_expires());
    assert_eq!(
        stored_line(&directory, BOB_DN, "userAccountControl").await.as_deref(),
        Some("66050")
    );

    bob.set_disabled(false).await.unwrap();
    assert_eq!(
        stored_line(&directory, BOB_DN, "userAccountControl").await.as_deref(),
        Some("66048")
    );
}

#[tokio::test]
async fn test_refind_sees_committed_values() {
    let (_directory, connection) = connect();
    let mut corp = OrganizationalUnitObject::find_one_by_dn(&connection, CORP_DN)
        .await
        .unwrap()
        .unwrap();

    corp.set_city("Paris").await.unwrap();
    corp.set_c("FR").await.unwrap();

    let again = OrganizationalUnitObject::find_one_by_ou(&connection, "Corp")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.city(), "Paris");
    assert_eq!(again.c(), "FR");
    assert!(again.when_changed().unwrap().is_some());
}
