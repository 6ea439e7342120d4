//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use adobjects::prelude::*;
use tracing_subscriber::EnvFilter;

pub const BASE: &str = "dc=example,dc=com";

pub const ALICE_DN: &str = "cn=Alice Smith,ou=Staff,dc=example,dc=com";
pub const BOB_DN: &str = "cn=Bob Jones,ou=Staff,dc=example,dc=com";
pub const CAROL_DN: &str = "cn=Carol White,ou=Staff,dc=example,dc=com";
pub const SRV01_DN: &str = "cn=SRV01,ou=Servers,dc=example,dc=com";
pub const WS01_DN: &str = "cn=WS01,ou=Workstations,dc=example,dc=com";
pub const ADMINS_DN: &str = "cn=Server Admins,ou=Groups,dc=example,dc=com";
pub const CORP_DN: &str = "ou=Corp,dc=example,dc=com";
pub const VENDOR_DN: &str = "cn=Vendor Support,ou=Contacts,dc=example,dc=com";

pub const SRV01_SID: &str = "S-1-5-21-1-2-3-1001";

static INIT: Once = Once::new();

/// Install a test subscriber once, only when `RUST_LOG` is set.
pub fn init_tracing() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

fn category(name: &str) -> String {
    format!("CN={name},CN=Schema,CN=Configuration,{BASE}")
}

fn sid_bytes(rid: u32) -> Vec<u8> {
    Sid::new(5, vec![21, 1, 2, 3, rid])
        .map(|sid| sid.to_bytes())
        .unwrap_or_default()
}

fn organizational_unit(dn: &str, name: &str) -> RawEntry {
    RawEntry::new(dn)
        .with("objectClass", vec!["top", "organizationalUnit"])
        .with("objectCategory", category("Organizational-Unit"))
        .with("ou", name)
        .with("name", name)
}

fn person(dn: &str, cn: &str, sam: &str, rid: u32) -> RawEntry {
    RawEntry::new(dn)
        .with("objectClass", vec!["top", "person", "organizationalPerson", "user"])
        .with("objectCategory", category("Person"))
        .with("cn", cn)
        .with("name", cn)
        .with("sAMAccountName", sam)
        .with("userPrincipalName", format!("{sam}@example.com"))
        .with("objectSid", AttributeValue::binary(sid_bytes(rid)))
}

fn computer(dn: &str, cn: &str, rid: u32) -> RawEntry {
    RawEntry::new(dn)
        .with(
            "objectClass",
            vec!["top", "person", "organizationalPerson", "user", "computer"],
        )
        .with("objectCategory", category("Computer"))
        .with("cn", cn)
        .with("name", cn)
        .with("sAMAccountName", format!("{cn}$"))
        .with("objectSid", AttributeValue::binary(sid_bytes(rid)))
}

/// A small domain: two servers and workstations, three people, one group,
/// one contact and a few organizational units.
pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new(BASE)
        .with_entry(organizational_unit("ou=Servers,dc=example,dc=com", "Servers"))
        .with_entry(organizational_unit("ou=Workstations,dc=example,dc=com", "Workstations"))
        .with_entry(organizational_unit("ou=Staff,dc=example,dc=com", "Staff"))
        .with_entry(organizational_unit("ou=Groups,dc=example,dc=com", "Groups"))
        .with_entry(organizational_unit("ou=Contacts,dc=example,dc=com", "Contacts"))
        .with_entry(
            organizational_unit(CORP_DN, "Corp")
                .with("l", "Lyon")
                .with("managedBy", BOB_DN),
        )
        .with_entry(
            computer(SRV01_DN, "SRV01", 1001)
                .with("operatingSystem", vec!["Windows Server 2019"])
                .with("operatingSystemVersion", "10.0 (17763)")
                .with("dNSHostName", "srv01.example.com")
                .with("managedBy", ALICE_DN)
                .with("memberOf", vec![ADMINS_DN])
                .with("whenCreated", "20240115103000.0Z"),
        )
        .with_entry(
            computer(WS01_DN, "WS01", 1002).with("operatingSystem", "Windows 11 Pro"),
        )
        .with_entry(
            person(ALICE_DN, "Alice Smith", "asmith", 1101)
                .with("givenName", "Alice")
                .with("sn", "Smith")
                .with("department", "Sales")
                .with("manager", BOB_DN)
                .with("userAccountControl", "512"),
        )
        .with_entry(
            person(BOB_DN, "Bob Jones", "bjones", 1102)
                .with("department", "Engineering")
                .with("userAccountControl", "66048"),
        )
        .with_entry(
            person(CAROL_DN, "Carol White", "cwhite", 1103)
                .with("department", "Sales")
                .with("userAccountControl", "514"),
        )
        .with_entry(
            RawEntry::new(ADMINS_DN)
                .with("objectClass", vec!["top", "group"])
                .with("objectCategory", category("Group"))
                .with("cn", "Server Admins")
                .with("sAMAccountName", "Server Admins")
                .with("groupType", "-2147483646")
                .with("member", vec![ALICE_DN, SRV01_DN])
                .with("objectSid", AttributeValue::binary(sid_bytes(1201))),
        )
        .with_entry(
            RawEntry::new(VENDOR_DN)
                .with("objectClass", vec!["top", "person", "organizationalPerson", "contact"])
                .with("objectCategory", category("Person"))
                .with("cn", "Vendor Support"),
        )
}

/// The fixture directory and a shared connection to it.
pub fn connect() -> (Arc<InMemoryDirectory>, SharedConnection) {
    init_tracing();
    let directory = Arc::new(directory());
    let connection: SharedConnection = directory.clone();
    (directory, connection)
}

/// A computer with the given name in another OU, to provoke ambiguity.
pub fn duplicate_computer(ou: &str, cn: &str, rid: u32) -> RawEntry {
    computer(&format!("cn={cn},ou={ou},{BASE}"), cn, rid)
}
