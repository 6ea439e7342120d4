//! Attribute and class name constants
//!
//! Physical LDAP names used by the adapters, filters and entities.

/// Names of attributes present on (almost) every entry.
pub mod attr {
    pub const OBJECT_CLASS: &str = "objectClass";
    pub const OBJECT_CATEGORY: &str = "objectCategory";
    pub const DISTINGUISHED_NAME: &str = "distinguishedName";
    pub const CN: &str = "cn";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const OBJECT_GUID: &str = "objectGUID";
    pub const OBJECT_SID: &str = "objectSid";
    pub const WHEN_CREATED: &str = "whenCreated";
    pub const WHEN_CHANGED: &str = "whenChanged";
    pub const MEMBER_OF: &str = "memberOf";
    pub const MANAGED_BY: &str = "managedBy";
    pub const SAM_ACCOUNT_NAME: &str = "sAMAccountName";
    pub const MAIL: &str = "mail";
}

/// Computer attributes.
pub mod computer {
    pub const OPERATING_SYSTEM: &str = "operatingSystem";
    pub const OPERATING_SYSTEM_VERSION: &str = "operatingSystemVersion";
    pub const OPERATING_SYSTEM_SERVICE_PACK: &str = "operatingSystemServicePack";
    pub const DNS_HOST_NAME: &str = "dNSHostName";
    pub const SITE_NAME: &str = "msDS-SiteName";
}

/// User attributes.
pub mod user {
    pub const USER_PRINCIPAL_NAME: &str = "userPrincipalName";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const GIVEN_NAME: &str = "givenName";
    pub const SURNAME: &str = "sn";
    pub const DEPARTMENT: &str = "department";
    pub const TITLE: &str = "title";
    pub const TELEPHONE_NUMBER: &str = "telephoneNumber";
    pub const MANAGER: &str = "manager";
    pub const USER_ACCOUNT_CONTROL: &str = "userAccountControl";
}

/// Group attributes.
pub mod group {
    pub const MEMBER: &str = "member";
    pub const GROUP_TYPE: &str = "groupType";
}

/// Organizational unit attributes.
pub mod organizational_unit {
    pub const OU: &str = "ou";
    pub const STREET: &str = "street";
    pub const LOCALITY: &str = "l";
    pub const STATE_OR_PROVINCE: &str = "st";
    pub const COUNTRY_NAME: &str = "co";
    pub const COUNTRY_CODE: &str = "c";
}

/// Structural object class names.
pub mod class {
    pub const TOP: &str = "top";
    pub const PERSON: &str = "person";
    pub const ORGANIZATIONAL_PERSON: &str = "organizationalPerson";
    pub const USER: &str = "user";
    pub const COMPUTER: &str = "computer";
    pub const GROUP: &str = "group";
    pub const ORGANIZATIONAL_UNIT: &str = "organizationalUnit";
}

/// `objectCategory` helpers.
///
/// Active Directory stores the category as the DN of a schema object
/// (`CN=Person,CN=Schema,...`) but accepts the bare name in filters.
pub struct ObjectCategory;

impl ObjectCategory {
    pub const PERSON: &'static str = "person";

    /// The bare category name (`Person`) of a stored category value.
    pub fn short_name(value: &str) -> &str {
        let first = value.split(',').next().unwrap_or(value);
        match first.split_once('=') {
            Some((_, name)) => name,
            None => first,
        }
    }

    /// Check whether a stored category value denotes a person.
    pub fn is_person(value: &str) -> bool {
        Self::short_name(value).eq_ignore_ascii_case(Self::PERSON)
    }
}
