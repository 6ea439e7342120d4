//! # Active Directory Objects
//!
//! Typed computers, users, groups and organizational units on top of any
//! [`DirectoryConnection`](adobjects_core::traits::DirectoryConnection).
//!
//! Objects are only ever produced by finders. Each one holds the row it was
//! found with and decodes attributes on first access. Writes are committed
//! one attribute at a time.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use adobjects::prelude::*;
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let directory = InMemoryDirectory::new("dc=example,dc=com").with_entry(
//!     RawEntry::new("cn=PC01,dc=example,dc=com")
//!         .with("objectClass", vec!["top", "computer"])
//!         .with("cn", "PC01")
//!         .with("operatingSystem", "Windows 11 Pro"),
//! );
//! let connection: SharedConnection = Arc::new(directory);
//!
//! let pc = ComputerObject::find_one_by_cn(&connection, "PC01")
//!     .await
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(pc.operating_system_name(), "Windows 11 Pro");
//! # }
//! ```

pub mod computer;
pub mod entity;
pub mod finder;
pub mod group;
pub mod group_type;
pub mod object;
pub mod organizational_unit;
pub mod user;
pub mod user_account_control;

pub use computer::ComputerObject;
pub use entity::{DirectoryEntity, EntryHandle};
pub use group::GroupObject;
pub use group_type::{GroupScope, GroupType};
pub use object::DirectoryObject;
pub use organizational_unit::OrganizationalUnitObject;
pub use user::UserObject;
pub use user_account_control::UserAccountControl;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::computer::ComputerObject;
    pub use crate::entity::DirectoryEntity;
    pub use crate::group::GroupObject;
    pub use crate::group_type::{GroupScope, GroupType};
    pub use crate::object::DirectoryObject;
    pub use crate::organizational_unit::OrganizationalUnitObject;
    pub use crate::user::UserObject;
    pub use crate::user_account_control::UserAccountControl;

    pub use adobjects_core::prelude::*;
}
