//! # Directory Object Core
//!
//! Store-independent building blocks for typed Active Directory objects.
//!
//! This crate knows nothing about concrete entity types. It provides the
//! pieces the object layer is assembled from and the contract a directory
//! store has to fulfil.
//!
//! ## Crate Organization
//!
//! - [`filter`] - Filter tree, LDAP rendering, parsing and local evaluation
//! - [`adapter`] - Raw attribute value to typed value conversions
//! - [`entry`] - Raw search rows (`RawEntry`, `AttributeValue`)
//! - [`sid`] - Security identifier codec
//! - [`dn`] - Distinguished name escaping and comparison
//! - [`schema`] - Attribute and object class names
//! - [`types`] - Object kinds and search scopes
//! - [`error`] - Error types with transient/permanent classification
//! - [`traits`] - The [`DirectoryConnection`](traits::DirectoryConnection) contract
//! - [`config`] - Configuration trait and shared settings
//! - [`memory`] - In-memory directory store
//!
//! ## Example
//!
//! ```
//! use adobjects_core::prelude::*;
//!
//! let filter = Filter::is_computer().and_with(Filter::eq("cn", "PC01"));
//! assert_eq!(filter.to_ldap().unwrap(), "(&(objectClass=computer)(cn=PC01))");
//! ```

pub mod adapter;
pub mod config;
pub mod dn;
pub mod entry;
pub mod error;
pub mod filter;
pub mod memory;
pub mod schema;
pub mod sid;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ConnectionSettings, DirectoryConfig, TlsConfig};
    pub use crate::entry::{AttributeValue, RawEntry};
    pub use crate::error::{DirectoryError, DirectoryResult};
    pub use crate::filter::Filter;
    pub use crate::memory::InMemoryDirectory;
    pub use crate::sid::Sid;
    pub use crate::traits::{DirectoryConnection, SharedConnection};
    pub use crate::types::{ObjectKind, SearchScope};
}

// Re-export async_trait for connection implementors
pub use async_trait::async_trait;
