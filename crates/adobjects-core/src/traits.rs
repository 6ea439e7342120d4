//! Directory connection contract
//!
//! The seam between the typed object layer and the store. Implementations own
//! session lifecycle, timeouts and transport; the object layer only ever
//! borrows a shared handle.

use async_trait::async_trait;
use std::sync::Arc;

use crate::entry::{AttributeValue, RawEntry};
use crate::error::DirectoryResult;
use crate::types::SearchScope;

/// A connection to a hierarchical directory store.
#[async_trait]
pub trait DirectoryConnection: Send + Sync {
    /// Default search base for this connection (e.g. `dc=example,dc=com`).
    fn base_dn(&self) -> &str;

    /// Run a search and return every matching row.
    ///
    /// Rows are fully copied out of the session before this returns, in the
    /// order the store produced them. A base DN that does not exist yields an
    /// empty result rather than an error.
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
    ) -> DirectoryResult<Vec<RawEntry>>;

    /// Replace all values of one attribute of one entry.
    ///
    /// A null or empty value removes the attribute.
    async fn commit_attribute(
        &self,
        dn: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> DirectoryResult<()>;

    /// Create an entry named `rdn` below `parent_dn` and return its DN.
    ///
    /// `rdn` must already be escaped (see [`crate::dn::rdn`]).
    async fn create_child(
        &self,
        parent_dn: &str,
        rdn: &str,
        object_classes: &[&str],
    ) -> DirectoryResult<String>;
}

/// Shared handle to a connection, as held by materialized objects.
pub type SharedConnection = Arc<dyn DirectoryConnection>;
