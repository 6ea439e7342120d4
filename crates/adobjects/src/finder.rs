//! Finders
//!
//! Search operations written once over [`DirectoryEntity`]. Each call renders
//! the kind predicate combined with the caller's filter, runs exactly one
//! search, and materializes every returned row.
//!
//! Single-result finders return `Ok(None)` when nothing matches and
//! [`DirectoryError::AmbiguousResult`] when more than one entry matches.

use adobjects_core::entry::RawEntry;
use adobjects_core::error::{DirectoryError, DirectoryResult};
use adobjects_core::filter::Filter;
use adobjects_core::schema::attr;
use adobjects_core::sid::Sid;
use adobjects_core::traits::SharedConnection;
use adobjects_core::types::SearchScope;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::entity::sealed::Materialize;
use crate::entity::{DirectoryEntity, EntryHandle};
use crate::object::DirectoryObject;

/// Find the single entry of kind `E` matching `filter` below the connection's
/// base DN.
#[instrument(skip(connection), fields(kind = %E::KIND))]
pub async fn find_one<E: DirectoryEntity>(
    connection: &SharedConnection,
    filter: Filter,
) -> DirectoryResult<Option<E>> {
    let rendered = E::kind_filter().and_with(filter).to_ldap()?;
    let rows = connection
        .search(connection.base_dn(), SearchScope::Subtree, &rendered)
        .await?;
    single(rendered, rows).map(|row| row.map(|r| materialize(connection, r)))
}

/// Find the entry of kind `E` at `dn`.
///
/// An entry of another kind at that DN is reported as `None`.
#[instrument(skip(connection), fields(kind = %E::KIND))]
pub async fn find_one_by_dn<E: DirectoryEntity>(
    connection: &SharedConnection,
    dn: &str,
) -> DirectoryResult<Option<E>> {
    if dn.is_empty() {
        return Ok(None);
    }
    let rendered = E::kind_filter().to_ldap()?;
    let rows = connection.search(dn, SearchScope::Base, &rendered).await?;
    single(rendered, rows).map(|row| row.map(|r| materialize(connection, r)))
}

/// Find the entry of kind `E` with the given SID (`S-1-5-21-...`).
///
/// The SID text is validated and normalized before it is searched for.
pub async fn find_one_by_sid<E: DirectoryEntity>(
    connection: &SharedConnection,
    sid: &str,
) -> DirectoryResult<Option<E>> {
    let sid: Sid = sid.parse()?;
    find_one(connection, Filter::eq(attr::OBJECT_SID, sid.to_string())).await
}

/// Every entry of kind `E` below the connection's base DN, in store order.
#[instrument(skip(connection), fields(kind = %E::KIND))]
pub async fn find_all<E: DirectoryEntity>(
    connection: &SharedConnection,
) -> DirectoryResult<Vec<E>> {
    let rendered = E::kind_filter().to_ldap()?;
    search_all(connection, &rendered).await
}

/// Every entry of kind `E` matching `filter`, in store order.
#[instrument(skip(connection), fields(kind = %E::KIND))]
pub async fn find_all_by_filter<E: DirectoryEntity>(
    connection: &SharedConnection,
    filter: Filter,
) -> DirectoryResult<Vec<E>> {
    let rendered = E::kind_filter().and_with(filter).to_ldap()?;
    search_all(connection, &rendered).await
}

/// The entry at `dn`, whatever its kind.
#[instrument(skip(connection))]
pub async fn find_object_by_dn(
    connection: &SharedConnection,
    dn: &str,
) -> DirectoryResult<Option<DirectoryObject>> {
    if dn.is_empty() {
        return Ok(None);
    }
    let rendered = Filter::present(attr::OBJECT_CLASS).to_ldap()?;
    let rows = connection.search(dn, SearchScope::Base, &rendered).await?;
    single(rendered, rows).map(|row| {
        row.map(|r| DirectoryObject::from_handle(EntryHandle::new(Arc::clone(connection), r)))
    })
}

async fn search_all<E: DirectoryEntity>(
    connection: &SharedConnection,
    rendered: &str,
) -> DirectoryResult<Vec<E>> {
    let rows = connection
        .search(connection.base_dn(), SearchScope::Subtree, rendered)
        .await?;
    debug!(filter = %rendered, count = rows.len(), "Materializing search results");
    Ok(rows
        .into_iter()
        .map(|row| materialize(connection, row))
        .collect())
}

fn single(filter: String, mut rows: Vec<RawEntry>) -> DirectoryResult<Option<RawEntry>> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        count => {
            warn!(filter = %filter, count, "Single-result search matched several entries");
            Err(DirectoryError::AmbiguousResult { filter, count })
        }
    }
}

fn materialize<E: DirectoryEntity>(connection: &SharedConnection, row: RawEntry) -> E {
    E::materialize(EntryHandle::new(Arc::clone(connection), row))
}
