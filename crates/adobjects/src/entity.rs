//! Entity materialization
//!
//! Every typed object wraps an [`EntryHandle`]: the raw row it was found with,
//! a shared handle to the connection, and memo cells for the attributes every
//! kind carries. Typed properties run their adapter once and cache the result
//! for the lifetime of the object.
//!
//! Writes go through `&mut self`. The cached value is replaced before the
//! store is asked to commit, and it is not restored if the commit fails.

use adobjects_core::adapter;
use adobjects_core::entry::{AttributeValue, RawEntry};
use adobjects_core::error::DirectoryResult;
use adobjects_core::filter::Filter;
use adobjects_core::schema::attr;
use adobjects_core::traits::SharedConnection;
use adobjects_core::types::ObjectKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::finder;
use crate::object::DirectoryObject;

/// Memo cell for a resolved reference. `None` means the reference is empty or
/// points at nothing.
pub(crate) type ReferenceCell = OnceCell<Option<Box<DirectoryObject>>>;

/// Raw row, connection handle and common attribute cache of one entry.
pub struct EntryHandle {
    connection: SharedConnection,
    entry: RawEntry,
    object_classes: OnceLock<Vec<String>>,
    cn: OnceLock<String>,
    name: OnceLock<String>,
    description: OnceLock<String>,
    object_guid: OnceLock<String>,
    when_created: OnceLock<Option<DateTime<Utc>>>,
    when_changed: OnceLock<Option<DateTime<Utc>>>,
}

impl EntryHandle {
    pub(crate) fn new(connection: SharedConnection, entry: RawEntry) -> Self {
        Self {
            connection,
            entry,
            object_classes: OnceLock::new(),
            cn: OnceLock::new(),
            name: OnceLock::new(),
            description: OnceLock::new(),
            object_guid: OnceLock::new(),
            when_created: OnceLock::new(),
            when_changed: OnceLock::new(),
        }
    }

    /// Distinguished name. Never changes after construction.
    pub fn dn(&self) -> &str {
        self.entry.dn()
    }

    /// The row this object was materialized from.
    pub fn raw(&self) -> &RawEntry {
        &self.entry
    }

    /// Connection the object was found through.
    pub fn connection(&self) -> &SharedConnection {
        &self.connection
    }

    pub fn object_classes(&self) -> &[String] {
        self.lines(&self.object_classes, attr::OBJECT_CLASS)
    }

    pub fn cn(&self) -> &str {
        self.line(&self.cn, attr::CN)
    }

    pub fn name(&self) -> &str {
        self.line(&self.name, attr::NAME)
    }

    pub fn description(&self) -> &str {
        self.line(&self.description, attr::DESCRIPTION)
    }

    /// `objectGUID` in hyphenated form, or `""` when absent.
    pub fn object_guid(&self) -> DirectoryResult<&str> {
        try_cached(&self.object_guid, || {
            adapter::guid(attr::OBJECT_GUID, self.entry.get(attr::OBJECT_GUID))
        })
        .map(String::as_str)
    }

    pub fn when_created(&self) -> DirectoryResult<Option<DateTime<Utc>>> {
        self.timestamp(&self.when_created, attr::WHEN_CREATED)
    }

    pub fn when_changed(&self) -> DirectoryResult<Option<DateTime<Utc>>> {
        self.timestamp(&self.when_changed, attr::WHEN_CHANGED)
    }

    pub async fn set_description(&mut self, description: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.description, description.to_string());
        self.commit(attr::DESCRIPTION, value).await
    }

    /// Single-valued text attribute through `cell`.
    pub(crate) fn line<'a>(&'a self, cell: &'a OnceLock<String>, attribute: &str) -> &'a str {
        cell.get_or_init(|| adapter::single_line(self.entry.get(attribute)))
    }

    /// Multi-valued text attribute through `cell`.
    pub(crate) fn lines<'a>(
        &'a self,
        cell: &'a OnceLock<Vec<String>>,
        attribute: &str,
    ) -> &'a [String] {
        cell.get_or_init(|| adapter::multiple_lines(self.entry.get(attribute)))
    }

    /// SID attribute through `cell`.
    pub(crate) fn sid<'a>(
        &'a self,
        cell: &'a OnceLock<String>,
        attribute: &str,
    ) -> DirectoryResult<&'a str> {
        try_cached(cell, || adapter::sid(attribute, self.entry.get(attribute))).map(String::as_str)
    }

    /// Integer attribute through `cell`.
    pub(crate) fn integer(
        &self,
        cell: &OnceLock<Option<i64>>,
        attribute: &str,
    ) -> DirectoryResult<Option<i64>> {
        try_cached(cell, || adapter::integer(attribute, self.entry.get(attribute))).copied()
    }

    fn timestamp(
        &self,
        cell: &OnceLock<Option<DateTime<Utc>>>,
        attribute: &str,
    ) -> DirectoryResult<Option<DateTime<Utc>>> {
        try_cached(cell, || {
            adapter::generalized_time(attribute, self.entry.get(attribute))
        })
        .copied()
    }

    /// Commit one attribute of this entry to the store.
    pub(crate) async fn commit(&self, attribute: &str, value: AttributeValue) -> DirectoryResult<()> {
        debug!(dn = %self.dn(), attribute = %attribute, "Committing attribute");

        let result = self
            .connection
            .commit_attribute(self.dn(), attribute, &value)
            .await;
        if let Err(e) = &result {
            warn!(dn = %self.dn(), attribute = %attribute, error = %e, "Attribute commit failed");
        }
        result
    }
}

impl fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHandle")
            .field("dn", &self.dn())
            .field("entry", &self.entry)
            .finish()
    }
}

/// Run a fallible adapter at most once per successful result. Failures are
/// not cached.
fn try_cached<T>(
    cell: &OnceLock<T>,
    compute: impl FnOnce() -> DirectoryResult<T>,
) -> DirectoryResult<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

/// Replace a text cell with a written value and return the value to commit.
pub(crate) fn cache_line(cell: &mut OnceLock<String>, value: String) -> AttributeValue {
    *cell = OnceLock::from(value.clone());
    AttributeValue::from(value)
}

/// Replace a list cell with a written value and return the value to commit.
pub(crate) fn cache_lines(cell: &mut OnceLock<Vec<String>>, values: Vec<String>) -> AttributeValue {
    *cell = OnceLock::from(values.clone());
    AttributeValue::Array(values)
}

/// Resolve a DN reference into an object, at most once per successful lookup.
pub(crate) async fn resolve_reference<'a>(
    connection: &SharedConnection,
    cell: &'a ReferenceCell,
    dn: &str,
) -> DirectoryResult<Option<&'a DirectoryObject>> {
    let resolved = cell
        .get_or_try_init(|| async {
            if dn.is_empty() {
                return Ok(None);
            }
            let found = finder::find_object_by_dn(connection, dn).await?;
            if found.is_none() {
                debug!(dn = %dn, "Referenced object does not exist");
            }
            Ok(found.map(Box::new))
        })
        .await?;
    Ok(resolved.as_deref())
}

pub(crate) mod sealed {
    use super::EntryHandle;

    /// Wraps a handle into a typed object. Only this crate can implement it,
    /// so objects only come out of finders.
    pub trait Materialize {
        fn materialize(handle: EntryHandle) -> Self;
    }
}

/// Behaviour shared by every typed directory object.
#[async_trait]
pub trait DirectoryEntity: sealed::Materialize + fmt::Debug + Send + Sync {
    /// The kind of entry this type models.
    const KIND: ObjectKind;

    fn handle(&self) -> &EntryHandle;

    fn handle_mut(&mut self) -> &mut EntryHandle;

    /// Structural predicate selecting entries of this kind.
    fn kind_filter() -> Filter
    where
        Self: Sized,
    {
        Filter::of_kind(Self::KIND)
    }

    fn dn(&self) -> &str {
        self.handle().dn()
    }

    fn raw(&self) -> &RawEntry {
        self.handle().raw()
    }

    fn object_classes(&self) -> &[String] {
        self.handle().object_classes()
    }

    fn cn(&self) -> &str {
        self.handle().cn()
    }

    fn name(&self) -> &str {
        self.handle().name()
    }

    fn description(&self) -> &str {
        self.handle().description()
    }

    fn object_guid(&self) -> DirectoryResult<&str> {
        self.handle().object_guid()
    }

    fn when_created(&self) -> DirectoryResult<Option<DateTime<Utc>>> {
        self.handle().when_created()
    }

    fn when_changed(&self) -> DirectoryResult<Option<DateTime<Utc>>> {
        self.handle().when_changed()
    }

    async fn set_description(&mut self, description: &str) -> DirectoryResult<()> {
        self.handle_mut().set_description(description).await
    }
}
