//! In-memory directory
//!
//! A [`DirectoryConnection`] that keeps its entries in a vector and evaluates
//! filters locally. Used for tests and for running the object layer without a
//! server. Writes are recorded so callers can assert on them, and failures
//! can be injected for searches and writes.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::dn::{dn_eq, is_within, parent_dn, rdn_parts};
use crate::entry::{AttributeValue, RawEntry};
use crate::error::{DirectoryError, DirectoryResult};
use crate::filter::Filter;
use crate::schema::{attr, class};
use crate::sid::Sid;
use crate::traits::DirectoryConnection;
use crate::types::SearchScope;

/// Domain SID used for principals created by [`InMemoryDirectory`].
const DOMAIN_SUB_AUTHORITIES: [u32; 4] = [21, 1004336348, 1177238915, 682003330];

/// First RID handed out to created principals.
const FIRST_RID: u32 = 1100;

/// A single successful attribute write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub dn: String,
    pub attribute: String,
    pub value: AttributeValue,
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<RawEntry>,
    commits: Vec<CommitRecord>,
    write_failure: Option<String>,
    search_failure: Option<String>,
}

/// Directory store held entirely in memory.
#[derive(Debug)]
pub struct InMemoryDirectory {
    base_dn: String,
    state: RwLock<State>,
    searches: AtomicUsize,
    next_rid: AtomicU32,
}

impl InMemoryDirectory {
    /// Create an empty directory rooted at `base_dn`.
    #[must_use]
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            base_dn: base_dn.into(),
            state: RwLock::new(State::default()),
            searches: AtomicUsize::new(0),
            next_rid: AtomicU32::new(FIRST_RID),
        }
    }

    /// Add an entry using builder pattern.
    #[must_use]
    pub fn with_entry(mut self, entry: RawEntry) -> Self {
        self.state.get_mut().entries.push(entry);
        self
    }

    /// Load entries from a JSON array of `{"dn": ..., "attributes": {...}}`
    /// objects.
    pub fn from_json(base_dn: impl Into<String>, json: &str) -> DirectoryResult<Self> {
        let loaded: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|e| DirectoryError::InvalidData {
                message: format!("invalid directory fixture: {e}"),
            })?;

        let mut directory = Self::new(base_dn);
        for raw in loaded {
            // Re-set every attribute so fixture keys are folded to lower case.
            let mut entry = RawEntry::new(raw.dn());
            for (name, value) in raw.iter() {
                entry.set(name, value.clone());
            }
            directory.state.get_mut().entries.push(entry);
        }
        Ok(directory)
    }

    /// Insert or replace an entry.
    pub async fn insert(&self, entry: RawEntry) {
        let mut state = self.state.write().await;
        match state.entries.iter_mut().find(|e| dn_eq(e.dn(), entry.dn())) {
            Some(existing) => *existing = entry,
            None => state.entries.push(entry),
        }
    }

    /// Snapshot of the entry at `dn`.
    pub async fn entry(&self, dn: &str) -> Option<RawEntry> {
        let state = self.state.read().await;
        state.entries.iter().find(|e| dn_eq(e.dn(), dn)).cloned()
    }

    /// Every successful attribute write, oldest first.
    pub async fn commits(&self) -> Vec<CommitRecord> {
        self.state.read().await.commits.clone()
    }

    /// Make every following write (commit or create) fail with a store error.
    pub async fn fail_writes_with(&self, message: impl Into<String>) {
        self.state.write().await.write_failure = Some(message.into());
    }

    /// Make every following search fail with a store error.
    pub async fn fail_searches_with(&self, message: impl Into<String>) {
        self.state.write().await.search_failure = Some(message.into());
    }

    /// Remove injected failures.
    pub async fn clear_failures(&self) {
        let mut state = self.state.write().await;
        state.write_failure = None;
        state.search_failure = None;
    }

    /// Number of searches served so far, failed ones included.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    fn is_known_parent(&self, state: &State, dn: &str) -> bool {
        dn_eq(dn, &self.base_dn) || state.entries.iter().any(|e| dn_eq(e.dn(), dn))
    }

    fn object_category(&self, object_classes: &[&str]) -> String {
        let structural = object_classes.last().copied().unwrap_or(class::TOP);
        let category = match structural {
            c if c.eq_ignore_ascii_case(class::USER) => "Person",
            c if c.eq_ignore_ascii_case(class::COMPUTER) => "Computer",
            c if c.eq_ignore_ascii_case(class::GROUP) => "Group",
            c if c.eq_ignore_ascii_case(class::ORGANIZATIONAL_UNIT) => "Organizational-Unit",
            _ => "Top",
        };
        format!("CN={category},CN=Schema,CN=Configuration,{}", self.base_dn)
    }

    fn allocate_sid(&self) -> DirectoryResult<Sid> {
        let rid = self.next_rid.fetch_add(1, Ordering::SeqCst);
        let mut subs = DOMAIN_SUB_AUTHORITIES.to_vec();
        subs.push(rid);
        Sid::new(5, subs)
    }
}

fn generalized_now() -> String {
    Utc::now().format("%Y%m%d%H%M%S.0Z").to_string()
}

fn in_scope(dn: &str, base: &str, scope: SearchScope) -> bool {
    match scope {
        SearchScope::Base => dn_eq(dn, base),
        SearchScope::OneLevel => parent_dn(dn).is_some_and(|parent| dn_eq(parent, base)),
        SearchScope::Subtree => is_within(dn, base),
    }
}

#[async_trait]
impl DirectoryConnection for InMemoryDirectory {
    fn base_dn(&self) -> &str {
        &self.base_dn
    }

    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
    ) -> DirectoryResult<Vec<RawEntry>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        if let Some(message) = &state.search_failure {
            return Err(DirectoryError::store(message.clone()));
        }

        let parsed = Filter::parse(filter)?;
        let rows: Vec<RawEntry> = state
            .entries
            .iter()
            .filter(|e| in_scope(e.dn(), base, scope) && parsed.matches(e))
            .cloned()
            .collect();

        debug!(base = %base, ?scope, filter = %filter, count = rows.len(), "In-memory search");
        Ok(rows)
    }

    async fn commit_attribute(
        &self,
        dn: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> DirectoryResult<()> {
        let mut state = self.state.write().await;
        if let Some(message) = &state.write_failure {
            return Err(DirectoryError::store(message.clone()));
        }

        let entry = state
            .entries
            .iter_mut()
            .find(|e| dn_eq(e.dn(), dn))
            .ok_or_else(|| DirectoryError::ObjectNotFound { dn: dn.to_string() })?;

        if value.is_empty() {
            entry.remove(attribute);
        } else {
            entry.set(attribute, value.clone());
        }
        entry.set(attr::WHEN_CHANGED, generalized_now());

        state.commits.push(CommitRecord {
            dn: dn.to_string(),
            attribute: attribute.to_string(),
            value: value.clone(),
        });

        debug!(dn = %dn, attribute = %attribute, "In-memory commit");
        Ok(())
    }

    async fn create_child(
        &self,
        parent_dn: &str,
        rdn: &str,
        object_classes: &[&str],
    ) -> DirectoryResult<String> {
        let mut state = self.state.write().await;
        if let Some(message) = &state.write_failure {
            return Err(DirectoryError::store(message.clone()));
        }
        if !self.is_known_parent(&state, parent_dn) {
            return Err(DirectoryError::ObjectNotFound {
                dn: parent_dn.to_string(),
            });
        }

        let dn = format!("{rdn},{parent_dn}");
        if state.entries.iter().any(|e| dn_eq(e.dn(), &dn)) {
            return Err(DirectoryError::ObjectAlreadyExists { dn });
        }

        let (naming_attribute, value) =
            rdn_parts(&dn).ok_or_else(|| DirectoryError::InvalidData {
                message: format!("'{rdn}' is not a valid relative distinguished name"),
            })?;

        let now = generalized_now();
        let mut entry = RawEntry::new(dn.clone())
            .with(
                attr::OBJECT_CLASS,
                object_classes.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            )
            .with(naming_attribute, value.clone())
            .with(attr::NAME, value.clone())
            .with(attr::DISTINGUISHED_NAME, dn.clone())
            .with(attr::OBJECT_CATEGORY, self.object_category(object_classes))
            .with(attr::WHEN_CREATED, now.clone())
            .with(attr::WHEN_CHANGED, now)
            .with(
                attr::OBJECT_GUID,
                AttributeValue::binary(Uuid::new_v4().to_bytes_le().to_vec()),
            );

        let is_principal = object_classes
            .iter()
            .any(|c| c.eq_ignore_ascii_case(class::USER) || c.eq_ignore_ascii_case(class::GROUP));
        if is_principal {
            let is_computer = object_classes
                .iter()
                .any(|c| c.eq_ignore_ascii_case(class::COMPUTER));
            let account = if is_computer {
                format!("{value}$")
            } else {
                value.clone()
            };
            entry.set(attr::SAM_ACCOUNT_NAME, account);
            entry.set(
                attr::OBJECT_SID,
                AttributeValue::binary(self.allocate_sid()?.to_bytes()),
            );
        }

        state.entries.push(entry);
        debug!(dn = %dn, "In-memory create");
        Ok(dn)
    }
}
