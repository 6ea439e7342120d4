//! LDAP directory connection
//!
//! [`DirectoryConnection`] implementation on top of `ldap3`.

use adobjects_core::config::DirectoryConfig;
use adobjects_core::entry::{AttributeValue, RawEntry};
use adobjects_core::error::{DirectoryError, DirectoryResult};
use adobjects_core::schema::{attr, computer};
use adobjects_core::traits::DirectoryConnection;
use adobjects_core::types::SearchScope;
use async_trait::async_trait;
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::LdapConfig;

/// LDAP result code: invalidCredentials.
const RC_INVALID_CREDENTIALS: u32 = 49;
/// LDAP result code: noSuchObject.
const RC_NO_SUCH_OBJECT: u32 = 32;
/// LDAP result code: entryAlreadyExists.
const RC_ALREADY_EXISTS: u32 = 68;

/// Attributes that are always binary, even when their bytes happen to be
/// valid UTF-8 and `ldap3` hands them back as text.
const BINARY_ATTRIBUTES: [&str; 2] = [attr::OBJECT_SID, attr::OBJECT_GUID];

/// Constructed attributes the server only returns when asked by name.
const CONSTRUCTED_ATTRIBUTES: [&str; 1] = [computer::SITE_NAME];

/// Directory connection backed by an LDAP server.
pub struct LdapDirectory {
    /// Configuration.
    config: LdapConfig,

    /// Cached LDAP connection (lazily initialized).
    connection: Arc<RwLock<Option<Ldap>>>,

    /// Whether the connection has been disposed.
    disposed: Arc<RwLock<bool>>,
}

impl LdapDirectory {
    /// Create a new LDAP directory connection with the given configuration.
    ///
    /// No network traffic happens until the first operation.
    pub fn new(config: LdapConfig) -> DirectoryResult<Self> {
        config.validate()?;
        config.tls.validate_security();

        Ok(Self {
            config,
            connection: Arc::new(RwLock::new(None)),
            disposed: Arc::new(RwLock::new(false)),
        })
    }

    /// The configuration this connection was created with.
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    /// Get an LDAP connection, creating one if necessary.
    async fn get_connection(&self) -> DirectoryResult<Ldap> {
        if *self.disposed.read().await {
            return Err(DirectoryError::InvalidConfiguration {
                message: "Connection has been disposed".to_string(),
            });
        }

        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let conn = self.create_connection().await?;

        {
            let mut conn_guard = self.connection.write().await;
            *conn_guard = Some(conn.clone());
        }

        Ok(conn)
    }

    /// Create a new LDAP connection and bind.
    async fn create_connection(&self) -> DirectoryResult<Ldap> {
        let url = self.config.url();

        debug!(url = %url, "Connecting to LDAP server");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.config.connection.connection_timeout())
            .set_starttls(self.config.use_starttls)
            .set_no_tls_verify(!self.config.tls.verify_certificate);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("Failed to connect to LDAP server at {url}"),
                    e,
                )
            })?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        ldap.with_timeout(self.config.connection.operation_timeout());

        let bind_dn = &self.config.bind_dn;
        let bind_password = self.config.bind_password.as_deref().unwrap_or("");

        debug!(bind_dn = %bind_dn, "Performing LDAP bind");

        let result = ldap
            .simple_bind(bind_dn, bind_password)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("LDAP bind failed for {bind_dn}"),
                    e,
                )
            })?;

        if result.rc != 0 {
            if result.rc == RC_INVALID_CREDENTIALS {
                return Err(DirectoryError::AuthenticationFailed);
            }
            return Err(DirectoryError::connection_failed(format!(
                "LDAP bind failed with code {}: {}",
                result.rc, result.text
            )));
        }

        info!(host = %self.config.host, "LDAP connection established successfully");

        Ok(ldap)
    }

    /// Bind and read the base entry to verify the connection works.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> DirectoryResult<()> {
        let mut ldap = self.get_connection().await?;

        let result = ldap
            .search(&self.config.base_dn, Scope::Base, "(objectClass=*)", vec!["dn"])
            .await
            .map_err(|e| DirectoryError::connection_failed_with_source("Test search failed", e))?;

        let (entries, _res) = result.success().map_err(|e| {
            DirectoryError::connection_failed(format!("Test search failed: {e:?}"))
        })?;

        if entries.is_empty() {
            return Err(DirectoryError::connection_failed(format!(
                "Base DN '{}' not found or not accessible",
                self.config.base_dn
            )));
        }

        info!("LDAP connection test successful");
        Ok(())
    }

    /// Unbind and refuse any further operation.
    pub async fn dispose(&self) -> DirectoryResult<()> {
        *self.disposed.write().await = true;

        let mut conn_guard = self.connection.write().await;
        if let Some(mut ldap) = conn_guard.take() {
            if let Err(e) = ldap.unbind().await {
                warn!(error = %e, "Error during LDAP unbind");
            }
        }

        info!("LDAP directory connection disposed");
        Ok(())
    }

    fn to_ldap_scope(scope: SearchScope) -> Scope {
        match scope {
            SearchScope::Base => Scope::Base,
            SearchScope::OneLevel => Scope::OneLevel,
            SearchScope::Subtree => Scope::Subtree,
        }
    }

    /// Convert an LDAP search entry into an owned raw row.
    fn search_entry_to_raw(entry: SearchEntry) -> RawEntry {
        let mut raw = RawEntry::new(entry.dn);

        for (name, mut values) in entry.attrs {
            let is_binary = BINARY_ATTRIBUTES
                .iter()
                .any(|b| b.eq_ignore_ascii_case(&name));
            let value = match values.len() {
                0 => continue,
                1 if is_binary => AttributeValue::binary(values.remove(0).into_bytes()),
                1 => AttributeValue::String(values.remove(0)),
                _ => AttributeValue::Array(values),
            };
            raw.set(&name, value);
        }

        for (name, mut values) in entry.bin_attrs {
            let value = match values.len() {
                0 => continue,
                1 => AttributeValue::Binary(values.remove(0)),
                _ => AttributeValue::BinaryArray(values),
            };
            raw.set(&name, value);
        }

        raw
    }

    /// Values of an attribute as the byte strings `ldap3` sends.
    fn value_to_bytes(value: &AttributeValue) -> HashSet<Vec<u8>> {
        match value {
            AttributeValue::Null => HashSet::new(),
            AttributeValue::String(s) if s.is_empty() => HashSet::new(),
            AttributeValue::String(s) => HashSet::from([s.as_bytes().to_vec()]),
            AttributeValue::Array(values) => {
                values.iter().map(|s| s.as_bytes().to_vec()).collect()
            }
            AttributeValue::Binary(bytes) if bytes.is_empty() => HashSet::new(),
            AttributeValue::Binary(bytes) => HashSet::from([bytes.clone()]),
            AttributeValue::BinaryArray(values) => values
                .iter()
                .filter(|bytes| !bytes.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Attributes requested on every search: all user attributes plus the
    /// constructed ones.
    fn requested_attributes() -> Vec<&'static str> {
        let mut attributes = vec!["*"];
        attributes.extend(CONSTRUCTED_ATTRIBUTES);
        attributes
    }

    /// Server-side page size for searches.
    fn page_size(&self) -> i32 {
        i32::try_from(self.config.page_size).unwrap_or(i32::MAX)
    }

    /// Build the modification for a single-attribute replace.
    ///
    /// An empty value set removes the attribute and succeeds even when the
    /// attribute is already absent, unlike a delete.
    fn replace_mod(attribute: &str, value: &AttributeValue) -> Mod<Vec<u8>> {
        Mod::Replace(attribute.as_bytes().to_vec(), Self::value_to_bytes(value))
    }
}

#[async_trait]
impl DirectoryConnection for LdapDirectory {
    fn base_dn(&self) -> &str {
        &self.config.base_dn
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
    ) -> DirectoryResult<Vec<RawEntry>> {
        let mut ldap = self.get_connection().await?;

        debug!(filter = %filter, base_dn = %base, "Searching LDAP");

        let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(self.page_size())),
        ];
        let mut stream = ldap
            .streaming_search_with(
                adapters,
                base,
                Self::to_ldap_scope(scope),
                filter,
                Self::requested_attributes(),
            )
            .await
            .map_err(|e| DirectoryError::store_with_source("LDAP search failed", e))?;

        let mut rows = Vec::new();
        while let Some(entry) = stream
            .next()
            .await
            .map_err(|e| DirectoryError::store_with_source("LDAP search failed", e))?
        {
            rows.push(Self::search_entry_to_raw(SearchEntry::construct(entry)));
        }

        let result = stream.finish().await;
        if result.rc == RC_NO_SUCH_OBJECT {
            debug!(base_dn = %base, "Search base does not exist");
            return Ok(Vec::new());
        }
        if result.rc != 0 {
            return Err(DirectoryError::store(format!(
                "LDAP search failed with code {}: {}",
                result.rc, result.text
            )));
        }

        info!(returned = rows.len(), "LDAP search completed");

        Ok(rows)
    }

    #[instrument(skip(self, value))]
    async fn commit_attribute(
        &self,
        dn: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> DirectoryResult<()> {
        let mut ldap = self.get_connection().await?;

        debug!(dn = %dn, attribute = %attribute, "Updating LDAP entry");

        let result = ldap
            .modify(dn, vec![Self::replace_mod(attribute, value)])
            .await
            .map_err(|e| {
                DirectoryError::store_with_source(format!("Failed to update entry: {dn}"), e)
            })?;

        if result.rc == RC_NO_SUCH_OBJECT {
            return Err(DirectoryError::ObjectNotFound { dn: dn.to_string() });
        }

        if result.rc != 0 {
            return Err(DirectoryError::store(format!(
                "LDAP modify failed with code {}: {}",
                result.rc, result.text
            )));
        }

        info!(dn = %dn, "LDAP entry updated successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_child(
        &self,
        parent_dn: &str,
        rdn: &str,
        object_classes: &[&str],
    ) -> DirectoryResult<String> {
        let mut ldap = self.get_connection().await?;
        let dn = format!("{rdn},{parent_dn}");

        debug!(dn = %dn, "Creating LDAP entry");

        let classes: HashSet<&str> = object_classes.iter().copied().collect();
        let result = ldap
            .add(&dn, vec![(attr::OBJECT_CLASS, classes)])
            .await
            .map_err(|e| {
                DirectoryError::store_with_source(format!("Failed to create entry: {dn}"), e)
            })?;

        match result.rc {
            0 => {}
            RC_ALREADY_EXISTS => return Err(DirectoryError::ObjectAlreadyExists { dn }),
            RC_NO_SUCH_OBJECT => {
                return Err(DirectoryError::ObjectNotFound {
                    dn: parent_dn.to_string(),
                })
            }
            rc => {
                return Err(DirectoryError::store(format!(
                    "LDAP add failed with code {}: {}",
                    rc, result.text
                )))
            }
        }

        info!(dn = %dn, "LDAP entry created successfully");
        Ok(dn)
    }
}

impl std::fmt::Debug for LdapDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectory")
            .field("config", &self.config.redacted())
            .finish()
    }
}
