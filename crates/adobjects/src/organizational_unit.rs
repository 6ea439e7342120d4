//! Organizational units and object creation.

use adobjects_core::dn::rdn;
use adobjects_core::error::{DirectoryError, DirectoryResult};
use adobjects_core::filter::Filter;
use adobjects_core::schema::{attr, organizational_unit as ou};
use adobjects_core::traits::SharedConnection;
use adobjects_core::types::ObjectKind;
use std::sync::OnceLock;
use tracing::{info, instrument};

use crate::entity::sealed::Materialize;
use crate::entity::{cache_line, resolve_reference, DirectoryEntity, EntryHandle, ReferenceCell};
use crate::finder;
use crate::group::GroupObject;
use crate::object::DirectoryObject;
use crate::user::UserObject;

#[derive(Debug, Default)]
struct OrganizationalUnitCells {
    ou: OnceLock<String>,
    street: OnceLock<String>,
    city: OnceLock<String>,
    state_or_province: OnceLock<String>,
    co: OnceLock<String>,
    c: OnceLock<String>,
    managed_by: OnceLock<String>,
    managed_by_object: ReferenceCell,
}

/// An organizational unit (`objectClass=organizationalUnit`).
#[derive(Debug)]
pub struct OrganizationalUnitObject {
    handle: EntryHandle,
    cells: OrganizationalUnitCells,
}

impl Materialize for OrganizationalUnitObject {
    fn materialize(handle: EntryHandle) -> Self {
        Self {
            handle,
            cells: OrganizationalUnitCells::default(),
        }
    }
}

impl DirectoryEntity for OrganizationalUnitObject {
    const KIND: ObjectKind = ObjectKind::OrganizationalUnit;

    fn handle(&self) -> &EntryHandle {
        &self.handle
    }

    fn handle_mut(&mut self) -> &mut EntryHandle {
        &mut self.handle
    }
}

impl OrganizationalUnitObject {
    /// Find by the `ou` naming attribute.
    pub async fn find_one_by_ou(
        connection: &SharedConnection,
        name: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one(connection, Filter::eq(ou::OU, name)).await
    }

    pub async fn find_one_by_dn(
        connection: &SharedConnection,
        dn: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one_by_dn(connection, dn).await
    }

    pub async fn find_all(connection: &SharedConnection) -> DirectoryResult<Vec<Self>> {
        finder::find_all(connection).await
    }

    pub async fn find_all_by_filter(
        connection: &SharedConnection,
        filter: Filter,
    ) -> DirectoryResult<Vec<Self>> {
        finder::find_all_by_filter(connection, filter).await
    }

    /// Create a child organizational unit named `name`.
    pub async fn add_organizational_unit(
        &self,
        name: &str,
    ) -> DirectoryResult<OrganizationalUnitObject> {
        self.add_child(ou::OU, name).await
    }

    /// Create a group named `name` directly below this unit.
    pub async fn add_group(&self, name: &str) -> DirectoryResult<GroupObject> {
        self.add_child(attr::CN, name).await
    }

    /// Create a user named `name` directly below this unit.
    pub async fn add_user(&self, name: &str) -> DirectoryResult<UserObject> {
        self.add_child(attr::CN, name).await
    }

    /// Create the entry, then read it back so the result is fully
    /// materialized.
    #[instrument(skip(self), fields(parent = %self.handle.dn(), kind = %E::KIND))]
    async fn add_child<E: DirectoryEntity>(
        &self,
        naming_attribute: &str,
        name: &str,
    ) -> DirectoryResult<E> {
        if name.trim().is_empty() {
            return Err(DirectoryError::InvalidData {
                message: format!("{} name must not be empty", E::KIND),
            });
        }

        let connection = self.handle.connection();
        let dn = connection
            .create_child(
                self.handle.dn(),
                &rdn(naming_attribute, name),
                E::KIND.creation_classes(),
            )
            .await?;

        info!(dn = %dn, "Directory object created");

        match finder::find_one_by_dn::<E>(connection, &dn).await? {
            Some(created) => Ok(created),
            None => Err(DirectoryError::ObjectNotFound { dn }),
        }
    }

    pub fn ou(&self) -> &str {
        self.handle.line(&self.cells.ou, ou::OU)
    }

    pub fn street(&self) -> &str {
        self.handle.line(&self.cells.street, ou::STREET)
    }

    pub async fn set_street(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.street, value.to_string());
        self.handle.commit(ou::STREET, value).await
    }

    /// `l`
    pub fn city(&self) -> &str {
        self.handle.line(&self.cells.city, ou::LOCALITY)
    }

    pub async fn set_city(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.city, value.to_string());
        self.handle.commit(ou::LOCALITY, value).await
    }

    /// `st`
    pub fn state_or_province(&self) -> &str {
        self.handle.line(&self.cells.state_or_province, ou::STATE_OR_PROVINCE)
    }

    pub async fn set_state_or_province(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.state_or_province, value.to_string());
        self.handle.commit(ou::STATE_OR_PROVINCE, value).await
    }

    /// Country name (`co`).
    pub fn co(&self) -> &str {
        self.handle.line(&self.cells.co, ou::COUNTRY_NAME)
    }

    pub async fn set_co(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.co, value.to_string());
        self.handle.commit(ou::COUNTRY_NAME, value).await
    }

    /// Two-letter country code (`c`).
    pub fn c(&self) -> &str {
        self.handle.line(&self.cells.c, ou::COUNTRY_CODE)
    }

    pub async fn set_c(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.c, value.to_string());
        self.handle.commit(ou::COUNTRY_CODE, value).await
    }

    pub fn managed_by(&self) -> &str {
        self.handle.line(&self.cells.managed_by, attr::MANAGED_BY)
    }

    pub async fn set_managed_by(&mut self, dn: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.managed_by, dn.to_string());
        self.cells.managed_by_object = ReferenceCell::new();
        self.handle.commit(attr::MANAGED_BY, value).await
    }

    pub async fn managed_by_object(&self) -> DirectoryResult<Option<&DirectoryObject>> {
        resolve_reference(
            self.handle.connection(),
            &self.cells.managed_by_object,
            self.managed_by(),
        )
        .await
    }
}
