//! Computer accounts.

use adobjects_core::error::DirectoryResult;
use adobjects_core::filter::Filter;
use adobjects_core::schema::{attr, computer};
use adobjects_core::traits::SharedConnection;
use adobjects_core::types::ObjectKind;
use std::sync::OnceLock;

use crate::entity::sealed::Materialize;
use crate::entity::{
    cache_line, cache_lines, resolve_reference, DirectoryEntity, EntryHandle, ReferenceCell,
};
use crate::finder;
use crate::object::DirectoryObject;

#[derive(Debug, Default)]
struct ComputerCells {
    object_sid: OnceLock<String>,
    operating_system_name: OnceLock<String>,
    operating_system_version: OnceLock<String>,
    operating_system_service_pack: OnceLock<String>,
    dns_name: OnceLock<String>,
    site_name: OnceLock<String>,
    member_of: OnceLock<Vec<String>>,
    managed_by: OnceLock<String>,
    managed_by_object: ReferenceCell,
}

/// A computer account (`objectClass=computer`).
#[derive(Debug)]
pub struct ComputerObject {
    handle: EntryHandle,
    cells: ComputerCells,
}

impl Materialize for ComputerObject {
    fn materialize(handle: EntryHandle) -> Self {
        Self {
            handle,
            cells: ComputerCells::default(),
        }
    }
}

impl DirectoryEntity for ComputerObject {
    const KIND: ObjectKind = ObjectKind::Computer;

    fn handle(&self) -> &EntryHandle {
        &self.handle
    }

    fn handle_mut(&mut self) -> &mut EntryHandle {
        &mut self.handle
    }
}

impl ComputerObject {
    pub async fn find_one_by_cn(
        connection: &SharedConnection,
        cn: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one(connection, Filter::eq(attr::CN, cn)).await
    }

    pub async fn find_one_by_sid(
        connection: &SharedConnection,
        sid: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one_by_sid(connection, sid).await
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

    /// `objectSid` in `S-1-5-21-...` form.
    pub fn object_sid(&self) -> DirectoryResult<&str> {
        self.handle.sid(&self.cells.object_sid, attr::OBJECT_SID)
    }

    pub fn operating_system_name(&self) -> &str {
        self.handle.line(
            &self.cells.operating_system_name,
            computer::OPERATING_SYSTEM,
        )
    }

    pub fn operating_system_version(&self) -> &str {
        self.handle.line(
            &self.cells.operating_system_version,
            computer::OPERATING_SYSTEM_VERSION,
        )
    }

    pub fn operating_system_service_pack(&self) -> &str {
        self.handle.line(
            &self.cells.operating_system_service_pack,
            computer::OPERATING_SYSTEM_SERVICE_PACK,
        )
    }

    /// `dNSHostName`
    pub fn dns_name(&self) -> &str {
        self.handle.line(&self.cells.dns_name, computer::DNS_HOST_NAME)
    }

    /// `msDS-SiteName`
    pub fn site_name(&self) -> &str {
        self.handle.line(&self.cells.site_name, computer::SITE_NAME)
    }

    /// DNs of the groups this computer belongs to.
    pub fn member_of(&self) -> &[String] {
        self.handle.lines(&self.cells.member_of, attr::MEMBER_OF)
    }

    pub async fn set_member_of(&mut self, groups: Vec<String>) -> DirectoryResult<()> {
        let value = cache_lines(&mut self.cells.member_of, groups);
        self.handle.commit(attr::MEMBER_OF, value).await
    }

    /// DN of the managing user or contact.
    pub fn managed_by(&self) -> &str {
        self.handle.line(&self.cells.managed_by, attr::MANAGED_BY)
    }

    pub async fn set_managed_by(&mut self, dn: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.managed_by, dn.to_string());
        self.cells.managed_by_object = ReferenceCell::new();
        self.handle.commit(attr::MANAGED_BY, value).await
    }

    /// The object named by [`managed_by`](Self::managed_by), looked up on
    /// first call.
    pub async fn managed_by_object(&self) -> DirectoryResult<Option<&DirectoryObject>> {
        resolve_reference(
            self.handle.connection(),
            &self.cells.managed_by_object,
            self.managed_by(),
        )
        .await
    }
}
