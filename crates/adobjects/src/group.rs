//! Security and distribution groups.

use adobjects_core::error::DirectoryResult;
use adobjects_core::filter::Filter;
use adobjects_core::schema::{attr, group};
use adobjects_core::traits::SharedConnection;
use adobjects_core::types::ObjectKind;
use std::sync::OnceLock;

use crate::entity::sealed::Materialize;
use crate::entity::{
    cache_line, cache_lines, resolve_reference, DirectoryEntity, EntryHandle, ReferenceCell,
};
use crate::finder;
use crate::group_type::{GroupScope, GroupType};
use crate::object::DirectoryObject;

#[derive(Debug, Default)]
struct GroupCells {
    object_sid: OnceLock<String>,
    sam_account_name: OnceLock<String>,
    mail: OnceLock<String>,
    group_type: OnceLock<Option<i64>>,
    members: OnceLock<Vec<String>>,
    member_of: OnceLock<Vec<String>>,
    managed_by: OnceLock<String>,
    managed_by_object: ReferenceCell,
}

/// A group (`objectClass=group`).
#[derive(Debug)]
pub struct GroupObject {
    handle: EntryHandle,
    cells: GroupCells,
}

impl Materialize for GroupObject {
    fn materialize(handle: EntryHandle) -> Self {
        Self {
            handle,
            cells: GroupCells::default(),
        }
    }
}

impl DirectoryEntity for GroupObject {
    const KIND: ObjectKind = ObjectKind::Group;

    fn handle(&self) -> &EntryHandle {
        &self.handle
    }

    fn handle_mut(&mut self) -> &mut EntryHandle {
        &mut self.handle
    }
}

impl GroupObject {
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

    pub fn object_sid(&self) -> DirectoryResult<&str> {
        self.handle.sid(&self.cells.object_sid, attr::OBJECT_SID)
    }

    pub fn sam_account_name(&self) -> &str {
        self.handle.line(&self.cells.sam_account_name, attr::SAM_ACCOUNT_NAME)
    }

    pub fn mail(&self) -> &str {
        self.handle.line(&self.cells.mail, attr::MAIL)
    }

    pub fn group_type(&self) -> DirectoryResult<GroupType> {
        self.group_flags().map(GroupType::from_flags)
    }

    pub fn group_scope(&self) -> DirectoryResult<GroupScope> {
        self.group_flags().map(GroupScope::from_flags)
    }

    pub fn is_security_group(&self) -> DirectoryResult<bool> {
        Ok(self.group_type()? == GroupType::Security)
    }

    fn group_flags(&self) -> DirectoryResult<Option<i64>> {
        self.handle.integer(&self.cells.group_type, group::GROUP_TYPE)
    }

    /// DNs of the direct members.
    pub fn members(&self) -> &[String] {
        self.handle.lines(&self.cells.members, group::MEMBER)
    }

    /// Replace the full member list. An empty list removes every member.
    pub async fn set_members(&mut self, members: Vec<String>) -> DirectoryResult<()> {
        let value = cache_lines(&mut self.cells.members, members);
        self.handle.commit(group::MEMBER, value).await
    }

    pub fn member_of(&self) -> &[String] {
        self.handle.lines(&self.cells.member_of, attr::MEMBER_OF)
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
