//! User accounts.

use adobjects_core::error::DirectoryResult;
use adobjects_core::filter::Filter;
use adobjects_core::schema::{attr, user};
use adobjects_core::traits::SharedConnection;
use adobjects_core::types::ObjectKind;
use std::sync::OnceLock;

use crate::entity::sealed::Materialize;
use crate::entity::{cache_line, resolve_reference, DirectoryEntity, EntryHandle, ReferenceCell};
use crate::finder;
use crate::object::DirectoryObject;
use crate::user_account_control::UserAccountControl;

#[derive(Debug, Default)]
struct UserCells {
    object_sid: OnceLock<String>,
    sam_account_name: OnceLock<String>,
    user_principal_name: OnceLock<String>,
    display_name: OnceLock<String>,
    first_name: OnceLock<String>,
    last_name: OnceLock<String>,
    mail: OnceLock<String>,
    department: OnceLock<String>,
    title: OnceLock<String>,
    telephone_number: OnceLock<String>,
    member_of: OnceLock<Vec<String>>,
    manager: OnceLock<String>,
    manager_object: ReferenceCell,
    user_account_control: OnceLock<Option<i64>>,
}

/// A person account (`objectClass=user`, `objectCategory=person`).
///
/// Computer accounts also carry the `user` class but are never returned as
/// `UserObject`.
#[derive(Debug)]
pub struct UserObject {
    handle: EntryHandle,
    cells: UserCells,
}

impl Materialize for UserObject {
    fn materialize(handle: EntryHandle) -> Self {
        Self {
            handle,
            cells: UserCells::default(),
        }
    }
}

impl DirectoryEntity for UserObject {
    const KIND: ObjectKind = ObjectKind::User;

    fn handle(&self) -> &EntryHandle {
        &self.handle
    }

    fn handle_mut(&mut self) -> &mut EntryHandle {
        &mut self.handle
    }
}

impl UserObject {
    pub async fn find_one_by_cn(
        connection: &SharedConnection,
        cn: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one(connection, Filter::eq(attr::CN, cn)).await
    }

    pub async fn find_one_by_sam_account_name(
        connection: &SharedConnection,
        sam_account_name: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one(connection, Filter::eq(attr::SAM_ACCOUNT_NAME, sam_account_name)).await
    }

    /// Find by `userPrincipalName` (`alice@example.com`).
    pub async fn find_one_by_upn(
        connection: &SharedConnection,
        upn: &str,
    ) -> DirectoryResult<Option<Self>> {
        finder::find_one(connection, Filter::eq(user::USER_PRINCIPAL_NAME, upn)).await
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

    pub fn user_principal_name(&self) -> &str {
        self.handle.line(&self.cells.user_principal_name, user::USER_PRINCIPAL_NAME)
    }

    pub fn display_name(&self) -> &str {
        self.handle.line(&self.cells.display_name, user::DISPLAY_NAME)
    }

    /// `givenName`
    pub fn first_name(&self) -> &str {
        self.handle.line(&self.cells.first_name, user::GIVEN_NAME)
    }

    /// `sn`
    pub fn last_name(&self) -> &str {
        self.handle.line(&self.cells.last_name, user::SURNAME)
    }

    pub fn mail(&self) -> &str {
        self.handle.line(&self.cells.mail, attr::MAIL)
    }

    pub fn department(&self) -> &str {
        self.handle.line(&self.cells.department, user::DEPARTMENT)
    }

    pub fn title(&self) -> &str {
        self.handle.line(&self.cells.title, user::TITLE)
    }

    pub fn telephone_number(&self) -> &str {
        self.handle.line(&self.cells.telephone_number, user::TELEPHONE_NUMBER)
    }

    pub fn member_of(&self) -> &[String] {
        self.handle.lines(&self.cells.member_of, attr::MEMBER_OF)
    }

    /// DN of this user's manager.
    pub fn manager(&self) -> &str {
        self.handle.line(&self.cells.manager, user::MANAGER)
    }

    pub async fn manager_object(&self) -> DirectoryResult<Option<&DirectoryObject>> {
        resolve_reference(
            self.handle.connection(),
            &self.cells.manager_object,
            self.manager(),
        )
        .await
    }

    /// Account flags. An absent attribute reads as a plain enabled account.
    pub fn user_account_control(&self) -> DirectoryResult<UserAccountControl> {
        let raw = self
            .handle
            .integer(&self.cells.user_account_control, user::USER_ACCOUNT_CONTROL)?;
        Ok(match raw {
            Some(value) => UserAccountControl::from_attribute(value),
            None => UserAccountControl::from_value(UserAccountControl::NORMAL_ACCOUNT),
        })
    }

    pub fn is_disabled(&self) -> DirectoryResult<bool> {
        Ok(self.user_account_control()?.is_disabled())
    }

    pub async fn set_display_name(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.display_name, value.to_string());
        self.handle.commit(user::DISPLAY_NAME, value).await
    }

    pub async fn set_first_name(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.first_name, value.to_string());
        self.handle.commit(user::GIVEN_NAME, value).await
    }

    pub async fn set_last_name(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.last_name, value.to_string());
        self.handle.commit(user::SURNAME, value).await
    }

    pub async fn set_mail(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.mail, value.to_string());
        self.handle.commit(attr::MAIL, value).await
    }

    pub async fn set_department(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.department, value.to_string());
        self.handle.commit(user::DEPARTMENT, value).await
    }

    pub async fn set_title(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.title, value.to_string());
        self.handle.commit(user::TITLE, value).await
    }

    pub async fn set_telephone_number(&mut self, value: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.telephone_number, value.to_string());
        self.handle.commit(user::TELEPHONE_NUMBER, value).await
    }

    pub async fn set_manager(&mut self, dn: &str) -> DirectoryResult<()> {
        let value = cache_line(&mut self.cells.manager, dn.to_string());
        self.cells.manager_object = ReferenceCell::new();
        self.handle.commit(user::MANAGER, value).await
    }

    /// Set or clear the disabled bit, keeping every other flag.
    pub async fn set_disabled(&mut self, disabled: bool) -> DirectoryResult<()> {
        let current = self.user_account_control()?;
        let updated = if disabled {
            current.disable()
        } else {
            current.enable()
        };
        let raw = i64::from(u32::from(updated) as i32);
        self.cells.user_account_control = OnceLock::from(Some(raw));
        self.handle
            .commit(user::USER_ACCOUNT_CONTROL, raw.to_string().into())
            .await
    }
}
