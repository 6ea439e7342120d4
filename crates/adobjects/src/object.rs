//! Any directory object, whatever its kind.

use adobjects_core::entry::AttributeValue;
use adobjects_core::schema::attr;
use adobjects_core::types::ObjectKind;

use crate::computer::ComputerObject;
use crate::entity::sealed::Materialize;
use crate::entity::{DirectoryEntity, EntryHandle};
use crate::group::GroupObject;
use crate::organizational_unit::OrganizationalUnitObject;
use crate::user::UserObject;

/// A materialized entry of any kind.
///
/// Reference lookups (`managedBy`, `manager`) can point at any kind of entry,
/// so they resolve to this type. Entries whose classes are not modelled
/// (contacts, service accounts, containers) land in [`DirectoryObject::Other`].
#[derive(Debug)]
pub enum DirectoryObject {
    Computer(ComputerObject),
    User(UserObject),
    Group(GroupObject),
    OrganizationalUnit(OrganizationalUnitObject),
    Other(EntryHandle),
}

impl DirectoryObject {
    /// Classify a handle by its `objectClass` and `objectCategory` values.
    pub(crate) fn from_handle(handle: EntryHandle) -> Self {
        let kind = {
            let category = handle
                .raw()
                .get(attr::OBJECT_CATEGORY)
                .and_then(AttributeValue::first);
            ObjectKind::classify(handle.object_classes().iter().map(String::as_str), category)
        };

        match kind {
            Some(ObjectKind::Computer) => {
                DirectoryObject::Computer(ComputerObject::materialize(handle))
            }
            Some(ObjectKind::User) => DirectoryObject::User(UserObject::materialize(handle)),
            Some(ObjectKind::Group) => DirectoryObject::Group(GroupObject::materialize(handle)),
            Some(ObjectKind::OrganizationalUnit) => {
                DirectoryObject::OrganizationalUnit(OrganizationalUnitObject::materialize(handle))
            }
            None => DirectoryObject::Other(handle),
        }
    }

    /// The modelled kind, or `None` for [`DirectoryObject::Other`].
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            DirectoryObject::Computer(_) => Some(ObjectKind::Computer),
            DirectoryObject::User(_) => Some(ObjectKind::User),
            DirectoryObject::Group(_) => Some(ObjectKind::Group),
            DirectoryObject::OrganizationalUnit(_) => Some(ObjectKind::OrganizationalUnit),
            DirectoryObject::Other(_) => None,
        }
    }

    pub fn handle(&self) -> &EntryHandle {
        match self {
            DirectoryObject::Computer(o) => o.handle(),
            DirectoryObject::User(o) => o.handle(),
            DirectoryObject::Group(o) => o.handle(),
            DirectoryObject::OrganizationalUnit(o) => o.handle(),
            DirectoryObject::Other(h) => h,
        }
    }

    pub fn dn(&self) -> &str {
        self.handle().dn()
    }

    pub fn cn(&self) -> &str {
        self.handle().cn()
    }

    pub fn name(&self) -> &str {
        self.handle().name()
    }

    pub fn as_computer(&self) -> Option<&ComputerObject> {
        match self {
            DirectoryObject::Computer(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserObject> {
        match self {
            DirectoryObject::User(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupObject> {
        match self {
            DirectoryObject::Group(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_organizational_unit(&self) -> Option<&OrganizationalUnitObject> {
        match self {
            DirectoryObject::OrganizationalUnit(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_computer(self) -> Option<ComputerObject> {
        match self {
            DirectoryObject::Computer(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_user(self) -> Option<UserObject> {
        match self {
            DirectoryObject::User(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_group(self) -> Option<GroupObject> {
        match self {
            DirectoryObject::Group(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_organizational_unit(self) -> Option<OrganizationalUnitObject> {
        match self {
            DirectoryObject::OrganizationalUnit(o) => Some(o),
            _ => None,
        }
    }
}
