//! `userAccountControl` bit flags.

use serde::{Deserialize, Serialize};

/// Decoded `userAccountControl` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAccountControl {
    pub value: u32,
}

impl UserAccountControl {
    pub const SCRIPT: u32 = 0x0001;
    pub const ACCOUNT_DISABLE: u32 = 0x0002;
    pub const HOMEDIR_REQUIRED: u32 = 0x0008;
    pub const LOCKOUT: u32 = 0x0010;
    pub const PASSWD_NOTREQD: u32 = 0x0020;
    pub const PASSWD_CANT_CHANGE: u32 = 0x0040;
    pub const NORMAL_ACCOUNT: u32 = 0x0200;
    pub const WORKSTATION_TRUST_ACCOUNT: u32 = 0x1000;
    pub const SERVER_TRUST_ACCOUNT: u32 = 0x2000;
    pub const DONT_EXPIRE_PASSWORD: u32 = 0x1_0000;
    pub const SMARTCARD_REQUIRED: u32 = 0x4_0000;
    pub const PASSWORD_EXPIRED: u32 = 0x80_0000;

    pub fn from_value(value: u32) -> Self {
        Self { value }
    }

    /// Decode the raw attribute. AD stores it as a signed integer.
    pub fn from_attribute(value: i64) -> Self {
        Self::from_value(value as u32)
    }

    pub fn contains(&self, flag: u32) -> bool {
        self.value & flag == flag
    }

    pub fn is_disabled(&self) -> bool {
        self.contains(Self::ACCOUNT_DISABLE)
    }

    pub fn is_active(&self) -> bool {
        !self.is_disabled()
    }

    pub fn is_locked_out(&self) -> bool {
        self.contains(Self::LOCKOUT)
    }

    pub fn password_never_expires(&self) -> bool {
        self.contains(Self::DONT_EXPIRE_PASSWORD)
    }

    pub fn is_workstation_account(&self) -> bool {
        self.contains(Self::WORKSTATION_TRUST_ACCOUNT)
    }

    /// Set the disabled bit.
    #[must_use]
    pub fn disable(self) -> Self {
        Self::from_value(self.value | Self::ACCOUNT_DISABLE)
    }

    /// Clear the disabled bit.
    #[must_use]
    pub fn enable(self) -> Self {
        Self::from_value(self.value & !Self::ACCOUNT_DISABLE)
    }
}

impl From<u32> for UserAccountControl {
    fn from(value: u32) -> Self {
        Self::from_value(value)
    }
}

impl From<UserAccountControl> for u32 {
    fn from(uac: UserAccountControl) -> Self {
        uac.value
    }
}
