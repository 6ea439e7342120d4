//! Group type and scope decoded from the `groupType` bit mask.

use serde::{Deserialize, Serialize};
use std::fmt;

const SECURITY_ENABLED: u32 = 0x8000_0000;
const GLOBAL_SCOPE: u32 = 0x0000_0002;
const DOMAIN_LOCAL_SCOPE: u32 = 0x0000_0004;
const UNIVERSAL_SCOPE: u32 = 0x0000_0008;

/// Whether a group can be used in access control lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    /// `groupType` is absent.
    #[default]
    Unknown,
    Security,
    Distribution,
}

impl GroupType {
    /// Decode from the raw `groupType` value.
    ///
    /// The attribute is a signed 32-bit integer, so security groups carry a
    /// negative value.
    pub fn from_flags(flags: Option<i64>) -> Self {
        match flags {
            None => GroupType::Unknown,
            Some(value) if (value as u32) & SECURITY_ENABLED != 0 => GroupType::Security,
            Some(_) => GroupType::Distribution,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Unknown => "unknown",
            GroupType::Security => "security",
            GroupType::Distribution => "distribution",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replication and membership scope of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScope {
    #[default]
    Unknown,
    Global,
    DomainLocal,
    Universal,
}

impl GroupScope {
    /// Decode from the raw `groupType` value.
    pub fn from_flags(flags: Option<i64>) -> Self {
        let Some(value) = flags else {
            return GroupScope::Unknown;
        };
        let bits = value as u32;
        if bits & GLOBAL_SCOPE != 0 {
            GroupScope::Global
        } else if bits & DOMAIN_LOCAL_SCOPE != 0 {
            GroupScope::DomainLocal
        } else if bits & UNIVERSAL_SCOPE != 0 {
            GroupScope::Universal
        } else {
            GroupScope::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupScope::Unknown => "unknown",
            GroupScope::Global => "global",
            GroupScope::DomainLocal => "domain_local",
            GroupScope::Universal => "universal",
        }
    }
}

impl fmt::Display for GroupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_global_group() {
        // 0x80000002 as stored by AD
        let flags = Some(-2147483646);
        assert_eq!(GroupType::from_flags(flags), GroupType::Security);
        assert_eq!(GroupScope::from_flags(flags), GroupScope::Global);
    }

    #[test]
    fn test_distribution_universal_group() {
        let flags = Some(8);
        assert_eq!(GroupType::from_flags(flags), GroupType::Distribution);
        assert_eq!(GroupScope::from_flags(flags), GroupScope::Universal);
    }

    #[test]
    fn test_security_domain_local_group() {
        let flags = Some(-2147483644);
        assert_eq!(GroupType::from_flags(flags), GroupType::Security);
        assert_eq!(GroupScope::from_flags(flags), GroupScope::DomainLocal);
    }

    #[test]
    fn test_absent_group_type() {
        assert_eq!(GroupType::from_flags(None), GroupType::Unknown);
        assert_eq!(GroupScope::from_flags(None), GroupScope::Unknown);
        assert_eq!(GroupScope::from_flags(Some(0)), GroupScope::Unknown);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&GroupScope::DomainLocal).unwrap(),
            "\"domain_local\""
        );
        assert_eq!(GroupType::Security.to_string(), "security");
    }
}
