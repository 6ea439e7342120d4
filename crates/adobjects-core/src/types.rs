//! Directory type definitions
//!
//! Entity kinds and search scopes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schema::{class, ObjectCategory};

/// Kind of directory object the typed layer knows how to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Computer account.
    Computer,
    /// User account (person).
    User,
    /// Security or distribution group.
    Group,
    /// Organizational unit container.
    OrganizationalUnit,
}

impl ObjectKind {
    /// Get all object kinds.
    #[must_use]
    pub fn all() -> &'static [ObjectKind] {
        &[
            ObjectKind::Computer,
            ObjectKind::User,
            ObjectKind::Group,
            ObjectKind::OrganizationalUnit,
        ]
    }

    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Computer => "computer",
            ObjectKind::User => "user",
            ObjectKind::Group => "group",
            ObjectKind::OrganizationalUnit => "organizational_unit",
        }
    }

    /// The structural `objectClass` value of this kind.
    #[must_use]
    pub fn structural_class(&self) -> &'static str {
        match self {
            ObjectKind::Computer => class::COMPUTER,
            ObjectKind::User => class::USER,
            ObjectKind::Group => class::GROUP,
            ObjectKind::OrganizationalUnit => class::ORGANIZATIONAL_UNIT,
        }
    }

    /// Object classes written when creating an entry of this kind.
    #[must_use]
    pub fn creation_classes(&self) -> &'static [&'static str] {
        match self {
            ObjectKind::Computer => &[
                class::TOP,
                class::PERSON,
                class::ORGANIZATIONAL_PERSON,
                class::USER,
                class::COMPUTER,
            ],
            ObjectKind::User => &[
                class::TOP,
                class::PERSON,
                class::ORGANIZATIONAL_PERSON,
                class::USER,
            ],
            ObjectKind::Group => &[class::TOP, class::GROUP],
            ObjectKind::OrganizationalUnit => &[class::TOP, class::ORGANIZATIONAL_UNIT],
        }
    }

    /// Classify a set of `objectClass` values.
    ///
    /// `computer` derives from `user` in Active Directory, so it is checked
    /// first. A `user` that is not a person (by category, when present) is
    /// not classified as [`ObjectKind::User`].
    pub fn classify<'a>(
        classes: impl IntoIterator<Item = &'a str>,
        category: Option<&str>,
    ) -> Option<ObjectKind> {
        let classes: Vec<&str> = classes.into_iter().collect();
        let has = |name: &str| classes.iter().any(|c| c.eq_ignore_ascii_case(name));

        if has(class::COMPUTER) {
            Some(ObjectKind::Computer)
        } else if has(class::USER) {
            match category {
                Some(cat) if !ObjectCategory::is_person(cat) => None,
                _ => Some(ObjectKind::User),
            }
        } else if has(class::GROUP) {
            Some(ObjectKind::Group)
        } else if has(class::ORGANIZATIONAL_UNIT) {
            Some(ObjectKind::OrganizationalUnit)
        } else {
            None
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ParseObjectKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "computer" => Ok(ObjectKind::Computer),
            "user" => Ok(ObjectKind::User),
            "group" => Ok(ObjectKind::Group),
            "organizational_unit" | "organizationalunit" | "ou" => {
                Ok(ObjectKind::OrganizationalUnit)
            }
            _ => Err(ParseObjectKindError(s.to_string())),
        }
    }
}

/// Error parsing object kind from string.
#[derive(Debug, Clone)]
pub struct ParseObjectKindError(String);

impl fmt::Display for ParseObjectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid object kind '{}', expected one of: computer, user, group, organizational_unit",
            self.0
        )
    }
}

impl std::error::Error for ParseObjectKindError {}

/// How far below the base DN a search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Only the base entry itself.
    Base,
    /// Direct children of the base entry.
    OneLevel,
    /// The base entry and everything below it.
    #[default]
    Subtree,
}
