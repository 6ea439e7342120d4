//! Filter expression tree
//!
//! An immutable boolean expression over attribute predicates that renders to
//! the RFC 4515 string syntax understood by LDAP stores:
//! `(attr=value)`, `(&(..)(..))`, `(|(..)(..))`, `(!(..))`.
//!
//! Values are escaped by the renderer, never by the caller, so any string can
//! be passed to the constructors without opening an injection hole. Empty
//! AND/OR groups are rejected when rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entry::{AttributeValue, RawEntry};
use crate::error::{DirectoryError, DirectoryResult};
use crate::schema::{attr, class, ObjectCategory};
use crate::sid::Sid;
use crate::types::ObjectKind;

/// Filter for search operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Match objects where attribute equals value.
    Equals { attribute: String, value: String },

    /// Match objects where attribute exists (has any value).
    Present { attribute: String },

    /// Match objects where attribute starts with value.
    StartsWith { attribute: String, value: String },

    /// Match objects where attribute ends with value.
    EndsWith { attribute: String, value: String },

    /// Match objects where attribute contains value (substring).
    Contains { attribute: String, value: String },

    /// Match objects where attribute is greater than or equal to value.
    GreaterOrEqual { attribute: String, value: String },

    /// Match objects where attribute is less than or equal to value.
    LessOrEqual { attribute: String, value: String },

    /// Logical AND of multiple filters.
    And { filters: Vec<Filter> },

    /// Logical OR of multiple filters.
    Or { filters: Vec<Filter> },

    /// Logical NOT of a filter.
    Not { filter: Box<Filter> },
}

impl Filter {
    /// Create an equals filter.
    pub fn eq(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an `objectClass` equality test.
    pub fn object_class(class: impl Into<String>) -> Self {
        Filter::eq(attr::OBJECT_CLASS, class)
    }

    /// Create a present (attribute exists) filter.
    pub fn present(attribute: impl Into<String>) -> Self {
        Filter::Present {
            attribute: attribute.into(),
        }
    }

    /// Create a starts-with filter.
    pub fn starts_with(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::StartsWith {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an ends-with filter.
    pub fn ends_with(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::EndsWith {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a contains filter.
    pub fn contains(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a greater-or-equal filter.
    pub fn greater_or_equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::GreaterOrEqual {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a less-or-equal filter.
    pub fn less_or_equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::LessOrEqual {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an AND filter.
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    /// Create an OR filter.
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { filters }
    }

    /// Create a NOT filter (negation).
    pub fn negate(filter: Filter) -> Self {
        Filter::Not {
            filter: Box::new(filter),
        }
    }

    /// Combine this filter with another using AND.
    pub fn and_with(self, other: Filter) -> Self {
        match self {
            Filter::And { mut filters } => {
                filters.push(other);
                Filter::And { filters }
            }
            _ => Filter::And {
                filters: vec![self, other],
            },
        }
    }

    /// Combine this filter with another using OR.
    pub fn or_with(self, other: Filter) -> Self {
        match self {
            Filter::Or { mut filters } => {
                filters.push(other);
                Filter::Or { filters }
            }
            _ => Filter::Or {
                filters: vec![self, other],
            },
        }
    }

    /// `(objectClass=computer)`
    pub fn is_computer() -> Self {
        Filter::object_class(class::COMPUTER)
    }

    /// `(&(objectClass=user)(objectCategory=person))`
    ///
    /// Computer accounts also carry `objectClass=user`; the category test
    /// keeps them out.
    pub fn is_user() -> Self {
        Filter::and(vec![
            Filter::object_class(class::USER),
            Filter::eq(attr::OBJECT_CATEGORY, ObjectCategory::PERSON),
        ])
    }

    /// `(objectClass=group)`
    pub fn is_group() -> Self {
        Filter::object_class(class::GROUP)
    }

    /// `(objectClass=organizationalUnit)`
    pub fn is_organizational_unit() -> Self {
        Filter::object_class(class::ORGANIZATIONAL_UNIT)
    }

    /// Structural predicate for an entity kind.
    pub fn of_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Computer => Filter::is_computer(),
            ObjectKind::User => Filter::is_user(),
            ObjectKind::Group => Filter::is_group(),
            ObjectKind::OrganizationalUnit => Filter::is_organizational_unit(),
        }
    }

    /// Render to the LDAP string form.
    ///
    /// Fails with [`DirectoryError::InvalidFilter`] on empty AND/OR groups, on
    /// empty substring values and on attribute names that are not valid LDAP
    /// attribute descriptions.
    pub fn to_ldap(&self) -> DirectoryResult<String> {
        let mut out = String::new();
        self.render(&mut out)?;
        Ok(out)
    }

    fn render(&self, out: &mut String) -> DirectoryResult<()> {
        match self {
            Filter::And { filters } => Self::render_group(out, '&', filters),
            Filter::Or { filters } => Self::render_group(out, '|', filters),
            Filter::Not { filter } => {
                out.push_str("(!");
                filter.render(out)?;
                out.push(')');
                Ok(())
            }
            Filter::Present { attribute } => {
                check_attribute(attribute)?;
                out.push_str(&format!("({attribute}=*)"));
                Ok(())
            }
            Filter::Equals { attribute, value } => {
                Self::render_item(out, attribute, "=", "", value, "")
            }
            Filter::StartsWith { attribute, value } => {
                check_substring(attribute, value)?;
                Self::render_item(out, attribute, "=", "", value, "*")
            }
            Filter::EndsWith { attribute, value } => {
                check_substring(attribute, value)?;
                Self::render_item(out, attribute, "=", "*", value, "")
            }
            Filter::Contains { attribute, value } => {
                check_substring(attribute, value)?;
                Self::render_item(out, attribute, "=", "*", value, "*")
            }
            Filter::GreaterOrEqual { attribute, value } => {
                Self::render_item(out, attribute, ">=", "", value, "")
            }
            Filter::LessOrEqual { attribute, value } => {
                Self::render_item(out, attribute, "<=", "", value, "")
            }
        }
    }

    fn render_group(out: &mut String, op: char, filters: &[Filter]) -> DirectoryResult<()> {
        if filters.is_empty() {
            return Err(DirectoryError::invalid_filter(format!(
                "'{op}' group must have at least one member"
            )));
        }
        out.push('(');
        out.push(op);
        for filter in filters {
            filter.render(out)?;
        }
        out.push(')');
        Ok(())
    }

    fn render_item(
        out: &mut String,
        attribute: &str,
        op: &str,
        before: &str,
        value: &str,
        after: &str,
    ) -> DirectoryResult<()> {
        check_attribute(attribute)?;
        out.push('(');
        out.push_str(attribute);
        out.push_str(op);
        out.push_str(before);
        out.push_str(&escape_filter_value(value));
        out.push_str(after);
        out.push(')');
        Ok(())
    }

    /// Parse an LDAP filter string into a tree.
    ///
    /// Accepts the forms this module renders. Approximate matches and
    /// substring patterns with more than one inner wildcard are rejected.
    pub fn parse(input: &str) -> DirectoryResult<Filter> {
        let mut parser = Parser {
            input: input.trim().as_bytes(),
            pos: 0,
            depth: 0,
        };
        let filter = parser.filter()?;
        if parser.pos != parser.input.len() {
            return Err(DirectoryError::invalid_filter(format!(
                "unexpected trailing input at offset {} in '{input}'",
                parser.pos
            )));
        }
        Ok(filter)
    }

    /// Evaluate the filter against a raw entry.
    ///
    /// Attribute names and string values compare case-insensitively. Binary
    /// SID values match their text form.
    pub fn matches(&self, entry: &RawEntry) -> bool {
        match self {
            Filter::And { filters } => filters.iter().all(|f| f.matches(entry)),
            Filter::Or { filters } => filters.iter().any(|f| f.matches(entry)),
            Filter::Not { filter } => !filter.matches(entry),
            Filter::Present { attribute } => {
                attribute.eq_ignore_ascii_case(attr::DISTINGUISHED_NAME) || entry.has(attribute)
            }
            Filter::Equals { attribute, value } => {
                if attribute.eq_ignore_ascii_case(attr::DISTINGUISHED_NAME)
                    && entry.dn().eq_ignore_ascii_case(value)
                {
                    return true;
                }
                let category = attribute.eq_ignore_ascii_case(attr::OBJECT_CATEGORY);
                match entry.get(attribute) {
                    Some(v @ (AttributeValue::Binary(_) | AttributeValue::BinaryArray(_))) => v
                        .as_byte_values()
                        .into_iter()
                        .any(|bytes| binary_equals(bytes, value)),
                    Some(v) => v.as_strings().iter().any(|s| {
                        s.eq_ignore_ascii_case(value)
                            || (category
                                && ObjectCategory::short_name(s).eq_ignore_ascii_case(value))
                    }),
                    None => false,
                }
            }
            Filter::StartsWith { attribute, value } => {
                let needle = value.to_lowercase();
                text_values(entry, attribute).any(|s| s.starts_with(&needle))
            }
            Filter::EndsWith { attribute, value } => {
                let needle = value.to_lowercase();
                text_values(entry, attribute).any(|s| s.ends_with(&needle))
            }
            Filter::Contains { attribute, value } => {
                let needle = value.to_lowercase();
                text_values(entry, attribute).any(|s| s.contains(&needle))
            }
            Filter::GreaterOrEqual { attribute, value } => {
                text_values(entry, attribute).any(|s| compare(&s, value).is_ge())
            }
            Filter::LessOrEqual { attribute, value } => {
                text_values(entry, attribute).any(|s| compare(&s, value).is_le())
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_ldap() {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("<invalid filter>"),
        }
    }
}

/// Escape special characters in LDAP filter values (RFC 4515).
///
/// Characters that must be escaped: * ( ) \ NUL
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// Attribute descriptions: a name or OID, optionally followed by `;options`.
fn check_attribute(attribute: &str) -> DirectoryResult<()> {
    let valid = !attribute.is_empty()
        && attribute
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ';' | '_'));
    if valid {
        Ok(())
    } else {
        Err(DirectoryError::invalid_filter(format!(
            "invalid attribute name '{attribute}'"
        )))
    }
}

fn check_substring(attribute: &str, value: &str) -> DirectoryResult<()> {
    if value.is_empty() {
        return Err(DirectoryError::invalid_filter(format!(
            "substring match on '{attribute}' needs a value"
        )));
    }
    Ok(())
}

fn text_values<'a>(entry: &'a RawEntry, attribute: &str) -> impl Iterator<Item = String> + 'a {
    entry
        .get(attribute)
        .map(|v| v.as_strings())
        .unwrap_or_default()
        .into_iter()
        .map(str::to_lowercase)
}

fn binary_equals(bytes: &[u8], value: &str) -> bool {
    if let Ok(sid) = Sid::from_bytes(bytes) {
        if sid.to_string().eq_ignore_ascii_case(value) {
            return true;
        }
    }
    bytes == value.as_bytes()
}

fn compare(stored: &str, value: &str) -> std::cmp::Ordering {
    match (stored.trim().parse::<i64>(), value.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => stored.to_lowercase().cmp(&value.to_lowercase()),
    }
}

/// Deepest nesting of `&`, `|` and `!` that [`Filter::parse`] accepts.
const MAX_PARSE_DEPTH: usize = 64;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> DirectoryResult<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(DirectoryError::invalid_filter(format!(
                "expected '{}' at offset {}, found '{}'",
                byte as char, self.pos, b as char
            ))),
            None => Err(DirectoryError::invalid_filter(format!(
                "expected '{}' at end of input",
                byte as char
            ))),
        }
    }

    fn filter(&mut self) -> DirectoryResult<Filter> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(DirectoryError::invalid_filter(format!(
                "filter nesting exceeds {MAX_PARSE_DEPTH} levels"
            )));
        }
        self.expect(b'(')?;
        let filter = match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                Filter::And {
                    filters: self.filter_list('&')?,
                }
            }
            Some(b'|') => {
                self.pos += 1;
                Filter::Or {
                    filters: self.filter_list('|')?,
                }
            }
            Some(b'!') => {
                self.pos += 1;
                Filter::negate(self.filter()?)
            }
            _ => self.item()?,
        };
        self.expect(b')')?;
        self.depth -= 1;
        Ok(filter)
    }

    fn filter_list(&mut self, op: char) -> DirectoryResult<Vec<Filter>> {
        let mut filters = Vec::new();
        while self.peek() == Some(b'(') {
            filters.push(self.filter()?);
        }
        if filters.is_empty() {
            return Err(DirectoryError::invalid_filter(format!(
                "'{op}' group must have at least one member"
            )));
        }
        Ok(filters)
    }

    fn item(&mut self) -> DirectoryResult<Filter> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b'=' | b'>' | b'<' | b'~' | b'(' | b')') {
                break;
            }
            self.pos += 1;
        }
        let attribute = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| DirectoryError::invalid_filter("attribute name is not UTF-8"))?
            .to_string();
        check_attribute(&attribute)?;

        let op = match (self.peek(), self.input.get(self.pos + 1).copied()) {
            (Some(b'='), _) => {
                self.pos += 1;
                "="
            }
            (Some(b'>'), Some(b'=')) => {
                self.pos += 2;
                ">="
            }
            (Some(b'<'), Some(b'=')) => {
                self.pos += 2;
                "<="
            }
            (Some(b'~'), Some(b'=')) => {
                return Err(DirectoryError::invalid_filter(
                    "approximate match is not supported",
                ))
            }
            _ => {
                return Err(DirectoryError::invalid_filter(format!(
                    "missing operator after '{attribute}'"
                )))
            }
        };

        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b')' || b == b'(' {
                break;
            }
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];

        match op {
            ">=" => Ok(Filter::greater_or_equal(attribute, unescape(raw)?)),
            "<=" => Ok(Filter::less_or_equal(attribute, unescape(raw)?)),
            _ => Self::equality_or_substring(attribute, raw),
        }
    }

    fn equality_or_substring(attribute: String, raw: &[u8]) -> DirectoryResult<Filter> {
        if raw == b"*" {
            return Ok(Filter::present(attribute));
        }

        let parts: Vec<&[u8]> = raw.split(|b| *b == b'*').collect();
        match parts.as_slice() {
            [value] => Ok(Filter::eq(attribute, unescape(value)?)),
            [initial, final_] if final_.is_empty() && !initial.is_empty() => {
                Ok(Filter::starts_with(attribute, unescape(initial)?))
            }
            [initial, final_] if initial.is_empty() && !final_.is_empty() => {
                Ok(Filter::ends_with(attribute, unescape(final_)?))
            }
            [initial, any, final_] if initial.is_empty() && final_.is_empty() && !any.is_empty() => {
                Ok(Filter::contains(attribute, unescape(any)?))
            }
            _ => Err(DirectoryError::invalid_filter(format!(
                "unsupported substring pattern for '{attribute}'"
            ))),
        }
    }
}

fn unescape(raw: &[u8]) -> DirectoryResult<String> {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' {
            let hex = raw
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| DirectoryError::invalid_filter("invalid escape sequence"))?;
            bytes.push(hex);
            i += 3;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8(bytes).map_err(|_| DirectoryError::invalid_filter("value is not UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_to_ldap_equals() {
        let filter = Filter::eq("cn", "John Doe");
        assert_eq!(filter.to_ldap().unwrap(), "(cn=John Doe)");
    }

    #[test]
    fn test_kind_and_name_is_deterministic() {
        let filter = Filter::and(vec![Filter::is_computer(), Filter::eq("cn", "X")]);
        let first = filter.to_ldap().unwrap();
        assert_eq!(first, "(&(objectClass=computer)(cn=X))");
        assert_eq!(filter.to_ldap().unwrap(), first);
        assert_eq!(filter.to_string(), first);
    }

    #[test]
    fn test_filter_to_ldap_or() {
        let filter = Filter::or(vec![Filter::eq("cn", "John"), Filter::eq("cn", "Jane")]);
        assert_eq!(filter.to_ldap().unwrap(), "(|(cn=John)(cn=Jane))");
    }

    #[test]
    fn test_filter_to_ldap_not() {
        let filter = Filter::negate(Filter::eq("status", "disabled"));
        assert_eq!(filter.to_ldap().unwrap(), "(!(status=disabled))");
    }

    #[test]
    fn test_filter_to_ldap_substrings() {
        assert_eq!(
            Filter::contains("mail", "example.com").to_ldap().unwrap(),
            "(mail=*example.com*)"
        );
        assert_eq!(
            Filter::starts_with("cn", "John").to_ldap().unwrap(),
            "(cn=John*)"
        );
        assert_eq!(
            Filter::ends_with("cn", "Doe").to_ldap().unwrap(),
            "(cn=*Doe)"
        );
        assert_eq!(Filter::present("mail").to_ldap().unwrap(), "(mail=*)");
        assert_eq!(
            Filter::greater_or_equal("uSNChanged", "1000").to_ldap().unwrap(),
            "(uSNChanged>=1000)"
        );
    }

    #[test]
    fn test_structural_predicates() {
        assert_eq!(
            Filter::is_user().to_ldap().unwrap(),
            "(&(objectClass=user)(objectCategory=person))"
        );
        assert_eq!(
            Filter::is_organizational_unit().to_ldap().unwrap(),
            "(objectClass=organizationalUnit)"
        );
        assert_eq!(Filter::of_kind(ObjectKind::Group), Filter::is_group());
    }

    #[test]
    fn test_escaping() {
        let rendered = Filter::eq("cn", "a*b(c)").to_ldap().unwrap();
        assert_eq!(rendered, "(cn=a\\2ab\\28c\\29)");
        assert_eq!(rendered.matches('(').count(), rendered.matches(')').count());

        assert_eq!(escape_filter_value("a\\b"), "a\\5cb");
        assert_eq!(escape_filter_value("nul\0"), "nul\\00");
    }

    #[test]
    fn test_injection_attempt_stays_balanced() {
        let filter = Filter::and(vec![
            Filter::is_computer(),
            Filter::eq("cn", "*)(objectClass=*"),
        ]);
        let rendered = filter.to_ldap().unwrap();
        assert_eq!(
            rendered,
            "(&(objectClass=computer)(cn=\\2a\\29\\28objectClass=\\2a))"
        );
        assert_eq!(rendered.matches('(').count(), rendered.matches(')').count());
    }

    #[test]
    fn test_empty_groups_rejected() {
        let err = Filter::and(vec![]).to_ldap().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FILTER");
        assert!(Filter::or(vec![]).to_ldap().is_err());

        let nested = Filter::negate(Filter::and(vec![Filter::is_group(), Filter::or(vec![])]));
        assert!(nested.to_ldap().is_err());
        assert_eq!(nested.to_string(), "<invalid filter>");
    }

    #[test]
    fn test_empty_substring_rejected() {
        for filter in [
            Filter::contains("cn", ""),
            Filter::starts_with("cn", ""),
            Filter::ends_with("cn", ""),
        ] {
            let err = filter.to_ldap().unwrap_err();
            assert_eq!(err.error_code(), "INVALID_FILTER");
        }

        let nested = Filter::is_user().and_with(Filter::contains("mail", ""));
        assert!(nested.to_ldap().is_err());
        assert_eq!(Filter::present("cn").to_ldap().unwrap(), "(cn=*)");
    }

    #[test]
    fn test_parse_depth_is_bounded() {
        let nested = |depth: usize| format!("{}(cn=x){}", "(!".repeat(depth), ")".repeat(depth));

        assert!(Filter::parse(&nested(MAX_PARSE_DEPTH - 1)).is_ok());

        let err = Filter::parse(&nested(10_000)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FILTER");
    }

    #[test]
    fn test_invalid_attribute_rejected() {
        assert!(Filter::eq("", "x").to_ldap().is_err());
        assert!(Filter::eq("cn)(uid", "x").to_ldap().is_err());
        assert!(Filter::present("msDS-SiteName").to_ldap().is_ok());
    }

    #[test]
    fn test_and_with_flattens() {
        let filter = Filter::eq("a", "1")
            .and_with(Filter::eq("b", "2"))
            .and_with(Filter::eq("c", "3"));
        if let Filter::And { filters } = filter {
            assert_eq!(filters.len(), 3);
        } else {
            panic!("Expected AND filter");
        }
    }

    #[test]
    fn test_complex_filter() {
        let filter = Filter::and(vec![
            Filter::object_class("user"),
            Filter::or(vec![
                Filter::eq("department", "IT"),
                Filter::eq("department", "Engineering"),
            ]),
            Filter::negate(Filter::eq("status", "inactive")),
            Filter::present("mail"),
        ]);

        let expected =
            "(&(objectClass=user)(|(department=IT)(department=Engineering))(!(status=inactive))(mail=*))";
        assert_eq!(filter.to_ldap().unwrap(), expected);
    }

    #[test]
    fn test_parse_rendered_filter() {
        let filter = Filter::and(vec![
            Filter::is_user(),
            Filter::or(vec![
                Filter::starts_with("cn", "Jo"),
                Filter::ends_with("mail", "@example.com"),
                Filter::contains("title", "engineer"),
            ]),
            Filter::negate(Filter::present("manager")),
            Filter::eq("description", "a*b(c)\\d"),
            Filter::less_or_equal("badPwdCount", "3"),
        ]);

        let rendered = filter.to_ldap().unwrap();
        assert_eq!(Filter::parse(&rendered).unwrap(), filter);
    }

    #[test]
    fn test_parse_configured_filter() {
        let filter = Filter::parse("(&(objectClass=user)(objectCategory=person))").unwrap();
        assert_eq!(filter, Filter::is_user());
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "cn=x",
            "(cn=x",
            "(&)",
            "(|)",
            "(cn~=x)",
            "(cn=a*b*c)",
            "(cn=x)(cn=y)",
            "(cn=\\zz)",
            "(=x)",
        ] {
            let err = Filter::parse(bad).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_FILTER", "input: {bad:?}");
        }
    }

    #[test]
    fn test_matches() {
        let entry = RawEntry::new("CN=PC01,OU=Computers,DC=example,DC=com")
            .with("objectClass", vec!["top", "user", "computer"])
            .with("cn", "PC01")
            .with("operatingSystem", "Windows Server 2019")
            .with("logonCount", "42");

        assert!(Filter::is_computer().matches(&entry));
        assert!(Filter::eq("CN", "pc01").matches(&entry));
        assert!(Filter::contains("operatingSystem", "server").matches(&entry));
        assert!(Filter::starts_with("operatingSystem", "windows").matches(&entry));
        assert!(Filter::greater_or_equal("logonCount", "9").matches(&entry));
        assert!(!Filter::less_or_equal("logonCount", "9").matches(&entry));
        assert!(Filter::eq("distinguishedName", "cn=pc01,ou=computers,dc=example,dc=com")
            .matches(&entry));
        assert!(!Filter::is_user().matches(&entry));
        assert!(Filter::negate(Filter::present("mail")).matches(&entry));
    }

    #[test]
    fn test_matches_object_category_short_name() {
        let entry = RawEntry::new("CN=Jane,DC=example,DC=com")
            .with("objectClass", vec!["top", "person", "user"])
            .with(
                "objectCategory",
                "CN=Person,CN=Schema,CN=Configuration,DC=example,DC=com",
            );
        assert!(Filter::is_user().matches(&entry));
    }

    #[test]
    fn test_matches_binary_sid() {
        let sid: Sid = "S-1-5-21-1-2-3-500".parse().unwrap();
        let entry = RawEntry::new("CN=Administrator,DC=example,DC=com")
            .with("objectSid", AttributeValue::binary(sid.to_bytes()));

        assert!(Filter::eq("objectSid", "S-1-5-21-1-2-3-500").matches(&entry));
        assert!(!Filter::eq("objectSid", "S-1-5-21-1-2-3-501").matches(&entry));
    }

    #[test]
    fn test_filter_serialization() {
        let filter = Filter::and(vec![Filter::is_group(), Filter::eq("cn", "Admins")]);
        let json = serde_json::to_string(&filter).unwrap();
        let parsed: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, filter);
    }
}
