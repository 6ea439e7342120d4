//! Attribute type adapters
//!
//! Pure conversions from a raw [`AttributeValue`] to the typed values the
//! entity layer exposes. Absent attributes always map to an empty value;
//! only malformed data produces an error. Callers cache the results.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::entry::AttributeValue;
use crate::error::{DirectoryError, DirectoryResult};
use crate::sid::Sid;

/// First scalar of the attribute, or `""` when absent.
pub fn single_line(value: Option<&AttributeValue>) -> String {
    value
        .and_then(AttributeValue::first)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Every scalar of the attribute in store order, or an empty list when absent.
pub fn multiple_lines(value: Option<&AttributeValue>) -> Vec<String> {
    value
        .map(|v| v.as_strings().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Canonical text form of a SID attribute, or `""` when absent.
///
/// Binary values are decoded; textual values (some stores return the SID
/// already rendered) are validated and re-rendered canonically.
pub fn sid(attribute: &str, value: Option<&AttributeValue>) -> DirectoryResult<String> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(String::new());
    };

    let sid = match value.as_bytes() {
        Some(bytes) => Sid::from_bytes(bytes),
        None => match value.first() {
            Some(text) => text.parse::<Sid>(),
            None => return Ok(String::new()),
        },
    }
    .map_err(|e| match e {
        DirectoryError::Decode { message, .. } => DirectoryError::decode(attribute, message),
        other => other,
    })?;

    Ok(sid.to_string())
}

/// Hyphenated text form of a GUID attribute, or `""` when absent.
///
/// Active Directory stores `objectGUID` with the first three fields in
/// little-endian order.
pub fn guid(attribute: &str, value: Option<&AttributeValue>) -> DirectoryResult<String> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(String::new());
    };

    match value.as_bytes() {
        Some(bytes) => {
            let bytes: [u8; 16] = bytes.try_into().map_err(|_| {
                DirectoryError::decode(
                    attribute,
                    format!("GUID must be 16 bytes, got {}", bytes.len()),
                )
            })?;
            Ok(Uuid::from_bytes_le(bytes).to_string())
        }
        None => {
            let text = value.first().unwrap_or_default();
            Uuid::parse_str(text)
                .map(|u| u.to_string())
                .map_err(|e| DirectoryError::decode(attribute, e.to_string()))
        }
    }
}

/// First scalar parsed as an integer, or `None` when absent.
pub fn integer(attribute: &str, value: Option<&AttributeValue>) -> DirectoryResult<Option<i64>> {
    match value.and_then(AttributeValue::first) {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => text.trim().parse::<i64>().map(Some).map_err(|_| {
            DirectoryError::decode(attribute, format!("'{text}' is not an integer"))
        }),
    }
}

/// First scalar parsed as LDAP generalized time (`20240115103000.0Z`), or
/// `None` when absent.
pub fn generalized_time(
    attribute: &str,
    value: Option<&AttributeValue>,
) -> DirectoryResult<Option<DateTime<Utc>>> {
    let Some(text) = value.and_then(AttributeValue::first).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let trimmed = text.strip_suffix('Z').ok_or_else(|| {
        DirectoryError::decode(attribute, format!("'{text}' is not a UTC generalized time"))
    })?;
    let seconds = trimmed.split(|c: char| c == '.' || c == ',').next().unwrap_or(trimmed);

    NaiveDateTime::parse_from_str(seconds, "%Y%m%d%H%M%S")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| DirectoryError::decode(attribute, format!("'{text}': {e}")))
}
