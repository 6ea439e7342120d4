//! Security identifier codec
//!
//! Binary layout (MS-DTYP 2.4.2.2):
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 1 | revision (always 1) |
//! | 1 | 1 | sub-authority count (0..=15) |
//! | 2 | 6 | identifier authority, big-endian |
//! | 8 | 4 * count | sub-authorities, little-endian u32 |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DirectoryError, DirectoryResult};
use crate::schema::attr;

const SID_REVISION: u8 = 1;
const MAX_SUB_AUTHORITIES: usize = 15;
const HEADER_LEN: usize = 8;

/// A decoded security identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sid {
    revision: u8,
    authority: u64,
    sub_authorities: Vec<u32>,
}

impl Sid {
    /// Create a revision-1 SID.
    pub fn new(authority: u64, sub_authorities: Vec<u32>) -> DirectoryResult<Self> {
        if authority >= 1 << 48 {
            return Err(decode_error(format!(
                "identifier authority {authority} does not fit in 48 bits"
            )));
        }
        if sub_authorities.len() > MAX_SUB_AUTHORITIES {
            return Err(decode_error(format!(
                "{} sub-authorities exceed the maximum of {MAX_SUB_AUTHORITIES}",
                sub_authorities.len()
            )));
        }
        Ok(Self {
            revision: SID_REVISION,
            authority,
            sub_authorities,
        })
    }

    /// Decode the binary form.
    pub fn from_bytes(bytes: &[u8]) -> DirectoryResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(decode_error(format!(
                "blob of {} bytes is shorter than the {HEADER_LEN}-byte header",
                bytes.len()
            )));
        }

        let revision = bytes[0];
        if revision != SID_REVISION {
            return Err(decode_error(format!(
                "revision {revision} is not supported"
            )));
        }

        let count = bytes[1] as usize;
        if count > MAX_SUB_AUTHORITIES {
            return Err(decode_error(format!(
                "sub-authority count {count} exceeds the maximum of {MAX_SUB_AUTHORITIES}"
            )));
        }

        let expected = HEADER_LEN + 4 * count;
        if bytes.len() != expected {
            return Err(decode_error(format!(
                "blob is {} bytes, expected {expected} for {count} sub-authorities",
                bytes.len()
            )));
        }

        let authority = bytes[2..HEADER_LEN]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

        let sub_authorities = bytes[HEADER_LEN..]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self {
            revision,
            authority,
            sub_authorities,
        })
    }

    /// Encode to the binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + 4 * self.sub_authorities.len());
        bytes.push(self.revision);
        bytes.push(self.sub_authorities.len() as u8);
        bytes.extend_from_slice(&self.authority.to_be_bytes()[2..]);
        for sub in &self.sub_authorities {
            bytes.extend_from_slice(&sub.to_le_bytes());
        }
        bytes
    }

    /// Identifier authority (e.g. 5 for NT Authority).
    pub fn authority(&self) -> u64 {
        self.authority
    }

    /// Sub-authorities in order.
    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Relative identifier (the last sub-authority), if any.
    pub fn rid(&self) -> Option<u32> {
        self.sub_authorities.last().copied()
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-", self.revision)?;
        if self.authority < 1 << 32 {
            write!(f, "{}", self.authority)?;
        } else {
            write!(f, "0x{:012X}", self.authority)?;
        }
        for sub in &self.sub_authorities {
            write!(f, "-{sub}")?;
        }
        Ok(())
    }
}

impl FromStr for Sid {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');

        match parts.next() {
            Some(prefix) if prefix.eq_ignore_ascii_case("S") => {}
            _ => return Err(decode_error(format!("'{s}' does not start with 'S-'"))),
        }

        let revision: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| decode_error(format!("'{s}' has no valid revision")))?;
        if revision != SID_REVISION {
            return Err(decode_error(format!(
                "revision {revision} is not supported"
            )));
        }

        let authority_text = parts
            .next()
            .ok_or_else(|| decode_error(format!("'{s}' has no identifier authority")))?;
        let authority = match authority_text
            .strip_prefix("0x")
            .or_else(|| authority_text.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => authority_text.parse(),
        }
        .map_err(|_| decode_error(format!("invalid identifier authority '{authority_text}'")))?;

        let sub_authorities = parts
            .map(|p| {
                p.parse::<u32>()
                    .map_err(|_| decode_error(format!("invalid sub-authority '{p}'")))
            })
            .collect::<DirectoryResult<Vec<u32>>>()?;

        Sid::new(authority, sub_authorities)
    }
}

fn decode_error(message: String) -> DirectoryError {
    DirectoryError::decode(attr::OBJECT_SID, message)
}
