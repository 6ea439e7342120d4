//! Distinguished name helpers (RFC 4514).

/// Escape special characters in DN attribute values per RFC 4514.
///
/// DN escaping is different from filter escaping. Characters that must be escaped:
/// - Leading or trailing SPACE (escaped as \20)
/// - Leading # (escaped as \23)
/// - Characters: , + " \ < > ; = (escaped with backslash prefix)
/// - NUL character (escaped as \00)
pub fn escape_dn_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let last = value.chars().count() - 1;
    let mut result = String::with_capacity(value.len() * 2);

    for (i, ch) in value.chars().enumerate() {
        match ch {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                result.push('\\');
                result.push(ch);
            }
            '\0' => result.push_str("\\00"),
            ' ' if i == 0 || i == last => result.push_str("\\20"),
            '#' if i == 0 => result.push_str("\\23"),
            _ => result.push(ch),
        }
    }

    result
}

/// Reverse [`escape_dn_value`]: `\XX` hex pairs and `\c` escapes.
pub fn unescape_dn_value(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            match hex {
                Some(b) => {
                    out.push(b);
                    i += 3;
                }
                None => {
                    out.push(bytes[i + 1]);
                    i += 2;
                }
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Attribute name and unescaped value of the first RDN of `dn`.
pub fn rdn_parts(dn: &str) -> Option<(&str, String)> {
    let (head, _) = split_rdn(dn);
    let (name, value) = head.split_once('=')?;
    Some((name.trim(), unescape_dn_value(value.trim())))
}

/// Build a relative distinguished name, escaping the value.
pub fn rdn(attribute: &str, value: &str) -> String {
    format!("{}={}", attribute, escape_dn_value(value))
}

/// Split a DN into its first RDN and the parent DN.
///
/// Commas escaped with a backslash do not split.
pub fn split_rdn(dn: &str) -> (&str, Option<&str>) {
    let bytes = dn.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b',' => return (dn[..i].trim(), Some(dn[i + 1..].trim())),
            _ => i += 1,
        }
    }
    (dn.trim(), None)
}

/// Parent DN, or `None` for a single-RDN name.
pub fn parent_dn(dn: &str) -> Option<&str> {
    split_rdn(dn).1
}

/// Case-insensitive DN equality, ignoring spaces around separators.
pub fn dn_eq(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Check whether `dn` is `base` or sits anywhere below it.
pub fn is_within(dn: &str, base: &str) -> bool {
    let dn = normalize(dn);
    let base = normalize(base);
    base.is_empty() || dn == base || dn.ends_with(&format!(",{base}"))
}

/// Lower-case a DN and drop whitespace around `,` and `=` separators.
pub fn normalize(dn: &str) -> String {
    let mut parts = Vec::new();
    let mut rest = Some(dn);
    while let Some(current) = rest {
        let (head, tail) = split_rdn(current);
        if !head.is_empty() {
            let component = match head.split_once('=') {
                Some((name, value)) => format!("{}={}", name.trim(), value.trim()),
                None => head.to_string(),
            };
            parts.push(component.to_lowercase());
        }
        rest = tail;
    }
    parts.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dn_value_simple() {
        assert_eq!(escape_dn_value("John Doe"), "John Doe");
        assert_eq!(escape_dn_value("Sales"), "Sales");
    }

    #[test]
    fn test_escape_dn_value_special_chars() {
        assert_eq!(escape_dn_value("a,b"), "a\\,b");
        assert_eq!(escape_dn_value("a+b"), "a\\+b");
        assert_eq!(escape_dn_value("a\"b"), "a\\\"b");
        assert_eq!(escape_dn_value("a\\b"), "a\\\\b");
        assert_eq!(escape_dn_value("a<b"), "a\\<b");
        assert_eq!(escape_dn_value("a>b"), "a\\>b");
        assert_eq!(escape_dn_value("a;b"), "a\\;b");
        assert_eq!(escape_dn_value("a=b"), "a\\=b");
    }

    #[test]
    fn test_escape_dn_value_leading_trailing_space() {
        assert_eq!(escape_dn_value(" admin"), "\\20admin");
        assert_eq!(escape_dn_value("admin "), "admin\\20");
        assert_eq!(escape_dn_value(" admin "), "\\20admin\\20");
    }

    #[test]
    fn test_escape_dn_value_trailing_space_after_multibyte() {
        assert_eq!(escape_dn_value("Zürich "), "Zürich\\20");
    }

    #[test]
    fn test_escape_dn_value_leading_hash() {
        assert_eq!(escape_dn_value("#admin"), "\\23admin");
        assert_eq!(escape_dn_value("admin#1"), "admin#1");
    }

    #[test]
    fn test_escape_dn_value_injection_attempt() {
        let escaped = escape_dn_value("admin,dc=evil,dc=com");
        assert_eq!(escaped, "admin\\,dc\\=evil\\,dc\\=com");
    }

    #[test]
    fn test_escape_dn_value_nul() {
        assert_eq!(escape_dn_value("a\0b"), "a\\00b");
        assert_eq!(escape_dn_value(""), "");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        for value in ["Sales", " lead", "a,b=c", "#1", "Doe\\, John", "x\0y"] {
            assert_eq!(unescape_dn_value(&escape_dn_value(value)), value);
        }
    }

    #[test]
    fn test_rdn_parts() {
        assert_eq!(
            rdn_parts("ou=R\\26D,dc=example,dc=com"),
            Some(("ou", "R&D".to_string()))
        );
        assert_eq!(
            rdn_parts(&format!("{},dc=example,dc=com", rdn("cn", "Doe, John"))),
            Some(("cn", "Doe, John".to_string()))
        );
        assert_eq!(rdn_parts("nonsense"), None);
    }

    #[test]
    fn test_split_rdn() {
        assert_eq!(
            split_rdn("ou=Sales,dc=example,dc=com"),
            ("ou=Sales", Some("dc=example,dc=com"))
        );
        assert_eq!(
            split_rdn("cn=Doe\\, John,ou=Users,dc=example,dc=com"),
            ("cn=Doe\\, John", Some("ou=Users,dc=example,dc=com"))
        );
        assert_eq!(split_rdn("dc=com"), ("dc=com", None));
    }

    #[test]
    fn test_is_within() {
        let base = "DC=example,DC=com";
        assert!(is_within("ou=Sales, dc=example, dc=com", base));
        assert!(is_within("dc=example,dc=com", base));
        assert!(!is_within("dc=other,dc=com", base));
        assert!(!is_within("dc=notexample,dc=com", base));
        assert!(is_within("dc=anything", ""));
    }

    #[test]
    fn test_dn_eq() {
        assert!(dn_eq("OU=Sales,DC=example,DC=com", "ou=sales, dc=example, dc=com"));
        assert!(!dn_eq("ou=Sales,dc=example,dc=com", "ou=Sales,dc=example"));
    }
}
