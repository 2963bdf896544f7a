//! # `format` — Named String Predicates
//!
//! Only strings are checked; every other kind passes. Unknown format
//! names are defined to pass — the keyword is an open extension point.

use serde_json::{Map, Value};

use conforma_core::{ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation};

/// The `format` keyword.
pub fn format(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(name) = schema.get("format").and_then(Value::as_str) else {
        return Validation::ok();
    };
    let Some(s) = value.as_str() else {
        return Validation::ok();
    };
    if satisfies(name, s) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Format,
        ctx.path.clone(),
        InvalidDetail::Format(name.to_string()),
    ))
}

fn satisfies(name: &str, s: &str) -> bool {
    match name {
        "date" => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        "date-time" => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        "time" => is_time(s),
        "email" => is_email(s),
        "hostname" => is_hostname(s),
        "uri" | "url" => url::Url::parse(s).is_ok(),
        "uuid" => uuid::Uuid::parse_str(s).is_ok(),
        "json-pointer" => is_json_pointer(s),
        "relative-json-pointer" => is_relative_json_pointer(s),
        "ipv4" => s.parse::<std::net::Ipv4Addr>().is_ok(),
        "ipv6" => s.parse::<std::net::Ipv6Addr>().is_ok(),
        "regex" => regex::Regex::new(s).is_ok(),
        // Unknown format names pass.
        _ => true,
    }
}

/// RFC 3339 partial/full time: `HH:MM:SS[.fff][Z|±hh:mm]`.
fn is_time(s: &str) -> bool {
    let (clock, offset) = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(clock) => (clock, None),
        None => match s.char_indices().find(|(i, c)| *i >= 8 && (*c == '+' || *c == '-')) {
            Some((i, _)) => (&s[..i], Some(&s[i..])),
            None => (s, None),
        },
    };
    if chrono::NaiveTime::parse_from_str(clock, "%H:%M:%S%.f").is_err() {
        return false;
    }
    match offset {
        None => true,
        Some(o) => {
            let bytes = o.as_bytes();
            o.len() == 6
                && (bytes[0] == b'+' || bytes[0] == b'-')
                && o[1..3].parse::<u8>().is_ok_and(|h| h < 24)
                && bytes[3] == b':'
                && o[4..6].parse::<u8>().is_ok_and(|m| m < 60)
        }
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !local.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && is_hostname(domain)
}

fn is_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn is_json_pointer(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if !s.starts_with('/') {
        return false;
    }
    valid_escapes(s)
}

fn is_relative_json_pointer(s: &str) -> bool {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return false;
    }
    let rest = &s[digits.len()..];
    rest.is_empty() || rest == "#" || is_json_pointer(rest)
}

/// Every `~` must introduce a `~0` or `~1` escape.
fn valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'~' {
            if i + 1 >= bytes.len() || !(bytes[i + 1] == b'0' || bytes[i + 1] == b'1') {
                return false;
            }
            i += 1;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_and_times() {
        assert!(satisfies("date", "2020-02-29"));
        assert!(!satisfies("date", "2021-02-29"));
        assert!(satisfies("date-time", "2020-01-01T10:05:08Z"));
        assert!(satisfies("date-time", "2020-01-01T10:05:08.123+05:00"));
        assert!(!satisfies("date-time", "2020-01-01 10:05:08"));
        assert!(satisfies("time", "10:05:08"));
        assert!(satisfies("time", "10:05:08Z"));
        assert!(satisfies("time", "10:05:08.5+01:30"));
        assert!(!satisfies("time", "25:05:08"));
        assert!(!satisfies("time", "10:05:08+1:30"));
    }

    #[test]
    fn test_email_and_hostname() {
        assert!(satisfies("email", "a@example.com"));
        assert!(!satisfies("email", "not-an-email"));
        assert!(!satisfies("email", "a b@example.com"));
        assert!(satisfies("hostname", "example.com"));
        assert!(satisfies("hostname", "a-b.example"));
        assert!(!satisfies("hostname", "-leading.example"));
        assert!(!satisfies("hostname", "under_score.example"));
    }

    #[test]
    fn test_uri_uuid_ip() {
        assert!(satisfies("uri", "https://example.com/a?b=1"));
        assert!(!satisfies("uri", "not a uri"));
        assert!(satisfies("uuid", "550e8400-e29b-41d4-a716-446655440000"));
        assert!(!satisfies("uuid", "550e8400"));
        assert!(satisfies("ipv4", "192.168.0.1"));
        assert!(!satisfies("ipv4", "192.168.0.256"));
        assert!(satisfies("ipv6", "::1"));
        assert!(!satisfies("ipv6", "::zz"));
    }

    #[test]
    fn test_json_pointers() {
        assert!(satisfies("json-pointer", ""));
        assert!(satisfies("json-pointer", "/a/b~0c/~1d"));
        assert!(!satisfies("json-pointer", "a/b"));
        assert!(!satisfies("json-pointer", "/bad~2escape"));
        assert!(satisfies("relative-json-pointer", "0"));
        assert!(satisfies("relative-json-pointer", "1/a"));
        assert!(satisfies("relative-json-pointer", "2#"));
        assert!(!satisfies("relative-json-pointer", "01"));
        assert!(!satisfies("relative-json-pointer", "#"));
    }

    #[test]
    fn test_unknown_formats_pass() {
        assert!(satisfies("postal-code-of-atlantis", "whatever"));
    }

    #[test]
    fn test_regex_format() {
        assert!(satisfies("regex", "^a+b*$"));
        assert!(!satisfies("regex", "("));
    }
}
