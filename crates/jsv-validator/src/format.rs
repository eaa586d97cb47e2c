//! # Format Validators
//!
//! The `format` keyword names a string format. Checks are pluggable: a
//! [`FormatRegistry`] maps names to [`FormatValidator`]s, and the engine
//! consults it only for string instances. Whether an unknown name fails is
//! decided by the [`FormatPolicy`](crate::config::FormatPolicy), not here.
//!
//! ## Built-in formats
//!
//! `date-time` (RFC 3339), `date`, `time`, `email`, `hostname`, `ipv4`,
//! `ipv6`, `uri` (absolute), `uri-reference`, `uri-template`,
//! `json-pointer` and `regex`. The draft 3 spellings `ip-address` and
//! `host-name` alias `ipv4` and `hostname`.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDate, NaiveTime};
use jsv_core::JsonPath;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Checks strings against one named format.
pub trait FormatValidator: Send + Sync {
    /// The format name as written in schemas.
    fn name(&self) -> &str;

    /// `None` when `value` conforms, otherwise a message saying why not.
    fn validate(&self, value: &str) -> Option<String>;
}

/// A format backed by a predicate.
struct Builtin {
    name: &'static str,
    check: fn(&str) -> bool,
}

impl FormatValidator for Builtin {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: &str) -> Option<String> {
        if (self.check)(value) {
            None
        } else {
            Some(format!("\"{value}\" is not a valid {}", self.name))
        }
    }
}

/// Format validators by name.
#[derive(Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn FormatValidator>>,
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.formats.keys()).finish()
    }
}

impl FormatRegistry {
    /// A registry with no formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in format.
    pub fn with_defaults() -> Self {
        let builtins: [(&'static str, fn(&str) -> bool); 14] = [
            ("date-time", is_date_time),
            ("date", is_date),
            ("time", is_time),
            ("email", is_email),
            ("hostname", is_hostname),
            ("host-name", is_hostname),
            ("ipv4", is_ipv4),
            ("ip-address", is_ipv4),
            ("ipv6", is_ipv6),
            ("uri", is_uri),
            ("uri-reference", is_uri_reference),
            ("uri-template", is_uri_template),
            ("json-pointer", is_json_pointer),
            ("regex", is_regex),
        ];
        let mut registry = Self::new();
        for (name, check) in builtins {
            registry.register(Box::new(Builtin { name, check }));
        }
        registry
    }

    /// Add `validator`, replacing any registered under the same name.
    pub fn register(&mut self, validator: Box<dyn FormatValidator>) {
        self.formats.insert(validator.name().to_string(), validator);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, validator: impl FormatValidator + 'static) -> Self {
        self.register(Box::new(validator));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn FormatValidator> {
        self.formats.get(name).map(|v| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }
}

// ── Checks ─────────────────────────────────────────────────────────────

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("hard-coded pattern"));

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2})(\.\d+)?([zZ]|[+-]\d{2}:\d{2})?$").expect("hard-coded pattern")
});

static EMAIL_LOCAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("hard-coded pattern")
});

fn is_date_time(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_date(value: &str) -> bool {
    DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn is_time(value: &str) -> bool {
    TIME.captures(value)
        .and_then(|c| c.get(1))
        .is_some_and(|hms| NaiveTime::parse_from_str(hms.as_str(), "%H:%M:%S").is_ok())
}

fn is_email(value: &str) -> bool {
    match value.rsplit_once('@') {
        Some((local, domain)) => {
            local.len() <= 64 && EMAIL_LOCAL.is_match(local) && is_hostname(domain)
        }
        None => false,
    }
}

/// RFC 1123 host names: dot-separated labels of letters, digits and
/// hyphens, 1 to 63 characters each, not starting or ending with a hyphen.
fn is_hostname(value: &str) -> bool {
    let name = value.strip_suffix('.').unwrap_or(value);
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

fn is_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

fn is_ipv6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

fn has_uri_characters(value: &str) -> bool {
    !value.chars().any(|c| c.is_whitespace() || c.is_control() || c == '\\')
}

fn is_uri(value: &str) -> bool {
    has_uri_characters(value) && Url::parse(value).is_ok()
}

fn is_uri_reference(value: &str) -> bool {
    if !has_uri_characters(value) {
        return false;
    }
    if Url::parse(value).is_ok() {
        return true;
    }
    Url::parse("http://reference.invalid/")
        .and_then(|base| base.join(value))
        .is_ok()
}

/// Expressions are `{...}` with a non-empty body; braces do not nest.
fn is_uri_template(value: &str) -> bool {
    let mut open = false;
    let mut body_len = 0;
    for c in value.chars() {
        match (c, open) {
            ('{', false) => {
                open = true;
                body_len = 0;
            }
            ('}', true) => {
                if body_len == 0 {
                    return false;
                }
                open = false;
            }
            ('{', true) | ('}', false) => return false,
            (_, true) => body_len += 1,
            (_, false) => {}
        }
    }
    !open && has_uri_characters(value)
}

fn is_json_pointer(value: &str) -> bool {
    JsonPath::parse_pointer(value).is_ok()
}

fn is_regex(value: &str) -> bool {
    Regex::new(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, value: &str) -> bool {
        FormatRegistry::with_defaults()
            .get(name)
            .unwrap()
            .validate(value)
            .is_none()
    }

    #[test]
    fn date_time_follows_rfc3339() {
        assert!(check("date-time", "2017-03-01T12:30:00Z"));
        assert!(check("date-time", "2017-03-01T12:30:00.25+02:00"));
        assert!(!check("date-time", "2017-03-01 12:30"));
        assert!(!check("date-time", "2017-13-01T12:30:00Z"));
    }

    #[test]
    fn date_and_time() {
        assert!(check("date", "2020-02-29"));
        assert!(!check("date", "2021-02-29"));
        assert!(!check("date", "2020-2-9"));
        assert!(check("time", "23:59:59"));
        assert!(check("time", "08:00:00.5Z"));
        assert!(!check("time", "24:00:00"));
    }

    #[test]
    fn hosts_and_addresses() {
        assert!(check("hostname", "api.example.com"));
        assert!(!check("hostname", "-bad.example.com"));
        assert!(!check("hostname", &"a".repeat(64)));
        assert!(check("host-name", "localhost"));
        assert!(check("email", "joe.bloggs@example.com"));
        assert!(!check("email", "joe@@example.com"));
        assert!(!check("email", "no-at-sign"));
        assert!(check("ipv4", "192.168.0.1"));
        assert!(!check("ipv4", "256.1.1.1"));
        assert!(check("ip-address", "10.0.0.1"));
        assert!(check("ipv6", "::1"));
        assert!(!check("ipv6", "12345::"));
    }

    #[test]
    fn uris_and_templates() {
        assert!(check("uri", "http://example.com/a?b=c"));
        assert!(!check("uri", "/relative/path"));
        assert!(check("uri-reference", "/relative/path"));
        assert!(check("uri-reference", "#fragment"));
        assert!(!check("uri-reference", "with space"));
        assert!(check("uri-template", "http://example.com/{id}/x{?q}"));
        assert!(!check("uri-template", "http://example.com/{id"));
        assert!(!check("uri-template", "http://example.com/{}"));
    }

    #[test]
    fn pointers_and_patterns() {
        assert!(check("json-pointer", "/a/~0b/~1c"));
        assert!(check("json-pointer", ""));
        assert!(!check("json-pointer", "a/b"));
        assert!(check("regex", "^[a-z]+$"));
        assert!(!check("regex", "(unclosed"));
    }

    #[test]
    fn registration_replaces_by_name() {
        struct Even;
        impl FormatValidator for Even {
            fn name(&self) -> &str {
                "ipv4"
            }
            fn validate(&self, value: &str) -> Option<String> {
                (value.len() % 2 != 0).then(|| "odd length".to_string())
            }
        }
        let registry = FormatRegistry::with_defaults().with(Even);
        assert_eq!(registry.get("ipv4").unwrap().validate("ab"), None);
        assert!(registry.contains("uri"));
        assert!(!registry.contains("color"));
    }
}
