//! Placeholder tokens: the locale-independent stand-ins written into reports.
//!
//! Wire format: `<origin>!#<keyname>#<usageIndex>`, where `<origin>!#<keyname>`
//! is the file-scoped message key.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Separator between a catalog origin and a message key name.
pub const KEY_SEPARATOR: &str = "!#";

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| Regex::new(r"(?s)^(.*)#(\d+)$").expect("token regex is valid"))
}

/// A message key scoped to the catalog that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileScopedKey {
    origin: String,
    name: String,
}

impl FileScopedKey {
    pub fn new(origin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            name: name.into(),
        }
    }

    /// Split `<origin>!#<name>`; both halves must be non-empty.
    pub fn parse(text: &str) -> Option<Self> {
        let (origin, name) = text.split_once(KEY_SEPARATOR)?;
        if origin.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(origin, name))
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FileScopedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.origin, KEY_SEPARATOR, self.name)
    }
}

/// Reference to one recorded usage of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderToken {
    pub key: FileScopedKey,
    pub index: usize,
}

impl PlaceholderToken {
    pub fn new(key: FileScopedKey, index: usize) -> Self {
        Self { key, index }
    }

    /// Parse a report string as a token.
    ///
    /// Only exact-shape matches are accepted: the string must end in
    /// `#<digits>` and the remainder must contain the `!#` key separator.
    /// Anything else (e.g. `"see issue #12"`) is ordinary text.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = token_regex().captures(text)?;
        let key = FileScopedKey::parse(caps.get(1)?.as_str())?;
        let index = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { key, index })
    }
}

impl fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.index)
    }
}

/// Whether a string has the exact shape of a placeholder token.
pub fn is_placeholder(text: &str) -> bool {
    PlaceholderToken::parse(text).is_some()
}
