//! Normalized catalog keys and user identifiers

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix the catalog puts in front of work identifiers
pub const WORKS_PREFIX: &str = "/works/";

/// A catalog work key with the `/works/` prefix removed.
///
/// This is the document id under which a record is stored, so it must never
/// contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookKey(String);

impl BookKey {
    /// Normalize a raw catalog key (`/works/OL1W` or `OL1W`)
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        let key = trimmed.strip_prefix(WORKS_PREFIX).unwrap_or(trimmed).trim();

        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\', '?', '#', '%'])
            || key.chars().any(|c| c.is_control() || c.is_whitespace())
        {
            return Err(ParseError::InvalidKey(raw.to_string()));
        }

        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key as the catalog spells it (`/works/OL1W`), escaped for a URL path
    pub fn catalog_path(&self) -> String {
        format!("{}{}", WORKS_PREFIX, urlencoding::encode(&self.0))
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl TryFrom<String> for BookKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookKey> for String {
    fn from(key: BookKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for BookKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let id = raw.trim();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(ParseError::InvalidUser(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}
