//! The three per-user reading collections

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the per-user book collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// Books the user intends to read
    ToRead,

    /// Books with tracked page progress
    CurrentlyReading,

    /// Finished or owned books
    Bookshelf,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::ToRead,
        Collection::CurrentlyReading,
        Collection::Bookshelf,
    ];

    /// Name of the collection in the document store
    pub fn storage_name(self) -> &'static str {
        match self {
            Collection::ToRead => "readBooks",
            Collection::CurrentlyReading => "currentBooks",
            Collection::Bookshelf => "bookshelf",
        }
    }

    /// URL and command-line spelling
    pub fn slug(self) -> &'static str {
        match self {
            Collection::ToRead => "to-read",
            Collection::CurrentlyReading => "currently-reading",
            Collection::Bookshelf => "bookshelf",
        }
    }

    /// Human readable heading
    pub fn label(self) -> &'static str {
        match self {
            Collection::ToRead => "To Read",
            Collection::CurrentlyReading => "Currently Reading",
            Collection::Bookshelf => "Bookshelf",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Collection {
    type Err = ParseError;

    /// Accepts slugs, storage names and a few short aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "to-read" | "toread" | "readbooks" | "queue" => Ok(Collection::ToRead),
            "currently-reading" | "currentbooks" | "reading" | "current" => {
                Ok(Collection::CurrentlyReading)
            }
            "bookshelf" | "shelf" | "finished" | "read" => Ok(Collection::Bookshelf),
            _ => Err(ParseError::UnknownCollection(s.to_string())),
        }
    }
}
