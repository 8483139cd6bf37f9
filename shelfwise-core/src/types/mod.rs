//! Core types for reading lists

mod collection;
mod key;
mod record;

pub use collection::Collection;
pub use key::{BookKey, UserId, WORKS_PREFIX};
pub use record::{is_complete, Author, BookRecord, BookSource, ReadingStats};
