//! List membership commands

use super::{catalog::resolve_book, summary, Shelf};
use crate::BookArgs;
use anyhow::{Context, Result};
use shelfwise_core::Collection;

/// Add a book to the to-read list
pub async fn add(shelf: &Shelf, book: BookArgs) -> Result<()> {
    let source = resolve_book(shelf, book).await?;
    let record = shelf.lists.add_to_read_list(&source).await?;
    println!("Added to {}: {}", Collection::ToRead.label(), summary(&record));
    Ok(())
}

/// Start reading, from the to-read list or from book details.
///
/// Any detail besides the key means the book is built fresh, so nothing
/// given on the command line is dropped.
pub async fn start(shelf: &Shelf, book: BookArgs) -> Result<()> {
    let key_only = book.title.is_none()
        && book.pages.is_none()
        && book.authors.is_empty()
        && book.cover.is_none();
    let record = if key_only {
        match shelf.lists.promote(&book.key).await {
            Ok(record) => record,
            Err(shelfwise_core::ShelfError::NotFound(_)) => {
                let source = resolve_book(shelf, book).await?;
                shelf.lists.start_reading(&source).await?
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        let source = resolve_book(shelf, book).await?;
        shelf.lists.start_reading(&source).await?
    };

    println!("Now reading: {}", summary(&record));
    Ok(())
}

/// Put a book on the bookshelf
pub async fn shelve(shelf: &Shelf, book: BookArgs) -> Result<()> {
    let source = resolve_book(shelf, book).await?;
    let record = shelf.lists.add_to_bookshelf(&source).await?;
    println!("Shelved: {}", summary(&record));
    Ok(())
}

/// Print one collection
pub async fn list(shelf: &Shelf, collection: &str, json: bool) -> Result<()> {
    let collection: Collection = collection.parse()?;
    let records = shelf
        .lists
        .list(collection)
        .await
        .with_context(|| format!("Failed to list {}", collection))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{} is empty", collection.label());
        return Ok(());
    }

    println!("{} ({})", collection.label(), records.len());
    for record in &records {
        match collection {
            Collection::CurrentlyReading => {
                println!("  {}  [{}]", summary(record), record.progress_label())
            }
            _ => println!("  {}", summary(record)),
        }
    }
    Ok(())
}

/// Remove a book from a collection
pub async fn remove(shelf: &Shelf, collection: &str, key: &str) -> Result<()> {
    let collection: Collection = collection.parse()?;
    shelf.lists.remove(collection, key).await?;
    println!("Removed {} from {}", key, collection.label());
    Ok(())
}
