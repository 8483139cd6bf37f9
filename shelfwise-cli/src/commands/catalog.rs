//! Catalog commands

use super::Shelf;
use crate::BookArgs;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shelfwise_core::catalog::{BestsellerFeed, Catalog, NytBestsellers, SearchHit};
use shelfwise_core::{Author, BookKey, BookSource};
use std::time::Duration;

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Build the book from command-line details, or fetch it from the catalog
/// when no title was given
pub(super) async fn resolve_book(shelf: &Shelf, book: BookArgs) -> Result<BookSource> {
    let key = BookKey::parse(&book.key)?;

    let mut source = match book.title {
        Some(title) => BookSource::new(key, title),
        None => {
            let pb = spinner(format!("Looking up {}", key));
            let work = shelf.catalog.work(&key).await;
            pb.finish_and_clear();

            match work.with_context(|| format!("Catalog lookup for {} failed", key))? {
                Some(work) => BookSource::from(&work),
                None => bail!("{} is not in the catalog; pass --title to add it anyway", key),
            }
        }
    };

    for name in book.authors {
        source = source.with_author(Author::new(name, ""));
    }
    if let Some(pages) = book.pages {
        source = source.with_pages(pages);
    }
    if let Some(cover) = book.cover {
        source = source.with_cover(cover);
    }
    Ok(source)
}

fn print_hits(hits: &[SearchHit], limit: usize) {
    if hits.is_empty() {
        println!("No results");
        return;
    }

    for hit in hits.iter().take(limit) {
        let key = hit.book_key().map(|k| k.to_string()).unwrap_or_else(|_| hit.key.clone());
        let authors = if hit.author_names.is_empty() {
            "Unknown author".to_string()
        } else {
            hit.author_names.join(", ")
        };
        match hit.first_publish_year {
            Some(year) => println!("{:<14} {} by {} ({})", key, hit.title, authors, year),
            None => println!("{:<14} {} by {}", key, hit.title, authors),
        }
    }
}

/// Search the catalog by title
pub async fn search(shelf: &Shelf, query: &str, limit: usize) -> Result<()> {
    let pb = spinner(format!("Searching for {:?}", query));
    let hits = shelf.catalog.search(query).await;
    pb.finish_and_clear();

    print_hits(&hits.context("Catalog search failed")?, limit);
    Ok(())
}

/// Popular works for a subject
pub async fn subject(shelf: &Shelf, subject: &str, limit: usize) -> Result<()> {
    let pb = spinner(format!("Browsing {}", subject));
    let hits = shelf.catalog.books_by_subject(subject).await;
    pb.finish_and_clear();

    print_hits(
        &hits.with_context(|| format!("Failed to browse subject {}", subject))?,
        limit,
    );
    Ok(())
}

/// An author's profile and works
pub async fn author(shelf: &Shelf, key: &str, limit: usize) -> Result<()> {
    let pb = spinner(format!("Looking up {}", key));
    let author = shelf.catalog.author(key).await;
    pb.finish_and_clear();

    let Some(author) = author.with_context(|| format!("Author lookup for {} failed", key))? else {
        bail!("{} is not in the catalog", key);
    };

    println!("{}", author.name);
    if let Some(bio) = &author.bio {
        println!("  {}", bio);
    }

    let works = shelf
        .catalog
        .books_by_author(&author.name)
        .await
        .with_context(|| format!("Failed to fetch works by {}", author.name))?;
    print_hits(&works, limit);
    Ok(())
}

/// Print a bestseller list
pub async fn bestsellers(list: &str) -> Result<()> {
    let feed = NytBestsellers::from_env();
    let pb = spinner(format!("Fetching {}", list));
    let books = feed.current(list).await;
    pb.finish_and_clear();

    for book in books.with_context(|| format!("Failed to fetch bestseller list {}", list))? {
        println!("{:>2}. {} by {}", book.rank, book.title, book.author);
    }
    Ok(())
}
