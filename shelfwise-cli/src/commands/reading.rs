//! Progress and completion commands

use super::{summary, Shelf};
use anyhow::Result;
use shelfwise_core::catalog::{cover_url, CoverSize};
use shelfwise_core::Reconciliation;

/// Record progress, then shelve the book if that finished it
pub async fn progress(shelf: &Shelf, key: &str, page: &str, total: &str) -> Result<()> {
    let record = shelf.lists.progress().submit(key, page, total).await?;
    println!("{}: {}", record.title, record.progress_label());

    if record.is_complete() {
        if let Some(outcome) = shelf.lists.reconcile_quietly().await {
            print_outcome(&outcome);
        }
    }
    Ok(())
}

/// Run the completion check explicitly
pub async fn reconcile(shelf: &Shelf) -> Result<()> {
    let outcome = shelf.lists.reconcile_completion().await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &Reconciliation) {
    match outcome {
        Reconciliation::Idle => println!("Nothing is being read"),
        Reconciliation::InProgress { key } => println!("Still reading {}", key),
        Reconciliation::Completed { key, shelved: true } => {
            println!("Finished {}, moved to the bookshelf", key)
        }
        Reconciliation::Completed { key, shelved: false } => {
            println!("Finished {}, already on the bookshelf", key)
        }
    }
}

/// Show the book most recently updated
pub async fn latest(shelf: &Shelf) -> Result<()> {
    match shelf.lists.latest_updated().await? {
        Some(record) => {
            println!("{}", summary(&record));
            println!("  {}", record.progress_label());
            if let Some(cover) = record.primary_cover() {
                println!("  Cover: {}", cover_url(cover, CoverSize::Medium));
            }
        }
        None => println!("Nothing is being read"),
    }
    Ok(())
}

/// Print collection sizes
pub async fn stats(shelf: &Shelf, json: bool) -> Result<()> {
    let stats = shelf.lists.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("To read:           {}", stats.to_read);
        println!("Currently reading: {}", stats.currently_reading);
        println!("Finished:          {}", stats.finished);
    }
    Ok(())
}
