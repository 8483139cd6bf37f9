//! Shelfwise CLI - Command-line interface for reading lists

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shelfwise_core::catalog::{DEFAULT_BESTSELLER_LIST, DEFAULT_CATALOG_URL};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelfwise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding reading list documents
    #[arg(long, global = true, env = "SHELFWISE_DATA_DIR", default_value = "./shelfwise_data")]
    data_dir: PathBuf,

    /// Signed-in user
    #[arg(short, long, global = true, env = "SHELFWISE_USER")]
    user: Option<String>,

    /// Catalog base URL
    #[arg(long, global = true, env = "SHELFWISE_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,

    #[command(subcommand)]
    command: Commands,
}

/// A catalog book given on the command line
#[derive(Args)]
pub struct BookArgs {
    /// Catalog key, e.g. /works/OL893415W
    key: String,

    /// Title; when omitted the book is looked up in the catalog
    #[arg(long)]
    title: Option<String>,

    /// Author name (repeatable)
    #[arg(long = "author")]
    authors: Vec<String>,

    /// Total page count
    #[arg(long)]
    pages: Option<u32>,

    /// Cover image id
    #[arg(long)]
    cover: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to the to-read list
    Add(BookArgs),

    /// Start reading a book
    ///
    /// With only a key, the book is taken from the to-read list. Any other
    /// detail builds the book from the command line or the catalog.
    Start(BookArgs),

    /// Put a book straight on the bookshelf
    Shelve(BookArgs),

    /// Record the current page of a book being read
    Progress {
        /// Catalog key
        key: String,

        /// Current page
        page: String,

        /// Total pages; omit to keep the stored count
        #[arg(long, default_value = "")]
        total: String,
    },

    /// Move the most recently read book to the bookshelf if it is finished
    Reconcile,

    /// Show the most recently updated book being read
    Latest,

    /// List a collection (to-read, currently-reading, bookshelf)
    List {
        collection: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a book from a collection
    Remove {
        collection: String,

        key: String,
    },

    /// Show collection sizes
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the catalog
    Search {
        query: String,

        /// Maximum results to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Browse popular works for a subject, e.g. science_fiction
    Subject {
        subject: String,

        /// Maximum results to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show an author and their works
    Author {
        /// Author key, e.g. /authors/OL79034A
        key: String,

        /// Maximum works to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show a bestseller list (needs NYT_API_KEY)
    Bestsellers {
        #[arg(long, default_value = DEFAULT_BESTSELLER_LIST)]
        list: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "shelfwise_cli=debug,shelfwise_core=debug"
    } else {
        "shelfwise_cli=info,shelfwise_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let shelf = commands::Shelf::open(&cli.data_dir, cli.user.as_deref(), &cli.catalog_url)?;

    match cli.command {
        Commands::Add(book) => commands::add(&shelf, book).await,
        Commands::Start(book) => commands::start(&shelf, book).await,
        Commands::Shelve(book) => commands::shelve(&shelf, book).await,
        Commands::Progress { key, page, total } => {
            commands::progress(&shelf, &key, &page, &total).await
        }
        Commands::Reconcile => commands::reconcile(&shelf).await,
        Commands::Latest => commands::latest(&shelf).await,
        Commands::List { collection, json } => commands::list(&shelf, &collection, json).await,
        Commands::Remove { collection, key } => commands::remove(&shelf, &collection, &key).await,
        Commands::Stats { json } => commands::stats(&shelf, json).await,
        Commands::Search { query, limit } => commands::search(&shelf, &query, limit).await,
        Commands::Subject { subject, limit } => commands::subject(&shelf, &subject, limit).await,
        Commands::Author { key, limit } => commands::author(&shelf, &key, limit).await,
        Commands::Bestsellers { list } => commands::bestsellers(&list).await,
    }
}
