use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use simplelog::{LevelFilter, WriteLogger};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use verselens::app::App;
use verselens::bookmarks::BookmarkStore;
use verselens::client::{BibleApiClient, DEFAULT_API_BASE};
use verselens::config::Config;
use verselens::dictionary::{DictionaryClient, DEFAULT_DICTIONARY_API_BASE};
use verselens::search::{self, SearchFilter};
use verselens::store::TranslationStore;
use verselens::{handler, tui, ui};

#[derive(Parser)]
#[command(name = "verselens")]
#[command(about = "Terminal Bible reader: browse, search, bookmark, and define words")]
struct Cli {
    /// Translation to use (defaults to the configured one, then ESV)
    #[arg(short, long, global = true)]
    translation: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search verse text
    Search {
        /// Search query (at least 3 characters)
        query: String,
        /// Restrict to one testament
        #[arg(short, long, value_enum, default_value = "all")]
        filter: FilterArg,
        /// Maximum number of results to print
        #[arg(short, long, default_value = "25")]
        limit: usize,
    },
    /// Print a chapter
    Read {
        /// Book name, e.g. "Genesis"
        book: String,
        /// Chapter number
        chapter: u32,
    },
    /// List available translations
    Translations,
    /// Look up a word definition
    Define {
        word: String,
    },
    /// List, export, or import bookmarks
    Bookmarks {
        /// Write a backup of all bookmarks to this file
        #[arg(long)]
        export: Option<PathBuf>,
        /// Replace bookmarks with the contents of this backup file
        #[arg(long)]
        import: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Ot,
    Nt,
}

impl From<FilterArg> for SearchFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => SearchFilter::All,
            FilterArg::Ot => SearchFilter::OldTestament,
            FilterArg::Nt => SearchFilter::NewTestament,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|_| Config::new());

    init_logging();

    let api_base = config.api_base.clone().unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let dictionary_base = config
        .dictionary_api_base
        .clone()
        .unwrap_or_else(|| DEFAULT_DICTIONARY_API_BASE.to_string());

    let store = Arc::new(Mutex::new(TranslationStore::new(BibleApiClient::new(&api_base))));
    let dictionary = Arc::new(DictionaryClient::new(&dictionary_base));

    let preferred = cli
        .translation
        .clone()
        .or_else(|| config.default_translation.clone());

    match cli.command {
        None => run_tui(store, dictionary, &config).await,
        Some(Commands::Search { query, filter, limit }) => {
            cli_search(&store, preferred.as_deref(), &query, filter.into(), limit).await
        }
        Some(Commands::Read { book, chapter }) => {
            cli_read(&store, preferred.as_deref(), &book, chapter).await
        }
        Some(Commands::Translations) => cli_translations(&store).await,
        Some(Commands::Define { word }) => cli_define(&dictionary, &word).await,
        Some(Commands::Bookmarks { export, import }) => cli_bookmarks(export, import),
    }
}

fn init_logging() {
    let Some(config_dir) = dirs::config_dir() else {
        return;
    };
    let log_dir = config_dir.join("verselens");
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    if let Ok(file) = fs::File::create(log_dir.join("verselens.log")) {
        let _ = WriteLogger::init(LevelFilter::Info, simplelog::Config::default(), file);
    }
}

async fn run_tui(
    store: Arc<Mutex<TranslationStore>>,
    dictionary: Arc<DictionaryClient>,
    config: &Config,
) -> Result<()> {
    println!("Loading Bible...");
    let mut app = App::new(store, dictionary, config).await?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }
    }

    tui::restore()?;
    Ok(())
}

async fn cli_search(
    store: &Arc<Mutex<TranslationStore>>,
    preferred: Option<&str>,
    query: &str,
    filter: SearchFilter,
    limit: usize,
) -> Result<()> {
    let translation = store.lock().await.default_translation(preferred).await?;

    println!(
        "🔍 Searching {} for: {}",
        translation.name.bold(),
        query.bold().cyan()
    );

    let results = search::search(&translation.data, query, filter);

    if results.is_empty() {
        if query.trim().chars().count() < search::MIN_QUERY_LEN {
            println!(
                "{}",
                format!("Enter at least {} characters to search", search::MIN_QUERY_LEN).yellow()
            );
        } else {
            println!("{}", "No results found".red());
        }
        return Ok(());
    }

    println!("\n{} results found:\n", results.len().to_string().bold().green());

    for (i, result) in results.iter().take(limit).enumerate() {
        println!(
            "{}. {}",
            (i + 1).to_string().bold().blue(),
            result.reference().bold().yellow()
        );
        println!("   {}\n", render_preview(&result.preview));
    }

    if results.len() > limit {
        println!("{}", format!("...and {} more", results.len() - limit).dimmed());
    }

    Ok(())
}

/// Turn `**match**` markers into terminal highlighting.
fn render_preview(preview: &str) -> String {
    preview
        .split("**")
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                part.yellow().bold().to_string()
            } else {
                part.to_string()
            }
        })
        .collect()
}

async fn cli_read(
    store: &Arc<Mutex<TranslationStore>>,
    preferred: Option<&str>,
    book: &str,
    chapter: u32,
) -> Result<()> {
    let translation = store.lock().await.default_translation(preferred).await?;
    let verses = translation.data.verses(book, chapter);

    if verses.is_empty() {
        println!(
            "{}",
            format!("{} {} not found in {}", book, chapter, translation.name).red()
        );
        return Ok(());
    }

    println!(
        "\n{}",
        format!("📜 {} {} ({})", book, chapter, translation.name).bold().green()
    );
    println!("{}", "=".repeat(50).dimmed());

    for (verse, text) in verses {
        println!("\n{}  {}", format!("{}:{}", chapter, verse).bold().yellow(), text);
    }

    println!("\n{}", "=".repeat(50).dimmed());
    println!("{} verses displayed", verses.len().to_string().bold());

    Ok(())
}

async fn cli_translations(store: &Arc<Mutex<TranslationStore>>) -> Result<()> {
    let available = store.lock().await.available_translations().await?;

    println!("\n{}", "📚 Available Translations".bold().blue());
    println!("{}", "=".repeat(30).dimmed());
    for name in available {
        println!("  • {}", name.green());
    }

    Ok(())
}

async fn cli_define(dictionary: &DictionaryClient, word: &str) -> Result<()> {
    match dictionary.define(word).await {
        Ok(entry) => {
            println!("\n{}", entry.word.bold().cyan());

            let phonetics: Vec<&str> = entry
                .pronunciation
                .phonetics
                .iter()
                .filter(|p| !p.text.is_empty())
                .map(|p| p.text.as_str())
                .collect();
            if !phonetics.is_empty() {
                println!("{}", phonetics.join("  ").dimmed());
            }

            if entry.definitions.wordnet.is_empty() {
                println!("{}", "No definitions available".yellow());
            }
            for (i, definition) in entry.definitions.wordnet.iter().enumerate() {
                println!("{}. {}", (i + 1).to_string().bold().blue(), definition);
            }
        }
        Err(e) => println!("{}: {}", "Lookup failed".red(), e),
    }

    Ok(())
}

fn cli_bookmarks(export: Option<PathBuf>, import: Option<PathBuf>) -> Result<()> {
    let mut bookmarks = BookmarkStore::load()?;

    if let Some(path) = import {
        let count = bookmarks.import_from_file(&path)?;
        println!("{} bookmarks imported", count.to_string().bold().green());
        return Ok(());
    }

    if let Some(path) = export {
        bookmarks.export_to_file(&path)?;
        println!(
            "{} bookmarks exported to {}",
            bookmarks.list().len().to_string().bold().green(),
            path.display()
        );
        return Ok(());
    }

    if bookmarks.list().is_empty() {
        println!("{}", "No bookmarks saved".yellow());
        return Ok(());
    }

    println!("\n{}", "🔖 Bookmarks".bold().blue());
    println!("{}", "=".repeat(30).dimmed());
    for bookmark in bookmarks.list() {
        println!(
            "\n{}  {}",
            bookmark.reference().bold().yellow(),
            bookmark.created_at.format("%Y-%m-%d").to_string().dimmed()
        );
        println!("   {}", bookmark.text);
        if !bookmark.note.is_empty() {
            println!("   {}", format!("note: {}", bookmark.note).green());
        }
    }

    Ok(())
}
