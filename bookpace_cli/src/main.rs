use bookpace_core::*;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bookpace")]
#[command(about = "Reading progress tracker with completion estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a new book
    Add {
        title: String,

        /// Total page count
        #[arg(long)]
        pages: i32,

        /// Reading rate in pages per day (default from config)
        #[arg(long)]
        pages_per_day: Option<i32>,

        /// Reading cadence: daily, or work (Mon-Thu only)
        #[arg(long)]
        cadence: Option<String>,
    },

    /// List books in progress
    List,

    /// Record progress on a book
    Update {
        /// Title (or unique title prefix)
        title: String,

        /// Page you are on now
        #[arg(long)]
        page: i32,

        /// Mark finished without prompting when the last page is reached
        #[arg(long)]
        finish: bool,
    },

    /// Change the reading rate for a book
    Pace {
        /// Title (or unique title prefix)
        title: String,

        /// New pages-per-day rate
        #[arg(long)]
        pages_per_day: i32,
    },

    /// Mark a book as finished
    Finish {
        /// Title (or unique title prefix)
        title: String,
    },

    /// Show completed books and estimate variance
    History,

    /// Write finished books to the CSV archive
    Export,

    /// Stop tracking a book
    Remove {
        /// Title (or unique title prefix)
        title: String,
    },
}

struct DataPaths {
    shelf: PathBuf,
    log: PathBuf,
    archive: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            shelf: data_dir.join("shelf.json"),
            log: data_dir.join("progress.log"),
            archive: data_dir.join("completed.csv"),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    bookpace_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Using data directory {:?}", data_dir);
    let paths = DataPaths::new(&data_dir);

    // "Today" is resolved once, in the local timezone; the core itself
    // never reads the clock.
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Add {
            title,
            pages,
            pages_per_day,
            cadence,
        } => cmd_add(&paths, title, pages, pages_per_day, cadence, &config, today),
        Commands::List => cmd_list(&paths),
        Commands::Update {
            title,
            page,
            finish,
        } => cmd_update(&paths, &title, page, finish, today),
        Commands::Pace {
            title,
            pages_per_day,
        } => cmd_pace(&paths, &title, pages_per_day, today),
        Commands::Finish { title } => cmd_finish(&paths, &title, today),
        Commands::History => cmd_history(&paths),
        Commands::Export => cmd_export(&paths),
        Commands::Remove { title } => cmd_remove(&paths, &title),
    }
}

fn cmd_add(
    paths: &DataPaths,
    title: String,
    pages: i32,
    pages_per_day: Option<i32>,
    cadence: Option<String>,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    if pages <= 0 {
        return Err(Error::Book(format!("total pages must be positive, got {}", pages)));
    }

    let rate = pages_per_day.unwrap_or(config.reading.default_pages_per_day);
    if rate <= 0 {
        return Err(Error::Book(format!("pages per day must be positive, got {}", rate)));
    }

    let cadence = match cadence {
        Some(s) => s.parse()?,
        None => config.reading.cadence(),
    };

    let book = Book::new(title.trim(), pages, rate, cadence, today);

    println!(
        "Added '{}': {} pages at {}/day, {}",
        book.title, book.total_pages, book.pages_per_day, book.cadence
    );
    println!("Estimated completion: {}", book.estimated_completion);

    let event = ProgressEvent::record(&book, chrono::Utc::now());
    JsonlSink::new(&paths.log).append(&event)?;
    Shelf::update(&paths.shelf, |shelf| {
        shelf.add(book);
        Ok(())
    })?;

    Ok(())
}

fn cmd_list(paths: &DataPaths) -> Result<()> {
    let shelf = Shelf::load(&paths.shelf)?;
    let reading = shelf.reading();

    if reading.is_empty() {
        println!("No books in progress. Use 'bookpace add' to start one.");
        return Ok(());
    }

    for book in reading {
        println!("{}", book.title);
        println!(
            "  Page {} of {} ({})",
            book.current_page, book.total_pages, book.cadence
        );
        println!("  Est. {}", book.estimated_completion);
    }

    Ok(())
}

fn cmd_update(
    paths: &DataPaths,
    title: &str,
    page: i32,
    finish: bool,
    today: NaiveDate,
) -> Result<()> {
    let mut shelf = Shelf::load(&paths.shelf)?;
    let book = shelf.find_by_title_mut(title)?;

    let outcome = book.set_progress(page, today)?;

    match outcome {
        ProgressOutcome::ReachedEnd => {
            let should_finish =
                finish || confirm("You've reached the last page. Mark as finished?")?;
            if should_finish {
                book.finish(today)?;
                if let Some(diff) = book.variance_days() {
                    println!("Finished '{}' ({})", book.title, variance_text(diff));
                }
            } else {
                println!(
                    "'{}' updated to page {} of {}",
                    book.title, book.current_page, book.total_pages
                );
            }
        }
        ProgressOutcome::Updated => {
            println!(
                "'{}' updated to page {} of {}",
                book.title, book.current_page, book.total_pages
            );
            println!("Estimated completion: {}", book.estimated_completion);
        }
    }

    let event = ProgressEvent::record(book, chrono::Utc::now());
    JsonlSink::new(&paths.log).append(&event)?;
    shelf.save(&paths.shelf)?;

    Ok(())
}

fn cmd_pace(paths: &DataPaths, title: &str, pages_per_day: i32, today: NaiveDate) -> Result<()> {
    let mut shelf = Shelf::load(&paths.shelf)?;
    let book = shelf.find_by_title_mut(title)?;

    book.set_pages_per_day(pages_per_day, today)?;
    println!(
        "'{}' now at {} pages/day. Estimated completion: {}",
        book.title, book.pages_per_day, book.estimated_completion
    );

    let event = ProgressEvent::record(book, chrono::Utc::now());
    JsonlSink::new(&paths.log).append(&event)?;
    shelf.save(&paths.shelf)?;

    Ok(())
}

fn cmd_finish(paths: &DataPaths, title: &str, today: NaiveDate) -> Result<()> {
    let mut shelf = Shelf::load(&paths.shelf)?;
    let book = shelf.find_by_title_mut(title)?;

    book.finish(today)?;
    if let Some(diff) = book.variance_days() {
        println!("Finished '{}' ({})", book.title, variance_text(diff));
    }

    let event = ProgressEvent::record(book, chrono::Utc::now());
    JsonlSink::new(&paths.log).append(&event)?;
    shelf.save(&paths.shelf)?;

    Ok(())
}

fn cmd_history(paths: &DataPaths) -> Result<()> {
    let shelf = Shelf::load(&paths.shelf)?;

    match summarize(&shelf.books) {
        None => {
            println!("No completed books yet.");
        }
        Some(summary) => {
            println!("Books completed: {}", summary.count);
            println!(
                "Avg. days from estimate: {}",
                average_text(summary.average_days_from_estimate)
            );
            println!();

            for book in shelf.finished() {
                if let (Some(actual), Some(diff)) = (book.actual_completion, book.variance_days())
                {
                    println!(
                        "{}: finished {} ({})",
                        book.title,
                        actual,
                        variance_text(diff)
                    );
                }
            }
        }
    }

    Ok(())
}

fn cmd_export(paths: &DataPaths) -> Result<()> {
    let shelf = Shelf::load(&paths.shelf)?;
    let count = export_finished(&shelf, &paths.archive)?;
    println!("Exported {} finished books to {}", count, paths.archive.display());
    Ok(())
}

fn cmd_remove(paths: &DataPaths, title: &str) -> Result<()> {
    let mut shelf = Shelf::load(&paths.shelf)?;
    let id = shelf.find_by_title(title)?.id;

    if let Some(book) = shelf.remove(id) {
        println!("Removed '{}'", book.title);
    }
    shelf.save(&paths.shelf)?;

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
