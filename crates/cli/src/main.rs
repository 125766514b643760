use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bookshop_app::bookshop;
use bookshop_kernel::settings::Settings;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bookshop",
    version,
    about = "Batch import and export of bookshop records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding base.toml and <env>.toml (overrides BOOKSHOP_CONFIG_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import books from a <Books> XML document and print the report
    ImportBooks {
        /// Path to the XML document
        file: PathBuf,
    },
    /// Import authors from a JSON array and print the report
    ImportAuthors {
        /// Path to the JSON document
        file: PathBuf,
    },
    /// Export authors ordered by number of books as JSON
    ExportAuthors {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export up to 10 science books published before a date as XML
    ExportBooks {
        /// Cutoff date (YYYY-MM-DD), exclusive
        #[arg(long, value_parser = parse_cutoff)]
        before: NaiveDate,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_cutoff(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {}", err))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_with_dir(cli.config_dir.as_deref())
        .context("failed to load bookshop settings")?;
    bookshop_telemetry::init(&settings.telemetry)?;

    let shared = bookshop_db::open(&settings.database).context("failed to open record store")?;
    let mut store = bookshop_db::lock(&shared)?;

    match cli.command {
        Commands::ImportBooks { file } => {
            let xml = read(&file)?;
            let report = bookshop::import_books(&mut *store, &xml)
                .with_context(|| format!("failed to import books from {}", file.display()))?;
            if !report.is_empty() {
                println!("{}", report);
            }
            tracing::info!(
                imported = report.imported(),
                rejected = report.rejected(),
                "book import finished"
            );
        }
        Commands::ImportAuthors { file } => {
            let json = read(&file)?;
            let report = bookshop::import_authors(&mut *store, &json)
                .with_context(|| format!("failed to import authors from {}", file.display()))?;
            if !report.is_empty() {
                println!("{}", report);
            }
            tracing::info!(
                imported = report.imported(),
                rejected = report.rejected(),
                "author import finished"
            );
        }
        Commands::ExportAuthors { output } => {
            let document = bookshop::export_prolific_authors(&*store)?;
            write(output.as_deref(), &document)?;
        }
        Commands::ExportBooks { before, output } => {
            let document = bookshop::export_oldest_science_books(&*store, before)?;
            write(output.as_deref(), &document)?;
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(output: Option<&Path>, document: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", document);
            Ok(())
        }
    }
}

