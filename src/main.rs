use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use tatort_scraping::{
    catalog::{load_canonical, Catalogs, InventoryCatalog},
    config::Config,
    fs_util::write_with_backup,
    gaps::{group_runs, render_compact, render_terse, render_verbose},
    inventory::{format_file_list, list_directory, parse_file_list, UnparsedEntry},
    reconcile::{missing, reconcile},
    refresh::refresh,
    schema::{EpisodeNumber, EpisodeRecord},
};

/// Shows which episodes of the episode list are not on the storage device yet.
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Print episode numbers and titles only.
    #[arg(long, global = true)]
    kurz: bool,
    /// Configuration file; `tatort.toml` is used if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List missing, broadcast or held episodes.
    Info {
        #[arg(value_enum, default_value_t = Show::Nochnicht)]
        what_to_show: Show,
        /// Show runs of missing episodes instead of single episodes.
        #[arg(long)]
        luecken: bool,
    },
    /// Search the episode list.
    Finde {
        #[arg(value_enum)]
        what_to_find: FindBy,
        query: String,
    },
    /// Report missing episodes, duplicates and misnamed files.
    Analyse,
    /// Download the episode list, keeping the previous copy as a backup.
    Runterladen,
    /// Record the file names in a directory as the new inventory list.
    Inventar { directory: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Show {
    /// Episodes not held yet.
    Nochnicht,
    /// All broadcast episodes.
    Gesendet,
    /// Episodes held.
    Habe,
}

#[derive(Clone, Copy, ValueEnum)]
enum FindBy {
    Episode,
    Titel,
    Datum,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let config = Config::load(opts.config.as_deref())?;
    let command = opts.command.unwrap_or(Command::Info {
        what_to_show: Show::Nochnicht,
        luecken: false,
    });

    match command {
        Command::Runterladen => {
            let backup = refresh(&config.source_url, &config.episode_file).await?;
            if let Some(backup) = backup {
                info!("Previous episode list kept at {backup:?}");
            }
            println!("Success.");
        }
        Command::Inventar { directory } => ingest(&config, &directory)?,
        Command::Info {
            what_to_show,
            luecken,
        } => {
            let data = Catalogs::load(&config.episode_file, &config.inventory_file)?;
            let lines = match what_to_show {
                Show::Nochnicht => missing_lines(&data, opts.kurz, luecken),
                Show::Gesendet => broadcast_lines(&data, opts.kurz),
                Show::Habe => held_lines(&data, opts.kurz),
            };
            for line in lines.into_iter().chain(unparsed_lines(&data.unparsed)) {
                println!("{line}");
            }
        }
        Command::Finde {
            what_to_find,
            query,
        } => {
            let data = Catalogs::load(&config.episode_file, &config.inventory_file)?;
            find(&data, what_to_find, &query, opts.kurz)?;
        }
        Command::Analyse => {
            let data = Catalogs::load(&config.episode_file, &config.inventory_file)?;
            analyse(&data);
        }
    }
    Ok(())
}

fn missing_lines(data: &Catalogs, kurz: bool, gaps: bool) -> Vec<String> {
    let missing = missing(&data.canonical, &data.inventory);

    if gaps {
        let gaps = group_runs(missing.iter().map(|number| number.get()));
        return vec![
            "Fehlende Episoden in Gruppen".to_owned(),
            render_compact(&gaps),
        ];
    }

    let mut lines = vec!["Fehlende Episoden:".to_owned()];
    if kurz {
        lines.extend(render_terse(&missing));
    } else {
        lines.extend(render_verbose(&missing, &data.canonical).map(str::to_owned));
    }
    lines
}

fn record_line(record: &EpisodeRecord, kurz: bool) -> String {
    if kurz {
        format!("{:4} {}", record.episode_number(), record.title())
    } else {
        record.filename().clone()
    }
}

fn broadcast_lines(data: &Catalogs, kurz: bool) -> Vec<String> {
    std::iter::once("Gesendete Episoden:".to_owned())
        .chain(data.canonical.iter().map(|record| record_line(record, kurz)))
        .collect()
}

fn held_lines(data: &Catalogs, kurz: bool) -> Vec<String> {
    std::iter::once("Vorhandene Episoden:".to_owned())
        .chain(data.inventory.iter().map(|record| record_line(record, kurz)))
        .collect()
}

/// Inventory lines that did not decode; empty if there are none.
fn unparsed_lines(unparsed: &[UnparsedEntry]) -> Vec<String> {
    if unparsed.is_empty() {
        return vec![];
    }
    ["".to_owned(), "Nicht erkannte Dateien:".to_owned()]
        .into_iter()
        .chain(
            unparsed
                .iter()
                .map(|entry| format!("Could not match: {} ({})", entry.entry, entry.reason)),
        )
        .collect()
}

fn print_unparsed(unparsed: &[UnparsedEntry]) {
    for line in unparsed_lines(unparsed) {
        println!("{line}");
    }
}

fn find(data: &Catalogs, what_to_find: FindBy, query: &str, kurz: bool) -> anyhow::Result<()> {
    let hits: Vec<&EpisodeRecord> = match what_to_find {
        FindBy::Episode => {
            let number = query
                .parse::<EpisodeNumber>()
                .with_context(|| format!("Invalid episode number: {query:?}"))?;
            data.canonical.get(number).into_iter().collect()
        }
        FindBy::Titel => data.canonical.find_by_title(query).collect(),
        FindBy::Datum => {
            let date = NaiveDate::parse_from_str(query, "%Y-%m-%d")
                .with_context(|| format!("Expected a date like 1970-11-29, found {query:?}"))?;
            data.canonical.find_by_air_date(date).collect()
        }
    };
    if hits.is_empty() {
        println!("Keine Episode gefunden.");
    }
    for record in hits {
        let marker = if data.inventory.contains(record.episode_number()) {
            "habe"
        } else {
            "fehlt"
        };
        println!("[{marker:5}] {}", record_line(record, kurz));
    }
    Ok(())
}

fn analyse(data: &Catalogs) {
    let result = reconcile(&data.canonical, &data.inventory);
    println!(
        "Comparing all {} episodes to existing ({}) episodes - {:.2}% complete",
        result.canonical_len(),
        result.inventory_len(),
        result.completion_ratio() * 100.0
    );
    for duplicate in result.duplicates() {
        println!(
            "{} episodes for {}",
            duplicate.count, duplicate.episode_number
        );
    }
    for mismatch in result.mismatches() {
        println!("Filename mismatch");
        println!("Expected: {}", mismatch.expected);
        println!("Got:      {}", mismatch.actual);
        println!();
    }
    print_unparsed(&data.unparsed);
    println!();
    println!("{} episodes missing", result.missing().len());
}

fn ingest(config: &Config, directory: &Path) -> anyhow::Result<()> {
    let names = list_directory(directory)?;
    let content = format_file_list(&names);
    let inventory = parse_file_list(&content);
    if names.is_empty() {
        warn!("{directory:?} is empty; the inventory list will be empty as well");
    }
    if let Some(backup) = write_with_backup(&config.inventory_file, &content)? {
        info!("Previous inventory list kept at {backup:?}");
    }
    println!(
        "{} entries: {} episode files, {} supplemental, {} not recognized",
        names.len(),
        inventory.catalog.len(),
        inventory.supplemental,
        inventory.unparsed.len()
    );
    print_unparsed(&inventory.unparsed);
    println!("{}", comparison_line(&config.episode_file, &inventory.catalog));
    Ok(())
}

/// How many episodes of the episode list are missing from `inventory`.
fn comparison_line(episode_file: &Path, inventory: &InventoryCatalog) -> String {
    match load_canonical(episode_file) {
        Ok(canonical) => {
            let result = reconcile(&canonical, inventory);
            format!(
                "{} of {} episodes missing",
                result.missing().len(),
                canonical.len()
            )
        }
        Err(e) => {
            warn!("{e:#}");
            format!("Episode list {episode_file:?} not readable, comparison skipped.")
        }
    }
}
