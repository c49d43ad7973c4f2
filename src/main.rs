use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;

use spinlog::config::{self, AppConfig};
use spinlog::{analytics, enrich, ingest, output};

#[derive(Parser)]
#[command(name = "spinlog", version, about = "Listening-log analyzer")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full batch: ingest, join, four analyses, four table writes
    Run {
        /// Listening-log CSV (default: config, then listening_logs.csv)
        #[arg(long)]
        logs: Option<PathBuf>,

        /// Song-metadata CSV (default: config, then songs_metadata.csv)
        #[arg(long)]
        songs: Option<PathBuf>,

        /// Directory the four result tables are written under
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of parallel workers (0 = auto-detect from config)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,
    },

    /// Show input statistics without writing any output
    Stats {
        /// Listening-log CSV (default: config, then listening_logs.csv)
        #[arg(long)]
        logs: Option<PathBuf>,

        /// Song-metadata CSV (default: config, then songs_metadata.csv)
        #[arg(long)]
        songs: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load();

    match cli.command {
        Commands::Run { logs, songs, out, jobs } => {
            let logs_path = resolve(logs, &config.logs_path, config::default_logs_path);
            let songs_path = resolve(songs, &config.songs_path, config::default_songs_path);
            let out_dir = resolve(out, &config.output_dir, config::default_output_dir);
            let workers = if jobs > 0 { jobs } else { config.resolve_workers() };
            run_batch(&logs_path, &songs_path, &out_dir, workers)?;
        }

        Commands::Stats { logs, songs } => {
            let logs_path = resolve(logs, &config.logs_path, config::default_logs_path);
            let songs_path = resolve(songs, &config.songs_path, config::default_songs_path);
            print_stats(&logs_path, &songs_path)?;
        }
    }

    Ok(())
}

/// Resolution order: CLI flag > config file > built-in default.
fn resolve(
    cli: Option<PathBuf>,
    config: &Option<PathBuf>,
    default: fn() -> PathBuf,
) -> PathBuf {
    cli.or_else(|| config.clone()).unwrap_or_else(default)
}

/// The whole batch: ingest, join, then the four pipelines, each writing its
/// own table. Pipelines share no state; any failure aborts the run, but
/// tables already written stay written (no cross-pipeline rollback).
fn run_batch(
    logs_path: &std::path::Path,
    songs_path: &std::path::Path,
    out_dir: &std::path::Path,
    workers: usize,
) -> Result<()> {
    log::info!("Running with {} workers, output under {}", workers, out_dir.display());

    // The worker pool is built here and passed into every pipeline; it is
    // torn down when this function returns.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;

    let events = ingest::load_events(logs_path).context("Ingestion failed")?;
    let catalog = ingest::load_songs(songs_path).context("Ingestion failed")?;

    let (enriched, join) = enrich::join_events(&events, &catalog);
    println!(
        "Join complete: {} matched, {} dropped (no metadata), {} duplicate catalog rows",
        join.matched, join.dropped, join.duplicate_songs
    );

    let favorites = analytics::favorites::favorite_genres(&pool, &enriched);
    let written = output::write_table(out_dir, output::TABLE_FAVORITES, &favorites)
        .context("Failed to write user_favorite_genres")?;
    println!("Favorite genres complete: {} users", written);

    let avg_times = analytics::listen_time::average_listen_time(&pool, &events);
    let written = output::write_table(out_dir, output::TABLE_AVG_LISTEN, &avg_times)
        .context("Failed to write avg_listen_time_per_song")?;
    println!("Average listen time complete: {} songs", written);

    let loyal = analytics::loyalty::loyalty_scores(&pool, &enriched);
    let written = output::write_table(out_dir, output::TABLE_LOYALTY, &loyal)
        .context("Failed to write genre_loyalty_scores")?;
    println!("Loyalty scores complete: {} users above threshold", written);

    let owls = analytics::night_owls::night_owl_users(&pool, &events);
    let written = output::write_table(out_dir, output::TABLE_NIGHT_OWLS, &owls)
        .context("Failed to write night_owl_users")?;
    println!("Night owls complete: {} users", written);

    println!("Run complete: 4 tables under {}", out_dir.display());
    Ok(())
}

fn print_stats(logs_path: &std::path::Path, songs_path: &std::path::Path) -> Result<()> {
    let events = ingest::load_events(logs_path).context("Ingestion failed")?;
    let catalog = ingest::load_songs(songs_path).context("Ingestion failed")?;

    let users: HashSet<&str> = events.iter().map(|e| e.user_id.as_str()).collect();
    let songs: HashSet<&str> = events.iter().map(|e| e.song_id.as_str()).collect();
    let genres: HashSet<&str> = catalog.iter().map(|s| s.genre.as_str()).collect();
    let first = events.iter().map(|e| e.timestamp).min();
    let last = events.iter().map(|e| e.timestamp).max();

    println!("Input Statistics");
    println!("================");
    println!("Listen events:   {}", events.len());
    println!("Distinct users:  {}", users.len());
    println!("Distinct songs:  {} (in log)", songs.len());
    println!("Catalog rows:    {}", catalog.len());
    println!("Genres:          {}", genres.len());
    if let (Some(first), Some(last)) = (first, last) {
        println!("Event span:      {} — {}", first, last);
    }

    Ok(())
}
