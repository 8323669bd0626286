// src/cli.rs
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::aggregate::{self, Aggregation};
use crate::config::{consts::*, AppOptions};
use crate::core::net::HttpFetcher;
use crate::data::Series;
use crate::file::{read_json, resolve_single_out_path, write_json};
use crate::progress::Progress;
use crate::scrape::Crawler;
use crate::store::{JsonFileSink, StatsRow, StatsSink};

const ABOUT: &str = "Scrape cricket series scorecards and aggregate per-player tournament stats";

#[derive(Parser, Debug)]
#[command(name = "crease", version, about = ABOUT)]
pub struct Cli {
    /// TOML options file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wait between page fetches, overrides the config
    #[arg(long, global = true)]
    pause_ms: Option<u64>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every match of a series
    Scrape {
        series_url: String,
        /// Output file or directory
        #[arg(short, long, default_value = "")]
        out: String,
    },
    /// Scrape a single match scorecard
    Match {
        match_url: String,
        #[arg(short, long, default_value = "")]
        out: String,
    },
    /// Turn a scrape file into per-player stats
    Aggregate {
        #[arg(default_value = DEFAULT_AGGREGATE_INPUT)]
        input: PathBuf,
        #[arg(short, long, default_value = "")]
        out: String,
    },
    /// Scrape a series, then aggregate it
    Run {
        series_url: String,
        /// Where the raw scrape goes; `aggregate` reads the same file by default
        #[arg(long, default_value = "")]
        data: String,
        #[arg(short, long, default_value = "")]
        out: String,
    },
    /// Upsert a stats file into the store
    Sync {
        #[arg(default_value = DEFAULT_STATS_FILE)]
        stats: PathBuf,
        /// Store file, overrides the config
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

/// Status lines on stderr, one per match.
#[derive(Default)]
struct CliProgress {
    total: usize,
    failed: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, number: usize, url: &str) {
        eprintln!("[{number}/{}] {url}", self.total);
    }
    fn item_failed(&mut self, number: usize, url: &str) {
        self.failed += 1;
        eprintln!("[{number}/{}] FAILED {url}", self.total);
    }
    fn finish(&mut self) {
        if self.failed > 0 {
            eprintln!("{} of {} matches could not be read", self.failed, self.total);
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose);

    let mut opts = match &cli.config {
        Some(path) => AppOptions::load(path)?,
        None => AppOptions::default(),
    };
    if let Some(ms) = cli.pause_ms {
        opts.scrape.pause_ms = ms;
    }

    match cli.command {
        Command::Scrape { series_url, out } => {
            let series = scrape_series(&opts, &series_url)?;
            let path = resolve_single_out_path(&out, DEFAULT_SCRAPE_FILE)?;
            write_json(&path, &series, &opts.export)?;
            println!("Wrote {} matches to {}", series.matches.len(), path.display());
        }
        Command::Match { match_url, out } => {
            let crawler = Crawler::new(HttpFetcher::new(&opts.scrape)?, &opts.scrape);
            let record = crawler.scrape_match(&match_url);
            println!(
                "{} batting, {} bowling, {} fielding entries",
                record.batting.len(),
                record.bowling.len(),
                record.fielding.len()
            );
            // one-match series, so `aggregate` reads it like any other scrape
            let series = Series { url: match_url, matches: vec![record] };
            let path = resolve_single_out_path(&out, DEFAULT_SCRAPE_FILE)?;
            write_json(&path, &series, &opts.export)?;
            println!("Wrote {}", path.display());
        }
        Command::Aggregate { input, out } => {
            let series: Series = read_json(&input)
                .wrap_err_with(|| format!("Reading scrape file {}", input.display()))?;
            write_stats(&opts, &series, &out)?;
        }
        Command::Run { series_url, data, out } => {
            let series = scrape_series(&opts, &series_url)?;
            let data_path = run_data_path(&data)?;
            write_json(&data_path, &series, &opts.export)?;
            info!("Raw scrape saved to {}", data_path.display());
            write_stats(&opts, &series, &out)?;
        }
        Command::Sync { stats, store } => {
            let store_path = store.unwrap_or_else(|| opts.store.path.clone());
            sync(&stats, &store_path, opts.store.row_id)?;
        }
    }
    Ok(())
}

/// `run` keeps its raw scrape where a bare `aggregate` will look for it.
fn run_data_path(data: &str) -> Result<PathBuf> {
    Ok(resolve_single_out_path(data, DEFAULT_AGGREGATE_INPUT)?)
}

fn scrape_series(opts: &AppOptions, url: &str) -> Result<Series> {
    let crawler = Crawler::new(HttpFetcher::new(&opts.scrape)?, &opts.scrape);
    let mut progress = CliProgress::default();
    Ok(crawler.scrape_series(url, Some(&mut progress)))
}

fn write_stats(opts: &AppOptions, series: &Series, out: &str) -> Result<()> {
    let Aggregation { stats, ambiguous } = aggregate::aggregate(series);
    let path = resolve_single_out_path(out, DEFAULT_STATS_FILE)?;
    write_json(&path, &stats, &opts.export)?;
    println!("Processed data saved to {}", path.display());
    println!("Total players: {}", stats.players.len());

    if !ambiguous.is_empty() {
        eprintln!("Ambiguous names, please review:");
        for a in &ambiguous {
            eprintln!(
                "  match {}: {:?} → {} (also: {})",
                a.match_number,
                a.raw_name,
                a.chosen,
                a.rivals.join(", ")
            );
        }
    }
    Ok(())
}

fn sync(stats_path: &Path, store_path: &Path, row_id: u32) -> Result<()> {
    let data: serde_json::Value = read_json(stats_path)
        .wrap_err_with(|| format!("Reading stats file {}", stats_path.display()))?;
    let row = StatsRow::from_value(row_id, data);
    let tournament = row.tournament_url.clone();
    let mut sink = JsonFileSink::new(store_path);
    sink.upsert(row)
        .wrap_err_with(|| format!("Writing store {}", store_path.display()))?;
    println!("Synced {} ({}) into {}", stats_path.display(), tournament, sink.path().display());
    Ok(())
}
