// Encore - listening-history rankings
// Reads a streaming-history export, ranks your tracks five ways, explains the favorites

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use encore::{
    config::{Config, LoggingConfig},
    export::ExportManager,
    report::render_report,
    Analyzer, HistoryLoader,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Ranks your streaming history and finds your true favorites")]
struct Args {
    /// Folder holding StreamingHistory_music*.json files (overrides config)
    data_dir: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore plays before this date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "all_time")]
    since: Option<NaiveDate>,

    /// Use the whole history, no cutoff date
    #[arg(long)]
    all_time: bool,

    /// How many tracks each ranking shows
    #[arg(long)]
    top: Option<usize>,

    /// Also write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    write_config: bool,

    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,
}

fn init_logging(logging: &LoggingConfig, dev: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&logging.directory)
        .with_context(|| format!("could not create log dir {}", logging.directory.display()))?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&logging.directory, "encore.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the config filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false);

    // Dev mode mirrors everything to stderr as well
    let stderr_layer = dev.then(|| fmt::layer().with_writer(std::io::stderr).with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("could not install tracing subscriber")?;

    Ok(guard)
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(dir) = &args.data_dir {
        config.data_directory = dir.clone();
    }
    if let Some(since) = args.since {
        config.analysis.cutoff_date = Some(since);
    }
    if args.all_time {
        config.analysis.cutoff_date = None;
    }
    if let Some(top) = args.top {
        config.report.top_n = top;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load config - falls back to defaults if missing
    let mut config = Config::load(args.config.as_deref()).context("loading config")?;
    apply_overrides(&mut config, &args);

    // Fail fast on a bad config, before writing it out or touching any data
    config.validate()?;

    if args.write_config {
        let path = config.save(args.config.as_deref())?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    // Keep the guard alive for the whole run so buffered log lines get flushed
    let _guard = init_logging(&config.logging, args.dev)?;
    info!("Encore starting up");
    debug!(?config, "Effective configuration");
    let analyzer = Analyzer::new(config.analysis.clone(), config.report.clone())?;

    let loader = HistoryLoader::new(config.file_prefix.clone());
    let records = loader
        .load_dir(&config.data_directory)
        .with_context(|| format!("reading history from {}", config.data_directory.display()))?;

    let report = analyzer.run_records(records)?;
    print!("{}", render_report(&report, &config.report));

    if let Some(path) = &args.json {
        ExportManager::new().export_to_json(&report, path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
