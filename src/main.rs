//! CLI entry point for the bikeshare explorer.
//!
//! Runs one analysis cycle over the selected regions, months and weekdays,
//! prints the four statistic blocks, and optionally pages through the raw
//! trips five at a time.

use anyhow::{Context, Result};
use bikeshare_explorer::{
    output::{AnalysisOutput, SummaryRow, append_record, print_pretty, render_report, render_window, to_json},
    pager::{PagerState, RawDataPager},
    pipeline,
    selection::SelectionSet,
    sources::{Region, SourceConfig, SourceRegistry},
    stats::compute_all,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore bikeshare trip data by region, month and weekday", long_about = None)]
struct Cli {
    /// Directory holding the default per-region CSV files
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    /// JSON file mapping region names to file paths or URLs
    #[arg(short, long, global = true)]
    sources: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute trip statistics for a selection
    Analyze {
        /// Comma-separated regions: chicago, new york city, washington
        #[arg(short, long)]
        regions: String,

        /// Comma-separated months from january to june, or "all"
        #[arg(short, long, default_value = "all")]
        months: String,

        /// Comma-separated weekdays from sunday to saturday, or "all"
        #[arg(short = 'w', long, default_value = "all")]
        days: String,

        /// Print the structured result as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a one-row summary to
        #[arg(short, long)]
        output: Option<String>,

        /// Page through the raw trips, asking before each further window
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Page through every raw trip without asking
        #[arg(long, default_value_t = false)]
        page_all: bool,
    },
    /// List known regions and where their data is read from
    Regions,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;

    let cli = Cli::parse();
    let registry = build_registry(cli.data_dir, cli.sources)?;

    match cli.command {
        Commands::Analyze {
            regions,
            months,
            days,
            json,
            output,
            raw,
            page_all,
        } => {
            let selection = SelectionSet::parse(&regions, &months, &days)?;
            analyze(&registry, &selection, json, output.as_deref(), raw || page_all, page_all)?;
        }
        Commands::Regions => {
            println!("data directory: {}", registry.data_dir().display());
            for region in Region::ALL {
                let handle = registry.resolve(region);
                println!("{:<14} {}", region.name(), handle.location);
            }
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Data directory from the flag, then `BIKESHARE_DATA_DIR`, then the working
/// directory. Source overrides from the flag, then `BIKESHARE_SOURCES`.
fn build_registry(data_dir: Option<String>, sources: Option<String>) -> Result<SourceRegistry> {
    let data_dir = data_dir
        .or_else(|| std::env::var("BIKESHARE_DATA_DIR").ok())
        .unwrap_or_else(|| ".".to_string());
    let mut registry = SourceRegistry::new(data_dir);

    if let Some(path) = sources.or_else(|| std::env::var("BIKESHARE_SOURCES").ok()) {
        let overrides = SourceConfig::load(&path)
            .with_context(|| format!("loading source overrides from {path}"))?;
        info!(path, "Loaded source overrides");
        registry = registry.with_overrides(overrides);
    }

    Ok(registry)
}

#[tracing::instrument(skip(registry, output))]
fn analyze(
    registry: &SourceRegistry,
    selection: &SelectionSet,
    json: bool,
    output: Option<&str>,
    raw: bool,
    page_all: bool,
) -> Result<()> {
    let analysis = pipeline::run(registry, selection)?;

    for mismatch in analysis.report.mismatches() {
        warn!(%mismatch, "Statistics depending on missing columns will report not available");
    }
    if analysis.dataset.is_empty() {
        warn!("No trips match the selection");
    }

    let stats = compute_all(&analysis.dataset);
    print_pretty(&stats);

    if json {
        println!(
            "{}",
            to_json(&AnalysisOutput {
                selection,
                load: &analysis.report,
                stats: &stats,
            })?
        );
    } else {
        print!("{}", render_report(&stats));
    }

    if let Some(path) = output {
        append_record(path, &SummaryRow::new(selection, &stats))?;
        info!(path, "Appended summary row");
    }

    if raw {
        page_raw_data(RawDataPager::new(&analysis.dataset), page_all)?;
    }

    Ok(())
}

/// Drives the pager from stdin answers. Anything but `y` stops paging.
fn page_raw_data(mut pager: RawDataPager<'_>, page_all: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("\nRaw data, 5 rows at a time, most recent start time first:");
    let mut window = pager.show()?;

    loop {
        print!("{}", render_window(&window));

        if pager.state() == PagerState::Exhausted {
            println!("End of data.");
            break;
        }

        if !page_all {
            print!("\nEnter 'Y' to see the next 5 rows, otherwise press enter to stop\n>> ");
            stdout.flush()?;

            let mut answer = String::new();
            stdin.lock().read_line(&mut answer)?;
            if !answer.trim().eq_ignore_ascii_case("y") {
                pager.stop()?;
                println!("Ending raw data display.");
                break;
            }
        }

        window = pager.advance()?;
    }

    info!(shown = pager.cursor().min(pager.len()), state = ?pager.state(), "Raw data paging finished");
    Ok(())
}
