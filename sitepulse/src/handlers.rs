use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitepulse_core::BatchOutcome;
use sitepulse_core::batch::{BatchOptions, execute_batch};
use sitepulse_core::report::{
    ReportFormat, generate_report, generate_results_table_styled, generate_summary, save_report,
};
use sitepulse_core::targets::default_targets;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Everything a fetch run needs, resolved from the command line
pub struct FetchSettings {
    pub urls: Vec<String>,
    pub output: PathBuf,
    pub format: ReportFormat,
    pub show_table: bool,
    pub quiet: bool,
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the default level.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so the results table on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn print_banner() {
    println!(
        "{} {}",
        "sitepulse".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
    println!("{}", "concurrent page title & latency check".blue());
}

// Helper functions for fetch handler

/// Expand a leading `~` to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Load URLs from the hosts file, the given URLs, or the built-in targets, in that order
pub fn load_urls_from_source(urls: &[String], hosts_file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if !urls.is_empty() {
        Ok(urls.to_vec())
    } else {
        Ok(default_targets())
    }
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    let candidate = if line.contains("://") {
        line.to_string()
    } else {
        format!("http://{}", line)
    };

    match Url::parse(&candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            Some(candidate)
        }
        _ => {
            warn!("Skipping invalid URL '{}'", line);
            None
        }
    }
}

fn default_output_path(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::Csv => "results.csv",
        ReportFormat::Json => "results.json",
    }
}

fn colorize_status(status: u16, cell: String) -> String {
    match status {
        100..=199 => cell.white(),
        200..=299 => cell.green(),
        300..=399 => cell.cyan(),
        400..=499 => cell.yellow(),
        500..=599 => cell.red(),
        _ => cell.normal(),
    }
    .to_string()
}

/// Resolve command-line arguments into run settings
pub fn settings_from_args(args: &ArgMatches) -> Result<FetchSettings> {
    let urls: Vec<String> = args
        .get_many::<String>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let hosts_file = args
        .get_one::<String>("hosts-file")
        .map(|path| expand_path(path));

    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("csv");
    let Some(format) = ReportFormat::from_str(format_name) else {
        bail!("Unsupported report format '{}'", format_name);
    };

    let output = args
        .get_one::<String>("output")
        .map(|path| expand_path(path))
        .unwrap_or_else(|| PathBuf::from(default_output_path(format)));

    Ok(FetchSettings {
        urls: load_urls_from_source(&urls, hosts_file.as_deref())?,
        output,
        format,
        show_table: !args.get_flag("no-table"),
        quiet: args.get_flag("quiet"),
    })
}

/// Fetch every page, persist the record and print the results
pub async fn run_fetch(settings: FetchSettings) -> Result<BatchOutcome> {
    let FetchSettings {
        urls,
        output,
        format,
        show_table,
        quiet,
    } = settings;

    let options = BatchOptions {
        urls,
        show_progress_bars: !quiet,
    };
    let outcome = execute_batch(options, None)
        .await
        .context("Failed to run batch")?;

    let record = generate_report(&outcome, format)?;
    save_report(&record, &output)
        .with_context(|| format!("Failed to save results to {}", output.display()))?;
    info!("Results saved to {}", output.display());

    if show_table {
        println!("\nResults:");
        print!(
            "{}",
            generate_results_table_styled(&outcome.results, colorize_status)
        );
    }
    println!();
    print!("{}", generate_summary(&outcome));

    info!(
        "Total execution time: {:.2} seconds",
        outcome.wall_clock().as_secs_f64()
    );

    Ok(outcome)
}

pub async fn handle_fetch(args: &ArgMatches) -> Result<()> {
    let settings = settings_from_args(args)?;

    if !settings.quiet {
        println!("\nFetching {} page(s)", settings.urls.len());
        println!("Output: {}\n", settings.output.display());
    }

    let outcome = run_fetch(settings).await?;
    if outcome.failure_count() > 0 {
        warn!(
            "{} of {} pages could not be fetched",
            outcome.failure_count(),
            outcome.len()
        );
    }

    Ok(())
}
