// Report generation from batch results

use serde::{Deserialize, Serialize};
use sitepulse_scanner::{BatchOutcome, FetchResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Widest title shown in the console table.
pub const MAX_TITLE_WIDTH: usize = 79;

const CSV_HEADER: &str = "url,title,status,time";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Render a duration the way the persisted record stores it, e.g. `0.42s`.
pub fn format_time(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report(results: &[FetchResult]) -> String {
    let mut report = String::new();
    report.push_str(CSV_HEADER);
    report.push('\n');

    for result in results {
        report.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&result.url),
            csv_field(&result.title),
            result.status,
            format_time(result.elapsed)
        ));
    }

    report
}

pub fn generate_json_report(outcome: &BatchOutcome) -> Result<String, ReportError> {
    let results: Vec<serde_json::Value> = outcome
        .results
        .iter()
        .map(|r| {
            serde_json::json!({
                "url": r.url,
                "title": r.title,
                "status": r.status,
                "time_seconds": r.elapsed_secs(),
                "error": r.error,
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "sitepulse",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "total_websites": outcome.len(),
                "succeeded": outcome.success_count(),
                "failed": outcome.failure_count(),
                "wall_clock_seconds": outcome.wall_clock().as_secs_f64(),
                "total_individual_seconds": outcome.total_individual_time().as_secs_f64(),
                "average_seconds": outcome.average_time().as_secs_f64(),
                "time_saved_seconds": outcome.time_saved().as_secs_f64()
            },
            "results": results
        }
    });

    Ok(serde_json::to_string_pretty(&json_report)?)
}

pub fn generate_report(outcome: &BatchOutcome, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Csv => Ok(generate_csv_report(&outcome.results)),
        ReportFormat::Json => generate_json_report(outcome),
    }
}

pub fn save_report(content: &str, path: &Path) -> Result<(), ReportError> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Collapse whitespace and cap the length so a title fits on one table row.
pub fn display_title(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_TITLE_WIDTH {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(MAX_TITLE_WIDTH - 3).collect();
    truncated.push_str("...");
    truncated
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a String>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&fill.to_string().repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

/// Grid table of results with no styling applied.
pub fn generate_results_table(results: &[FetchResult]) -> String {
    generate_results_table_styled(results, |_, cell| cell)
}

/// Grid table of results. `style_status` receives each status code with its already padded
/// cell, so escape codes added there do not disturb column alignment.
pub fn generate_results_table_styled<F>(results: &[FetchResult], style_status: F) -> String
where
    F: Fn(u16, String) -> String,
{
    let rows: Vec<(String, String, String, String)> = results
        .iter()
        .map(|r| {
            (
                r.url.clone(),
                display_title(&r.title),
                r.status.to_string(),
                format!("{:.2}", r.elapsed_secs()),
            )
        })
        .collect();

    let widths = [
        column_width("URL", rows.iter().map(|row| &row.0)),
        column_width("Title", rows.iter().map(|row| &row.1)),
        column_width("Status", rows.iter().map(|row| &row.2)),
        column_width("Time", rows.iter().map(|row| &row.3)),
    ];

    let mut table = String::new();
    table.push_str(&border(&widths, '-'));
    table.push_str(&format!(
        "| {:<w0$} | {:<w1$} | {:<w2$} | {:<w3$} |\n",
        "URL",
        "Title",
        "Status",
        "Time",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
    table.push_str(&border(&widths, '='));

    for (result, (url, title, status, time)) in results.iter().zip(&rows) {
        let status_cell = style_status(result.status, format!("{:<w$}", status, w = widths[2]));
        table.push_str(&format!(
            "| {:<w0$} | {:<w1$} | {} | {:>w3$} |\n",
            url,
            title,
            status_cell,
            time,
            w0 = widths[0],
            w1 = widths[1],
            w3 = widths[3],
        ));
    }
    table.push_str(&border(&widths, '-'));

    table
}

pub fn generate_summary(outcome: &BatchOutcome) -> String {
    let mut summary = String::new();
    summary.push_str("Summary:\n");
    summary.push_str(&format!("Total websites processed: {}\n", outcome.len()));
    summary.push_str(&format!(
        "Succeeded: {}  Failed: {}\n",
        outcome.success_count(),
        outcome.failure_count()
    ));
    summary.push_str(&format!(
        "Total execution time (wall clock): {:.2} seconds\n",
        outcome.wall_clock().as_secs_f64()
    ));
    summary.push_str(&format!(
        "Sum of individual request times: {:.2} seconds\n",
        outcome.total_individual_time().as_secs_f64()
    ));
    summary.push_str(&format!(
        "Average time per website: {:.2} seconds\n",
        outcome.average_time().as_secs_f64()
    ));
    summary.push_str(&format!(
        "Time saved compared to synchronous execution: {:.2} seconds\n",
        outcome.time_saved().as_secs_f64()
    ));
    summary
}
