use indicatif::{ProgressBar, ProgressStyle};
use sitepulse_scanner::error::Result;
use sitepulse_scanner::{BatchOutcome, FetchResult, ResultCallback, fetch_all_with_callback};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Options for configuring a batch run
pub struct BatchOptions {
    pub urls: Vec<String>,
    pub show_progress_bars: bool,
}

/// Callback for reporting individual fetch results as they settle
pub type BatchResultCallback = Arc<dyn Fn(FetchResult) + Send + Sync>;

fn spinner(total: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching... 0/{} pages settled", total));
    pb
}

/// Execute one batch with the given options
/// Returns the ordered outcome
pub async fn execute_batch(
    options: BatchOptions,
    result_callback: Option<BatchResultCallback>,
) -> Result<BatchOutcome> {
    let BatchOptions {
        urls,
        show_progress_bars,
    } = options;
    let total = urls.len();

    let progress_bar = show_progress_bars.then(|| Arc::new(spinner(total)));
    let settled = Arc::new(AtomicUsize::new(0));

    let pb_clone = progress_bar.clone();
    let internal_callback: ResultCallback = Arc::new(move |result: &FetchResult| {
        let count = settled.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Fetching... {}/{} pages settled", count, total));
        }
        if let Some(ref cb) = result_callback {
            cb(result.clone());
        }
    });

    let outcome = fetch_all_with_callback(&urls, Some(internal_callback)).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let outcome = outcome?;
    info!(
        "Batch complete: {} succeeded, {} failed",
        outcome.success_count(),
        outcome.failure_count()
    );

    Ok(outcome)
}
