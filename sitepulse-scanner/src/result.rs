use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status recorded when a request could not be completed at all.
pub const FAILED_STATUS: u16 = 500;

/// Title recorded when a request could not be completed at all.
pub const FAILED_TITLE: &str = "N/A";

/// Outcome of fetching a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub url: String,
    pub title: String,
    pub status: u16,
    pub elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchResult {
    pub fn new(url: String, title: String, status: u16, elapsed: Duration) -> Self {
        Self {
            url,
            title,
            status,
            elapsed,
            error: None,
        }
    }

    /// Sentinel result for a request that never produced a response.
    pub fn failed(url: String, error: String) -> Self {
        Self {
            url,
            title: FAILED_TITLE.to_string(),
            status: FAILED_STATUS,
            elapsed: Duration::ZERO,
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Ordered results of one batch plus its timings.
///
/// `total_individual_time` sums the per-request durations, which overlap when requests run
/// concurrently; `wall_clock` is the real span of the batch. Both are kept so the report can
/// show either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub results: Vec<FetchResult>,
    pub wall_clock: Duration,
}

impl BatchOutcome {
    pub fn new(results: Vec<FetchResult>, wall_clock: Duration) -> Self {
        Self {
            results,
            wall_clock,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn wall_clock(&self) -> Duration {
        self.wall_clock
    }

    pub fn total_individual_time(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }

    pub fn average_time(&self) -> Duration {
        if self.results.is_empty() {
            return Duration::ZERO;
        }
        self.total_individual_time() / self.results.len() as u32
    }

    /// Time gained over issuing the same requests one after another.
    pub fn time_saved(&self) -> Duration {
        self.total_individual_time().saturating_sub(self.wall_clock)
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_failure()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }
}
