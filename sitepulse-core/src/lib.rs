pub mod batch;
pub mod report;
pub mod targets;

pub use sitepulse_scanner::{BatchOutcome, FetchResult};
