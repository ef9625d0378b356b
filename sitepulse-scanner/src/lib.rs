pub mod error;
pub mod fetcher;
pub mod result;
pub mod title;

pub use error::ScanError;
pub use fetcher::{PageFetcher, ResultCallback, fetch_all, fetch_all_with_callback};
pub use result::{BatchOutcome, FAILED_STATUS, FAILED_TITLE, FetchResult};
pub use title::{NO_TITLE, extract_title};
