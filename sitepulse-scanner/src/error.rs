use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
