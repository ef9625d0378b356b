use crate::error::{Result, ScanError};
use crate::result::{BatchOutcome, FetchResult};
use crate::title::{NO_TITLE, extract_title};
use encoding_rs::{Encoding, UTF_8};
use futures::future::join_all;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use url::Url;

/// Invoked once per settled fetch, in completion order.
pub type ResultCallback = Arc<dyn Fn(&FetchResult) + Send + Sync>;

const USER_AGENT: &str = concat!("sitepulse/", env!("CARGO_PKG_VERSION"));

/// Issues GET requests for pages and records their title, status and latency.
///
/// The wrapped [`Client`] is shared by every request of a batch. It is reference counted
/// internally, so cloning it into each task reuses the same connection pool.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher with the client's default timeouts and redirect policy.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScanError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetches one page. Failures come back as a sentinel [`FetchResult`], never as an error.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        Self::fetch_with_client(&self.client, url).await
    }

    /// Fetches every URL concurrently and returns the results in input order.
    pub async fn fetch_all(
        &self,
        urls: &[String],
        on_result: Option<ResultCallback>,
    ) -> BatchOutcome {
        info!("Fetching {} pages", urls.len());
        let started = Instant::now();

        // One task per URL; handles stay in input order so results are joined positionally.
        let handles: Vec<_> = urls
            .iter()
            .map(|url| {
                let client = self.client.clone();
                let url = url.clone();
                let on_result = on_result.clone();

                tokio::spawn(async move {
                    let result = Self::fetch_with_client(&client, &url).await;
                    if let Some(ref callback) = on_result {
                        callback(&result);
                    }
                    result
                })
            })
            .collect();

        let results: Vec<FetchResult> = join_all(handles)
            .await
            .into_iter()
            .zip(urls)
            .map(|(joined, url)| match joined {
                Ok(result) => result,
                Err(e) => {
                    let e = ScanError::from(e);
                    error!("Error fetching {}: {}", url, e);
                    let result = FetchResult::failed(url.clone(), e.to_string());
                    if let Some(ref callback) = on_result {
                        callback(&result);
                    }
                    result
                }
            })
            .collect();

        let wall_clock = started.elapsed();
        info!(
            "Fetched {} pages in {:.2}s",
            results.len(),
            wall_clock.as_secs_f64()
        );

        BatchOutcome::new(results, wall_clock)
    }

    async fn fetch_with_client(client: &Client, url: &str) -> FetchResult {
        match Self::try_fetch(client, url).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error fetching {}: {}", url, e);
                FetchResult::failed(url.to_string(), e.to_string())
            }
        }
    }

    async fn try_fetch(client: &Client, url: &str) -> Result<FetchResult> {
        debug!("Fetching {}", url);

        Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        let start = Instant::now();
        let response = client.get(url).send().await?;
        let status = response.status();

        let title = if status == StatusCode::OK {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let bytes = response.bytes().await?;
            let body = decode_body(content_type.as_deref(), &bytes)?;
            extract_title(&body)
        } else {
            NO_TITLE.to_string()
        };
        let elapsed = start.elapsed();

        debug!("{} -> {} in {:?}", url, status.as_u16(), elapsed);

        Ok(FetchResult::new(
            url.to_string(),
            title,
            status.as_u16(),
            elapsed,
        ))
    }
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Decodes a body in its declared charset (UTF-8 when none is declared).
///
/// Malformed input is an error rather than being patched with replacement characters. A byte
/// order mark overrides the declared charset.
pub fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> Result<String> {
    let declared = match content_type.and_then(charset_label) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ScanError::Decode(format!("unknown charset '{}'", label)))?,
        None => UTF_8,
    };

    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| ScanError::Decode(format!("body is not valid {}", encoding.name())))
}

/// Fetches a batch with a client that lives exactly as long as the call.
pub async fn fetch_all(urls: &[String]) -> Result<BatchOutcome> {
    fetch_all_with_callback(urls, None).await
}

pub async fn fetch_all_with_callback(
    urls: &[String],
    on_result: Option<ResultCallback>,
) -> Result<BatchOutcome> {
    let fetcher = PageFetcher::new()?;
    Ok(fetcher.fetch_all(urls, on_result).await)
}
