//! API client for the episodes REST backend.
//!
//! The backend is a json-server style service exposing `/episodes` (with
//! `_limit`, `_sort` and `_order` query parameters) and `/episodes/{id}`.

use crate::error::{AppError, Result};
use crate::types::{Episode, RawEpisode};
use log::{debug, info, warn};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Maximum number of retry attempts for failed requests.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds (doubles each retry).
const BASE_RETRY_DELAY_MS: u64 = 500;

const USER_AGENT: &str = concat!("podcastr/", env!("CARGO_PKG_VERSION"));

/// Check if an error is retryable (network errors, timeouts, server errors).
fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_timeout()
        || error.is_connect()
        || error.is_request()
        || error.status().map(|s| s.is_server_error()).unwrap_or(false)
}

/// Retry an async operation with exponential backoff.
///
/// Retries the operation up to `MAX_RETRIES` times on retryable errors,
/// with exponential backoff starting at `BASE_RETRY_DELAY_MS`.
async fn retry_with_backoff<T, F, Fut>(operation_name: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, reqwest::Error>>,
{
    let mut last_error = None;

    for attempt in 0..=MAX_RETRIES {
        match f().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(
                        "{} succeeded after {} attempts",
                        operation_name,
                        attempt + 1
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if attempt < MAX_RETRIES && is_retryable_error(&e) {
                    let delay = Duration::from_millis(BASE_RETRY_DELAY_MS * 2_u64.pow(attempt));
                    warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                        operation_name,
                        attempt + 1,
                        MAX_RETRIES + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    last_error = Some(e);
                } else {
                    return Err(AppError::Network(format!("{} failed: {}", operation_name, e)));
                }
            }
        }
    }

    Err(AppError::Network(format!(
        "{} failed after {} attempts: {}",
        operation_name,
        MAX_RETRIES + 1,
        last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string())
    )))
}

/// Client for the episodes backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn episodes_url(&self) -> String {
        format!("{}/episodes", self.base_url)
    }

    pub fn episode_url(&self, id: &str) -> String {
        format!("{}/episodes/{}", self.base_url, id)
    }

    /// Fetch the newest `limit` episodes, newest first.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> podcastr::error::Result<()> {
    /// let api = podcastr::api::ApiClient::new("http://localhost:3333")?;
    /// for episode in api.fetch_latest_episodes(12).await? {
    ///     println!("{}", episode.to_display());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_latest_episodes(&self, limit: usize) -> Result<Vec<Episode>> {
        debug!("Fetching {} latest episodes from {}", limit, self.base_url);

        let url = self.episodes_url();
        let limit_str = limit.to_string();

        let resp = retry_with_backoff("Fetch episodes", || {
            let request = self.client.get(&url).query(&[
                ("_limit", limit_str.as_str()),
                ("_sort", "published_at"),
                ("_order", "desc"),
            ]);
            async move { request.send().await?.error_for_status() }
        })
        .await?;

        let raw: Vec<RawEpisode> = resp
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse episode list: {}", e)))?;

        let episodes: Vec<Episode> = raw.into_iter().map(Episode::from).collect();

        debug!("Fetched {} episodes", episodes.len());

        Ok(episodes)
    }

    /// Fetch a single episode by id.
    pub async fn fetch_episode(&self, id: &str) -> Result<Episode> {
        debug!("Fetching episode {}", id);

        let url = self.episode_url(id);

        // 404 passes through untouched so it is neither retried nor reported as a network error.
        let resp = retry_with_backoff(&format!("Fetch episode '{}'", id), || {
            let request = self.client.get(&url);
            async move {
                let resp = request.send().await?;
                if resp.status() == StatusCode::NOT_FOUND {
                    Ok(resp)
                } else {
                    resp.error_for_status()
                }
            }
        })
        .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("episode '{}'", id)));
        }

        let raw: RawEpisode = resp
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse episode '{}': {}", id, e)))?;

        Ok(Episode::from(raw))
    }
}
