use crate::api::types::ExploreResult;
use crate::config::ApiKeys;
use crate::error::{ExploreError, FETCH_FALLBACK, NetworkError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const OPENWEATHER_KEY_HEADER: &str = "X-OpenWeather-Key";
pub const UNSPLASH_KEY_HEADER: &str = "X-Unsplash-Key";

/// Seam between the UI and the explorer backend. Tests substitute a fake
/// that records calls instead of touching the network.
#[async_trait]
pub trait ExploreBackend: Send + Sync {
    async fn explore(&self, city: &str, keys: &ApiKeys) -> Result<ExploreResult, ExploreError>;

    /// Fetches the image once so the backdrop only swaps to a URL that is
    /// known to load.
    async fn preload_image(&self, url: &str) -> Result<(), ExploreError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to create custom HTTP client: {}", e);
                eprintln!("Using default client with standard timeout settings.");
                reqwest::Client::new()
            });

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn explore_url(&self) -> String {
        format!("{}/api/explore", self.endpoint)
    }

    fn explore_request(&self, city: &str, keys: &ApiKeys) -> Result<reqwest::Request, reqwest::Error> {
        self.client
            .get(self.explore_url())
            .query(&[("city", city)])
            .header(OPENWEATHER_KEY_HEADER, &keys.openweather)
            .header(UNSPLASH_KEY_HEADER, &keys.unsplash)
            .build()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extracts the banner message from a non-2xx body: the server's `error`
/// field when the body parses, otherwise the fixed fallback.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| FETCH_FALLBACK.to_string())
}

#[async_trait]
impl ExploreBackend for HttpBackend {
    async fn explore(&self, city: &str, keys: &ApiKeys) -> Result<ExploreResult, ExploreError> {
        let url = self.explore_url();
        let request = self
            .explore_request(city, keys)
            .map_err(|e| NetworkError::from_reqwest(e, &url, REQUEST_TIMEOUT_SECS))?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| NetworkError::from_reqwest(e, &url, REQUEST_TIMEOUT_SECS))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::from_reqwest(e, &url, REQUEST_TIMEOUT_SECS))?;

        if !status.is_success() {
            return Err(ExploreError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|_| ExploreError::Api {
            status: status.as_u16(),
            message: FETCH_FALLBACK.to_string(),
        })
    }

    async fn preload_image(&self, url: &str) -> Result<(), ExploreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(e, url, REQUEST_TIMEOUT_SECS))?;

        if !response.status().is_success() {
            return Err(ExploreError::Api {
                status: response.status().as_u16(),
                message: format!("image fetch failed for {}", url),
            });
        }

        // Drain the body so the fetch actually completes.
        response
            .bytes()
            .await
            .map_err(|e| NetworkError::from_reqwest(e, url, REQUEST_TIMEOUT_SECS))?;
        Ok(())
    }
}
