//! Wine catalog client.
//!
//! Fetches the published wine list over HTTP and fronts it with a
//! time-bounded cache kept in the injected key-value store.

pub mod source;

use std::time::Duration;

use async_trait::async_trait;
use common::{CatalogConfig, Error, Result};
use tracing::debug;
use url::Url;

pub use source::{CatalogLoad, DataSource, LoadOrigin};

/// Anything that can produce the raw wine list body.
///
/// `now_ms` is the caller's clock reading, used to defeat intermediate
/// HTTP caches.
#[async_trait]
pub trait WineFetcher: Send + Sync {
    async fn fetch(&self, now_ms: i64) -> Result<String>;
}

/// Append the `t=<now_ms>` cache-busting pair to the data URL.
pub fn cache_busted_url(data_url: &str, now_ms: i64) -> Result<Url> {
    let mut url =
        Url::parse(data_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", data_url, e)))?;
    url.query_pairs_mut().append_pair("t", &now_ms.to_string());
    Ok(url)
}

/// HTTP fetcher for the configured data URL.
#[derive(Debug, Clone)]
pub struct HttpWineFetcher {
    client: reqwest::Client,
    data_url: String,
    timeout_secs: u64,
}

impl HttpWineFetcher {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        // Fail on a bad URL here rather than on first fetch.
        cache_busted_url(&config.data_url, 0)?;

        let client = reqwest::Client::builder()
            .user_agent("winevino/0.1")
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            data_url: config.data_url.clone(),
            timeout_secs: config.fetch_timeout_secs,
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            Error::Http(e.to_string())
        }
    }
}

#[async_trait]
impl WineFetcher for HttpWineFetcher {
    async fn fetch(&self, now_ms: i64) -> Result<String> {
        let url = cache_busted_url(&self.data_url, now_ms)?;

        debug!("Fetching wine list: {}", url);

        let resp = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!("Got {} bytes from {}", body.len(), self.data_url);

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted_url_appends_timestamp() {
        let url = cache_busted_url("https://example.com/mobile_build/wines.json", 1_700_000_000_123)
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://example.com/mobile_build/wines.json?t=1700000000123"
        );
    }

    #[test]
    fn test_cache_busted_url_keeps_existing_query() {
        let url = cache_busted_url("http://localhost:5000/static/wines.json?v=3", 42).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/static/wines.json?v=3&t=42");
    }

    #[test]
    fn test_cache_busted_url_rejects_relative() {
        let err = cache_busted_url("/static/wines.json", 1).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_http_fetcher_rejects_bad_config_url() {
        let config = CatalogConfig {
            data_url: "not a url".into(),
            ..CatalogConfig::default()
        };
        assert!(HttpWineFetcher::new(&config).is_err());
    }
}
