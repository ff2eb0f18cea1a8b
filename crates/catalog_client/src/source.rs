//! Cache-or-fetch data source.
//!
//! A payload fetched within the last cache window is served straight from
//! the key-value store. Otherwise the list is fetched, validated, and the
//! raw body plus fetch time overwrite the cached entries. Only one load runs
//! at a time; an overlapping trigger is rejected with `LoadInFlight`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::storage::{CACHE_KEY, CACHE_TIMESTAMP_KEY};
use common::{Error, KeyValueStore, Result, WineRecord};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::WineFetcher;

/// Where a loaded wine list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Cache,
    Network,
}

/// Result of one data source run.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub wines: Vec<WineRecord>,
    pub origin: LoadOrigin,
}

pub struct DataSource<F> {
    fetcher: F,
    store: Arc<dyn KeyValueStore>,
    cache_duration_ms: i64,
    in_flight: Mutex<()>,
}

impl<F: WineFetcher> DataSource<F> {
    pub fn new(fetcher: F, store: Arc<dyn KeyValueStore>, cache_duration_ms: i64) -> Self {
        Self {
            fetcher,
            store,
            cache_duration_ms,
            in_flight: Mutex::new(()),
        }
    }

    /// Return the wine list, preferring a fresh cached payload.
    pub async fn get_wines(&self, now: DateTime<Utc>) -> Result<CatalogLoad> {
        let _guard = self.in_flight.try_lock().map_err(|_| Error::LoadInFlight)?;
        self.load(now).await
    }

    /// Drop the cached payload and load from the network.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<CatalogLoad> {
        let _guard = self.in_flight.try_lock().map_err(|_| Error::LoadInFlight)?;
        info!("Refresh requested; clearing cached wine list");
        self.clear_cache()?;
        self.load(now).await
    }

    /// Remove both cache entries.
    pub fn clear_cache(&self) -> Result<()> {
        self.store.remove(CACHE_KEY)?;
        self.store.remove(CACHE_TIMESTAMP_KEY)
    }

    async fn load(&self, now: DateTime<Utc>) -> Result<CatalogLoad> {
        let now_ms = now.timestamp_millis();

        if let Some(payload) = self.fresh_cached_payload(now_ms)? {
            let wines: Vec<WineRecord> = serde_json::from_str(&payload)?;
            info!("Using cached wine list ({} wines)", wines.len());
            return Ok(CatalogLoad {
                wines,
                origin: LoadOrigin::Cache,
            });
        }

        info!("Fetching fresh wine list");
        let body = match self.fetcher.fetch(now_ms).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Wine list fetch failed: {}", e);
                return Err(e);
            }
        };
        let wines: Vec<WineRecord> = serde_json::from_str(&body)?;

        self.store.set(CACHE_KEY, &body)?;
        self.store.set(CACHE_TIMESTAMP_KEY, &now_ms.to_string())?;
        info!("Cached {} wines at {}", wines.len(), now_ms);

        Ok(CatalogLoad {
            wines,
            origin: LoadOrigin::Network,
        })
    }

    /// Cached payload if both entries exist and the timestamp is inside the window.
    fn fresh_cached_payload(&self, now_ms: i64) -> Result<Option<String>> {
        let Some(payload) = self.store.get(CACHE_KEY)? else {
            return Ok(None);
        };
        let Some(raw_ts) = self.store.get(CACHE_TIMESTAMP_KEY)? else {
            return Ok(None);
        };
        let Some(cached_at) = parse_leading_int(&raw_ts) else {
            debug!("Ignoring unparsable cache timestamp {:?}", raw_ts);
            return Ok(None);
        };

        let age_ms = now_ms.saturating_sub(cached_at);
        if age_ms < self.cache_duration_ms {
            Ok(Some(payload))
        } else {
            debug!("Cached wine list is stale (age {}ms)", age_ms);
            Ok(None)
        }
    }
}

/// Parse the leading integer of `raw`, ignoring anything after it, so
/// `"1700000000000.0"` reads as 1700000000000. `None` if no digits lead.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}
