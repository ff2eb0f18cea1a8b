//! Catalog configuration types.
//!
//! The two front-end variants share one pipeline and differ only in where
//! the wine list lives, how a wine's detail page is addressed, and whether
//! the list is paginated.

use serde::{Deserialize, Serialize};

/// Which front-end variant is being served.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Static site served next to its own `static/wines.json`.
    Www,
    /// Packaged mobile build reading the published data file.
    Mobile,
}

/// How a wine's detail view is addressed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailLinkStyle {
    /// `<base>/<prefix>/<encoded name>`
    Path { prefix: String },
    /// `<base>/<page>?<param>=<encoded name>`
    Query { page: String, param: String },
}

/// Top-level catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Variant this configuration was derived from.
    #[serde(default = "default_variant")]
    pub variant: Variant,

    /// Absolute URL of the wine list JSON.
    #[serde(default = "default_www_data_url")]
    pub data_url: String,

    /// Base URL detail links are resolved against.
    #[serde(default = "default_www_detail_base_url")]
    pub detail_base_url: String,

    /// Detail link scheme.
    #[serde(default = "default_www_detail_link")]
    pub detail_link: DetailLinkStyle,

    /// Split the result list into pages.
    #[serde(default)]
    pub pagination_enabled: bool,

    /// Wines per page when pagination is enabled.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How long a fetched payload is reused without touching the network.
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,

    /// Upper bound on a single catalog fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// JSON file backing the local key-value store.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_variant() -> Variant {
    Variant::Www
}

fn default_www_data_url() -> String {
    "http://localhost:5000/static/wines.json".into()
}
fn default_www_detail_base_url() -> String {
    "http://localhost:5000/".into()
}
fn default_www_detail_link() -> DetailLinkStyle {
    DetailLinkStyle::Path {
        prefix: "wine".into(),
    }
}

fn default_mobile_data_url() -> String {
    "https://macdudu2014.github.io/winevino/mobile_build/wines.json".into()
}
fn default_mobile_detail_base_url() -> String {
    "https://macdudu2014.github.io/winevino/mobile_build/".into()
}
fn default_mobile_detail_link() -> DetailLinkStyle {
    DetailLinkStyle::Query {
        page: "detail.html".into(),
        param: "name".into(),
    }
}

fn default_page_size() -> usize {
    50
}
fn default_cache_duration_secs() -> u64 {
    24 * 60 * 60
}
fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_storage_path() -> String {
    "winevino-storage.json".into()
}

impl CatalogConfig {
    /// Preset configuration for a front-end variant.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Www => Self {
                variant,
                data_url: default_www_data_url(),
                detail_base_url: default_www_detail_base_url(),
                detail_link: default_www_detail_link(),
                pagination_enabled: false,
                page_size: default_page_size(),
                cache_duration_secs: default_cache_duration_secs(),
                fetch_timeout_secs: default_fetch_timeout_secs(),
                storage_path: default_storage_path(),
            },
            Variant::Mobile => Self {
                variant,
                data_url: default_mobile_data_url(),
                detail_base_url: default_mobile_detail_base_url(),
                detail_link: default_mobile_detail_link(),
                pagination_enabled: true,
                page_size: default_page_size(),
                cache_duration_secs: default_cache_duration_secs(),
                fetch_timeout_secs: default_fetch_timeout_secs(),
                storage_path: default_storage_path(),
            },
        }
    }

    /// Cache window in milliseconds, the unit stored timestamps use.
    pub fn cache_duration_ms(&self) -> i64 {
        i64::try_from(self.cache_duration_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Www)
    }
}
