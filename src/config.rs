//! Configuration loader: merges env vars, .env file, and config.toml.

use common::config::{CatalogConfig, DetailLinkStyle, Variant};
use common::Error;
use serde::Deserialize;
use std::path::Path;

/// `config.toml` contents; every field is optional and overrides the
/// variant preset.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    variant: Option<Variant>,
    data_url: Option<String>,
    detail_base_url: Option<String>,
    detail_link: Option<DetailLinkStyle>,
    pagination_enabled: Option<bool>,
    page_size: Option<usize>,
    cache_duration_secs: Option<u64>,
    fetch_timeout_secs: Option<u64>,
    storage_path: Option<String>,
}

impl FileConfig {
    fn apply(self, config: &mut CatalogConfig) {
        if let Some(v) = self.data_url {
            config.data_url = v;
        }
        if let Some(v) = self.detail_base_url {
            config.detail_base_url = v;
        }
        if let Some(v) = self.detail_link {
            config.detail_link = v;
        }
        if let Some(v) = self.pagination_enabled {
            config.pagination_enabled = v;
        }
        if let Some(v) = self.page_size {
            config.page_size = v;
        }
        if let Some(v) = self.cache_duration_secs {
            config.cache_duration_secs = v;
        }
        if let Some(v) = self.fetch_timeout_secs {
            config.fetch_timeout_secs = v;
        }
        if let Some(v) = self.storage_path {
            config.storage_path = v;
        }
    }
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(Error::Config(format!("{env_name} must be an integer > 0"))),
    }
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

pub fn parse_variant(raw: &str) -> Result<Variant, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "www" | "web" => Ok(Variant::Www),
        "mobile" | "mobile_build" => Ok(Variant::Mobile),
        _ => Err(Error::Config("variant must be one of: www, mobile".into())),
    }
}

fn validate_config(config: &CatalogConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if !(config.data_url.starts_with("http://") || config.data_url.starts_with("https://")) {
        issues.push("data_url must be an absolute http(s) URL".into());
    }
    if !(config.detail_base_url.starts_with("http://")
        || config.detail_base_url.starts_with("https://"))
    {
        issues.push("detail_base_url must be an absolute http(s) URL".into());
    }
    match &config.detail_link {
        DetailLinkStyle::Path { prefix } => {
            if prefix.trim_matches('/').is_empty() {
                issues.push("detail_link.prefix must not be empty".into());
            }
        }
        DetailLinkStyle::Query { page, param } => {
            if page.trim().is_empty() {
                issues.push("detail_link.page must not be empty".into());
            }
            if param.trim().is_empty() {
                issues.push("detail_link.param must not be empty".into());
            }
        }
    }
    if config.page_size == 0 {
        issues.push("page_size must be > 0".into());
    }
    if config.cache_duration_secs == 0 {
        issues.push("cache_duration_secs must be > 0".into());
    }
    if config.fetch_timeout_secs == 0 {
        issues.push("fetch_timeout_secs must be > 0".into());
    }
    if config.storage_path.trim().is_empty() {
        issues.push("storage_path must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load catalog configuration from environment and optional config file.
///
/// Variant precedence: `cli_variant`, then `WINEVINO_VARIANT`, then the
/// `variant` in config.toml, then www.
pub fn load_config(cli_variant: Option<Variant>) -> Result<CatalogConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Read config.toml if it exists.
    let config_path = Path::new("config.toml");
    let file_config = if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        toml::from_str::<FileConfig>(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?
    } else {
        FileConfig::default()
    };

    // 3. Pick the variant preset.
    let env_variant = match std::env::var("WINEVINO_VARIANT") {
        Ok(raw) => Some(parse_variant(&raw)?),
        Err(_) => None,
    };
    let variant = cli_variant
        .or(env_variant)
        .or(file_config.variant)
        .unwrap_or(Variant::Www);
    let mut config = CatalogConfig::for_variant(variant);

    // 4. File values override the preset.
    file_config.apply(&mut config);

    // 5. Environment variables override everything else.
    if let Ok(url) = std::env::var("WINEVINO_DATA_URL") {
        config.data_url = url.trim().to_string();
    }
    if let Ok(url) = std::env::var("WINEVINO_DETAIL_BASE_URL") {
        config.detail_base_url = url.trim().to_string();
    }
    if let Ok(path) = std::env::var("WINEVINO_STORAGE_PATH") {
        config.storage_path = path.trim().to_string();
    }
    if let Ok(raw) = std::env::var("WINEVINO_CACHE_HOURS") {
        let hours = parse_positive_u64(&raw, "WINEVINO_CACHE_HOURS")?;
        config.cache_duration_secs = hours.saturating_mul(3600);
    }
    if let Ok(raw) = std::env::var("WINEVINO_FETCH_TIMEOUT_SECS") {
        config.fetch_timeout_secs = parse_positive_u64(&raw, "WINEVINO_FETCH_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("WINEVINO_PAGE_SIZE") {
        let size = parse_positive_u64(&raw, "WINEVINO_PAGE_SIZE")?;
        config.page_size = usize::try_from(size)
            .map_err(|_| Error::Config("WINEVINO_PAGE_SIZE is too large".into()))?;
    }
    if let Ok(raw) = std::env::var("WINEVINO_PAGINATION") {
        config.pagination_enabled = parse_bool(&raw);
    }

    // 6. Validate.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(validate_config(&CatalogConfig::for_variant(Variant::Www)).is_ok());
        assert!(validate_config(&CatalogConfig::for_variant(Variant::Mobile)).is_ok());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let config = CatalogConfig {
            data_url: "/static/wines.json".into(),
            page_size: 0,
            fetch_timeout_secs: 0,
            detail_link: DetailLinkStyle::Query {
                page: "detail.html".into(),
                param: " ".into(),
            },
            ..CatalogConfig::default()
        };

        let Err(Error::Config(msg)) = validate_config(&config) else {
            panic!("config should be rejected");
        };
        assert!(msg.contains("data_url"));
        assert!(msg.contains("page_size"));
        assert!(msg.contains("fetch_timeout_secs"));
        assert!(msg.contains("detail_link.param"));
        assert!(!msg.contains("cache_duration_secs"));
    }

    #[test]
    fn test_file_config_overrides_preset() {
        let file: FileConfig = toml::from_str(
            r#"
            variant = "mobile"
            page_size = 20
            storage_path = "/tmp/winevino.json"

            [detail_link]
            kind = "path"
            prefix = "wine"
            "#,
        )
        .expect("toml should parse");
        assert_eq!(file.variant, Some(Variant::Mobile));

        let mut config = CatalogConfig::for_variant(Variant::Mobile);
        file.apply(&mut config);

        assert_eq!(config.page_size, 20);
        assert_eq!(config.storage_path, "/tmp/winevino.json");
        assert!(config.pagination_enabled);
        assert_eq!(
            config.detail_link,
            DetailLinkStyle::Path {
                prefix: "wine".into()
            }
        );
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!(parse_variant(" Mobile ").unwrap(), Variant::Mobile);
        assert_eq!(parse_variant("www").unwrap(), Variant::Www);
        assert!(parse_variant("desktop").is_err());
    }
}
