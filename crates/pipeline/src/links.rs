//! Detail-page links for a selected wine.

use common::config::DetailLinkStyle;
use common::{CatalogConfig, Error, Result};
use url::Url;

/// Resolve the detail-page URL for `name` under the configured scheme.
pub fn detail_url(config: &CatalogConfig, name: &str) -> Result<Url> {
    let base = Url::parse(&config.detail_base_url)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.detail_base_url, e)))?;

    match &config.detail_link {
        DetailLinkStyle::Path { prefix } => {
            let mut url = base;
            {
                let mut segments = url.path_segments_mut().map_err(|_| {
                    Error::InvalidUrl(format!("{} cannot be a base", config.detail_base_url))
                })?;
                segments.pop_if_empty();
                segments.extend(prefix.split('/').filter(|s| !s.is_empty()));
                segments.push(name);
            }
            Ok(url)
        }
        DetailLinkStyle::Query { page, param } => {
            let mut url = base
                .join(page)
                .map_err(|e| Error::InvalidUrl(format!("{}: {}", page, e)))?;
            // Component encoding, so a space is %20 rather than form-style '+'.
            let query = format!(
                "{}={}",
                urlencoding::encode(param),
                urlencoding::encode(name)
            );
            url.set_query(Some(&query));
            Ok(url)
        }
    }
}
