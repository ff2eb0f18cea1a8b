//! Catalog orchestrator.
//!
//! One run goes data source → enricher → filter/sort engine → page. The
//! wine list is replaced wholesale on every run and annotations are re-read
//! each time, so a rating made between runs shows up even while the wine
//! list itself is still served from cache.

use std::sync::Arc;

use catalog_client::{CatalogLoad, DataSource, LoadOrigin, WineFetcher};
use chrono::{DateTime, Utc};
use common::{CatalogConfig, EnrichedWine, KeyValueStore, Result};
use tracing::info;
use url::Url;

use crate::annotations::AnnotationStore;
use crate::engine::{process, ViewState};
use crate::enrich::enrich;
use crate::links::detail_url;
use crate::paginate::paginate;

/// What a presenter needs to render one view.
#[derive(Debug, Clone)]
pub struct CatalogView {
    /// Wines on the requested page, in display order.
    pub wines: Vec<EnrichedWine>,
    /// Wines matching the filters across all pages.
    pub matched: usize,
    pub page: usize,
    pub page_count: usize,
    pub has_more: bool,
    pub origin: LoadOrigin,
}

pub struct Catalog<F> {
    config: CatalogConfig,
    source: DataSource<F>,
    annotations: AnnotationStore,
}

impl<F: WineFetcher> Catalog<F> {
    pub fn new(config: CatalogConfig, fetcher: F, store: Arc<dyn KeyValueStore>) -> Self {
        let source = DataSource::new(fetcher, store.clone(), config.cache_duration_ms());
        Self {
            config,
            source,
            annotations: AnnotationStore::new(store),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Load the wine list and merge in the current annotations.
    pub async fn load(&self, now: DateTime<Utc>) -> Result<(Vec<EnrichedWine>, LoadOrigin)> {
        let load = self.source.get_wines(now).await?;
        self.enrich_load(load)
    }

    /// Build the view for `state`.
    pub async fn view(&self, state: &ViewState, now: DateTime<Utc>) -> Result<CatalogView> {
        let (wines, origin) = self.load(now).await?;
        Ok(self.present(&wines, state, origin))
    }

    /// Clear the cached list, fetch it again, and build the view.
    pub async fn refresh(&self, state: &ViewState, now: DateTime<Utc>) -> Result<CatalogView> {
        let load = self.source.refresh(now).await?;
        let (wines, origin) = self.enrich_load(load)?;
        Ok(self.present(&wines, state, origin))
    }

    pub fn detail_url(&self, name: &str) -> Result<Url> {
        detail_url(&self.config, name)
    }

    fn enrich_load(&self, load: CatalogLoad) -> Result<(Vec<EnrichedWine>, LoadOrigin)> {
        let annotations = self.annotations.annotations()?;
        let scores = self.annotations.scores()?;
        Ok((enrich(load.wines, &annotations, &scores), load.origin))
    }

    fn present(
        &self,
        wines: &[EnrichedWine],
        state: &ViewState,
        origin: LoadOrigin,
    ) -> CatalogView {
        let matched = process(wines, state);
        // Without pagination everything is one page, whatever was requested.
        let (page_no, per_page) = if self.config.pagination_enabled {
            (state.page, self.config.page_size)
        } else {
            (1, 0)
        };
        let page = paginate(&matched, page_no, per_page);

        info!(
            "Showing {} of {} matching wines (page {}/{}, {} loaded)",
            page.items.len(),
            matched.len(),
            page.page,
            page.page_count,
            wines.len()
        );

        CatalogView {
            wines: page.items.to_vec(),
            matched: page.total,
            page: page.page,
            page_count: page.page_count,
            has_more: page.has_more,
            origin,
        }
    }
}
