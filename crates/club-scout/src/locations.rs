//! Country list from the global club statistics page.

use crate::api::PageFetcher;
use crate::error::{Result, ScoutError};
use crate::selectors;
use scraper::Html;
use tracing::info;

/// Lists the per-country leaderboard URLs
pub struct LocationLister {
    fetcher: PageFetcher,
    base_url: String,
    stats_url: String,
}

impl LocationLister {
    pub fn new(fetcher: PageFetcher, base_url: impl Into<String>, stats_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            stats_url: stats_url.into(),
        }
    }

    /// Fetch the stats page and return every country URL in page order
    pub async fn get_locations(&self) -> Result<Vec<String>> {
        info!(url = %self.stats_url, "Fetching country list");

        let document = self.fetcher.get_html(&self.stats_url).await?;
        let locations = parse_locations(&document, &self.base_url)?;

        info!(countries = locations.len(), "Country list loaded");
        Ok(locations)
    }
}

/// Resolve every anchor inside the locations container against `base_url`.
///
/// Document order, duplicates kept.
pub fn parse_locations(document: &Html, base_url: &str) -> Result<Vec<String>> {
    let container = document
        .select(&selectors::LOCATIONS)
        .next()
        .ok_or_else(|| ScoutError::Structure("expected container not found".to_string()))?;

    container
        .select(&selectors::LINK)
        .map(|anchor| {
            anchor
                .value()
                .attr("href")
                .map(|href| format!("{}{}", base_url, href))
                .ok_or_else(|| {
                    ScoutError::Structure("country link without href".to_string())
                })
        })
        .collect()
}
