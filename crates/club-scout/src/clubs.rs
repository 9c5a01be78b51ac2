//! Club rows from country leaderboard pages.

use crate::api::PageFetcher;
use crate::error::{Result, ScoutError};
use crate::report::ReportSink;
use crate::selectors;
use scraper::{ElementRef, Html};
use shared::ClubRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// One country URL or several
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlBatch {
    One(String),
    Many(Vec<String>),
}

impl UrlBatch {
    pub fn into_urls(self) -> Vec<String> {
        match self {
            UrlBatch::One(url) => vec![url],
            UrlBatch::Many(urls) => urls,
        }
    }
}

impl From<&str> for UrlBatch {
    fn from(url: &str) -> Self {
        UrlBatch::One(url.to_string())
    }
}

impl From<String> for UrlBatch {
    fn from(url: String) -> Self {
        UrlBatch::One(url)
    }
}

impl From<Vec<String>> for UrlBatch {
    fn from(urls: Vec<String>) -> Self {
        UrlBatch::Many(urls)
    }
}

impl From<&[String]> for UrlBatch {
    fn from(urls: &[String]) -> Self {
        UrlBatch::Many(urls.to_vec())
    }
}

impl From<Vec<&str>> for UrlBatch {
    fn from(urls: Vec<&str>) -> Self {
        UrlBatch::Many(urls.into_iter().map(String::from).collect())
    }
}

/// True when `url` parses as an absolute URL with a scheme and a host
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => !parsed.scheme().is_empty() && parsed.host_str().map_or(false, |h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Extracts club records from country pages
pub struct ClubTableExtractor {
    fetcher: PageFetcher,
    base_url: String,
    sink: Arc<dyn ReportSink>,
}

impl ClubTableExtractor {
    pub fn new(fetcher: PageFetcher, base_url: impl Into<String>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            sink,
        }
    }

    /// Collect the clubs of every page in `urls`, in input order.
    ///
    /// Invalid URLs, unreachable pages and pages without a club table are
    /// reported and skipped. A club row without its link or member cell
    /// aborts the whole call.
    pub async fn get_club_data(&self, urls: impl Into<UrlBatch>) -> Result<Vec<ClubRecord>> {
        let mut clubs = Vec::new();

        for url in urls.into().into_urls() {
            if !is_valid_url(&url) {
                warn!(url = %url, "Skipping invalid URL");
                self.sink.diagnostic(&format!("Skipping invalid URL: {}", url));
                continue;
            }

            let document = match self.fetcher.get_html(&url).await {
                Ok(document) => document,
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to fetch country page");
                    self.sink.diagnostic(&e.to_string());
                    continue;
                }
            };

            match parse_club_table(&document, &url, &self.base_url) {
                Ok(rows) => {
                    debug!(url = %url, clubs = rows.len(), "Parsed club table");
                    clubs.extend(rows);
                }
                Err(e @ ScoutError::TableNotFound(_)) => {
                    warn!(url = %url, "Club table missing");
                    self.sink.diagnostic(&e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        info!(clubs = clubs.len(), "Club extraction complete");
        Ok(clubs)
    }
}

/// Parse the club table of one country page.
///
/// Rows without `td` cells (headers) are passed over.
pub fn parse_club_table(document: &Html, page_url: &str, base_url: &str) -> Result<Vec<ClubRecord>> {
    let table = document
        .select(&selectors::CLUB_TABLE)
        .next()
        .ok_or_else(|| ScoutError::TableNotFound(page_url.to_string()))?;

    let mut records = Vec::new();
    for (idx, row) in table.select(&selectors::ROW).enumerate() {
        let cells: Vec<ElementRef> = row.select(&selectors::CELL).collect();
        if cells.is_empty() {
            continue;
        }

        records.push(parse_club_row(&cells, base_url).map_err(|what| {
            ScoutError::Structure(format!("{} in row {} of {}", what, idx, page_url))
        })?);
    }

    Ok(records)
}

fn parse_club_row(cells: &[ElementRef], base_url: &str) -> std::result::Result<ClubRecord, &'static str> {
    let anchor = cells[0]
        .select(&selectors::CLUB_LINK)
        .next()
        .ok_or("club link missing")?;
    let href = anchor.value().attr("href").ok_or("club link without href")?;
    let members = cells.get(1).ok_or("member count cell missing")?;

    Ok(ClubRecord {
        name: anchor.text().collect(),
        profile_url: format!("{}{}", base_url, href),
        member_count_text: members.text().collect::<String>().trim().to_string(),
    })
}
