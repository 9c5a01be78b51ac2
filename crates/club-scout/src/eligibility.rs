//! Club eligibility from the club detail page.
//!
//! The detail page is fetched directly rather than through `PageFetcher`:
//! HTTP 429 is retried after a fixed delay, any other non-200 status reads as
//! ineligible instead of failing.

use crate::api::Transport;
use crate::error::{Result, ScoutError};
use crate::report::ReportSink;
use crate::selectors;
use reqwest::StatusCode;
use scraper::{ElementRef, Html};
use shared::{Criteria, Eligibility};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Fixed-delay retry on HTTP 429
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before every retry; never grows
    pub delay: Duration,
    /// Retry cap (None = retry forever)
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(10),
            max_retries: None,
        }
    }
}

/// Checks one club page against the eligibility criteria
pub struct EligibilityChecker {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    sink: Arc<dyn ReportSink>,
}

impl EligibilityChecker {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            transport,
            retry,
            sink,
        }
    }

    /// Fetch `club_url` and evaluate its info table.
    ///
    /// Transport failures surface as `EligibilityCheck`. With no retry cap a
    /// club that keeps answering 429 is retried forever.
    pub async fn check(&self, club_url: &str, criteria: &Criteria) -> Result<Eligibility> {
        let mut retries: u32 = 0;

        let response = loop {
            let response = self
                .transport
                .get(club_url)
                .await
                .map_err(|e| ScoutError::EligibilityCheck {
                    url: club_url.to_string(),
                    reason: e.to_string(),
                })?;

            if response.status != StatusCode::TOO_MANY_REQUESTS {
                break response;
            }

            if let Some(max) = self.retry.max_retries {
                if retries >= max {
                    return Err(ScoutError::RateLimited {
                        url: club_url.to_string(),
                        attempts: retries + 1,
                    });
                }
            }

            retries += 1;
            warn!(
                url = %club_url,
                retry = retries,
                delay_ms = self.retry.delay.as_millis() as u64,
                "Rate limited by server, waiting"
            );
            sleep(self.retry.delay).await;
        };

        if response.status != StatusCode::OK {
            let status = response.status.as_u16();
            warn!(url = %club_url, status = status, "Unexpected status code");
            self.sink
                .diagnostic(&format!("Unexpected status code: {}", status));
            return Ok(Eligibility::Ineligible);
        }

        let verdict = evaluate_info_table(&response.body, criteria)?;
        debug!(url = %club_url, verdict = ?verdict, "Club evaluated");
        Ok(verdict)
    }
}

/// Scan the info table of a club detail page.
///
/// Rows are read in page order and the scan stops once both the trophy and
/// the type condition hold, so a "Trophies" row after that point is never
/// seen. A page without the info table is ineligible, not an error.
pub fn evaluate_info_table(body: &str, criteria: &Criteria) -> Result<Eligibility> {
    let document = Html::parse_document(body);
    let Some(table) = document.select(&selectors::INFO_TABLE).next() else {
        return Ok(Eligibility::Ineligible);
    };

    let mut trophies_eligible = false;
    let mut type_eligible = false;
    let mut trophies = None;

    for row in table.select(&selectors::ROW) {
        if let Some(header) = row.select(&selectors::INFO_HEADER).next() {
            let label: String = header.text().collect();

            if label.contains("Required Trophies") {
                let required = parse_trophies(&value_cell_text(header, &label)?)?;
                if required < criteria.required_trophies_limit {
                    trophies_eligible = true;
                }
            } else if label.contains("Trophies") {
                let current = parse_trophies(&value_cell_text(header, &label)?)?;
                trophies = Some(current);
                if current > 1 {
                    trophies_eligible = true;
                }
            } else if label.contains("Type") {
                let club_type = value_cell_text(header, &label)?.trim().to_lowercase();
                if club_type == criteria.club_type.as_page_text() {
                    type_eligible = true;
                }
            }
        }

        if trophies_eligible && type_eligible {
            break;
        }
    }

    Ok(Eligibility::from_flags(trophies_eligible, type_eligible, trophies))
}

/// Text of the first `td` following the header cell
fn value_cell_text(header: ElementRef, label: &str) -> Result<String> {
    header
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")
        .map(|cell| cell.text().collect())
        .ok_or_else(|| ScoutError::Structure(format!("no value cell for {:?}", label.trim())))
}

/// Integer with thousands separators, e.g. "12,000"
pub fn parse_trophies(text: &str) -> Result<i64> {
    text.replace(',', "")
        .trim()
        .parse()
        .map_err(|_| ScoutError::Value(format!("invalid trophy count {:?}", text.trim())))
}
