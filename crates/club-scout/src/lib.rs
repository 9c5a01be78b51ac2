//! Club scout library for finding joinable clubs on the brawlify.com
//! club leaderboards.
//!
//! This library lists country leaderboards, extracts their clubs and checks
//! each small club's detail page against a trophy limit and membership type.

pub mod api;
pub mod clubs;
pub mod eligibility;
pub mod error;
pub mod locations;
pub mod menu;
pub mod processor;
pub mod report;
pub mod selectors;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpTransport, PageFetcher, Transport};
pub use clubs::{ClubTableExtractor, UrlBatch};
pub use eligibility::{EligibilityChecker, RetryPolicy};
pub use error::{Result, ScoutError};
pub use locations::LocationLister;
pub use menu::{Console, Menu, MenuContext, TerminalConsole};
pub use processor::{ClubProcessor, CountryOrchestrator, CountrySummary};
pub use report::{ClubReport, ReportSink, TerminalSink};

use shared::config::ScoutConfig;
use std::sync::Arc;
use std::time::Duration;

/// Wire the pipeline from configuration
pub fn build_context(
    config: &ScoutConfig,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn ReportSink>,
    workers: usize,
) -> MenuContext {
    let fetcher = PageFetcher::new(transport.clone());

    let retry = RetryPolicy {
        delay: Duration::from_secs(config.rate_limit.retry_delay_secs),
        max_retries: config.rate_limit.max_retries,
    };
    let checker = EligibilityChecker::new(transport, retry, sink.clone());

    MenuContext {
        lister: LocationLister::new(fetcher.clone(), config.base_url.clone(), config.stats_url()),
        orchestrator: CountryOrchestrator::new(
            ClubTableExtractor::new(fetcher, config.base_url.clone(), sink.clone()),
            ClubProcessor::new(checker, config.max_members, sink),
            workers,
        ),
        info_url: config.info_url.clone(),
    }
}
