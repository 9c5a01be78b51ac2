//! Per-club processing and per-country fan-out.
//!
//! A country's clubs are extracted once, then checked concurrently on tokio
//! tasks bounded by a semaphore. Reports appear in completion order.

use crate::clubs::ClubTableExtractor;
use crate::eligibility::EligibilityChecker;
use crate::error::{Result, ScoutError};
use crate::report::{ClubReport, ReportSink};
use shared::{ClubRecord, Criteria, Eligibility};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Current member count from text like "25/30" or "25 / 30"
pub fn parse_member_count(text: &str) -> Result<u32> {
    let current = text.split('/').next().unwrap_or_default().trim();
    current
        .parse()
        .map_err(|_| ScoutError::Value(format!("invalid member count {:?}", text)))
}

/// What happened to one club
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClubOutcome {
    Eligible,
    Ineligible,
    /// Too many members; not checked, not reported
    Filtered,
    /// Check failed; logged, not reported
    Failed,
}

/// Member-count filter followed by a single eligibility check
pub struct ClubProcessor {
    checker: EligibilityChecker,
    max_members: u32,
    sink: Arc<dyn ReportSink>,
}

impl ClubProcessor {
    pub fn new(checker: EligibilityChecker, max_members: u32, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            checker,
            max_members,
            sink,
        }
    }

    pub async fn process(&self, club: &ClubRecord, criteria: &Criteria) -> ClubOutcome {
        let name = club.name.trim();

        let members = match parse_member_count(&club.member_count_text) {
            Ok(members) => members,
            Err(e) => {
                warn!(club = %name, error = %e, "Unreadable member count");
                self.sink.diagnostic(&e.to_string());
                return ClubOutcome::Failed;
            }
        };

        if members >= self.max_members {
            return ClubOutcome::Filtered;
        }

        match self.checker.check(&club.profile_url, criteria).await {
            Ok(Eligibility::Eligible(trophies)) => {
                info!(club = %name, trophies = trophies, "Eligible club");
                self.sink.club(&ClubReport::Eligible {
                    name: name.to_string(),
                    members: club.member_count_text.clone(),
                    trophies,
                    url: club.profile_url.clone(),
                });
                ClubOutcome::Eligible
            }
            Ok(Eligibility::Ineligible) => {
                self.sink.club(&ClubReport::Ineligible {
                    name: name.to_string(),
                    url: club.profile_url.clone(),
                });
                ClubOutcome::Ineligible
            }
            Err(e) => {
                warn!(club = %name, url = %club.profile_url, error = %e, "Eligibility check failed");
                self.sink.diagnostic(&e.to_string());
                ClubOutcome::Failed
            }
        }
    }
}

/// Tally of one country run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountrySummary {
    pub clubs: usize,
    pub eligible: usize,
    pub ineligible: usize,
    pub filtered: usize,
    pub failed: usize,
}

impl CountrySummary {
    fn record(&mut self, outcome: ClubOutcome) {
        match outcome {
            ClubOutcome::Eligible => self.eligible += 1,
            ClubOutcome::Ineligible => self.ineligible += 1,
            ClubOutcome::Filtered => self.filtered += 1,
            ClubOutcome::Failed => self.failed += 1,
        }
    }
}

/// Runs the club processor over every club of one country
pub struct CountryOrchestrator {
    extractor: ClubTableExtractor,
    processor: Arc<ClubProcessor>,
    workers: usize,
}

impl CountryOrchestrator {
    pub fn new(extractor: ClubTableExtractor, processor: ClubProcessor, workers: usize) -> Self {
        Self {
            extractor,
            processor: Arc::new(processor),
            workers: workers.max(1),
        }
    }

    /// Extract the country's clubs and check them on at most `workers`
    /// concurrent tasks. Returns once every club is done.
    pub async fn process_country(&self, country_url: &str, criteria: Criteria) -> Result<CountrySummary> {
        let clubs = self.extractor.get_club_data(country_url).await?;

        info!(
            country = %country_url,
            clubs = clubs.len(),
            workers = self.workers,
            "Processing country"
        );

        let mut summary = CountrySummary {
            clubs: clubs.len(),
            ..Default::default()
        };
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = Vec::with_capacity(clubs.len());

        for club in clubs {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(error = %e, "Worker pool closed");
                    break;
                }
            };
            let processor = self.processor.clone();

            tasks.push(tokio::spawn(async move {
                let outcome = processor.process(&club, &criteria).await;
                drop(permit);
                outcome
            }));
        }

        for task in tasks {
            match task.await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    error!(error = %e, "Club task panicked");
                    summary.failed += 1;
                }
            }
        }

        info!(
            country = %country_url,
            clubs = summary.clubs,
            eligible = summary.eligible,
            ineligible = summary.ineligible,
            filtered = summary.filtered,
            failed = summary.failed,
            "Country complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PageFetcher;
    use crate::eligibility::RetryPolicy;
    use crate::testing::{CollectingSink, FakeTransport};
    use shared::ClubType;

    const BASE: &str = "https://brawlify.com";
    const COUNTRY: &str = "https://brawlify.com/stats/clubs/FR";

    fn country_page(rows: &[(&str, &str, &str)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(name, href, members)| {
                format!(
                    r#"<tr><td><a class="link opacity shadow-normal c-color-text" href="{}"> {} </a></td><td>{}</td></tr>"#,
                    href, name, members
                )
            })
            .collect();
        format!(
            r#"<table class="table table-dark psta-color table-stats tb-stats">{}</table>"#,
            rows
        )
    }

    fn club_page(required: &str, trophies: &str, club_type: &str) -> String {
        format!(
            r#"<table class="table table-sm psta-color table-stats tb-stats">
                 <tr><th class="text-hp font-weight-normal">Required Trophies</th><td>{}</td></tr>
                 <tr><th class="text-hp font-weight-normal">Trophies</th><td>{}</td></tr>
                 <tr><th class="text-hp font-weight-normal">Type</th><td>{}</td></tr>
               </table>"#,
            required, trophies, club_type
        )
    }

    fn orchestrator(transport: Arc<FakeTransport>, workers: usize) -> (CountryOrchestrator, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::default());
        let extractor = ClubTableExtractor::new(PageFetcher::new(transport.clone()), BASE, sink.clone());
        let checker = EligibilityChecker::new(transport, RetryPolicy::default(), sink.clone());
        let processor = ClubProcessor::new(checker, 30, sink.clone());
        (CountryOrchestrator::new(extractor, processor, workers), sink)
    }

    fn record(name: &str, url: &str, members: &str) -> ClubRecord {
        ClubRecord {
            name: name.to_string(),
            profile_url: url.to_string(),
            member_count_text: members.to_string(),
        }
    }

    #[test]
    fn test_parse_member_count() {
        assert_eq!(parse_member_count("25/30").unwrap(), 25);
        assert_eq!(parse_member_count(" 7 / 30 ").unwrap(), 7);
        assert_eq!(parse_member_count("30/30").unwrap(), 30);
        assert_eq!(parse_member_count("12").unwrap(), 12);
        assert!(matches!(parse_member_count("full"), Err(ScoutError::Value(_))));
        assert!(parse_member_count("").is_err());
    }

    #[tokio::test]
    async fn test_full_clubs_are_dropped_without_a_request() {
        let transport = Arc::new(FakeTransport::new());
        let sink = Arc::new(CollectingSink::default());
        let checker = EligibilityChecker::new(transport.clone(), RetryPolicy::default(), sink.clone());
        let processor = ClubProcessor::new(checker, 30, sink.clone());

        let criteria = Criteria::new(6000, ClubType::Open);
        for members in ["30/30", "31 / 30"] {
            let outcome = processor
                .process(&record("Full", "https://brawlify.com/club/9", members), &criteria)
                .await;
            assert_eq!(outcome, ClubOutcome::Filtered);
        }

        assert_eq!(transport.total_calls(), 0);
        assert!(sink.reports().is_empty());
        assert!(sink.diagnostics().is_empty());
    }

    #[tokio::test]
    async fn test_check_failure_is_logged_and_unreported() {
        let url = "https://brawlify.com/club/5";
        let transport = Arc::new(FakeTransport::new().fail(url, "timed out"));
        let sink = Arc::new(CollectingSink::default());
        let checker = EligibilityChecker::new(transport.clone(), RetryPolicy::default(), sink.clone());
        let processor = ClubProcessor::new(checker, 30, sink.clone());

        let outcome = processor
            .process(&record("Echo", url, "3/30"), &Criteria::new(6000, ClubType::Open))
            .await;

        assert_eq!(outcome, ClubOutcome::Failed);
        assert!(sink.reports().is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
        assert!(sink.diagnostics()[0].contains(url));
    }

    #[tokio::test]
    async fn test_eligible_club_end_to_end() {
        let club_url = "https://brawlify.com/club/1";
        let transport = Arc::new(
            FakeTransport::new()
                .page(COUNTRY, &country_page(&[("Alpha", "/club/1", "25/30")]))
                .page(club_url, &club_page("5000", "12,000", "Open")),
        );
        let (orchestrator, sink) = orchestrator(transport.clone(), 1);

        let summary = orchestrator
            .process_country(COUNTRY, Criteria::new(6000, ClubType::Open))
            .await
            .unwrap();

        assert_eq!(
            sink.reports(),
            vec![ClubReport::Eligible {
                name: "Alpha".to_string(),
                members: "25/30".to_string(),
                trophies: 12000,
                url: club_url.to_string(),
            }]
        );
        assert_eq!(summary.eligible, 1);
        // One check per club, no second round trip for the trophy count
        assert_eq!(transport.calls(club_url), 1);
    }

    #[tokio::test]
    async fn test_required_floor_above_limit_without_trophies_row_is_ineligible() {
        let club_url = "https://brawlify.com/club/1";
        let page = r#"<table class="table table-sm psta-color table-stats tb-stats">
                 <tr><th class="text-hp font-weight-normal">Required Trophies</th><td>5,000</td></tr>
                 <tr><th class="text-hp font-weight-normal">Type</th><td>Open</td></tr>
               </table>"#;
        let transport = Arc::new(
            FakeTransport::new()
                .page(COUNTRY, &country_page(&[("Alpha", "/club/1", "25/30")]))
                .page(club_url, page),
        );
        let (orchestrator, sink) = orchestrator(transport, 1);

        let summary = orchestrator
            .process_country(COUNTRY, Criteria::new(4000, ClubType::Open))
            .await
            .unwrap();

        assert_eq!(
            sink.reports(),
            vec![ClubReport::Ineligible {
                name: "Alpha".to_string(),
                url: club_url.to_string(),
            }]
        );
        assert_eq!(summary.ineligible, 1);
    }

    #[tokio::test]
    async fn test_country_mix_with_single_worker_is_ordered() {
        let transport = Arc::new(
            FakeTransport::new()
                .page(
                    COUNTRY,
                    &country_page(&[
                        ("Alpha", "/club/1", "25/30"),
                        ("Full", "/club/2", "30/30"),
                        ("Closed", "/club/3", "10/30"),
                        ("Broken", "/club/4", "??/30"),
                        ("Gone", "/club/5", "2/30"),
                    ]),
                )
                .page("https://brawlify.com/club/1", &club_page("100", "900", "open"))
                .page("https://brawlify.com/club/3", &club_page("100", "900", "closed"))
                .respond("https://brawlify.com/club/5", 500, "error"),
        );
        let (orchestrator, sink) = orchestrator(transport.clone(), 1);

        let summary = orchestrator
            .process_country(COUNTRY, Criteria::new(6000, ClubType::Open))
            .await
            .unwrap();

        assert_eq!(
            summary,
            CountrySummary {
                clubs: 5,
                eligible: 1,
                ineligible: 2,
                filtered: 1,
                failed: 1,
            }
        );

        let names: Vec<String> = sink
            .reports()
            .iter()
            .map(|r| match r {
                ClubReport::Eligible { name, .. } | ClubReport::Ineligible { name, .. } => name.clone(),
            })
            .collect();
        assert_eq!(names, vec!["Alpha", "Closed", "Gone"]);
        assert_eq!(transport.calls("https://brawlify.com/club/2"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_workers_check_every_club() {
        let mut transport = FakeTransport::new();
        let mut rows = Vec::new();
        for i in 0..20 {
            rows.push((format!("Club{}", i), format!("/club/{}", i), "5/30".to_string()));
            transport = transport.page(
                &format!("https://brawlify.com/club/{}", i),
                &club_page("10", "1,500", "open"),
            );
        }
        let rows: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|(n, h, m)| (n.as_str(), h.as_str(), m.as_str()))
            .collect();
        let transport = Arc::new(transport.page(COUNTRY, &country_page(&rows)));
        let (orchestrator, sink) = orchestrator(transport, 8);

        let summary = orchestrator
            .process_country(COUNTRY, Criteria::new(6000, ClubType::Open))
            .await
            .unwrap();

        assert_eq!(summary.eligible, 20);
        assert_eq!(sink.reports().len(), 20);
    }

    #[tokio::test]
    async fn test_unreachable_country_yields_empty_summary() {
        let transport = Arc::new(FakeTransport::new());
        let (orchestrator, sink) = orchestrator(transport, 2);

        let summary = orchestrator
            .process_country(COUNTRY, Criteria::new(6000, ClubType::Open))
            .await
            .unwrap();

        assert_eq!(summary, CountrySummary::default());
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
