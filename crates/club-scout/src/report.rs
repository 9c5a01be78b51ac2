//! Console reporting of club outcomes.

use crossterm::style::Stylize;
use std::fmt;

/// Outcome line for one checked club
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClubReport {
    Eligible {
        name: String,
        members: String,
        trophies: i64,
        url: String,
    },
    Ineligible {
        name: String,
        url: String,
    },
}

impl fmt::Display for ClubReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClubReport::Eligible {
                name,
                members,
                trophies,
                url,
            } => write!(
                f,
                "Eligible Club: {}, Members: {}, Trophies: {}, URL: {}",
                name, members, trophies, url
            ),
            ClubReport::Ineligible { name, url } => {
                write!(f, "Ineligible Club: {}, URL: {}", name, url)
            }
        }
    }
}

/// Destination for club reports and plain diagnostics.
///
/// Called concurrently from worker tasks; each call emits one whole line.
pub trait ReportSink: Send + Sync {
    fn club(&self, report: &ClubReport);
    fn diagnostic(&self, message: &str);
}

/// Writes colored lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl ReportSink for TerminalSink {
    fn club(&self, report: &ClubReport) {
        let line = report.to_string();
        match report {
            ClubReport::Eligible { .. } => println!("{}", line.green()),
            ClubReport::Ineligible { .. } => println!("{}", line.red()),
        }
    }

    fn diagnostic(&self, message: &str) {
        println!("{}", message);
    }
}
