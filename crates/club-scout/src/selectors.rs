//! CSS signatures of the leaderboard site markup.
//!
//! Any upstream markup change shows up here first.

use once_cell::sync::Lazy;
use scraper::Selector;

fn compile(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {:?}: {:?}", css, e))
}

/// Container holding one link per country on the global stats page
pub static LOCATIONS: Lazy<Selector> = Lazy::new(|| compile("div#locations"));

/// Any anchor with a target
pub static LINK: Lazy<Selector> = Lazy::new(|| compile("a"));

/// Club list on a country page
pub static CLUB_TABLE: Lazy<Selector> =
    Lazy::new(|| compile("table.table.table-dark.psta-color.table-stats.tb-stats"));

/// Club name link in the first cell of a club list row
pub static CLUB_LINK: Lazy<Selector> =
    Lazy::new(|| compile("a.link.opacity.shadow-normal.c-color-text"));

/// Info table on a club detail page
pub static INFO_TABLE: Lazy<Selector> =
    Lazy::new(|| compile("table.table.table-sm.psta-color.table-stats.tb-stats"));

/// Row label inside the info table
pub static INFO_HEADER: Lazy<Selector> = Lazy::new(|| compile("th.text-hp.font-weight-normal"));

pub static ROW: Lazy<Selector> = Lazy::new(|| compile("tr"));

pub static CELL: Lazy<Selector> = Lazy::new(|| compile("td"));
