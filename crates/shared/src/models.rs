//! Data models for the club pipeline.
//!
//! Club rows extracted from country leaderboards, the eligibility criteria
//! entered per country, and the verdict produced for a single club.

/// One row of a country leaderboard table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubRecord {
    /// Club name as displayed in the table
    pub name: String,
    /// Absolute URL of the club detail page
    pub profile_url: String,
    /// Member count text, e.g. "25/30"
    pub member_count_text: String,
}

/// Membership type of a club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClubType {
    Open,
    InviteOnly,
    Closed,
}

impl ClubType {
    /// Lower-cased text shown on a club detail page
    pub fn as_page_text(&self) -> &'static str {
        match self {
            ClubType::Open => "open",
            ClubType::InviteOnly => "invite only",
            ClubType::Closed => "closed",
        }
    }

    /// Map a menu choice ("1", "2" or "3") to a club type
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(ClubType::Open),
            "2" => Some(ClubType::InviteOnly),
            "3" => Some(ClubType::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClubType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_page_text())
    }
}

/// Eligibility parameters entered once per country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criteria {
    /// Required-trophy floor must be strictly below this value
    pub required_trophies_limit: i64,
    /// Membership type the club must have
    pub club_type: ClubType,
}

impl Criteria {
    pub fn new(required_trophies_limit: i64, club_type: ClubType) -> Self {
        Self {
            required_trophies_limit,
            club_type,
        }
    }
}

/// Verdict for a single club
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Ineligible,
    /// Eligible, carrying the club's current trophy count
    Eligible(i64),
}

impl Eligibility {
    /// Build a verdict from the three scanned conditions.
    ///
    /// A recorded trophy count of zero, or no count at all, reads as
    /// ineligible even when both flags hold.
    pub fn from_flags(trophies_eligible: bool, type_eligible: bool, trophies: Option<i64>) -> Self {
        match trophies {
            Some(count) if trophies_eligible && type_eligible && count != 0 => {
                Eligibility::Eligible(count)
            }
            _ => Eligibility::Ineligible,
        }
    }
}
