use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Error fetching HTML from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Unexpected page structure: {0}")]
    Structure(String),

    #[error("No table found in {0}")]
    TableNotFound(String),

    #[error("Error checking club eligibility for {url}: {reason}")]
    EligibilityCheck { url: String, reason: String },

    #[error("Still rate limited after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("Invalid value: {0}")]
    Value(String),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
