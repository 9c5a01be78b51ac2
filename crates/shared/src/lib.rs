//! Shared library for the club-scout workspace.
//!
//! This crate provides common functionality used by the scraper crate:
//! - Configuration management
//! - Logging infrastructure
//! - Club and eligibility data models

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ConfigSource};
pub use logging::LogConfig;
pub use models::*;
