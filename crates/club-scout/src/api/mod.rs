//! HTTP access to the leaderboard site.
//!
//! A small transport seam over reqwest plus the page fetcher that turns
//! responses into parsed HTML documents.

pub mod client;

pub use client::{HttpTransport, PageFetcher, RawResponse, Transport, TransportError};
