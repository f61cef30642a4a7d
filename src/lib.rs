//! TikTok Scraper - A Rust library for aggregating TikTok video data
//!
//! This library fetches metadata and transcripts for TikTok videos through the
//! Supadata API. It normalizes user-supplied URLs (including `vt.tiktok.com`
//! short links), issues the two upstream requests concurrently, and merges the
//! responses into a single [`TikTokVideoData`] record.

pub mod config;
pub mod mapper;
pub mod scraper;
pub mod supadata;
pub mod urls;

pub use config::Config;
pub use mapper::{Transcript, VideoMetadata};
pub use scraper::{TikTokScraper, TikTokVideoData};
pub use supadata::{SupadataClient, VideoDataApi};
pub use urls::{ResolvedUrl, UrlNormalizer};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Error types for the scraper
///
/// Errors are classified once, at the Supadata client boundary, and travel to
/// the caller unchanged. The one exception is a transcript 404, which the
/// client converts to `Ok(None)` (no transcript available) instead of an error.
#[derive(thiserror::Error, Debug)]
pub enum ScraperError {
    /// The input URL is empty, malformed, not a TikTok URL, or a short link
    /// that could not be resolved
    #[error("Invalid TikTok URL: {0}")]
    InvalidUrl(String),

    /// The Supadata API rejected the configured API key (HTTP 401)
    #[error("Supadata authentication failed: check the configured API key")]
    Auth,

    /// The Supadata account has no credits left (HTTP 402)
    #[error("Supadata credits exhausted")]
    CreditsExhausted,

    /// Any other upstream failure, including transport errors (no status code)
    #[error("Supadata API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
}
