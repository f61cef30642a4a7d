use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::{Result, ScraperError};

/// Hosts that only serve share links and redirect to the canonical video page
const SHORT_LINK_HOSTS: &[&str] = &["vt.tiktok.com", "vm.tiktok.com"];

/// Path segments that precede a numeric video id in canonical URLs
const VIDEO_ID_MARKERS: &[&str] = &["video", "v", "embed"];

/// A fully normalized TikTok URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedUrl {
    /// The URL exactly as supplied by the caller
    pub raw: String,

    /// Cleaned form of the input: trimmed, validated, tracking parameters
    /// stripped
    pub cleaned: String,

    /// Canonical long-form URL after short-link redirect resolution. Equal to
    /// `cleaned` when the input was already canonical.
    pub resolved: String,

    /// Numeric video identifier extracted from `resolved`
    pub video_id: String,
}

/// Normalizes TikTok URLs into their canonical long form
///
/// Short links (`vt.tiktok.com`, `vm.tiktok.com`, `/t/` share paths) are
/// resolved with a single redirect-following request. That request never
/// touches the Supadata API, so it carries its own timeout.
pub struct UrlNormalizer {
    http: Client,
    resolve_timeout: Duration,
}

impl UrlNormalizer {
    pub fn new(resolve_timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            resolve_timeout,
        }
    }

    /// Normalize a raw TikTok URL
    ///
    /// Runs clean -> resolve -> extract. Every failure in here is
    /// [`ScraperError::InvalidUrl`]; nothing has been sent to the data
    /// provider yet.
    pub async fn normalize(&self, raw_url: &str) -> Result<ResolvedUrl> {
        let cleaned = clean_url(raw_url)?;

        let resolved = if is_short_link(&cleaned) {
            let target = self.resolve_short_link(cleaned.as_str()).await?;
            clean_url(target.as_str())?
        } else {
            cleaned.clone()
        };

        let video_id = extract_video_id(&resolved)?;

        Ok(ResolvedUrl {
            raw: raw_url.to_string(),
            cleaned: cleaned.to_string(),
            resolved: resolved.to_string(),
            video_id,
        })
    }

    /// Follow a short link to the canonical video URL
    async fn resolve_short_link(&self, url: &str) -> Result<Url> {
        tracing::debug!("Resolving short link: {}", url);

        let response = self
            .http
            .get(url)
            .timeout(self.resolve_timeout)
            .send()
            .await
            .map_err(|e| {
                ScraperError::InvalidUrl(format!("Failed to resolve short link {}: {}", url, e))
            })?;

        // reqwest follows redirects by default, so the response URL is the
        // end of the redirect chain
        let final_url = response.url().clone();

        if is_short_link(&final_url) {
            return Err(ScraperError::InvalidUrl(format!(
                "Short link did not redirect to a video page: {}",
                url
            )));
        }

        tracing::debug!("Short link resolved to: {}", final_url);
        Ok(final_url)
    }
}

/// Trim, validate, and strip tracking parameters from a TikTok URL
pub fn clean_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScraperError::InvalidUrl("URL is empty".to_string()));
    }

    let mut parsed = Url::parse(trimmed)
        .map_err(|_| ScraperError::InvalidUrl(format!("Invalid URL format: {}", trimmed)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl(
            "URL must use HTTP or HTTPS protocol".to_string(),
        ));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ScraperError::InvalidUrl(format!("URL has no host: {}", trimmed)))?;

    if !is_tiktok_host(host) {
        return Err(ScraperError::InvalidUrl(format!(
            "Not a TikTok URL: {}",
            host
        )));
    }

    // Share links carry tracking parameters (utm_*, _r, _t); none of them are
    // needed to identify the video
    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Check whether a host belongs to TikTok
fn is_tiktok_host(host: &str) -> bool {
    let host = host.to_lowercase();
    host == "tiktok.com" || host.ends_with(".tiktok.com")
}

/// Check whether a URL is a share short link that needs redirect resolution
pub fn is_short_link(url: &Url) -> bool {
    let host = match url.host_str() {
        Some(host) => host.to_lowercase(),
        None => return false,
    };

    if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        return true;
    }

    // tiktok.com/t/<code> share links redirect the same way the short hosts do
    url.path().starts_with("/t/")
}

/// Extract the numeric video identifier from a canonical TikTok URL
pub fn extract_video_id(url: &Url) -> Result<String> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    for window in segments.windows(2) {
        if VIDEO_ID_MARKERS.contains(&window[0]) && is_video_id(window[1]) {
            return Ok(window[1].to_string());
        }
    }

    Err(ScraperError::InvalidUrl(format!(
        "No video id found in URL: {}",
        url
    )))
}

fn is_video_id(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}
