use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Result, ScraperError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Supadata API configuration
    pub supadata: SupadataConfig,

    /// HTTP request settings
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupadataConfig {
    /// API key sent as a bearer token on every request
    pub api_key: String,

    /// Base URL of the Supadata API
    pub base_url: String,

    /// Path of the TikTok metadata endpoint
    pub metadata_endpoint: String,

    /// Path of the transcript endpoint
    pub transcript_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout for Supadata calls, in seconds
    pub request_timeout_secs: u64,

    /// Timeout for the single short-link redirect round trip, in seconds.
    /// Independent of the Supadata request timeout since no provider is
    /// contacted at that point.
    pub resolve_timeout_secs: u64,

    /// Retry budget for upstream requests. Currently not consumed by the
    /// fetch path; see DESIGN.md.
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supadata: SupadataConfig {
                api_key: String::new(),
                base_url: "https://api.supadata.ai/v1".to_string(),
                metadata_endpoint: "/tiktok/metadata".to_string(),
                transcript_endpoint: "/transcript".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: 30,
                resolve_timeout_secs: 10,
                max_retries: 3,
            },
        }
    }
}

impl Config {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            supadata: SupadataConfig {
                api_key: std::env::var("SUPADATA_API_KEY").unwrap_or_default(),
                base_url: std::env::var("SUPADATA_BASE_URL")
                    .unwrap_or(defaults.supadata.base_url),
                metadata_endpoint: std::env::var("SUPADATA_METADATA_ENDPOINT")
                    .unwrap_or(defaults.supadata.metadata_endpoint),
                transcript_endpoint: std::env::var("SUPADATA_TRANSCRIPT_ENDPOINT")
                    .unwrap_or(defaults.supadata.transcript_endpoint),
            },
            http: HttpConfig {
                request_timeout_secs: std::env::var("SUPADATA_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.http.request_timeout_secs),
                resolve_timeout_secs: std::env::var("SUPADATA_RESOLVE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.http.resolve_timeout_secs),
                max_retries: std::env::var("SUPADATA_MAX_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.http.max_retries),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.supadata.api_key.is_empty() {
            return Err(ScraperError::Auth);
        }

        Ok(())
    }

    /// Timeout applied to every Supadata request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Timeout applied to short-link redirect resolution
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.http.resolve_timeout_secs)
    }
}
