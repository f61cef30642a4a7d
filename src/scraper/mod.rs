use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::mapper::{Transcript, VideoMetadata};
use crate::supadata::{SupadataClient, VideoDataApi};
use crate::urls::{ResolvedUrl, UrlNormalizer};
use crate::Result;

/// Unified record for a single TikTok video
///
/// Constructed once per request and returned to the caller; nothing is cached
/// or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TikTokVideoData {
    /// Canonical long-form URL the data was fetched for
    pub url: String,

    /// Numeric video identifier
    pub video_id: String,

    // Metadata
    pub title: Option<String>,
    pub description: Option<String>,
    pub audio_url: Option<String>,
    pub author: Option<String>,
    pub likes: Option<u64>,
    pub views: Option<u64>,
    pub shares: Option<u64>,
    pub comments: Option<u64>,

    // Transcript
    pub transcript: Option<String>,
    pub transcript_language: Option<String>,

    /// Whether a non-empty transcript was available
    pub has_transcript: bool,
}

/// Fetches and aggregates TikTok video data
///
/// The upstream client is injected rather than held as a module-level
/// singleton, so tests can swap in a fake upstream.
pub struct TikTokScraper<C: VideoDataApi> {
    api: C,
    normalizer: UrlNormalizer,
}

impl TikTokScraper<SupadataClient> {
    /// Create a scraper backed by the real Supadata client
    pub fn new(config: Config) -> Result<Self> {
        let normalizer = UrlNormalizer::new(config.resolve_timeout());
        let api = SupadataClient::new(config)?;
        Ok(Self::with_api(api, normalizer))
    }

    /// Create a scraper configured from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }
}

impl<C: VideoDataApi> TikTokScraper<C> {
    /// Create a scraper with an alternative upstream implementation
    pub fn with_api(api: C, normalizer: UrlNormalizer) -> Self {
        Self { api, normalizer }
    }

    /// Fetch complete video data (metadata + transcript) for a TikTok URL
    ///
    /// The URL is normalized first, so invalid input never reaches the
    /// provider. The two upstream calls then run concurrently on the shared
    /// connection pool; the first error drops the sibling request, while a
    /// missing transcript (`Ok(None)`) counts as success.
    pub async fn fetch_aggregate(&self, video_url: &str) -> Result<TikTokVideoData> {
        let resolved = self.normalizer.normalize(video_url).await?;

        tracing::info!("Processing TikTok URL: {}", resolved.resolved);

        let (metadata, transcript) = tokio::try_join!(
            self.api.fetch_metadata(&resolved.resolved),
            self.api.fetch_transcript(&resolved.resolved),
        )?;

        Ok(assemble(resolved, metadata, transcript))
    }
}

/// Combine the resolved URL and the two upstream payloads into one record
fn assemble(
    resolved: ResolvedUrl,
    metadata: VideoMetadata,
    transcript: Option<Transcript>,
) -> TikTokVideoData {
    let has_transcript = transcript
        .as_ref()
        .map_or(false, |t| !t.text.is_empty());

    let (transcript_text, transcript_language) = match transcript {
        Some(t) => (Some(t.text), t.language),
        None => (None, None),
    };

    TikTokVideoData {
        url: resolved.resolved,
        video_id: resolved.video_id,
        title: metadata.title,
        description: metadata.description,
        audio_url: metadata.audio_url,
        author: metadata.author,
        likes: metadata.likes,
        views: metadata.views,
        shares: metadata.shares,
        comments: metadata.comments,
        transcript: transcript_text,
        transcript_language,
        has_transcript,
    }
}
