use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::mapper::{self, Transcript, VideoMetadata};
use crate::{Result, ScraperError};

/// Upstream data source for TikTok video information
///
/// The orchestrator only talks to this trait, so tests can substitute a fake
/// upstream for the real Supadata client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoDataApi: Send + Sync {
    /// Fetch video metadata for a resolved TikTok URL
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata>;

    /// Fetch the native transcript for a resolved TikTok URL
    ///
    /// `Ok(None)` means the provider has no transcript for this video (HTTP
    /// 404), which is a valid terminal state, not a failure.
    async fn fetch_transcript(&self, url: &str) -> Result<Option<Transcript>>;
}

/// HTTP client for the Supadata API
pub struct SupadataClient {
    http: Client,
    config: Config,
}

impl SupadataClient {
    /// Create a new client from configuration
    ///
    /// Fails with [`ScraperError::Auth`] when no API key is configured, so
    /// credential misconfiguration surfaces at construction instead of on the
    /// first request.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ScraperError::Api {
                status: None,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    /// Issue an authenticated GET against a Supadata endpoint
    async fn get(&self, endpoint: &str, video_url: &str) -> Result<Response> {
        let request_url = format!("{}{}", self.config.supadata.base_url, endpoint);

        self.http
            .get(&request_url)
            .query(&[("url", video_url)])
            .bearer_auth(&self.config.supadata.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ScraperError::Api {
                status: None,
                message: format!("Request to {} failed: {}", endpoint, e),
            })
    }

    /// Decode a success response body as JSON
    async fn decode_body(response: Response, endpoint: &str) -> Result<Value> {
        response.json().await.map_err(|e| ScraperError::Api {
            status: None,
            message: format!("Invalid JSON from {}: {}", endpoint, e),
        })
    }
}

#[async_trait]
impl VideoDataApi for SupadataClient {
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        let endpoint = self.config.supadata.metadata_endpoint.as_str();
        let response = self.get(endpoint, url).await?;
        let status = response.status();

        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            let error = classify_status(status, &body, "Metadata");
            tracing::error!("Metadata fetch failed for URL {}: {}", url, error);
            return Err(error);
        }

        let data = Self::decode_body(response, endpoint).await?;
        tracing::info!("Metadata fetched successfully for URL: {}", url);

        Ok(mapper::metadata_from_response(&data))
    }

    async fn fetch_transcript(&self, url: &str) -> Result<Option<Transcript>> {
        let endpoint = self.config.supadata.transcript_endpoint.as_str();
        let response = self.get(endpoint, url).await?;
        let status = response.status();

        // 404 means the video simply has no transcript
        if status == StatusCode::NOT_FOUND {
            tracing::info!("No transcript available for URL: {}", url);
            return Ok(None);
        }

        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            let error = classify_status(status, &body, "Transcript");
            tracing::error!("Transcript fetch failed for URL {}: {}", url, error);
            return Err(error);
        }

        let data = Self::decode_body(response, endpoint).await?;
        tracing::info!("Transcript fetched successfully for URL: {}", url);

        Ok(mapper::transcript_from_response(&data))
    }
}

/// Map an error status code onto the error taxonomy
///
/// Shared by both endpoints; the transcript 404 special case is handled
/// before this is reached.
fn classify_status(status: StatusCode, body: &str, endpoint_label: &str) -> ScraperError {
    match status {
        StatusCode::UNAUTHORIZED => ScraperError::Auth,
        StatusCode::PAYMENT_REQUIRED => ScraperError::CreditsExhausted,
        _ => ScraperError::Api {
            status: Some(status.as_u16()),
            message: format!("{} API error: {} - {}", endpoint_label, status.as_u16(), body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_auth() {
        let error = classify_status(StatusCode::UNAUTHORIZED, "unauthorized", "Metadata");
        assert!(matches!(error, ScraperError::Auth));
    }

    #[test]
    fn test_classify_status_credits() {
        let error = classify_status(StatusCode::PAYMENT_REQUIRED, "out of credits", "Metadata");
        assert!(matches!(error, ScraperError::CreditsExhausted));
    }

    #[test]
    fn test_classify_status_generic_keeps_status_and_body() {
        let error = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom", "Transcript");
        match error {
            ScraperError::Api { status, message } => {
                assert_eq!(status, Some(500));
                assert!(message.contains("Transcript API error: 500"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_404_is_an_error_not_absence() {
        // Only the transcript endpoint treats 404 as absence
        let error = classify_status(StatusCode::NOT_FOUND, "not found", "Metadata");
        assert!(matches!(
            error,
            ScraperError::Api {
                status: Some(404),
                ..
            }
        ));
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = Config::default();
        assert!(matches!(SupadataClient::new(config), Err(ScraperError::Auth)));
    }

    #[test]
    fn test_client_builds_with_api_key() {
        let mut config = Config::default();
        config.supadata.api_key = "sd_test_key".to_string();
        assert!(SupadataClient::new(config).is_ok());
    }

    mod endpoints {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const VIDEO_URL: &str = "https://www.tiktok.com/@user/video/7000000000000000000";

        fn client_for(server: &MockServer) -> SupadataClient {
            let mut config = Config::default();
            config.supadata.api_key = "sd_test_key".to_string();
            config.supadata.base_url = server.uri();
            SupadataClient::new(config).expect("client should build")
        }

        #[tokio::test]
        async fn test_fetch_metadata_sends_auth_and_maps_fields() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/tiktok/metadata"))
                .and(query_param("url", VIDEO_URL))
                .and(header("Authorization", "Bearer sd_test_key"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "desc": "hello",
                    "stats": { "diggCount": 5 }
                })))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let metadata = client.fetch_metadata(VIDEO_URL).await.expect("metadata");

            assert_eq!(metadata.title.as_deref(), Some("hello"));
            assert_eq!(metadata.description.as_deref(), Some("hello"));
            assert_eq!(metadata.likes, Some(5));
        }

        #[tokio::test]
        async fn test_fetch_metadata_401_is_auth_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/tiktok/metadata"))
                .respond_with(ResponseTemplate::new(401))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let result = client.fetch_metadata(VIDEO_URL).await;

            assert!(matches!(result, Err(ScraperError::Auth)));
        }

        #[tokio::test]
        async fn test_fetch_metadata_402_is_credit_exhaustion() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/tiktok/metadata"))
                .respond_with(ResponseTemplate::new(402))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let result = client.fetch_metadata(VIDEO_URL).await;

            assert!(matches!(result, Err(ScraperError::CreditsExhausted)));
        }

        #[tokio::test]
        async fn test_fetch_metadata_500_keeps_status_and_body() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/tiktok/metadata"))
                .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
                .mount(&server)
                .await;

            let client = client_for(&server);
            match client.fetch_metadata(VIDEO_URL).await {
                Err(ScraperError::Api { status, message }) => {
                    assert_eq!(status, Some(500));
                    assert!(message.contains("upstream exploded"));
                }
                other => panic!("expected Api error, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_fetch_transcript_404_is_absence() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/transcript"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let transcript = client.fetch_transcript(VIDEO_URL).await.expect("absence is success");

            assert!(transcript.is_none());
        }

        #[tokio::test]
        async fn test_fetch_transcript_maps_alias_fields() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/transcript"))
                .and(query_param("url", VIDEO_URL))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "transcript": "hi there",
                    "lang": "en"
                })))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let transcript = client
                .fetch_transcript(VIDEO_URL)
                .await
                .expect("transcript")
                .expect("transcript present");

            assert_eq!(transcript.text, "hi there");
            assert_eq!(transcript.language.as_deref(), Some("en"));
        }

        #[tokio::test]
        async fn test_transport_failure_has_no_status_code() {
            // Nothing is listening on this port
            let mut config = Config::default();
            config.supadata.api_key = "sd_test_key".to_string();
            config.supadata.base_url = "http://127.0.0.1:9".to_string();
            config.http.request_timeout_secs = 1;
            let client = SupadataClient::new(config).expect("client should build");

            match client.fetch_metadata(VIDEO_URL).await {
                Err(ScraperError::Api { status, .. }) => assert_eq!(status, None),
                other => panic!("expected Api error, got {:?}", other),
            }
        }
    }
}
