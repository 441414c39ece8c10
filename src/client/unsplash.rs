use crate::client::{HttpClientConfig, PhotoQuery, SearchResponse};
use crate::{Config, Error, Result};
use base64::Engine;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

/// MIME type assumed when an image response carries no `content-type`
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A downloaded image, ready to embed in a tool response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Base64-encoded image bytes
    pub base64: String,
    pub mime_type: String,
}

/// Client for the Unsplash REST API
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http_client: Client,
    api_url: String,
    access_key: String,
}

impl UnsplashClient {
    /// Create a new Unsplash client with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let http_config = HttpClientConfig {
            timeout: config.timeout(),
            ..HttpClientConfig::default()
        };

        let http_client = Client::builder()
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(http_config.max_redirects))
            .gzip(true)
            .user_agent(&http_config.user_agent)
            .build()
            .map_err(|e| Error::Service(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initialized Unsplash client for {} (timeout {:?})",
            config.api_url, http_config.timeout
        );

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
        })
    }

    /// Search photos via `GET /search/photos`
    #[instrument(skip(self), fields(query = %query.query, page = query.page))]
    pub async fn search_photos(&self, query: &PhotoQuery) -> Result<SearchResponse> {
        let url = format!("{}/search/photos", self.api_url);
        debug!("Requesting {} with {:?}", url, query.params());

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Unsplash search returned {}", status);
            return Err(Error::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!(
            "Unsplash search returned {} of {} photos",
            body.results.len(),
            body.total
        );
        Ok(body)
    }

    /// Download an image and base64-encode it
    #[instrument(skip(self))]
    pub async fn fetch_image(&self, url: &str) -> Result<ImageData> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ImageFetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        encode_image(response).await
    }
}

async fn encode_image(response: Response) -> Result<ImageData> {
    let mime_type = mime_type_from_headers(response.headers());
    let bytes = response.bytes().await?;
    debug!("Fetched {} bytes of {}", bytes.len(), mime_type);

    Ok(ImageData {
        base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
        mime_type,
    })
}

/// The response `content-type`, or `image/jpeg` when absent
#[must_use]
pub fn mime_type_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string()
}
