pub mod unsplash;

pub use unsplash::{ImageData, UnsplashClient};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// HTTP client configuration for the Unsplash integration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Photo orientation filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Squarish => "squarish",
        }
    }
}

/// Content safety filter
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum ContentFilter {
    #[default]
    Low,
    High,
}

impl ContentFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Parameters of one upstream photo search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoQuery {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    pub orientation: Option<Orientation>,
    pub content_filter: ContentFilter,
}

impl PhotoQuery {
    /// Query-string pairs for `/search/photos`.
    ///
    /// `orientation` is only present when it was requested.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("content_filter", self.content_filter.as_str().to_string()),
        ];
        if let Some(orientation) = self.orientation {
            params.push(("orientation", orientation.as_str().to_string()));
        }
        params
    }
}

/// URL variants of a photo.
///
/// Every variant is optional; absent variants stay absent when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Photographer who owns a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One photo as returned by the Unsplash API.
///
/// Fields the adapter does not interpret are kept in `extra` so the photo
/// serializes back to the full upstream object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub created_at: String,
    pub width: u32,
    pub height: u32,
    pub urls: PhotoUrls,
    pub user: PhotoUser,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Photo {
    /// Description, else alt description, else "No description"
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.alt_description.as_deref().filter(|text| !text.is_empty()))
            .unwrap_or("No description")
    }
}

/// Body of `GET /search/photos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub total_pages: u64,
    pub results: Vec<Photo>,
}
