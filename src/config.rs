use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default Unsplash API base URL
pub const DEFAULT_API_URL: &str = "https://api.unsplash.com";

/// Environment variable holding the Unsplash access key
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// How `search_photos` renders its results
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Base64-encoded images with per-photo metadata
    #[default]
    Image,
    /// Photo URLs and metadata as a single JSON document
    Text,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// Process-wide adapter configuration, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    /// Unsplash API access key sent as `Client-ID`
    pub access_key: String,
    /// Response rendering mode applied to every call
    pub response_format: ResponseFormat,
    /// Upstream base URL
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of image downloads in flight for one call
    pub image_concurrency: usize,
}

impl Config {
    #[must_use]
    pub fn new(access_key: impl Into<String>, response_format: ResponseFormat) -> Self {
        Self {
            access_key: access_key.into(),
            response_format,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            image_concurrency: 4,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(Error::Config("access key cannot be empty".to_string()));
        }

        Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("invalid api url '{}': {e}", self.api_url)))?;

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }

        if self.image_concurrency == 0 {
            return Err(Error::Config(
                "image concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Keep the access key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &"<redacted>")
            .field("response_format", &self.response_format)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("image_concurrency", &self.image_concurrency)
            .finish()
    }
}
