//! Command-line surface of the server binary.

use crate::config::{Config, ResponseFormat, ACCESS_KEY_ENV, DEFAULT_API_URL};
use crate::{Error, Result};
use clap::{Parser, ValueEnum};

const ENV_HELP: &str = "\
Environment Variables:
  UNSPLASH_ACCESS_KEY         Unsplash API access key (alternative to --access-key)
  UNSPLASH_API_URL            Unsplash API base URL (alternative to --api-url)
  RUST_LOG                    Log filter, overrides --log-level

Examples:
  unsplash-mcp-server --access-key YOUR_API_KEY
  unsplash-mcp-server --access-key YOUR_API_KEY --response-format text
  UNSPLASH_ACCESS_KEY=YOUR_API_KEY unsplash-mcp-server";

/// Printed when neither `--access-key` nor `UNSPLASH_ACCESS_KEY` supplies a key
pub const MISSING_KEY_MESSAGE: &str = "Unsplash API access key is required.\n\
Provide it via --access-key argument or UNSPLASH_ACCESS_KEY environment variable.";

/// Log output encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Unsplash MCP Server
#[derive(Debug, Parser)]
#[command(name = "unsplash-mcp-server", version, after_help = ENV_HELP)]
pub struct Cli {
    /// Unsplash API access key
    #[arg(short = 'k', long, value_name = "KEY")]
    pub access_key: Option<String>,

    /// Response format: 'image' (base64) or 'text' (URLs)
    #[arg(short = 'f', long, value_enum, value_name = "FMT", default_value_t = ResponseFormat::Image)]
    pub response_format: ResponseFormat,

    /// Unsplash API base URL
    #[arg(long, env = "UNSPLASH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Timeout for each upstream request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Maximum concurrent image downloads per call in image mode
    #[arg(long, default_value_t = 4)]
    pub image_concurrency: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Resolve the startup configuration.
    ///
    /// `env_access_key` is the value of `UNSPLASH_ACCESS_KEY`, if any; the
    /// command-line flag takes precedence over it and empty values count as
    /// absent.
    pub fn into_config(self, env_access_key: Option<String>) -> Result<Config> {
        let access_key = self
            .access_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env_access_key.filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| Error::Config(MISSING_KEY_MESSAGE.to_string()))?;

        let config = Config {
            access_key,
            response_format: self.response_format,
            api_url: self.api_url,
            timeout_secs: self.timeout_secs,
            image_concurrency: self.image_concurrency,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the access key from the process environment
    #[must_use]
    pub fn env_access_key() -> Option<String> {
        std::env::var(ACCESS_KEY_ENV).ok()
    }
}
