use thiserror::Error;

/// Error taxonomy for the Unsplash adapter
#[derive(Error, Debug)]
pub enum Error {
    // Startup configuration errors (fatal)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // Transport failures: connection refused, timeout, body decode
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Per-call validation errors
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unsplash API error: {status} {reason}")]
    Upstream { status: u16, reason: String },

    #[error("Failed to fetch image: {status} {reason}")]
    ImageFetch { status: u16, reason: String },

    #[error("Service error: {0}")]
    Service(String),
}

impl Error {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was produced by a non-success upstream status
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } | Self::ImageFetch { status, .. } => Some(*status),
            Self::Http(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serde(_)
            | Self::InvalidInput { .. }
            | Self::Service(_) => None,
        }
    }
}

/// Render an error for inclusion in a tool response.
///
/// Falls back to "Unknown error" when the error carries no message.
#[must_use]
pub fn describe(err: &dyn std::error::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Silent;

    impl std::fmt::Display for Silent {
        fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            Ok(())
        }
    }

    impl std::error::Error for Silent {}

    #[test]
    fn test_upstream_display() {
        let err = Error::Upstream {
            status: 401,
            reason: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "Unsplash API error: 401 Unauthorized");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input("query", "Query cannot be empty");
        assert_eq!(err.to_string(), "Invalid input: query - Query cannot be empty");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_describe_falls_back_to_unknown() {
        assert_eq!(describe(&Silent), "Unknown error");
        assert_eq!(
            describe(&Error::Service("boom".to_string())),
            "Service error: boom"
        );
    }
}
