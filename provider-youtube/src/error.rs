//! Error types for the YouTube provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// YouTube Data API errors
#[derive(Error, Debug)]
pub enum YouTubeError {
    /// API request returned a non-2xx status
    #[error("YouTube API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure from the HTTP bridge
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Result type for YouTube operations
pub type Result<T> = std::result::Result<T, YouTubeError>;

impl From<YouTubeError> for BridgeError {
    fn from(error: YouTubeError) -> Self {
        match error {
            YouTubeError::Bridge(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = YouTubeError::ApiError {
            status_code: 403,
            message: "The request cannot be completed because you have exceeded your quota."
                .to_string(),
        };

        assert_eq!(
            error.to_string(),
            "YouTube API error (status 403): The request cannot be completed because you have exceeded your quota."
        );
    }

    #[test]
    fn test_error_conversion() {
        let bridge_error: BridgeError = YouTubeError::ParseError("eof".to_string()).into();
        assert!(matches!(bridge_error, BridgeError::OperationFailed(_)));

        let bridge_error: BridgeError = YouTubeError::Bridge(BridgeError::Timeout(20)).into();
        assert!(matches!(bridge_error, BridgeError::Timeout(20)));
    }
}
