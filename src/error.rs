//! error handling for the remote client layer
use thiserror::Error;

#[derive(Debug, Error)]
/// A failure talking to the Panopto service.
pub enum ApiError {
    /// a transport-level error from reqwest
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// the token exchange failed, or the service kept rejecting our credentials
    #[error("authorization failed: {0}")]
    Auth(String),

    /// the service answered with a status we have no mapping for
    #[error("api error: http {status}: {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// status code carried by [`ApiError::Api`], if that is what this is
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A result using [`ApiError`] as the `Err` variant
pub type Result<T, E = ApiError> = std::result::Result<T, E>;
