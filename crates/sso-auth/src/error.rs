use sso_core::SsoError;
use thiserror::Error;

/// Failures of the role store collaborator.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("role API request failed: {0}")]
    Http(String),

    #[error("role API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("role API response could not be parsed: {0}")]
    Decode(String),

    #[error("role lookup is not configured: {0}")]
    NotConfigured(String),
}

impl From<LookupError> for SsoError {
    fn from(error: LookupError) -> Self {
        Self::Lookup(error.to_string())
    }
}
