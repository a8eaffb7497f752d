//! Error types for token lifecycle operations

use std::fmt;

/// How a call to the token endpoint failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The provider answered with a non-200 status. `body` is kept verbatim
    /// so misconfiguration (bad client_id, redirect mismatch) can be
    /// diagnosed without replaying the request.
    Rejected { status: u16, body: String },
    /// No response: connect failure, TLS failure or timeout.
    Unreachable(String),
    /// 200 with a body that is not a token response.
    InvalidResponse(String),
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, body } => {
                write!(f, "token endpoint returned {status}: {body}")
            }
            Self::Unreachable(msg) => write!(f, "token endpoint unreachable: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "invalid token response: {msg}"),
        }
    }
}

/// Errors from authorization, token exchange, refresh and credential codec.
///
/// Messages never include access or refresh token values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream auth error: {0}")]
    UpstreamAuth(UpstreamFailure),

    #[error("credential has no refresh token")]
    MissingRefreshToken,

    #[error("credential codec error: {0}")]
    Codec(String),
}

impl Error {
    /// Whether the caller should discard the stored credential and send the
    /// user back through the authorization flow.
    ///
    /// Configuration errors are fatal at startup instead.
    pub fn requires_reauthentication(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }

    /// HTTP status returned by the provider, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamAuth(UpstreamFailure::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
