//! The credential record minted by code exchange and refresh
//!
//! A record is immutable once built. Refreshing produces a new record; the
//! old one is simply dropped by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expiry;
use crate::token::TokenResponse;

/// One user's OAuth credential.
///
/// `expires_at` is a unix timestamp in seconds, fixed at mint time from
/// `expires_in` plus the clock at that moment. It is carried through the
/// codec as-is and never recomputed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialRecord {
    access_token: String,
    token_type: String,
    expires_in: u64,
    expires_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    scope: String,
}

impl CredentialRecord {
    pub fn new(
        access_token: String,
        token_type: String,
        expires_in: u64,
        expires_at: u64,
        refresh_token: Option<String>,
        scope: String,
    ) -> Self {
        Self {
            access_token,
            token_type,
            expires_in,
            expires_at,
            refresh_token,
            scope,
        }
    }

    /// Mint a record from a token endpoint response received at `now`.
    ///
    /// A refresh response usually omits `refresh_token`; `previous_refresh`
    /// fills the gap. A non-empty token in the response wins, since the
    /// provider may rotate it.
    pub(crate) fn from_response(
        response: TokenResponse,
        now: u64,
        previous_refresh: Option<String>,
    ) -> Self {
        let refresh_token = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .or(previous_refresh);

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            expires_at: now.saturating_add(response.expires_in),
            refresh_token,
            scope: response.scope,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// The refresh token, if present and non-empty.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Whether the access token should be considered expired at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        expiry::is_expired(self, now)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .finish()
    }
}
