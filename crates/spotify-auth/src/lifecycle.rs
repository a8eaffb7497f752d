//! Decode → expiry check → refresh, in one call
//!
//! This is what a login or API-proxy handler does with the artifact it finds
//! in the user's cookie. Any `Err` that [`Error::requires_reauthentication`]
//! means: drop the artifact and send the user back to the authorize URL.

use tracing::{debug, info};

use crate::codec;
use crate::config::OAuthConfig;
use crate::credential::CredentialRecord;
use crate::error::Result;
use crate::expiry::is_expired;
use crate::token::refresh;
use crate::transport::HttpTransport;

/// Outcome of [`ensure_fresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// The stored credential is still valid and was returned as decoded.
    Current(CredentialRecord),
    /// The stored credential had expired and a new one was minted. The
    /// caller must persist it (see [`Freshness::artifact`]).
    Refreshed(CredentialRecord),
}

impl Freshness {
    pub fn record(&self) -> &CredentialRecord {
        match self {
            Self::Current(r) | Self::Refreshed(r) => r,
        }
    }

    pub fn into_record(self) -> CredentialRecord {
        match self {
            Self::Current(r) | Self::Refreshed(r) => r,
        }
    }

    pub fn was_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }

    /// Encoded artifact for the (possibly new) record.
    pub fn artifact(&self) -> Result<String> {
        codec::encode(self.record())
    }
}

/// Decode `artifact` and refresh it if it is expired at `now`.
///
/// `now` only decides whether a refresh is due. A refreshed record's
/// `expires_at` is taken from the clock when the token endpoint answered,
/// so a stale `now` cannot shorten or stretch its lifetime.
pub async fn ensure_fresh(
    transport: &dyn HttpTransport,
    config: &OAuthConfig,
    artifact: &str,
    now: u64,
) -> Result<Freshness> {
    let current = codec::decode(artifact)?;

    if !is_expired(&current, now) {
        debug!(expires_at = current.expires_at(), "stored credential still valid");
        return Ok(Freshness::Current(current));
    }

    info!(expires_at = current.expires_at(), now, "stored credential expired, refreshing");
    let refreshed = refresh(transport, config, &current).await?;
    Ok(Freshness::Refreshed(refreshed))
}
