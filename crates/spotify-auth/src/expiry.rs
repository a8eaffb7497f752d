//! Expiry detection

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::EXPIRY_SKEW_SECS;
use crate::credential::CredentialRecord;

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Whether `record` should be treated as expired at `now` (unix seconds).
///
/// Tokens within [`EXPIRY_SKEW_SECS`] of `expires_at` already count as
/// expired: false for `now < expires_at - skew`, true from there on.
pub fn is_expired(record: &CredentialRecord, now: u64) -> bool {
    now.saturating_add(EXPIRY_SKEW_SECS) >= record.expires_at()
}
