//! Spotify Accounts service constants
//!
//! Endpoint defaults for the Authorization Code grant. The client id and
//! secret are per-application and come from configuration, not from here.

/// Authorization endpoint the user's browser is redirected to for consent
pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";

/// Token endpoint for code exchange and token refresh
pub const TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";

/// Scope requested when configuration does not name one.
pub const DEFAULT_SCOPE: &str = "user-read-private";

/// Tokens expiring within this many seconds are treated as already expired,
/// so a token cannot lapse between the check and its use downstream.
pub const EXPIRY_SKEW_SECS: u64 = 60;

/// Upper bound on an encoded credential artifact. 4096 bytes is the smallest
/// per-cookie limit browsers are required to support.
pub const MAX_ARTIFACT_LEN: usize = 4096;

/// Default outbound timeout for token endpoint calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
