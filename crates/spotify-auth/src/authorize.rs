//! Authorization request construction
//!
//! Builds the URL the user's browser is sent to for consent, and the random
//! `state` value that ties the eventual callback back to this login attempt.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

use crate::error::{Error, Result};

/// Generate a fresh, unguessable CSRF `state` value.
///
/// 32 random bytes encoded as URL-safe base64 without padding (43 chars).
/// Use a new value for every login attempt.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the authorization URL with all required OAuth parameters.
///
/// Every parameter value is percent-encoded, so a redirect URI like
/// `http://cb` appears as `http%3A%2F%2Fcb` and a multi-scope string has its
/// spaces encoded as `%20`. Empty `client_id`, `redirect_uri` or `state` is a
/// configuration error.
pub fn build_auth_url(
    authorize_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    scope: &str,
) -> Result<String> {
    if client_id.is_empty() {
        return Err(Error::Configuration("client_id must not be empty".into()));
    }
    if redirect_uri.is_empty() {
        return Err(Error::Configuration(
            "redirect_uri must not be empty".into(),
        ));
    }
    if state.is_empty() {
        return Err(Error::Configuration("state must not be empty".into()));
    }

    Ok(format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&state={}&scope={}",
        authorize_endpoint,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(state),
        urlencoding::encode(scope),
    ))
}
