//! OAuth token exchange and refresh
//!
//! Handles the two token endpoint interactions:
//! 1. Authorization code exchange (callback after user consent)
//! 2. Token refresh (when the stored credential has expired)
//!
//! Both POST to the configured token endpoint with HTTP Basic client
//! authentication, which Spotify requires for confidential clients.
//! Neither is ever retried: codes are single-use and a rejected refresh
//! token usually means it was revoked.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::OAuthConfig;
use crate::credential::CredentialRecord;
use crate::error::{Error, Result, UpstreamFailure};
use crate::expiry::unix_now;
use crate::transport::HttpTransport;

/// Response body from the token endpoint for both exchange and refresh.
///
/// `expires_in` is a delta in seconds from the response time.
/// Refresh responses normally omit `refresh_token`.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Exchange an authorization code for an initial credential.
///
/// The code comes from the redirect callback after the user consented on
/// the page built by [`crate::build_auth_url`].
pub async fn exchange_code(
    transport: &dyn HttpTransport,
    config: &OAuthConfig,
    code: &str,
) -> Result<CredentialRecord> {
    exchange_code_at(transport, config, code, unix_now()).await
}

pub(crate) async fn exchange_code_at(
    transport: &dyn HttpTransport,
    config: &OAuthConfig,
    code: &str,
    now: u64,
) -> Result<CredentialRecord> {
    if code.is_empty() {
        return Err(Error::Configuration(
            "authorization code must not be empty".into(),
        ));
    }

    debug!(client_id = config.client_id(), "exchanging authorization code");
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri()),
    ];
    let response = request_token(transport, config, "authorization_code", &form).await?;

    let record = CredentialRecord::from_response(response, now, None);
    if record.refresh_token().is_none() {
        warn!("token exchange returned no refresh token, credential cannot be refreshed");
    }
    info!(
        expires_at = record.expires_at(),
        scope = record.scope(),
        "token exchange succeeded"
    );
    Ok(record)
}

/// Obtain a new access token for `current`.
///
/// Fails with [`Error::MissingRefreshToken`] before any network call when
/// `current` has no refresh token. The returned record keeps `current`'s
/// refresh token unless the provider rotated it.
pub async fn refresh(
    transport: &dyn HttpTransport,
    config: &OAuthConfig,
    current: &CredentialRecord,
) -> Result<CredentialRecord> {
    refresh_at(transport, config, current, unix_now()).await
}

pub(crate) async fn refresh_at(
    transport: &dyn HttpTransport,
    config: &OAuthConfig,
    current: &CredentialRecord,
    now: u64,
) -> Result<CredentialRecord> {
    let refresh_token = current.refresh_token().ok_or(Error::MissingRefreshToken)?;

    debug!(
        expired_at = current.expires_at(),
        "refreshing access token"
    );
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];
    let response = request_token(transport, config, "refresh_token", &form).await?;

    let rotated = response
        .refresh_token
        .as_deref()
        .is_some_and(|t| !t.is_empty() && t != refresh_token);
    let record = CredentialRecord::from_response(response, now, Some(refresh_token.to_owned()));
    info!(
        expires_at = record.expires_at(),
        rotated,
        "token refresh succeeded"
    );
    Ok(record)
}

/// POST one grant to the token endpoint and parse the 200 response.
async fn request_token(
    transport: &dyn HttpTransport,
    config: &OAuthConfig,
    grant: &'static str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let authorization = basic_authorization(config);
    let headers = [("Authorization", authorization.as_str())];

    let response = match transport
        .post_form(config.token_endpoint(), &headers, form)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!(grant, error = %e, "token endpoint request failed");
            record_outcome(grant, "unreachable");
            return Err(e);
        }
    };

    if response.status != 200 {
        warn!(grant, status = response.status, "token endpoint rejected request");
        record_outcome(grant, "rejected");
        // Other 2xx bodies may carry live tokens; only error bodies are kept
        let body = if (200..300).contains(&response.status) {
            String::from("<success body withheld>")
        } else {
            response.body
        };
        return Err(Error::UpstreamAuth(UpstreamFailure::Rejected {
            status: response.status,
            body,
        }));
    }

    match serde_json::from_str::<TokenResponse>(&response.body) {
        Ok(token) => {
            record_outcome(grant, "success");
            Ok(token)
        }
        Err(e) => {
            // serde_json errors report position and expected type, not the body
            warn!(grant, error = %e, "token endpoint returned an unparsable body");
            record_outcome(grant, "invalid_response");
            Err(Error::UpstreamAuth(UpstreamFailure::InvalidResponse(
                e.to_string(),
            )))
        }
    }
}

/// `Basic base64(client_id:client_secret)`
fn basic_authorization(config: &OAuthConfig) -> String {
    let credentials = format!(
        "{}:{}",
        config.client_id(),
        config.client_secret().expose()
    );
    format!("Basic {}", STANDARD.encode(credentials))
}

fn record_outcome(grant: &'static str, outcome: &'static str) {
    metrics::counter!("oauth_token_requests_total", "grant" => grant, "outcome" => outcome)
        .increment(1);
}
