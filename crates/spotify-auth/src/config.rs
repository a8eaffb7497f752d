//! Immutable OAuth client configuration
//!
//! Built once at startup and passed by reference into every operation.
//! Nothing in this crate reads configuration from the environment.

use common::Secret;

use crate::authorize::build_auth_url;
use crate::constants::{AUTHORIZE_ENDPOINT, DEFAULT_SCOPE, TOKEN_ENDPOINT};
use crate::error::{Error, Result};

/// Client registration and provider endpoints.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    client_id: String,
    client_secret: Secret<String>,
    redirect_uri: String,
    scope: String,
    authorize_endpoint: String,
    token_endpoint: String,
}

impl OAuthConfig {
    /// Validate and build a config pointing at the Spotify endpoints.
    ///
    /// An empty `scope` falls back to [`DEFAULT_SCOPE`].
    pub fn new(
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let redirect_uri = redirect_uri.into();
        let mut scope = scope.into();

        if client_id.trim().is_empty() {
            return Err(Error::Configuration("client_id must not be empty".into()));
        }
        if client_secret.is_blank() {
            return Err(Error::Configuration(
                "client_secret must not be empty".into(),
            ));
        }
        require_http_url("redirect_uri", &redirect_uri)?;
        if scope.trim().is_empty() {
            scope = DEFAULT_SCOPE.to_owned();
        }

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            scope,
            authorize_endpoint: AUTHORIZE_ENDPOINT.to_owned(),
            token_endpoint: TOKEN_ENDPOINT.to_owned(),
        })
    }

    /// Override the provider endpoints (self-hosted mocks, staging).
    pub fn with_endpoints(
        mut self,
        authorize_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Result<Self> {
        let authorize_endpoint = authorize_endpoint.into();
        let token_endpoint = token_endpoint.into();
        require_http_url("authorize_endpoint", &authorize_endpoint)?;
        require_http_url("token_endpoint", &token_endpoint)?;
        self.authorize_endpoint = authorize_endpoint;
        self.token_endpoint = token_endpoint;
        Ok(self)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &Secret<String> {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn authorize_endpoint(&self) -> &str {
        &self.authorize_endpoint
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    /// Authorization URL for this client with the given CSRF `state`.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        build_auth_url(
            &self.authorize_endpoint,
            &self.client_id,
            &self.redirect_uri,
            state,
            &self.scope,
        )
    }
}

fn require_http_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Configuration(format!("{field} must not be empty")));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(Error::Configuration(format!(
            "{field} must start with http:// or https://, got: {value}"
        )));
    }
    Ok(())
}
