//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from SPOTIFY_CLIENT_SECRET or
//! client_secret_file, never stored in the TOML directly to avoid leaking it.

use common::Secret;
use serde::Deserialize;
use spotify_auth::OAuthConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var holding the Spotify client secret.
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Spotify application registration
#[derive(Debug, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to the env var)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    pub redirect_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub authorize_endpoint: Option<String>,
    #[serde(default)]
    pub token_endpoint: Option<String>,
}

/// Outbound HTTP settings for token endpoint calls
#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_scope() -> String {
    spotify_auth::DEFAULT_SCOPE.to_owned()
}

fn default_timeout() -> u64 {
    spotify_auth::DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. SPOTIFY_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.http.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        // Resolve client secret: env var takes precedence over file
        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.spotify.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.spotify.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.spotify.client_secret = Some(Secret::new(secret));
            }
        }

        if config.spotify.client_secret.is_none() {
            return Err(common::Error::Config(format!(
                "client secret missing: set {CLIENT_SECRET_ENV} or client_secret_file"
            )));
        }

        // Field rules live in OAuthConfig; build one once so a bad file fails here
        config
            .oauth()
            .map_err(|e| common::Error::Config(e.to_string()))?;

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&Path>) -> PathBuf {
        if let Some(p) = cli_path {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("musicify-auth.toml")
    }

    /// Build the immutable OAuth config handed to every token operation.
    pub fn oauth(&self) -> spotify_auth::Result<OAuthConfig> {
        let secret = self.spotify.client_secret.clone().ok_or_else(|| {
            spotify_auth::Error::Configuration("client secret not loaded".into())
        })?;
        let oauth = OAuthConfig::new(
            self.spotify.client_id.clone(),
            secret,
            self.spotify.redirect_uri.clone(),
            self.spotify.scope.clone(),
        )?;

        match (&self.spotify.authorize_endpoint, &self.spotify.token_endpoint) {
            (None, None) => Ok(oauth),
            (authorize, token) => {
                let authorize = authorize
                    .clone()
                    .unwrap_or_else(|| oauth.authorize_endpoint().to_owned());
                let token = token
                    .clone()
                    .unwrap_or_else(|| oauth.token_endpoint().to_owned());
                oauth.with_endpoints(authorize, token)
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}
