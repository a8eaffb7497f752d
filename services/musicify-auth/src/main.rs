//! Musicify Spotify auth CLI
//!
//! Operator tool around the `spotify-auth` token lifecycle:
//! 1. `authorize-url` prints a consent URL with a fresh CSRF state
//! 2. `exchange` trades the callback code for an encoded credential
//! 3. `refresh` refreshes an encoded credential if (or when forced) expired
//! 4. `inspect` shows credential metadata without revealing tokens
//!
//! Every command prints one JSON object on stdout. Logs go to stderr.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use spotify_auth::{CredentialRecord, Freshness, OAuthConfig, ReqwestTransport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "musicify-auth", version, about = "Spotify OAuth token lifecycle tool")]
struct Cli {
    /// Path to the TOML config file (falls back to CONFIG_PATH, then ./musicify-auth.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print an authorization URL and the state it was issued with
    AuthorizeUrl,
    /// Exchange an authorization code from the redirect callback
    Exchange {
        #[arg(long)]
        code: String,
    },
    /// Refresh a stored credential when it is expired
    Refresh {
        #[arg(long, env = "MUSICIFY_CREDENTIAL", hide_env_values = true)]
        credential: String,
        /// Refresh even if the access token is still valid
        #[arg(long)]
        force: bool,
    },
    /// Show credential metadata (never the tokens themselves)
    Inspect {
        #[arg(long, env = "MUSICIFY_CREDENTIAL", hide_env_values = true)]
        credential: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Inspect { credential } => inspect(&credential)?,
        Command::AuthorizeUrl => authorize_url(&Session::load(cli.config.as_deref())?)?,
        Command::Exchange { code } => exchange(&Session::load(cli.config.as_deref())?, &code).await?,
        Command::Refresh { credential, force } => {
            refresh(&Session::load(cli.config.as_deref())?, &credential, force).await?
        }
    };

    println!("{output}");
    Ok(())
}

/// Validated OAuth config plus the transport for commands that reach Spotify.
struct Session {
    oauth: OAuthConfig,
    transport: ReqwestTransport,
}

impl Session {
    fn load(cli_path: Option<&Path>) -> Result<Self> {
        let config_path = Config::resolve_path(cli_path);
        info!(path = %config_path.display(), "loading configuration");
        let config = Config::load(&config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?;

        let oauth = config.oauth().context("invalid OAuth configuration")?;
        let transport =
            ReqwestTransport::new(config.timeout()).context("failed to build HTTP transport")?;

        info!(
            client_id = oauth.client_id(),
            redirect_uri = oauth.redirect_uri(),
            token_endpoint = oauth.token_endpoint(),
            "configuration loaded"
        );
        Ok(Self { oauth, transport })
    }
}

fn authorize_url(session: &Session) -> Result<serde_json::Value> {
    let state = spotify_auth::generate_state();
    let url = session.oauth.authorization_url(&state)?;
    Ok(json!({ "authorization_url": url, "state": state }))
}

async fn exchange(session: &Session, code: &str) -> Result<serde_json::Value> {
    let record = spotify_auth::exchange_code(&session.transport, &session.oauth, code)
        .await
        .map_err(reauth_hint)
        .context("authorization code exchange failed")?;
    Ok(json!({
        "credential": spotify_auth::encode(&record)?,
        "expires_at": record.expires_at(),
        "scope": record.scope(),
    }))
}

async fn refresh(session: &Session, credential: &str, force: bool) -> Result<serde_json::Value> {
    let fresh = if force {
        let current = spotify_auth::decode(credential)
            .map_err(reauth_hint)
            .context("stored credential is unreadable")?;
        let refreshed = spotify_auth::refresh(&session.transport, &session.oauth, &current)
            .await
            .map_err(reauth_hint)
            .context("token refresh failed")?;
        Freshness::Refreshed(refreshed)
    } else {
        spotify_auth::ensure_fresh(
            &session.transport,
            &session.oauth,
            credential,
            spotify_auth::unix_now(),
        )
        .await
        .map_err(reauth_hint)
        .context("credential refresh failed")?
    };
    Ok(json!({
        "credential": fresh.artifact()?,
        "refreshed": fresh.was_refreshed(),
        "expires_at": fresh.record().expires_at(),
    }))
}

/// Decode without touching the network or config.
fn inspect(credential: &str) -> Result<serde_json::Value> {
    let record = spotify_auth::decode(credential)
        .map_err(reauth_hint)
        .context("stored credential is unreadable")?;
    Ok(describe(&record, spotify_auth::unix_now()))
}

fn describe(record: &CredentialRecord, now: u64) -> serde_json::Value {
    json!({
        "token_type": record.token_type(),
        "scope": record.scope(),
        "expires_at": record.expires_at(),
        "expired": record.is_expired(now),
        "has_refresh_token": record.refresh_token().is_some(),
    })
}

/// Log the re-authentication consequence before the error is wrapped.
fn reauth_hint(err: spotify_auth::Error) -> anyhow::Error {
    if err.requires_reauthentication() {
        warn!(error = %err, "credential unusable, user must re-authorize via authorize-url");
    }
    anyhow::Error::new(err)
}
