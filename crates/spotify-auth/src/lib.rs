//! Spotify OAuth token lifecycle library
//!
//! Authorization Code grant for a confidential client: build the consent
//! URL, exchange the callback code for a credential, detect expiry, refresh,
//! and encode the credential into an opaque cookie-safe artifact that the
//! caller stores. The library keeps no credentials of its own.
//!
//! Credential flow:
//! 1. Caller issues a state via `StateStore::issue()` (or `generate_state()`)
//! 2. User authorizes via `OAuthConfig::authorization_url()` / `build_auth_url()`
//! 3. Callback handler checks `StateStore::consume()`, then calls `exchange_code()`
//! 4. Credential stored by the caller as `codec::encode()` output
//! 5. On later requests, `ensure_fresh()` decodes it and calls `refresh()` when expired
//! 6. A refreshed credential is re-encoded and stored again by the caller

pub mod authorize;
pub mod codec;
pub mod config;
pub mod constants;
pub mod credential;
pub mod error;
pub mod expiry;
pub mod lifecycle;
pub mod state;
pub mod token;
pub mod transport;

#[cfg(test)]
mod testing;

pub use authorize::{build_auth_url, generate_state};
pub use codec::{decode, encode};
pub use config::OAuthConfig;
pub use constants::*;
pub use credential::CredentialRecord;
pub use error::{Error, Result, UpstreamFailure};
pub use expiry::{is_expired, unix_now};
pub use lifecycle::{Freshness, ensure_fresh};
pub use state::StateStore;
pub use token::{TokenResponse, exchange_code, refresh};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
