//! Outbound HTTP seam for token endpoint calls
//!
//! The exchanger and refresher only ever need one capability: POST a form
//! body and read back the status and body text. `HttpTransport` is that
//! capability; `ReqwestTransport` is the production implementation and tests
//! plug in in-memory doubles.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result, UpstreamFailure};

/// Status and body of a token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP capability used by the token lifecycle operations.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`&dyn HttpTransport`, `Arc<dyn HttpTransport>`).
pub trait HttpTransport: Send + Sync {
    /// POST `form` as `application/x-www-form-urlencoded` to `url`.
    ///
    /// Any HTTP status is a successful transport result; only failure to get
    /// a response at all (connect error, timeout) is an `Err`, reported as
    /// [`UpstreamFailure::Unreachable`].
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'a str, &'a str)],
        form: &'a [(&'a str, &'a str)],
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + 'a>>;
}

/// `reqwest`-backed transport with a finite request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::Configuration(
                "transport timeout must be greater than 0".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'a str, &'a str)],
        form: &'a [(&'a str, &'a str)],
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + 'a>> {
        Box::pin(async move {
            let mut request = self.client.post(url).form(form);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }

            let response = request
                .send()
                .await
                .map_err(|e| unreachable("request", e))?;

            let status = response.status().as_u16();
            // A stalled or reset body is a failed round trip, not an empty answer
            let body = response
                .text()
                .await
                .map_err(|e| unreachable("reading response body", e))?;
            debug!(url, status, "token endpoint responded");

            Ok(TransportResponse { status, body })
        })
    }
}

fn unreachable(stage: &str, e: reqwest::Error) -> Error {
    let reason = if e.is_timeout() {
        format!("{stage} timed out: {e}")
    } else {
        format!("{stage} failed: {e}")
    };
    Error::UpstreamAuth(UpstreamFailure::Unreachable(reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_a_configuration_error() {
        let err = ReqwestTransport::new(Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_upstream_unreachable() {
        // Port 9 (discard) on localhost is not listening in test environments
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let err = transport
            .post_form("http://127.0.0.1:9/api/token", &[], &[("grant_type", "x")])
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::UpstreamAuth(UpstreamFailure::Unreachable(_))),
            "got: {err:?}"
        );
    }
}
