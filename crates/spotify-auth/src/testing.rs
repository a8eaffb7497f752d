//! In-memory transport double shared by unit tests

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use common::Secret;

use crate::config::OAuthConfig;
use crate::error::{Error, Result, UpstreamFailure};
use crate::transport::{HttpTransport, TransportResponse};

/// One captured `post_form` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Returns a canned response (or failure) and records every call.
pub struct RecordingTransport {
    reply: std::result::Result<TransportResponse, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(TransportResponse {
                status,
                body: body.to_owned(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_owned()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpTransport for RecordingTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'a str, &'a str)],
        form: &'a [(&'a str, &'a str)],
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + 'a>> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_owned(),
            headers: owned(headers),
            form: owned(form),
        });

        let reply = self
            .reply
            .clone()
            .map_err(|reason| Error::UpstreamAuth(UpstreamFailure::Unreachable(reason)));
        Box::pin(async move { reply })
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Config with client `cid:secret`, redirect `http://cb`, scope `read`.
pub fn test_config(token_endpoint: &str) -> OAuthConfig {
    OAuthConfig::new("cid", Secret::new("secret".to_owned()), "http://cb", "read")
        .unwrap()
        .with_endpoints("http://127.0.0.1:1/authorize", token_endpoint)
        .unwrap()
}
