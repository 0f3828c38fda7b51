//! Outbound HTTP request wrapper
//!
//! [`RequestClient::perform`] sends one request described by a
//! [`RequestDescriptor`], measures how long it took and reports the outcome
//! to the descriptor's hooks. Failures come back as [`RequestError`];
//! callers that prefer the lenient contract use
//! [`RequestClient::perform_or_empty`], which turns every failure into an
//! empty reply.

mod descriptor;
mod error;

pub use descriptor::{ErrorHook, RequestDescriptor, RequestMethod, SuccessHook};
pub use error::RequestError;

use hyper::body::Bytes;
use serde::de::DeserializeOwned;
use std::time::Instant;

use crate::logger;

/// Response payload of a successful request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpReply {
    /// Zero for the empty reply
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpReply {
    /// True for the reply produced by [`RequestClient::perform_or_empty`] on failure
    pub fn is_empty(&self) -> bool {
        self.status == 0 && self.headers.is_empty() && self.body.is_empty()
    }

    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP client used for calls to backend APIs
///
/// Speaks HTTP and HTTPS (rustls) and follows up to ten redirects.
#[derive(Debug, Clone)]
pub struct RequestClient {
    inner: reqwest::Client,
}

impl RequestClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wrap an already configured client
    pub const fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Send the request and report the outcome to the descriptor's hooks
    ///
    /// On success the success hook receives the elapsed milliseconds before
    /// the reply is returned. On failure the error hook is called exactly
    /// once with the error that is then returned. 4xx and 5xx statuses count
    /// as failures. No retries and no timeout beyond the transport's own.
    pub async fn perform(&self, desc: RequestDescriptor) -> Result<HttpReply, RequestError> {
        let start = Instant::now();
        let result = self.execute(&desc).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(_) => {
                logger::log_request_completed(&desc.method, &desc.url, elapsed_ms);
                if let Some(hook) = &desc.on_success {
                    hook(elapsed_ms);
                }
            }
            Err(e) => {
                logger::log_request_failed(&desc.method, &desc.url, e);
                if let Some(hook) = &desc.on_error {
                    hook(e);
                }
            }
        }

        result
    }

    /// Like [`perform`](Self::perform) but never fails
    ///
    /// Every error is reported to the error hook and replaced by an empty
    /// [`HttpReply`].
    pub async fn perform_or_empty(&self, desc: RequestDescriptor) -> HttpReply {
        self.perform(desc).await.unwrap_or_default()
    }

    async fn execute(&self, desc: &RequestDescriptor) -> Result<HttpReply, RequestError> {
        let method: RequestMethod = desc.method.parse()?;
        let request = desc.build_request(&self.inner, method)?;

        let response = self.inner.execute(request).await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(RequestError::Body)?;

        if status.is_client_error() || status.is_server_error() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(HttpReply {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

impl Default for RequestClient {
    fn default() -> Self {
        Self::new()
    }
}
