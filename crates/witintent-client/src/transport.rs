use std::sync::Mutex;
use std::time::Duration;
use url::Url;
use witintent_error::{IntentError, Result};

/// A fully prepared classification request.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    /// Endpoint with `v` and `q` already encoded.
    pub url: Url,
    pub token: String,
    pub timeout: Duration,
    pub insecure_skip_verify: bool,
    pub keep_alive: bool,
}

impl OutboundRequest {
    /// Decoded value of the `q` parameter.
    pub fn query_text(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
    }
}

/// Status and body of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes one request. Enables testing without a network.
///
/// Implementations return [`IntentError::transport`] when no response
/// arrived, and [`IntentError::read`] when a 200 body could not be read.
/// For any other status a body read failure yields an empty body.
pub trait Transport: Send + Sync {
    fn send(&self, request: &OutboundRequest) -> Result<RawResponse>;
}

/// Mock transport returning a canned response and recording requests.
pub struct MockTransport {
    pub response: RawResponse,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            response: RawResponse::new(status, body),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &OutboundRequest) -> Result<RawResponse> {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
        Ok(self.response.clone())
    }
}

/// Mock transport that always fails before a response arrives.
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn send(&self, _request: &OutboundRequest) -> Result<RawResponse> {
        Err(IntentError::transport(
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused (mock)"),
            false,
        ))
    }
}
