//! Blocking client for the wit.ai `/message` endpoint.
//!
//! [`IntentClient::classify`] sends one GET request and returns the names of
//! the intents whose confidence meets the configured threshold, in the order
//! the service listed them.

mod http;
mod transport;

pub use http::HttpTransport;
pub use transport::{FailingTransport, MockTransport, OutboundRequest, RawResponse, Transport};
pub use witintent_config::ClientConfig;
pub use witintent_error::{ErrorKind, IntentError, Result};
pub use witintent_schema::{ClassificationResult, IntentScore};

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use witintent_config::{validate_threshold, validate_timeout};
use witintent_error::panic_message;
use witintent_sanitize::truncate_query;

/// Intent classification client.
///
/// Configuration changes take `&mut self`, so they cannot race an in-flight
/// call on a shared client.
pub struct IntentClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
}

impl IntentClient {
    /// Client with a 10s timeout and a 0.5 threshold. An empty token is
    /// accepted and sent as-is.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(token),
            transport: Box::new(HttpTransport),
        }
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport: Box::new(transport),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Fails with [`ErrorKind::Config`] below one millisecond; the previous
    /// timeout is kept.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        validate_timeout(timeout)?;
        self.config = std::mem::take(&mut self.config).with_timeout(timeout);
        Ok(())
    }

    /// Fails with [`ErrorKind::Config`] outside `[0, 1]`; the previous
    /// threshold is kept.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        validate_threshold(threshold)?;
        self.config.threshold = threshold;
        Ok(())
    }

    /// Classify `text`, returning the names of intents at or above the
    /// threshold.
    pub fn classify(&self, text: &str) -> Result<Vec<String>> {
        Self::guarded(|| {
            let result = self.fetch(text)?;
            Ok(result.intent_names(self.config.threshold))
        })
    }

    /// Like [`classify`](Self::classify) but keeps the message id, the echoed
    /// query and the scores. Intents below the threshold are removed.
    pub fn classify_detailed(&self, text: &str) -> Result<ClassificationResult> {
        Self::guarded(|| {
            let mut result = self.fetch(text)?;
            result.retain_above(self.config.threshold);
            Ok(result)
        })
    }

    /// The request `classify` would send for `text`.
    pub fn prepare(&self, text: &str) -> Result<OutboundRequest> {
        let mut url = self.config.endpoint_url()?;
        url.query_pairs_mut()
            .append_pair("v", &self.config.api_version)
            .append_pair("q", &truncate_query(text));

        Ok(OutboundRequest {
            url,
            token: self.config.token.clone(),
            timeout: self.config.timeout(),
            insecure_skip_verify: self.config.insecure_skip_verify,
            keep_alive: self.config.keep_alive,
        })
    }

    fn fetch(&self, text: &str) -> Result<ClassificationResult> {
        let request = self.prepare(text)?;
        let response = self.transport.send(&request)?;

        if response.status != 200 {
            return Err(IntentError::remote(
                response.status,
                String::from_utf8_lossy(&response.body),
            ));
        }

        ClassificationResult::from_slice(&response.body).map_err(IntentError::decode)
    }

    /// Run `f`, turning a panic into [`ErrorKind::Internal`].
    fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
        catch_unwind(AssertUnwindSafe(f))
            .unwrap_or_else(|payload| Err(IntentError::internal(panic_message(&*payload))))
    }
}
