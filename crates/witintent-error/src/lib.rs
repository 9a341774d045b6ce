//! Error type for the witintent client.
//!
//! Every failure of a classification call maps to exactly one [`ErrorKind`].
//! Messages keep the `wit.ai error: ` prefix so callers matching on text
//! keep working.

use std::fmt;

/// Prefix carried by every error message.
pub const MESSAGE_PREFIX: &str = "wit.ai error: ";

/// What stage of a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network, TLS or timeout failure before a response arrived.
    Transport,
    /// Non-200 status; the message carries the response body.
    Remote,
    /// A 200 response whose body could not be read.
    Read,
    /// Body was not the expected JSON shape.
    Decode,
    /// Panic or other unexpected fault caught at the call boundary.
    Internal,
    /// Invalid client configuration.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Remote => write!(f, "remote"),
            ErrorKind::Read => write!(f, "read"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Internal => write!(f, "internal"),
            ErrorKind::Config => write!(f, "config"),
        }
    }
}

#[derive(Debug)]
pub struct IntentError {
    message: String,
    kind: ErrorKind,
    status: Option<u16>,
    timeout: bool,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl IntentError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: format!("{MESSAGE_PREFIX}{}", message.into()),
            kind,
            status: None,
            timeout: false,
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let mut err = Self::new(kind, message);
        err.source = Some(source.into());
        err
    }

    /// Transport failure. `timeout` marks a deadline expiry.
    pub fn transport(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
        timeout: bool,
    ) -> Self {
        let source = source.into();
        let mut err = Self::new(ErrorKind::Transport, source.to_string());
        err.timeout = timeout;
        err.source = Some(source);
        err
    }

    /// Non-200 response; `body` is kept verbatim.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::Remote, body);
        err.status = Some(status);
        err
    }

    pub fn read(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        let source = source.into();
        Self::with_source(ErrorKind::Read, source.to_string(), source)
    }

    pub fn decode(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        let source = source.into();
        Self::with_source(ErrorKind::Decode, source.to_string(), source)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Full message, prefix included.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of a [`ErrorKind::Remote`] error.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_timeout(&self) -> bool {
        self.timeout
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    pub fn is_remote(&self) -> bool {
        self.kind == ErrorKind::Remote
    }

    pub fn is_read(&self) -> bool {
        self.kind == ErrorKind::Read
    }

    pub fn is_decode(&self) -> bool {
        self.kind == ErrorKind::Decode
    }

    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Internal
    }
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status={status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for IntentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

pub type Result<T> = std::result::Result<T, IntentError>;

impl From<anyhow::Error> for IntentError {
    fn from(err: anyhow::Error) -> Self {
        IntentError::with_source(ErrorKind::Internal, err.to_string(), err)
    }
}

/// Render a caught panic payload as text.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
