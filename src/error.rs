//! Error types for the FlightAxis link.
//!
//! The taxonomy follows the failure points of a link transaction:
//!
//! - **Connection**: socket creation, address resolution, or connect failure
//! - **Send**: write failure on an established socket
//! - **Timeout**: no reply (or no terminator) within the request deadline
//! - **Parse**: malformed reply content
//!
//! Transaction-level failures (`Connection`, `Send`, `Timeout`) abort only
//! the transaction that hit them; the caller's polling loop is the retry
//! mechanism. Per-field parse failures inside telemetry extraction are
//! absorbed to a default value and never surface as `Parse` — the variant
//! exists for reply-level problems such as non-UTF-8 payloads.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for link operations.
pub type Result<T, E = LinkError> = std::result::Result<T, E>;

/// Main error type for FlightAxis link operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LinkError {
    #[error("Connection error with {endpoint}: {reason}")]
    Connection {
        endpoint: String,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to send request for action '{action}'")]
    Send {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No complete reply within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },
}

impl LinkError {
    /// Returns whether this error is potentially recoverable by retrying
    /// the transaction on a fresh connection.
    pub fn is_retryable(&self) -> bool {
        match self {
            LinkError::Connection { .. } => true,
            LinkError::Send { .. } => true,
            LinkError::Timeout { .. } => true,
            LinkError::Parse { .. } => false,
        }
    }

    /// Helper constructor for connection errors without an io source.
    pub fn connection_failed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        LinkError::Connection { endpoint: endpoint.into(), reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors caused by an io error.
    pub fn connection_io(endpoint: impl Into<String>, source: std::io::Error) -> Self {
        LinkError::Connection {
            endpoint: endpoint.into(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// Helper constructor for send errors.
    pub fn send_failed(action: impl Into<String>, source: std::io::Error) -> Self {
        LinkError::Send { action: action.into(), source }
    }

    /// Helper constructor for request timeouts.
    pub fn timed_out(timeout: Duration) -> Self {
        LinkError::Timeout { timeout }
    }

    /// Helper constructor for reply parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        LinkError::Parse { context: context.into(), details: details.into() }
    }
}
