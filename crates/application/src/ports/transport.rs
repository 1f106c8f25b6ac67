//! HTTP transport port.

use thiserror::Error;

use sesame_domain::{HttpResponse, OutboundRequest};

use super::BoxFuture;

/// Errors from the HTTP transport adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The target URL was rejected by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for issuing HTTP requests.
///
/// The gateway and the logout flow are the only callers; both hand over a
/// fully-computed [`OutboundRequest`]. Implementations with an ambient
/// cookie store satisfy `include_credentials` implicitly.
pub trait HttpTransport: Send + Sync {
    /// Execute the request and return the raw response.
    fn send<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}
