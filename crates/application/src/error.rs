//! Application error types

use thiserror::Error;

use crate::ports::ProviderError;
use sesame_domain::DomainError;

/// Errors surfaced by the auth session and the request gateway.
///
/// Token-probe failures never appear here: `get_token` folds them into
/// [`crate::TokenOutcome`]. Logout failures are logged internally and
/// never propagated.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Provider configuration or network setup failed at startup.
    #[error("initialization failed: {message}")]
    Initialization {
        /// What went wrong.
        message: String,
    },

    /// An inbound authorization redirect could not be exchanged for
    /// session state.
    #[error("redirect callback could not be completed")]
    RedirectCallback {
        /// The original exchange failure.
        #[source]
        source: ProviderError,
    },

    /// An operation requiring the client handle ran before a successful
    /// initialization. Correct call sequencing prevents this.
    #[error("auth client is not initialized")]
    NotInitialized,

    /// An authenticated call was attempted with no retrievable token.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The backend answered an authenticated call with a non-success
    /// status.
    #[error("{message}")]
    RemoteCall {
        /// HTTP status code.
        status: u16,
        /// Best-effort detail from the response body, or `HTTP {status}`.
        message: String,
    },

    /// The transport failed before a response was obtained, or the
    /// response body was unusable.
    #[error("transport error: {message}")]
    Transport {
        /// What went wrong.
        message: String,
    },

    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
