//! Identity provider port.

use thiserror::Error;
use url::Url;

use sesame_domain::AccessToken;

use super::BoxFuture;

/// Errors from the identity provider adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the configuration.
    #[error("provider configuration rejected: {message}")]
    Configuration {
        /// What was rejected.
        message: String,
    },

    /// A network-level failure talking to the provider.
    #[error("provider network error: {message}")]
    Network {
        /// Underlying failure.
        message: String,
    },

    /// The provider refused a code or refresh exchange.
    #[error("authorization exchange failed: {message}")]
    Exchange {
        /// Provider-reported detail.
        message: String,
    },

    /// No session state exists to acquire a token from.
    #[error("no provider session")]
    NoSession,

    /// Session state exists but is expired and cannot be renewed silently.
    #[error("provider session expired")]
    SessionExpired,
}

/// The seam to the identity provider's client.
///
/// Implementations own the provider connection: endpoint construction,
/// the authorization-code exchange, silent token acquisition from cached
/// session state, and provider-side logout. The hard cryptographic and
/// session work stays on the provider's side of this trait.
pub trait IdentityProvider: Send + Sync {
    /// Validate configuration and prepare the connection.
    ///
    /// `redirect_uri` is the resolved callback URI (explicit configuration
    /// or the current origin). Loads any persisted session state.
    fn connect<'a>(&'a self, redirect_uri: &'a Url) -> BoxFuture<'a, Result<(), ProviderError>>;

    /// Exchange an inbound authorization code for session state.
    fn exchange_code<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<(), ProviderError>>;

    /// Build the hosted-login authorize URL for a passwordless identifier.
    ///
    /// # Errors
    /// Fails when the provider connection has not been prepared.
    fn authorize_url(&self, login_hint: &str) -> Result<Url, ProviderError>;

    /// Silently acquire an access token from existing session state.
    fn acquire_token(&self) -> BoxFuture<'_, Result<AccessToken, ProviderError>>;

    /// End the provider session and return the logout URL to navigate to.
    ///
    /// Clears cached session state regardless of whether a session existed.
    fn end_session<'a>(&'a self, return_to: &'a Url) -> BoxFuture<'a, Result<Url, ProviderError>>;
}
