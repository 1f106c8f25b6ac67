//! The auth session: initialize, login, token probe, logout.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use url::Url;

use sesame_domain::{AccessToken, GatewayConfig, HttpMethod, OutboundRequest, ProviderConfig};

use crate::error::{AuthError, AuthResult};
use crate::ports::{ClientStorage, HttpTransport, IdentityProvider, Navigator, ProviderError};

/// Query parameter whose presence on the current URL signals an inbound
/// authorization redirect.
const AUTHORIZATION_CODE_PARAM: &str = "code";

/// Outcome of a silent token probe.
///
/// Callers use the probe to decide authenticated vs. anonymous state, so
/// it never raises: failures are folded into the variants below.
#[derive(Debug, Clone)]
pub enum TokenOutcome {
    /// A token was retrieved.
    Available(AccessToken),
    /// No session exists (or the client is uninitialized).
    Absent,
    /// Acquisition failed; the cause was logged and discarded.
    Unavailable,
}

impl TokenOutcome {
    /// Whether a token was retrieved.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Extract the token, if any.
    #[must_use]
    pub fn into_token(self) -> Option<AccessToken> {
        match self {
            Self::Available(token) => Some(token),
            Self::Absent | Self::Unavailable => None,
        }
    }
}

/// Marker for operations that end in a page navigation.
///
/// In a browser-like host control never returns to the caller once the
/// navigation starts; no continuation logic after receiving this value is
/// meaningful. Embedded hosts observe the recorded intent on the
/// [`Navigator`] instead.
#[derive(Debug)]
#[non_exhaustive]
pub struct Navigation;

/// The initialized provider connection.
#[derive(Debug)]
struct ClientHandle {
    established_at: DateTime<Utc>,
    redirect_completed: bool,
}

/// Provider client wrapper.
///
/// Owns the one connection to the identity provider and sequences the
/// redirect-based login flow. Created once at startup and shared by
/// reference; the handle itself is guarded by a one-time-initialization
/// primitive, so a concurrent second `initialize` is a no-op rather than
/// a second connection.
pub struct AuthSession {
    provider: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    storage: Arc<dyn ClientStorage>,
    transport: Arc<dyn HttpTransport>,
    provider_config: ProviderConfig,
    gateway_config: GatewayConfig,
    handle: OnceLock<ClientHandle>,
}

impl AuthSession {
    /// Create an uninitialized session over the given ports.
    #[must_use]
    pub fn new(
        provider_config: ProviderConfig,
        gateway_config: GatewayConfig,
        provider: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
        storage: Arc<dyn ClientStorage>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            provider,
            navigator,
            storage,
            transport,
            provider_config,
            gateway_config,
            handle: OnceLock::new(),
        }
    }

    /// Initialize the provider connection.
    ///
    /// Validates configuration, prepares the provider, and, when the
    /// current URL carries an authorization code, completes the redirect
    /// exchange before returning and rewrites the visible URL to the
    /// application root without navigating. Re-invocation after success is
    /// a no-op.
    ///
    /// # Errors
    /// - [`AuthError::Initialization`] when configuration is rejected or
    ///   provider setup fails.
    /// - [`AuthError::RedirectCallback`] when an inbound redirect cannot
    ///   be exchanged; the original cause is logged and carried as source.
    pub async fn initialize(&self) -> AuthResult<()> {
        if self.handle.get().is_some() {
            return Ok(());
        }

        self.provider_config
            .validate()
            .map_err(|e| AuthError::Initialization {
                message: e.to_string(),
            })?;
        self.gateway_config
            .validate()
            .map_err(|e| AuthError::Initialization {
                message: e.to_string(),
            })?;

        let current = self.navigator.current_url();
        let redirect_uri = self
            .provider_config
            .redirect_uri
            .clone()
            .unwrap_or_else(|| application_root(&current));

        self.provider
            .connect(&redirect_uri)
            .await
            .map_err(|e| AuthError::Initialization {
                message: e.to_string(),
            })?;

        let mut redirect_completed = false;
        if let Some(code) = authorization_code(&current) {
            if let Err(source) = self.provider.exchange_code(&code).await {
                tracing::error!(error = %source, "failed to complete redirect callback");
                return Err(AuthError::RedirectCallback { source });
            }
            self.navigator.replace_url(&application_root(&current));
            redirect_completed = true;
        }

        let _ = self.handle.set(ClientHandle {
            established_at: Utc::now(),
            redirect_completed,
        });
        tracing::debug!(redirect_completed, "auth session initialized");
        Ok(())
    }

    /// Whether a successful `initialize` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Whether initialization completed an inbound redirect callback.
    #[must_use]
    pub fn redirect_completed(&self) -> bool {
        self.handle.get().is_some_and(|h| h.redirect_completed)
    }

    /// When the provider connection was established.
    #[must_use]
    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.handle.get().map(|h| h.established_at)
    }

    /// Initiate a redirect-based passwordless login for the identifier.
    ///
    /// Structural validity of the identifier (it contains `@`) is the
    /// caller's responsibility. On success the browser has been pointed at
    /// the provider's hosted flow and control does not return to the page.
    ///
    /// # Errors
    /// [`AuthError::NotInitialized`] before a successful `initialize`;
    /// [`AuthError::Initialization`] when the authorize URL cannot be
    /// built.
    pub fn login_with_identifier(&self, identifier: &str) -> AuthResult<Navigation> {
        if self.handle.get().is_none() {
            return Err(AuthError::NotInitialized);
        }

        let url = self
            .provider
            .authorize_url(identifier)
            .map_err(|e| AuthError::Initialization {
                message: e.to_string(),
            })?;
        tracing::info!("starting passwordless login");
        self.navigator.navigate(&url);
        Ok(Navigation)
    }

    /// Probe for a token via silent acquisition.
    ///
    /// Never errors: an uninitialized client or missing session yields
    /// [`TokenOutcome::Absent`]; any acquisition failure is logged and
    /// yields [`TokenOutcome::Unavailable`].
    pub async fn get_token(&self) -> TokenOutcome {
        if self.handle.get().is_none() {
            return TokenOutcome::Absent;
        }

        match self.provider.acquire_token().await {
            Ok(token) => TokenOutcome::Available(token),
            Err(ProviderError::NoSession) => TokenOutcome::Absent,
            Err(e) => {
                tracing::debug!(error = %e, "silent token acquisition failed");
                TokenOutcome::Unavailable
            }
        }
    }

    /// Log out.
    ///
    /// Three independent best-effort steps, all attempted even when
    /// earlier ones fail: end the provider session (navigating to its
    /// logout URL), notify the backend to invalidate any server-side
    /// session, and clear client storage. Finishes by navigating to the
    /// application root. Never fails from the caller's viewpoint;
    /// internal errors are logged. Before a successful `initialize`
    /// there is nothing to tear down and nothing happens.
    pub async fn logout(&self) -> Navigation {
        if self.handle.get().is_none() {
            return Navigation;
        }
        let root = application_root(&self.navigator.current_url());

        match self.provider.end_session(&root).await {
            Ok(url) => self.navigator.navigate(&url),
            Err(e) => tracing::warn!(error = %e, "provider logout failed"),
        }

        self.notify_backend_logout().await;

        self.storage.clear_all();
        self.navigator.navigate(&root);
        tracing::info!("logged out");
        Navigation
    }

    /// `POST {backend}/logout` with credentials included; response ignored.
    async fn notify_backend_logout(&self) {
        let url = match self.gateway_config.endpoint_url("/logout") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "cannot build backend logout URL");
                return;
            }
        };

        let mut request = OutboundRequest::new(HttpMethod::Post, url);
        request.include_credentials = true;
        if let Err(e) = self.transport.send(&request).await {
            tracing::warn!(error = %e, "backend session invalidation failed");
        }
    }
}

/// Extract the authorization code from a redirect-callback URL.
fn authorization_code(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == AUTHORIZATION_CODE_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// The application root on the same origin: path `/`, no query, no fragment.
fn application_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}
