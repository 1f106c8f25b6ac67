//! Configuration for the provider connection and the API gateway.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Default budget for the pre-navigation handshake and silent token
/// acquisition, in milliseconds.
pub const DEFAULT_TOKEN_TIMEOUT_MS: u64 = 5000;

/// Where the provider adapter may cache session state between token probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheLocation {
    /// Session state lives only in process memory.
    #[default]
    Memory,
    /// Session state is persisted to a file at the given path.
    Disk(PathBuf),
}

/// Configuration for the identity provider connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider tenant domain, host only (e.g. `tenant.example.auth`).
    pub domain: String,
    /// OAuth2 client identifier.
    pub client_id: String,
    /// Redirect URI for the authorization callback. `None` means the
    /// current origin, resolved at initialization time.
    #[serde(default)]
    pub redirect_uri: Option<Url>,
    /// API audience to request tokens for.
    #[serde(default)]
    pub audience: Option<String>,
    /// Timeout budget for provider handshakes, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Session cache location.
    #[serde(default)]
    pub cache_location: CacheLocation,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TOKEN_TIMEOUT_MS
}

impl ProviderConfig {
    /// Create a configuration with defaults for everything optional.
    #[must_use]
    pub fn new(domain: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            redirect_uri: None,
            audience: None,
            timeout_ms: DEFAULT_TOKEN_TIMEOUT_MS,
            cache_location: CacheLocation::default(),
        }
    }

    /// Set the redirect URI explicitly.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
        self.redirect_uri = Some(redirect_uri);
        self
    }

    /// Set the API audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the handshake timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the session cache location.
    #[must_use]
    pub fn with_cache_location(mut self, cache_location: CacheLocation) -> Self {
        self.cache_location = cache_location;
        self
    }

    /// Validate required fields, failing fast rather than producing
    /// confusing downstream errors.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` when the provider domain
    /// or client id is missing or malformed.
    pub fn validate(&self) -> DomainResult<()> {
        if self.domain.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "provider domain is required".to_string(),
            ));
        }
        if self.domain.contains("://") {
            return Err(DomainError::InvalidConfiguration(format!(
                "provider domain must be a bare host, got '{}'",
                self.domain
            )));
        }
        if self.client_id.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "client id is required".to_string(),
            ));
        }
        self.issuer_url()?;
        Ok(())
    }

    /// Base URL of the provider tenant.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidUrl` when the domain does not form a
    /// valid HTTPS URL.
    pub fn issuer_url(&self) -> DomainResult<Url> {
        Url::parse(&format!("https://{}/", self.domain))
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: https://{}/", self.domain)))
    }
}

/// Configuration for the authenticated request gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backend base URL, prepended verbatim to endpoint paths.
    pub backend_base_url: String,
}

impl GatewayConfig {
    /// Create a gateway configuration.
    #[must_use]
    pub fn new(backend_base_url: impl Into<String>) -> Self {
        Self {
            backend_base_url: backend_base_url.into(),
        }
    }

    /// Validate the backend base URL, failing fast when absent.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` when the base URL is
    /// missing or does not parse.
    pub fn validate(&self) -> DomainResult<()> {
        if self.backend_base_url.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "backend base URL is required".to_string(),
            ));
        }
        Url::parse(&self.backend_base_url)
            .map_err(|e| DomainError::InvalidConfiguration(format!("backend base URL: {e}")))?;
        Ok(())
    }

    /// Build the full URL for an endpoint path.
    ///
    /// The endpoint is concatenated to the base URL verbatim, so relative
    /// paths are expected to start with `/`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidUrl` when the concatenation does not
    /// form a valid URL.
    pub fn endpoint_url(&self, endpoint: &str) -> DomainResult<Url> {
        let full = format!("{}{endpoint}", self.backend_base_url);
        Url::parse(&full).map_err(|e| DomainError::InvalidUrl(format!("{e}: {full}")))
    }
}
