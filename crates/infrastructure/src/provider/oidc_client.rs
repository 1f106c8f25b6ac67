//! HTTP-based OAuth2/OIDC identity provider client.
//!
//! Implements the `IdentityProvider` port against a hosted provider:
//! authorize-URL construction for the passwordless email connection,
//! authorization-code and refresh-token grants at the token endpoint,
//! and provider-side logout.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use url::Url;

use sesame_application::ports::{BoxFuture, IdentityProvider, ProviderError};
use sesame_domain::{AccessToken, ProviderConfig};

use super::session_cache::{ProviderSession, SessionCache};

/// Content-Type for form-urlencoded data.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Scopes requested for the passwordless session.
const DEFAULT_SCOPE: &str = "openid profile email";

/// Tokens expiring within this buffer are renewed before use.
const REFRESH_BUFFER_SECONDS: i64 = 30;

/// Length of the random `state` parameter.
const STATE_LENGTH: usize = 32;

/// Token response from the provider's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Error response from the provider's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Identity provider client speaking the hosted OAuth2 endpoints.
pub struct OidcProviderClient {
    config: ProviderConfig,
    http: reqwest::Client,
    cache: SessionCache,
    redirect_uri: RwLock<Option<Url>>,
}

impl OidcProviderClient {
    /// Create a client for the given provider configuration.
    ///
    /// The configured timeout bounds every provider handshake.
    ///
    /// # Errors
    /// Returns `ProviderError::Configuration` when the HTTP client cannot
    /// be constructed.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProviderError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        let cache = SessionCache::new(config.cache_location.clone());

        Ok(Self {
            config,
            http,
            cache,
            redirect_uri: RwLock::new(None),
        })
    }

    fn issuer_url(&self) -> Result<Url, ProviderError> {
        self.config
            .issuer_url()
            .map_err(|e| ProviderError::Configuration {
                message: e.to_string(),
            })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.issuer_url()?
            .join(path)
            .map_err(|e| ProviderError::Configuration {
                message: format!("invalid provider endpoint '{path}': {e}"),
            })
    }

    fn resolved_redirect_uri(&self) -> Result<Url, ProviderError> {
        self.redirect_uri
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| ProviderError::Configuration {
                message: "provider connection has not been prepared".to_string(),
            })
    }

    /// POST a form to the token endpoint and parse the token response.
    async fn token_request(
        &self,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, ProviderError> {
        let token_url = self.endpoint("oauth/token")?;
        let body =
            serde_urlencoded::to_string(params).map_err(|e| ProviderError::Network {
                message: format!("failed to encode form: {e}"),
            })?;

        let response = self
            .http
            .post(token_url)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Exchange {
                message: exchange_failure_message(&error_text),
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ProviderError::Network {
                message: format!("failed to parse token response: {e}"),
            })
    }

    /// Renew the session via the refresh-token grant.
    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let params = refresh_token_grant(&self.config.client_id, refresh_token);
        let response = self.token_request(&params).await?;

        Ok(ProviderSession {
            token: AccessToken::new(response.access_token, response.expires_in),
            // Providers may rotate the refresh token; keep the old one
            // when none is returned.
            refresh_token: response
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
        })
    }
}

impl IdentityProvider for OidcProviderClient {
    fn connect<'a>(&'a self, redirect_uri: &'a Url) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.config
                .validate()
                .map_err(|e| ProviderError::Configuration {
                    message: e.to_string(),
                })?;
            *self
                .redirect_uri
                .write()
                .unwrap_or_else(PoisonError::into_inner) = Some(redirect_uri.clone());
            self.cache.load().await;
            Ok(())
        })
    }

    fn exchange_code<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            let redirect_uri = self.resolved_redirect_uri()?;
            let params =
                authorization_code_grant(&self.config.client_id, code, redirect_uri.as_str());
            let response = self.token_request(&params).await?;

            self.cache
                .store(ProviderSession {
                    token: AccessToken::new(response.access_token, response.expires_in),
                    refresh_token: response.refresh_token,
                })
                .await;
            tracing::debug!("authorization code exchanged");
            Ok(())
        })
    }

    fn authorize_url(&self, login_hint: &str) -> Result<Url, ProviderError> {
        let redirect_uri = self.resolved_redirect_uri()?;
        let mut url = self.endpoint("authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", redirect_uri.as_str())
                .append_pair("scope", DEFAULT_SCOPE)
                .append_pair("connection", "email")
                .append_pair("login_hint", login_hint)
                .append_pair("screen_hint", "signup")
                .append_pair("state", &random_state());
            if let Some(audience) = &self.config.audience {
                query.append_pair("audience", audience);
            }
        }
        Ok(url)
    }

    fn acquire_token(&self) -> BoxFuture<'_, Result<AccessToken, ProviderError>> {
        Box::pin(async move {
            let session = self.cache.get().ok_or(ProviderError::NoSession)?;

            if !session.token.is_expired_or_expiring(REFRESH_BUFFER_SECONDS) {
                return Ok(session.token);
            }

            let Some(refresh_token) = session.refresh_token else {
                return Err(ProviderError::SessionExpired);
            };
            let renewed = self.refresh_session(&refresh_token).await?;
            self.cache.store(renewed.clone()).await;
            Ok(renewed.token)
        })
    }

    fn end_session<'a>(&'a self, return_to: &'a Url) -> BoxFuture<'a, Result<Url, ProviderError>> {
        Box::pin(async move {
            self.cache.clear().await;
            let mut url = self.endpoint("v2/logout")?;
            url.query_pairs_mut()
                .append_pair("client_id", &self.config.client_id)
                .append_pair("returnTo", return_to.as_str());
            Ok(url)
        })
    }
}

/// Form parameters for the authorization-code grant.
fn authorization_code_grant<'a>(
    client_id: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
) -> [(&'static str, &'a str); 4] {
    [
        ("grant_type", "authorization_code"),
        ("client_id", client_id),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ]
}

/// Form parameters for the refresh-token grant.
fn refresh_token_grant<'a>(
    client_id: &'a str,
    refresh_token: &'a str,
) -> [(&'static str, &'a str); 3] {
    [
        ("grant_type", "refresh_token"),
        ("client_id", client_id),
        ("refresh_token", refresh_token),
    ]
}

/// Best-effort message for a rejected token request.
fn exchange_failure_message(body: &str) -> String {
    serde_json::from_str::<TokenErrorResponse>(body).map_or_else(
        |_| format!("token request failed: {body}"),
        |error| error.error_description.unwrap_or(error.error),
    )
}

fn random_state() -> String {
    let mut rng = rand::rng();
    (0..STATE_LENGTH)
        .map(|_| char::from(rng.sample(rand::distr::Alphanumeric)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sesame_domain::CacheLocation;

    fn config() -> ProviderConfig {
        ProviderConfig::new("tenant.example.auth", "client-1")
            .with_audience("https://api.example.com")
    }

    async fn connected_client() -> OidcProviderClient {
        let client = OidcProviderClient::new(config()).unwrap();
        let redirect = Url::parse("https://app.example.com/").unwrap();
        client.connect(&redirect).await.unwrap();
        client
    }

    #[tokio::test]
    async fn authorize_url_carries_passwordless_parameters() {
        let client = connected_client().await;

        let url = client.authorize_url("user@example.com").unwrap();
        assert_eq!(url.host_str(), Some("tenant.example.auth"));
        assert_eq!(url.path(), "/authorize");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let get = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        assert_eq!(get("response_type").as_deref(), Some("code"));
        assert_eq!(get("client_id").as_deref(), Some("client-1"));
        assert_eq!(get("connection").as_deref(), Some("email"));
        assert_eq!(get("login_hint").as_deref(), Some("user@example.com"));
        assert_eq!(get("screen_hint").as_deref(), Some("signup"));
        assert_eq!(get("audience").as_deref(), Some("https://api.example.com"));
        assert_eq!(
            get("redirect_uri").as_deref(),
            Some("https://app.example.com/")
        );
        assert_eq!(get("state").map(|s| s.len()), Some(STATE_LENGTH));
    }

    #[tokio::test]
    async fn authorize_url_before_connect_is_rejected() {
        let client = OidcProviderClient::new(config()).unwrap();
        assert!(matches!(
            client.authorize_url("user@example.com"),
            Err(ProviderError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn acquire_without_session_is_no_session() {
        let client = connected_client().await;
        let err = client.acquire_token().await.unwrap_err();
        assert_eq!(err, ProviderError::NoSession);
    }

    #[tokio::test]
    async fn expired_session_without_refresh_token_cannot_renew() {
        let client = connected_client().await;
        client
            .cache
            .store(ProviderSession {
                token: AccessToken::new("stale", Some(0)),
                refresh_token: None,
            })
            .await;

        let err = client.acquire_token().await.unwrap_err();
        assert_eq!(err, ProviderError::SessionExpired);
    }

    #[tokio::test]
    async fn fresh_session_token_is_returned_without_network() {
        let client = connected_client().await;
        client
            .cache
            .store(ProviderSession {
                token: AccessToken::new("live-token", Some(3600)),
                refresh_token: None,
            })
            .await;

        let token = client.acquire_token().await.unwrap();
        assert_eq!(token.secret(), "live-token");
    }

    #[tokio::test]
    async fn end_session_clears_cache_and_builds_logout_url() {
        let client = connected_client().await;
        client
            .cache
            .store(ProviderSession {
                token: AccessToken::new("live-token", Some(3600)),
                refresh_token: None,
            })
            .await;

        let return_to = Url::parse("https://app.example.com/").unwrap();
        let url = client.end_session(&return_to).await.unwrap();

        assert_eq!(url.path(), "/v2/logout");
        assert!(url.as_str().contains("client_id=client-1"));
        assert!(
            url.as_str()
                .contains("returnTo=https%3A%2F%2Fapp.example.com%2F")
        );
        assert!(client.cache.get().is_none());
    }

    #[tokio::test]
    async fn connect_loads_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let first = OidcProviderClient::new(
            config().with_cache_location(CacheLocation::Disk(path.clone())),
        )
        .unwrap();
        first
            .cache
            .store(ProviderSession {
                token: AccessToken::new("persisted", Some(3600)),
                refresh_token: None,
            })
            .await;

        let second = OidcProviderClient::new(
            config().with_cache_location(CacheLocation::Disk(path)),
        )
        .unwrap();
        let redirect = Url::parse("https://app.example.com/").unwrap();
        second.connect(&redirect).await.unwrap();

        let token = second.acquire_token().await.unwrap();
        assert_eq!(token.secret(), "persisted");
    }

    #[test]
    fn code_exchange_form_carries_the_grant_fields() {
        let redirect = Url::parse("https://app.example.com/").unwrap();
        let params = authorization_code_grant("client-1", "auth-code-1", redirect.as_str());

        let body = serde_urlencoded::to_string(params).unwrap();
        assert_eq!(
            body,
            "grant_type=authorization_code&client_id=client-1&code=auth-code-1\
             &redirect_uri=https%3A%2F%2Fapp.example.com%2F"
        );
    }

    #[test]
    fn refresh_form_carries_the_grant_fields() {
        let params = refresh_token_grant("client-1", "refresh-1");

        let body = serde_urlencoded::to_string(params).unwrap();
        assert_eq!(
            body,
            "grant_type=refresh_token&client_id=client-1&refresh_token=refresh-1"
        );
    }

    #[test]
    fn exchange_failure_prefers_error_description() {
        let message = exchange_failure_message(
            r#"{"error": "invalid_grant", "error_description": "code expired"}"#,
        );
        assert_eq!(message, "code expired");

        let message = exchange_failure_message(r#"{"error": "invalid_grant"}"#);
        assert_eq!(message, "invalid_grant");

        let message = exchange_failure_message("<html>oops</html>");
        assert!(message.contains("token request failed"));
    }

    #[test]
    fn state_is_alphanumeric() {
        let state = random_state();
        assert_eq!(state.len(), STATE_LENGTH);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
