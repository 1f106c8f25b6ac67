//! Authenticated request gateway.

use std::sync::Arc;

use serde::Deserialize;

use sesame_domain::{
    AntiForgeryToken, GatewayConfig, HttpResponse, OutboundRequest, RequestOptions,
};

use crate::auth::{AuthSession, TokenOutcome};
use crate::error::{AuthError, AuthResult};
use crate::ports::{CookieSource, HttpTransport};

/// Shape of the backend's error bodies, as far as the gateway cares.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Performs single authenticated HTTP calls against the backend.
///
/// Attaches the bearer token and, when present, the anti-forgery token
/// from the backend's cookie, and normalizes failures into a uniform
/// error shape.
pub struct ApiGateway {
    session: Arc<AuthSession>,
    transport: Arc<dyn HttpTransport>,
    cookies: Arc<dyn CookieSource>,
    config: GatewayConfig,
}

impl ApiGateway {
    /// Create a gateway over the given session and transport.
    #[must_use]
    pub fn new(
        config: GatewayConfig,
        session: Arc<AuthSession>,
        transport: Arc<dyn HttpTransport>,
        cookies: Arc<dyn CookieSource>,
    ) -> Self {
        Self {
            session,
            transport,
            cookies,
            config,
        }
    }

    /// A simple authenticated read of the endpoint.
    ///
    /// # Errors
    /// See [`Self::call_with`].
    pub async fn call(&self, endpoint: &str) -> AuthResult<serde_json::Value> {
        self.call_with(endpoint, RequestOptions::default()).await
    }

    /// Perform an authenticated call with explicit options.
    ///
    /// The token is probed first; with none available the call fails with
    /// [`AuthError::NotAuthenticated`] and no network request is made.
    /// Header construction order: caller-supplied headers, then
    /// Authorization and Content-Type unconditionally (last write wins),
    /// then the anti-forgery header when the cookie is present.
    ///
    /// # Errors
    /// - [`AuthError::NotAuthenticated`] when no token is retrievable.
    /// - [`AuthError::RemoteCall`] on a non-success status, carrying the
    ///   body's `detail` message when parsable, else `HTTP {status}`.
    /// - [`AuthError::Transport`] when the transport fails or a success
    ///   body is not valid JSON.
    pub async fn call_with(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> AuthResult<serde_json::Value> {
        let TokenOutcome::Available(token) = self.session.get_token().await else {
            return Err(AuthError::NotAuthenticated);
        };

        let mut request = OutboundRequest::new(options.method, self.config.endpoint_url(endpoint)?);
        for header in options.headers {
            request.set_header(header.name, header.value);
        }
        request.set_header("Authorization", token.authorization_header());
        request.set_header("Content-Type", "application/json");
        if let Some(csrf) = self
            .cookies
            .get(AntiForgeryToken::COOKIE_NAME)
            .as_deref()
            .and_then(AntiForgeryToken::from_cookie_value)
        {
            request.set_header(AntiForgeryToken::HEADER_NAME, csrf.as_str());
        }
        request.body = options.body;
        tracing::debug!(method = request.method.as_str(), url = %request.url, "calling backend");

        let response =
            self.transport
                .send(&request)
                .await
                .map_err(|e| AuthError::Transport {
                    message: e.to_string(),
                })?;

        if !response.is_success() {
            return Err(AuthError::RemoteCall {
                status: response.status(),
                message: error_detail(&response),
            });
        }

        response.json().map_err(|e| AuthError::Transport {
            message: format!("failed to parse response body: {e}"),
        })
    }
}

/// Best-effort human-readable detail for a non-success response.
fn error_detail(response: &HttpResponse) -> String {
    response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.detail)
        .unwrap_or_else(|| format!("HTTP {}", response.status()))
}
