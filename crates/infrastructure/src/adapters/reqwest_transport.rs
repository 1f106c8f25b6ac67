//! HTTP transport implementation using reqwest.

use std::time::Duration;

use reqwest::{Client, Method};

use sesame_application::ports::{BoxFuture, HttpTransport, TransportError};
use sesame_domain::{HttpMethod, HttpResponse, OutboundRequest};

/// Default per-request timeout.
const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// HTTP transport backed by `reqwest::Client`.
///
/// The client carries an ambient cookie store, so requests flagged
/// `include_credentials` are satisfied implicitly.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default settings.
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("sesame/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: REQUEST_TIMEOUT_MS,
            };
        }
        if error.is_connect() {
            return TransportError::Connection(error.to_string());
        }
        if error.is_builder() {
            return TransportError::InvalidUrl(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), request.url.clone());

            for header in &request.headers {
                builder = builder.header(&header.name, &header.value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| Self::map_error(&e))?;
            Ok(HttpResponse::new(status, body))
        })
    }
}
