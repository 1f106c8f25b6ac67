//! Outgoing request types.

use serde::{Deserialize, Serialize};
use url::Url;

/// HTTP methods supported for authenticated calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET request.
    #[default]
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// PATCH request.
    Patch,
    /// DELETE request.
    Delete,
}

impl HttpMethod {
    /// Canonical method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A single request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Create a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Caller-supplied options for an authenticated call.
///
/// Defaults to a simple authenticated read (GET, no body, no extra headers).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: HttpMethod,
    /// Raw request body, already serialized.
    pub body: Option<String>,
    /// Extra headers; system headers override these on conflict.
    pub headers: Vec<Header>,
}

impl RequestOptions {
    /// Options for the given method.
    #[must_use]
    pub fn with_method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }
}

/// An ephemeral, fully-computed request handed to the transport.
///
/// Created per call and discarded after response handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Final header set.
    pub headers: Vec<Header>,
    /// Raw body, if any.
    pub body: Option<String>,
    /// Whether ambient credentials (cookies) must accompany the request.
    pub include_credentials: bool,
}

impl OutboundRequest {
    /// Create a request with no headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            include_credentials: false,
        }
    }

    /// Set a header, replacing any existing header with the same name.
    ///
    /// Names are compared case-insensitively; last write wins.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|h| !h.name.eq_ignore_ascii_case(&name));
        self.headers.push(Header::new(name, value));
    }

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
