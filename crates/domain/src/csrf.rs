//! Anti-forgery (CSRF) token handling.

use serde::{Deserialize, Serialize};

/// A short-lived anti-forgery token issued by the backend via cookie and
/// echoed back in a request header.
///
/// The cookie value is colon-delimited; only the first segment is the
/// usable token. The remainder of the value is opaque to this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    /// Name of the cookie the backend sets.
    pub const COOKIE_NAME: &'static str = "csrf_token";

    /// Name of the header the token is echoed in.
    pub const HEADER_NAME: &'static str = "X-CSRF-Token";

    /// Parse the token from a raw cookie value.
    ///
    /// Returns `None` when the leading segment is empty, which would
    /// otherwise produce a useless header.
    #[must_use]
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let token = value.split(':').next().unwrap_or_default();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// The token value to place in the header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
