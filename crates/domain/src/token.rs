//! Access token type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque bearer credential with provider-managed expiry.
///
/// The token is retrieved on demand from the identity provider; absence of
/// a retrievable token means "not authenticated", never an error.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
    obtained_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a new token obtained now, with an optional lifetime in seconds.
    #[must_use]
    pub fn new(secret: impl Into<String>, expires_in_secs: Option<u64>) -> Self {
        let now = Utc::now();
        let expires_at =
            expires_in_secs.map(|secs| now + chrono::Duration::seconds(secs.cast_signed()));
        Self {
            secret: secret.into(),
            expires_at,
            obtained_at: now,
        }
    }

    /// The raw token value.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// When the token was obtained.
    #[must_use]
    pub const fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Check if the token is expired or will expire within the given buffer.
    #[must_use]
    pub fn is_expired_or_expiring(&self, buffer_seconds: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            Utc::now() + chrono::Duration::seconds(buffer_seconds) >= expires_at
        })
    }

    /// Time until expiry in seconds, or None if the provider reported none.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|exp| (exp - Utc::now()).num_seconds())
    }

    /// Returns the Authorization header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.secret)
    }

    /// A short preview of the token safe for logs (first 8 chars).
    #[must_use]
    pub fn preview(&self) -> String {
        if self.secret.len() > 12 {
            format!("{}...", &self.secret[..8])
        } else {
            self.secret.clone()
        }
    }
}

// Never print the full secret in debug output.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &self.preview())
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn authorization_header_uses_bearer_scheme() {
        let token = AccessToken::new("abc123", Some(3600));
        assert_eq!(token.authorization_header(), "Bearer abc123");
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = AccessToken::new("abc123", None);
        assert!(!token.is_expired_or_expiring(0));
        assert!(token.seconds_until_expiry().is_none());
    }

    #[test]
    fn token_with_short_lifetime_is_expiring_within_buffer() {
        let token = AccessToken::new("abc123", Some(10));
        assert!(!token.is_expired_or_expiring(0));
        assert!(token.is_expired_or_expiring(60));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let token = AccessToken::new("super-secret-token-value", Some(3600));
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret-token-value"));
        assert!(rendered.contains("super-se..."));
    }
}
