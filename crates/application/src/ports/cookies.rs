//! Cookie source port.

/// Read-only access to cookies visible to the client.
///
/// The backend sets the anti-forgery cookie out-of-band; this port is how
/// the gateway reads it. Parsing of composite values belongs to the
/// domain types, not to implementations.
pub trait CookieSource: Send + Sync {
    /// Raw value of the named cookie, if present.
    fn get(&self, name: &str) -> Option<String>;
}
