//! Client storage port.

/// Local/session-scoped storage owned by the host.
///
/// Logout clears it in full, not selectively.
pub trait ClientStorage: Send + Sync {
    /// Remove every stored entry.
    fn clear_all(&self);
}
