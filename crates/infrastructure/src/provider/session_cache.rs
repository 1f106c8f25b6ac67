//! Single-session token cache with an optional disk location.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use sesame_domain::{AccessToken, CacheLocation};

/// Provider session state surviving between token probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProviderSession {
    /// The current access token.
    pub token: AccessToken,
    /// Refresh token for silent renewal, when the provider issued one.
    pub refresh_token: Option<String>,
}

/// Holds at most one provider session, in memory or mirrored to disk.
#[derive(Debug)]
pub(crate) struct SessionCache {
    location: CacheLocation,
    state: RwLock<Option<ProviderSession>>,
}

impl SessionCache {
    pub(crate) const fn new(location: CacheLocation) -> Self {
        Self {
            location,
            state: RwLock::new(None),
        }
    }

    /// Load persisted state, if the location has any. Corrupt or missing
    /// files are treated as no session.
    pub(crate) async fn load(&self) {
        let CacheLocation::Disk(path) = &self.location else {
            return;
        };
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => match serde_json::from_str::<ProviderSession>(&raw) {
                Ok(session) => {
                    *self.write() = Some(session);
                }
                Err(e) => {
                    tracing::debug!(error = %e, path = %path.display(), "ignoring corrupt session cache");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "session cache not readable");
            }
        }
    }

    pub(crate) fn get(&self) -> Option<ProviderSession> {
        self.read().clone()
    }

    pub(crate) async fn store(&self, session: ProviderSession) {
        *self.write() = Some(session.clone());
        if let CacheLocation::Disk(path) = &self.location {
            match serde_json::to_string(&session) {
                Ok(raw) => {
                    if let Err(e) = tokio::fs::write(path, raw).await {
                        tracing::warn!(error = %e, path = %path.display(), "failed to persist session cache");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize session cache"),
            }
        }
    }

    pub(crate) async fn clear(&self) {
        *self.write() = None;
        if let CacheLocation::Disk(path) = &self.location {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(error = %e, path = %path.display(), "failed to remove session cache");
                }
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<ProviderSession>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<ProviderSession>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
