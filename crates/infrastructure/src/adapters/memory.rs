//! In-memory host-surface adapters.
//!
//! A native embedding has no browser location bar, cookie store, or local
//! storage. These adapters model those surfaces in memory so the auth
//! session can run headless; hosts with real surfaces implement the ports
//! directly instead.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

use sesame_application::ports::{ClientStorage, CookieSource, Navigator};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A navigation or history operation observed by the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The visible URL was replaced without a page load.
    Replaced(Url),
    /// A terminal navigation was requested.
    Navigated(Url),
}

/// Navigator tracking a current URL and the operations applied to it.
#[derive(Debug)]
pub struct InMemoryNavigator {
    current: Mutex<Url>,
    events: Mutex<Vec<NavigationEvent>>,
}

impl InMemoryNavigator {
    /// Create a navigator positioned at the given URL.
    #[must_use]
    pub fn new(current: Url) -> Self {
        Self {
            current: Mutex::new(current),
            events: Mutex::new(Vec::new()),
        }
    }

    /// All recorded operations, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<NavigationEvent> {
        lock(&self.events).clone()
    }

    /// The most recent terminal navigation, if any.
    #[must_use]
    pub fn last_navigation(&self) -> Option<Url> {
        lock(&self.events).iter().rev().find_map(|event| match event {
            NavigationEvent::Navigated(url) => Some(url.clone()),
            NavigationEvent::Replaced(_) => None,
        })
    }
}

impl Navigator for InMemoryNavigator {
    fn current_url(&self) -> Url {
        lock(&self.current).clone()
    }

    fn replace_url(&self, url: &Url) {
        *lock(&self.current) = url.clone();
        lock(&self.events).push(NavigationEvent::Replaced(url.clone()));
    }

    fn navigate(&self, url: &Url) {
        *lock(&self.current) = url.clone();
        lock(&self.events).push(NavigationEvent::Navigated(url.clone()));
    }
}

/// Cookie source backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryCookieSource {
    cookies: Mutex<HashMap<String, String>>,
}

impl InMemoryCookieSource {
    /// Create an empty cookie source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cookie value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        lock(&self.cookies).insert(name.into(), value.into());
    }

    /// Remove a cookie.
    pub fn remove(&self, name: &str) {
        lock(&self.cookies).remove(name);
    }
}

impl CookieSource for InMemoryCookieSource {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.cookies).get(name).cloned()
    }
}

/// Local/session-scoped storage backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        lock(&self.entries).insert(key.into(), value.into());
    }

    /// Read an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the storage holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl ClientStorage for InMemoryStorage {
    fn clear_all(&self) {
        lock(&self.entries).clear();
    }
}
