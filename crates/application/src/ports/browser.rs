//! Navigator port: the browser-like URL and history surface.

use url::Url;

/// Port over the host's location and history.
///
/// In a real browser host `navigate` never returns control to the page;
/// embedded and test hosts record the intent instead.
pub trait Navigator: Send + Sync {
    /// The URL of the current page load.
    fn current_url(&self) -> Url;

    /// Replace the visible URL without triggering a navigation
    /// (history `replaceState` semantics).
    fn replace_url(&self, url: &Url);

    /// Terminal navigation away from the application.
    fn navigate(&self, url: &Url);
}
