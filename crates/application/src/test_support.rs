//! Mock port implementations shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use url::Url;

use sesame_domain::{AccessToken, HttpResponse, OutboundRequest};

use crate::ports::{
    BoxFuture, ClientStorage, CookieSource, HttpTransport, IdentityProvider, Navigator,
    ProviderError, TransportError,
};

/// Scripted identity provider.
#[derive(Default)]
pub(crate) struct MockProvider {
    token: Mutex<Option<String>>,
    fail_exchange: bool,
    fail_acquisition: bool,
    exchanged: Arc<Mutex<Vec<String>>>,
    redirect_uri: Mutex<Option<Url>>,
}

impl MockProvider {
    /// Start with an existing session holding this token.
    pub(crate) fn with_token(self, token: &str) -> Self {
        *self.token.lock().unwrap() = Some(token.to_string());
        self
    }

    pub(crate) fn failing_exchange(mut self) -> Self {
        self.fail_exchange = true;
        self
    }

    pub(crate) fn failing_acquisition(mut self) -> Self {
        self.fail_acquisition = true;
        self
    }

    /// Shared record of exchanged authorization codes.
    pub(crate) fn exchanged_codes(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.exchanged)
    }
}

impl IdentityProvider for MockProvider {
    fn connect<'a>(&'a self, redirect_uri: &'a Url) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            *self.redirect_uri.lock().unwrap() = Some(redirect_uri.clone());
            Ok(())
        })
    }

    fn exchange_code<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            if self.fail_exchange {
                return Err(ProviderError::Exchange {
                    message: "scripted exchange failure".to_string(),
                });
            }
            self.exchanged.lock().unwrap().push(code.to_string());
            *self.token.lock().unwrap() = Some(format!("token-for-{code}"));
            Ok(())
        })
    }

    fn authorize_url(&self, login_hint: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse("https://tenant.example.auth/authorize").unwrap();
        url.query_pairs_mut()
            .append_pair("connection", "email")
            .append_pair("login_hint", login_hint)
            .append_pair("screen_hint", "signup");
        Ok(url)
    }

    fn acquire_token(&self) -> BoxFuture<'_, Result<AccessToken, ProviderError>> {
        Box::pin(async move {
            if self.fail_acquisition {
                return Err(ProviderError::Network {
                    message: "scripted acquisition failure".to_string(),
                });
            }
            self.token
                .lock()
                .unwrap()
                .as_ref()
                .map(|secret| AccessToken::new(secret.clone(), Some(3600)))
                .ok_or(ProviderError::NoSession)
        })
    }

    fn end_session<'a>(&'a self, return_to: &'a Url) -> BoxFuture<'a, Result<Url, ProviderError>> {
        Box::pin(async move {
            self.token.lock().unwrap().take();
            let mut url = Url::parse("https://tenant.example.auth/v2/logout").unwrap();
            url.query_pairs_mut()
                .append_pair("returnTo", return_to.as_str());
            Ok(url)
        })
    }
}

/// What the scripted transport does with a request.
enum ScriptedResponse {
    Respond { status: u16, body: String },
    Fail,
}

/// Transport that records every request and answers from a script.
pub(crate) struct CountingTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    response: Mutex<ScriptedResponse>,
}

impl Default for CountingTransport {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            response: Mutex::new(ScriptedResponse::Respond {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}

impl CountingTransport {
    /// A transport where every send fails at the connection level.
    pub(crate) fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            response: Mutex::new(ScriptedResponse::Fail),
        }
    }

    /// Script the next responses.
    pub(crate) fn respond_with(&self, status: u16, body: &str) {
        *self.response.lock().unwrap() = ScriptedResponse::Respond {
            status,
            body: body.to_string(),
        };
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for CountingTransport {
    fn send<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            match &*self.response.lock().unwrap() {
                ScriptedResponse::Respond { status, body } => {
                    Ok(HttpResponse::new(*status, body.clone()))
                }
                ScriptedResponse::Fail => Err(TransportError::Connection(
                    "scripted connection failure".to_string(),
                )),
            }
        })
    }
}

/// What a navigator was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordedNavigation {
    Replaced(Url),
    Navigated(Url),
}

/// Navigator that tracks the current URL and records history operations.
pub(crate) struct RecordingNavigator {
    current: Mutex<Url>,
    history: Mutex<Vec<RecordedNavigation>>,
}

impl RecordingNavigator {
    pub(crate) fn new(current: &str) -> Self {
        Self {
            current: Mutex::new(Url::parse(current).unwrap()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn history(&self) -> Vec<RecordedNavigation> {
        self.history.lock().unwrap().clone()
    }

    pub(crate) fn last_navigation(&self) -> Option<Url> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|record| match record {
                RecordedNavigation::Navigated(url) => Some(url.clone()),
                RecordedNavigation::Replaced(_) => None,
            })
    }
}

impl Navigator for RecordingNavigator {
    fn current_url(&self) -> Url {
        self.current.lock().unwrap().clone()
    }

    fn replace_url(&self, url: &Url) {
        *self.current.lock().unwrap() = url.clone();
        self.history
            .lock()
            .unwrap()
            .push(RecordedNavigation::Replaced(url.clone()));
    }

    fn navigate(&self, url: &Url) {
        *self.current.lock().unwrap() = url.clone();
        self.history
            .lock()
            .unwrap()
            .push(RecordedNavigation::Navigated(url.clone()));
    }
}

/// Storage that only remembers whether it was cleared.
#[derive(Default)]
pub(crate) struct RecordingStorage {
    cleared: AtomicBool,
}

impl RecordingStorage {
    pub(crate) fn was_cleared(&self) -> bool {
        self.cleared.load(Ordering::SeqCst)
    }
}

impl ClientStorage for RecordingStorage {
    fn clear_all(&self) {
        self.cleared.store(true, Ordering::SeqCst);
    }
}

/// Cookie source backed by a map.
#[derive(Default)]
pub(crate) struct MapCookies {
    cookies: Mutex<HashMap<String, String>>,
}

impl MapCookies {
    pub(crate) fn set(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }
}

impl CookieSource for MapCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.lock().unwrap().get(name).cloned()
    }
}
