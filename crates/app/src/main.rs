//! Sesame - Passwordless Auth Demo Client
//!
//! Wires the identity provider client, the HTTP transport, and in-memory
//! host surfaces together, then sequences the auth flow from the command
//! line: initialize, probe the token, and either start a magic-link login
//! or run authenticated calls against the backend.

use std::io::{BufRead, Write as _};
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use sesame_application::{ApiGateway, AuthSession};
use sesame_domain::{AntiForgeryToken, GatewayConfig, ProviderConfig};
use sesame_infrastructure::{
    InMemoryCookieSource, InMemoryNavigator, InMemoryStorage, OidcProviderClient, ReqwestTransport,
};

/// Fallback page URL when none is supplied.
const DEFAULT_ORIGIN: &str = "http://localhost:3000/";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let provider_config = provider_config_from_env()?;
    let gateway_config = GatewayConfig::new(require_env("SESAME_BACKEND_URL")?);

    // The "current page load". After the provider redirects back, the host
    // passes the callback URL (with its code parameter) through here.
    let current_url = if let Ok(raw) = std::env::var("SESAME_CURRENT_URL") {
        Url::parse(&raw)?
    } else if let Some(uri) = provider_config.redirect_uri.clone() {
        uri
    } else {
        Url::parse(DEFAULT_ORIGIN)?
    };

    let navigator = Arc::new(InMemoryNavigator::new(current_url));
    let cookies = Arc::new(InMemoryCookieSource::new());
    if let Ok(value) = std::env::var("SESAME_CSRF_COOKIE") {
        cookies.set(AntiForgeryToken::COOKIE_NAME, value);
    }
    let storage = Arc::new(InMemoryStorage::new());
    let transport = Arc::new(ReqwestTransport::new()?);
    let provider = Arc::new(OidcProviderClient::new(provider_config.clone())?);

    let session = Arc::new(AuthSession::new(
        provider_config,
        gateway_config.clone(),
        provider,
        Arc::clone(&navigator) as _,
        storage,
        Arc::clone(&transport) as _,
    ));
    session.initialize().await?;

    let gateway = ApiGateway::new(
        gateway_config,
        Arc::clone(&session),
        transport,
        cookies,
    );

    if session.get_token().await.is_authenticated() {
        authenticated_loop(&session, &gateway, &navigator).await?;
    } else {
        start_login(&session, &navigator)?;
    }
    Ok(())
}

/// Anonymous path: read an identifier and start the magic-link flow.
fn start_login(
    session: &AuthSession,
    navigator: &InMemoryNavigator,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Not signed in.");
    let stdin = std::io::stdin();

    loop {
        print!("Email address: ");
        std::io::stdout().flush()?;
        let mut email = String::new();
        if stdin.lock().read_line(&mut email)? == 0 {
            return Ok(());
        }
        let email = email.trim();
        if !email.contains('@') {
            println!("Please enter a valid email.");
            continue;
        }

        session.login_with_identifier(email)?;
        if let Some(url) = navigator.last_navigation() {
            println!("Open this link in your browser to continue signing in:\n  {url}");
            println!(
                "Then re-run with SESAME_CURRENT_URL set to the callback URL you land on."
            );
        }
        return Ok(());
    }
}

/// Authenticated path: run protected calls until told to stop.
async fn authenticated_loop(
    session: &AuthSession,
    gateway: &ApiGateway,
    navigator: &InMemoryNavigator,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Signed in. Commands: call | logout | quit");
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        match line.trim() {
            "call" => match gateway.call("/protected").await {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => println!("Access denied: {e}"),
            },
            "logout" => {
                session.logout().await;
                if let Some(url) = navigator.last_navigation() {
                    println!("Logged out; returned to {url}");
                }
                return Ok(());
            }
            "quit" => return Ok(()),
            other => println!("Unknown command '{other}'. Commands: call | logout | quit"),
        }
    }
}

fn provider_config_from_env() -> Result<ProviderConfig, Box<dyn std::error::Error>> {
    let mut config = ProviderConfig::new(
        require_env("SESAME_PROVIDER_DOMAIN")?,
        require_env("SESAME_CLIENT_ID")?,
    );
    if let Ok(redirect) = std::env::var("SESAME_REDIRECT_URI") {
        config = config.with_redirect_uri(Url::parse(&redirect)?);
    }
    if let Ok(audience) = std::env::var("SESAME_AUDIENCE") {
        config = config.with_audience(audience);
    }
    Ok(config)
}

fn require_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{name} must be set").into())
}
