//! Forum authentication
//!
//! The catalog site gates downloads behind its forum login. Login is a
//! two-step flow: fetch the login form to pick up the hidden request token,
//! then POST the credentials with that token. Success is detected from the
//! returned markup, either a logout affordance or the logged-in marker
//! attribute the forum stamps on the document root.
//!
//! Login failures are loud (`ScrapeError::Auth`); the status probe is
//! silent and only ever reports a boolean.

use crate::session::{transport, SessionContext};
use crate::{Result, ScrapeError};
use scraper::{Html, Selector};

/// Hidden request-token field on the login form
const TOKEN_FIELD: &str = "_xfToken";

/// Error banners the forum renders for rejected logins, most specific first
const ERROR_BLOCK_SELECTORS: [&str; 2] = [".blockMessage--error", "div.error"];

/// Attribute the forum sets on `<html>` for authenticated sessions
const LOGGED_IN_MARKER: &str = r#"data-logged-in="true""#;

/// Logs the session in against the forum
///
/// 1. GET the login page and extract the hidden request token; a missing
///    token is fatal and not retried.
/// 2. POST the credential form to the login endpoint.
/// 3. Inspect the response markup: an error banner fails the login with the
///    banner's message; otherwise a logout link or the logged-in marker
///    means success.
///
/// The context is never left ambiguously authenticated: any error on any
/// step forces the logged-in flag to `false` before the error propagates.
pub async fn login(ctx: &SessionContext, username: &str, password: &str) -> Result<()> {
    match login_flow(ctx, username, password).await {
        Ok(()) => {
            ctx.set_logged_in(true).await;
            tracing::debug!("Login succeeded for {}", username);
            Ok(())
        }
        Err(e) => {
            ctx.set_logged_in(false).await;
            Err(e)
        }
    }
}

async fn login_flow(ctx: &SessionContext, username: &str, password: &str) -> Result<()> {
    let forum = ctx.config().forum_url.trim_end_matches('/').to_string();

    let login_page = format!("{}/login/", forum);
    let response = transport::request(ctx, &login_page).await?;
    let body = response.text().await?;

    let token = extract_login_token(&body)
        .ok_or_else(|| ScrapeError::Auth("login token not found".to_string()))?;

    let submit_url = format!("{}/login/login", forum);
    let redirect = format!("{}/", ctx.config().base_url.trim_end_matches('/'));
    let fields = [
        ("login", username),
        ("password", password),
        ("remember", "1"),
        (TOKEN_FIELD, token.as_str()),
        ("_xfRedirect", redirect.as_str()),
    ];

    let response = transport::post_form(ctx, &submit_url, &fields, Default::default()).await?;
    let body = response.text().await?;

    if let Some(message) = extract_error_message(&body) {
        return Err(ScrapeError::Auth(message));
    }

    if !has_logged_in_markers(&body) {
        return Err(ScrapeError::Auth("login rejected".to_string()));
    }

    Ok(())
}

/// Probes whether the session is currently authenticated
///
/// Fetches the site root and looks for the logged-in markers. Never fails:
/// any transport or decode error is logged and reported as "not logged in".
/// The session flag is re-stamped with whatever was observed.
pub async fn check_login_status(ctx: &SessionContext) -> bool {
    let root = format!("{}/", ctx.config().base_url.trim_end_matches('/'));

    let observed = match transport::request(ctx, &root).await {
        Ok(response) => match response.text().await {
            Ok(body) => has_logged_in_markers(&body),
            Err(e) => {
                tracing::warn!("Login status probe failed reading body: {}", e);
                false
            }
        },
        Err(e) => {
            tracing::warn!("Login status probe failed: {}", e);
            false
        }
    };

    ctx.set_logged_in(observed).await;
    observed
}

/// Logs the session out by discarding all session-identifying state
pub async fn logout(ctx: &SessionContext) -> Result<()> {
    ctx.reset().await
}

/// Extracts the hidden request token from the login form markup
fn extract_login_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!(r#"input[name="{}"]"#, TOKEN_FIELD)).ok()?;

    document
        .select(&selector)
        .find_map(|input| input.value().attr("value"))
        .map(|value| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Extracts the error banner text from a login response, if one is present
fn extract_error_message(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for css in ERROR_BLOCK_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(block) = document.select(&selector).next() {
            let text = block
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            return Some(if text.is_empty() {
                "login rejected".to_string()
            } else {
                text
            });
        }
    }

    None
}

/// Whether the markup shows an authenticated session
fn has_logged_in_markers(html: &str) -> bool {
    if html.contains(LOGGED_IN_MARKER) {
        return true;
    }

    let document = Html::parse_document(html);
    match Selector::parse(r#"a[href*="logout"]"#) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}
