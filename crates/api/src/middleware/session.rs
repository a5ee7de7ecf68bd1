//! Auth cookie helpers.
//!
//! The cookie only marks a browser as logged in; its value is whatever token
//! the backend issued and is never interpreted here.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Value of cookie `name` from the request's `Cookie` headers.
///
/// Returns `None` when the cookie is absent or empty.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Whether `value` can be stored in a cookie without quoting.
pub fn is_cookie_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

/// `Set-Cookie` value establishing the admin session.
pub fn session_cookie(name: &str, token: &str, max_age_secs: u64) -> String {
    format!("{name}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value removing the admin session.
pub fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
