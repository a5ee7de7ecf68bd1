//! Navigation guard for the admin area.
//!
//! Runs ahead of every request. Without the auth cookie, a page visit
//! (`GET`/`HEAD`) under a protected prefix redirects to the login page
//! carrying the original path as `callbackUrl`, and any other method on a
//! protected path is answered with 401. With the cookie, a visit to the login
//! page redirects to the dashboard; submitting the login form still reaches
//! the handler so a stale session can log in again. Everything else passes
//! through. The guard only checks that the cookie is present; the backend
//! remains the authority on credentials.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use fruition_core::error::CoreError;

use crate::error::AppError;
use crate::middleware::session::cookie_value;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Query parameter carrying the path to return to after login.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Path prefixes that require the auth cookie.
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/admin/dashboard",
    "/admin/add-car",
    "/admin/create-admin",
    "/admin/create-category",
    "/admin/cars",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Not logged in, visiting a protected page.
    RedirectToLogin { callback: String },
    /// Not logged in, calling a protected endpoint with a non-visit method.
    Unauthorized,
    /// Already logged in on the login page.
    RedirectToDashboard,
}

impl GuardDecision {
    /// Redirect target, or `None` for [`GuardDecision::Allow`].
    pub fn location(&self) -> Option<String> {
        match self {
            GuardDecision::Allow | GuardDecision::Unauthorized => None,
            GuardDecision::RedirectToLogin { callback } => Some(login_location(callback)),
            GuardDecision::RedirectToDashboard => Some(DASHBOARD_PATH.to_string()),
        }
    }
}

/// `/admin/login?callbackUrl=<path>` with the path form-encoded.
pub fn login_location(callback: &str) -> String {
    match reqwest::Url::parse(&format!("http://localhost{LOGIN_PATH}")) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(CALLBACK_PARAM, callback);
            format!("{}?{}", url.path(), url.query().unwrap_or_default())
        }
        Err(_) => LOGIN_PATH.to_string(),
    }
}

/// Accept `callback` as a post-login target only if it is a path on this
/// site; otherwise fall back to the dashboard.
pub fn safe_callback(callback: Option<&str>) -> String {
    match callback.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !is_login_path(path) =>
        {
            path.to_string()
        }
        _ => DASHBOARD_PATH.to_string(),
    }
}

/// Browser navigation, as opposed to a form submission or API call.
fn is_visit(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn is_login_path(path: &str) -> bool {
    under_prefix(path, LOGIN_PATH)
}

/// `path` equals `prefix` or continues it with a `/` segment.
fn under_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub struct RouteGuard {
    cookie_name: String,
}

impl RouteGuard {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn is_protected(&self, path: &str) -> bool {
        PROTECTED_PREFIXES
            .iter()
            .any(|prefix| under_prefix(path, prefix))
    }

    pub fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        cookie_value(headers, &self.cookie_name).is_some()
    }

    pub fn decide(&self, method: &Method, path: &str, authenticated: bool) -> GuardDecision {
        if !authenticated && self.is_protected(path) {
            if is_visit(method) {
                GuardDecision::RedirectToLogin {
                    callback: path.to_string(),
                }
            } else {
                GuardDecision::Unauthorized
            }
        } else if authenticated && is_visit(method) && is_login_path(path) {
            GuardDecision::RedirectToDashboard
        } else {
            GuardDecision::Allow
        }
    }
}

/// Axum middleware applying [`RouteGuard`] to every request.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let authenticated = state.guard.is_authenticated(request.headers());
    let decision = state
        .guard
        .decide(request.method(), path, authenticated);

    if decision == GuardDecision::Unauthorized {
        tracing::debug!(path, method = %request.method(), "Route guard rejected anonymous call");
        return AppError::Core(CoreError::Unauthorized("Login required".into())).into_response();
    }

    match decision.location() {
        None => next.run(request).await,
        Some(location) => {
            tracing::debug!(path, authenticated, %location, "Route guard redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> RouteGuard {
        RouteGuard::new("authFruition")
    }

    #[test]
    fn protected_prefixes_match_on_segment_boundaries() {
        let guard = guard();
        assert!(guard.is_protected("/admin/dashboard"));
        assert!(guard.is_protected("/admin/add-car/new"));
        assert!(guard.is_protected("/admin/cars/4"));
        assert!(!guard.is_protected("/admin/dashboards"));
        assert!(!guard.is_protected("/admin/login"));
        assert!(!guard.is_protected("/cars"));
    }

    #[test]
    fn anonymous_protected_visit_goes_to_login() {
        assert_eq!(
            guard().decide(&Method::GET, "/admin/add-car/7", false),
            GuardDecision::RedirectToLogin {
                callback: "/admin/add-car/7".into()
            }
        );
    }

    #[test]
    fn anonymous_protected_call_is_unauthorized() {
        let guard = guard();
        assert_eq!(
            guard.decide(&Method::DELETE, "/admin/cars/4", false),
            GuardDecision::Unauthorized
        );
        assert_eq!(
            guard.decide(&Method::POST, "/admin/add-car/new", false),
            GuardDecision::Unauthorized
        );
        assert_eq!(GuardDecision::Unauthorized.location(), None);
    }

    #[test]
    fn logged_in_login_page_goes_to_dashboard() {
        let guard = guard();
        assert_eq!(
            guard.decide(&Method::GET, "/admin/login", true),
            GuardDecision::RedirectToDashboard
        );
        assert_eq!(guard.decide(&Method::GET, "/admin/login", false), GuardDecision::Allow);
        assert_eq!(guard.decide(&Method::GET, "/admin/dashboard", true), GuardDecision::Allow);
        assert_eq!(guard.decide(&Method::GET, "/cars", false), GuardDecision::Allow);
    }

    #[test]
    fn login_submission_with_cookie_passes_through() {
        assert_eq!(
            guard().decide(&Method::POST, "/admin/login", true),
            GuardDecision::Allow
        );
    }

    #[test]
    fn login_location_encodes_callback() {
        assert_eq!(
            login_location("/admin/add-car/new"),
            "/admin/login?callbackUrl=%2Fadmin%2Fadd-car%2Fnew"
        );
    }

    #[test]
    fn callbacks_are_limited_to_local_paths() {
        assert_eq!(safe_callback(Some("/admin/add-car/3")), "/admin/add-car/3");
        assert_eq!(safe_callback(Some("https://evil.test/")), DASHBOARD_PATH);
        assert_eq!(safe_callback(Some("//evil.test")), DASHBOARD_PATH);
        assert_eq!(safe_callback(Some("/admin/login")), DASHBOARD_PATH);
        assert_eq!(safe_callback(None), DASHBOARD_PATH);
    }
}
