/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root URL of the dealership REST backend.
    pub backend_url: String,
    /// Name of the cookie marking an authenticated admin.
    pub auth_cookie_name: String,
    /// Lifetime of the auth cookie set on login (default: 7 days).
    pub auth_cookie_max_age_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                     |
    /// |----------------------------|-----------------------------|
    /// | `HOST`                     | `0.0.0.0`                   |
    /// | `PORT`                     | `3000`                      |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                        |
    /// | `BACKEND_URL`              | `http://localhost:8080/api` |
    /// | `AUTH_COOKIE_NAME`         | `authFruition`              |
    /// | `AUTH_COOKIE_MAX_AGE_SECS` | `604800`                    |
    ///
    /// Image hosting settings are not part of this struct; the uploader reads
    /// them on every upload.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8080/api".into());

        let auth_cookie_name =
            std::env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| "authFruition".into());
        assert!(
            !auth_cookie_name.is_empty() && !auth_cookie_name.contains(&[';', '=', ' '][..]),
            "AUTH_COOKIE_NAME must be a non-empty cookie token"
        );

        let auth_cookie_max_age_secs: u64 = std::env::var("AUTH_COOKIE_MAX_AGE_SECS")
            .unwrap_or_else(|_| "604800".into())
            .parse()
            .expect("AUTH_COOKIE_MAX_AGE_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend_url,
            auth_cookie_name,
            auth_cookie_max_age_secs,
        }
    }
}
