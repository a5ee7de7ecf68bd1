use std::sync::Arc;

use fruition_client::backend::DealershipBackend;
use fruition_client::dealer::DealerClient;
use fruition_client::upload::ImageUploader;

use crate::config::ServerConfig;
use crate::middleware::route_guard::RouteGuard;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind `Arc`. The [`DealerClient`]
/// (and with it the query cache) is created once per process and shared by
/// every request.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached access to the dealership backend.
    pub dealer: Arc<DealerClient>,
    /// Image host used by car form submissions.
    pub uploader: Arc<dyn ImageUploader>,
    /// Auth-cookie route guard.
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        backend: Arc<dyn DealershipBackend>,
        uploader: Arc<dyn ImageUploader>,
    ) -> Self {
        let guard = RouteGuard::new(config.auth_cookie_name.clone());
        Self {
            config: Arc::new(config),
            dealer: Arc::new(DealerClient::new(backend)),
            uploader,
            guard: Arc::new(guard),
        }
    }
}
