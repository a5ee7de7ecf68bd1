#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fruition_api::config::ServerConfig;
use fruition_api::router::build_app_router;
use fruition_api::state::AppState;
use fruition_client::backend::DealershipBackend;
use fruition_client::error::ClientError;
use fruition_client::upload::{ImageUploader, UploadError};
use fruition_client::wire::LoginResponse;
use fruition_core::admin::Credentials;
use fruition_core::car::{CarRecord, FuelType, GearType};
use fruition_core::category::CategoryRecord;
use fruition_core::draft::StagedFile;
use fruition_core::types::DbId;

pub const AUTH_COOKIE: &str = "authFruition=session-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend_url: "http://backend.invalid/api".to_string(),
        auth_cookie_name: "authFruition".to_string(),
        auth_cookie_max_age_secs: 604_800,
    }
}

pub fn car(id: DbId, title: &str, brand: &str, category: &str, price: f64) -> CarRecord {
    CarRecord {
        id: Some(id),
        title: title.to_string(),
        description: String::new(),
        price,
        image_url: format!("https://img.test/{id}.jpg"),
        gallery: Vec::new(),
        category: category.to_string(),
        brand_name: brand.to_string(),
        model: title.to_string(),
        year: 2019,
        fuel_type: FuelType::Petrol,
        color: "silver".to_string(),
        seat: 5,
        type_of_gear: GearType::Automatic,
    }
}

/// Thirteen cars: ids 1..=13, alternating `sedan`/`suv`, price `id * 1000`.
pub fn showroom() -> Vec<CarRecord> {
    (1..=13)
        .map(|id| {
            let category = if id % 2 == 0 { "suv" } else { "sedan" };
            car(id, &format!("Car {id}"), "Brand", category, id as f64 * 1000.0)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeBackend {
    pub cars: Mutex<Vec<CarRecord>>,
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub calls: Mutex<Vec<String>>,
    pub token: Mutex<Option<String>>,
    pub reject_login: AtomicBool,
    pub unavailable: AtomicBool,
    next_id: AtomicI64,
}

impl FakeBackend {
    pub fn new(cars: Vec<CarRecord>, categories: &[&str]) -> Self {
        let backend = Self::default();
        backend
            .next_id
            .store(cars.iter().filter_map(|c| c.id).max().unwrap_or(0), Ordering::SeqCst);
        *backend.cars.lock().unwrap() = cars;
        *backend.categories.lock().unwrap() = categories
            .iter()
            .map(|name| CategoryRecord::new(name).unwrap())
            .collect();
        *backend.token.lock().unwrap() = Some("backend-token".into());
        backend
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call.into());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                body: "maintenance".into(),
            });
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            body: "car not found".into(),
        }
    }
}

#[async_trait]
impl DealershipBackend for FakeBackend {
    async fn list_cars(&self) -> Result<Vec<CarRecord>, ClientError> {
        self.record("list_cars")?;
        Ok(self.cars.lock().unwrap().clone())
    }

    async fn get_car(&self, id: DbId) -> Result<CarRecord, ClientError> {
        self.record(format!("get_car:{id}"))?;
        self.cars
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_car(&self, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        self.record("create_car")?;
        let mut stored = car.clone();
        stored.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.cars.lock().unwrap().push(stored.clone());
        Ok(Some(stored))
    }

    async fn update_car(&self, id: DbId, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        self.record(format!("update_car:{id}"))?;
        let mut cars = self.cars.lock().unwrap();
        let slot = cars
            .iter_mut()
            .find(|c| c.id == Some(id))
            .ok_or_else(Self::not_found)?;
        *slot = CarRecord {
            id: Some(id),
            ..car.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn delete_car(&self, id: DbId) -> Result<(), ClientError> {
        self.record(format!("delete_car:{id}"))?;
        let mut cars = self.cars.lock().unwrap();
        let before = cars.len();
        cars.retain(|c| c.id != Some(id));
        if cars.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ClientError> {
        self.record("list_categories")?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_category(&self, category: &CategoryRecord) -> Result<(), ClientError> {
        self.record("create_category")?;
        self.categories.lock().unwrap().push(category.clone());
        Ok(())
    }

    async fn create_admin(&self, _credentials: &Credentials) -> Result<(), ClientError> {
        self.record("create_admin")
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        self.record("login")?;
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 401,
                body: "invalid credentials".into(),
            });
        }
        Ok(LoginResponse {
            token: self.token.lock().unwrap().clone(),
            message: None,
        })
    }
}

#[derive(Default)]
pub struct FakeUploader {
    pub uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(&self, file: &StagedFile) -> Result<String, UploadError> {
        self.uploads.lock().unwrap().push(file.file_name.clone());
        Ok(format!("https://cdn.test/{}", file.file_name))
    }
}

// ---------------------------------------------------------------------------
// App + request helpers
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<FakeBackend>,
    pub uploader: Arc<FakeUploader>,
}

/// Build the full application router over the given fakes, using the same
/// middleware stack as production.
pub fn build_test_app(backend: FakeBackend) -> TestApp {
    let backend = Arc::new(backend);
    let uploader = Arc::new(FakeUploader::default());
    let config = test_config();
    let state = AppState::new(config.clone(), backend.clone(), uploader.clone());
    TestApp {
        router: build_app_router(state, &config),
        backend,
        uploader,
    }
}

pub fn default_app() -> TestApp {
    build_test_app(FakeBackend::new(showroom(), &["sedan", "suv"]))
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_authed(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, AUTH_COOKIE)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

pub const BOUNDARY: &str = "fruition-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Body {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                field,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: image/jpeg\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

pub async fn post_multipart(app: &TestApp, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, AUTH_COOKIE)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(parts))
        .unwrap();
    send(app, request).await
}
