#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fruition_client::backend::DealershipBackend;
use fruition_client::dealer::DealerClient;
use fruition_client::error::ClientError;
use fruition_client::upload::{ImageUploader, UploadError};
use fruition_client::wire::LoginResponse;
use fruition_core::admin::Credentials;
use fruition_core::car::{CarRecord, FuelType, GearType};
use fruition_core::category::CategoryRecord;
use fruition_core::draft::StagedFile;
use fruition_core::types::DbId;

/// Build a valid persisted car.
pub fn car(id: DbId, title: &str, brand: &str, price: f64) -> CarRecord {
    CarRecord {
        id: Some(id),
        title: title.to_string(),
        description: String::new(),
        price,
        image_url: format!("https://img.test/{id}.jpg"),
        gallery: Vec::new(),
        category: "sedan".to_string(),
        brand_name: brand.to_string(),
        model: title.to_string(),
        year: 2020,
        fuel_type: FuelType::Petrol,
        color: "red".to_string(),
        seat: 5,
        type_of_gear: GearType::Manual,
    }
}

pub fn staged(name: &str) -> StagedFile {
    StagedFile::new(name, Some("image/jpeg".to_string()), vec![0xFF, 0xD8, 0xFF])
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Records every call so tests can assert on request counts.
#[derive(Default)]
pub struct FakeBackend {
    pub cars: Mutex<Vec<CarRecord>>,
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_writes: AtomicBool,
    next_id: AtomicI64,
}

impl FakeBackend {
    pub fn with_cars(cars: Vec<CarRecord>) -> Self {
        let next = cars.iter().filter_map(|c| c.id).max().unwrap_or(0);
        let backend = Self::default();
        *backend.cars.lock().unwrap() = cars;
        backend.next_id.store(next, Ordering::SeqCst);
        backend
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check_write(&self) -> Result<(), ClientError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                body: "write failed".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DealershipBackend for FakeBackend {
    async fn list_cars(&self) -> Result<Vec<CarRecord>, ClientError> {
        self.record("list_cars");
        tokio::task::yield_now().await;
        Ok(self.cars.lock().unwrap().clone())
    }

    async fn get_car(&self, id: DbId) -> Result<CarRecord, ClientError> {
        self.record(format!("get_car:{id}"));
        self.cars
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or(ClientError::Api {
                status: 404,
                body: "not found".into(),
            })
    }

    async fn create_car(&self, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        self.record("create_car");
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut stored = car.clone();
        stored.id = Some(id);
        self.cars.lock().unwrap().push(stored.clone());
        Ok(Some(stored))
    }

    async fn update_car(&self, id: DbId, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        self.record(format!("update_car:{id}"));
        self.check_write()?;
        let mut cars = self.cars.lock().unwrap();
        let slot = cars.iter_mut().find(|c| c.id == Some(id)).ok_or(ClientError::Api {
            status: 404,
            body: "not found".into(),
        })?;
        *slot = CarRecord {
            id: Some(id),
            ..car.clone()
        };
        Ok(None)
    }

    async fn delete_car(&self, id: DbId) -> Result<(), ClientError> {
        self.record(format!("delete_car:{id}"));
        self.check_write()?;
        self.cars.lock().unwrap().retain(|c| c.id != Some(id));
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ClientError> {
        self.record("list_categories");
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_category(&self, category: &CategoryRecord) -> Result<(), ClientError> {
        self.record("create_category");
        self.check_write()?;
        self.categories.lock().unwrap().push(category.clone());
        Ok(())
    }

    async fn create_admin(&self, _credentials: &Credentials) -> Result<(), ClientError> {
        self.record("create_admin");
        self.check_write()
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        self.record("login");
        Ok(LoginResponse {
            token: Some("token-1".into()),
            message: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Uploader
// ---------------------------------------------------------------------------

/// Returns `https://img.test/uploads/<file name>`; fails for `fail_on`.
#[derive(Default)]
pub struct FakeUploader {
    pub uploads: Mutex<Vec<String>>,
    pub fail_on: Option<String>,
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(&self, file: &StagedFile) -> Result<String, UploadError> {
        if self.fail_on.as_deref() == Some(file.file_name.as_str()) {
            return Err(UploadError::Rejected {
                status: 400,
                body: "bad image".into(),
            });
        }
        self.uploads.lock().unwrap().push(file.file_name.clone());
        Ok(format!("https://img.test/uploads/{}", file.file_name))
    }
}

pub fn dealer(backend: &Arc<FakeBackend>) -> Arc<DealerClient> {
    Arc::new(DealerClient::new(backend.clone()))
}
