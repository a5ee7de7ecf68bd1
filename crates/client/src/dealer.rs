//! Cached access to the dealership backend.
//!
//! [`DealerClient`] is the only path through which the web layer reads or
//! writes dealership data. Reads go through the [`QueryCache`]; writes go
//! through [`QueryCache::mutate`] with the keys each write makes stale.

use std::sync::Arc;

use fruition_core::admin::Credentials;
use fruition_core::car::CarRecord;
use fruition_core::category::{ensure_unique, CategoryRecord};
use fruition_core::error::CoreError;
use fruition_core::types::DbId;

use crate::backend::DealershipBackend;
use crate::cache::{EntryStatus, QueryCache};
use crate::error::ClientError;
use crate::wire::LoginResponse;

/// Cached query identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Cars,
    Car(DbId),
    Categories,
    /// Invalidated when an administrator is created. Nothing reads admins
    /// yet, so the key never holds a slot and the invalidation is a no-op.
    Admins,
}

/// Values stored in the cache. `Arc` keeps cache hits cheap to hand out.
#[derive(Debug, Clone)]
pub enum QueryData {
    Cars(Arc<Vec<CarRecord>>),
    Car(Arc<CarRecord>),
    Categories(Arc<Vec<CategoryRecord>>),
}

pub struct DealerClient {
    backend: Arc<dyn DealershipBackend>,
    cache: QueryCache<QueryKey, QueryData, ClientError>,
}

impl DealerClient {
    pub fn new(backend: Arc<dyn DealershipBackend>) -> Self {
        Self {
            backend,
            cache: QueryCache::new(),
        }
    }

    pub async fn status(&self, key: &QueryKey) -> Option<EntryStatus> {
        self.cache.status(key).await
    }

    // -- queries --

    pub async fn cars(&self) -> Result<Arc<Vec<CarRecord>>, ClientError> {
        let backend = Arc::clone(&self.backend);
        let data = self
            .cache
            .fetch(QueryKey::Cars, move || async move {
                let cars = backend.list_cars().await?;
                Ok(QueryData::Cars(Arc::new(cars)))
            })
            .await?;
        match data {
            QueryData::Cars(cars) => Ok(cars),
            other => Err(mismatch(&QueryKey::Cars, &other)),
        }
    }

    pub async fn car(&self, id: DbId) -> Result<Arc<CarRecord>, ClientError> {
        let key = QueryKey::Car(id);
        let backend = Arc::clone(&self.backend);
        let data = self
            .cache
            .fetch(key.clone(), move || async move {
                let car = backend
                    .get_car(id)
                    .await
                    .map_err(|e| car_not_found(id, e))?;
                Ok(QueryData::Car(Arc::new(car)))
            })
            .await?;
        match data {
            QueryData::Car(car) => Ok(car),
            other => Err(mismatch(&key, &other)),
        }
    }

    pub async fn categories(&self) -> Result<Arc<Vec<CategoryRecord>>, ClientError> {
        let backend = Arc::clone(&self.backend);
        let data = self
            .cache
            .fetch(QueryKey::Categories, move || async move {
                let categories = backend.list_categories().await?;
                Ok(QueryData::Categories(Arc::new(categories)))
            })
            .await?;
        match data {
            QueryData::Categories(categories) => Ok(categories),
            other => Err(mismatch(&QueryKey::Categories, &other)),
        }
    }

    // -- mutations --

    pub async fn create_car(&self, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        car.check()?;
        let created = self
            .cache
            .mutate(self.backend.create_car(car), &[QueryKey::Cars])
            .await?;
        tracing::info!(title = %car.title, id = ?created.as_ref().and_then(|c| c.id), "Car created");
        Ok(created)
    }

    pub async fn update_car(&self, id: DbId, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        car.check()?;
        let updated = self
            .cache
            .mutate(
                self.backend.update_car(id, car),
                &[QueryKey::Cars, QueryKey::Car(id)],
            )
            .await
            .map_err(|e| car_not_found(id, e))?;
        tracing::info!(car_id = id, "Car updated");
        Ok(updated)
    }

    pub async fn delete_car(&self, id: DbId) -> Result<(), ClientError> {
        self.cache
            .mutate(
                self.backend.delete_car(id),
                &[QueryKey::Cars, QueryKey::Car(id)],
            )
            .await
            .map_err(|e| car_not_found(id, e))?;
        tracing::info!(car_id = id, "Car deleted");
        Ok(())
    }

    /// Create a category after checking the name against the cached list.
    pub async fn create_category(&self, name: &str) -> Result<CategoryRecord, ClientError> {
        let category = CategoryRecord::new(name)?;
        let existing = self.categories().await?;
        ensure_unique(&category, &existing)?;

        self.cache
            .mutate(
                self.backend.create_category(&category),
                &[QueryKey::Categories],
            )
            .await?;
        tracing::info!(name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn create_admin(&self, credentials: &Credentials) -> Result<(), ClientError> {
        credentials.check()?;
        self.cache
            .mutate(self.backend.create_admin(credentials), &[QueryKey::Admins])
            .await?;
        tracing::info!(email = %credentials.email, "Admin created");
        Ok(())
    }

    /// Verify credentials with the backend. Touches no cached data.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        credentials.check()?;
        self.backend.login(credentials).await
    }
}

/// A backend 404 for a car id becomes a domain `NotFound`.
fn car_not_found(id: DbId, err: ClientError) -> ClientError {
    match err.status() {
        Some(404) => CoreError::NotFound { entity: "Car", id }.into(),
        _ => err,
    }
}

fn mismatch(key: &QueryKey, data: &QueryData) -> ClientError {
    let kind = match data {
        QueryData::Cars(_) => "car list",
        QueryData::Car(_) => "car",
        QueryData::Categories(_) => "category list",
    };
    CoreError::Internal(format!("cache entry {key:?} holds a {kind}")).into()
}
