//! The seam between the application and the dealership REST backend.

use async_trait::async_trait;

use fruition_core::admin::Credentials;
use fruition_core::car::CarRecord;
use fruition_core::category::CategoryRecord;
use fruition_core::types::DbId;

use crate::error::ClientError;
use crate::wire::LoginResponse;

/// Operations the dealership backend exposes.
///
/// Implemented over HTTP by [`DealershipApi`](crate::api::DealershipApi);
/// tests substitute in-memory fakes.
#[async_trait]
pub trait DealershipBackend: Send + Sync {
    async fn list_cars(&self) -> Result<Vec<CarRecord>, ClientError>;

    async fn get_car(&self, id: DbId) -> Result<CarRecord, ClientError>;

    /// Create a car. Returns the stored record when the backend echoes it.
    async fn create_car(&self, car: &CarRecord) -> Result<Option<CarRecord>, ClientError>;

    /// Replace a car in full. Returns the stored record when echoed.
    async fn update_car(&self, id: DbId, car: &CarRecord) -> Result<Option<CarRecord>, ClientError>;

    async fn delete_car(&self, id: DbId) -> Result<(), ClientError>;

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ClientError>;

    async fn create_category(&self, category: &CategoryRecord) -> Result<(), ClientError>;

    async fn create_admin(&self, credentials: &Credentials) -> Result<(), ClientError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError>;
}
