//! REST API client for the dealership backend.
//!
//! Wraps the backend's HTTP endpoints (car CRUD, categories, admins, login)
//! using [`reqwest`]. Every response is decoded and validated here so callers
//! only deal in domain records.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use fruition_core::admin::Credentials;
use fruition_core::car::CarRecord;
use fruition_core::category::CategoryRecord;
use fruition_core::types::DbId;

use crate::backend::DealershipBackend;
use crate::error::ClientError;
use crate::wire::{
    decode_car, decode_car_list, decode_categories, CarEnvelope, CarsEnvelope,
    CategoriesEnvelope, LoginResponse,
};

/// HTTP client for the dealership backend.
pub struct DealershipApi {
    client: reqwest::Client,
    base_url: String,
}

impl DealershipApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Backend root, e.g. `http://host:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClientError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Read an optional `{ "car": ... }` echo from a write response.
    ///
    /// The write already succeeded, so an absent or undecodable echo is not
    /// an error.
    async fn parse_car_echo(response: reqwest::Response) -> Result<Option<CarRecord>, ClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let car = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|mut body| body.get_mut("car").map(serde_json::Value::take))
            .filter(serde_json::Value::is_object);

        match car.map(decode_car) {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Ignoring undecodable car echo from backend");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DealershipBackend for DealershipApi {
    /// `GET /cars`
    async fn list_cars(&self) -> Result<Vec<CarRecord>, ClientError> {
        let response = self.client.get(self.url("/cars")).send().await?;
        let envelope: CarsEnvelope = Self::parse_response(response).await?;
        let cars = decode_car_list(envelope);
        tracing::debug!(count = cars.len(), "Fetched car listing");
        Ok(cars)
    }

    /// `GET /car?id={id}`
    async fn get_car(&self, id: DbId) -> Result<CarRecord, ClientError> {
        let response = self
            .client
            .get(self.url("/car"))
            .query(&[("id", id)])
            .send()
            .await?;
        let envelope: CarEnvelope = Self::parse_response(response).await?;
        decode_car(envelope.car)
    }

    /// `POST /createCar`
    async fn create_car(&self, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        let response = self
            .client
            .post(self.url("/createCar"))
            .json(car)
            .send()
            .await?;
        Self::parse_car_echo(response).await
    }

    /// `PUT /updateCar?id={id}`
    async fn update_car(&self, id: DbId, car: &CarRecord) -> Result<Option<CarRecord>, ClientError> {
        let response = self
            .client
            .put(self.url("/updateCar"))
            .query(&[("id", id)])
            .json(car)
            .send()
            .await?;
        Self::parse_car_echo(response).await
    }

    /// `DELETE /deleteCar?id={id}`
    async fn delete_car(&self, id: DbId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url("/deleteCar"))
            .query(&[("id", id)])
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// `GET /getCategory`
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ClientError> {
        let response = self.client.get(self.url("/getCategory")).send().await?;
        let envelope: CategoriesEnvelope = Self::parse_response(response).await?;
        Ok(decode_categories(envelope))
    }

    /// `POST /createCategory`
    async fn create_category(&self, category: &CategoryRecord) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/createCategory"))
            .json(category)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// `POST /createAdmin`
    async fn create_admin(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/createAdmin"))
            .json(credentials)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// `POST /login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        // A body without a token (or no body at all) still means success.
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }
}
