//! Backend wire format and its normalization into domain records.
//!
//! The backend is loosely typed: numbers sometimes arrive as strings and the
//! gallery is stored either as a JSON array or as a JSON-encoded string. All of
//! that is resolved here, once, right after a response is received; the rest
//! of the workspace only ever sees [`CarRecord`] and [`CategoryRecord`].

use serde::Deserialize;

use fruition_core::car::CarRecord;
use fruition_core::category::CategoryRecord;
use fruition_core::error::CoreError;

use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// `GET /cars` response body.
#[derive(Debug, Deserialize)]
pub struct CarsEnvelope {
    #[serde(default)]
    pub cars: Vec<serde_json::Value>,
}

/// `GET /car?id=` response body.
#[derive(Debug, Deserialize)]
pub struct CarEnvelope {
    pub car: serde_json::Value,
}

/// `GET /getCategory` response body.
#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub category: Vec<CategoryRecord>,
}

/// `POST /login` response body. The backend may omit the token entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Car payload
// ---------------------------------------------------------------------------

/// A JSON number, or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        let value: Option<f64> = match self {
            NumberOrText::Number(n) => n.as_f64(),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        };
        value.filter(|v| v.is_finite())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A car exactly as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct CarPayload {
    #[serde(default)]
    pub id: Option<NumberOrText>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: NumberOrText,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub gallery: serde_json::Value,
    pub category: String,
    pub brand_name: String,
    #[serde(default)]
    pub model: String,
    pub year: NumberOrText,
    pub fuel_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub seat: Option<NumberOrText>,
    #[serde(default)]
    pub type_of_gear: Option<String>,
}

/// Outcome of decoding one payload. A malformed gallery does not reject the
/// record; it is reported alongside so the caller can log it.
#[derive(Debug, Clone)]
pub struct DecodedCar {
    pub record: CarRecord,
    pub gallery_issue: Option<CoreError>,
}

impl CarPayload {
    pub fn into_decoded(self) -> Result<DecodedCar, CoreError> {
        let id = self
            .id
            .as_ref()
            .and_then(NumberOrText::as_i64)
            .ok_or_else(|| CoreError::Validation("persisted car has no identifier".into()))?;

        let price = self
            .price
            .as_f64()
            .ok_or_else(|| not_a_number("price", &self.price))?;

        let year = self
            .year
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| not_a_number("year", &self.year))?;

        let seat = self
            .seat
            .as_ref()
            .and_then(NumberOrText::as_i64)
            .and_then(|s| u32::try_from(s).ok())
            .ok_or_else(|| CoreError::Validation("Field 'seat' is missing or not a count".into()))?;

        let fuel_type = self.fuel_type.parse()?;
        let type_of_gear = self.type_of_gear.as_deref().unwrap_or_default().parse()?;

        let (gallery, gallery_issue) = match normalize_gallery(&self.gallery) {
            Ok(gallery) => (gallery, None),
            Err(issue) => (Vec::new(), Some(issue)),
        };

        let record = CarRecord {
            id: Some(id),
            title: self.title,
            description: self.description,
            price,
            image_url: self.image_url,
            gallery,
            category: self.category,
            brand_name: self.brand_name,
            model: self.model,
            year,
            fuel_type,
            color: self.color,
            seat,
            type_of_gear,
        };
        record.check()?;

        Ok(DecodedCar {
            record,
            gallery_issue,
        })
    }
}

fn not_a_number(field: &str, value: &NumberOrText) -> CoreError {
    CoreError::Validation(format!("Field '{field}' is not a number: {value:?}"))
}

/// Reduce the stored gallery to one ordered list of URLs.
///
/// Accepts `null`, a JSON array of strings, or a string containing such an
/// array (blank strings count as empty). Blank entries are dropped.
pub fn normalize_gallery(value: &serde_json::Value) -> Result<Vec<String>, CoreError> {
    use serde_json::Value;

    let urls: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    CoreError::Validation(format!("gallery entry is not a URL string: {item}"))
                })
            })
            .collect::<Result<_, _>>()?,
        Value::String(encoded) if encoded.trim().is_empty() => Vec::new(),
        Value::String(encoded) => serde_json::from_str(encoded).map_err(|e| {
            CoreError::Validation(format!("gallery string is not a JSON list of URLs: {e}"))
        })?,
        other => {
            return Err(CoreError::Validation(format!(
                "gallery must be a list of URLs, got {other}"
            )));
        }
    };

    Ok(urls.into_iter().filter(|url| !url.trim().is_empty()).collect())
}

// ---------------------------------------------------------------------------
// Boundary helpers
// ---------------------------------------------------------------------------

/// Decode a single car, logging (not failing on) a malformed gallery.
pub fn decode_car(value: serde_json::Value) -> Result<CarRecord, ClientError> {
    let payload: CarPayload =
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))?;
    let decoded = payload
        .into_decoded()
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    if let Some(issue) = decoded.gallery_issue {
        tracing::warn!(
            car_id = ?decoded.record.id,
            error = %issue,
            "Malformed gallery data, treating as empty"
        );
    }
    Ok(decoded.record)
}

/// Decode a car listing, skipping (and logging) records that violate the
/// contract so one bad row does not blank the whole catalog.
pub fn decode_car_list(envelope: CarsEnvelope) -> Vec<CarRecord> {
    envelope
        .cars
        .into_iter()
        .filter_map(|value| match decode_car(value) {
            Ok(car) => Some(car),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable car record");
                None
            }
        })
        .collect()
}

/// Normalize category names, skipping blank ones.
pub fn decode_categories(envelope: CategoriesEnvelope) -> Vec<CategoryRecord> {
    envelope
        .category
        .into_iter()
        .filter_map(|raw| match CategoryRecord::new(&raw.name) {
            Ok(category) => Some(category),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping invalid category");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
