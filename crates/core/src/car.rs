//! Car listing record and its closed vocabularies (fuel, gearbox).

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

/// Earliest model year accepted for a listing.
pub const MIN_MODEL_YEAR: i32 = 1886;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Fuel type of a listed car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for FuelType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|fuel| fuel.as_str() == needle)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid fuel type '{s}'. Must be one of: petrol, diesel, electric, hybrid"
                ))
            })
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gearbox type of a listed car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearType {
    Manual,
    Automatic,
    Cvt,
    Hybrid,
}

impl GearType {
    pub const ALL: [GearType; 4] = [
        GearType::Manual,
        GearType::Automatic,
        GearType::Cvt,
        GearType::Hybrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GearType::Manual => "manual",
            GearType::Automatic => "automatic",
            GearType::Cvt => "cvt",
            GearType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for GearType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|gear| gear.as_str() == needle)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid gear type '{s}'. Must be one of: manual, automatic, cvt, hybrid"
                ))
            })
    }
}

impl fmt::Display for GearType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CarRecord
// ---------------------------------------------------------------------------

/// A car listing as held by the backend.
///
/// `id` is `None` only for a record that has not been created yet; every
/// record decoded from a backend response carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(length(min = 1, message = "a primary image is required"))]
    pub image_url: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "brand name is required"))]
    pub brand_name: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: FuelType,
    pub color: String,
    #[validate(range(min = 1, message = "seat count must be positive"))]
    pub seat: u32,
    pub type_of_gear: GearType,
}

impl CarRecord {
    /// Run field validation plus the checks the derive cannot express
    /// (finite price, plausible model year).
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if !self.price.is_finite() {
            return Err(CoreError::Validation("price must be a finite number".into()));
        }
        validate_model_year(self.year)
    }

    /// The identifier of a persisted record.
    pub fn require_id(&self) -> Result<DbId, CoreError> {
        self.id
            .ok_or_else(|| CoreError::Validation("car record has no identifier".into()))
    }
}

/// Latest model year accepted: next calendar year, for pre-announced models.
pub fn max_model_year() -> i32 {
    chrono::Utc::now().year() + 1
}

/// Validate that `year` lies within `MIN_MODEL_YEAR..=max_model_year()`.
pub fn validate_model_year(year: i32) -> Result<(), CoreError> {
    let max = max_model_year();
    if (MIN_MODEL_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "year {year} is outside the accepted range {MIN_MODEL_YEAR}..={max}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_car(id: DbId, title: &str, brand: &str, category: &str, price: f64) -> CarRecord {
        CarRecord {
            id: Some(id),
            title: title.to_string(),
            description: format!("{brand} {title}"),
            price,
            image_url: format!("https://img.example/{id}.jpg"),
            gallery: Vec::new(),
            category: category.to_string(),
            brand_name: brand.to_string(),
            model: title.to_string(),
            year: 2020,
            fuel_type: FuelType::Petrol,
            color: "black".to_string(),
            seat: 5,
            type_of_gear: GearType::Automatic,
        }
    }

    #[test]
    fn fuel_type_parses_case_insensitively() {
        assert_eq!("Diesel".parse::<FuelType>().unwrap(), FuelType::Diesel);
        assert_eq!(" electric ".parse::<FuelType>().unwrap(), FuelType::Electric);
        assert!("kerosene".parse::<FuelType>().is_err());
    }

    #[test]
    fn gear_type_accepts_cvt() {
        assert_eq!("CVT".parse::<GearType>().unwrap(), GearType::Cvt);
        assert!("".parse::<GearType>().is_err());
    }

    #[test]
    fn vocabularies_serialize_lowercase() {
        assert_eq!(serde_json::to_value(FuelType::Hybrid).unwrap(), "hybrid");
        assert_eq!(serde_json::to_value(GearType::Manual).unwrap(), "manual");
    }

    #[test]
    fn valid_record_passes_check() {
        assert!(sample_car(1, "Civic", "Honda", "sedan", 10.0).check().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let car = sample_car(1, "Civic", "Honda", "sedan", -1.0);
        assert!(car.check().is_err());
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let car = sample_car(1, "Civic", "Honda", "sedan", f64::INFINITY);
        assert!(car.check().is_err());
    }

    #[test]
    fn zero_seats_is_rejected() {
        let mut car = sample_car(1, "Civic", "Honda", "sedan", 10.0);
        car.seat = 0;
        assert!(car.check().is_err());
    }

    #[test]
    fn empty_title_is_rejected() {
        let car = sample_car(1, "", "Honda", "sedan", 10.0);
        assert!(car.check().is_err());
    }

    #[test]
    fn model_year_bounds() {
        assert!(validate_model_year(MIN_MODEL_YEAR).is_ok());
        assert!(validate_model_year(max_model_year()).is_ok());
        assert!(validate_model_year(MIN_MODEL_YEAR - 1).is_err());
        assert!(validate_model_year(max_model_year() + 1).is_err());
    }

    #[test]
    fn require_id_reports_missing_identifier() {
        let mut car = sample_car(7, "Civic", "Honda", "sedan", 10.0);
        assert_eq!(car.require_id().unwrap(), 7);
        car.id = None;
        assert!(car.require_id().is_err());
    }

    #[test]
    fn id_is_omitted_from_json_when_absent() {
        let mut car = sample_car(7, "Civic", "Honda", "sedan", 10.0);
        car.id = None;
        let json = serde_json::to_value(&car).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["fuel_type"], "petrol");
        assert_eq!(json["type_of_gear"], "automatic");
    }
}
