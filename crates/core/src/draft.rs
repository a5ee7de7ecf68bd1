//! Draft state behind the admin car form.
//!
//! A [`CarDraft`] holds the editable scalar fields; a [`GalleryEditor`] holds
//! the gallery as two ordered lists: URLs already persisted on the record and
//! files staged locally but not uploaded yet. The preview shown to the user is
//! persisted URLs followed by staged files, and removal is addressed by an
//! index into that combined preview.

use std::fmt;

use serde::Serialize;

use crate::car::{CarRecord, FuelType, GearType};
use crate::error::CoreError;
use crate::types::DbId;

/// Form field names accepted by [`CarDraft::set_field`].
pub const DRAFT_FIELDS: &[&str] = &[
    "title",
    "description",
    "price",
    "image_url",
    "category",
    "brand_name",
    "model",
    "year",
    "fuel_type",
    "color",
    "seat",
    "type_of_gear",
];

// ---------------------------------------------------------------------------
// CarDraft
// ---------------------------------------------------------------------------

/// In-progress copy of a car being composed or edited. Never carries an id.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CarDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    pub brand_name: String,
    pub model: String,
    pub year: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub color: String,
    pub seat: Option<u32>,
    pub type_of_gear: Option<GearType>,
}

impl CarDraft {
    pub fn from_record(record: &CarRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            price: record.price,
            image_url: record.image_url.clone(),
            category: record.category.clone(),
            brand_name: record.brand_name.clone(),
            model: record.model.clone(),
            year: Some(record.year),
            fuel_type: Some(record.fuel_type),
            color: record.color.clone(),
            seat: Some(record.seat),
            type_of_gear: Some(record.type_of_gear),
        }
    }

    /// Merge one form field into the draft.
    ///
    /// `price`, `year` and `seat` are coerced from text; a blank value clears
    /// them (price falls back to `0`). On error the draft is left unchanged.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        let trimmed = value.trim();
        match name {
            "title" => self.title = value.to_string(),
            "description" => self.description = value.to_string(),
            "image_url" => self.image_url = trimmed.to_string(),
            "category" => self.category = trimmed.to_string(),
            "brand_name" => self.brand_name = value.to_string(),
            "model" => self.model = value.to_string(),
            "color" => self.color = value.to_string(),
            "price" => {
                self.price = if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().map_err(|_| invalid_number(name, value))?
                };
            }
            "year" => self.year = parse_optional(name, trimmed)?,
            "seat" => self.seat = parse_optional(name, trimmed)?,
            "fuel_type" => {
                self.fuel_type = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse()?)
                };
            }
            "type_of_gear" => {
                self.type_of_gear = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse()?)
                };
            }
            other => {
                return Err(CoreError::Validation(format!("Unknown car field '{other}'")));
            }
        }
        Ok(())
    }

    /// Resolve the draft into a full record ready for create or update.
    pub fn to_record(&self, id: Option<DbId>, gallery: Vec<String>) -> Result<CarRecord, CoreError> {
        let record = CarRecord {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            image_url: self.image_url.clone(),
            gallery,
            category: self.category.clone(),
            brand_name: self.brand_name.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year.ok_or_else(|| missing("year"))?,
            fuel_type: self.fuel_type.ok_or_else(|| missing("fuel_type"))?,
            color: self.color.trim().to_string(),
            seat: self.seat.ok_or_else(|| missing("seat"))?,
            type_of_gear: self.type_of_gear.ok_or_else(|| missing("type_of_gear"))?,
        };
        record.check()?;
        Ok(record)
    }
}

fn parse_optional<T: std::str::FromStr>(name: &str, trimmed: &str) -> Result<Option<T>, CoreError> {
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| invalid_number(name, trimmed))
}

fn invalid_number(name: &str, value: &str) -> CoreError {
    CoreError::Validation(format!("Field '{name}' expects a number, got '{value}'"))
}

fn missing(name: &str) -> CoreError {
    CoreError::Validation(format!("Field '{name}' is required"))
}

// ---------------------------------------------------------------------------
// Staged files
// ---------------------------------------------------------------------------

/// A locally selected image awaiting upload.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }
}

impl fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

/// One entry of the gallery preview list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GalleryPreview {
    /// URL already stored on the record.
    Persisted(String),
    /// File name of a staged, not yet uploaded image.
    Pending(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GalleryEditor {
    retained: Vec<String>,
    pending: Vec<StagedFile>,
}

impl GalleryEditor {
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            retained: urls,
            pending: Vec::new(),
        }
    }

    pub fn retained(&self) -> &[String] {
        &self.retained
    }

    pub fn pending(&self) -> &[StagedFile] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.retained.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stage(&mut self, file: StagedFile) {
        self.pending.push(file);
    }

    pub fn preview(&self) -> Vec<GalleryPreview> {
        self.retained
            .iter()
            .map(|url| GalleryPreview::Persisted(url.clone()))
            .chain(
                self.pending
                    .iter()
                    .map(|file| GalleryPreview::Pending(file.file_name.clone())),
            )
            .collect()
    }

    /// Remove the entry at `index` of [`preview`](Self::preview).
    ///
    /// Indices below the retained count drop a persisted URL; the rest drop a
    /// staged file. Every other entry keeps its identity and relative order.
    pub fn remove(&mut self, index: usize) -> Result<GalleryPreview, CoreError> {
        let retained = self.retained.len();
        if index < retained {
            return Ok(GalleryPreview::Persisted(self.retained.remove(index)));
        }
        if index - retained < self.pending.len() {
            let file = self.pending.remove(index - retained);
            return Ok(GalleryPreview::Pending(file.file_name));
        }
        Err(CoreError::Validation(format!(
            "Gallery index {index} is out of range (gallery has {} images)",
            self.len()
        )))
    }

    /// Final gallery: retained URLs followed by freshly uploaded ones.
    pub fn resolve(&self, uploaded: Vec<String>) -> Vec<String> {
        let mut gallery = self.retained.clone();
        gallery.extend(uploaded);
        gallery
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
