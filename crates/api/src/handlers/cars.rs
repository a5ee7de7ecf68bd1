//! Handlers for the admin car form (`/admin/add-car/{slug}`).
//!
//! `slug` is `new` for a new car or the id of the car being edited.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use fruition_client::form::{FormController, FormMode};
use fruition_core::car::{CarRecord, FuelType, GearType};
use fruition_core::category::CategoryRecord;
use fruition_core::draft::{CarDraft, GalleryPreview, StagedFile, DRAFT_FIELDS};
use fruition_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field holding the main image file.
pub const MAIN_IMAGE_FIELD: &str = "main_image";

/// Multipart field (repeatable) holding a gallery image file.
pub const GALLERY_FIELD: &str = "gallery";

/// Multipart field (repeatable) holding a gallery preview index to remove.
pub const REMOVE_GALLERY_FIELD: &str = "remove_gallery";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Everything needed to render the car form.
#[derive(Debug, Serialize)]
pub struct CarFormView {
    pub mode: &'static str,
    pub id: Option<DbId>,
    pub draft: CarDraft,
    pub gallery: Vec<GalleryPreview>,
    pub categories: Vec<CategoryRecord>,
    pub fuel_types: Vec<&'static str>,
    pub gear_types: Vec<&'static str>,
}

fn mode_name(mode: FormMode) -> &'static str {
    match mode {
        FormMode::Create => "create",
        FormMode::Update(_) => "update",
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /admin/add-car/{slug}
pub async fn form_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<CarFormView>>> {
    let mode = FormMode::from_slug(&slug)?;
    let (form, categories) = tokio::try_join!(
        FormController::load(state.dealer.clone(), state.uploader.clone(), mode),
        state.dealer.categories(),
    )?;

    Ok(Json(DataResponse {
        data: CarFormView {
            mode: mode_name(mode),
            id: mode.id(),
            draft: form.draft().clone(),
            gallery: form.preview(),
            categories: categories.to_vec(),
            fuel_types: FuelType::ALL.iter().map(|f| f.as_str()).collect(),
            gear_types: GearType::ALL.iter().map(|g| g.as_str()).collect(),
        },
    }))
}

/// POST /admin/add-car/{slug}
///
/// Multipart body: any of the draft field names as text parts, an optional
/// `main_image` file, repeatable `gallery` files and repeatable
/// `remove_gallery` indices into the stored gallery. Removals apply to the
/// stored gallery before new files are staged. Returns 201 with the created
/// car or 200 with the updated one.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CarRecord>>)> {
    let mode = FormMode::from_slug(&slug)?;
    let mut form = FormController::load(state.dealer.clone(), state.uploader.clone(), mode).await?;

    let mut removals: Vec<usize> = Vec::new();
    let mut main_image: Option<StagedFile> = None;
    let mut gallery: Vec<StagedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            MAIN_IMAGE_FIELD => main_image = read_file(field).await?,
            GALLERY_FIELD => gallery.extend(read_file(field).await?),
            REMOVE_GALLERY_FIELD => {
                let text = read_text(field).await?;
                let index = text.trim().parse::<usize>().map_err(|_| {
                    AppError::BadRequest(format!("'{text}' is not a gallery index"))
                })?;
                removals.push(index);
            }
            field_name if DRAFT_FIELDS.contains(&field_name) => {
                let value = read_text(field).await?;
                form.set_field(field_name, &value)?;
            }
            other => {
                return Err(AppError::BadRequest(format!("Unexpected form field '{other}'")));
            }
        }
    }

    // Highest index first so earlier removals do not shift later ones.
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        form.remove_gallery_item(index)?;
    }
    if let Some(file) = main_image {
        form.stage_main_image(file);
    }
    for file in gallery {
        form.stage_gallery_image(file);
    }

    let saved = form.submit().await?;
    let status = match mode {
        FormMode::Create => StatusCode::CREATED,
        FormMode::Update(_) => StatusCode::OK,
    };
    Ok((status, Json(DataResponse { data: saved })))
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

async fn read_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable form field: {e}")))
}

/// Read a file part. An empty part (no file chosen) yields `None`.
async fn read_file(field: Field<'_>) -> AppResult<Option<StagedFile>> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable file upload: {e}")))?;

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(StagedFile::new(file_name, content_type, bytes.to_vec())))
}
