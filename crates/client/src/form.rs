//! Admin car form: draft editing, image staging and submission.

use std::sync::Arc;

use futures::future::try_join_all;

use fruition_core::car::CarRecord;
use fruition_core::draft::{CarDraft, GalleryEditor, GalleryPreview, StagedFile};
use fruition_core::error::CoreError;
use fruition_core::types::DbId;

use crate::dealer::DealerClient;
use crate::error::ClientError;
use crate::upload::ImageUploader;

/// Slug used in form routes for a new car.
pub const NEW_CAR_SLUG: &str = "new";

/// Whether the form composes a new car or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(DbId),
}

impl FormMode {
    /// `new` selects create mode; anything else must be a car id.
    pub fn from_slug(slug: &str) -> Result<Self, CoreError> {
        if slug == NEW_CAR_SLUG {
            return Ok(FormMode::Create);
        }
        slug.parse::<DbId>()
            .map(FormMode::Update)
            .map_err(|_| CoreError::Validation(format!("'{slug}' is neither '{NEW_CAR_SLUG}' nor a car id")))
    }

    pub fn id(self) -> Option<DbId> {
        match self {
            FormMode::Create => None,
            FormMode::Update(id) => Some(id),
        }
    }
}

/// Drives one car form from first keystroke to a persisted record.
///
/// State only changes on explicit edits or after a write succeeds. A failed
/// upload or write leaves the draft, staged images and gallery exactly as
/// they were, so the user can retry.
pub struct FormController {
    dealer: Arc<DealerClient>,
    uploader: Arc<dyn ImageUploader>,
    mode: FormMode,
    draft: CarDraft,
    main_image: Option<StagedFile>,
    gallery: GalleryEditor,
}

impl FormController {
    /// Empty form for a new car.
    pub fn create(dealer: Arc<DealerClient>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            dealer,
            uploader,
            mode: FormMode::Create,
            draft: CarDraft::default(),
            main_image: None,
            gallery: GalleryEditor::default(),
        }
    }

    /// Form pre-filled from an existing record.
    pub fn edit(dealer: Arc<DealerClient>, uploader: Arc<dyn ImageUploader>, record: &CarRecord) -> Result<Self, CoreError> {
        let id = record.require_id()?;
        Ok(Self {
            dealer,
            uploader,
            mode: FormMode::Update(id),
            draft: CarDraft::from_record(record),
            main_image: None,
            gallery: GalleryEditor::from_urls(record.gallery.clone()),
        })
    }

    /// Build the form for `mode`, fetching the record in update mode.
    pub async fn load(
        dealer: Arc<DealerClient>,
        uploader: Arc<dyn ImageUploader>,
        mode: FormMode,
    ) -> Result<Self, ClientError> {
        match mode {
            FormMode::Create => Ok(Self::create(dealer, uploader)),
            FormMode::Update(id) => {
                let record = dealer.car(id).await?;
                Ok(Self::edit(dealer, uploader, &record)?)
            }
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &CarDraft {
        &self.draft
    }

    pub fn main_image(&self) -> Option<&StagedFile> {
        self.main_image.as_ref()
    }

    pub fn gallery(&self) -> &GalleryEditor {
        &self.gallery
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        self.draft.set_field(name, value)
    }

    /// Stage the main image; replaces any previously staged one.
    pub fn stage_main_image(&mut self, file: StagedFile) {
        self.main_image = Some(file);
    }

    pub fn stage_gallery_image(&mut self, file: StagedFile) {
        self.gallery.stage(file);
    }

    pub fn remove_gallery_item(&mut self, index: usize) -> Result<GalleryPreview, CoreError> {
        self.gallery.remove(index)
    }

    pub fn preview(&self) -> Vec<GalleryPreview> {
        self.gallery.preview()
    }

    /// Upload staged images, then create or update the car.
    ///
    /// Returns the record as stored: the backend echo when there is one,
    /// otherwise the record that was sent.
    pub async fn submit(&mut self) -> Result<CarRecord, ClientError> {
        // Fail on an incomplete draft before uploading anything.
        let mut draft = self.draft.clone();
        if let Some(file) = &self.main_image {
            draft.image_url = file.file_name.clone();
        }
        draft.to_record(self.mode.id(), self.gallery.resolve(Vec::new()))?;

        if let Some(file) = &self.main_image {
            draft.image_url = self.uploader.upload(file).await?;
        }

        let uploaded = try_join_all(
            self.gallery
                .pending()
                .iter()
                .map(|file| self.uploader.upload(file)),
        )
        .await?;

        let record = draft.to_record(self.mode.id(), self.gallery.resolve(uploaded))?;

        let saved = match self.mode {
            FormMode::Create => self.dealer.create_car(&record).await?,
            FormMode::Update(id) => self.dealer.update_car(id, &record).await?,
        }
        .unwrap_or_else(|| record.clone());

        self.main_image = None;
        match self.mode {
            FormMode::Create => {
                self.draft = CarDraft::default();
                self.gallery = GalleryEditor::default();
            }
            FormMode::Update(_) => {
                self.draft = CarDraft::from_record(&saved);
                self.gallery = GalleryEditor::from_urls(saved.gallery.clone());
            }
        }

        tracing::debug!(mode = ?self.mode, gallery = saved.gallery.len(), "Car form submitted");
        Ok(saved)
    }
}
