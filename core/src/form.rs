//! Place form state, field schema and validation.
//!
//! The form never decides between insert and update; it only turns field
//! input into a [`PlaceDraft`] or a [`FormError`].

use std::fmt;
use std::ops::RangeInclusive;

use crate::catalog::{CATEGORIES, FORM_RULES, RECOMMENDERS};
use crate::geo::LngLat;
use crate::place::{PlaceDraft, PlaceId};

pub const IMAGE_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Which fields exist, which are required, and what values they accept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSchema {
    pub categories: Vec<String>,
    pub recommenders: Vec<String>,
    pub require_recommender: bool,
    pub rating_min: u8,
    pub rating_max: u8,
    pub default_rating: u8,
}

impl FormSchema {
    pub fn from_catalog() -> Self {
        Self {
            categories: CATEGORIES.iter().map(|entry| entry.to_string()).collect(),
            recommenders: RECOMMENDERS
                .iter()
                .map(|entry| entry.name.to_string())
                .collect(),
            require_recommender: FORM_RULES.require_recommender,
            rating_min: FORM_RULES.rating_min,
            rating_max: FORM_RULES.rating_max,
            default_rating: FORM_RULES.default_rating,
        }
    }

    pub fn rating_options(&self) -> RangeInclusive<u8> {
        self.rating_min..=self.rating_max
    }

    fn default_category(&self) -> String {
        self.categories.first().cloned().unwrap_or_default()
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::from_catalog()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormVariant {
    /// Inline side panel next to the map.
    #[default]
    Sidebar,
    /// Modal overlay.
    Dialog,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormMode {
    Create { coords: LngLat },
    Edit { id: PlaceId },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }

    pub fn title(&self, variant: FormVariant) -> &'static str {
        match (self, variant) {
            (FormMode::Edit { .. }, _) => "Edit place",
            (FormMode::Create { .. }, FormVariant::Sidebar) => "Add highlighted place",
            (FormMode::Create { .. }, FormVariant::Dialog) => "Add a highlighted place",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Update place"
        } else {
            "Save place"
        }
    }

    pub fn coords(&self) -> Option<LngLat> {
        match self {
            FormMode::Create { coords } => Some(*coords),
            FormMode::Edit { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingName,
    MissingCategory,
    UnknownCategory(String),
    MissingRating,
    RatingOutOfRange { rating: u8, min: u8, max: u8 },
    MissingRecommender,
    UnknownRecommender(String),
    UnsupportedImage(String),
    EmptyImage,
    ImageTooLarge { size: u64, max: u64 },
    ImageRead(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingName => write!(f, "Name is required."),
            FormError::MissingCategory => write!(f, "Category is required."),
            FormError::UnknownCategory(value) => write!(f, "Unknown category '{value}'."),
            FormError::MissingRating => write!(f, "Rating is required."),
            FormError::RatingOutOfRange { rating, min, max } => {
                write!(f, "Rating must be between {min} and {max}, got {rating}.")
            }
            FormError::MissingRecommender => write!(f, "Recommender is required."),
            FormError::UnknownRecommender(value) => write!(f, "Unknown recommender '{value}'."),
            FormError::UnsupportedImage(mime) => write!(f, "Unsupported file type '{mime}'."),
            FormError::EmptyImage => write!(f, "Image file is empty."),
            FormError::ImageTooLarge { size, max } => {
                write!(f, "Image is {size} bytes, the limit is {max} bytes.")
            }
            FormError::ImageRead(message) => write!(f, "Could not read image: {message}."),
        }
    }
}

impl std::error::Error for FormError {}

pub fn check_image_file(mime: &str, size: u64) -> Result<(), FormError> {
    if !mime.starts_with("image/") {
        return Err(FormError::UnsupportedImage(mime.to_string()));
    }
    if size == 0 {
        return Err(FormError::EmptyImage);
    }
    if size > IMAGE_MAX_BYTES {
        return Err(FormError::ImageTooLarge {
            size,
            max: IMAGE_MAX_BYTES,
        });
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub enum FormEdit {
    Name(String),
    Category(String),
    Rating(Option<u8>),
    Review(String),
    RecommendedBy(String),
    ImageReadStarted,
    ImageLoaded(String),
    ImageFailed(FormError),
    ImageCleared,
    Rejected(FormError),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceFormState {
    pub name: String,
    pub category: String,
    pub rating: Option<u8>,
    pub review: String,
    pub recommended_by: String,
    /// Data URL shared by the preview and the submitted record.
    pub image: Option<String>,
    pub pending_reads: u32,
    pub error: Option<FormError>,
}

impl PlaceFormState {
    pub fn for_create(schema: &FormSchema) -> Self {
        Self {
            category: schema.default_category(),
            rating: Some(schema.default_rating),
            ..Self::default()
        }
    }

    pub fn for_edit(draft: &PlaceDraft) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category.clone(),
            rating: Some(draft.rating),
            review: draft.review.clone(),
            recommended_by: draft.recommended_by.clone().unwrap_or_default(),
            image: draft.image.clone(),
            pending_reads: 0,
            error: None,
        }
    }

    pub fn reading_image(&self) -> bool {
        self.pending_reads > 0
    }

    /// Reads complete in any order; whichever lands last owns the image.
    pub fn apply(&self, edit: FormEdit) -> Self {
        let mut next = self.clone();
        match edit {
            FormEdit::Name(value) => {
                next.name = value;
                next.error = None;
            }
            FormEdit::Category(value) => {
                next.category = value;
                next.error = None;
            }
            FormEdit::Rating(value) => {
                next.rating = value;
                next.error = None;
            }
            FormEdit::Review(value) => next.review = value,
            FormEdit::RecommendedBy(value) => {
                next.recommended_by = value;
                next.error = None;
            }
            FormEdit::ImageReadStarted => {
                next.pending_reads = next.pending_reads.saturating_add(1);
            }
            FormEdit::ImageLoaded(data_url) => {
                next.pending_reads = next.pending_reads.saturating_sub(1);
                next.image = Some(data_url);
            }
            FormEdit::ImageFailed(err) => {
                next.pending_reads = next.pending_reads.saturating_sub(1);
                next.error = Some(err);
            }
            FormEdit::ImageCleared => next.image = None,
            FormEdit::Rejected(err) => next.error = Some(err),
        }
        next
    }

    pub fn validate(&self, schema: &FormSchema) -> Result<PlaceDraft, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if self.category.is_empty() {
            return Err(FormError::MissingCategory);
        }
        if !schema.categories.iter().any(|entry| *entry == self.category) {
            return Err(FormError::UnknownCategory(self.category.clone()));
        }
        let Some(rating) = self.rating else {
            return Err(FormError::MissingRating);
        };
        if !schema.rating_options().contains(&rating) {
            return Err(FormError::RatingOutOfRange {
                rating,
                min: schema.rating_min,
                max: schema.rating_max,
            });
        }
        let recommended_by = self.recommended_by.trim();
        let recommended_by = if recommended_by.is_empty() {
            if schema.require_recommender {
                return Err(FormError::MissingRecommender);
            }
            None
        } else {
            if !schema.recommenders.iter().any(|entry| entry == recommended_by) {
                return Err(FormError::UnknownRecommender(recommended_by.to_string()));
            }
            Some(recommended_by.to_string())
        };
        Ok(PlaceDraft {
            name: name.to_string(),
            category: self.category.clone(),
            rating,
            review: self.review.clone(),
            recommended_by,
            image: self.image.clone(),
        })
    }
}
