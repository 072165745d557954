//! Photo catalog loading.
//!
//! The catalog is the full, ordered list of photos the album shows. It is read
//! once from `photos.toml` in the content directory and never mutated after
//! that: a photo's identity is its position in the catalog.
//!
//! ## File Format
//!
//! ```toml
//! # Optional. When absent, categories are derived from the photos in
//! # first-appearance order, labelled with their tag.
//! [[categories]]
//! tag = "landscape"
//! label = "Пейзажи"
//!
//! [[photos]]
//! file = "photo1.jpg"
//! title = "Закат над морем"
//! description = "Невероятно красивый закат"
//! category = "landscape"
//! date = "2024-01-15"
//! location = "Черное море"
//! ```
//!
//! ## Validation
//!
//! Everything is checked at load time so that rendering never meets a
//! half-formed record:
//!
//! - `file`, `title` and `category` must be non-blank
//! - `date` must be an ISO 8601 calendar date (`YYYY-MM-DD`)
//! - the category `all` is reserved for the unfiltered view
//! - a category may be declared only once

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::filter::ALL_TAG;

/// Catalog file name inside the content directory.
pub const CATALOG_FILE: &str = "photos.toml";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("photo {index}: invalid date `{value}` (expected YYYY-MM-DD)")]
    InvalidDate { index: usize, value: String },
    #[error("photo {index}: `{field}` must not be empty")]
    EmptyField { index: usize, field: &'static str },
    #[error("photo {index}: category `all` is reserved for the unfiltered view")]
    ReservedCategory { index: usize },
    #[error("category `{0}` is declared more than once")]
    DuplicateCategory(String),
}

/// A single photo. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRecord {
    pub file: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub location: String,
}

impl PhotoRecord {
    /// Image URL: the image directory prefix joined with the file name.
    ///
    /// No check is made that the file exists.
    pub fn image_src(&self, image_dir: &str) -> String {
        let dir = image_dir.trim_end_matches('/');
        if dir.is_empty() {
            self.file.clone()
        } else {
            format!("{}/{}", dir, self.file)
        }
    }
}

/// A filterable category with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub tag: String,
    pub label: String,
}

/// The full, ordered set of photos plus the categories offered as filters.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    photos: Vec<PhotoRecord>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog whose categories are derived from the photos.
    pub fn from_records(photos: Vec<PhotoRecord>) -> Self {
        let categories = merge_categories(Vec::new(), &photos);
        Self { photos, categories }
    }

    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&PhotoRecord> {
        self.photos.get(position)
    }

    /// Declared categories that no photo uses. They filter to an empty set.
    pub fn unused_categories(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| !self.photos.iter().any(|p| p.category == c.tag))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    tag: String,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPhoto {
    file: String,
    title: String,
    #[serde(default)]
    description: String,
    category: String,
    date: String,
    #[serde(default)]
    location: String,
}

/// Parse and validate catalog TOML.
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    let raw: RawCatalog = toml::from_str(content)?;

    let mut photos = Vec::with_capacity(raw.photos.len());
    for (index, photo) in raw.photos.into_iter().enumerate() {
        photos.push(validate_photo(index, photo)?);
    }

    let mut seen = HashSet::new();
    let mut declared = Vec::with_capacity(raw.categories.len());
    for cat in raw.categories {
        if !seen.insert(cat.tag.clone()) {
            return Err(CatalogError::DuplicateCategory(cat.tag));
        }
        let label = cat.label.unwrap_or_else(|| cat.tag.clone());
        declared.push(Category {
            tag: cat.tag,
            label,
        });
    }

    let categories = merge_categories(declared, &photos);
    Ok(Catalog { photos, categories })
}

/// Load `photos.toml` from the content directory.
pub fn load_catalog(root: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(root.join(CATALOG_FILE))?;
    parse_catalog(&content)
}

fn validate_photo(index: usize, raw: RawPhoto) -> Result<PhotoRecord, CatalogError> {
    for (field, value) in [
        ("file", &raw.file),
        ("title", &raw.title),
        ("category", &raw.category),
    ] {
        if value.trim().is_empty() {
            return Err(CatalogError::EmptyField { index, field });
        }
    }
    if raw.category == ALL_TAG {
        return Err(CatalogError::ReservedCategory { index });
    }
    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|_| {
        CatalogError::InvalidDate {
            index,
            value: raw.date.clone(),
        }
    })?;

    Ok(PhotoRecord {
        file: raw.file,
        title: raw.title,
        description: raw.description,
        category: raw.category,
        date,
        location: raw.location,
    })
}

/// Declared categories first, then any category used by a photo but not
/// declared, in first-appearance order.
fn merge_categories(mut declared: Vec<Category>, photos: &[PhotoRecord]) -> Vec<Category> {
    for photo in photos {
        if !declared.iter().any(|c| c.tag == photo.category) {
            declared.push(Category {
                tag: photo.category.clone(),
                label: photo.category.clone(),
            });
        }
    }
    declared
}
