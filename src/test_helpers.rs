//! Shared test utilities.
//!
//! The sample catalog is the album's three photos:
//!
//! | # | Title | Category |
//! |---|-------|----------|
//! | 0 | Закат над морем | landscape |
//! | 1 | Портрет в саду | portrait |
//! | 2 | Горный пейзаж | nature |
//!
//! `setup_fixtures` copies `fixtures/content/` (the same three photos plus a
//! config and placeholder images) to a temp directory.

use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

use crate::catalog::{Catalog, PhotoRecord};
use crate::gallery::{Gallery, GallerySettings};

fn record(
    file: &str,
    title: &str,
    description: &str,
    category: &str,
    date: (i32, u32, u32),
    location: &str,
) -> PhotoRecord {
    PhotoRecord {
        file: file.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        location: location.to_string(),
    }
}

pub fn sample_records() -> Vec<PhotoRecord> {
    vec![
        record(
            "photo1.jpg",
            "Закат над морем",
            "Невероятно красивый закат, который мы наблюдали во время отпуска.",
            "landscape",
            (2024, 1, 15),
            "Черное море",
        ),
        record(
            "photo2.jpg",
            "Портрет в саду",
            "Семейный портрет среди цветущих роз.",
            "portrait",
            (2024, 2, 20),
            "Ботанический сад",
        ),
        record(
            "photo3.jpg",
            "Горный пейзаж",
            "Вид с вершины горы просто захватывает дух.",
            "nature",
            (2024, 3, 10),
            "Кавказские горы",
        ),
    ]
}

pub fn sample_catalog() -> Catalog {
    Catalog::from_records(sample_records())
}

/// A gallery over the sample catalog with default settings.
pub fn sample_gallery() -> Gallery {
    Gallery::new(sample_catalog(), GallerySettings::default())
}

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
