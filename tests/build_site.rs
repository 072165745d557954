//! Builds the fixture content directory and checks the generated tree.

use konfetka::site::{self, SiteError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn read(root: &Path, page: &str) -> String {
    fs::read_to_string(root.join(page)).unwrap_or_else(|e| panic!("{page}: {e}"))
}

#[test]
fn build_writes_every_state_page() {
    let out = TempDir::new().unwrap();
    let report = site::build(&fixtures(), out.path()).unwrap();

    // entry + 4 filters × 3 views + (3 + 1 + 1 + 1) lightbox pages × 3 views
    assert_eq!(report.pages.len(), 31);
    assert_eq!(report.images_copied, 3);

    for view in ["grid", "masonry", "carousel"] {
        for filter in ["all", "landscape", "portrait", "nature"] {
            assert!(out.path().join(filter).join(view).join("index.html").exists());
            assert!(out.path().join(filter).join(view).join("1.html").exists());
        }
        assert!(out.path().join("all").join(view).join("3.html").exists());
        assert!(!out.path().join("nature").join(view).join("2.html").exists());
    }
    assert!(out.path().join("index.html").exists());
    assert!(out.path().join("images/photo2.jpg").exists());
}

#[test]
fn entry_page_shows_whole_catalog() {
    let out = TempDir::new().unwrap();
    site::build(&fixtures(), out.path()).unwrap();
    let html = read(out.path(), "index.html");

    assert_eq!(html.matches(r#"class="photo animate-in""#).count(), 3);
    assert!(html.contains(r#"data-category="landscape" data-index="0""#));
    assert!(html.contains(r#"src="images/photo1.jpg""#));
    assert!(html.contains("Пейзажи"));
    assert!(html.contains("<em>семейный</em>"));
    assert_eq!(html.matches(r#"class="particle""#).count(), 20);
    assert!(html.contains(r#"class="loading-overlay""#));
}

#[test]
fn filtered_page_reindexes_visible_photos() {
    let out = TempDir::new().unwrap();
    site::build(&fixtures(), out.path()).unwrap();
    let html = read(out.path(), "nature/grid/index.html");

    assert_eq!(html.matches(r#"class="photo animate-in""#).count(), 1);
    assert!(html.contains(r#"data-category="nature" data-index="0""#));
    assert!(html.contains(r#"src="../../images/photo3.jpg""#));
    assert!(html.contains(r#"href="../../nature/grid/1.html""#));
    assert!(!html.contains(r#"class="loading-overlay""#));
}

#[test]
fn lightbox_page_links_neighbours() {
    let out = TempDir::new().unwrap();
    site::build(&fixtures(), out.path()).unwrap();
    let html = read(out.path(), "all/masonry/2.html");

    assert!(html.contains(r#"class="modal show""#));
    assert!(html.contains(r#"data-prev="1.html""#));
    assert!(html.contains(r#"data-next="3.html""#));
    assert!(html.contains(r#"data-close="index.html""#));
    assert!(html.contains("Портрет в саду"));
    assert!(html.contains(r#"class="photo-container masonry""#));
}

#[test]
fn single_photo_lightbox_has_no_neighbours() {
    let out = TempDir::new().unwrap();
    site::build(&fixtures(), out.path()).unwrap();
    let html = read(out.path(), "landscape/carousel/1.html");

    assert!(!html.contains(r#"data-prev=""#));
    assert!(!html.contains(r#"data-next=""#));
    assert!(html.contains("Закат над морем"));
}

#[test]
fn custom_shell_missing_mount_fails_before_rendering() {
    let content = TempDir::new().unwrap();
    fs::copy(fixtures().join("photos.toml"), content.path().join("photos.toml")).unwrap();
    fs::write(
        content.path().join("shell.html"),
        "<html><head><!-- mount:head --></head><body><!-- mount:filters --></body></html>",
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    let err = site::build(content.path(), &out.path().join("dist")).unwrap_err();
    assert!(matches!(err, SiteError::Shell(_)));
    assert!(err.to_string().contains("missing required mount point `views`"));
    assert!(!out.path().join("dist").exists());
}

#[test]
fn invalid_catalog_date_is_reported() {
    let content = TempDir::new().unwrap();
    fs::write(
        content.path().join("photos.toml"),
        r#"
[[photos]]
file = "a.jpg"
title = "A"
category = "x"
date = "15.01.2024"
"#,
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    let err = site::build(content.path(), out.path()).unwrap_err();
    assert!(err.to_string().contains("invalid date `15.01.2024`"));
}

#[test]
fn image_dir_outside_content_is_rejected() {
    let content = TempDir::new().unwrap();
    fs::copy(fixtures().join("photos.toml"), content.path().join("photos.toml")).unwrap();
    fs::write(
        content.path().join("config.toml"),
        "[gallery]\nimage_dir = \"../shared\"\n",
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    let err = site::build(content.path(), &out.path().join("dist")).unwrap_err();
    assert!(matches!(err, SiteError::Config(_)));
    assert!(err.to_string().contains("must be a relative path"));
    assert!(!out.path().join("shared").exists());
    assert!(!out.path().join("dist").exists());
}
