//! Static site generation.
//!
//! The gallery is a small state machine (filter × view × lightbox). `build`
//! walks a [`Gallery`] through every reachable state and writes one page per
//! state, so the generated site needs no server and no client-side routing.
//! Every affordance on a page is a link to the page of the state it leads to.
//!
//! ## Generated Pages
//!
//! - **Entry page** (`/index.html`): the initial state (all photos, default view)
//! - **State pages** (`/{filter}/{view}/index.html`): one per filter and view
//! - **Lightbox pages** (`/{filter}/{view}/{n}.html`): the state page with the
//!   lightbox open on visible photo `n` (1-based)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── images/                  # copied from content/images/
//! ├── all/
//! │   ├── grid/
//! │   │   ├── index.html
//! │   │   ├── 1.html
//! │   │   └── ...
//! │   ├── masonry/
//! │   └── carousel/
//! └── landscape/
//!     └── ...
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/gallery.js`: keyboard contract, parallax, lazy loading, sparkle
//!
//! Pages are planned sequentially (the gallery is a single-threaded state
//! machine) and rendered to files in parallel.

use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::{self, Catalog, CatalogError};
use crate::config::{self, ConfigError, SiteConfig};
use crate::effects::{self, ParallaxLayer, Particle};
use crate::filter::{ALL_TAG, Filter};
use crate::gallery::{Gallery, GallerySettings};
use crate::lightbox::LightboxContent;
use crate::render::{self, LightboxLinks, RenderContext};
use crate::shell::{Mount, Mounts, Shell, ShellError};
use crate::view::ViewMode;

/// Optional markdown shown under the site header.
pub const INTRO_FILE: &str = "intro.md";

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

/// State pages sit two directories below the site root.
const STATE_ROOT: &str = "../../";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("shell error: {0}")]
    Shell(#[from] ShellError),
    #[error("copying images: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("categories `{first}` and `{second}` would share the page directory `{slug}`")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },
}

/// Everything read from the content directory, validated.
#[derive(Debug)]
pub struct Content {
    pub catalog: Catalog,
    pub config: SiteConfig,
    pub shell: Shell,
    /// `intro.md` rendered to HTML.
    pub intro: Option<String>,
}

/// Load and validate the content directory. Nothing is rendered.
pub fn load_content(source: &Path) -> Result<Content, SiteError> {
    let config = config::load_config(source)?;
    let catalog = catalog::load_catalog(source)?;
    let shell = Shell::load(source)?;
    check_slugs(&catalog)?;

    if catalog.is_empty() {
        warn!(source = %source.display(), "catalog has no photos");
    }
    for category in catalog.unused_categories() {
        warn!(tag = %category.tag, "category is declared but no photo uses it");
    }

    let intro_path = source.join(INTRO_FILE);
    let intro = if intro_path.exists() {
        Some(render_markdown(&fs::read_to_string(&intro_path)?))
    } else {
        None
    };

    debug!(
        photos = catalog.len(),
        categories = catalog.categories().len(),
        intro = intro.is_some(),
        "content loaded"
    );
    Ok(Content {
        catalog,
        config,
        shell,
        intro,
    })
}

/// Each filter needs a page directory of its own.
fn check_slugs(catalog: &Catalog) -> Result<(), SiteError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    seen.insert(Filter::All.slug(), ALL_TAG.to_string());
    for category in catalog.categories() {
        let slug = Filter::parse(&category.tag).slug();
        if let Some(first) = seen.insert(slug.clone(), category.tag.clone()) {
            return Err(SiteError::SlugCollision {
                slug,
                first,
                second: category.tag.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Page planning
// ============================================================================

/// One page to write: a reachable gallery state and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Output path relative to the site root.
    pub path: String,
    /// Relative path from this page back to the site root.
    pub root: &'static str,
    /// The entry page shows the loading overlay.
    pub entry: bool,
    pub filter: Filter,
    pub view: ViewMode,
    /// Catalog positions of the visible photos.
    pub visible: Vec<usize>,
    pub lightbox: Option<PlannedLightbox>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLightbox {
    pub content: LightboxContent,
    pub links: LightboxLinks,
}

/// Walk a copy of `gallery` through every reachable state.
///
/// Starts with the gallery's current state as the entry page, then every
/// filter (all, then each category) in every view, then every lightbox index
/// of each.
pub fn plan_pages(gallery: &Gallery) -> Vec<PagePlan> {
    let mut walker = gallery.clone();
    let mut plans = vec![state_plan(&walker, "index.html".to_string(), "", true)];

    let filters: Vec<Filter> = std::iter::once(Filter::All)
        .chain(
            walker
                .catalog()
                .categories()
                .iter()
                .map(|c| Filter::parse(&c.tag)),
        )
        .collect();

    for filter in filters {
        walker.close();
        walker.set_filter(filter);
        for view in ViewMode::ALL {
            walker.set_view(view);
            let path = render::gallery_path(walker.active_filter(), view);
            plans.push(state_plan(&walker, path, STATE_ROOT, false));

            for index in 0..walker.visible_len() {
                walker.open(index);
                plans.push(lightbox_plan(&walker, index));
            }
            walker.close();
        }
    }
    plans
}

fn state_plan(gallery: &Gallery, path: String, root: &'static str, entry: bool) -> PagePlan {
    let state = gallery.state();
    PagePlan {
        path,
        root,
        entry,
        filter: state.active_filter,
        view: state.active_view,
        visible: state.visible,
        lightbox: None,
    }
}

fn lightbox_plan(gallery: &Gallery, index: usize) -> PagePlan {
    let path = render::lightbox_path(gallery.active_filter(), gallery.active_view(), index);
    let lightbox = gallery.lightbox_content().map(|content| PlannedLightbox {
        content,
        links: LightboxLinks {
            close: "index.html".to_string(),
            prev: gallery.peek(-1).map(|i| format!("{}.html", i + 1)),
            next: gallery.peek(1).map(|i| format!("{}.html", i + 1)),
        },
    });
    PagePlan {
        lightbox,
        ..state_plan(gallery, path, STATE_ROOT, false)
    }
}

// ============================================================================
// Page rendering
// ============================================================================

/// Per-build rendering inputs shared by every page.
struct PageRenderer<'a> {
    gallery: &'a Gallery,
    config: &'a SiteConfig,
    shell: &'a Shell,
    intro: Option<&'a str>,
    css: String,
    particles: Vec<Particle>,
}

impl<'a> PageRenderer<'a> {
    fn new(gallery: &'a Gallery, content: &'a Content) -> Self {
        let color_css = config::generate_color_css(&content.config.colors);
        Self {
            gallery,
            config: &content.config,
            shell: &content.shell,
            intro: content.intro.as_deref(),
            css: format!("{}\n\n{}", color_css, CSS_STATIC),
            particles: effects::particles(
                content.config.effects.particles,
                &content.config.effects.seed,
            ),
        }
    }

    fn render(&self, plan: &PagePlan) -> String {
        let config = self.config;
        let ctx = RenderContext {
            root: plan.root,
            image_dir: &self.gallery.settings().image_dir,
            locale: config.dates.locale,
            entrance_step: config.effects.entrance_step,
        };
        let catalog = self.gallery.catalog();
        let records: Vec<_> = plan.visible.iter().filter_map(|&i| catalog.get(i)).collect();

        let title = match &plan.lightbox {
            Some(lightbox) => format!("{} · {}", lightbox.content.title, config.site.title),
            None => config.site.title.clone(),
        };

        let mut mounts = Mounts::new();
        mounts.insert(
            Mount::Head,
            render::render_head(&title, ctx.locale, &self.css, JS, config.effects.sparkle),
        );
        mounts.insert(Mount::Header, render::render_header(&config.site, self.intro));
        mounts.insert(
            Mount::Filters,
            render::render_filter_bar(
                catalog.categories(),
                &config.site.all_label,
                &plan.filter,
                plan.view,
                &ctx,
            ),
        );
        mounts.insert(Mount::Views, render::render_view_bar(plan.view, &plan.filter, &ctx));
        mounts.insert(
            Mount::PhotoContainer,
            render::render_gallery(&records, &plan.filter, plan.view, &ctx),
        );
        mounts.insert(
            Mount::Modal,
            render::render_lightbox(
                plan.lightbox.as_ref().map(|l| (&l.content, &l.links)),
                &ctx,
            ),
        );
        if plan.entry {
            mounts.insert(
                Mount::Overlay,
                effects::loading_overlay(
                    &config.effects.loading_text,
                    config.effects.loading_delay_ms,
                ),
            );
        }
        for (mount, layer) in [
            (Mount::Stars, ParallaxLayer::Stars),
            (Mount::Twinkling, ParallaxLayer::Twinkling),
        ] {
            mounts.insert(mount, effects::render_parallax_layer(layer, &config.effects));
        }
        if !self.particles.is_empty() {
            mounts.insert(Mount::Particles, effects::render_particles(&self.particles));
        }

        self.shell.fill(&mounts)
    }
}

/// Render one planned page to a string.
pub fn render_page(plan: &PagePlan, gallery: &Gallery, content: &Content) -> String {
    PageRenderer::new(gallery, content).render(plan)
}

fn render_markdown(markdown: &str) -> String {
    let mut body = String::new();
    md_html::push_html(&mut body, Parser::new(markdown));
    body
}

// ============================================================================
// Build
// ============================================================================

/// One written page, for the build summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub path: String,
    pub filter: Filter,
    pub view: ViewMode,
    pub visible: usize,
    /// Visible index the lightbox is open on.
    pub lightbox: Option<usize>,
}

#[derive(Debug)]
pub struct BuildReport {
    pub output: PathBuf,
    pub pages: Vec<PageSummary>,
    pub images_copied: usize,
    pub title: String,
}

/// Load `source`, render every state page into `output`, copy the images.
pub fn build(source: &Path, output: &Path) -> Result<BuildReport, SiteError> {
    let content = load_content(source)?;
    info!(source = %source.display(), photos = content.catalog.len(), "content loaded");

    let gallery = Gallery::new(content.catalog.clone(), GallerySettings::from(&content.config));
    let plans = plan_pages(&gallery);
    info!(pages = plans.len(), "pages planned");

    fs::create_dir_all(output)?;
    let renderer = PageRenderer::new(&gallery, &content);
    let pages = plans
        .par_iter()
        .map(|plan| -> Result<PageSummary, SiteError> {
            let path = output.join(&plan.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, renderer.render(plan))?;
            debug!(page = %plan.path, "rendered");
            Ok(PageSummary {
                path: plan.path.clone(),
                filter: plan.filter.clone(),
                view: plan.view,
                visible: plan.visible.len(),
                lightbox: plan.lightbox.as_ref().map(|l| l.content.index),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let image_dir = content.config.gallery.image_dir.trim_end_matches('/');
    let images_copied = copy_images(&source.join(image_dir), &output.join(image_dir))?;
    info!(
        pages = pages.len(),
        images = images_copied,
        output = %output.display(),
        "site generated"
    );

    Ok(BuildReport {
        output: output.to_path_buf(),
        pages,
        images_copied,
        title: content.config.site.title.clone(),
    })
}

/// Copy the image directory tree. A missing directory copies nothing.
fn copy_images(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    if !src.is_dir() {
        warn!(dir = %src.display(), "image directory not found, no images copied");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use crate::lightbox::FilterChangePolicy;
    use crate::test_helpers::{sample_catalog, sample_gallery, setup_fixtures};
    use tempfile::TempDir;

    fn sample_content() -> Content {
        Content {
            catalog: sample_catalog(),
            config: SiteConfig::default(),
            shell: Shell::builtin().unwrap(),
            intro: None,
        }
    }

    fn find<'a>(plans: &'a [PagePlan], path: &str) -> &'a PagePlan {
        plans
            .iter()
            .find(|p| p.path == path)
            .unwrap_or_else(|| panic!("no page {path}"))
    }

    #[test]
    fn plans_every_reachable_state() {
        let plans = plan_pages(&sample_gallery());
        // entry + 4 filters × 3 views + lightboxes (3 for all, 1 per category) × 3 views
        assert_eq!(plans.len(), 1 + 4 * 3 + (3 + 1 + 1 + 1) * 3);
        assert_eq!(plans.iter().filter(|p| p.entry).count(), 1);
    }

    #[test]
    fn entry_page_is_initial_state() {
        let plans = plan_pages(&sample_gallery());
        let entry = &plans[0];
        assert_eq!(entry.path, "index.html");
        assert_eq!(entry.root, "");
        assert_eq!(entry.filter, Filter::All);
        assert_eq!(entry.view, ViewMode::Grid);
        assert_eq!(entry.visible, [0, 1, 2]);
        assert!(entry.lightbox.is_none());
    }

    #[test]
    fn planning_leaves_gallery_untouched() {
        let gallery = sample_gallery();
        let before = gallery.state();
        plan_pages(&gallery);
        assert_eq!(gallery.state(), before);
    }

    #[test]
    fn filtered_state_page_keeps_visible_positions() {
        let plans = plan_pages(&sample_gallery());
        let page = find(&plans, "nature/masonry/index.html");
        assert_eq!(page.root, "../../");
        assert_eq!(page.visible, [2]);
    }

    #[test]
    fn lightbox_links_stop_at_bounds() {
        let plans = plan_pages(&sample_gallery());

        let first = find(&plans, "all/grid/1.html").lightbox.as_ref().unwrap();
        assert_eq!(first.links.prev, None);
        assert_eq!(first.links.next.as_deref(), Some("2.html"));
        assert_eq!(first.links.close, "index.html");

        let middle = find(&plans, "all/carousel/2.html").lightbox.as_ref().unwrap();
        assert_eq!(middle.content.title, "Портрет в саду");
        assert_eq!(middle.links.prev.as_deref(), Some("1.html"));
        assert_eq!(middle.links.next.as_deref(), Some("3.html"));

        let single = find(&plans, "landscape/grid/1.html").lightbox.as_ref().unwrap();
        assert_eq!(single.content.title, "Закат над морем");
        assert_eq!(single.links.prev, None);
        assert_eq!(single.links.next, None);
    }

    #[test]
    fn empty_category_gets_pages_without_lightboxes() {
        let toml = r#"
[[categories]]
tag = "street"
label = "Улицы"

[[photos]]
file = "a.jpg"
title = "A"
description = ""
category = "landscape"
date = "2024-01-01"
location = ""
"#;
        let gallery = Gallery::new(parse_catalog(toml).unwrap(), GallerySettings::default());
        let plans = plan_pages(&gallery);
        let street = find(&plans, "street/grid/index.html");
        assert!(street.visible.is_empty());
        assert!(!plans.iter().any(|p| p.path.starts_with("street/") && p.lightbox.is_some()));
    }

    #[test]
    fn clamp_policy_does_not_leak_into_pages() {
        let settings = GallerySettings {
            on_filter_change: FilterChangePolicy::Clamp,
            ..GallerySettings::default()
        };
        let plans = plan_pages(&Gallery::new(sample_catalog(), settings));
        let page = find(&plans, "portrait/grid/index.html");
        assert!(page.lightbox.is_none());
    }

    #[test]
    fn slug_collision_detected() {
        let catalog = Catalog::from_records(Vec::new());
        assert!(check_slugs(&catalog).is_ok());

        let mut records = crate::test_helpers::sample_records();
        records[0].category = "Black & White".to_string();
        records[1].category = "black-white".to_string();
        let err = check_slugs(&Catalog::from_records(records)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "categories `Black & White` and `black-white` would share the page directory `black-white`"
        );
    }

    #[test]
    fn category_cannot_shadow_all_pages() {
        let mut records = crate::test_helpers::sample_records();
        records[0].category = "ALL".to_string();
        assert!(matches!(
            check_slugs(&Catalog::from_records(records)),
            Err(SiteError::SlugCollision { .. })
        ));
    }

    #[test]
    fn rendered_page_fills_every_mount() {
        let content = sample_content();
        let gallery = sample_gallery();
        let plans = plan_pages(&gallery);
        let html = render_page(&plans[0], &gallery, &content);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("<!-- mount:"));
        assert!(html.contains("<title>Фотоальбом</title>"));
        assert!(html.contains("--color-accent: #ff6b6b"));
        assert!(html.contains(r#"id="photo-container""#));
        assert!(html.contains(r#"class="loading-overlay""#));
        assert!(html.contains(r#"class="stars" data-parallax="0.5""#));
        assert_eq!(html.matches(r#"class="particle""#).count(), 50);
        assert!(html.contains(r#"href="all/grid/1.html""#));
    }

    #[test]
    fn lightbox_page_shows_modal_without_overlay() {
        let content = sample_content();
        let gallery = sample_gallery();
        let plans = plan_pages(&gallery);
        let html = render_page(find(&plans, "all/grid/3.html"), &gallery, &content);

        assert!(html.contains(r#"class="modal show""#));
        assert!(html.contains("<title>Горный пейзаж · Фотоальбом</title>"));
        assert!(html.contains(r#"src="../../images/photo3.jpg""#));
        assert!(html.contains(r#"data-prev="2.html""#));
        assert!(!html.contains(r#"data-next=""#));
        assert!(!html.contains(r#"class="loading-overlay""#));
    }

    #[test]
    fn filter_bar_lists_catalog_categories() {
        let mut content = sample_content();
        let mut records = crate::test_helpers::sample_records();
        records.truncate(1);
        content.catalog = Catalog::from_records(records);
        let gallery = Gallery::new(content.catalog.clone(), GallerySettings::default());
        let plans = plan_pages(&gallery);
        let html = render_page(&plans[0], &gallery, &content);
        assert!(html.contains(r#"data-filter="landscape""#));
        assert!(!html.contains(r#"data-filter="portrait""#));
    }

    #[test]
    fn minimal_shell_skips_optional_effects() {
        let mut content = sample_content();
        content.shell = Shell::parse(
            "<html><head><!-- mount:head --></head><body><!-- mount:filters -->\
             <!-- mount:views --><!-- mount:photo-container --><!-- mount:modal --></body></html>",
        )
        .unwrap();
        let gallery = sample_gallery();
        let plans = plan_pages(&gallery);
        let html = render_page(&plans[0], &gallery, &content);
        assert!(!html.contains(r#"class="particles""#));
        assert!(!html.contains(r#"data-parallax=""#));
        assert!(html.contains(r#"data-index="2""#));
    }

    #[test]
    fn markdown_renders_to_markup() {
        assert_eq!(render_markdown("*hi*"), "<p><em>hi</em></p>\n");
    }

    #[test]
    fn load_content_reads_fixtures() {
        let tmp = setup_fixtures();
        let content = load_content(tmp.path()).unwrap();
        assert_eq!(content.catalog.len(), 3);
        assert!(content.intro.is_some());
    }

    #[test]
    fn load_content_reports_missing_mount() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("shell.html"), "<!-- mount:head -->").unwrap();
        let err = load_content(tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::Shell(ShellError::MissingMount(_))));
    }

    #[test]
    fn copy_images_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let copied = copy_images(&tmp.path().join("nope"), &tmp.path().join("out")).unwrap();
        assert_eq!(copied, 0);
    }
}
