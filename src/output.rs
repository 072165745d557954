//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what the user knows an entity by: a photo's title, a
//! category's label, a filter's tag. Paths and other context follow on
//! indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Photos
//! 001 Закат над морем (landscape)
//!     Source: images/photo1.jpg
//!     Date: 15 января 2024 г.
//!
//! Categories
//! 001 Пейзажи [landscape] (1 photo)
//! 002 Улицы [street] (unused)
//!
//! Content
//!     Shell: built-in
//!     Intro: Наш семейный альбом...
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 all → all/
//!     grid: 3 photos, 3 lightbox pages
//!     masonry: 3 photos, 3 lightbox pages
//!     carousel: 3 photos, 3 lightbox pages
//!
//! Generated 31 pages (13 gallery, 18 lightbox), copied 3 images
//! ```
//!
//! ## Simulate
//!
//! ```text
//! Start: all / grid, 3 visible, lightbox closed
//!   1 filter landscape        → rerender photo-container (1 visible, lightbox closed)
//!   2 click 0                 → open 001 Закат над морем
//!   3 next                    → ignored
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::gallery::Transition;
use crate::lightbox::{FilterChangePolicy, LightboxState};
use crate::simulate::{Outcome, Snapshot, Transcript};
use crate::site::{BuildReport, Content};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn lightbox_label(state: LightboxState) -> String {
    match state {
        LightboxState::Closed => "lightbox closed".to_string(),
        LightboxState::Open(i) => format!("lightbox on {}", format_index(i + 1)),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the content inventory for `check`.
///
/// `custom_shell` tells whether `shell.html` came from the content directory.
pub fn format_check_output(content: &Content, custom_shell: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let catalog = &content.catalog;
    let config = &content.config;

    lines.push("Photos".to_string());
    for (i, photo) in catalog.photos().iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            photo.title,
            photo.category
        ));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            photo.image_src(&config.gallery.image_dir)
        ));
        lines.push(format!(
            "{}Date: {}",
            indent(1),
            config.dates.locale.format_long(photo.date)
        ));
        if !photo.location.is_empty() {
            lines.push(format!("{}Location: {}", indent(1), photo.location));
        }
    }
    if catalog.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    lines.push(String::new());
    lines.push("Categories".to_string());
    for (i, category) in catalog.categories().iter().enumerate() {
        let count = catalog
            .photos()
            .iter()
            .filter(|p| p.category == category.tag)
            .count();
        let detail = if count == 0 {
            "unused".to_string()
        } else {
            plural(count, "photo", "photos")
        };
        lines.push(format!(
            "{} {} [{}] ({})",
            format_index(i + 1),
            category.label,
            category.tag,
            detail
        ));
    }

    lines.push(String::new());
    lines.push("Content".to_string());
    let shell = if custom_shell { "shell.html" } else { "built-in" };
    lines.push(format!("{}Shell: {}", indent(1), shell));
    if let Some(intro) = &content.intro {
        let text = strip_html_tags(intro);
        lines.push(format!("{}Intro: {}", indent(1), truncate_desc(text.trim(), 40)));
    }
    lines.push(format!(
        "{}View: {}, locale: {}, on filter change: {}",
        indent(1),
        config.gallery.default_view,
        config.dates.locale.language_tag(),
        match config.gallery.on_filter_change {
            FilterChangePolicy::Close => "close",
            FilterChangePolicy::Clamp => "clamp",
        }
    ));
    lines
}

pub fn print_check_output(content: &Content, custom_shell: bool) {
    for line in format_check_output(content, custom_shell) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the build summary: one entry per filter, one line per view.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Home → index.html".to_string());

    // Filters in first-appearance order, each with its views in order.
    let mut filters: Vec<(String, String, Vec<(String, usize, usize)>)> = Vec::new();
    for page in &report.pages {
        if page.path == "index.html" {
            continue;
        }
        let tag = page.filter.tag().to_string();
        let found = filters.iter().position(|(t, _, _)| *t == tag);
        let entry = match found {
            Some(pos) => &mut filters[pos],
            None => {
                filters.push((tag, format!("{}/", page.filter.slug()), Vec::new()));
                let last = filters.len() - 1;
                &mut filters[last]
            }
        };
        let view = page.view.as_str().to_string();
        let views = &mut entry.2;
        let found = views.iter().position(|(v, _, _)| *v == view);
        let slot = match found {
            Some(pos) => pos,
            None => {
                views.push((view, page.visible, 0));
                views.len() - 1
            }
        };
        if page.lightbox.is_some() {
            views[slot].2 += 1;
        }
    }

    for (i, (tag, dir, views)) in filters.iter().enumerate() {
        lines.push(format!("{} {} → {}", format_index(i + 1), tag, dir));
        for (view, visible, lightboxes) in views {
            lines.push(format!(
                "{}{}: {}, {}",
                indent(1),
                view,
                plural(*visible, "photo", "photos"),
                plural(*lightboxes, "lightbox page", "lightbox pages")
            ));
        }
    }

    let lightbox_pages = report.pages.iter().filter(|p| p.lightbox.is_some()).count();
    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({} gallery, {} lightbox), copied {}",
        plural(report.pages.len(), "page", "pages"),
        report.pages.len() - lightbox_pages,
        lightbox_pages,
        plural(report.images_copied, "image", "images")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

fn format_snapshot(state: &Snapshot) -> String {
    format!(
        "{} / {}, {} visible, {}",
        state.filter,
        state.view,
        state.visible.len(),
        lightbox_label(state.lightbox)
    )
}

fn format_outcome(outcome: &Outcome, state: &Snapshot) -> String {
    match outcome {
        Outcome::Gallery(Transition::Rerender {
            layout_class,
            lightbox,
        }) => format!(
            "rerender {} ({} visible, {})",
            layout_class,
            state.visible.len(),
            lightbox_label(*lightbox)
        ),
        Outcome::Gallery(Transition::LightboxOpened(content)) => {
            format!("open {} {}", format_index(content.index + 1), content.title)
        }
        Outcome::Gallery(Transition::LightboxMoved(content)) => {
            format!("move to {} {}", format_index(content.index + 1), content.title)
        }
        Outcome::Gallery(Transition::LightboxClosed) => "closed".to_string(),
        Outcome::Gallery(Transition::Ignored) | Outcome::Ignored => "ignored".to_string(),
        Outcome::Parallax(offsets) => {
            let parts: Vec<String> = offsets
                .iter()
                .map(|o| format!("{} {:.1}", o.layer.class(), o.offset))
                .collect();
            format!("parallax {}", parts.join(", "))
        }
        Outcome::CarouselProgress(percent) => format!("progress {:.0}%", percent),
        Outcome::ImageLoaded { src, .. } => format!("loaded {}", src),
    }
}

/// Format a simulation transcript, one line per event.
pub fn format_transcript(transcript: &Transcript) -> Vec<String> {
    let mut lines = vec![format!("Start: {}", format_snapshot(&transcript.initial))];
    for step in &transcript.steps {
        lines.push(format!(
            "{:>3} {:<24} → {}",
            step.line,
            step.event,
            format_outcome(&step.outcome, &step.state)
        ));
    }
    lines.push(format!(
        "End: {}",
        format_snapshot(
            transcript
                .steps
                .last()
                .map(|s| &s.state)
                .unwrap_or(&transcript.initial)
        )
    ));
    lines
}

pub fn print_transcript(transcript: &Transcript) {
    for line in format_transcript(transcript) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::events::parse_script;
    use crate::filter::Filter;
    use crate::shell::Shell;
    use crate::simulate::{Session, run};
    use crate::site::PageSummary;
    use crate::test_helpers::{sample_catalog, sample_gallery};
    use crate::view::ViewMode;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn strip_html_tags_removes_tags() {
        assert_eq!(strip_html_tags("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn strip_html_tags_empty() {
        assert_eq!(strip_html_tags(""), "");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_counts_characters() {
        let text = "я".repeat(50);
        let expected = format!("{}...", "я".repeat(40));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "photo", "photos"), "1 photo");
        assert_eq!(plural(0, "photo", "photos"), "0 photos");
    }

    // =========================================================================
    // Check
    // =========================================================================

    fn sample_content() -> Content {
        Content {
            catalog: sample_catalog(),
            config: SiteConfig::default(),
            shell: Shell::builtin().unwrap(),
            intro: Some("<p>Наш <em>семейный</em> альбом</p>\n".to_string()),
        }
    }

    #[test]
    fn check_lists_photos_with_context() {
        let lines = format_check_output(&sample_content(), false);
        assert_eq!(lines[0], "Photos");
        assert_eq!(lines[1], "001 Закат над морем (landscape)");
        assert_eq!(lines[2], "    Source: images/photo1.jpg");
        assert_eq!(lines[3], "    Date: 15 января 2024 г.");
        assert_eq!(lines[4], "    Location: Черное море");
    }

    #[test]
    fn check_lists_categories_and_content() {
        let lines = format_check_output(&sample_content(), true);
        assert!(lines.contains(&"001 landscape [landscape] (1 photo)".to_string()));
        assert!(lines.contains(&"    Shell: shell.html".to_string()));
        assert!(lines.contains(&"    Intro: Наш семейный альбом".to_string()));
        assert!(lines.contains(&"    View: grid, locale: ru, on filter change: close".to_string()));
    }

    // =========================================================================
    // Build
    // =========================================================================

    fn page(
        path: &str,
        filter: &str,
        view: ViewMode,
        visible: usize,
        lightbox: Option<usize>,
    ) -> PageSummary {
        PageSummary {
            path: path.to_string(),
            filter: Filter::parse(filter),
            view,
            visible,
            lightbox,
        }
    }

    #[test]
    fn build_output_groups_by_filter() {
        let report = BuildReport {
            output: PathBuf::from("dist"),
            pages: vec![
                page("index.html", "all", ViewMode::Grid, 2, None),
                page("all/grid/index.html", "all", ViewMode::Grid, 2, None),
                page("all/grid/1.html", "all", ViewMode::Grid, 2, Some(0)),
                page("all/grid/2.html", "all", ViewMode::Grid, 2, Some(1)),
                page("black-white/grid/index.html", "Black & White", ViewMode::Grid, 1, None),
                page("black-white/grid/1.html", "Black & White", ViewMode::Grid, 1, Some(0)),
            ],
            images_copied: 2,
            title: "Album".to_string(),
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines,
            [
                "Home → index.html",
                "001 all → all/",
                "    grid: 2 photos, 2 lightbox pages",
                "002 Black & White → black-white/",
                "    grid: 1 photo, 1 lightbox page",
                "",
                "Generated 6 pages (3 gallery, 3 lightbox), copied 2 images",
            ]
        );
    }

    // =========================================================================
    // Simulate
    // =========================================================================

    #[test]
    fn transcript_lines() {
        let mut session = Session::new(
            sample_gallery(),
            SiteConfig::default().effects,
            &Shell::builtin().unwrap(),
        );
        let script = parse_script(
            "filter landscape\nclick 0\nnext\nclose\nscroll 100\n\
             view carousel\ncarousel 150 1200 600\nintersect 0\n",
        )
        .unwrap();
        let lines = format_transcript(&run(&mut session, &script));
        assert_eq!(lines[0], "Start: all / grid, 3 visible, lightbox closed");
        assert!(lines[1].ends_with("→ rerender photo-container (1 visible, lightbox closed)"));
        assert!(lines[1].starts_with("  1 filter landscape"));
        assert!(lines[2].ends_with("→ open 001 Закат над морем"));
        assert!(lines[3].ends_with("→ ignored"));
        assert!(lines[4].ends_with("→ closed"));
        assert!(lines[5].ends_with("→ parallax stars 50.0, twinkling 30.0"));
        assert!(
            lines[6].ends_with("→ rerender photo-container carousel (1 visible, lightbox closed)")
        );
        assert!(lines[7].ends_with("→ progress 25%"));
        assert!(lines[8].ends_with("→ loaded images/photo1.jpg"));
        assert_eq!(lines[9], "End: landscape / carousel, 1 visible, lightbox closed");
    }
}
