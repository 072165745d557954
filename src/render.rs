//! HTML rendering of gallery state.
//!
//! Every function here is a projection: given a piece of gallery state it
//! returns [Maud](https://maud.lambda.xyz/) markup, with no memory of what was
//! rendered before. The photo container is always rebuilt whole.
//!
//! ## Markup Contract
//!
//! Each photo element carries:
//!
//! - `data-category`: the record's category, verbatim
//! - `data-index`: its position in the current visible list
//!
//! Selection logic outside this crate (the embedded script, tests, user CSS)
//! relies on both.
//!
//! ## Links
//!
//! Each reachable state has its own page (see [`crate::site`]), so every
//! affordance is a link to the page of the state it leads to. Paths are
//! relative to the current page through [`RenderContext::root`], which keeps
//! the generated site browsable from `file://`.

use maud::{Markup, PreEscaped, html};

use crate::catalog::{Category, PhotoRecord};
use crate::config::SiteInfo;
use crate::dates::DateLocale;
use crate::effects;
use crate::filter::Filter;
use crate::lightbox::LightboxContent;
use crate::view::ViewMode;

/// Per-page rendering parameters.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Relative path from the current page to the site root, `""` or ending in `/`.
    pub root: &'a str,
    pub image_dir: &'a str,
    pub locale: DateLocale,
    /// Seconds between photo entrance animations.
    pub entrance_step: f64,
}

impl RenderContext<'_> {
    /// Site-root-relative `path` as seen from the current page.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }
}

/// Directory of a (filter, view) state, relative to the site root.
pub fn state_dir(filter: &Filter, view: ViewMode) -> String {
    format!("{}/{}", filter.slug(), view.as_str())
}

/// Site-root-relative path of the gallery page of a state.
pub fn gallery_path(filter: &Filter, view: ViewMode) -> String {
    format!("{}/index.html", state_dir(filter, view))
}

/// Site-root-relative path of the lightbox page for visible `index`.
/// Pages are numbered from 1.
pub fn lightbox_path(filter: &Filter, view: ViewMode, index: usize) -> String {
    format!("{}/{}.html", state_dir(filter, view), index + 1)
}

/// Renders one photo element.
pub fn render_photo(record: &PhotoRecord, index: usize, href: &str, ctx: &RenderContext) -> Markup {
    let src = ctx.url(&record.image_src(ctx.image_dir));
    let delay = effects::entrance_delay(index, ctx.entrance_step);

    html! {
        div.photo.animate-in
            data-category=(record.category)
            data-index=(index)
            style={ "animation-delay: " (format!("{delay:.2}")) "s;" }
        {
            a.photo-link href=(href) {
                img src=(src) data-src=(src) alt=(record.title) loading="lazy";
            }
            div.photo-info {
                h3.photo-title { (record.title) }
                @if !record.description.is_empty() {
                    p.photo-description { (record.description) }
                }
                div.photo-meta {
                    time.photo-date datetime=(record.date.format("%Y-%m-%d").to_string()) {
                        (ctx.locale.format_long(record.date))
                    }
                    @if !record.location.is_empty() {
                        span.photo-location { (record.location) }
                    }
                }
            }
        }
    }
}

/// Renders the photo container: one element per visible record in the
/// layout of `view`.
pub fn render_gallery(
    records: &[&PhotoRecord],
    filter: &Filter,
    view: ViewMode,
    ctx: &RenderContext,
) -> Markup {
    html! {
        div id="photo-container" class=(view.layout_class()) data-view=(view.as_str()) {
            @for (index, record) in records.iter().enumerate() {
                (render_photo(record, index, &ctx.url(&lightbox_path(filter, view, index)), ctx))
            }
        }
        @if view == ViewMode::Carousel && !records.is_empty() {
            div.carousel-progress { div.carousel-progress-bar {} }
        }
    }
}

/// Renders the category buttons. Each keeps the current view.
pub fn render_filter_bar(
    categories: &[Category],
    all_label: &str,
    active: &Filter,
    view: ViewMode,
    ctx: &RenderContext,
) -> Markup {
    html! {
        nav.filters {
            (filter_button(&Filter::All, all_label, active, view, ctx))
            @for category in categories {
                (filter_button(&Filter::Category(category.tag.clone()), &category.label, active, view, ctx))
            }
        }
    }
}

fn filter_button(
    filter: &Filter,
    label: &str,
    active: &Filter,
    view: ViewMode,
    ctx: &RenderContext,
) -> Markup {
    let is_active = filter == active;
    html! {
        a.filter-btn.active[is_active]
            href=(ctx.url(&gallery_path(filter, view)))
            data-filter=(filter.tag())
        {
            (label)
        }
    }
}

/// Renders the layout buttons. Each keeps the current filter.
pub fn render_view_bar(active: ViewMode, filter: &Filter, ctx: &RenderContext) -> Markup {
    html! {
        nav.views {
            @for view in ViewMode::ALL {
                a.view-btn.active[view == active]
                    href=(ctx.url(&gallery_path(filter, view)))
                    data-view=(view.as_str())
                {
                    (view.label())
                }
            }
        }
    }
}

/// Link targets of an open lightbox. `prev`/`next` are `None` at the ends of
/// the visible list, where the buttons render disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct LightboxLinks {
    pub close: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Renders the modal. Closed renders an empty, hidden modal.
pub fn render_lightbox(
    open: Option<(&LightboxContent, &LightboxLinks)>,
    ctx: &RenderContext,
) -> Markup {
    html! {
        @if let Some((content, links)) = open {
            div.modal.show id="modal"
                data-index=(content.index)
                data-close=(links.close)
                data-prev=[links.prev.as_deref()]
                data-next=[links.next.as_deref()]
            {
                a.modal-backdrop href=(links.close) aria-label="Close" {}
                div.modal-content {
                    a #close-modal.close-modal href=(links.close) aria-label="Close" { "×" }
                    img #modal-image src=(ctx.url(&content.image_src)) alt=(content.alt);
                    div.modal-info {
                        h2 #modal-title { (content.title) }
                        p #modal-description { (content.description) }
                    }
                    div.modal-nav {
                        (nav_button("prev-btn", "‹", links.prev.as_deref()))
                        (nav_button("next-btn", "›", links.next.as_deref()))
                    }
                }
            }
        } @else {
            div.modal id="modal" aria-hidden="true" {}
        }
    }
}

fn nav_button(id: &str, glyph: &str, href: Option<&str>) -> Markup {
    html! {
        @if let Some(href) = href {
            a.modal-nav-btn id=(id) href=(href) { (glyph) }
        } @else {
            span.modal-nav-btn.disabled id=(id) aria-disabled="true" { (glyph) }
        }
    }
}

/// Renders the site header. `intro_html` is pre-rendered markdown.
pub fn render_header(site: &SiteInfo, intro_html: Option<&str>) -> Markup {
    html! {
        header.site-header {
            h1.site-title { (site.title) }
            @if !site.subtitle.is_empty() {
                p.site-subtitle { (site.subtitle) }
            }
            @if let Some(intro) = intro_html {
                div.intro { (PreEscaped(intro)) }
            }
        }
    }
}

/// Renders the `<head>` contents: title, language, stylesheet and script.
/// `sparkle` switches on the click sparkle in the script.
pub fn render_head(
    title: &str,
    locale: DateLocale,
    css: &str,
    script: &str,
    sparkle: bool,
) -> Markup {
    html! {
        title { (title) }
        meta http-equiv="Content-Language" content=(locale.language_tag());
        @if sparkle {
            meta name="konfetka-sparkle" content="on";
        }
        style { (PreEscaped(css)) }
        script { (PreEscaped(script)) }
    }
}
