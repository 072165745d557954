//! The gallery controller.
//!
//! [`Gallery`] owns the catalog and all session state: active filter, active
//! view, the visible set derived from the filter, and the lightbox. Every
//! state change goes through one of its methods, and each method reports what
//! changed as a [`Transition`] so the caller (page generator, simulator) can
//! decide what to redraw.
//!
//! View mode and filter are independent: switching views never touches the
//! visible set, and filtering never changes the view.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, PhotoRecord};
use crate::config::SiteConfig;
use crate::events::{GalleryEvent, Key};
use crate::filter::{self, Filter};
use crate::lightbox::{FilterChangePolicy, LightboxContent, LightboxController, LightboxState};
use crate::view::{ViewMode, ViewModeController};

/// Controller settings taken from `config.toml`.
#[derive(Debug, Clone)]
pub struct GallerySettings {
    pub default_view: ViewMode,
    pub image_dir: String,
    pub on_filter_change: FilterChangePolicy,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            default_view: ViewMode::Grid,
            image_dir: "images".to_string(),
            on_filter_change: FilterChangePolicy::Close,
        }
    }
}

impl From<&SiteConfig> for GallerySettings {
    fn from(config: &SiteConfig) -> Self {
        Self {
            default_view: config.gallery.default_view,
            image_dir: config.gallery.image_dir.clone(),
            on_filter_change: config.gallery.on_filter_change,
        }
    }
}

/// A snapshot of the session state.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryState {
    pub active_filter: Filter,
    pub active_view: ViewMode,
    /// Catalog positions of the visible photos, in catalog order.
    pub visible: Vec<usize>,
    pub lightbox: LightboxState,
}

/// What a state change did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Nothing changed.
    Ignored,
    /// The photo container must be rebuilt with `layout_class`. `lightbox` is
    /// the lightbox state after revalidation against the new visible set.
    Rerender {
        layout_class: &'static str,
        lightbox: LightboxState,
    },
    LightboxOpened(LightboxContent),
    LightboxMoved(LightboxContent),
    LightboxClosed,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    catalog: Catalog,
    settings: GallerySettings,
    filter: Filter,
    view: ViewModeController,
    visible: Vec<usize>,
    lightbox: LightboxController,
}

impl Gallery {
    pub fn new(catalog: Catalog, settings: GallerySettings) -> Self {
        let visible = filter::apply_indices(catalog.photos(), &Filter::All);
        let view = ViewModeController::new(settings.default_view);
        Self {
            catalog,
            settings,
            filter: Filter::All,
            view,
            visible,
            lightbox: LightboxController::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    pub fn active_filter(&self) -> &Filter {
        &self.filter
    }

    pub fn active_view(&self) -> ViewMode {
        self.view.current_view()
    }

    pub fn lightbox_state(&self) -> LightboxState {
        self.lightbox.state()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn state(&self) -> GalleryState {
        GalleryState {
            active_filter: self.filter.clone(),
            active_view: self.view.current_view(),
            visible: self.visible.clone(),
            lightbox: self.lightbox.state(),
        }
    }

    /// The visible photos, in order.
    pub fn visible_records(&self) -> Vec<&PhotoRecord> {
        self.visible
            .iter()
            .filter_map(|&pos| self.catalog.get(pos))
            .collect()
    }

    /// Lightbox content for the photo at `index` in the visible set.
    pub fn content_at(&self, index: usize) -> Option<LightboxContent> {
        let record = self.catalog.get(*self.visible.get(index)?)?;
        Some(LightboxContent::for_record(
            index,
            record,
            &self.settings.image_dir,
        ))
    }

    /// What the lightbox shows right now, if open.
    pub fn lightbox_content(&self) -> Option<LightboxContent> {
        self.content_at(self.lightbox.state().index()?)
    }

    /// Where `navigate(delta)` would go, without going there.
    pub fn peek(&self, delta: isize) -> Option<usize> {
        self.lightbox.peek(delta, self.visible.len())
    }

    pub fn set_filter(&mut self, filter: Filter) -> Transition {
        self.visible = filter::apply_indices(self.catalog.photos(), &filter);
        self.filter = filter;
        let lightbox = self
            .lightbox
            .revalidate(self.visible.len(), self.settings.on_filter_change);
        debug!(filter = %self.filter, visible = self.visible.len(), ?lightbox, "filter applied");
        Transition::Rerender {
            layout_class: self.view.current_view().layout_class(),
            lightbox,
        }
    }

    /// Always re-renders, even when `mode` is already active.
    pub fn set_view(&mut self, mode: ViewMode) -> Transition {
        let layout_class = self.view.set_view(mode);
        debug!(view = %mode, "view applied");
        Transition::Rerender {
            layout_class,
            lightbox: self.lightbox.state(),
        }
    }

    pub fn open(&mut self, index: usize) -> Transition {
        match self.lightbox.open(index, self.visible.len()) {
            Some(i) => self.opened(i),
            None => Transition::Ignored,
        }
    }

    pub fn close(&mut self) -> Transition {
        if self.lightbox.close() {
            Transition::LightboxClosed
        } else {
            Transition::Ignored
        }
    }

    pub fn navigate(&mut self, delta: isize) -> Transition {
        match self.lightbox.navigate(delta, self.visible.len()) {
            Some(i) => match self.content_at(i) {
                Some(content) => Transition::LightboxMoved(content),
                None => Transition::Ignored,
            },
            None => Transition::Ignored,
        }
    }

    /// Keyboard contract. Keys do nothing while the lightbox is closed.
    pub fn handle_key(&mut self, key: &Key) -> Transition {
        if !self.lightbox.state().is_open() {
            return Transition::Ignored;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.navigate(-1),
            Key::ArrowRight => self.navigate(1),
            Key::Other(_) => Transition::Ignored,
        }
    }

    pub fn dispatch(&mut self, event: &GalleryEvent) -> Transition {
        match event {
            GalleryEvent::FilterClicked(filter) => self.set_filter(filter.clone()),
            GalleryEvent::ViewClicked(mode) => self.set_view(*mode),
            GalleryEvent::PhotoClicked(index) => self.open(*index),
            GalleryEvent::CloseClicked | GalleryEvent::BackdropClicked => self.close(),
            GalleryEvent::PrevClicked => self.navigate(-1),
            GalleryEvent::NextClicked => self.navigate(1),
            GalleryEvent::KeyPressed(key) => self.handle_key(key),
        }
    }

    fn opened(&self, index: usize) -> Transition {
        match self.content_at(index) {
            Some(content) => Transition::LightboxOpened(content),
            None => Transition::Ignored,
        }
    }
}
