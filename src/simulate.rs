//! Event replay.
//!
//! A [`Session`] is the in-memory counterpart of a browser tab on the
//! generated site: a [`Gallery`] plus the cosmetic state (lazy loading,
//! parallax layers) that the page script keeps. Feeding it a parsed event
//! script produces a [`Transcript`] of what every event did and the state
//! after it.
//!
//! ```text
//! $ konfetka simulate fixtures/scripts/tour.events
//!   3 filter landscape      rerender photo-container (lightbox closed)
//!   4 click 0               open #0 Закат над морем
//!   5 next                  ignored
//! ```

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::config::EffectsConfig;
use crate::effects::{self, LayerOffset, LazyLoader, ParallaxLayer};
use crate::events::{self, EffectEvent, EventParseError, ScriptEvent, ScriptLine};
use crate::gallery::{Gallery, GallerySettings, Transition};
use crate::lightbox::LightboxState;
use crate::shell::{Mount, Shell};
use crate::site::{self, SiteError};
use crate::view::ViewMode;

#[derive(Error, Debug)]
pub enum SimulateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("event script {0}")]
    Parse(#[from] EventParseError),
}

/// What one event did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A gallery state change.
    Gallery(Transition),
    /// Background layers moved.
    Parallax(Vec<LayerOffset>),
    /// Carousel progress bar width, percent.
    CarouselProgress(f64),
    /// A photo's real image was swapped in.
    ImageLoaded { index: usize, src: String },
    Ignored,
}

/// Session state after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub filter: String,
    pub view: ViewMode,
    /// Titles of the visible photos, in order.
    pub visible: Vec<String>,
    pub lightbox: LightboxState,
    /// Title shown in the lightbox, if open.
    pub showing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub line: usize,
    pub event: String,
    pub outcome: Outcome,
    pub state: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub initial: Snapshot,
    pub steps: Vec<Step>,
}

pub struct Session {
    gallery: Gallery,
    lazy: LazyLoader,
    effects: EffectsConfig,
    /// Parallax layers the shell has a mount point for.
    layers: Vec<ParallaxLayer>,
}

impl Session {
    pub fn new(gallery: Gallery, effects: EffectsConfig, shell: &Shell) -> Self {
        let layers = [
            (Mount::Stars, ParallaxLayer::Stars),
            (Mount::Twinkling, ParallaxLayer::Twinkling),
        ]
        .into_iter()
        .filter(|(mount, _)| shell.has(*mount))
        .map(|(_, layer)| layer)
        .collect();

        let mut session = Self {
            gallery,
            lazy: LazyLoader::new(),
            effects,
            layers,
        };
        session.observe_visible();
        session
    }

    pub fn from_content(content: site::Content) -> Self {
        let settings = GallerySettings::from(&content.config);
        Self::new(
            Gallery::new(content.catalog, settings),
            content.config.effects,
            &content.shell,
        )
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn apply(&mut self, event: &ScriptEvent) -> Outcome {
        match event {
            ScriptEvent::Gallery(event) => match self.gallery.dispatch(event) {
                Transition::Ignored => Outcome::Ignored,
                transition => {
                    if matches!(transition, Transition::Rerender { .. }) {
                        self.observe_visible();
                    }
                    Outcome::Gallery(transition)
                }
            },
            ScriptEvent::Effect(EffectEvent::Scrolled(y)) => {
                let offsets = effects::parallax_offsets(*y, &self.effects, &self.layers);
                if offsets.is_empty() {
                    Outcome::Ignored
                } else {
                    Outcome::Parallax(offsets)
                }
            }
            ScriptEvent::Effect(EffectEvent::CarouselScrolled {
                left,
                width,
                client,
            }) => {
                if self.gallery.active_view() == ViewMode::Carousel {
                    Outcome::CarouselProgress(effects::carousel_progress(*left, *width, *client))
                } else {
                    Outcome::Ignored
                }
            }
            ScriptEvent::Effect(EffectEvent::ImageIntersected(index)) => {
                match self.lazy.intersect(*index) {
                    Some(src) => Outcome::ImageLoaded { index: *index, src },
                    None => Outcome::Ignored,
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            filter: self.gallery.active_filter().to_string(),
            view: self.gallery.active_view(),
            visible: self
                .gallery
                .visible_records()
                .iter()
                .map(|r| r.title.clone())
                .collect(),
            lightbox: self.gallery.lightbox_state(),
            showing: self.gallery.lightbox_content().map(|c| c.title),
        }
    }

    /// A rebuilt container has fresh elements, each observed again.
    fn observe_visible(&mut self) {
        self.lazy.reset();
        let image_dir = &self.gallery.settings().image_dir;
        for (index, record) in self.gallery.visible_records().iter().enumerate() {
            self.lazy.observe(index, record.image_src(image_dir));
        }
    }
}

/// Replay `lines` in order.
pub fn run(session: &mut Session, lines: &[ScriptLine]) -> Transcript {
    let initial = session.snapshot();
    let steps = lines
        .iter()
        .map(|line| {
            let outcome = session.apply(&line.event);
            debug!(line = line.line, event = %line.source, ?outcome, "event applied");
            Step {
                line: line.line,
                event: line.source.clone(),
                outcome,
                state: session.snapshot(),
            }
        })
        .collect();
    Transcript { initial, steps }
}

/// Load the content directory and replay the script at `script`.
pub fn simulate(source: &Path, script: &Path) -> Result<Transcript, SimulateError> {
    let content = site::load_content(source)?;
    let lines = events::parse_script(&fs::read_to_string(script)?)?;
    let mut session = Session::from_content(content);
    Ok(run(&mut session, &lines))
}
