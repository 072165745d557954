//! Layout modes for the photo container.
//!
//! The renderer keeps no memory of the previous mode, so every `set_view`
//! hands back the full class list to apply, even when the mode is unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base class of the photo container.
pub const CONTAINER_CLASS: &str = "photo-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Masonry,
    Carousel,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Grid, ViewMode::Masonry, ViewMode::Carousel];

    /// Unrecognized names fall back to grid.
    pub fn parse(name: &str) -> Self {
        match name {
            "masonry" => ViewMode::Masonry,
            "carousel" => ViewMode::Carousel,
            _ => ViewMode::Grid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::Masonry => "masonry",
            ViewMode::Carousel => "carousel",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::Masonry => "Masonry",
            ViewMode::Carousel => "Carousel",
        }
    }

    /// Class list for the photo container in this mode.
    pub fn layout_class(self) -> &'static str {
        match self {
            ViewMode::Grid => CONTAINER_CLASS,
            ViewMode::Masonry => "photo-container masonry",
            ViewMode::Carousel => "photo-container carousel",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the active layout mode.
#[derive(Debug, Clone, Default)]
pub struct ViewModeController {
    current: ViewMode,
}

impl ViewModeController {
    pub fn new(initial: ViewMode) -> Self {
        Self { current: initial }
    }

    /// Switch modes and return the class list to reapply.
    pub fn set_view(&mut self, mode: ViewMode) -> &'static str {
        self.current = mode;
        mode.layout_class()
    }

    pub fn current_view(&self) -> ViewMode {
        self.current
    }
}
