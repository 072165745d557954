//! Lightbox state machine.
//!
//! ```text
//!            open(i), i < len
//!   Closed ───────────────────▶ Open(i)
//!     ▲                          │  │
//!     └──────── close() ─────────┘  └─ navigate(±1): Open(i±1) if in bounds,
//!                                      otherwise stays at Open(i)
//! ```
//!
//! The controller only knows the length of the visible list, never the list
//! itself. Every index check is made against the length passed in, so the
//! caller decides what "visible" means at the time of the event.

use serde::{Deserialize, Serialize};

use crate::catalog::PhotoRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightboxState {
    #[default]
    Closed,
    Open(usize),
}

impl LightboxState {
    pub fn index(self) -> Option<usize> {
        match self {
            LightboxState::Closed => None,
            LightboxState::Open(i) => Some(i),
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, LightboxState::Open(_))
    }
}

/// What happens to an open lightbox when the visible list is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterChangePolicy {
    /// Always close.
    #[default]
    Close,
    /// Stay open, moved onto the last photo if the old index fell off the
    /// end. Closes when nothing is visible.
    Clamp,
}

#[derive(Debug, Clone, Default)]
pub struct LightboxController {
    state: LightboxState,
}

impl LightboxController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    /// Open on `index`. Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize, len: usize) -> Option<usize> {
        if index < len {
            self.state = LightboxState::Open(index);
            Some(index)
        } else {
            None
        }
    }

    /// Returns whether the lightbox was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.state.is_open();
        self.state = LightboxState::Closed;
        was_open
    }

    /// Move by `delta`. Returns the new index, or `None` when closed or at a
    /// boundary. There is no wraparound.
    pub fn navigate(&mut self, delta: isize, len: usize) -> Option<usize> {
        let target = self.peek(delta, len)?;
        self.state = LightboxState::Open(target);
        Some(target)
    }

    /// The index `navigate(delta)` would move to, without moving.
    pub fn peek(&self, delta: isize, len: usize) -> Option<usize> {
        let current = self.state.index()?;
        current
            .checked_add_signed(delta)
            .filter(|&target| target < len && target != current)
    }

    /// Re-check the open index against a new visible length.
    pub fn revalidate(&mut self, len: usize, policy: FilterChangePolicy) -> LightboxState {
        if let LightboxState::Open(index) = self.state {
            self.state = match policy {
                FilterChangePolicy::Close => LightboxState::Closed,
                FilterChangePolicy::Clamp if len == 0 => LightboxState::Closed,
                FilterChangePolicy::Clamp => LightboxState::Open(index.min(len - 1)),
            };
        }
        self.state
    }
}

/// Everything the lightbox displays for one photo, swapped in as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightboxContent {
    /// Position in the visible list.
    pub index: usize,
    pub image_src: String,
    pub alt: String,
    pub title: String,
    pub description: String,
}

impl LightboxContent {
    pub fn for_record(index: usize, record: &PhotoRecord, image_dir: &str) -> Self {
        Self {
            index,
            image_src: record.image_src(image_dir),
            alt: record.title.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
        }
    }
}
