//! Page shell and mount points.
//!
//! Every generated page is the shell with rendered markup placed into its
//! mount points. A mount point is an HTML comment marker:
//!
//! ```html
//! <main>
//!   <!-- mount:filters -->
//!   <!-- mount:photo-container -->
//! </main>
//! ```
//!
//! The built-in shell (`static/shell.html`) carries every mount point. A
//! `shell.html` in the content directory replaces it. The shell is parsed and
//! checked once at startup: a missing required mount point is reported by
//! name before any page is rendered.

use maud::Markup;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Custom shell file name inside the content directory.
pub const SHELL_FILE: &str = "shell.html";

const DEFAULT_SHELL: &str = include_str!("../static/shell.html");
const MARKER_OPEN: &str = "<!-- mount:";
const MARKER_CLOSE: &str = "-->";

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required mount point `{0}`")]
    MissingMount(Mount),
    #[error("unknown mount point `{0}`")]
    UnknownMount(String),
    #[error("mount point `{0}` appears more than once")]
    DuplicateMount(Mount),
    #[error("unterminated mount marker at byte {0}")]
    Unterminated(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mount {
    /// `<title>`, stylesheet, script.
    Head,
    /// Site title, subtitle and intro.
    Header,
    Filters,
    Views,
    PhotoContainer,
    Modal,
    /// Loading overlay.
    Overlay,
    Stars,
    Twinkling,
    Particles,
}

impl Mount {
    pub const ALL: [Mount; 10] = [
        Mount::Head,
        Mount::Header,
        Mount::Filters,
        Mount::Views,
        Mount::PhotoContainer,
        Mount::Modal,
        Mount::Overlay,
        Mount::Stars,
        Mount::Twinkling,
        Mount::Particles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mount::Head => "head",
            Mount::Header => "header",
            Mount::Filters => "filters",
            Mount::Views => "views",
            Mount::PhotoContainer => "photo-container",
            Mount::Modal => "modal",
            Mount::Overlay => "overlay",
            Mount::Stars => "stars",
            Mount::Twinkling => "twinkling",
            Mount::Particles => "particles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Mount::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Pages cannot work without these.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Mount::Head | Mount::Filters | Mount::Views | Mount::PhotoContainer | Mount::Modal
        )
    }
}

impl fmt::Display for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Mount(Mount),
}

/// A validated page shell.
#[derive(Debug, Clone)]
pub struct Shell {
    segments: Vec<Segment>,
}

/// Rendered markup for each mount point of one page.
pub type Mounts = BTreeMap<Mount, Markup>;

impl Shell {
    /// Split the template at its mount markers and check them.
    pub fn parse(template: &str) -> Result<Self, ShellError> {
        let mut segments = Vec::new();
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find(MARKER_OPEN) {
            let after_open = &rest[start + MARKER_OPEN.len()..];
            let end = after_open
                .find(MARKER_CLOSE)
                .ok_or(ShellError::Unterminated(offset + start))?;
            let name = after_open[..end].trim();
            let mount =
                Mount::from_name(name).ok_or_else(|| ShellError::UnknownMount(name.to_string()))?;

            if segments.contains(&Segment::Mount(mount)) {
                return Err(ShellError::DuplicateMount(mount));
            }
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            segments.push(Segment::Mount(mount));

            let consumed = start + MARKER_OPEN.len() + end + MARKER_CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        let shell = Self { segments };
        if let Some(missing) = Mount::ALL
            .into_iter()
            .find(|m| m.is_required() && !shell.has(*m))
        {
            return Err(ShellError::MissingMount(missing));
        }
        Ok(shell)
    }

    /// The built-in shell.
    pub fn builtin() -> Result<Self, ShellError> {
        Self::parse(DEFAULT_SHELL)
    }

    /// `shell.html` from the content directory, or the built-in shell.
    pub fn load(root: &Path) -> Result<Self, ShellError> {
        let path = root.join(SHELL_FILE);
        if path.exists() {
            Self::parse(&fs::read_to_string(path)?)
        } else {
            Self::builtin()
        }
    }

    pub fn has(&self, mount: Mount) -> bool {
        self.segments.contains(&Segment::Mount(mount))
    }

    /// The shell with every mount point replaced by its markup. Mount points
    /// without markup render empty.
    pub fn fill(&self, mounts: &Mounts) -> String {
        let mut page = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => page.push_str(text),
                Segment::Mount(mount) => {
                    if let Some(markup) = mounts.get(mount) {
                        page.push_str(&markup.0);
                    }
                }
            }
        }
        page
    }
}
