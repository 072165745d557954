//! Gallery events and the event-script syntax.
//!
//! Events fall in two groups. [`GalleryEvent`]s change gallery state and are
//! dispatched to [`crate::gallery::Gallery`]. [`EffectEvent`]s only feed the
//! cosmetic layer in [`crate::effects`].
//!
//! ## Script Syntax
//!
//! One event per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! filter landscape        # filter button
//! view carousel           # view button
//! click 1                 # photo at visible index 1
//! next                    # lightbox next button
//! prev                    # lightbox previous button
//! close                   # lightbox close button
//! backdrop                # click outside the photo
//! key ArrowRight          # key press (Escape, ArrowLeft, ArrowRight, ...)
//! scroll 240              # page scrolled to y = 240
//! carousel 300 1200 600   # carousel scrollLeft, scrollWidth, clientWidth
//! intersect 0             # image at visible index 0 entered the viewport
//! ```

use std::fmt;
use thiserror::Error;

use crate::filter::Filter;
use crate::view::ViewMode;

#[derive(Error, Debug, PartialEq)]
#[error("line {line}: {message}")]
pub struct EventParseError {
    pub line: usize,
    pub message: String,
}

/// A keyboard key, by its DOM `KeyboardEvent.key` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Key::Escape => "Escape",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::Other(name) => name,
        }
    }
}

/// Events that change gallery state.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    FilterClicked(Filter),
    ViewClicked(ViewMode),
    PhotoClicked(usize),
    CloseClicked,
    BackdropClicked,
    PrevClicked,
    NextClicked,
    KeyPressed(Key),
}

/// Events that only drive visual effects.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectEvent {
    Scrolled(f64),
    CarouselScrolled { left: f64, width: f64, client: f64 },
    ImageIntersected(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    Gallery(GalleryEvent),
    Effect(EffectEvent),
}

/// A parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub source: String,
    pub event: ScriptEvent,
}

/// Parse a whole script. Stops at the first malformed line.
pub fn parse_script(script: &str) -> Result<Vec<ScriptLine>, EventParseError> {
    let mut lines = Vec::new();
    for (i, raw) in script.lines().enumerate() {
        let line = i + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        let event = parse_event(text).map_err(|message| EventParseError { line, message })?;
        lines.push(ScriptLine {
            line,
            source: text.to_string(),
            event,
        });
    }
    Ok(lines)
}

/// A comment starts at a `#` at the beginning of the line or after whitespace.
/// A `#` inside a word belongs to the word.
fn strip_comment(line: &str) -> &str {
    let mut prev_blank = true;
    for (i, c) in line.char_indices() {
        if c == '#' && prev_blank {
            return &line[..i];
        }
        prev_blank = c.is_whitespace();
    }
    line
}

/// Parse a single event. `filter` takes the rest of the line as its tag.
pub fn parse_event(text: &str) -> Result<ScriptEvent, String> {
    let text = text.trim();
    let mut parts = text.split_whitespace();
    let verb = parts.next().ok_or_else(|| "empty event".to_string())?;
    let args: Vec<&str> = parts.collect();

    if verb == "filter" && !args.is_empty() {
        let tag = text[verb.len()..].trim();
        return Ok(ScriptEvent::Gallery(GalleryEvent::FilterClicked(Filter::parse(tag))));
    }

    let event = match (verb, args.as_slice()) {
        ("view", [mode]) => ScriptEvent::Gallery(GalleryEvent::ViewClicked(ViewMode::parse(mode))),
        ("click", [index]) => ScriptEvent::Gallery(GalleryEvent::PhotoClicked(index_arg(index)?)),
        ("close", []) => ScriptEvent::Gallery(GalleryEvent::CloseClicked),
        ("backdrop", []) => ScriptEvent::Gallery(GalleryEvent::BackdropClicked),
        ("prev", []) => ScriptEvent::Gallery(GalleryEvent::PrevClicked),
        ("next", []) => ScriptEvent::Gallery(GalleryEvent::NextClicked),
        ("key", [name]) => ScriptEvent::Gallery(GalleryEvent::KeyPressed(Key::from_name(name))),
        ("scroll", [y]) => ScriptEvent::Effect(EffectEvent::Scrolled(number_arg(y)?)),
        ("carousel", [left, width, client]) => ScriptEvent::Effect(EffectEvent::CarouselScrolled {
            left: number_arg(left)?,
            width: number_arg(width)?,
            client: number_arg(client)?,
        }),
        ("intersect", [index]) => {
            ScriptEvent::Effect(EffectEvent::ImageIntersected(index_arg(index)?))
        }
        (
            "filter" | "view" | "click" | "close" | "backdrop" | "prev" | "next" | "key"
            | "scroll" | "carousel" | "intersect",
            _,
        ) => return Err(format!("wrong number of arguments for `{verb}`")),
        _ => return Err(format!("unknown event `{verb}`")),
    };
    Ok(event)
}

fn index_arg(arg: &str) -> Result<usize, String> {
    arg.parse()
        .map_err(|_| format!("`{arg}` is not a photo index"))
}

fn number_arg(arg: &str) -> Result<f64, String> {
    arg.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("`{arg}` is not a number"))
}

impl fmt::Display for GalleryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryEvent::FilterClicked(filter) => write!(f, "filter {filter}"),
            GalleryEvent::ViewClicked(mode) => write!(f, "view {mode}"),
            GalleryEvent::PhotoClicked(index) => write!(f, "click {index}"),
            GalleryEvent::CloseClicked => f.write_str("close"),
            GalleryEvent::BackdropClicked => f.write_str("backdrop"),
            GalleryEvent::PrevClicked => f.write_str("prev"),
            GalleryEvent::NextClicked => f.write_str("next"),
            GalleryEvent::KeyPressed(key) => write!(f, "key {}", key.name()),
        }
    }
}
