//! # Konfetka
//!
//! A photo album generator. A fixed catalog of photos is filtered by
//! category, laid out as a grid, masonry or carousel, and inspected in a
//! lightbox with keyboard navigation, under a layer of decorative effects
//! (parallax starfield, floating particles, click sparkles).
//!
//! # Architecture: State Machine, Rendered Statically
//!
//! All behavior lives in one explicit state machine, [`gallery::Gallery`]:
//!
//! ```text
//! filter  ∈ { all, <category>... }
//! view    ∈ { grid, masonry, carousel }
//! lightbox ∈ { closed, open(i) }   with i < len(visible)
//! ```
//!
//! The machine is driven two ways:
//!
//! ```text
//! build      walk every reachable state  →  dist/ (one HTML page per state)
//! simulate   replay an event script      →  transcript of transitions
//! ```
//!
//! In the generated site every transition is a link to the page of the state
//! it leads to. The embedded script only maps keys onto those links and runs
//! the cosmetic effects, so the site works from `file://` and with scripts off.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | `photos.toml` loading and validation |
//! | [`filter`] | Category filter over the catalog |
//! | [`view`] | Layout modes and their container classes |
//! | [`lightbox`] | Open/closed lightbox state and navigation bounds |
//! | [`gallery`] | The controller owning all session state |
//! | [`events`] | Gallery and effect events, event-script parser |
//! | [`render`] | Maud markup for photos, bars and the lightbox |
//! | [`shell`] | Page layout with validated mount points |
//! | [`effects`] | Lazy loading, parallax, particles, carousel progress |
//! | [`dates`] | Localized long-form dates |
//! | [`site`] | `build` and `check`: load content, plan and write pages |
//! | [`simulate`] | Event replay against an in-memory session |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Page Per State
//!
//! The number of reachable states is small: `(categories + 1) × 3` gallery
//! pages plus one lightbox page per visible photo in each. Writing them all
//! out keeps the output plain HTML with no client-side routing, and makes
//! every state linkable.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a build error, and all interpolation is escaped, which matters for
//! titles and descriptions taken verbatim from the catalog.
//!
//! ## Mount Points Checked Up Front
//!
//! A custom `shell.html` is parsed before anything renders. A missing required
//! mount point fails the build by name rather than yielding pages with no
//! photo container.

pub mod catalog;
pub mod config;
pub mod dates;
pub mod effects;
pub mod events;
pub mod filter;
pub mod gallery;
pub mod lightbox;
pub mod output;
pub mod render;
pub mod shell;
pub mod simulate;
pub mod site;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
