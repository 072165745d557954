//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content directory overrides any
//! subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Фотоальбом"
//! subtitle = "Наши лучшие воспоминания"
//! all_label = "Все"               # label of the unfiltered button
//!
//! [gallery]
//! default_view = "grid"           # grid | masonry | carousel
//! image_dir = "images"            # prefix joined with each photo's file name
//! on_filter_change = "close"      # close | clamp (simulate only)
//!
//! [dates]
//! locale = "ru"                   # ru | en | de | fr | es
//!
//! [effects]
//! particles = 50                  # floating particles (0 disables)
//! seed = "konfetka"               # particle placement seed
//! stars_parallax = 0.5            # scroll factor of the stars layer
//! twinkling_parallax = 0.3        # scroll factor of the twinkling layer
//! entrance_step = 0.1             # seconds between photo entrance animations
//! loading_delay_ms = 1000         # loading overlay duration (0 disables)
//! loading_text = "Загружаем воспоминания..."
//! sparkle = true                  # sparkle burst on photo click
//!
//! [colors]
//! background_from = "#1e3c72"
//! background_to = "#2a5298"
//! accent = "#ff6b6b"
//! text = "#ffffff"
//! card = "rgba(255, 255, 255, 0.1)"
//! sparkle = "#ffd700"
//!
//! [processing]
//! max_processes = 4               # page rendering workers (omit for auto)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [dates]
//! locale = "en"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

use crate::dates::DateLocale;
use crate::lightbox::FilterChangePolicy;
use crate::view::ViewMode;

/// Config file name inside the content directory.
pub const CONFIG_FILE: &str = "config.toml";

const MAX_PARTICLES: u32 = 500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page title and subtitle.
    pub site: SiteInfo,
    /// Gallery behavior: initial view, image location, lightbox policy.
    pub gallery: GalleryConfig,
    /// Date display.
    pub dates: DatesConfig,
    /// Decorative effects.
    pub effects: EffectsConfig,
    /// Color palette, emitted as CSS custom properties.
    pub colors: ColorConfig,
    /// Parallel page rendering.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.image_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.image_dir must not be empty".into(),
            ));
        }
        let escapes = Path::new(&self.gallery.image_dir).components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes {
            return Err(ConfigError::Validation(format!(
                "gallery.image_dir `{}` must be a relative path inside the content directory",
                self.gallery.image_dir
            )));
        }
        if self.effects.particles > MAX_PARTICLES {
            return Err(ConfigError::Validation(format!(
                "effects.particles must be at most {MAX_PARTICLES}"
            )));
        }
        for (name, factor) in [
            ("effects.stars_parallax", self.effects.stars_parallax),
            ("effects.twinkling_parallax", self.effects.twinkling_parallax),
        ] {
            if !(0.0..=1.0).contains(&factor) {
                return Err(ConfigError::Validation(format!("{name} must be 0.0-1.0")));
            }
        }
        let step = self.effects.entrance_step;
        if step.is_nan() || step < 0.0 {
            return Err(ConfigError::Validation(
                "effects.entrance_step must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub subtitle: String,
    /// Label of the unfiltered "all photos" button.
    pub all_label: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Фотоальбом".to_string(),
            subtitle: "Наши лучшие воспоминания".to_string(),
            all_label: "Все".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Layout shown before any view button is used.
    pub default_view: ViewMode,
    /// Directory prefix for photo files, relative to the site root.
    pub image_dir: String,
    /// What an open lightbox does when the filter changes underneath it.
    pub on_filter_change: FilterChangePolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_view: ViewMode::Grid,
            image_dir: "images".to_string(),
            on_filter_change: FilterChangePolicy::Close,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatesConfig {
    pub locale: DateLocale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Number of floating particles in the background.
    pub particles: u32,
    /// Seed for particle placement, so rebuilds are byte-identical.
    pub seed: String,
    /// `translateY` per scrolled pixel for the stars layer.
    pub stars_parallax: f64,
    /// `translateY` per scrolled pixel for the twinkling layer.
    pub twinkling_parallax: f64,
    /// Delay between successive photo entrance animations, in seconds.
    pub entrance_step: f64,
    /// How long the loading overlay stays up, in milliseconds.
    pub loading_delay_ms: u32,
    pub loading_text: String,
    pub sparkle: bool,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particles: 50,
            seed: "konfetka".to_string(),
            stars_parallax: 0.5,
            twinkling_parallax: 0.3,
            entrance_step: 0.1,
            loading_delay_ms: 1000,
            loading_text: "Загружаем воспоминания...".to_string(),
            sparkle: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Start of the page background gradient.
    pub background_from: String,
    /// End of the page background gradient.
    pub background_to: String,
    /// Highlights: active buttons, loader ring, carousel progress.
    pub accent: String,
    pub text: String,
    /// Translucent card background behind each photo.
    pub card: String,
    pub sparkle: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background_from: "#1e3c72".to_string(),
            background_to: "#2a5298".to_string(),
            accent: "#ff6b6b".to_string(),
            text: "#ffffff".to_string(),
            card: "rgba(255, 255, 255, 0.1)".to_string(),
            sparkle: "#ffd700".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page rendering workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Konfetka Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "Фотоальбом"
subtitle = "Наши лучшие воспоминания"

# Label of the "all photos" filter button.
all_label = "Все"

# ---------------------------------------------------------------------------
# Gallery behavior
# ---------------------------------------------------------------------------
[gallery]
# Layout shown on the front page: "grid", "masonry" or "carousel".
default_view = "grid"

# Directory holding the photo files, relative to the content root.
# Copied to the output as-is and used as the <img src> prefix.
image_dir = "images"

# What an open lightbox does when the visible photos change. Applies to
# `konfetka simulate` only: filter links in the built site always lead to
# a page with the lightbox closed.
#   "close" - close the lightbox
#   "clamp" - stay open, moving onto the last photo if needed
on_filter_change = "close"

# ---------------------------------------------------------------------------
# Dates
# ---------------------------------------------------------------------------
[dates]
# Long date format: "ru" (15 января 2024 г.), "en" (January 15, 2024),
# "de", "fr" or "es".
locale = "ru"

# ---------------------------------------------------------------------------
# Effects
# ---------------------------------------------------------------------------
[effects]
# Floating background particles (0 disables, at most 500).
particles = 50

# Particle placement seed. Same seed, same sky.
seed = "konfetka"

# Parallax: background layer movement per scrolled pixel (0.0-1.0).
stars_parallax = 0.5
twinkling_parallax = 0.3

# Seconds between successive photo entrance animations.
entrance_step = 0.1

# Loading overlay duration in milliseconds (0 disables) and its text.
loading_delay_ms = 1000
loading_text = "Загружаем воспоминания..."

# Sparkle burst when a photo is clicked.
sparkle = true

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background_from = "#1e3c72"
background_to = "#2a5298"
accent = "#ff6b6b"
text = "#ffffff"
card = "rgba(255, 255, 255, 0.1)"
sparkle = "#ffd700"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg-from: {bg_from};
    --color-bg-to: {bg_to};
    --color-accent: {accent};
    --color-text: {text};
    --color-card: {card};
    --color-sparkle: {sparkle};
}}"#,
        bg_from = colors.background_from,
        bg_to = colors.background_to,
        accent = colors.accent,
        text = colors.text,
        card = colors.card,
        sparkle = colors.sparkle,
    )
}
