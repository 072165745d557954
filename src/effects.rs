//! Decorative effects.
//!
//! Nothing in here affects which photos are shown or which one the lightbox
//! is on. The pieces are small pure functions plus one tracker:
//!
//! - [`LazyLoader`]: single-shot lazy image loading
//! - [`parallax_offsets`]: background layer movement on scroll
//! - [`particles`]: deterministic floating particles
//! - [`carousel_progress`]: scroll progress bar for the carousel view
//! - [`entrance_delay`]: staggered photo entrance animations
//! - [`loading_overlay`], [`render_particles`], [`render_parallax_layer`]: markup
//!
//! Effects whose target element is missing from the page shell are skipped,
//! never an error.

use maud::{Markup, html};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::EffectsConfig;

// ============================================================================
// Lazy loading
// ============================================================================

/// Tracks which photo elements still wait for their real image.
///
/// Each element is observed once. The first intersection hands back the
/// source to swap in and stops observing; later intersections are ignored.
/// Re-rendering the container creates new elements, so it calls
/// [`LazyLoader::reset`].
#[derive(Debug, Clone, Default)]
pub struct LazyLoader {
    pending: BTreeMap<usize, String>,
    loaded: BTreeSet<usize>,
}

impl LazyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing the element at `index`. Already-loaded elements are
    /// never observed again.
    pub fn observe(&mut self, index: usize, src: impl Into<String>) {
        if !self.loaded.contains(&index) {
            self.pending.insert(index, src.into());
        }
    }

    /// The element entered the viewport. Returns the source to load on the
    /// first intersection only.
    pub fn intersect(&mut self, index: usize) -> Option<String> {
        let src = self.pending.remove(&index)?;
        self.loaded.insert(index);
        Some(src)
    }

    pub fn is_observing(&self, index: usize) -> bool {
        self.pending.contains_key(&index)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Forget every element.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.loaded.clear();
    }
}

// ============================================================================
// Parallax
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallaxLayer {
    Stars,
    Twinkling,
}

impl ParallaxLayer {
    pub fn class(self) -> &'static str {
        match self {
            ParallaxLayer::Stars => "stars",
            ParallaxLayer::Twinkling => "twinkling",
        }
    }

    pub fn factor(self, config: &EffectsConfig) -> f64 {
        match self {
            ParallaxLayer::Stars => config.stars_parallax,
            ParallaxLayer::Twinkling => config.twinkling_parallax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerOffset {
    pub layer: ParallaxLayer,
    /// `translateY` in pixels.
    pub offset: f64,
}

/// Offsets for the layers present on the page at scroll position `scroll_y`.
pub fn parallax_offsets(
    scroll_y: f64,
    config: &EffectsConfig,
    present: &[ParallaxLayer],
) -> Vec<LayerOffset> {
    present
        .iter()
        .map(|&layer| LayerOffset {
            layer,
            offset: scroll_y * layer.factor(config),
        })
        .collect()
}

pub fn render_parallax_layer(layer: ParallaxLayer, config: &EffectsConfig) -> Markup {
    html! {
        div class=(layer.class()) data-parallax=(layer.factor(config)) {}
    }
}

// ============================================================================
// Particles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal position, percent of the viewport.
    pub left: f64,
    /// Vertical position, percent of the viewport.
    pub top: f64,
    /// Float animation period in seconds, within [10, 20).
    pub duration: f64,
}

impl Particle {
    pub fn style(&self) -> String {
        format!(
            "left: {:.2}%; top: {:.2}%; animation-duration: {:.2}s;",
            self.left, self.top, self.duration
        )
    }
}

/// `count` particles placed from the SHA-256 of `seed` and each index.
pub fn particles(count: u32, seed: &str) -> Vec<Particle> {
    (0..count)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update(seed.as_bytes());
            hasher.update(i.to_le_bytes());
            let digest = hasher.finalize();
            Particle {
                left: unit(&digest[0..4]) * 100.0,
                top: unit(&digest[4..8]) * 100.0,
                duration: 10.0 + unit(&digest[8..12]) * 10.0,
            }
        })
        .collect()
}

/// Map four bytes onto [0, 1).
fn unit(bytes: &[u8]) -> f64 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    f64::from(u32::from_le_bytes(word)) / (f64::from(u32::MAX) + 1.0)
}

pub fn render_particles(particles: &[Particle]) -> Markup {
    html! {
        div.particles aria-hidden="true" {
            @for particle in particles {
                div.particle style=(particle.style()) {}
            }
        }
    }
}

// ============================================================================
// Carousel, entrance, loading overlay
// ============================================================================

/// Carousel scroll progress in percent, clamped to [0, 100].
///
/// A carousel that fits entirely in view has nothing to scroll and reports 0.
pub fn carousel_progress(scroll_left: f64, scroll_width: f64, client_width: f64) -> f64 {
    let range = scroll_width - client_width;
    if range.is_nan() || range <= 0.0 {
        return 0.0;
    }
    (scroll_left / range * 100.0).clamp(0.0, 100.0)
}

/// Entrance animation delay for the photo at `index`, in seconds.
pub fn entrance_delay(index: usize, step: f64) -> f64 {
    index as f64 * step
}

/// Full-screen loader shown while the page settles. The stylesheet fades it
/// out after `delay_ms`; nothing is rendered when the delay is zero.
pub fn loading_overlay(text: &str, delay_ms: u32) -> Markup {
    html! {
        @if delay_ms > 0 {
            div.loading-overlay style={ "animation-delay: " (delay_ms) "ms;" } data-delay=(delay_ms) {
                div.loader {
                    div.loader-circle {}
                    div.loader-text { (text) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_loader_swaps_once() {
        let mut lazy = LazyLoader::new();
        lazy.observe(0, "images/photo1.jpg");
        assert!(lazy.is_observing(0));
        assert_eq!(lazy.intersect(0).as_deref(), Some("images/photo1.jpg"));
        assert!(!lazy.is_observing(0));
        assert_eq!(lazy.intersect(0), None);
        assert_eq!(lazy.loaded_count(), 1);
    }

    #[test]
    fn lazy_loader_never_reobserves_loaded_element() {
        let mut lazy = LazyLoader::new();
        lazy.observe(2, "a.jpg");
        lazy.intersect(2);
        lazy.observe(2, "a.jpg");
        assert!(!lazy.is_observing(2));
        assert_eq!(lazy.intersect(2), None);
    }

    #[test]
    fn lazy_loader_ignores_unobserved() {
        let mut lazy = LazyLoader::new();
        assert_eq!(lazy.intersect(5), None);
        assert_eq!(lazy.loaded_count(), 0);
    }

    #[test]
    fn lazy_loader_reset_allows_new_elements() {
        let mut lazy = LazyLoader::new();
        lazy.observe(0, "a.jpg");
        lazy.intersect(0);
        lazy.reset();
        lazy.observe(0, "b.jpg");
        assert_eq!(lazy.intersect(0).as_deref(), Some("b.jpg"));
    }

    #[test]
    fn parallax_uses_layer_factors() {
        let config = EffectsConfig::default();
        let offsets = parallax_offsets(
            100.0,
            &config,
            &[ParallaxLayer::Stars, ParallaxLayer::Twinkling],
        );
        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets[0].offset, 50.0);
        assert!((offsets[1].offset - 30.0).abs() < 1e-9);
    }

    #[test]
    fn parallax_skips_absent_layers() {
        let config = EffectsConfig::default();
        assert!(parallax_offsets(300.0, &config, &[]).is_empty());
        let offsets = parallax_offsets(300.0, &config, &[ParallaxLayer::Twinkling]);
        assert_eq!(offsets.len(), 1);
        assert_eq!(offsets[0].layer, ParallaxLayer::Twinkling);
    }

    #[test]
    fn particles_are_deterministic_and_in_range() {
        let a = particles(50, "seed");
        let b = particles(50, "seed");
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        for p in &a {
            assert!((0.0..100.0).contains(&p.left));
            assert!((0.0..100.0).contains(&p.top));
            assert!((10.0..20.0).contains(&p.duration));
        }
        assert_ne!(particles(5, "other"), particles(5, "seed"));
    }

    #[test]
    fn zero_particles() {
        assert!(particles(0, "seed").is_empty());
        let html = render_particles(&[]).into_string();
        assert!(html.contains("particles"));
        assert!(!html.contains("particle\""));
    }

    #[test]
    fn particle_markup_has_inline_position() {
        let html = render_particles(&particles(3, "x")).into_string();
        assert_eq!(html.matches("class=\"particle\"").count(), 3);
        assert!(html.contains("animation-duration:"));
    }

    #[test]
    fn carousel_progress_percent() {
        assert_eq!(carousel_progress(0.0, 1200.0, 600.0), 0.0);
        assert_eq!(carousel_progress(300.0, 1200.0, 600.0), 50.0);
        assert_eq!(carousel_progress(600.0, 1200.0, 600.0), 100.0);
    }

    #[test]
    fn carousel_progress_degenerate_inputs() {
        assert_eq!(carousel_progress(0.0, 600.0, 600.0), 0.0);
        assert_eq!(carousel_progress(10.0, 500.0, 600.0), 0.0);
        assert_eq!(carousel_progress(900.0, 1200.0, 600.0), 100.0);
        assert_eq!(carousel_progress(-5.0, 1200.0, 600.0), 0.0);
        assert_eq!(carousel_progress(10.0, f64::NAN, 600.0), 0.0);
    }

    #[test]
    fn entrance_delays_stagger() {
        assert_eq!(entrance_delay(0, 0.1), 0.0);
        assert!((entrance_delay(3, 0.1) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn loading_overlay_markup() {
        let html = loading_overlay("Загружаем воспоминания...", 1000).into_string();
        assert!(html.contains("loading-overlay"));
        assert!(html.contains("animation-delay: 1000ms;"));
        assert!(html.contains("Загружаем воспоминания..."));
        assert!(loading_overlay("x", 0).into_string().is_empty());
    }

    #[test]
    fn parallax_layer_markup_carries_factor() {
        let html =
            render_parallax_layer(ParallaxLayer::Stars, &EffectsConfig::default()).into_string();
        assert!(html.contains(r#"class="stars""#));
        assert!(html.contains(r#"data-parallax="0.5""#));
    }
}
