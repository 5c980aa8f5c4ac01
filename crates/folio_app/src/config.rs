//! Application configuration presets.
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! seed = 7
//!
//! [reveal]
//! threshold = 0.25
//! distance = 40.0
//!
//! [scene]
//! particle_count = 20
//! ```

use folio_animation::Easing;
use folio_core::Margin;
use folio_trigger::ViewportConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scroll reveal settings for sections entering the viewport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction needed before a section reveals.
    pub threshold: f32,
    /// Bottom root margin in pixels; negative values reveal later.
    pub root_margin_bottom: f32,
    /// Reveal again every time a section re-enters.
    pub repeat: bool,
    /// Offset of the hidden state in pixels.
    pub distance: f32,
    /// Reveal duration in seconds.
    pub duration: f32,
    /// Easing name, e.g. `"ease-out"` or `"power2.out"`.
    pub ease: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom: -50.0,
            repeat: false,
            distance: 30.0,
            duration: 0.8,
            ease: "ease-out".to_string(),
        }
    }
}

impl RevealConfig {
    pub fn easing(&self) -> Easing {
        Easing::resolve(&self.ease)
    }
}

/// Pointer parallax settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub enabled: bool,
    /// Pixels of travel per unit of normalized pointer position.
    pub strength: f32,
    /// Vertical travel of the heading relative to horizontal.
    pub heading_y_factor: f32,
    pub heading_duration: f32,
    /// Horizontal factor of shape `i` is `shape_x_base + i * shape_x_step`.
    pub shape_x_base: f32,
    pub shape_x_step: f32,
    /// Vertical factor of shape `i` is `shape_y_base + i * shape_y_step`.
    pub shape_y_base: f32,
    pub shape_y_step: f32,
    pub shape_duration: f32,
    pub ease: String,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 10.0,
            heading_y_factor: 0.5,
            heading_duration: 0.8,
            shape_x_base: 0.2,
            shape_x_step: 0.1,
            shape_y_base: 0.1,
            shape_y_step: 0.05,
            shape_duration: 1.0,
            ease: "power2.out".to_string(),
        }
    }
}

impl ParallaxConfig {
    pub fn easing(&self) -> Easing {
        Easing::resolve(&self.ease)
    }

    /// Per-axis multipliers for the shape at `index`
    pub fn shape_factors(&self, index: usize) -> (f32, f32) {
        let i = index as f32;
        (
            self.shape_x_base + i * self.shape_x_step,
            self.shape_y_base + i * self.shape_y_step,
        )
    }
}

/// Decorative element counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub particle_count: usize,
    pub shape_count: usize,
    pub morph_box_count: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            shape_count: 8,
            morph_box_count: 3,
        }
    }
}

/// Configuration for the portfolio application.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub reveal: RevealConfig,
    pub parallax: ParallaxConfig,
    pub scene: SceneConfig,
    /// Seed for random value rules; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl FolioConfig {
    /// Standard configuration matching the live site.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Minimal configuration for low-power devices.
    pub fn minimal() -> Self {
        Self {
            parallax: ParallaxConfig {
                enabled: false,
                ..ParallaxConfig::default()
            },
            scene: SceneConfig {
                particle_count: 10,
                shape_count: 3,
                morph_box_count: 2,
            },
            ..Self::default()
        }
    }

    /// Testing configuration with a fixed seed and small scenes.
    pub fn testing() -> Self {
        Self {
            scene: SceneConfig {
                particle_count: 4,
                shape_count: 2,
                morph_box_count: 2,
            },
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FolioConfig = toml::from_str(text)?;
        tracing::debug!("Loaded folio config: {:?}", config);
        Ok(config)
    }

    /// Set the reveal settings.
    pub fn with_reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    /// Set the parallax settings.
    pub fn with_parallax(mut self, parallax: ParallaxConfig) -> Self {
        self.parallax = parallax;
        self
    }

    /// Set the scene element counts.
    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Viewport trigger options for scroll reveals.
    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig::new()
            .with_threshold(self.reveal.threshold)
            .with_root_margin(Margin::bottom(self.reveal.root_margin_bottom))
            .with_repeat(self.reveal.repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_matches_site() {
        let config = FolioConfig::standard();
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.reveal.root_margin_bottom, -50.0);
        assert_eq!(config.reveal.easing(), Easing::EaseOut);
        assert_eq!(config.scene.particle_count, 50);
        assert_eq!(config.scene.shape_count, 8);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_presets_differ() {
        assert!(!FolioConfig::minimal().parallax.enabled);
        assert_eq!(FolioConfig::testing().seed, Some(42));
        assert!(FolioConfig::testing().scene.particle_count < 50);
    }

    #[test]
    fn test_partial_toml() {
        let config = FolioConfig::from_toml_str(
            r#"
            seed = 7

            [reveal]
            threshold = 0.25
            ease = "power2.out"

            [scene]
            particle_count = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.reveal.threshold, 0.25);
        assert_eq!(config.reveal.distance, 30.0);
        assert_eq!(config.reveal.easing(), Easing::PowerOut(2));
        assert_eq!(config.scene.particle_count, 20);
        assert_eq!(config.scene.shape_count, 8);
        assert_eq!(config.parallax, ParallaxConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = FolioConfig::from_toml_str("[reveal]\nthreshold = \"high\"").unwrap_err();
        assert!(matches!(err, crate::AppError::Config(_)));
    }

    #[test]
    fn test_viewport_config() {
        let viewport = FolioConfig::standard()
            .with_reveal(RevealConfig {
                threshold: 3.0,
                repeat: true,
                ..RevealConfig::default()
            })
            .viewport_config();

        assert_eq!(viewport.threshold, 1.0);
        assert_eq!(viewport.root_margin, Margin::bottom(-50.0));
        assert!(viewport.repeat);
    }

    #[test]
    fn test_shape_factors() {
        let parallax = ParallaxConfig::default();
        let (x, y) = parallax.shape_factors(2);
        assert!((x - 0.4).abs() < 1e-4);
        assert!((y - 0.2).abs() < 1e-4);
    }
}
