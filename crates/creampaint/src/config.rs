//! Repaint configuration.
//!
//! All tuning lives in one immutable [`RepaintConfig`] handed to each component
//! when it is built. The defaults are the shipped constants; a config file only
//! needs the keys it changes:
//!
//! ```yaml
//! palette:
//!   light: [250, 240, 210]
//! batch_size: 250
//! theme:
//!   policy:
//!     rule: high-luminance
//!     threshold: 175
//! ```
//!
//! ```rust
//! use creampaint::RepaintConfig;
//!
//! let config = RepaintConfig::from_yaml("batch_size: 250").unwrap();
//! assert_eq!(config.batch_size, 250);
//! assert_eq!(config.luminance_threshold, 160.0);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, DEFAULT_MIN_ALPHA};
use crate::error::ConfigError;
use crate::theme::DarkPagePolicy;

/// `#FFF3D6`
pub const CREAM: Rgb = Rgb(255, 243, 214);

/// A softer black than `#000`.
pub const SOFT_BLACK: Rgb = Rgb(18, 18, 18);

/// Recognized config file extensions, in lookup priority order.
pub const CONFIG_EXTENSIONS: &[&str] = &[".yaml", ".yml", ".json"];

/// The two target colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Written for colors at or above the luminance threshold.
    pub light: Rgb,
    /// Written for everything darker.
    pub dark: Rgb,
}

impl Palette {
    pub fn swapped(self) -> Self {
        Self {
            light: self.dark,
            dark: self.light,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light: CREAM,
            dark: SOFT_BLACK,
        }
    }
}

/// What periodic rescans do with elements that were already processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RescanPolicy {
    /// Already processed elements are skipped; only new ones are painted.
    #[default]
    RespectMark,
    /// Every element is re-read and repainted on each periodic scan.
    BypassMark,
}

/// Dark-page detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub policy: DarkPagePolicy,
    /// Exchange light and dark targets when the page is detected as dark.
    pub swap_palette_on_dark: bool,
}

/// Everything the repaint loop can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepaintConfig {
    pub palette: Palette,
    /// Luma at or above which a color counts as light (0-255 scale).
    pub luminance_threshold: f64,
    /// Colors fainter than this alpha are never touched.
    pub min_alpha: f64,
    /// Boxes narrower or shorter than this (px) keep their background.
    pub min_box_size: f64,
    /// Elements processed per animation frame during a scan.
    pub batch_size: usize,
    /// Descendants processed per added subtree on the mutation path.
    pub mutation_descendant_cap: usize,
    pub rescan_interval_ms: u64,
    /// How long after start the periodic rescan keeps running.
    pub rescan_window_ms: u64,
    pub rescan_policy: RescanPolicy,
    /// Process inserted subtrees as the host reports them. Removals are
    /// tracked either way.
    pub observe_mutations: bool,
    /// Force the light target onto the root and body backgrounds at start.
    pub pin_root_background: bool,
    pub theme: ThemeConfig,
}

impl Default for RepaintConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            luminance_threshold: 160.0,
            min_alpha: DEFAULT_MIN_ALPHA,
            min_box_size: 8.0,
            batch_size: 500,
            mutation_descendant_cap: 400,
            rescan_interval_ms: 3_000,
            rescan_window_ms: 5 * 60 * 1_000,
            rescan_policy: RescanPolicy::default(),
            observe_mutations: true,
            pin_root_background: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl RepaintConfig {
    pub fn rescan_interval(&self) -> Duration {
        Duration::from_millis(self.rescan_interval_ms)
    }

    pub fn rescan_window(&self) -> Duration {
        Duration::from_millis(self.rescan_window_ms)
    }

    /// Parses and validates a YAML config.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the format by extension.
    ///
    /// `.json` files are read as JSON, everything else as YAML (a superset).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Looks for `<stem>.yaml`, `<stem>.yml`, `<stem>.json` in `dir`, in that order.
    pub fn find_in(dir: impl AsRef<Path>, stem: &str) -> Option<std::path::PathBuf> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| dir.as_ref().join(format!("{}{}", stem, ext)))
            .find(|p| p.is_file())
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=255.0).contains(&self.luminance_threshold) {
            return Err(ConfigError::invalid(
                "luminance_threshold",
                format!("{} is outside 0-255", self.luminance_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_alpha) {
            let message = format!("{} is outside 0-1", self.min_alpha);
            return Err(ConfigError::invalid("min_alpha", message));
        }
        if !self.min_box_size.is_finite() || self.min_box_size < 0.0 {
            return Err(ConfigError::invalid(
                "min_box_size",
                format!("{} is not a non-negative size", self.min_box_size),
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("batch_size", "must be at least 1"));
        }
        if self.rescan_interval_ms == 0 {
            return Err(ConfigError::invalid("rescan_interval_ms", "must be at least 1"));
        }
        self.theme.policy.validate()
    }
}
