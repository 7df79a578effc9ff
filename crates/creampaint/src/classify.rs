//! Two-tone classification.
//!
//! Every parseable color is reduced to one of two palette colors by a single
//! brightness test: samples at or above the threshold become the light target,
//! everything else the dark target.

use crate::color::{parse_color, ColorSample, Rgb};
use crate::config::{Palette, RepaintConfig};

/// Maps colors onto a two-color palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    palette: Palette,
    threshold: f64,
    min_alpha: f64,
}

impl Classifier {
    pub fn new(palette: Palette, threshold: f64, min_alpha: f64) -> Self {
        Self {
            palette,
            threshold,
            min_alpha,
        }
    }

    pub fn from_config(config: &RepaintConfig) -> Self {
        Self::new(config.palette, config.luminance_threshold, config.min_alpha)
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Replaces the target palette, keeping thresholds.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn min_alpha(&self) -> f64 {
        self.min_alpha
    }

    /// Picks the target color for an already parsed sample.
    pub fn classify(&self, sample: &ColorSample) -> Rgb {
        if sample.luma() >= self.threshold {
            self.palette.light
        } else {
            self.palette.dark
        }
    }

    /// Parses `value` with this classifier's alpha floor.
    pub fn parse(&self, value: &str) -> Option<ColorSample> {
        parse_color(value, self.min_alpha)
    }

    /// Parses and classifies a resolved color string.
    ///
    /// `None` means "leave the original value alone".
    pub fn to_two_tone(&self, value: &str) -> Option<Rgb> {
        self.parse(value).map(|sample| self.classify(&sample))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&RepaintConfig::default())
    }
}
