//! Dark-page detection.
//!
//! Before anything is repainted, the page's own background decides whether it
//! already ships a dark theme. The body background is authoritative; the root
//! background is only consulted when the body has none that parses, and a page
//! with neither counts as light.
//!
//! Two dark-page rules exist and they disagree on direction:
//!
//! | Rule | Dark when |
//! |------|-----------|
//! | [`DarkPagePolicy::LowLuminance`] (default) | luma < 80 |
//! | [`DarkPagePolicy::HighLuminance`] | luma > 175 |
//!
//! Both are available as policies. The result is reported, and only changes
//! the palette when [`ThemeConfig::swap_palette_on_dark`] is on.
//!
//! [`ThemeConfig::swap_palette_on_dark`]: crate::config::ThemeConfig::swap_palette_on_dark

use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::color::ColorSample;
use crate::dom::{Document, NodeId};
use crate::error::ConfigError;

const BACKGROUND: &str = "background-color";

/// Whether a page reads as light or dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ColorMode {
    pub fn is_dark(&self) -> bool {
        matches!(self, ColorMode::Dark)
    }
}

/// The luminance rule that marks a page background as dark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum DarkPagePolicy {
    /// Dark when the background luma is below `threshold`.
    LowLuminance { threshold: f64 },
    /// Dark when the background luma is above `threshold`.
    HighLuminance { threshold: f64 },
}

impl Default for DarkPagePolicy {
    fn default() -> Self {
        DarkPagePolicy::LowLuminance { threshold: 80.0 }
    }
}

impl DarkPagePolicy {
    pub fn mode_for(&self, background: &ColorSample) -> ColorMode {
        let luma = background.luma();
        let dark = match *self {
            DarkPagePolicy::LowLuminance { threshold } => luma < threshold,
            DarkPagePolicy::HighLuminance { threshold } => luma > threshold,
        };
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let (DarkPagePolicy::LowLuminance { threshold }
        | DarkPagePolicy::HighLuminance { threshold }) = *self;
        if (0.0..=255.0).contains(&threshold) {
            Ok(())
        } else {
            Err(ConfigError::invalid(
                "theme.policy.threshold",
                format!("{} is outside 0-255", threshold),
            ))
        }
    }
}

/// Decides once whether a page already uses a dark theme.
#[derive(Debug, Clone, Default)]
pub struct ThemeDetector {
    policy: DarkPagePolicy,
}

impl ThemeDetector {
    pub fn new(policy: DarkPagePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DarkPagePolicy {
        self.policy
    }

    /// Reads the body, then root, background and applies the policy.
    ///
    /// `classifier` supplies the parser (and its alpha floor); its palette is
    /// not used.
    pub fn detect<D: Document>(&self, doc: &D, classifier: &Classifier) -> ColorMode {
        let background = |node: Option<NodeId>| {
            node.and_then(|n| classifier.parse(&doc.computed_value(n, BACKGROUND)))
        };

        let sample = background(doc.body()).or_else(|| background(doc.document_element()));

        let mode = match sample {
            Some(sample) => self.policy.mode_for(&sample),
            None => ColorMode::Light,
        };
        tracing::debug!(?mode, policy = ?self.policy, "detected page color mode");
        mode
    }
}
