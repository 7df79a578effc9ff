//! Resolved color parsing.
//!
//! Browsers serialize resolved colors in the legacy functional form, so this
//! parser only accepts that shape:
//!
//! - `rgb(r, g, b)` / `rgba(r, g, b, a)`
//! - `rgb(r, g, b / a)` (slash alpha, some engines emit this)
//!
//! Everything else (named colors, hex, `hsl()`, `currentcolor`, gradients) is
//! reported as "not representable" and callers leave the original value alone.
//! So is `transparent`, and so is any color whose alpha falls below the
//! minimum-visibility threshold: touching nearly invisible colors would make
//! invisible elements visible.
//!
//! # Example
//!
//! ```rust
//! use creampaint::color::{parse_color, ColorSample, DEFAULT_MIN_ALPHA};
//!
//! let sample = parse_color("rgba(255, 0, 0, 0.5)", DEFAULT_MIN_ALPHA).unwrap();
//! assert_eq!(sample, ColorSample { r: 255.0, g: 0.0, b: 0.0, a: 0.5 });
//!
//! assert!(parse_color("transparent", DEFAULT_MIN_ALPHA).is_none());
//! assert!(parse_color("#ff0000", DEFAULT_MIN_ALPHA).is_none());
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Alpha below which a color is treated as invisible and left untouched.
pub const DEFAULT_MIN_ALPHA: f64 = 0.12;

const CHANNELS: &str = r"([0-9.]+)\s*,\s*([0-9.]+)\s*,\s*([0-9.]+)";
const SLASH_ALPHA: &str = r"(?:\s*/\s*([0-9.]+)\s*)?";
const COMMA_ALPHA: &str = r"(?:\s*,\s*([0-9.]+))?";

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"^rgba?\(\s*{CHANNELS}{SLASH_ALPHA}{COMMA_ALPHA}\s*\)$");
    Regex::new(&pattern).expect("rgb() pattern is valid")
});

/// A parsed color with clamped channels.
///
/// Channels stay fractional: resolved values such as `rgb(12.5, 0, 0)` are
/// classified as written, not rounded first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ColorSample {
    /// Rec. 601 weighted brightness on the 0-255 scale.
    pub fn luma(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

/// An opaque target color.
///
/// Serializes as an `[r, g, b]` triple and displays in the same
/// `rgb(r, g, b)` form browsers use for resolved values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Brightness of this color, using the same weights as [`ColorSample::luma`].
    pub fn luma(&self) -> f64 {
        self.sample().luma()
    }

    /// This color as an opaque sample.
    pub fn sample(&self) -> ColorSample {
        ColorSample {
            r: self.0 as f64,
            g: self.1 as f64,
            b: self.2 as f64,
            a: 1.0,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Parses a resolved CSS color.
///
/// Returns `None` for unsupported syntax, for `transparent`, and for colors
/// whose alpha is below `min_alpha`.
pub fn parse_color(value: &str, min_alpha: f64) -> Option<ColorSample> {
    let value = value.trim().to_lowercase();
    if value.is_empty() || value == "transparent" {
        return None;
    }

    let caps = RGB_FUNCTION.captures(&value)?;
    let channel = |i: usize| clamp_channel(number(caps.get(i).map(|m| m.as_str())));

    let alpha = caps
        .get(4)
        .or_else(|| caps.get(5))
        .map(|m| clamp_alpha(number(Some(m.as_str()))))
        .unwrap_or(1.0);

    if alpha < min_alpha {
        return None;
    }

    Some(ColorSample {
        r: channel(1),
        g: channel(2),
        b: channel(3),
        a: alpha,
    })
}

/// Numeric tokens are digit/dot runs; malformed runs such as `1.2.3` read as NaN.
fn number(token: Option<&str>) -> f64 {
    token
        .and_then(|t| t.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn clamp_channel(n: f64) -> f64 {
    if n.is_finite() {
        n.clamp(0.0, 255.0)
    } else {
        0.0
    }
}

fn clamp_alpha(n: f64) -> f64 {
    if n.is_finite() {
        n.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<ColorSample> {
        parse_color(s, DEFAULT_MIN_ALPHA)
    }

    // =========================================================================
    // Accepted syntax
    // =========================================================================

    #[test]
    fn test_parse_rgb() {
        assert_eq!(
            parse("rgb(10, 20, 30)"),
            Some(ColorSample {
                r: 10.0,
                g: 20.0,
                b: 30.0,
                a: 1.0
            })
        );
    }

    #[test]
    fn test_parse_rgba_comma_alpha() {
        let c = parse("rgba(0, 0, 0, 0.9)").unwrap();
        assert_eq!(c.a, 0.9);
    }

    #[test]
    fn test_parse_slash_alpha() {
        let c = parse("rgb(1, 2, 3 / 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 2.0, 3.0, 0.5));
    }

    #[test]
    fn test_slash_alpha_wins_over_comma_alpha() {
        let c = parse("rgba(1, 2, 3 / 0.5, 0.9)").unwrap();
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn test_parse_trims_and_ignores_case() {
        let c = parse("  RGBA( 255 ,255,255 ,1 )  ").unwrap();
        assert_eq!(c.r, 255.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_parse_keeps_fractional_channels() {
        let c = parse("rgb(12.5, 0.25, 7.)").unwrap();
        assert_eq!((c.r, c.g, c.b), (12.5, 0.25, 7.0));
    }

    // =========================================================================
    // Clamping
    // =========================================================================

    #[test]
    fn test_channels_clamp_to_255() {
        let c = parse("rgb(300, 999, 256)").unwrap();
        assert_eq!((c.r, c.g, c.b), (255.0, 255.0, 255.0));
    }

    #[test]
    fn test_alpha_clamps_to_one() {
        assert_eq!(parse("rgba(0, 0, 0, 7)").unwrap().a, 1.0);
    }

    #[test]
    fn test_malformed_number_clamps_to_zero() {
        let c = parse("rgb(1.2.3, 40, 50)").unwrap();
        assert_eq!(c.r, 0.0);
        assert_eq!(c.g, 40.0);
    }

    #[test]
    fn test_malformed_alpha_reads_as_zero_and_is_dropped() {
        assert!(parse("rgba(10, 10, 10, 0.1.1)").is_none());
    }

    // =========================================================================
    // Rejected input
    // =========================================================================

    #[test]
    fn test_transparent_is_not_representable() {
        assert!(parse("transparent").is_none());
        assert!(parse(" TRANSPARENT ").is_none());
    }

    #[test]
    fn test_faint_alpha_is_dropped() {
        assert!(parse("rgba(255, 255, 255, 0.11)").is_none());
        assert!(parse("rgba(255, 255, 255, 0)").is_none());
        assert!(parse("rgba(255, 255, 255, 0.12)").is_some());
    }

    #[test]
    fn test_other_syntaxes_are_not_representable() {
        for s in [
            "",
            "red",
            "#ffffff",
            "hsl(0, 100%, 50%)",
            "currentcolor",
            "linear-gradient(red, blue)",
            "rgb(50%, 0%, 0%)",
            "rgb(-1, 0, 0)",
            "rgb(1 2 3)",
            "rgb(1, 2)",
            "rgb(1, 2, 3) extra",
        ] {
            assert!(parse(s).is_none(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_min_alpha_is_configurable() {
        assert!(parse_color("rgba(0, 0, 0, 0.3)", 0.5).is_none());
        assert!(parse_color("rgba(0, 0, 0, 0.05)", 0.0).is_some());
    }

    // =========================================================================
    // Rgb
    // =========================================================================

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb(255, 243, 214).to_string(), "rgb(255, 243, 214)");
    }

    #[test]
    fn test_rgb_display_parses_back() {
        let c = parse(&Rgb(18, 18, 18).to_string()).unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (18.0, 18.0, 18.0, 1.0));
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(Rgb(0, 0, 0).luma(), 0.0);
        assert!((Rgb(255, 255, 255).luma() - 255.0).abs() < 1e-9);
        assert!((Rgb(100, 0, 0).luma() - 29.9).abs() < 1e-9);
    }
}
