//! Shadow list rewriting.
//!
//! Shadows (`box-shadow`, `text-shadow`) carry their color inside a longer
//! value, possibly several times:
//!
//! ```text
//! 0 1px 2px rgba(0, 0, 0, 0.3), inset 0 0 4px rgb(255, 255, 255)
//! ```
//!
//! Each `rgb()`/`rgba()` token is classified on its own and swapped in place.
//! Offsets, blur, spread and `inset` are copied through untouched, as is any
//! token that does not classify (too faint, malformed).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::classify::Classifier;

static RGB_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)rgba?\([^)]+\)").expect("rgb token pattern is valid"));

/// Rewrites the color tokens of a shadow list.
///
/// Returns `None` when nothing was replaced: for `none`, for empty values and
/// for lists with no classifiable color.
///
/// ```rust
/// use creampaint::{rewrite_shadow, Classifier};
///
/// let classifier = Classifier::default();
/// assert_eq!(
///     rewrite_shadow("2px 2px 3px rgba(0,0,0,0.9)", &classifier).as_deref(),
///     Some("2px 2px 3px rgb(18, 18, 18)"),
/// );
/// assert_eq!(rewrite_shadow("none", &classifier), None);
/// ```
pub fn rewrite_shadow(value: &str, classifier: &Classifier) -> Option<String> {
    if value.is_empty() || value == "none" {
        return None;
    }

    let mut changed = false;
    let rewritten = RGB_TOKEN.replace_all(value, |caps: &Captures| {
        let token = &caps[0];
        match classifier.to_two_tone(token) {
            Some(target) => {
                changed = true;
                target.to_string()
            }
            None => token.to_string(),
        }
    });

    changed.then(|| rewritten.into_owned())
}
