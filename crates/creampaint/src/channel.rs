//! The style properties that get repainted.

use std::fmt;

/// How a channel's value is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// A single color, replaced wholesale.
    Plain,
    /// A single background color; skipped on very small boxes.
    Background,
    /// A shadow list; only embedded color tokens are replaced.
    Shadow,
    /// SVG paint (`fill`, `stroke`), replaced wholesale with no size guard.
    SvgPaint,
}

/// A recognized color-bearing CSS property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleChannel {
    Color,
    BackgroundColor,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    OutlineColor,
    TextDecorationColor,
    CaretColor,
    ColumnRuleColor,
    BoxShadow,
    TextShadow,
    Fill,
    Stroke,
}

impl StyleChannel {
    /// Every channel, in the order they are processed.
    pub const ALL: [StyleChannel; 14] = [
        StyleChannel::Color,
        StyleChannel::BackgroundColor,
        StyleChannel::BorderTopColor,
        StyleChannel::BorderRightColor,
        StyleChannel::BorderBottomColor,
        StyleChannel::BorderLeftColor,
        StyleChannel::OutlineColor,
        StyleChannel::TextDecorationColor,
        StyleChannel::CaretColor,
        StyleChannel::ColumnRuleColor,
        StyleChannel::BoxShadow,
        StyleChannel::TextShadow,
        StyleChannel::Fill,
        StyleChannel::Stroke,
    ];

    /// The CSS property name.
    pub fn property(&self) -> &'static str {
        match self {
            StyleChannel::Color => "color",
            StyleChannel::BackgroundColor => "background-color",
            StyleChannel::BorderTopColor => "border-top-color",
            StyleChannel::BorderRightColor => "border-right-color",
            StyleChannel::BorderBottomColor => "border-bottom-color",
            StyleChannel::BorderLeftColor => "border-left-color",
            StyleChannel::OutlineColor => "outline-color",
            StyleChannel::TextDecorationColor => "text-decoration-color",
            StyleChannel::CaretColor => "caret-color",
            StyleChannel::ColumnRuleColor => "column-rule-color",
            StyleChannel::BoxShadow => "box-shadow",
            StyleChannel::TextShadow => "text-shadow",
            StyleChannel::Fill => "fill",
            StyleChannel::Stroke => "stroke",
        }
    }

    pub fn kind(&self) -> ChannelKind {
        match self {
            StyleChannel::BackgroundColor => ChannelKind::Background,
            StyleChannel::BoxShadow | StyleChannel::TextShadow => ChannelKind::Shadow,
            StyleChannel::Fill | StyleChannel::Stroke => ChannelKind::SvgPaint,
            _ => ChannelKind::Plain,
        }
    }

    pub fn from_property(property: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.property().eq_ignore_ascii_case(property))
    }
}

impl fmt::Display for StyleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_background_color_is_guarded() {
        let guarded: Vec<_> = StyleChannel::ALL
            .iter()
            .filter(|c| c.kind() == ChannelKind::Background)
            .collect();
        assert_eq!(guarded, vec![&StyleChannel::BackgroundColor]);
    }

    #[test]
    fn test_shadow_and_svg_kinds() {
        assert_eq!(StyleChannel::BoxShadow.kind(), ChannelKind::Shadow);
        assert_eq!(StyleChannel::TextShadow.kind(), ChannelKind::Shadow);
        assert_eq!(StyleChannel::Fill.kind(), ChannelKind::SvgPaint);
        assert_eq!(StyleChannel::Stroke.kind(), ChannelKind::SvgPaint);
        assert_eq!(StyleChannel::CaretColor.kind(), ChannelKind::Plain);
    }

    #[test]
    fn test_from_property() {
        assert_eq!(
            StyleChannel::from_property("Column-Rule-Color"),
            Some(StyleChannel::ColumnRuleColor)
        );
        assert_eq!(StyleChannel::from_property("background-image"), None);
    }

    #[test]
    fn test_property_names_are_unique() {
        let mut names: Vec<_> = StyleChannel::ALL.iter().map(|c| c.property()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StyleChannel::ALL.len());
    }
}
