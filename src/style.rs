//! Element style strings and their SVG presentation attributes.
//!
//! Primitives carry a style such as
//! `line-style:dashed;line-weight:thin;filling:none;color:black`. The grammar
//! lives in `style.pest`; anything it cannot make sense of falls back to a
//! normal, one unit wide black stroke without fill.

use pest::Parser;
use pest_derive::Parser;

use crate::format::format_value;

#[derive(Parser)]
#[grammar = "style.pest"]
struct StyleParser;

/// Color used for names missing from [`NAMED_COLORS`]
pub const FALLBACK_COLOR: &str = "#696969";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Normal,
    Dotted,
    Dashed,
    DashDotted,
}

impl LineStyle {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(LineStyle::Normal),
            "dotted" => Some(LineStyle::Dotted),
            "dashed" => Some(LineStyle::Dashed),
            "dashdotted" => Some(LineStyle::DashDotted),
            _ => None,
        }
    }

    /// Dash pattern in multiples of the stroke width
    fn pattern(self) -> &'static [f64] {
        match self {
            LineStyle::Normal => &[],
            LineStyle::Dotted => &[1.0, 2.0],
            LineStyle::Dashed => &[4.0, 2.0],
            LineStyle::DashDotted => &[4.0, 2.0, 1.0, 2.0],
        }
    }
}

/// Stroke weights; the odd spellings are the file format's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineWeight {
    None,
    Thin,
    #[default]
    Normal,
    Hight,
    Eleve,
}

impl LineWeight {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(LineWeight::None),
            "thin" => Some(LineWeight::Thin),
            "normal" => Some(LineWeight::Normal),
            "hight" => Some(LineWeight::Hight),
            "eleve" => Some(LineWeight::Eleve),
            _ => None,
        }
    }

    pub fn stroke_width(self) -> f64 {
        match self {
            LineWeight::None => 0.0,
            LineWeight::Thin => 0.25,
            LineWeight::Normal => 1.0,
            LineWeight::Hight => 2.0,
            LineWeight::Eleve => 5.0,
        }
    }
}

/// A parsed style string
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub line_style: LineStyle,
    pub line_weight: LineWeight,
    /// Fill color name as written in the element
    pub filling: String,
    /// Stroke color name as written in the element
    pub color: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_style: LineStyle::Normal,
            line_weight: LineWeight::Normal,
            filling: "none".to_string(),
            color: "black".to_string(),
        }
    }
}

impl Style {
    /// Parse a style string. Unknown keys and values are ignored.
    pub fn parse(source: &str) -> Style {
        let mut style = Style::default();
        let Ok(mut pairs) = StyleParser::parse(Rule::style, source) else {
            return style;
        };
        let Some(root) = pairs.next() else {
            return style;
        };

        for declaration in root.into_inner() {
            if declaration.as_rule() != Rule::declaration {
                continue;
            }
            let mut inner = declaration.into_inner();
            let key = inner.next().map(|p| p.as_str().trim()).unwrap_or_default();
            let value = inner.next().map(|p| p.as_str().trim()).unwrap_or_default();
            match key {
                "line-style" => {
                    if let Some(line_style) = LineStyle::from_name(value) {
                        style.line_style = line_style;
                    }
                }
                "line-weight" => {
                    if let Some(weight) = LineWeight::from_name(value) {
                        style.line_weight = weight;
                    }
                }
                "filling" if !value.is_empty() => style.filling = value.to_string(),
                "color" if !value.is_empty() => style.color = value.to_string(),
                _ => {}
            }
        }
        style
    }

    pub fn stroke_width(&self) -> f64 {
        self.line_weight.stroke_width()
    }

    /// `stroke-dasharray` value, absent for solid or invisible strokes
    pub fn dasharray(&self) -> Option<String> {
        let width = self.stroke_width();
        let pattern = self.line_style.pattern();
        if pattern.is_empty() || width == 0.0 {
            return None;
        }
        let dashes: Vec<String> = pattern.iter().map(|m| format_value(m * width, 2)).collect();
        Some(dashes.join(","))
    }

    pub fn fill(&self) -> &'static str {
        resolve_color(&self.filling)
    }

    pub fn stroke(&self) -> &'static str {
        resolve_color(&self.color)
    }

    /// Presentation attributes in output order
    pub fn svg_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::with_capacity(4);
        if let Some(dashes) = self.dasharray() {
            attrs.push(("stroke-dasharray", dashes));
        }
        attrs.push(("stroke-width", format_value(self.stroke_width(), 2)));
        attrs.push(("fill", self.fill().to_string()));
        attrs.push(("stroke", self.stroke().to_string()));
        attrs
    }

    /// Presentation attributes as they appear inside an SVG tag
    pub fn to_svg_fragment(&self) -> String {
        self.svg_attributes()
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Look up a color name used in element styles.
///
/// Returns `"none"` for `none` and [`FALLBACK_COLOR`] for unknown names.
pub fn resolve_color(name: &str) -> &'static str {
    NAMED_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, hex)| *hex)
        .unwrap_or(FALLBACK_COLOR)
}

// ============================================================================
// Color table
// ============================================================================

/// Color names understood by the element editor
pub const NAMED_COLORS: &[(&str, &str)] = &[
    ("white", "#FFFFFF"),
    ("black", "#000000"),
    ("green", "#00FF00"),
    ("red", "#FF0000"),
    ("blue", "#0000FF"),
    ("gray", "#A0A0A4"),
    ("grey", "#A0A0A4"),
    ("brun", "#A52A2A"),
    ("brown", "#A52A2A"),
    ("yellow", "#FFFF00"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
    ("lightgray", "#D3D3D3"),
    ("orange", "#FFA500"),
    ("purple", "#A020F0"),
    ("HTMLPinkPink", "#FFC0CB"),
    ("HTMLPinkLightPink", "#FFB6C1"),
    ("HTMLPinkHotPink", "#FF69B4"),
    ("HTMLPinkDeepPink", "#FF1493"),
    ("HTMLPinkPaleVioletRed", "#DB7093"),
    ("HTMLPinkMediumVioletRed", "#C71585"),
    ("HTMLRedLightSalmon", "#FFA07A"),
    ("HTMLRedSalmon", "#FA8072"),
    ("HTMLRedDarkSalmon", "#E9967A"),
    ("HTMLRedLightCoral", "#F08080"),
    ("HTMLRedIndianRed", "#CD5C5C"),
    ("HTMLRedCrimson", "#DC143C"),
    ("HTMLRedFirebrick", "#B22222"),
    ("HTMLRedDarkRed", "#8B0000"),
    ("HTMLRedRed", "#FF0000"),
    ("HTMLOrangeOrangeRed", "#FF4500"),
    ("HTMLOrangeTomato", "#FF6347"),
    ("HTMLOrangeCoral", "#FF7F50"),
    ("HTMLOrangeDarkOrange", "#FF8C00"),
    ("HTMLOrangeOrange", "#FFA500"),
    ("HTMLYellowYellow", "#FFFF00"),
    ("HTMLYellowLightYellow", "#FFFFE0"),
    ("HTMLYellowLemonChiffon", "#FFFACD"),
    ("HTMLYellowLightGoldenrodYellow", "#FAFAD2"),
    ("HTMLYellowPapayaWhip", "#FFEFD5"),
    ("HTMLYellowMoccasin", "#FFE4B5"),
    ("HTMLYellowPeachPuff", "#FFDAB9"),
    ("HTMLYellowPaleGoldenrod", "#EEE8AA"),
    ("HTMLYellowKhaki", "#F0E68C"),
    ("HTMLYellowDarkKhaki", "#BDB76B"),
    ("HTMLYellowGold", "#FFD700"),
    ("HTMLBrownCornsilk", "#FFF8DC"),
    ("HTMLBrownBlanchedAlmond", "#FFEBCD"),
    ("HTMLBrownBisque", "#FFE4C4"),
    ("HTMLBrownNavajoWhite", "#FFDEAD"),
    ("HTMLBrownWheat", "#F5DEB3"),
    ("HTMLBrownBurlywood", "#DEB887"),
    ("HTMLBrownTan", "#D2B48C"),
    ("HTMLBrownRosyBrown", "#BC8F8F"),
    ("HTMLBrownSandyBrown", "#F4A460"),
    ("HTMLBrownGoldenrod", "#DAA520"),
    ("HTMLBrownDarkGoldenrod", "#B8860B"),
    ("HTMLBrownPeru", "#CD853F"),
    ("HTMLBrownChocolate", "#D2691E"),
    ("HTMLBrownSaddleBrown", "#8B4513"),
    ("HTMLBrownSienna", "#A0522D"),
    ("HTMLBrownBrown", "#A52A2A"),
    ("HTMLBrownMaroon", "#B03060"),
    ("HTMLGreenDarkOliveGreen", "#556B2F"),
    ("HTMLGreenOlive", "#808000"),
    ("HTMLGreenOliveDrab", "#6B8E23"),
    ("HTMLGreenYellowGreen", "#9ACD32"),
    ("HTMLGreenLimeGreen", "#32CD32"),
    ("HTMLGreenLime", "#C0FF00"),
    ("HTMLGreenLawnGreen", "#7CFC00"),
    ("HTMLGreenChartreuse", "#7FFF00"),
    ("HTMLGreenGreenYellow", "#ADFF2F"),
    ("HTMLGreenSpringGreen", "#00FF7F"),
    ("HTMLGreenMediumSpringGreen", "#00FA9A"),
    ("HTMLGreenLightGreen", "#90EE90"),
    ("HTMLGreenPaleGreen", "#98FB98"),
    ("HTMLGreenDarkSeaGreen", "#8FBC8F"),
    ("HTMLGreenMediumAquamarine", "#66CDAA"),
    ("HTMLGreenMediumSeaGreen", "#3CB371"),
    ("HTMLGreenSeaGreen", "#2E8B57"),
    ("HTMLGreenForestGreen", "#228B22"),
    ("HTMLGreenGreen", "#00FF00"),
    ("HTMLGreenDarkGreen", "#006400"),
    ("HTMLCyanAqua", "#00FFFF"),
    ("HTMLCyanCyan", "#00FFFF"),
    ("HTMLCyanLightCyan", "#E0FFFF"),
    ("HTMLCyanPaleTurquoise", "#AFEEEE"),
    ("HTMLCyanAquamarine", "#7FFFD4"),
    ("HTMLCyanTurquoise", "#40E0D0"),
    ("HTMLCyanMediumTurquoise", "#48D1CC"),
    ("HTMLCyanDarkTurquoise", "#00CED1"),
    ("HTMLCyanLightSeaGreen", "#20B2AA"),
    ("HTMLCyanCadetBlue", "#5F9EA0"),
    ("HTMLCyanDarkCyan", "#008B8B"),
    ("HTMLCyanTeal", "#008080"),
    ("HTMLBlueLightSteelBlue", "#B0C4DE"),
    ("HTMLBluePowderBlue", "#B0E0E6"),
    ("HTMLBlueLightBlue", "#ADD8E6"),
    ("HTMLBlueSkyBlue", "#87CEEB"),
    ("HTMLBlueLightSkyBlue", "#87CEFA"),
    ("HTMLBlueDeepSkyBlue", "#00BFFF"),
    ("HTMLBlueDodgerBlue", "#1E90FF"),
    ("HTMLBlueCornflowerBlue", "#6495ED"),
    ("HTMLBlueSteelBlue", "#4682B4"),
    ("HTMLBlueRoyalBlue", "#4169E1"),
    ("HTMLBlueBlue", "#0000FF"),
    ("HTMLBlueMediumBlue", "#0000CD"),
    ("HTMLBlueDarkBlue", "#00008B"),
    ("HTMLBlueNavy", "#000080"),
    ("HTMLBlueMidnightBlue", "#191970"),
    ("HTMLPurpleLavender", "#E6E6FA"),
    ("HTMLPurpleThistle", "#D8BFD8"),
    ("HTMLPurplePlum", "#DDA0DD"),
    ("HTMLPurpleViolet", "#EE82EE"),
    ("HTMLPurpleOrchid", "#DA70D6"),
    ("HTMLPurpleFuchsia", "#FF00FF"),
    ("HTMLPurpleMagenta", "#FF00FF"),
    ("HTMLPurpleMediumOrchid", "#BA55D3"),
    ("HTMLPurpleMediumPurple", "#9370DB"),
    ("HTMLPurpleBlueViolet", "#8A2BE2"),
    ("HTMLPurpleDarkViolet", "#9400D3"),
    ("HTMLPurpleDarkOrchid", "#9932CC"),
    ("HTMLPurpleDarkMagenta", "#8B008B"),
    ("HTMLPurplePurple", "#800080"),
    ("HTMLPurpleIndigo", "#4B0082"),
    ("HTMLPurpleDarkSlateBlue", "#483D8B"),
    ("HTMLPurpleSlateBlue", "#6A5ACD"),
    ("HTMLPurpleMediumSlateBlue", "#7B68EE"),
    ("HTMLWhiteWhite", "#FFFFFF"),
    ("HTMLWhiteSnow", "#FFFAFA"),
    ("HTMLWhiteHoneydew", "#F0FFF0"),
    ("HTMLWhiteMintCream", "#F5FFFA"),
    ("HTMLWhiteAzure", "#F0FFFF"),
    ("HTMLWhiteAliceBlue", "#F0F8FF"),
    ("HTMLWhiteGhostWhite", "#F8F8FF"),
    ("HTMLWhiteWhiteSmoke", "#F5F5F5"),
    ("HTMLWhiteSeashell", "#FFF5EE"),
    ("HTMLWhiteBeige", "#F5F5DC"),
    ("HTMLWhiteOldLace", "#FDF5E6"),
    ("HTMLWhiteFloralWhite", "#FFFAF0"),
    ("HTMLWhiteIvory", "#FFFFF0"),
    ("HTMLWhiteAntiqueWhite", "#FAEBD7"),
    ("HTMLWhiteLinen", "#FAF0E6"),
    ("HTMLWhiteLavenderBlush", "#FFF0F5"),
    ("HTMLWhiteMistyRose", "#FFE4E1"),
    ("HTMLGrayGainsboro", "#DCDCDC"),
    ("HTMLGrayLightGray", "#D3D3D3"),
    ("HTMLGraySilver", "#C0C0C0"),
    ("HTMLGrayDarkGray", "#A9A9A9"),
    ("HTMLGrayGray", "#808080"),
    ("HTMLGrayDimGray", "#696969"),
    ("HTMLGrayLightSlateGray", "#778899"),
    ("HTMLGraySlateGray", "#708090"),
    ("HTMLGrayDarkSlateGray", "#2F4F4F"),
    ("HTMLGrayBlack", "#000000"),
    ("none", "none"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_black_outline() {
        let style = Style::parse("line-style:dashed;line-weight:normal;filling:none;color:black");
        assert_eq!(
            style.to_svg_fragment(),
            r##"stroke-dasharray="4,2" stroke-width="1" fill="none" stroke="#000000""##
        );
    }

    #[test]
    fn dashes_follow_stroke_width() {
        let style = Style::parse("line-style:dashdotted;line-weight:hight");
        assert_eq!(style.dasharray().as_deref(), Some("8,4,2,4"));
        let style = Style::parse("line-style:dotted;line-weight:thin");
        assert_eq!(style.dasharray().as_deref(), Some("0.25,0.5"));
    }

    #[test]
    fn invisible_stroke_has_no_dashes() {
        let style = Style::parse("line-style:dashed;line-weight:none");
        assert_eq!(style.dasharray(), None);
        assert_eq!(style.stroke_width(), 0.0);
    }

    #[test]
    fn weights() {
        let widths: Vec<f64> = ["none", "thin", "normal", "hight", "eleve"]
            .iter()
            .map(|w| Style::parse(&format!("line-weight:{w}")).stroke_width())
            .collect();
        assert_eq!(widths, [0.0, 0.25, 1.0, 2.0, 5.0]);
    }

    #[test]
    fn colors_resolve_through_table() {
        let style = Style::parse("filling:HTMLBlueNavy;color:red");
        assert_eq!(style.fill(), "#000080");
        assert_eq!(style.stroke(), "#FF0000");
        assert_eq!(resolve_color("none"), "none");
        assert_eq!(resolve_color("chartreuse-ish"), FALLBACK_COLOR);
        assert_eq!(resolve_color("Black"), FALLBACK_COLOR);
    }

    #[test]
    fn malformed_styles_fall_back_to_defaults() {
        for source in ["", ";;;", "garbage", ":::", "line-style:", "line-weight:heavy", "color"] {
            let style = Style::parse(source);
            assert_eq!(style.line_style, LineStyle::Normal, "{source:?}");
            assert_eq!(style.line_weight, LineWeight::Normal, "{source:?}");
            assert_eq!(style.fill(), "none", "{source:?}");
            assert_eq!(style.stroke(), "#000000", "{source:?}");
        }
    }

    #[test]
    fn tolerates_spaces_and_trailing_separator() {
        let style = Style::parse(" line-style : dotted ; filling: white ;");
        assert_eq!(style.line_style, LineStyle::Dotted);
        assert_eq!(style.fill(), "#FFFFFF");
    }

    #[test]
    fn table_entries_are_hex_or_none() {
        assert!(NAMED_COLORS.len() > 140);
        for (name, value) in NAMED_COLORS {
            assert!(
                *value == "none" || (value.len() == 7 && value.starts_with('#')),
                "{name} -> {value}"
            );
        }
    }
}
