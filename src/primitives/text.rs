use glam::{DVec2, dvec2};

use super::font::{DEFAULT_FONT_SIZE, FontDescriptor};
use super::{Attrs, Primitive, svg_num};
use crate::geometry::{BoundingBox, rotate_point90};
use crate::tree::Element;

const OWNED: &[&str] = &["x", "y", "size", "rotation", "text", "font", "color"];

pub(crate) const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Static text
#[derive(Debug, Clone, PartialEq)]
pub struct TextPart {
    /// Anchor (baseline start)
    pub pos: DVec2,
    /// Degrees, clockwise
    pub rotation: f64,
    pub text: String,
    pub font: FontDescriptor,
    pub color: String,
}

/// Font from the `font` attribute, or one synthesized from a legacy `size`
pub(crate) fn read_font(node: &Element) -> FontDescriptor {
    node.attr("font")
        .and_then(FontDescriptor::parse)
        .unwrap_or_else(|| {
            FontDescriptor::legacy(node.attr_f64("size").unwrap_or(DEFAULT_FONT_SIZE))
        })
}

/// Text extent: a square around the anchor as large as the font. Empty
/// texts and the `_` placeholder take no room.
pub(crate) fn text_bounds(pos: DVec2, text: &str, size: f64, bounds: &mut BoundingBox) {
    if text.is_empty() || text == "_" {
        return;
    }
    bounds.expand_point(pos - DVec2::splat(size));
    bounds.expand_point(pos + DVec2::splat(size));
}

/// Fill an SVG `<text>` with content, one `tspan` per line
pub(crate) fn text_content(mut svg: Element, text: &str, size: f64) -> Element {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= 1 {
        return svg.with_text(text);
    }
    for (i, line) in lines.into_iter().enumerate() {
        let mut span = Element::new("tspan").with_attr("x", "0");
        if i > 0 {
            span.set_attr("dy", format!("{}pt", svg_num(size * 1.2, 2)));
        }
        svg.push_child(span.with_text(line));
    }
    svg
}

/// Font presentation attributes for an SVG `<text>`
pub(crate) fn font_attributes(
    svg: Element,
    font: &FontDescriptor,
    color: &str,
    decimals: usize,
) -> Element {
    let mut svg = svg
        .with_attr("font-family", font.family.as_str())
        .with_attr("font-size", format!("{}pt", svg_num(font.point_size, decimals)));
    if font.bold() {
        svg.set_attr("font-weight", "bold");
    }
    if font.italic() {
        svg.set_attr("font-style", "italic");
    }
    let decoration: Vec<&str> = [
        (font.underline(), "underline"),
        (font.strike_out(), "line-through"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !decoration.is_empty() {
        svg.set_attr("text-decoration", decoration.join(" "));
    }
    svg.with_attr("fill", color)
}

impl TextPart {
    pub fn from_node(node: &Element) -> Self {
        Self {
            pos: dvec2(
                node.attr_f64("x").unwrap_or(0.0),
                node.attr_f64("y").unwrap_or(0.0),
            ),
            rotation: node.attr_f64("rotation").unwrap_or(0.0),
            text: node.attr("text").unwrap_or_default().to_string(),
            font: read_font(node),
            color: node
                .attr("color")
                .unwrap_or(DEFAULT_TEXT_COLOR)
                .to_string(),
        }
    }
}

impl Primitive for TextPart {
    fn tag(&self) -> &'static str {
        "text"
    }

    fn flip(&mut self) {
        self.pos.y = -self.pos.y;
    }

    fn mirror(&mut self) {
        self.pos.x = -self.pos.x;
    }

    fn rotate90(&mut self) {
        self.pos = rotate_point90(self.pos);
        self.rotation = (self.rotation + 90.0).rem_euclid(360.0);
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        self.pos *= dvec2(fx, fy);
        self.font.point_size *= fx.min(fy);
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        text_bounds(self.pos, &self.text, self.font.point_size, bounds);
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        let mut attrs = Attrs::new(decimals);
        attrs
            .num("x", self.pos.x)
            .num("y", self.pos.y)
            .int("rotation", self.rotation)
            .text("text", self.text.as_str())
            .text("font", self.font.to_string())
            .text("color", self.color.as_str());
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        let mut transform = format!(
            "translate({}, {})",
            svg_num(self.pos.x, decimals),
            svg_num(self.pos.y, decimals)
        );
        if self.rotation != 0.0 {
            transform.push_str(&format!(" rotate({})", svg_num(self.rotation, 0)));
        }
        let svg = Element::new("text").with_attr("transform", transform);
        let svg = font_attributes(svg, &self.font, &self.color, decimals);
        text_content(svg, &self.text, self.font.point_size)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{attr_line, node};
    use super::*;
    use crate::tree::write_document;

    #[test]
    fn upgrades_legacy_size() {
        let text = TextPart::from_node(&node(r#"<text x="2" y="3" size="7" text="K1"/>"#));
        let mut out = node(r#"<text x="2" y="3" size="7" text="K1"/>"#);
        text.write(&mut out, 2);
        assert_eq!(
            attr_line(&out),
            "x=2 y=3 rotation=0 text=K1 font=Sans Serif,7,-1,5,50,0,0,0,0,0 color=#000000"
        );
    }

    #[test]
    fn scale_keeps_aspect_of_font() {
        let mut text = TextPart::from_node(&node(
            r#"<text x="10" y="10" text="A" font="Sans Serif,10,-1,5,50,0,0,0,0,0"/>"#,
        ));
        text.scale(2.0, 0.5);
        assert_eq!(text.pos, dvec2(20.0, 5.0));
        assert_eq!(text.font.point_size, 5.0);
    }

    #[test]
    fn rotation_accumulates() {
        let original = TextPart::from_node(&node(r#"<text x="4" y="-2" rotation="270" text="A"/>"#));
        let mut text = original.clone();
        text.rotate90();
        assert_eq!(text.rotation, 0.0);
        assert_eq!(text.pos, dvec2(2.0, 4.0));
        for _ in 0..3 {
            text.rotate90();
        }
        assert_eq!(text, original);
    }

    #[test]
    fn extent_skips_placeholders() {
        let mut bounds = BoundingBox::new();
        TextPart::from_node(&node(r#"<text x="100" y="100" text="_"/>"#)).extend_bounds(&mut bounds);
        assert_eq!(bounds, BoundingBox::new());
        TextPart::from_node(&node(r#"<text x="100" y="100" text="A" size="9"/>"#))
            .extend_bounds(&mut bounds);
        assert_eq!(bounds.max, dvec2(109.0, 109.0));
    }

    #[test]
    fn multi_line_svg() {
        let text = TextPart {
            pos: dvec2(1.0, 2.0),
            rotation: 90.0,
            text: "L1\nL2".to_string(),
            font: FontDescriptor::legacy(10.0),
            color: "#FF0000".to_string(),
        };
        insta::assert_snapshot!(write_document(&text.to_svg(2)).unwrap(), @r##"
        <text transform="translate(1, 2) rotate(90)" font-family="Sans Serif" font-size="10pt" fill="#FF0000">
            <tspan x="0">L1</tspan>
            <tspan x="0" dy="12pt">L2</tspan>
        </text>
        "##);
    }
}
