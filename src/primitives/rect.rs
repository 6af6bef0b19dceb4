use glam::{DVec2, dvec2};

use super::{Appearance, Attrs, Primitive, svg_num};
use crate::geometry::{BoundingBox, rotate_box90};
use crate::tree::Element;

const OWNED: &[&str] = &["x", "y", "width", "height", "rx", "ry", "style", "antialias"];

/// A rectangle, optionally with rounded corners
#[derive(Debug, Clone, PartialEq)]
pub struct RectPart {
    /// Top-left corner
    pub pos: DVec2,
    pub size: DVec2,
    /// Corner radii
    pub radius: DVec2,
    pub appearance: Appearance,
}

impl RectPart {
    pub fn from_node(node: &Element) -> Self {
        let get = |key| node.attr_f64(key).unwrap_or(0.0);
        Self {
            pos: dvec2(get("x"), get("y")),
            size: dvec2(get("width"), get("height")),
            radius: dvec2(get("rx"), get("ry")),
            appearance: Appearance::from_node(node),
        }
    }
}

impl Primitive for RectPart {
    fn tag(&self) -> &'static str {
        "rect"
    }

    fn flip(&mut self) {
        self.pos.y = -self.pos.y - self.size.y;
    }

    fn mirror(&mut self) {
        self.pos.x = -self.pos.x - self.size.x;
    }

    fn rotate90(&mut self) {
        self.pos = rotate_box90(self.pos, self.size);
        self.size = dvec2(self.size.y, self.size.x);
        self.radius = dvec2(self.radius.y, self.radius.x);
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        let factor = dvec2(fx, fy);
        self.pos *= factor;
        self.size *= factor;
        self.radius *= factor;
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_point(self.pos);
        bounds.expand_point(self.pos + self.size);
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        let mut attrs = Attrs::new(decimals);
        attrs
            .num("x", self.pos.x)
            .num("y", self.pos.y)
            .num("width", self.size.x)
            .num("height", self.size.y)
            .num("rx", self.radius.x)
            .num("ry", self.radius.y)
            .appearance(&self.appearance);
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        let mut svg = Element::new("rect")
            .with_attr("x", svg_num(self.pos.x, decimals))
            .with_attr("y", svg_num(self.pos.y, decimals))
            .with_attr("width", svg_num(self.size.x, decimals))
            .with_attr("height", svg_num(self.size.y, decimals));
        if self.radius.x > 0.0 {
            svg.set_attr("rx", svg_num(self.radius.x, decimals));
        }
        if self.radius.y > 0.0 {
            svg.set_attr("ry", svg_num(self.radius.y, decimals));
        }
        self.appearance.paint(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{attr_line, node};
    use super::*;

    fn sample() -> RectPart {
        RectPart::from_node(&node(
            r#"<rect antialias="false" y="10" x="10" width="20" height="10" rx="2" style="line-style:normal"/>"#,
        ))
    }

    #[test]
    fn scales_per_axis() {
        let mut rect = sample();
        rect.scale(2.0, 0.5);
        let mut out = node("<rect/>");
        rect.write(&mut out, 2);
        assert_eq!(
            attr_line(&out),
            "x=20 y=5 width=40 height=5 rx=4 ry=0 style=line-style:normal antialias=false"
        );
    }

    #[test]
    fn four_rotations_are_identity() {
        let mut rect = sample();
        for _ in 0..4 {
            rect.rotate90();
        }
        assert_eq!(rect, sample());
    }

    #[test]
    fn rotation_swaps_size_and_radii() {
        let mut rect = sample();
        rect.rotate90();
        assert_eq!(rect.pos, dvec2(-20.0, 10.0));
        assert_eq!(rect.size, dvec2(10.0, 20.0));
        assert_eq!(rect.radius, dvec2(0.0, 2.0));
    }

    #[test]
    fn flip_and_mirror_are_involutions() {
        let mut rect = sample();
        rect.flip();
        assert_eq!(rect.pos, dvec2(10.0, -20.0));
        rect.flip();
        rect.mirror();
        assert_eq!(rect.pos, dvec2(-30.0, 10.0));
        rect.mirror();
        assert_eq!(rect, sample());
    }

    #[test]
    fn keeps_foreign_attributes_after_known_ones() {
        let rect = RectPart::from_node(&node(r#"<rect qet:foo="bar" x="1"/>"#));
        let mut out = node(r#"<rect qet:foo="bar" x="1"/>"#);
        rect.write(&mut out, 2);
        assert_eq!(attr_line(&out), "x=1 y=0 width=0 height=0 rx=0 ry=0 qet:foo=bar");
    }

    #[test]
    fn svg_skips_zero_radius() {
        let svg = sample().to_svg(2);
        assert_eq!(svg.attr("rx"), Some("2"));
        assert_eq!(svg.attr("ry"), None);
        assert_eq!(svg.attr("stroke"), Some("#000000"));
    }
}
