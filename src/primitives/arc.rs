use glam::{DVec2, dvec2};

use super::{Appearance, Attrs, Primitive, svg_num};
use crate::geometry::{BoundingBox, Extent, normalize_arc, rotate_box90, to_radians};
use crate::tree::Element;

const OWNED: &[&str] = &[
    "x", "y", "width", "height", "start", "angle", "style", "antialias",
];

/// An elliptical arc.
///
/// Angles are whole degrees, counter-clockwise on screen starting at three
/// o'clock. After every change both `start` and `sweep` are in `[0, 360)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPart {
    /// Top-left corner of the ellipse's bounding box
    pub pos: DVec2,
    pub size: DVec2,
    pub start: f64,
    pub sweep: f64,
    pub appearance: Appearance,
    /// Extent of the drawn outline, sampled every degree
    outline: Option<Extent>,
}

impl ArcPart {
    pub fn from_node(node: &Element) -> Self {
        let get = |key| node.attr_f64(key).unwrap_or(0.0);
        let mut arc = Self {
            pos: dvec2(get("x"), get("y")),
            size: dvec2(get("width"), get("height")),
            start: get("start"),
            sweep: get("angle"),
            appearance: Appearance::from_node(node),
            outline: None,
        };
        arc.normalize();
        arc
    }

    /// Canonical angles, then a fresh outline extent
    pub fn normalize(&mut self) {
        (self.start, self.sweep) = normalize_arc(self.start, self.sweep);
        self.outline = self.sample_outline();
    }

    /// Point on the ellipse at `degrees`
    pub fn point_at(&self, degrees: f64) -> DVec2 {
        let t = to_radians(degrees);
        self.pos + self.size / 2.0 * dvec2(1.0 + t.cos(), 1.0 - t.sin())
    }

    /// Bounds of the arc sampled at whole degrees from start to end.
    ///
    /// A 1° step can miss the true extreme by a fraction of a unit on large
    /// ellipses; existing elements were laid out with this approximation.
    fn sample_outline(&self) -> Option<Extent> {
        let first = self.start.round() as i64;
        let last = (self.start + self.sweep).round() as i64;
        Extent::of_points((first..=last).map(|degree| self.point_at(degree as f64)))
    }

    pub fn outline(&self) -> Option<Extent> {
        self.outline
    }
}

impl Primitive for ArcPart {
    fn tag(&self) -> &'static str {
        "arc"
    }

    fn flip(&mut self) {
        self.pos.y = -self.pos.y - self.size.y;
        self.start = -self.start;
        self.sweep = -self.sweep;
        self.normalize();
    }

    fn mirror(&mut self) {
        self.pos.x = -self.pos.x - self.size.x;
        self.start = 180.0 - self.start;
        self.sweep = -self.sweep;
        self.normalize();
    }

    fn rotate90(&mut self) {
        self.pos = rotate_box90(self.pos, self.size);
        self.size = dvec2(self.size.y, self.size.x);
        self.start -= 90.0;
        self.normalize();
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        self.pos *= dvec2(fx, fy);
        self.size *= dvec2(fx, fy);
        self.normalize();
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        if let Some(outline) = &self.outline {
            outline.add_to(bounds);
        }
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        let mut attrs = Attrs::new(decimals);
        attrs
            .num("x", self.pos.x)
            .num("y", self.pos.y)
            .num("width", self.size.x)
            .num("height", self.size.y)
            .int("start", self.start)
            .int("angle", self.sweep)
            .appearance(&self.appearance);
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        let radius = self.size / 2.0;
        let from = self.point_at(self.start);
        let to = self.point_at(self.start + self.sweep);
        let large_arc = if self.sweep <= 180.0 { "0" } else { "1" };
        let d = format!(
            "M {} {} A {} {} 0 {} 0 {} {}",
            svg_num(from.x, decimals),
            svg_num(from.y, decimals),
            svg_num(radius.x, decimals),
            svg_num(radius.y, decimals),
            large_arc,
            svg_num(to.x, decimals),
            svg_num(to.y, decimals),
        );
        self.appearance
            .paint(Element::new("path").with_attr("d", d))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{attr_line, node};
    use super::*;

    fn arc(start: f64, angle: f64) -> ArcPart {
        ArcPart::from_node(&node(&format!(
            r#"<arc x="-10" y="-10" width="20" height="20" start="{start}" angle="{angle}"/>"#
        )))
    }

    #[test]
    fn reads_normalized() {
        let a = arc(-20.0, 330.0);
        assert_eq!((a.start, a.sweep), (340.0, 330.0));
        let a = arc(350.0, -330.0);
        assert_eq!((a.start, a.sweep), (20.0, 330.0));
    }

    #[test]
    fn quarter_arc_outline() {
        // upper right quarter of a circle centered on the origin
        let a = arc(0.0, 90.0);
        let outline = a.outline().unwrap();
        assert!((outline.min - dvec2(0.0, -10.0)).length() < 1e-9);
        assert!((outline.max - dvec2(10.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn flip_reverses_direction() {
        let mut a = arc(0.0, 90.0);
        a.flip();
        // now the lower right quarter: from 270 to 360
        assert_eq!((a.start, a.sweep), (270.0, 90.0));
        let outline = a.outline().unwrap();
        assert!((outline.max - dvec2(10.0, 10.0)).length() < 1e-9);
        a.flip();
        assert_eq!(a, arc(0.0, 90.0));
    }

    #[test]
    fn mirror_reverses_direction() {
        let mut a = arc(0.0, 90.0);
        a.mirror();
        // upper left quarter: from 90 to 180
        assert_eq!((a.start, a.sweep), (90.0, 90.0));
        a.mirror();
        assert_eq!(a, arc(0.0, 90.0));
    }

    #[test]
    fn rotation_turns_start_clockwise() {
        let mut a = arc(0.0, 90.0);
        a.rotate90();
        assert_eq!((a.start, a.sweep), (270.0, 90.0));
        for _ in 0..3 {
            a.rotate90();
        }
        assert_eq!(a, arc(0.0, 90.0));
    }

    #[test]
    fn writes_whole_degrees() {
        let mut a = ArcPart::from_node(&node(
            r#"<arc x="0" y="0" width="10" height="10" start="44.6" angle="90.4" style="" antialias="false"/>"#,
        ));
        a.scale(1.5, 1.5);
        let mut out = node("<arc/>");
        a.write(&mut out, 2);
        assert_eq!(
            attr_line(&out),
            "x=0 y=0 width=15 height=15 start=45 angle=90 style= antialias=false"
        );
    }

    #[test]
    fn whole_turns_wrap() {
        let a = arc(30.0, 400.0);
        assert_eq!((a.start, a.sweep), (30.0, 40.0));
        let a = arc(0.0, 360.0);
        assert_eq!((a.start, a.sweep), (0.0, 0.0));
        let outline = a.outline().unwrap();
        assert_eq!(outline.min, outline.max);
    }

    #[test]
    fn svg_path() {
        let svg = arc(0.0, 90.0).to_svg(2);
        assert_eq!(svg.name, "path");
        assert_eq!(svg.attr("d"), Some("M 10 0 A 10 10 0 0 0 0 -10"));
        let svg = arc(0.0, 270.0).to_svg(2);
        assert_eq!(svg.attr("d"), Some("M 10 0 A 10 10 0 1 0 0 10"));
    }
}
