use glam::{DVec2, dvec2};

use super::{Attrs, Primitive};
use crate::format::format_int;
use crate::geometry::{BoundingBox, rotate_point90};
use crate::identity::new_uuid;
use crate::tree::Element;

const OWNED: &[&str] = &["x", "y", "orientation", "type", "name", "uuid"];

/// Half the side of the square a terminal occupies
const TERMINAL_REACH: f64 = 5.0;

/// Direction a terminal points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    N,
    E,
    S,
    W,
}

impl Orientation {
    /// Case-insensitive; anything unrecognized counts as north
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "e" | "E" => Orientation::E,
            "s" | "S" => Orientation::S,
            "w" | "W" => Orientation::W,
            _ => Orientation::N,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::N => "n",
            Orientation::E => "e",
            Orientation::S => "s",
            Orientation::W => "w",
        }
    }

    /// One step clockwise
    pub fn rotated(self) -> Self {
        match self {
            Orientation::N => Orientation::E,
            Orientation::E => Orientation::S,
            Orientation::S => Orientation::W,
            Orientation::W => Orientation::N,
        }
    }

    /// Mirror image across the X axis
    pub fn flipped(self) -> Self {
        match self {
            Orientation::N => Orientation::S,
            Orientation::S => Orientation::N,
            other => other,
        }
    }

    /// Mirror image across the Y axis
    pub fn mirrored(self) -> Self {
        match self {
            Orientation::E => Orientation::W,
            Orientation::W => Orientation::E,
            other => other,
        }
    }

    /// Rotation of the marker in SVG, which is drawn pointing north
    fn degrees(self) -> u32 {
        match self {
            Orientation::N => 0,
            Orientation::E => 90,
            Orientation::S => 180,
            Orientation::W => 270,
        }
    }
}

/// A connection point. Positions are always whole numbers in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalPart {
    pub pos: DVec2,
    pub orientation: Orientation,
    pub kind: String,
    pub name: String,
    pub uuid: String,
}

impl TerminalPart {
    pub fn from_node(node: &Element) -> Self {
        let text = |key: &str| node.attr(key).unwrap_or_default().to_string();
        let kind = match text("type") {
            kind if kind.is_empty() => "Generic".to_string(),
            kind => kind,
        };
        let uuid = match text("uuid") {
            uuid if uuid.is_empty() => new_uuid(),
            uuid => uuid,
        };
        Self {
            pos: dvec2(
                node.attr_f64("x").unwrap_or(0.0),
                node.attr_f64("y").unwrap_or(0.0),
            ),
            orientation: Orientation::parse(node.attr("orientation").unwrap_or_default()),
            kind,
            name: text("name"),
            uuid,
        }
    }

    /// The position as it is written out
    pub fn snapped(&self) -> DVec2 {
        self.pos.round()
    }
}

impl Primitive for TerminalPart {
    fn tag(&self) -> &'static str {
        "terminal"
    }

    fn flip(&mut self) {
        self.pos.y = -self.pos.y;
        self.orientation = self.orientation.flipped();
    }

    fn mirror(&mut self) {
        self.pos.x = -self.pos.x;
        self.orientation = self.orientation.mirrored();
    }

    fn rotate90(&mut self) {
        self.pos = rotate_point90(self.pos);
        self.orientation = self.orientation.rotated();
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        self.pos *= dvec2(fx, fy);
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        let center = self.snapped();
        bounds.expand_point(center - DVec2::splat(TERMINAL_REACH));
        bounds.expand_point(center + DVec2::splat(TERMINAL_REACH));
    }

    fn write(&self, node: &mut Element, _decimals: usize) {
        let mut attrs = Attrs::new(0);
        attrs
            .int("x", self.pos.x)
            .int("y", self.pos.y)
            .text("orientation", self.orientation.as_str())
            .text("type", self.kind.as_str());
        if !self.name.is_empty() {
            attrs.text("name", self.name.as_str());
        }
        attrs.text("uuid", self.uuid.as_str());
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, _decimals: usize) -> Element {
        let (x, y) = (format_int(self.pos.x), format_int(self.pos.y));
        let svg = Element::new("use")
            .with_attr("xlink:href", "#terminal")
            .with_attr("x", x.as_str())
            .with_attr("y", y.as_str());
        match self.orientation.degrees() {
            0 => svg,
            degrees => svg.with_attr("transform", format!("rotate({degrees} {x} {y})")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{attr_line, node};
    use super::*;

    fn terminal(xml: &str) -> TerminalPart {
        TerminalPart::from_node(&node(xml))
    }

    #[test]
    fn rotating_at_origin_turns_orientation() {
        let mut t = terminal(r#"<terminal x="0" y="0" orientation="n" uuid="{a}"/>"#);
        t.rotate90();
        assert_eq!(t.pos, DVec2::ZERO);
        assert_eq!(t.orientation, Orientation::E);
    }

    #[test]
    fn four_turns_are_identity() {
        let original = terminal(r#"<terminal x="3" y="-7" orientation="w" uuid="{a}"/>"#);
        let mut t = original.clone();
        t.rotate90();
        assert_eq!(t.pos, dvec2(7.0, 3.0));
        assert_eq!(t.orientation, Orientation::N);
        for _ in 0..3 {
            t.rotate90();
        }
        assert_eq!(t, original);
    }

    #[test]
    fn flip_and_mirror_swap_across_their_axis() {
        let mut t = terminal(r#"<terminal x="2" y="4" orientation="s" uuid="{a}"/>"#);
        t.flip();
        assert_eq!((t.pos, t.orientation), (dvec2(2.0, -4.0), Orientation::N));
        t.mirror();
        assert_eq!((t.pos, t.orientation), (dvec2(-2.0, -4.0), Orientation::N));

        let mut t = terminal(r#"<terminal x="2" y="4" orientation="E" uuid="{a}"/>"#);
        t.mirror();
        assert_eq!(t.orientation, Orientation::W);
        t.flip();
        assert_eq!(t.orientation, Orientation::W);
    }

    #[test]
    fn fills_in_defaults() {
        let t = terminal(r#"<terminal x="1" y="2"/>"#);
        assert_eq!(t.kind, "Generic");
        assert_eq!(t.orientation, Orientation::N);
        assert_eq!(t.uuid.len(), 38);
    }

    #[test]
    fn writes_whole_numbers() {
        let mut t = terminal(
            r#"<terminal uuid="{u}" name="A1" orientation="s" y="2.6" x="-1.4" type="Inner"/>"#,
        );
        t.scale(1.5, 1.0);
        let mut out = node("<terminal/>");
        t.write(&mut out, 3);
        assert_eq!(
            attr_line(&out),
            "x=-2 y=3 orientation=s type=Inner name=A1 uuid={u}"
        );
    }

    #[test]
    fn extent_is_a_square_around_the_grid_point() {
        let mut bounds = BoundingBox::new();
        terminal(r#"<terminal x="10.4" y="20.6" uuid="{a}"/>"#).extend_bounds(&mut bounds);
        assert_eq!(bounds.max, dvec2(15.0, 26.0));
        assert_eq!(bounds.min, DVec2::ZERO);
    }

    #[test]
    fn svg_marker_reference() {
        let t = terminal(r#"<terminal x="0" y="-10" orientation="e" uuid="{a}"/>"#);
        assert_eq!(
            attr_line(&t.to_svg(2)),
            "xlink:href=#terminal x=0 y=-10 transform=rotate(90 0 -10)"
        );
        let t = terminal(r#"<terminal x="5" y="5" orientation="n" uuid="{a}"/>"#);
        assert_eq!(attr_line(&t.to_svg(2)), "xlink:href=#terminal x=5 y=5");
    }
}
