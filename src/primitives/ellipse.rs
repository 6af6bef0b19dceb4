use glam::{DVec2, dvec2};

use super::{Appearance, Attrs, Primitive, svg_num};
use crate::geometry::{BoundingBox, rotate_box90};
use crate::tree::Element;

const OWNED: &[&str] = &["x", "y", "width", "height", "diameter", "style", "antialias"];

/// An ellipse, or a circle when read from a `<circle>` tag.
///
/// A circle keeps a single diameter: it scales by the smaller factor so it
/// stays round.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipsePart {
    /// Top-left corner of the bounding box
    pub pos: DVec2,
    pub size: DVec2,
    pub circle: bool,
    pub appearance: Appearance,
}

impl EllipsePart {
    pub fn from_node(node: &Element) -> Self {
        let get = |key| node.attr_f64(key).unwrap_or(0.0);
        let circle = node.name == "circle";
        let size = if circle {
            DVec2::splat(get("diameter"))
        } else {
            dvec2(get("width"), get("height"))
        };
        Self {
            pos: dvec2(get("x"), get("y")),
            size,
            circle,
            appearance: Appearance::from_node(node),
        }
    }

    pub fn center(&self) -> DVec2 {
        self.pos + self.size / 2.0
    }
}

impl Primitive for EllipsePart {
    fn tag(&self) -> &'static str {
        if self.circle { "circle" } else { "ellipse" }
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
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        self.pos *= dvec2(fx, fy);
        if self.circle {
            self.size *= fx.min(fy);
        } else {
            self.size *= dvec2(fx, fy);
        }
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_point(self.pos);
        bounds.expand_point(self.pos + self.size);
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        let mut attrs = Attrs::new(decimals);
        attrs.num("x", self.pos.x).num("y", self.pos.y);
        if self.circle {
            attrs.num("diameter", self.size.x);
        } else {
            attrs.num("width", self.size.x).num("height", self.size.y);
        }
        attrs.appearance(&self.appearance);
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        let center = self.center();
        let svg = Element::new("ellipse")
            .with_attr("cx", svg_num(center.x, decimals))
            .with_attr("cy", svg_num(center.y, decimals))
            .with_attr("rx", svg_num(self.size.x / 2.0, decimals))
            .with_attr("ry", svg_num(self.size.y / 2.0, decimals));
        self.appearance.paint(svg)
    }
}
