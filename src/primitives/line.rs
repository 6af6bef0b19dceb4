use glam::{DVec2, dvec2};

use super::{Appearance, Attrs, Primitive, svg_num};
use crate::config::TransformConfig;
use crate::errors::PartError;
use crate::geometry::{BoundingBox, rotate_point90, to_degrees};
use crate::style::LineStyle;
use crate::tree::Element;

const OWNED: &[&str] = &[
    "x1", "y1", "x2", "y2", "end1", "length1", "end2", "length2", "style", "antialias",
];

/// Default length of a line end decoration
pub const DEFAULT_END_LENGTH: f64 = 1.5;

/// Decoration drawn at one end of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnd {
    #[default]
    None,
    Simple,
    Triangle,
    Circle,
    Diamond,
}

impl LineEnd {
    pub fn from_name(name: &str) -> Self {
        match name {
            "simple" => LineEnd::Simple,
            "triangle" => LineEnd::Triangle,
            "circle" => LineEnd::Circle,
            "diamond" => LineEnd::Diamond,
            _ => LineEnd::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineEnd::None => "none",
            LineEnd::Simple => "simple",
            LineEnd::Triangle => "triangle",
            LineEnd::Circle => "circle",
            LineEnd::Diamond => "diamond",
        }
    }

    /// How far the stroke stops short of the line's end point
    pub fn inset(self, length: f64, stroke_width: f64) -> f64 {
        match self {
            LineEnd::None => 0.0,
            LineEnd::Simple => stroke_width / 2.0,
            LineEnd::Triangle | LineEnd::Circle | LineEnd::Diamond => length + stroke_width / 2.0,
        }
    }
}

/// A straight line with optional end decorations
#[derive(Debug, Clone, PartialEq)]
pub struct LinePart {
    pub from: DVec2,
    pub to: DVec2,
    pub end1: LineEnd,
    pub length1: f64,
    pub end2: LineEnd,
    pub length2: f64,
    pub appearance: Appearance,
}

fn coordinate(node: &Element, index: usize, axis: char) -> Result<f64, PartError> {
    let value = node
        .attr_f64(&format!("{axis}{index}"))
        .ok_or(PartError::MissingCoordinate { index, axis })?;
    if !value.is_finite() {
        return Err(PartError::NonFinite { index });
    }
    Ok(value)
}

impl LinePart {
    pub fn from_node(node: &Element) -> Result<Self, PartError> {
        Ok(Self {
            from: dvec2(coordinate(node, 1, 'x')?, coordinate(node, 1, 'y')?),
            to: dvec2(coordinate(node, 2, 'x')?, coordinate(node, 2, 'y')?),
            end1: LineEnd::from_name(node.attr("end1").unwrap_or_default()),
            length1: node.attr_f64("length1").unwrap_or(DEFAULT_END_LENGTH),
            end2: LineEnd::from_name(node.attr("end2").unwrap_or_default()),
            length2: node.attr_f64("length2").unwrap_or(DEFAULT_END_LENGTH),
            appearance: Appearance::from_node(node),
        })
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }

    /// Angle of the line in degrees, clockwise on screen
    pub fn angle(&self) -> f64 {
        let d = self.to - self.from;
        to_degrees(d.y.atan2(d.x))
    }

    fn decorated(&self) -> bool {
        self.end1 != LineEnd::None || self.end2 != LineEnd::None
    }
}

impl Primitive for LinePart {
    fn tag(&self) -> &'static str {
        "line"
    }

    fn flip(&mut self) {
        self.from.y = -self.from.y;
        self.to.y = -self.to.y;
    }

    fn mirror(&mut self) {
        self.from.x = -self.from.x;
        self.to.x = -self.to.x;
    }

    fn rotate90(&mut self) {
        self.from = rotate_point90(self.from);
        self.to = rotate_point90(self.to);
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        self.from *= dvec2(fx, fy);
        self.to *= dvec2(fx, fy);
        self.length1 *= fx.min(fy);
        self.length2 *= fx.min(fy);
    }

    fn finish(&mut self, config: &TransformConfig) -> Result<(), PartError> {
        let min = config.min_line_length();
        let length = self.length();
        if length < min {
            return Err(PartError::DegenerateLine { length, min });
        }
        Ok(())
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_point(self.from);
        bounds.expand_point(self.to);
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        let mut attrs = Attrs::new(decimals);
        attrs
            .num("x1", self.from.x)
            .num("y1", self.from.y)
            .num("x2", self.to.x)
            .num("y2", self.to.y)
            .text("end1", self.end1.name())
            .num("length1", self.length1)
            .text("end2", self.end2.name())
            .num("length2", self.length2)
            .appearance(&self.appearance);
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        let n = |v: f64| svg_num(v, decimals);
        if !self.decorated() {
            let svg = Element::new("line")
                .with_attr("x1", n(self.from.x))
                .with_attr("y1", n(self.from.y))
                .with_attr("x2", n(self.to.x))
                .with_attr("y2", n(self.to.y));
            return self.appearance.paint(svg);
        }

        // Drawn along the local X axis from 0 to the line's length.
        let length = self.length();
        let stroke_width = self.appearance.resolved().stroke_width();
        let start = self.end1.inset(self.length1, stroke_width);
        let end = length - self.end2.inset(self.length2, stroke_width);
        let stroke = Element::new("line")
            .with_attr("x1", n(start))
            .with_attr("y1", "0")
            .with_attr("x2", n(end))
            .with_attr("y2", "0");

        let mut group = Element::new("g").with_attr(
            "transform",
            format!(
                "translate({},{}) rotate({})",
                n(self.from.x),
                n(self.from.y),
                n(self.angle())
            ),
        );
        group.push_child(self.appearance.paint(stroke));
        let decorations = [
            (self.end1, self.length1, 0.0, 1.0),
            (self.end2, self.length2, length, -1.0),
        ];
        for (kind, size, tip, direction) in decorations {
            if let Some(shape) = self.decoration(kind, size, tip, direction, decimals) {
                group.push_child(shape);
            }
        }
        group
    }
}

impl LinePart {
    /// Shape for one end, its tip at `tip` on the local X axis and opening
    /// towards `direction`
    fn decoration(
        &self,
        kind: LineEnd,
        size: f64,
        tip: f64,
        direction: f64,
        decimals: usize,
    ) -> Option<Element> {
        let point = |u: f64, v: f64| {
            format!(
                "{},{}",
                svg_num(tip + direction * u, decimals),
                svg_num(v, decimals)
            )
        };
        let points = |list: &[(f64, f64)]| {
            list.iter()
                .map(|&(u, v)| point(u, v))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let half = size / 2.0;

        let shape = match kind {
            LineEnd::None => return None,
            LineEnd::Simple => Element::new("polyline")
                .with_attr("points", points(&[(size, -half), (0.0, 0.0), (size, half)])),
            LineEnd::Triangle => Element::new("polygon")
                .with_attr("points", points(&[(0.0, 0.0), (size, -half), (size, half)])),
            LineEnd::Circle => Element::new("circle")
                .with_attr("cx", svg_num(tip + direction * half, decimals))
                .with_attr("cy", "0")
                .with_attr("r", svg_num(half, decimals)),
            LineEnd::Diamond => Element::new("polygon").with_attr(
                "points",
                points(&[(0.0, 0.0), (half, -half), (size, 0.0), (half, half)]),
            ),
        };

        // decorations are always drawn solid
        let mut style = self.appearance.resolved();
        style.line_style = LineStyle::Normal;
        if kind == LineEnd::Simple {
            style.filling = "none".to_string();
        }
        Some(
            style
                .svg_attributes()
                .into_iter()
                .fold(shape, |shape, (name, value)| shape.with_attr(name, value)),
        )
    }
}
