//! Drawing primitives of an element's `<description>`.
//!
//! Each primitive is its own type that knows how to:
//! - Read itself from an XML node, upgrading legacy forms
//! - Flip, mirror, rotate and scale itself
//! - Grow the element's bounding box
//! - Write itself back with a fixed attribute order
//! - Render itself to SVG

use enum_dispatch::enum_dispatch;

use crate::config::TransformConfig;
use crate::errors::PartError;
use crate::format::format_value;
use crate::geometry::BoundingBox;
use crate::style::Style;
use crate::tree::Element;

mod arc;
mod dynamic_text;
mod ellipse;
mod font;
mod line;
mod polygon;
mod rect;
mod terminal;
mod text;

pub use arc::ArcPart;
pub use dynamic_text::{DynamicTextPart, HAlign, TextSource, VAlign};
pub use ellipse::EllipsePart;
pub use font::FontDescriptor;
pub use line::{LineEnd, LinePart};
pub use polygon::PolygonPart;
pub use rect::RectPart;
pub use terminal::{Orientation, TerminalPart};
pub use text::TextPart;

/// Common behavior for all primitives
#[enum_dispatch]
pub trait Primitive {
    /// Tag the primitive is written back as
    fn tag(&self) -> &'static str;

    /// Negate Y, anchoring boxes on their other edge
    fn flip(&mut self);

    /// Negate X, anchoring boxes on their other edge
    fn mirror(&mut self);

    /// Quarter turn clockwise around the origin
    fn rotate90(&mut self);

    fn scale(&mut self, fx: f64, fy: f64);

    /// Validate (and possibly tidy up) after all transforms.
    ///
    /// An error means the primitive is dropped from the output.
    fn finish(&mut self, _config: &TransformConfig) -> Result<(), PartError> {
        Ok(())
    }

    /// Grow the element's bounding box by this primitive's extent
    fn extend_bounds(&self, bounds: &mut BoundingBox);

    /// Write fields back to `node`, known attributes first in a fixed order
    fn write(&self, node: &mut Element, decimals: usize);

    /// Render as a single SVG element or group
    fn to_svg(&self, decimals: usize) -> Element;

    /// Apply the configured transforms in their fixed order
    fn apply(&mut self, config: &TransformConfig) {
        if config.flip_horizontal {
            self.flip();
        }
        if config.flip_vertical {
            self.mirror();
        }
        if config.rotate90 {
            self.rotate90();
        }
        self.scale(config.scale_x, config.scale_y);
    }
}

/// Any drawing primitive
#[enum_dispatch(Primitive)]
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Rect(RectPart),
    Ellipse(EllipsePart),
    Arc(ArcPart),
    Polygon(PolygonPart),
    Line(LinePart),
    Text(TextPart),
    DynamicText(DynamicTextPart),
    Terminal(TerminalPart),
}

impl Part {
    /// Read the primitive a node describes.
    ///
    /// `Ok(None)` means the tag is not a drawing primitive and the node is
    /// passed through untouched.
    pub fn from_node(node: &Element) -> Result<Option<Part>, PartError> {
        let part: Part = match node.name.as_str() {
            "rect" => RectPart::from_node(node).into(),
            "ellipse" | "circle" => EllipsePart::from_node(node).into(),
            "arc" => ArcPart::from_node(node).into(),
            "polygon" => PolygonPart::from_node(node)?.into(),
            "line" => LinePart::from_node(node)?.into(),
            "text" => TextPart::from_node(node).into(),
            "dynamic_text" | "input" => DynamicTextPart::from_node(node).into(),
            "terminal" => TerminalPart::from_node(node).into(),
            _ => return Ok(None),
        };
        Ok(Some(part))
    }
}

// ============================================================================
// Shared attribute helpers
// ============================================================================

/// `style` and `antialias`, carried by every shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Appearance {
    pub style: Option<String>,
    pub antialias: Option<String>,
}

impl Appearance {
    pub(crate) fn from_node(node: &Element) -> Self {
        Self {
            style: node.attr("style").map(str::to_string),
            antialias: node.attr("antialias").map(str::to_string),
        }
    }

    pub(crate) fn write_into(&self, attrs: &mut Vec<(String, String)>) {
        if let Some(style) = &self.style {
            attrs.push(("style".to_string(), style.clone()));
        }
        if let Some(antialias) = &self.antialias {
            attrs.push(("antialias".to_string(), antialias.clone()));
        }
    }

    pub fn resolved(&self) -> Style {
        Style::parse(self.style.as_deref().unwrap_or_default())
    }

    /// Append the resolved presentation attributes to an SVG element
    pub(crate) fn paint(&self, svg: Element) -> Element {
        self.resolved()
            .svg_attributes()
            .into_iter()
            .fold(svg, |svg, (name, value)| svg.with_attr(name, value))
    }
}

/// Ordered attribute list under construction
pub(crate) struct Attrs {
    list: Vec<(String, String)>,
    decimals: usize,
}

impl Attrs {
    pub(crate) fn new(decimals: usize) -> Self {
        Self {
            list: Vec::new(),
            decimals,
        }
    }

    /// Number with the configured decimals
    pub(crate) fn num(&mut self, key: &str, value: f64) -> &mut Self {
        self.list
            .push((key.to_string(), format_value(value, self.decimals)));
        self
    }

    /// Number rounded to a whole value
    pub(crate) fn int(&mut self, key: &str, value: f64) -> &mut Self {
        self.list.push((key.to_string(), format_value(value, 0)));
        self
    }

    pub(crate) fn text(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.list.push((key.to_string(), value.into()));
        self
    }

    pub(crate) fn appearance(&mut self, appearance: &Appearance) -> &mut Self {
        appearance.write_into(&mut self.list);
        self
    }

    pub(crate) fn apply(self, node: &mut Element, tag: &str, owned: &[&str]) {
        node.name = tag.to_string();
        node.set_attrs_ordered(self.list, owned);
    }
}

/// SVG number attribute
pub(crate) fn svg_num(value: f64, decimals: usize) -> String {
    format_value(value, decimals)
}


#[cfg(test)]
mod tests {
    use super::test_support::node;
    use super::*;

    #[test]
    fn dispatches_on_tag() {
        let rect = Part::from_node(&node(r#"<rect x="1" y="2" width="3" height="4"/>"#));
        assert!(matches!(rect, Ok(Some(Part::Rect(_)))));
        let circle = Part::from_node(&node(r#"<circle x="1" y="2" diameter="3"/>"#));
        assert!(matches!(circle, Ok(Some(Part::Ellipse(_)))));
        let input = Part::from_node(&node(r#"<input x="1" y="2" size="9" text="T"/>"#));
        assert!(matches!(input, Ok(Some(Part::DynamicText(_)))));
        let other = Part::from_node(&node(r#"<kindInformations/>"#));
        assert!(matches!(other, Ok(None)));
    }

    #[test]
    fn broken_polygon_is_an_error() {
        let polygon = Part::from_node(&node(r#"<polygon x1="0" y1="0" x3="1" y3="1"/>"#));
        assert!(polygon.is_err());
    }

    #[test]
    fn transforms_run_in_fixed_order() {
        let mut part: Part = RectPart::from_node(&node(
            r#"<rect x="10" y="20" width="30" height="10"/>"#,
        ))
        .into();
        let config = TransformConfig {
            flip_horizontal: true,
            rotate90: true,
            scale_x: 2.0,
            ..TransformConfig::default()
        };
        part.apply(&config);
        let mut out = Element::new("rect");
        part.write(&mut out, 2);
        // flip: y = -30, rotate: x = 30 - 10 = 20, y = 10, then x doubles
        assert_eq!(
            test_support::attr_line(&out),
            "x=40 y=10 width=20 height=30 rx=0 ry=0"
        );
    }
}
