//! SVG document shell around the rendered primitives.

use crate::errors::DocumentError;
use crate::pipeline::ProcessedElement;
use crate::primitives::Primitive;
use crate::tree::{Element, write_document};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Marker every terminal references: a short stroke, blue at its foot and
/// red towards its tip
fn terminal_marker() -> Element {
    let stroke = |y1: &str, color: &str| {
        Element::new("line")
            .with_attr("x1", "0")
            .with_attr("y1", y1)
            .with_attr("x2", "0")
            .with_attr("y2", "4")
            .with_attr("stroke", color)
    };
    Element::new("defs").with_child(
        Element::new("g")
            .with_attr("id", "terminal")
            .with_attr("stroke-width", "1")
            .with_attr("stroke-linecap", "square")
            .with_child(stroke("0", "#0000FF"))
            .with_child(stroke("1", "#FF0000")),
    )
}

/// Build the SVG tree for a processed element.
///
/// The canvas has the header's size; the drawing is shifted by the hotspot
/// so the element's origin lands on it.
pub fn to_svg_tree(element: &ProcessedElement, decimals: usize) -> Element {
    let header = &element.header;
    let mut svg = Element::new("svg")
        .with_attr("xmlns", SVG_NS)
        .with_attr("xmlns:xlink", XLINK_NS)
        .with_attr("width", header.width.to_string())
        .with_attr("height", header.height.to_string())
        .with_attr(
            "viewBox",
            format!("0 0 {} {}", header.width, header.height),
        );
    if element.has_terminals() {
        svg.push_child(terminal_marker());
    }

    let mut group = Element::new("g")
        .with_attr(
            "transform",
            format!("translate({},{})", header.hotspot_x, header.hotspot_y),
        )
        .with_attr("stroke-linecap", "square");
    for part in &element.parts {
        group.push_child(part.to_svg(decimals));
    }
    svg.with_child(group)
}

/// Render a processed element as a standalone SVG document
pub fn to_svg_string(element: &ProcessedElement, decimals: usize) -> Result<String, DocumentError> {
    write_document(&to_svg_tree(element, decimals))
}
