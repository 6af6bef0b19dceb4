//! The `<definition>` root attributes of an element: declared size and hotspot.

use crate::geometry::BoundingBox;
use crate::log::debug;
use crate::tree::Element;

const OWNED: &[&str] = &[
    "version",
    "link_type",
    "type",
    "width",
    "height",
    "hotspot_x",
    "hotspot_y",
];

/// Link classification of an element without terminals
pub const THUMBNAIL: &str = "thumbnail";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionHeader {
    pub version: String,
    /// `thumbnail`, `simple`, `master`, `slave`, ...
    pub link_type: String,
    pub element_type: String,
    pub width: i64,
    pub height: i64,
    pub hotspot_x: i64,
    pub hotspot_y: i64,
}

impl Default for DefinitionHeader {
    fn default() -> Self {
        Self {
            version: "0.100".to_string(),
            link_type: "simple".to_string(),
            element_type: "element".to_string(),
            width: 10,
            height: 12,
            hotspot_x: 5,
            hotspot_y: 6,
        }
    }
}

/// Integer attribute, truncating a fractional value
fn int_attr(node: &Element, key: &str) -> i64 {
    node.attr_f64(key)
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .unwrap_or(0)
}

/// Declared size along one axis and the hotspot offset for it.
///
/// The size is rounded up to the next multiple of 10 with at least 10 units
/// of margin, plus 10 more when the remainder exceeds 6. The hotspot sits
/// half a margin before the box's minimum.
fn envelope(min: f64, extent: f64) -> (i64, i64) {
    let extent = extent.round() as i64;
    let mut size = (extent / 10) * 10 + 10;
    if extent % 10 > 6 {
        size += 10;
    }
    let margin = size - extent;
    let hotspot = -((min - (margin / 2) as f64).round() as i64);
    (size, hotspot)
}

impl DefinitionHeader {
    /// Read the header; missing text attributes take their defaults
    pub fn from_node(node: &Element) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| node.attr(key).map_or(default, str::to_string);
        Self {
            version: text("version", defaults.version),
            link_type: text("link_type", defaults.link_type),
            element_type: text("type", defaults.element_type),
            width: int_attr(node, "width"),
            height: int_attr(node, "height"),
            hotspot_x: int_attr(node, "hotspot_x"),
            hotspot_y: int_attr(node, "hotspot_y"),
        }
    }

    /// Derive width, height and hotspot from the drawing's bounding box
    pub fn recalculate(&mut self, bounds: &BoundingBox) {
        (self.width, self.hotspot_x) = envelope(bounds.min.x, bounds.width());
        (self.height, self.hotspot_y) = envelope(bounds.min.y, bounds.height());
        debug!(
            width = self.width,
            height = self.height,
            hotspot_x = self.hotspot_x,
            hotspot_y = self.hotspot_y,
            "recalculated definition header"
        );
    }

    /// Write the header attributes in their fixed order, foreign ones after
    pub fn write(&self, node: &mut Element) {
        let known = [
            ("version", self.version.clone()),
            ("link_type", self.link_type.clone()),
            ("type", self.element_type.clone()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("hotspot_x", self.hotspot_x.to_string()),
            ("hotspot_y", self.hotspot_y.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        node.set_attrs_ordered(known, OWNED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_document;
    use glam::dvec2;

    fn bounds(min: (f64, f64), max: (f64, f64)) -> BoundingBox {
        BoundingBox {
            min: dvec2(min.0, min.1),
            max: dvec2(max.0, max.1),
        }
    }

    #[test]
    fn symmetric_box() {
        let mut header = DefinitionHeader::default();
        header.recalculate(&bounds((-20.0, -20.0), (20.0, 20.0)));
        assert_eq!((header.width, header.hotspot_x), (50, 25));
        assert_eq!((header.height, header.hotspot_y), (50, 25));
    }

    #[test]
    fn large_remainder_adds_margin() {
        // 27 wide: 20 + 10, remainder 7 > 6, so 40 with a margin of 13
        assert_eq!(envelope(0.0, 27.0), (40, 6));
        // 26 wide: remainder 6 keeps 30, margin 4
        assert_eq!(envelope(-3.0, 26.0), (30, 5));
        assert_eq!(envelope(0.0, 0.0), (10, 5));
        assert_eq!(envelope(-10.4, 30.0), (40, 15));
    }

    #[test]
    fn empty_drawing_matches_qet_default_hotspot() {
        let mut header = DefinitionHeader::default();
        header.recalculate(&BoundingBox::new());
        assert_eq!((header.width, header.height), (10, 10));
        assert_eq!((header.hotspot_x, header.hotspot_y), (5, 5));
    }

    #[test]
    fn reads_and_writes_in_fixed_order() {
        let mut node = parse_document(
            r#"<definition hotspot_y="6" type="element" width="20" custom="1" height="12" hotspot_x="5.7" link_type="simple" version="0.80"/>"#,
            "test",
        )
        .unwrap();
        let header = DefinitionHeader::from_node(&node);
        assert_eq!(header.hotspot_x, 5);
        assert_eq!(header.link_type, "simple");
        header.write(&mut node);
        let keys: Vec<&str> = node.attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "version",
                "link_type",
                "type",
                "width",
                "height",
                "hotspot_x",
                "hotspot_y",
                "custom"
            ]
        );
    }
}
