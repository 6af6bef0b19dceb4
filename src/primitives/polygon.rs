use std::collections::BTreeMap;

use glam::{DVec2, dvec2};

use super::{Appearance, Attrs, Primitive, svg_num};
use crate::config::TransformConfig;
use crate::errors::PartError;
use crate::geometry::{BoundingBox, Extent, rotate_point90};
use crate::log::debug;
use crate::tree::Element;

const OWNED: &[&str] = &["closed", "style", "antialias"];

/// A polygon or open polyline with numbered points `x1`/`y1` .. `xN`/`yN`.
///
/// Only polygons with a complete, gap-free numbering can be built, so the
/// points here are always contiguous and finite.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPart {
    pub points: Vec<DVec2>,
    pub closed: bool,
    pub appearance: Appearance,
}

/// Point number of an `x<N>` or `y<N>` attribute
fn point_key(key: &str) -> Option<(char, usize)> {
    let mut chars = key.chars();
    let axis = chars.next().filter(|c| *c == 'x' || *c == 'y')?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((axis, digits.parse().ok()?))
}

impl PolygonPart {
    /// Read and validate the point list.
    pub fn from_node(node: &Element) -> Result<Self, PartError> {
        let mut raw: BTreeMap<usize, (Option<f64>, Option<f64>)> = BTreeMap::new();
        for (key, value) in &node.attrs {
            let Some((axis, index)) = point_key(key) else {
                continue;
            };
            let slot = raw.entry(index).or_default();
            let value = value.trim().parse::<f64>().ok();
            match axis {
                'x' => slot.0 = value,
                _ => slot.1 = value,
            }
        }

        let points = check_index(&raw)?;
        Ok(Self {
            points,
            closed: node.attr_bool("closed").unwrap_or(true),
            appearance: Appearance::from_node(node),
        })
    }

    /// Merge consecutive points closer than `epsilon`, keeping the earlier
    /// one. A last point that lands on the first is dropped and the polygon
    /// becomes closed. Returns the number of removed points.
    pub fn clean_up(&mut self, epsilon: f64) -> usize {
        let before = self.points.len();
        let mut i = self.points.len();
        while i > 1 {
            i -= 1;
            if self.points[i].distance(self.points[i - 1]) <= epsilon {
                self.points.remove(i);
            }
        }
        if self.points.len() > 2 {
            let (first, last) = (self.points[0], self.points[self.points.len() - 1]);
            if first.distance(last) <= epsilon {
                self.points.pop();
                self.closed = true;
            }
        }
        before - self.points.len()
    }
}

/// Points in index order, or why the numbering is unusable
fn check_index(raw: &BTreeMap<usize, (Option<f64>, Option<f64>)>) -> Result<Vec<DVec2>, PartError> {
    if raw.len() < 2 {
        return Err(PartError::TooFewPoints { found: raw.len() });
    }
    let mut points = Vec::with_capacity(raw.len());
    for (expected, (&index, &(x, y))) in (1..).zip(raw) {
        if index != expected {
            return Err(PartError::IndexGap {
                expected,
                found: index,
            });
        }
        let x = x.ok_or(PartError::MissingCoordinate { index, axis: 'x' })?;
        let y = y.ok_or(PartError::MissingCoordinate { index, axis: 'y' })?;
        if !x.is_finite() || !y.is_finite() {
            return Err(PartError::NonFinite { index });
        }
        points.push(dvec2(x, y));
    }
    Ok(points)
}

impl Primitive for PolygonPart {
    fn tag(&self) -> &'static str {
        "polygon"
    }

    fn flip(&mut self) {
        for p in &mut self.points {
            p.y = -p.y;
        }
    }

    fn mirror(&mut self) {
        for p in &mut self.points {
            p.x = -p.x;
        }
    }

    fn rotate90(&mut self) {
        for p in &mut self.points {
            *p = rotate_point90(*p);
        }
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        for p in &mut self.points {
            *p *= dvec2(fx, fy);
        }
    }

    fn finish(&mut self, config: &TransformConfig) -> Result<(), PartError> {
        let removed = self.clean_up(config.merge_epsilon());
        if removed > 0 {
            debug!(removed, "merged coincident polygon points");
        }
        if self.points.len() < 2 {
            return Err(PartError::TooFewPoints {
                found: self.points.len(),
            });
        }
        Ok(())
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        if let Some(extent) = Extent::of_points(self.points.iter().copied()) {
            extent.add_to(bounds);
        }
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        node.attrs.retain(|(key, _)| point_key(key).is_none());
        let mut attrs = Attrs::new(decimals);
        for (i, p) in self.points.iter().enumerate() {
            attrs
                .num(&format!("x{}", i + 1), p.x)
                .num(&format!("y{}", i + 1), p.y);
        }
        if !self.closed {
            attrs.text("closed", "false");
        }
        attrs.appearance(&self.appearance);
        attrs.apply(node, self.tag(), OWNED);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        let points = self
            .points
            .iter()
            .map(|p| format!("{},{}", svg_num(p.x, decimals), svg_num(p.y, decimals)))
            .collect::<Vec<_>>()
            .join(" ");
        let tag = if self.closed { "polygon" } else { "polyline" };
        self.appearance
            .paint(Element::new(tag).with_attr("points", points))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{attr_line, node};
    use super::*;

    fn polygon(points: &[(f64, f64)]) -> PolygonPart {
        PolygonPart {
            points: points.iter().map(|&(x, y)| dvec2(x, y)).collect(),
            closed: false,
            appearance: Appearance::default(),
        }
    }

    #[test]
    fn reads_points_in_index_order() {
        let p = PolygonPart::from_node(&node(
            r#"<polygon y2="4" x2="3" x1="1" y1="2" x3="5" y3="6" closed="false"/>"#,
        ))
        .unwrap();
        assert_eq!(p.points, vec![dvec2(1.0, 2.0), dvec2(3.0, 4.0), dvec2(5.0, 6.0)]);
        assert!(!p.closed);
    }

    #[test]
    fn closed_by_default() {
        let p = PolygonPart::from_node(&node(r#"<polygon x1="0" y1="0" x2="1" y2="1"/>"#)).unwrap();
        assert!(p.closed);
    }

    #[test]
    fn rejects_broken_numbering() {
        let read = |xml| PolygonPart::from_node(&node(xml)).unwrap_err();
        assert_eq!(
            read(r#"<polygon x1="0" y1="0"/>"#),
            PartError::TooFewPoints { found: 1 }
        );
        assert_eq!(
            read(r#"<polygon x1="0" y1="0" x3="1" y3="1"/>"#),
            PartError::IndexGap {
                expected: 2,
                found: 3
            }
        );
        assert_eq!(
            read(r#"<polygon x0="0" y0="0" x1="1" y1="1"/>"#),
            PartError::IndexGap {
                expected: 1,
                found: 0
            }
        );
        assert_eq!(
            read(r#"<polygon x1="0" y1="0" x2="1"/>"#),
            PartError::MissingCoordinate { index: 2, axis: 'y' }
        );
        assert_eq!(
            read(r#"<polygon x1="0" y1="zero" x2="1" y2="1"/>"#),
            PartError::MissingCoordinate { index: 1, axis: 'y' }
        );
        assert_eq!(
            read(r#"<polygon x1="NaN" y1="0" x2="1" y2="1"/>"#),
            PartError::NonFinite { index: 1 }
        );
    }

    #[test]
    fn ignores_foreign_x_attributes() {
        let p = PolygonPart::from_node(&node(
            r#"<polygon x1="0" y1="0" x2="1" y2="1" xmlns="urn:x" y_extra="3"/>"#,
        ))
        .unwrap();
        assert_eq!(p.points.len(), 2);
    }

    #[test]
    fn clean_up_merges_neighbors() {
        let mut p = polygon(&[(0.0, 0.0), (5.0, 5.0), (5.001, 5.001), (10.0, 0.0)]);
        assert_eq!(p.clean_up(0.01), 1);
        assert_eq!(p.points, vec![dvec2(0.0, 0.0), dvec2(5.0, 5.0), dvec2(10.0, 0.0)]);
        assert!(!p.closed);
        let mut out = node("<polygon/>");
        p.write(&mut out, 2);
        assert_eq!(
            attr_line(&out),
            "x1=0 y1=0 x2=5 y2=5 x3=10 y3=0 closed=false"
        );
    }

    #[test]
    fn clean_up_closes_ring() {
        let mut p = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.001, 0.0)]);
        assert_eq!(p.clean_up(0.01), 1);
        assert_eq!(p.points.len(), 3);
        assert!(p.closed);
    }

    #[test]
    fn finish_drops_collapsed_polygons() {
        let mut p = polygon(&[(1.0, 1.0), (1.001, 1.0), (1.002, 1.0)]);
        assert_eq!(
            p.finish(&TransformConfig::default()),
            Err(PartError::TooFewPoints { found: 1 })
        );
    }

    #[test]
    fn renumbers_after_clean_up() {
        let mut out = node(
            r#"<polygon x1="0" y1="0" x2="0" y2="0" x3="4" y3="0" x4="4" y4="4" style="s"/>"#,
        );
        let mut p = PolygonPart::from_node(&out).unwrap();
        p.finish(&TransformConfig::default()).unwrap();
        p.write(&mut out, 2);
        assert_eq!(attr_line(&out), "x1=0 y1=0 x2=4 y2=0 x3=4 y3=4 style=s");
    }

    #[test]
    fn transforms_are_reversible() {
        let original = polygon(&[(1.0, 2.0), (-3.0, 4.5), (6.0, -7.0)]);
        let mut p = original.clone();
        for _ in 0..4 {
            p.rotate90();
        }
        assert_eq!(p, original);
        p.flip();
        p.flip();
        p.mirror();
        p.mirror();
        assert_eq!(p, original);
    }

    #[test]
    fn svg_polyline_when_open() {
        let svg = polygon(&[(0.0, 0.0), (1.5, 2.0)]).to_svg(2);
        assert_eq!(svg.name, "polyline");
        assert_eq!(svg.attr("points"), Some("0,0 1.5,2"));
        let mut closed = polygon(&[(0.0, 0.0), (1.5, 2.0), (3.0, 0.0)]);
        closed.closed = true;
        assert_eq!(closed.to_svg(2).name, "polygon");
    }
}
