//! Geometry helpers shared by every primitive.
//!
//! Element coordinates are screen-like: X grows to the right, Y grows
//! downwards, angles are in degrees and grow counter-clockwise on screen.

use glam::{DVec2, dvec2};

/// Rotate a point a quarter turn clockwise around the origin.
pub fn rotate_point90(p: DVec2) -> DVec2 {
    dvec2(-p.y, p.x)
}

/// New top-left corner of a box after a clockwise quarter turn.
///
/// The caller swaps width and height.
pub fn rotate_box90(pos: DVec2, size: DVec2) -> DVec2 {
    dvec2(-pos.y - size.y, pos.x)
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Bring an arc's start and sweep into canonical form.
///
/// Both are rounded to whole degrees and reduced modulo 360, so the result
/// has `0 <= start < 360` and `0 <= sweep < 360`. A negative sweep is folded
/// into a start shift so the same stretch of the ellipse is covered.
pub fn normalize_arc(start: f64, sweep: f64) -> (f64, f64) {
    let mut istart = (start.round() as i64).rem_euclid(360);
    let mut isweep = (sweep.round() as i64) % 360;
    if isweep < 0 {
        istart = (istart + isweep + 360) % 360;
        isweep = -isweep;
    }
    (istart as f64, isweep as f64)
}

// ============================================================================
// Bounding box
// ============================================================================

/// Running min/max rectangle.
///
/// Starts as a degenerate box at the origin, so the origin (the element's
/// hotspot) is always inside the final box. Growing it never shrinks it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand_x(&mut self, x: f64) {
        self.min.x = self.min.x.min(x);
        self.max.x = self.max.x.max(x);
    }

    pub fn expand_y(&mut self, y: f64) {
        self.min.y = self.min.y.min(y);
        self.max.y = self.max.y.max(y);
    }

    pub fn expand_point(&mut self, p: DVec2) {
        self.expand_x(p.x);
        self.expand_y(p.y);
    }

    pub fn expand_box(&mut self, other: &BoundingBox) {
        self.expand_point(other.min);
        self.expand_point(other.max);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Length of the diagonal from `min` to `max`
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }

    /// Angle of the diagonal in degrees
    pub fn angle(&self) -> f64 {
        to_degrees(self.height().atan2(self.width()))
    }
}

/// Tight min/max of a set of points, without the origin.
///
/// Used for per-primitive caches such as the sampled outline of an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: DVec2,
    pub max: DVec2,
}

impl Extent {
    pub fn of_points(points: impl IntoIterator<Item = DVec2>) -> Option<Extent> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Extent { min: first, max: first }, |acc, p| Extent {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    pub fn add_to(&self, bounds: &mut BoundingBox) {
        bounds.expand_point(self.min);
        bounds.expand_point(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_is_clockwise_on_screen() {
        assert_eq!(rotate_point90(dvec2(10.0, 0.0)), dvec2(0.0, 10.0));
        assert_eq!(rotate_point90(dvec2(0.0, 10.0)), dvec2(-10.0, 0.0));
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let p = dvec2(3.5, -7.25);
        let back = (0..4).fold(p, |p, _| rotate_point90(p));
        assert_eq!(back, p);
    }

    #[test]
    fn rotated_box_keeps_its_area_in_place() {
        // box from (10,20) to (40,30) turns into (-30,10)..(-20,40)
        let pos = rotate_box90(dvec2(10.0, 20.0), dvec2(30.0, 10.0));
        assert_eq!(pos, dvec2(-30.0, 10.0));
    }

    #[test]
    fn degree_conversions() {
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((to_degrees(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn arc_normalization_examples() {
        assert_eq!(normalize_arc(-20.0, 330.0), (340.0, 330.0));
        assert_eq!(normalize_arc(350.0, -330.0), (20.0, 330.0));
        assert_eq!(normalize_arc(720.0, 90.0), (0.0, 90.0));
        assert_eq!(normalize_arc(-450.0, -45.0), (225.0, 45.0));
        assert_eq!(normalize_arc(0.0, 400.0), (0.0, 40.0));
        assert_eq!(normalize_arc(10.0, 360.0), (10.0, 0.0));
        assert_eq!(normalize_arc(10.0, -360.0), (10.0, 0.0));
        // -400 wraps to -40, which shifts the start back by 40
        assert_eq!(normalize_arc(10.0, -400.0), (330.0, 40.0));
    }

    #[test]
    fn arc_normalization_range() {
        for start in (-1080..=1080).step_by(37) {
            for sweep in (-1080..=1080).step_by(23) {
                let (s, a) = normalize_arc(start as f64, sweep as f64);
                assert!((0.0..360.0).contains(&s), "start {start} sweep {sweep}");
                assert!((0.0..360.0).contains(&a), "start {start} sweep {sweep}");
            }
        }
    }

    #[test]
    fn bounding_box_contains_origin() {
        let mut bounds = BoundingBox::new();
        bounds.expand_point(dvec2(10.0, 20.0));
        assert_eq!(bounds.min, DVec2::ZERO);
        assert_eq!(bounds.max, dvec2(10.0, 20.0));
        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.height(), 20.0);
    }

    #[test]
    fn bounding_box_only_grows() {
        let mut bounds = BoundingBox::new();
        let points = [
            dvec2(-5.0, 3.0),
            dvec2(2.0, -8.0),
            dvec2(1.0, 1.0),
            dvec2(-20.0, 40.0),
        ];
        for p in points {
            let before = bounds;
            bounds.expand_point(p);
            assert!(bounds.min.x <= before.min.x && bounds.min.y <= before.min.y);
            assert!(bounds.max.x >= before.max.x && bounds.max.y >= before.max.y);
            assert!(bounds.width() >= 0.0 && bounds.height() >= 0.0);
        }
        assert_eq!(bounds.min, dvec2(-20.0, -8.0));
        assert_eq!(bounds.max, dvec2(2.0, 40.0));
    }

    #[test]
    fn diagonal_and_angle() {
        let mut bounds = BoundingBox::new();
        bounds.expand_point(dvec2(30.0, 40.0));
        assert_eq!(bounds.diagonal(), 50.0);
        let mut square = BoundingBox::new();
        square.expand_point(dvec2(-10.0, -10.0));
        assert!((square.angle() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn extent_of_points() {
        assert_eq!(Extent::of_points([]), None);
        let extent =
            Extent::of_points([dvec2(5.0, 5.0), dvec2(7.0, 2.0), dvec2(6.0, 9.0)]).unwrap();
        assert_eq!(extent.min, dvec2(5.0, 2.0));
        assert_eq!(extent.max, dvec2(7.0, 9.0));
    }
}
