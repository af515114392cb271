//! Geometry kernel: coordinate transforms, point-in-polygon, centroid.
//!
//! Native space is the pixel grid of the source photo. Display space is the
//! surface the frame is rendered to; the two are related by a single uniform
//! scale factor chosen so the whole photo fits inside the display bounds.
//!
//! Everything in this module is a pure function.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of vertices for a region boundary.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Polygons whose absolute area is at or below this are treated as degenerate.
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-6;

/// A 2D point. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Errors reported by boundary and scale validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Boundary has fewer than three vertices
    #[error("Boundary has {count} points, at least 3 are required")]
    TooFewPoints { count: usize },

    /// A boundary vertex is NaN or infinite
    #[error("Boundary point {index} is not finite")]
    NonFinite { index: usize },

    /// Boundary encloses no area (collinear or repeated points)
    #[error("Boundary encloses no area")]
    Degenerate,

    /// Image or display bounds with a zero side
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Scale factor that is not a positive finite number
    #[error("Invalid scale factor {0}")]
    InvalidScale(f32),
}

/// Uniform native-to-display scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale(f32);

impl DisplayScale {
    /// Identity scale (display space equals native space).
    pub const IDENTITY: DisplayScale = DisplayScale(1.0);

    /// Create a scale from an explicit factor.
    pub fn new(factor: f32) -> Result<Self, GeometryError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(GeometryError::InvalidScale(factor))
        }
    }

    /// Largest scale at which a `native_width` x `native_height` image fits in
    /// `max_width` x `max_height` while keeping its aspect ratio.
    ///
    /// Small images are scaled up to fill the bounds.
    pub fn fit(
        native_width: u32,
        native_height: u32,
        max_width: u32,
        max_height: u32,
    ) -> Result<Self, GeometryError> {
        if native_width == 0 || native_height == 0 {
            return Err(GeometryError::InvalidDimensions {
                width: native_width,
                height: native_height,
            });
        }
        if max_width == 0 || max_height == 0 {
            return Err(GeometryError::InvalidDimensions {
                width: max_width,
                height: max_height,
            });
        }
        let factor = (max_width as f32 / native_width as f32)
            .min(max_height as f32 / native_height as f32);
        Self::new(factor)
    }

    pub fn factor(self) -> f32 {
        self.0
    }

    /// Pixel size of the display surface for an image of the given native size.
    pub fn display_size(self, native_width: u32, native_height: u32) -> (u32, u32) {
        let width = (native_width as f32 * self.0).floor().max(1.0) as u32;
        let height = (native_height as f32 * self.0).floor().max(1.0) as u32;
        (width, height)
    }
}

/// Map a native-space point to display space.
pub fn to_display_space(point: Point, scale: DisplayScale) -> Point {
    Point::new(point.x * scale.0, point.y * scale.0)
}

/// Map a display-space point to native space.
pub fn to_native_space(point: Point, scale: DisplayScale) -> Point {
    Point::new(point.x / scale.0, point.y / scale.0)
}

/// Signed area of the implicitly closed polygon (shoelace formula).
pub fn polygon_area(boundary: &[Point]) -> f32 {
    if boundary.len() < MIN_POLYGON_VERTICES {
        return 0.0;
    }
    let mut twice_area = 0.0;
    let mut j = boundary.len() - 1;
    for (i, vi) in boundary.iter().enumerate() {
        let vj = boundary[j];
        twice_area += vj.x * vi.y - vi.x * vj.y;
        j = i;
    }
    twice_area / 2.0
}

/// Even-odd (ray casting) containment test.
///
/// Boundaries with fewer than three points or no area never contain anything.
/// Points exactly on an edge get a deterministic answer that depends only on
/// the input.
pub fn point_in_polygon(point: Point, boundary: &[Point]) -> bool {
    if boundary.len() < MIN_POLYGON_VERTICES || !point.is_finite() {
        return false;
    }
    if polygon_area(boundary).abs() <= DEGENERATE_AREA_EPSILON {
        return false;
    }

    let mut inside = false;
    let mut j = boundary.len() - 1;
    for (i, vi) in boundary.iter().enumerate() {
        let vj = boundary[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Arithmetic mean of the boundary vertices. Used for label placement only.
pub fn centroid(boundary: &[Point]) -> Option<Point> {
    if boundary.is_empty() {
        return None;
    }
    let n = boundary.len() as f32;
    let (sx, sy) = boundary
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Validate a region boundary.
///
/// `Degenerate` is reported last, so callers can accept degenerate shapes
/// while rejecting structurally broken ones.
pub fn check_boundary(boundary: &[Point]) -> Result<(), GeometryError> {
    if boundary.len() < MIN_POLYGON_VERTICES {
        return Err(GeometryError::TooFewPoints {
            count: boundary.len(),
        });
    }
    if let Some(index) = boundary.iter().position(|p| !p.is_finite()) {
        return Err(GeometryError::NonFinite { index });
    }
    if polygon_area(boundary).abs() <= DEGENERATE_AREA_EPSILON {
        return Err(GeometryError::Degenerate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(1.0)
    }

    fn pts(coords: &[[f32; 2]]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    fn square() -> Vec<Point> {
        pts(&[[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]])
    }

    #[test]
    fn test_square_contains_center_not_outside() {
        let sq = square();
        assert!(point_in_polygon(Point::new(50.0, 50.0), &sq));
        assert!(!point_in_polygon(Point::new(150.0, 150.0), &sq));
        assert!(!point_in_polygon(Point::new(-1.0, 50.0), &sq));
    }

    #[test]
    fn test_convex_polygon_interior_and_exterior() {
        // Roof-like trapezoid
        let roof = pts(&[[100.0, 50.0], [300.0, 50.0], [400.0, 150.0], [0.0, 150.0]]);
        for p in [[200.0, 100.0], [101.0, 51.0], [5.0, 149.0], [395.0, 149.0]] {
            assert!(point_in_polygon(Point::from(p), &roof), "{:?} should be inside", p);
        }
        for p in [[50.0, 60.0], [350.0, 60.0], [200.0, 151.0], [200.0, 49.0]] {
            assert!(!point_in_polygon(Point::from(p), &roof), "{:?} should be outside", p);
        }
    }

    #[test]
    fn test_concave_polygon_notch_is_outside() {
        // L-shape with the top-right quadrant missing
        let l_shape = pts(&[
            [0.0, 0.0],
            [50.0, 0.0],
            [50.0, 50.0],
            [100.0, 50.0],
            [100.0, 100.0],
            [0.0, 100.0],
        ]);
        assert!(point_in_polygon(Point::new(25.0, 25.0), &l_shape));
        assert!(point_in_polygon(Point::new(75.0, 75.0), &l_shape));
        assert!(!point_in_polygon(Point::new(75.0, 25.0), &l_shape));
    }

    #[test]
    fn test_far_outside_bounding_box_never_contained() {
        let shapes = [
            square(),
            pts(&[[10.0, 10.0], [20.0, 40.0], [5.0, 30.0]]),
            pts(&[[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [100.0, 50.0], [100.0, 100.0]]),
        ];
        for shape in &shapes {
            for p in [[1e6, 1e6], [-1e6, 0.0], [0.0, -1e6], [50.0, 1e5]] {
                assert!(!point_in_polygon(Point::from(p), shape));
            }
        }
    }

    #[test]
    fn test_edge_point_is_deterministic() {
        let sq = square();
        let on_edge = Point::new(100.0, 50.0);
        let first = point_in_polygon(on_edge, &sq);
        for _ in 0..10 {
            assert_eq!(point_in_polygon(on_edge, &sq), first);
        }
    }

    #[test]
    fn test_degenerate_polygons_match_nothing() {
        let collinear = pts(&[[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]]);
        assert!(!point_in_polygon(Point::new(10.0, 10.0), &collinear));
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &collinear));

        let repeated = pts(&[[5.0, 5.0], [5.0, 5.0], [5.0, 5.0]]);
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &repeated));

        let two_points = pts(&[[0.0, 0.0], [10.0, 10.0]]);
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &two_points));
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &[]));
    }

    #[test]
    fn test_non_finite_query_point() {
        assert!(!point_in_polygon(Point::new(f32::NAN, 50.0), &square()));
        assert!(!point_in_polygon(Point::new(50.0, f32::INFINITY), &square()));
    }

    #[test]
    fn test_polygon_area_orientation() {
        assert!(approx_eq(polygon_area(&square()), 10000.0));
        let mut reversed = square();
        reversed.reverse();
        assert!(approx_eq(polygon_area(&reversed), -10000.0));
        // Clockwise winding still hit-tests normally
        assert!(point_in_polygon(Point::new(50.0, 50.0), &reversed));
    }

    #[test]
    fn test_centroid_is_vertex_mean() {
        let c = centroid(&square()).unwrap();
        assert!(approx_eq(c.x, 50.0));
        assert!(approx_eq(c.y, 50.0));

        let tri = pts(&[[0.0, 0.0], [30.0, 0.0], [0.0, 30.0]]);
        let c = centroid(&tri).unwrap();
        assert!(approx_eq(c.x, 10.0));
        assert!(approx_eq(c.y, 10.0));

        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_check_boundary_classification() {
        assert_eq!(check_boundary(&square()), Ok(()));
        assert_eq!(
            check_boundary(&pts(&[[0.0, 0.0], [1.0, 1.0]])),
            Err(GeometryError::TooFewPoints { count: 2 })
        );
        assert_eq!(
            check_boundary(&pts(&[[0.0, 0.0], [f32::NAN, 1.0], [1.0, 0.0]])),
            Err(GeometryError::NonFinite { index: 1 })
        );
        assert_eq!(
            check_boundary(&pts(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]])),
            Err(GeometryError::Degenerate)
        );
    }

    #[test]
    fn test_fit_scale_downscales_large_images() {
        let scale = DisplayScale::fit(1600, 1200, 800, 600).unwrap();
        assert!(approx_eq(scale.factor(), 0.5));
        assert_eq!(scale.display_size(1600, 1200), (800, 600));
    }

    #[test]
    fn test_fit_scale_preserves_aspect_ratio() {
        // Width-limited: 2000x500 into 800x600
        let scale = DisplayScale::fit(2000, 500, 800, 600).unwrap();
        assert!(approx_eq(scale.factor(), 0.4));
        assert_eq!(scale.display_size(2000, 500), (800, 200));

        // Small images are scaled up to the nearest bound
        let scale = DisplayScale::fit(400, 150, 800, 600).unwrap();
        assert!(approx_eq(scale.factor(), 2.0));
    }

    #[test]
    fn test_fit_scale_rejects_zero_dimensions() {
        assert_eq!(
            DisplayScale::fit(0, 100, 800, 600),
            Err(GeometryError::InvalidDimensions { width: 0, height: 100 })
        );
        assert!(DisplayScale::fit(100, 100, 800, 0).is_err());
        assert!(DisplayScale::new(0.0).is_err());
        assert!(DisplayScale::new(f32::NAN).is_err());
    }

    #[test]
    fn test_display_native_roundtrip() {
        let scales = [0.1, 0.37, 0.5, 1.0, 1.5, 2.0, 7.25];
        let points = [[0.0, 0.0], [1.0, 2.0], [123.456, 789.01], [-40.0, 3.5], [799.9, 599.9]];
        for &s in &scales {
            let scale = DisplayScale::new(s).unwrap();
            for &p in &points {
                let p = Point::from(p);
                let back = to_display_space(to_native_space(p, scale), scale);
                assert!(approx_eq(back.x, p.x), "scale {}: {:?} -> {:?}", s, p, back);
                assert!(approx_eq(back.y, p.y), "scale {}: {:?} -> {:?}", s, p, back);
            }
        }
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(1.5, 2.0)).unwrap();
        assert_eq!(json, "[1.5,2.0]");
        let p: Point = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(p, Point::new(3.0, 4.0));
    }
}
