//! Reduces drawn map points into a bounding box.

use crate::domain::model::{BoundingBox, Cartesian3, Point2D};
use geo::{BoundingRect, MultiPoint, Point};

/// Minimum number of vertices that make a closed area.
pub const MIN_POLYGON_POINTS: usize = 3;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Positions closer than this to the ellipsoid centre have no surface projection.
const CENTRE_EPSILON_M: f64 = 1.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct GeometryReducer;

impl GeometryReducer {
    pub fn new() -> Self {
        Self
    }

    /// Axis-aligned box over every vertex, or `None` while fewer than three
    /// points have been drawn. Vertex order and concavity do not matter, and
    /// collinear input yields a zero-width or zero-height box.
    ///
    /// Vertices with a NaN or infinite coordinate are dropped before counting.
    pub fn reduce(&self, points: &[Point2D]) -> Option<BoundingBox> {
        let vertices: Vec<Point<f64>> = points
            .iter()
            .filter(|p| p.latitude.is_finite() && p.longitude.is_finite())
            .map(|p| Point::new(p.longitude, p.latitude))
            .collect();
        if vertices.len() < points.len() {
            tracing::warn!(
                "Ignoring {} drawn vertex(es) with non-finite coordinates",
                points.len() - vertices.len()
            );
        }
        if vertices.len() < MIN_POLYGON_POINTS {
            return None;
        }

        let multi: MultiPoint<f64> = vertices.into();
        let rect = multi.bounding_rect()?;

        Some(BoundingBox {
            top: rect.max().y,
            bottom: rect.min().y,
            left: rect.min().x,
            right: rect.max().x,
        })
    }

    /// Projects globe positions onto the WGS84 ellipsoid, then reduces them.
    pub fn reduce_cartesian(&self, positions: &[Cartesian3]) -> Option<BoundingBox> {
        let points: Vec<Point2D> = positions.iter().filter_map(to_geodetic).collect();
        if points.len() < positions.len() {
            tracing::debug!(
                "Skipped {} position(s) without a surface projection",
                positions.len() - points.len()
            );
        }
        self.reduce(&points)
    }
}

/// Geodetic latitude/longitude (degrees) of an ECEF position, using Bowring's
/// closed form. Height above the ellipsoid is discarded.
pub fn to_geodetic(position: &Cartesian3) -> Option<Point2D> {
    let Cartesian3 { x, y, z } = *position;
    if (x * x + y * y + z * z).sqrt() < CENTRE_EPSILON_M {
        return None;
    }

    let a = WGS84_A;
    let b = a * (1.0 - WGS84_F);
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = (a * a - b * b) / (b * b);

    let p = (x * x + y * y).sqrt();
    let theta = (z * a).atan2(p * b);
    let (sin_t, cos_t) = theta.sin_cos();

    let latitude = (z + ep2 * b * sin_t.powi(3)).atan2(p - e2 * a * cos_t.powi(3));
    let longitude = y.atan2(x);

    Some(Point2D::new(latitude.to_degrees(), longitude.to_degrees()))
}

impl Cartesian3 {
    pub fn to_geodetic(&self) -> Option<Point2D> {
        to_geodetic(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(latitude: f64, longitude: f64) -> Cartesian3 {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let (phi, lambda) = (latitude.to_radians(), longitude.to_radians());
        let n = WGS84_A / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        Cartesian3::new(
            n * phi.cos() * lambda.cos(),
            n * phi.cos() * lambda.sin(),
            n * (1.0 - e2) * phi.sin(),
        )
    }

    #[test]
    fn test_fewer_than_three_points_is_not_ready() {
        let reducer = GeometryReducer::new();
        assert_eq!(reducer.reduce(&[]), None);
        assert_eq!(reducer.reduce(&[Point2D::new(1.0, 2.0)]), None);
        assert_eq!(
            reducer.reduce(&[Point2D::new(1.0, 2.0), Point2D::new(3.0, 4.0)]),
            None
        );
    }

    #[test]
    fn test_square_reduces_to_extent() {
        let points = [
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 20.0),
            Point2D::new(20.0, 20.0),
            Point2D::new(20.0, 10.0),
        ];
        let bbox = GeometryReducer::new().reduce(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(20.0, 10.0, 10.0, 20.0));
    }

    #[test]
    fn test_concave_polygon_uses_all_vertices() {
        let points = [
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 2.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(-3.0, 4.0),
            Point2D::new(2.0, -6.5),
        ];
        let bbox = GeometryReducer::new().reduce(&points).unwrap();
        assert_eq!(bbox.top, 5.0);
        assert_eq!(bbox.bottom, -3.0);
        assert_eq!(bbox.left, -6.5);
        assert_eq!(bbox.right, 4.0);
        assert!(bbox.top >= bbox.bottom && bbox.right >= bbox.left);
    }

    #[test]
    fn test_non_finite_vertices_are_ignored() {
        let reducer = GeometryReducer::new();
        let orders = [
            [Point2D::new(f64::NAN, 1.0), Point2D::new(2.0, 3.0), Point2D::new(4.0, 5.0)],
            [Point2D::new(2.0, 3.0), Point2D::new(f64::NAN, 1.0), Point2D::new(4.0, 5.0)],
            [Point2D::new(2.0, 3.0), Point2D::new(4.0, 5.0), Point2D::new(1.0, f64::INFINITY)],
        ];
        for points in &orders {
            assert_eq!(reducer.reduce(points), None);
        }

        let mut points = vec![
            Point2D::new(2.0, 3.0),
            Point2D::new(f64::NAN, 1.0),
            Point2D::new(4.0, 5.0),
            Point2D::new(-1.0, 4.0),
        ];
        let expected = BoundingBox::new(4.0, -1.0, 3.0, 5.0);
        assert_eq!(reducer.reduce(&points), Some(expected));
        points.reverse();
        assert_eq!(reducer.reduce(&points), Some(expected));
    }

    #[test]
    fn test_collinear_points_give_degenerate_box() {
        let points = [
            Point2D::new(1.0, 7.0),
            Point2D::new(2.0, 7.0),
            Point2D::new(3.0, 7.0),
        ];
        let bbox = GeometryReducer::new().reduce(&points).unwrap();
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 2.0);
    }

    #[test]
    fn test_to_geodetic_reference_points() {
        let equator = to_geodetic(&Cartesian3::new(WGS84_A, 0.0, 0.0)).unwrap();
        assert!(equator.latitude.abs() < 1e-9);
        assert!(equator.longitude.abs() < 1e-9);

        let east = to_geodetic(&Cartesian3::new(0.0, WGS84_A, 0.0)).unwrap();
        assert!((east.longitude - 90.0).abs() < 1e-9);

        let pole = to_geodetic(&Cartesian3::new(0.0, 0.0, WGS84_A * (1.0 - WGS84_F))).unwrap();
        assert!((pole.latitude - 90.0).abs() < 1e-9);

        assert_eq!(to_geodetic(&Cartesian3::new(0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_reduce_cartesian_matches_geodetic_input() {
        let positions = [
            surface(48.8, 2.33),
            surface(48.8, 2.35),
            surface(48.9, 2.35),
            surface(48.9, 2.33),
        ];
        let bbox = GeometryReducer::new().reduce_cartesian(&positions).unwrap();
        assert!((bbox.top - 48.9).abs() < 1e-7);
        assert!((bbox.bottom - 48.8).abs() < 1e-7);
        assert!((bbox.left - 2.33).abs() < 1e-7);
        assert!((bbox.right - 2.35).abs() < 1e-7);
    }

    #[test]
    fn test_reduce_cartesian_skips_unprojectable_positions() {
        let positions = [
            surface(0.0, 0.0),
            Cartesian3::new(0.0, 0.0, 0.0),
            surface(1.0, 1.0),
        ];
        assert_eq!(GeometryReducer::new().reduce_cartesian(&positions), None);
    }
}
