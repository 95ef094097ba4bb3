//! Pure 2D polygon helpers: orientation, containment, offsetting and ear clipping

use super::constants::{EAR_CLIP_ITERATION_CAP, PARALLEL_EPSILON};
use crate::game_logic::errors::{GrowthError, GrowthResult};
use bevy::log::debug;
use bevy::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Vertex ordering of a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// Orientation from the sign of the shoelace area. Zero-area input counts as clockwise.
    pub fn of(points: &[Vec2]) -> Self {
        if signed_area(points) > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }
}

/// Closed polygon with at least three vertices; the last vertex connects back to the first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vec2>,
}

/// Ear clipping output as triangle indices into the source polygon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangulation {
    pub indices: Vec<u32>,
    pub vertex_count: usize,
}

impl Triangulation {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A simple polygon with n vertices always yields n - 2 triangles
    pub fn expected_triangles(&self) -> usize {
        self.vertex_count.saturating_sub(2)
    }

    pub fn is_complete(&self) -> bool {
        self.triangle_count() == self.expected_triangles()
    }
}

pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Shoelace area, positive for counter-clockwise vertex order
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    0.5 * area
}

/// Whether `b` is a convex corner of the path `a -> b -> c` for the given winding
pub fn is_convex(a: Vec2, b: Vec2, c: Vec2, winding: Winding) -> bool {
    let turn = cross(b - a, c - b);
    match winding {
        Winding::CounterClockwise => turn > 0.0,
        Winding::Clockwise => turn < 0.0,
    }
}

/// Triangle containment test, points on an edge count as inside
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let c1 = cross(b - a, p - a);
    let c2 = cross(c - b, p - b);
    let c3 = cross(a - c, p - c);
    let has_neg = c1 < 0.0 || c2 < 0.0 || c3 < 0.0;
    let has_pos = c1 > 0.0 || c2 > 0.0 || c3 > 0.0;
    !(has_neg && has_pos)
}

/// Even-odd containment test against a closed polygon
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_at = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Intersection of the lines `p + t*r` and `q + u*s`, `None` when (nearly) parallel
pub fn line_intersection(p: Vec2, r: Vec2, q: Vec2, s: Vec2) -> Option<Vec2> {
    let rxs = cross(r, s);
    if rxs.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = cross(q - p, s) / rxs;
    Some(p + r * t)
}

/// Axis-aligned bounds of a point set
pub fn bounds(points: &[Vec2]) -> Option<Rect> {
    let first = *points.first()?;
    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    Some(Rect { min, max })
}

/// Push every edge of the polygon outward by `distance` and rebuild the vertices
/// from the intersections of neighboring displaced edges.
///
/// The outward side is derived from the winding, so clockwise and
/// counter-clockwise input both grow. Corners whose edges are (nearly) parallel,
/// or that sit on a zero-length edge, are displaced along a single edge normal
/// instead. The output always has the same vertex count as the input.
pub fn offset_polygon(points: &[Vec2], distance: f32) -> Vec<Vec2> {
    let n = points.len();
    // Left normals point inward on counter-clockwise polygons
    let outward = match Winding::of(points) {
        Winding::CounterClockwise => -1.0,
        Winding::Clockwise => 1.0,
    };

    let mut fallbacks = 0usize;
    let result: Vec<Vec2> = (0..n)
        .map(|i| {
            let p0 = points[(i + n - 1) % n];
            let p1 = points[i];
            let p2 = points[(i + 1) % n];

            let e0 = (p1 - p0).normalize_or_zero();
            let e1 = (p2 - p1).normalize_or_zero();
            let n0 = e0.perp() * outward;
            let n1 = e1.perp() * outward;

            let line0 = p1 + n0 * distance;
            let line1 = p1 + n1 * distance;

            match line_intersection(line0, e0, line1, e1) {
                Some(hit) => hit,
                None => {
                    fallbacks += 1;
                    if e0 == Vec2::ZERO { line1 } else { line0 }
                }
            }
        })
        .collect();

    if fallbacks > 0 {
        debug!(
            "Polygon offset used normal displacement for {} of {} vertices",
            fallbacks, n
        );
    }
    result
}

/// Ear clipping triangulation.
///
/// Stops early when no ear can be found (self-intersecting or otherwise
/// degenerate input) or after the iteration cap; the partial result is
/// returned and `Triangulation::is_complete` reports the shortfall.
pub fn triangulate(points: &[Vec2]) -> Triangulation {
    let n = points.len();
    let mut indices = Vec::with_capacity(n.saturating_sub(2) * 3);
    let mut remaining: Vec<usize> = (0..n).collect();
    let winding = Winding::of(points);

    let mut guard = 0;
    while remaining.len() > 2 && guard < EAR_CLIP_ITERATION_CAP {
        guard += 1;
        let count = remaining.len();

        let ear = (0..count).find(|&i| {
            let a = remaining[(i + count - 1) % count];
            let b = remaining[i];
            let c = remaining[(i + 1) % count];

            if !is_convex(points[a], points[b], points[c], winding) {
                return false;
            }
            !remaining.iter().any(|&p| {
                p != a
                    && p != b
                    && p != c
                    && point_in_triangle(points[p], points[a], points[b], points[c])
            })
        });

        let Some(i) = ear else {
            break;
        };
        let a = remaining[(i + count - 1) % count];
        let c = remaining[(i + 1) % count];
        indices.extend([a as u32, remaining[i] as u32, c as u32]);
        remaining.remove(i);
    }

    Triangulation {
        indices,
        vertex_count: n,
    }
}

impl Polygon {
    /// Create a polygon, rejecting fewer than three vertices
    pub fn new(points: Vec<Vec2>) -> GrowthResult<Self> {
        if points.len() < 3 {
            return Err(GrowthError::DegeneratePolygon {
                vertices: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Axis-aligned rectangle, counter-clockwise
    pub fn rectangle(min: Vec2, max: Vec2) -> Self {
        Self {
            points: vec![
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
            ],
        }
    }

    /// Regular polygon around `center`, counter-clockwise. Fewer than 3 sides are bumped to 3.
    pub fn regular(center: Vec2, radius: f32, sides: usize) -> Self {
        let sides = sides.max(3);
        let points = (0..sides)
            .map(|i| {
                let angle = i as f32 / sides as f32 * std::f32::consts::TAU;
                center + Vec2::from_angle(angle) * radius
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn signed_area(&self) -> f32 {
        signed_area(&self.points)
    }

    pub fn winding(&self) -> Winding {
        Winding::of(&self.points)
    }

    pub fn bounds(&self) -> Rect {
        bounds(&self.points).unwrap_or_default()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.points)
    }

    /// Outward offset; vertex count is preserved
    pub fn offset(&self, distance: f32) -> Self {
        Self {
            points: offset_polygon(&self.points, distance),
        }
    }

    pub fn triangulate(&self) -> Triangulation {
        triangulate(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    fn l_shape() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_signed_area_and_winding() {
        let ccw = unit_square();
        assert_eq!(signed_area(&ccw), 1.0);
        assert_eq!(Winding::of(&ccw), Winding::CounterClockwise);

        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        assert_eq!(signed_area(&cw), -1.0);
        assert_eq!(Winding::of(&cw), Winding::Clockwise);
    }

    #[test]
    fn test_point_in_triangle_includes_boundary() {
        let (a, b, c) = (Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0));
        assert!(point_in_triangle(Vec2::new(0.5, 0.5), a, b, c));
        assert!(point_in_triangle(Vec2::new(1.0, 0.0), a, b, c));
        assert!(point_in_triangle(a, a, b, c));
        assert!(!point_in_triangle(Vec2::new(1.5, 1.5), a, b, c));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        let shape = l_shape();
        assert!(point_in_polygon(Vec2::new(0.5, 1.5), &shape));
        assert!(point_in_polygon(Vec2::new(1.5, 0.5), &shape));
        assert!(!point_in_polygon(Vec2::new(1.5, 1.5), &shape));
        assert!(!point_in_polygon(Vec2::new(-0.5, 0.5), &shape));
    }

    #[test]
    fn test_triangulate_simple_polygons() {
        let square = triangulate(&unit_square());
        assert_eq!(square.triangle_count(), 2);
        assert!(square.is_complete());

        let concave = triangulate(&l_shape());
        assert_eq!(concave.triangle_count(), 4);
        assert!(concave.is_complete());

        let cw: Vec<Vec2> = l_shape().into_iter().rev().collect();
        assert_eq!(triangulate(&cw).triangle_count(), 4);

        let octagon = Polygon::regular(Vec2::ZERO, 5.0, 8);
        assert_eq!(octagon.triangulate().triangle_count(), 6);
    }

    #[test]
    fn test_triangulate_total_area_matches_polygon() {
        let shape = l_shape();
        let tris = triangulate(&shape);
        let total: f32 = tris
            .indices
            .chunks(3)
            .map(|t| {
                signed_area(&[
                    shape[t[0] as usize],
                    shape[t[1] as usize],
                    shape[t[2] as usize],
                ])
                .abs()
            })
            .sum();
        assert!((total - signed_area(&shape).abs()).abs() < 1e-5);
    }

    #[test]
    fn test_triangulate_bowtie_is_flagged_incomplete() {
        let bowtie = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 2.0),
        ];
        let result = triangulate(&bowtie);
        assert!(!result.is_complete());
        assert!(result.triangle_count() < result.expected_triangles());
    }

    #[test]
    fn test_offset_square_grows_outward() {
        let grown = offset_polygon(&unit_square(), 1.0);
        let expected = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(-1.0, 2.0),
        ];
        for (got, want) in grown.iter().zip(expected) {
            assert!(got.distance(want) < 1e-5, "{got} != {want}");
        }

        let cw: Vec<Vec2> = unit_square().into_iter().rev().collect();
        let grown_cw = offset_polygon(&cw, 1.0);
        assert!((signed_area(&grown_cw).abs() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_offset_preserves_vertex_count() {
        for distance in [0.1, 1.0, 7.5] {
            for shape in [unit_square(), l_shape()] {
                assert_eq!(offset_polygon(&shape, distance).len(), shape.len());
            }
            let octagon = Polygon::regular(Vec2::new(3.0, -2.0), 4.0, 8);
            assert_eq!(octagon.offset(distance).len(), 8);
        }
    }

    #[test]
    fn test_offset_collinear_vertex_falls_back_to_normal() {
        let with_midpoint = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let grown = offset_polygon(&with_midpoint, 0.5);
        assert_eq!(grown.len(), 5);
        assert!(grown[1].distance(Vec2::new(1.0, -0.5)) < 1e-5);
    }

    #[test]
    fn test_offset_repeated_vertex_stays_finite() {
        let with_duplicate = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let grown = offset_polygon(&with_duplicate, 0.5);
        assert_eq!(grown.len(), 5);
        assert!(grown.iter().all(|p| p.is_finite()));
        // Each copy of the corner is pushed along the normal of its non-degenerate edge
        assert!(grown[1].distance(Vec2::new(1.0, -0.5)) < 1e-5);
        assert!(grown[2].distance(Vec2::new(1.5, 0.0)) < 1e-5);
    }

    #[test]
    fn test_polygon_requires_three_vertices() {
        assert!(Polygon::new(vec![Vec2::ZERO, Vec2::X]).is_err());
        let poly = Polygon::new(unit_square()).unwrap();
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(poly.contains(Vec2::splat(0.5)));
    }
}
