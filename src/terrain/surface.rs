//! Surface builders for the plateau fill, the ring tops between successive
//! boundaries and the vertical side walls under every boundary.

use super::constants::TOP_SURFACE_Y;
use super::geometry::Polygon;
use crate::game_logic::errors::{GrowthError, GrowthResult};
use bevy::log::warn;
use bevy::math::{Vec2, Vec3};
use bevy::render::mesh::{Indices, Mesh, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Fill,
    RingTop,
    SideWall,
}

/// Whether every expected triangle made it into the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceIntegrity {
    Complete,
    /// Ear clipping stopped early; the surface has holes
    PartialTriangulation { expected: usize, emitted: usize },
}

/// Renderer-agnostic triangle surface. Y is up, the 2D plane maps onto X/Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub integrity: SurfaceIntegrity,
}

impl Surface {
    fn with_capacity(kind: SurfaceKind, vertices: usize, indices: usize) -> Self {
        Self {
            kind,
            positions: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
            integrity: SurfaceIntegrity::Complete,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_complete(&self) -> bool {
        self.integrity == SurfaceIntegrity::Complete
    }

    fn push_vertex(&mut self, position: Vec3, uv: Vec2) {
        self.positions.push(position);
        self.uvs.push(uv);
    }

    /// Append a quad `(a, b, c, d)` laid out as `a-c` on one side and `b-d` on the other
    fn push_quad(&mut self, vertices: [(Vec3, Vec2); 4]) {
        let base = self.positions.len() as u32;
        for (position, uv) in vertices {
            self.push_vertex(position, uv);
        }
        self.indices
            .extend([base, base + 2, base + 3, base, base + 3, base + 1]);
    }
}

fn on_top(point: Vec2) -> Vec3 {
    Vec3::new(point.x, TOP_SURFACE_Y, point.y)
}

fn inverse_lerp(min: f32, max: f32, value: f32) -> f32 {
    let span = max - min;
    if span.abs() <= f32::EPSILON {
        0.0
    } else {
        ((value - min) / span).clamp(0.0, 1.0)
    }
}

/// Triangulated top surface of a whole polygon, UVs normalised into its bounds
pub fn build_fill(polygon: &Polygon) -> Surface {
    let points = polygon.points();
    let bounds = polygon.bounds();
    let triangulation = polygon.triangulate();

    let mut surface = Surface::with_capacity(
        SurfaceKind::Fill,
        points.len(),
        triangulation.indices.len(),
    );
    for &point in points {
        let uv = Vec2::new(
            inverse_lerp(bounds.min.x, bounds.max.x, point.x),
            inverse_lerp(bounds.min.y, bounds.max.y, point.y),
        );
        surface.push_vertex(on_top(point), uv);
    }

    if !triangulation.is_complete() {
        warn!(
            "Incomplete fill triangulation: {} of {} triangles for a {}-vertex boundary",
            triangulation.triangle_count(),
            triangulation.expected_triangles(),
            points.len()
        );
        surface.integrity = SurfaceIntegrity::PartialTriangulation {
            expected: triangulation.expected_triangles(),
            emitted: triangulation.triangle_count(),
        };
    }
    surface.indices = triangulation.indices;
    surface
}

/// Quad strip between two boundaries of equal vertex count.
/// UV.v runs from 0 on the inner boundary to 1 on the outer one.
pub fn build_ring(inner: &Polygon, outer: &Polygon) -> GrowthResult<Surface> {
    if inner.len() != outer.len() {
        return Err(GrowthError::MismatchedRingLength {
            inner: inner.len(),
            outer: outer.len(),
        });
    }

    let n = inner.len();
    let (inner, outer) = (inner.points(), outer.points());
    let mut surface = Surface::with_capacity(SurfaceKind::RingTop, n * 4, n * 6);

    for i in 0..n {
        let j = (i + 1) % n;
        surface.push_quad([
            (on_top(inner[i]), Vec2::new(0.0, 0.0)),
            (on_top(outer[i]), Vec2::new(0.0, 1.0)),
            (on_top(inner[j]), Vec2::new(1.0, 0.0)),
            (on_top(outer[j]), Vec2::new(1.0, 1.0)),
        ]);
    }

    Ok(surface)
}

/// Closed vertical strip hanging `height` below every boundary edge
pub fn build_walls(boundary: &Polygon, height: f32) -> Surface {
    let points = boundary.points();
    let n = points.len();
    let mut surface = Surface::with_capacity(SurfaceKind::SideWall, n * 4, n * 6);
    let drop = Vec3::new(0.0, height, 0.0);

    for i in 0..n {
        let j = (i + 1) % n;
        let top_a = on_top(points[i]);
        let top_b = on_top(points[j]);
        surface.push_quad([
            (top_a, Vec2::new(0.0, 0.0)),
            (top_b, Vec2::new(1.0, 0.0)),
            (top_a - drop, Vec2::new(0.0, 1.0)),
            (top_b - drop, Vec2::new(1.0, 1.0)),
        ]);
    }

    surface
}

impl From<&Surface> for Mesh {
    fn from(surface: &Surface) -> Self {
        let positions: Vec<[f32; 3]> = surface.positions.iter().map(|p| p.to_array()).collect();
        let uvs: Vec<[f32; 2]> = surface.uvs.iter().map(|uv| uv.to_array()).collect();

        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
            .with_inserted_indices(Indices::U32(surface.indices.clone()))
            .with_computed_normals()
    }
}
