//! Boundary-offset growth: each wave pushes the outline outward by a ring
//! thickness and emits the ring top plus fresh side walls.

use super::coordinates::Cell;
use super::geometry::Polygon;
use super::surface::{Surface, build_fill, build_ring, build_walls};
use super::{GrowthOutcome, GrowthStrategy, GrownRegion};
use crate::game_logic::errors::GrowthResult;
use crate::spatial::SpatialQueryPort;
use bevy::log::debug;
use std::collections::HashSet;

/// Inner and outer boundary of one growth wave
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub inner: Polygon,
    pub outer: Polygon,
}

#[derive(Debug, Clone)]
pub struct PolygonGrowth {
    boundary: Polygon,
    ring_thickness: f32,
    wall_height: f32,
    cell_size: f32,
    filled: HashSet<Cell>,
    /// Every cell already under the boundary, blocked or not
    covered: HashSet<Cell>,
    base_surfaces: Vec<Surface>,
    rings: Vec<Ring>,
}

/// Cells whose centers fall inside the polygon
pub fn rasterize(polygon: &Polygon, cell_size: f32) -> Vec<Cell> {
    let bounds = polygon.bounds();
    let min = Cell::from_world(bounds.min, cell_size);
    let max = Cell::from_world(bounds.max, cell_size);

    let mut cells = Vec::new();
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let cell = Cell::new(x, y);
            if polygon.contains(cell.center(cell_size)) {
                cells.push(cell);
            }
        }
    }
    cells
}

impl PolygonGrowth {
    /// Build the initial plateau (fill and walls) and paint the cells it covers
    pub fn new(boundary: Polygon, ring_thickness: f32, wall_height: f32, cell_size: f32) -> Self {
        let filled: HashSet<Cell> = rasterize(&boundary, cell_size).into_iter().collect();
        let base_surfaces = vec![build_fill(&boundary), build_walls(&boundary, wall_height)];

        debug!(
            "Plateau built from {}-vertex boundary covering {} cells",
            boundary.len(),
            filled.len()
        );
        Self {
            boundary,
            ring_thickness,
            wall_height,
            cell_size,
            covered: filled.clone(),
            filled,
            base_surfaces,
            rings: Vec::new(),
        }
    }

    /// Current outer boundary
    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    /// Fill and wall surfaces of the initial plateau
    pub fn base_surfaces(&self) -> &[Surface] {
        &self.base_surfaces
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Offset the boundary by `thickness` and build the ring between old and new outline.
    ///
    /// Only cells newly covered by the ring are candidates; blocked ones are
    /// skipped for good. Returns `Exhausted` without touching the boundary when
    /// every new cell under the ring is blocked.
    pub fn expand_once(
        &mut self,
        thickness: f32,
        spatial: &dyn SpatialQueryPort,
    ) -> GrowthResult<GrowthOutcome> {
        let outer = self.boundary.offset(thickness);

        let candidates: Vec<Cell> = rasterize(&outer, self.cell_size)
            .into_iter()
            .filter(|cell| !self.covered.contains(cell))
            .collect();
        let band: Vec<Cell> = candidates
            .iter()
            .copied()
            .filter(|cell| !spatial.is_blocked(*cell))
            .collect();
        if !candidates.is_empty() && band.is_empty() {
            return Ok(GrowthOutcome::Exhausted);
        }

        let ring_top = build_ring(&self.boundary, &outer)?;
        let walls = build_walls(&outer, self.wall_height);

        self.covered.extend(candidates);
        self.filled.extend(band.iter().copied());
        let inner = std::mem::replace(&mut self.boundary, outer.clone());
        self.rings.push(Ring { inner, outer });

        Ok(GrowthOutcome::Grown(GrownRegion {
            band,
            surfaces: vec![ring_top, walls],
        }))
    }
}

impl GrowthStrategy for PolygonGrowth {
    fn advance(&mut self, spatial: &dyn SpatialQueryPort) -> GrowthResult<GrowthOutcome> {
        self.expand_once(self.ring_thickness, spatial)
    }

    fn filled(&self) -> &HashSet<Cell> {
        &self.filled
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn name(&self) -> &'static str {
        "polygon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{OpenField, SpatialHash};
    use crate::terrain::surface::SurfaceKind;
    use bevy::math::Vec2;

    fn plateau() -> PolygonGrowth {
        PolygonGrowth::new(
            Polygon::rectangle(Vec2::splat(-2.0), Vec2::splat(2.0)),
            1.0,
            0.2,
            1.0,
        )
    }

    #[test]
    fn test_rasterize_square() {
        let cells = rasterize(&Polygon::rectangle(Vec2::ZERO, Vec2::splat(3.0)), 1.0);
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&Cell::new(2, 2)));
    }

    #[test]
    fn test_plateau_surfaces_and_cells() {
        let growth = plateau();
        assert_eq!(growth.filled().len(), 16);
        let kinds: Vec<_> = growth.base_surfaces().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SurfaceKind::Fill, SurfaceKind::SideWall]);
    }

    #[test]
    fn test_expand_emits_ring_and_walls() {
        let mut growth = plateau();
        let GrowthOutcome::Grown(region) = growth.advance(&OpenField).unwrap() else {
            panic!("expected growth");
        };

        // 6x6 minus the original 4x4
        assert_eq!(region.band.len(), 20);
        assert_eq!(growth.filled().len(), 36);
        assert_eq!(region.surfaces[0].kind, SurfaceKind::RingTop);
        assert_eq!(region.surfaces[0].triangle_count(), 8);
        assert_eq!(region.surfaces[1].kind, SurfaceKind::SideWall);
        assert_eq!(growth.boundary().len(), 4);
        assert_eq!(growth.rings().len(), 1);
        assert!((growth.boundary().signed_area() - 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_successive_rings_chain_boundaries() {
        let mut growth = plateau();
        growth.advance(&OpenField).unwrap();
        growth.advance(&OpenField).unwrap();

        let rings = growth.rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].outer, rings[1].inner);
        assert_eq!(&rings[1].outer, growth.boundary());
    }

    #[test]
    fn test_fully_blocked_ring_exhausts() {
        let mut blockers = SpatialHash::new(1.0);
        for i in -3..3 {
            blockers.block_cells([
                Cell::new(i, -3),
                Cell::new(i, 2),
                Cell::new(-3, i),
                Cell::new(2, i),
            ]);
        }

        let mut growth = plateau();
        let before = growth.boundary().clone();
        assert!(growth.advance(&blockers).unwrap().is_exhausted());
        assert_eq!(growth.boundary(), &before);
        assert_eq!(growth.filled().len(), 16);
    }

    #[test]
    fn test_cells_skipped_under_a_ring_are_never_painted_later() {
        let mut blockers = SpatialHash::new(1.0);
        blockers.block_cells([Cell::new(2, 0)]);

        let mut growth = plateau();
        let GrowthOutcome::Grown(first) = growth.advance(&blockers).unwrap() else {
            panic!("expected growth");
        };
        assert_eq!(first.band.len(), 19);
        assert!(!growth.filled().contains(&Cell::new(2, 0)));

        // Unblocked behind the ring: the next wave only paints its own ring
        let GrowthOutcome::Grown(second) = growth.advance(&OpenField).unwrap() else {
            panic!("expected growth");
        };
        assert!(!second.band.contains(&Cell::new(2, 0)));
        assert_eq!(second.band.len(), 28);
    }
}
