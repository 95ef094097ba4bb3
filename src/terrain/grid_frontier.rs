//! Band-by-band flood fill over a cell grid

use super::coordinates::{Cell, Connectivity};
use super::{GrowthOutcome, GrowthStrategy, GrownRegion};
use crate::game_logic::errors::GrowthResult;
use crate::spatial::SpatialQueryPort;
use bevy::log::debug;
use std::collections::HashSet;

/// Filled region plus the ring of cells it can grow into next.
///
/// Invariants: `filled` only ever grows, and `frontier` never shares a cell with it.
#[derive(Debug, Clone, Default)]
pub struct GridFrontier {
    filled: HashSet<Cell>,
    frontier: HashSet<Cell>,
}

impl GridFrontier {
    /// Seed the filled set from a mask and collect its open neighbors as the frontier
    pub fn initialize(
        mask: impl IntoIterator<Item = Cell>,
        connectivity: Connectivity,
        spatial: &dyn SpatialQueryPort,
    ) -> Self {
        let filled: HashSet<Cell> = mask.into_iter().collect();
        let frontier = open_neighbors(filled.iter().copied(), &filled, connectivity, spatial);

        debug!(
            "Grid seeded with {} cells, {} frontier cells",
            filled.len(),
            frontier.len()
        );
        Self { filled, frontier }
    }

    pub fn filled(&self) -> &HashSet<Cell> {
        &self.filled
    }

    pub fn frontier(&self) -> &HashSet<Cell> {
        &self.frontier
    }

    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Paint up to `band_width` BFS layers outward from the frontier.
    ///
    /// Each layer is painted, then the next layer is taken from its unfilled,
    /// unblocked neighbors. The first layer left unpainted becomes the new
    /// frontier. A frontier that is empty or entirely blocked leaves everything
    /// untouched and reports `GrowthOutcome::Exhausted`.
    pub fn advance(
        &mut self,
        band_width: u32,
        connectivity: Connectivity,
        spatial: &dyn SpatialQueryPort,
    ) -> GrowthOutcome {
        // Blockers may have appeared since the frontier was computed
        let mut layer: HashSet<Cell> = self
            .frontier
            .iter()
            .copied()
            .filter(|cell| !spatial.is_blocked(*cell))
            .collect();
        if layer.is_empty() {
            return GrowthOutcome::Exhausted;
        }
        self.frontier.clear();
        let mut band = Vec::new();

        for depth in 0..band_width {
            if layer.is_empty() {
                debug!("Growth bounded after {} of {} layers", depth, band_width);
                break;
            }
            self.filled.extend(layer.iter().copied());
            band.extend(layer.iter().copied());
            layer = open_neighbors(layer.iter().copied(), &self.filled, connectivity, spatial);
        }

        self.frontier = layer;
        band.sort_unstable();
        GrowthOutcome::Grown(GrownRegion {
            band,
            surfaces: Vec::new(),
        })
    }
}

/// Neighbors of `cells` that are neither filled nor blocked
fn open_neighbors(
    cells: impl Iterator<Item = Cell>,
    filled: &HashSet<Cell>,
    connectivity: Connectivity,
    spatial: &dyn SpatialQueryPort,
) -> HashSet<Cell> {
    cells
        .flat_map(|cell| cell.neighbors(connectivity))
        .filter(|n| !filled.contains(n) && !spatial.is_blocked(*n))
        .collect()
}

/// Grid strategy with a fixed band width and connectivity per wave
#[derive(Debug, Clone)]
pub struct GridGrowth {
    frontier: GridFrontier,
    band_width: u32,
    connectivity: Connectivity,
    cell_size: f32,
}

impl GridGrowth {
    pub fn new(
        mask: impl IntoIterator<Item = Cell>,
        band_width: u32,
        connectivity: Connectivity,
        cell_size: f32,
        spatial: &dyn SpatialQueryPort,
    ) -> Self {
        Self {
            frontier: GridFrontier::initialize(mask, connectivity, spatial),
            band_width,
            connectivity,
            cell_size,
        }
    }

    pub fn frontier(&self) -> &GridFrontier {
        &self.frontier
    }
}

impl GrowthStrategy for GridGrowth {
    fn advance(&mut self, spatial: &dyn SpatialQueryPort) -> GrowthResult<GrowthOutcome> {
        Ok(self
            .frontier
            .advance(self.band_width, self.connectivity, spatial))
    }

    fn filled(&self) -> &HashSet<Cell> {
        self.frontier.filled()
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{OpenField, SpatialHash};

    fn ten_cell_mask() -> Vec<Cell> {
        // 2x5 block
        (0..5)
            .flat_map(|x| (0..2).map(move |y| Cell::new(x, y)))
            .collect()
    }

    fn band_of(outcome: GrowthOutcome) -> Vec<Cell> {
        match outcome {
            GrowthOutcome::Grown(region) => region.band,
            GrowthOutcome::Exhausted => panic!("expected growth"),
        }
    }

    #[test]
    fn test_initialize_frontier_is_disjoint_ring() {
        let grid = GridFrontier::initialize([Cell::new(0, 0)], Connectivity::Four, &OpenField);
        assert_eq!(grid.filled().len(), 1);
        assert_eq!(grid.frontier().len(), 4);
        assert!(grid.frontier().is_disjoint(grid.filled()));
    }

    #[test]
    fn test_band_is_cells_within_graph_distance() {
        let mask = ten_cell_mask();
        let mut grid = GridFrontier::initialize(mask.clone(), Connectivity::Eight, &OpenField);
        let band = band_of(grid.advance(3, Connectivity::Eight, &OpenField));

        // 8-connected graph distance on an open grid is the Chebyshev distance
        let mut expected = Vec::new();
        for x in -4..=9 {
            for y in -4..=6 {
                let cell = Cell::new(x, y);
                let distance = mask
                    .iter()
                    .map(|m| (m.x - x).abs().max((m.y - y).abs()))
                    .min()
                    .unwrap();
                if (1..=3).contains(&distance) {
                    expected.push(cell);
                }
            }
        }
        expected.sort_unstable();

        assert_eq!(band, expected);
        assert_eq!(grid.filled().len(), 10 + band.len());
        assert!(grid.frontier().is_disjoint(grid.filled()));
    }

    #[test]
    fn test_four_connectivity_grows_diamond() {
        let mut grid = GridFrontier::initialize([Cell::new(0, 0)], Connectivity::Four, &OpenField);
        let band = band_of(grid.advance(2, Connectivity::Four, &OpenField));
        assert_eq!(band.len(), 12);
        assert!(band.iter().all(|c| c.x.abs() + c.y.abs() <= 2));
        assert_eq!(grid.frontier().len(), 12);
    }

    #[test]
    fn test_growth_is_monotonic_and_disjoint() {
        let mut blockers = SpatialHash::new(1.0);
        blockers.block_cells((-6..=6).map(|y| Cell::new(4, y)));

        let mut grid = GridFrontier::initialize(ten_cell_mask(), Connectivity::Eight, &blockers);
        let mut previous = grid.filled().clone();
        for _ in 0..4 {
            grid.advance(2, Connectivity::Eight, &blockers);
            assert!(grid.filled().is_superset(&previous));
            assert!(grid.frontier().is_disjoint(grid.filled()));
            assert!(!grid.filled().contains(&Cell::new(4, 5)));
            previous = grid.filled().clone();
        }
    }

    #[test]
    fn test_enclosed_region_exhausts() {
        let mut walls = SpatialHash::new(1.0);
        for i in -2..=2 {
            walls.block_cells([
                Cell::new(i, -2),
                Cell::new(i, 2),
                Cell::new(-2, i),
                Cell::new(2, i),
            ]);
        }

        let mut grid = GridFrontier::initialize([Cell::new(0, 0)], Connectivity::Eight, &walls);
        let band = band_of(grid.advance(5, Connectivity::Eight, &walls));
        assert_eq!(band.len(), 8);
        assert!(grid.is_exhausted());

        let filled_before = grid.filled().len();
        assert!(grid.advance(5, Connectivity::Eight, &walls).is_exhausted());
        assert_eq!(grid.filled().len(), filled_before);
    }

    #[test]
    fn test_blocked_frontier_exhausts_without_painting() {
        let mut grid = GridFrontier::initialize([Cell::new(0, 0)], Connectivity::Four, &OpenField);
        let mut walls = SpatialHash::new(1.0);
        walls.block_cells(Cell::new(0, 0).neighbors(Connectivity::Four));

        assert!(grid.advance(3, Connectivity::Four, &walls).is_exhausted());
        assert_eq!(grid.filled().len(), 1);
        assert_eq!(grid.frontier().len(), 4);

        // Growth resumes once the blockers are gone
        let band = band_of(grid.advance(1, Connectivity::Four, &OpenField));
        assert_eq!(band.len(), 4);
    }

    #[test]
    fn test_grid_growth_strategy_reports_band() {
        let mut growth = GridGrowth::new([Cell::new(0, 0)], 1, Connectivity::Eight, 1.0, &OpenField);
        let outcome = growth.advance(&OpenField).unwrap();
        assert_eq!(band_of(outcome).len(), 8);
        assert_eq!(growth.filled().len(), 9);
        assert_eq!(growth.name(), "grid");
    }
}
