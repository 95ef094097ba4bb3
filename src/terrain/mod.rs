pub mod constants;
pub mod coordinates;
pub mod geometry;
pub mod grid_frontier;
pub mod polygon_growth;
pub mod surface;

use crate::game_logic::errors::GrowthResult;
use crate::spatial::SpatialQueryPort;
use coordinates::Cell;
use std::collections::HashSet;
use surface::Surface;

pub use grid_frontier::{GridFrontier, GridGrowth};
pub use polygon_growth::{PolygonGrowth, Ring};

/// Cells and geometry added by one wave
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrownRegion {
    /// Newly painted cells in ascending order
    pub band: Vec<Cell>,
    pub surfaces: Vec<Surface>,
}

/// Result of asking a strategy to grow
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthOutcome {
    Grown(GrownRegion),
    /// Nothing left to grow into; the region is enclosed by blocked cells
    Exhausted,
}

impl GrowthOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GrowthOutcome::Exhausted)
    }
}

/// A way of growing the playable area one wave at a time.
///
/// Grid and polygon growth both implement this, so the orchestrator and the
/// placement planner never need to know which one is active.
pub trait GrowthStrategy {
    /// Grow by one wave and report what was added
    fn advance(&mut self, spatial: &dyn SpatialQueryPort) -> GrowthResult<GrowthOutcome>;

    /// Every cell painted so far
    fn filled(&self) -> &HashSet<Cell>;

    /// World units per cell
    fn cell_size(&self) -> f32;

    fn name(&self) -> &'static str;
}
