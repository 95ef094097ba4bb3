use crate::terrain::coordinates::Cell;
use derive_more::{Display, From};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Terrain identity of a cell, the key placement rules are looked up by
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TerrainId(String);

impl TerrainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TerrainId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Answers which terrain a cell belongs to
pub trait TerrainLayout {
    fn terrain_at(&self, cell: Cell) -> TerrainId;
}

impl<F: Fn(Cell) -> TerrainId> TerrainLayout for F {
    fn terrain_at(&self, cell: Cell) -> TerrainId {
        self(cell)
    }
}

/// Explicit per-cell terrain with a fallback for everything else
#[derive(Debug, Clone)]
pub struct TerrainMap {
    cells: HashMap<Cell, TerrainId>,
    fallback: TerrainId,
}

impl TerrainMap {
    pub fn new(fallback: impl Into<TerrainId>) -> Self {
        Self {
            cells: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    /// Uniform terrain everywhere
    pub fn uniform(terrain: impl Into<TerrainId>) -> Self {
        Self::new(terrain)
    }

    pub fn set(&mut self, cell: Cell, terrain: impl Into<TerrainId>) {
        self.cells.insert(cell, terrain.into());
    }

    pub fn paint(&mut self, cells: impl IntoIterator<Item = Cell>, terrain: impl Into<TerrainId>) {
        let terrain = terrain.into();
        for cell in cells {
            self.cells.insert(cell, terrain.clone());
        }
    }
}

impl TerrainLayout for TerrainMap {
    fn terrain_at(&self, cell: Cell) -> TerrainId {
        self.cells
            .get(&cell)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Terrain picked by thresholding seeded Perlin noise
#[derive(Debug, Clone)]
pub struct NoiseTerrain {
    perlin: Perlin,
    frequency: f64,
    /// (upper noise bound, terrain), ascending by bound
    bands: Vec<(f64, TerrainId)>,
    fallback: TerrainId,
}

impl NoiseTerrain {
    /// `bands` are (upper bound, terrain) pairs in noise space [-1, 1]; values
    /// above every bound map to `fallback`
    pub fn new(
        seed: u32,
        frequency: f64,
        mut bands: Vec<(f64, TerrainId)>,
        fallback: impl Into<TerrainId>,
    ) -> Self {
        bands.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            perlin: Perlin::new(seed),
            frequency,
            bands,
            fallback: fallback.into(),
        }
    }

    /// Three-way split used by the CLI: meadow, forest, rocky
    pub fn meadow_forest_rock(seed: u32) -> Self {
        Self::new(
            seed,
            0.08,
            vec![(-0.15, "meadow".into()), (0.25, "forest".into())],
            "rocky",
        )
    }

    pub fn sample(&self, cell: Cell) -> f64 {
        // Offset off the integer lattice, Perlin is zero on it
        let x = (cell.x as f64 + 0.5) * self.frequency;
        let y = (cell.y as f64 + 0.5) * self.frequency;
        self.perlin.get([x, y])
    }
}

impl TerrainLayout for NoiseTerrain {
    fn terrain_at(&self, cell: Cell) -> TerrainId {
        let value = self.sample(cell);
        self.bands
            .iter()
            .find(|(bound, _)| value < *bound)
            .map(|(_, terrain)| terrain.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
