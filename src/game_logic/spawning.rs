use crate::game_logic::errors::GrowthResult;
use crate::game_logic::placement::{
    PlacementBatch, PlacementKind, PlacementRule, ScatterContext, scatter, yield_to_batch,
};
use crate::map::{TerrainId, TerrainLayout};
use crate::spatial::{SpatialHash, SpatialQueryPort};
use crate::terrain::constants::{
    COMMON_SPAWN_BASE, DEFAULT_SPATIAL_BUCKET_SIZE, TERRAIN_SPAWN_WAVE_DIVISOR,
};
use crate::terrain::coordinates::Cell;
use bevy::log::debug;
use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Enemies drawn from the whole grown region each wave
pub fn common_spawn_count(wave_index: u32) -> usize {
    COMMON_SPAWN_BASE.saturating_add(wave_index) as usize
}

/// Enemies per terrain-specific roster entry each wave
pub fn per_terrain_spawn_count(wave_index: u32) -> usize {
    (wave_index / TERRAIN_SPAWN_WAVE_DIVISOR + 1) as usize
}

/// Which enemies can appear, anywhere and per terrain.
///
/// Counts come from the wave index, so the rules' density is not used here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyRoster {
    #[serde(default)]
    pub common: Option<PlacementRule>,
    #[serde(default)]
    pub by_terrain: BTreeMap<TerrainId, PlacementRule>,
}

impl EnemyRoster {
    pub fn new(common: PlacementRule) -> Self {
        Self {
            common: Some(common),
            by_terrain: BTreeMap::new(),
        }
    }

    pub fn with_terrain(mut self, terrain: impl Into<TerrainId>, rule: PlacementRule) -> Self {
        self.by_terrain.insert(terrain.into(), rule);
        self
    }

    pub fn check(&self) -> GrowthResult<()> {
        if let Some(common) = &self.common {
            common.check(&TerrainId::from("common"))?;
        }
        for (terrain, rule) in &self.by_terrain {
            rule.check(terrain)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawnPlanner {
    pub cell_size: f32,
    pub min_separation: f32,
    pub min_distance_from_player: f32,
    pub max_tries_per_unit: u32,
}

impl EnemySpawnPlanner {
    pub fn new(
        cell_size: f32,
        min_separation: f32,
        min_distance_from_player: f32,
        max_tries_per_unit: u32,
    ) -> Self {
        Self {
            cell_size,
            min_separation,
            min_distance_from_player,
            max_tries_per_unit: max_tries_per_unit.max(1),
        }
    }

    /// Spawn the common batch over every filled cell, then one batch per
    /// terrain entry restricted to cells of that terrain.
    ///
    /// Enemies share one exclusion pool with each other but never see props.
    /// Nothing spawns within `min_distance_from_player` of `player`.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        filled: &HashSet<Cell>,
        terrain: &dyn TerrainLayout,
        roster: &EnemyRoster,
        player: Vec2,
        wave_index: u32,
        spatial: &dyn SpatialQueryPort,
        rng: &mut R,
    ) -> PlacementBatch {
        let mut candidates: Vec<Cell> = filled
            .iter()
            .copied()
            .filter(|cell| cell.center(self.cell_size).distance(player) >= self.min_distance_from_player)
            .collect();
        candidates.sort_unstable();

        let ctx = ScatterContext {
            cell_size: self.cell_size,
            min_separation: self.min_separation,
            max_tries_per_unit: self.max_tries_per_unit,
            spatial,
            persistent: None,
            keep_out: Some((player, self.min_distance_from_player)),
        };
        let mut pool = SpatialHash::new(DEFAULT_SPATIAL_BUCKET_SIZE.max(self.min_separation));
        let mut batch = PlacementBatch::default();

        if let Some(common) = &roster.common {
            let target = common_spawn_count(wave_index);
            let mut cells = candidates.clone();
            let result = scatter(
                &mut cells,
                target,
                common,
                PlacementKind::Enemy,
                terrain,
                &ctx,
                &mut pool,
                rng,
            );
            batch.absorb(yield_to_batch(result, target, PlacementKind::Enemy, None));
        }

        let target = per_terrain_spawn_count(wave_index);
        for (terrain_id, rule) in &roster.by_terrain {
            let mut cells: Vec<Cell> = candidates
                .iter()
                .copied()
                .filter(|cell| terrain.terrain_at(*cell) == *terrain_id)
                .collect();
            if cells.is_empty() {
                debug!("No '{terrain_id}' cells eligible for enemies in wave {wave_index}");
                continue;
            }

            let result = scatter(
                &mut cells,
                target,
                rule,
                PlacementKind::Enemy,
                terrain,
                &ctx,
                &mut pool,
                rng,
            );
            batch.absorb(yield_to_batch(
                result,
                target,
                PlacementKind::Enemy,
                Some(terrain_id.clone()),
            ));
        }

        debug!(
            "Wave {wave_index}: {} enemies planned from {} eligible cells",
            batch.placements.len(),
            candidates.len()
        );
        batch
    }
}
