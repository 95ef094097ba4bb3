//! Per-wave sequencing: grow, build geometry, populate, then advance the wave index.

pub mod events;
pub mod scheduler;

use crate::game_logic::errors::GrowthResult;
use crate::game_logic::placement::{Placement, PlacementBatch, PlacementPlanner, Shortfall};
use crate::game_logic::spawning::EnemySpawnPlanner;
use crate::map::TerrainLayout;
use crate::resources::{RingStyle, StrategyKind, WaveConfig, WaveMode};
use crate::spatial::{SpatialHash, SpatialQueryPort};
use crate::terrain::coordinates::Cell;
use crate::terrain::geometry::Polygon;
use crate::terrain::polygon_growth::rasterize;
use crate::terrain::surface::Surface;
use crate::terrain::{GridGrowth, GrowthOutcome, GrowthStrategy, PolygonGrowth};
use bevy::log::{info, warn};
use bevy::math::Vec2;
use events::WaveListener;
use rand::SeedableRng;
use rand_pcg::Pcg64;

pub use events::{WaveEvent, WaveLog};
pub use scheduler::WaveScheduler;

/// Everything one completed wave produced
#[derive(Debug, Clone, PartialEq)]
pub struct WaveReport {
    pub wave_index: u32,
    pub strategy: &'static str,
    pub band: Vec<Cell>,
    pub surfaces: Vec<Surface>,
    pub ring_style: RingStyle,
    pub props: Vec<Placement>,
    pub enemies: Vec<Placement>,
    pub shortfalls: Vec<Shortfall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WaveOutcome {
    Completed(WaveReport),
    /// Growth had nowhere left to go; the wave index did not advance
    Exhausted { wave_index: u32 },
}

impl WaveOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, WaveOutcome::Exhausted { .. })
    }

    pub fn report(&self) -> Option<&WaveReport> {
        match self {
            WaveOutcome::Completed(report) => Some(report),
            WaveOutcome::Exhausted { .. } => None,
        }
    }
}

pub struct WaveOrchestrator {
    strategy: Box<dyn GrowthStrategy>,
    terrain: Box<dyn TerrainLayout>,
    config: WaveConfig,
    prop_planner: PlacementPlanner,
    enemy_planner: EnemySpawnPlanner,
    /// Props from every completed wave; later props keep their distance
    placed_props: SpatialHash,
    wave_index: u32,
    rng: Pcg64,
    listeners: Vec<Box<dyn WaveListener>>,
}

impl WaveOrchestrator {
    pub fn new(
        strategy: Box<dyn GrowthStrategy>,
        terrain: Box<dyn TerrainLayout>,
        config: WaveConfig,
    ) -> Self {
        let cell_size = strategy.cell_size();
        let prop_planner = PlacementPlanner::new(
            cell_size,
            config.placement.min_separation.get(),
            config.placement.max_tries_per_unit.get(),
        );
        let enemy_planner = EnemySpawnPlanner::new(
            cell_size,
            config.enemies.min_separation.get(),
            config.enemies.min_spawn_distance_from_player.get(),
            config.enemies.max_tries_per_unit.get(),
        );

        Self {
            strategy,
            terrain,
            prop_planner,
            enemy_planner,
            placed_props: SpatialHash::new(prop_planner.min_separation.max(cell_size)),
            wave_index: config.schedule.start_wave_index.get(),
            rng: Pcg64::seed_from_u64(config.schedule.seed),
            listeners: Vec::new(),
            config,
        }
    }

    /// Grid growth seeded from `mask`, using the growth settings in `config`
    pub fn grid(
        mask: impl IntoIterator<Item = Cell>,
        terrain: Box<dyn TerrainLayout>,
        config: WaveConfig,
        spatial: &dyn SpatialQueryPort,
    ) -> Self {
        let growth = &config.growth;
        let strategy = GridGrowth::new(
            mask,
            growth.band_width.get(),
            growth.connectivity,
            growth.cell_size.get(),
            spatial,
        );
        Self::new(Box::new(strategy), terrain, config)
    }

    /// Polygon growth from an initial plateau outline
    pub fn polygon(boundary: Polygon, terrain: Box<dyn TerrainLayout>, config: WaveConfig) -> Self {
        let growth = &config.growth;
        let strategy = PolygonGrowth::new(
            boundary,
            growth.ring_thickness.get(),
            growth.wall_height.get(),
            growth.cell_size.get(),
        );
        Self::new(Box::new(strategy), terrain, config)
    }

    /// Pick the strategy named in the config. Grid growth uses the cells under `boundary` as its mask.
    pub fn from_config(
        boundary: Polygon,
        terrain: Box<dyn TerrainLayout>,
        config: WaveConfig,
        spatial: &dyn SpatialQueryPort,
    ) -> Self {
        match config.growth.strategy {
            StrategyKind::Grid => {
                let mask = rasterize(&boundary, config.growth.cell_size.get());
                Self::grid(mask, terrain, config, spatial)
            }
            StrategyKind::Polygon => Self::polygon(boundary, terrain, config),
        }
    }

    pub fn wave_index(&self) -> u32 {
        self.wave_index
    }

    pub fn strategy(&self) -> &dyn GrowthStrategy {
        self.strategy.as_ref()
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn placed_props(&self) -> &SpatialHash {
        &self.placed_props
    }

    pub fn set_mode(&mut self, mode: WaveMode) {
        self.config.schedule.mode = mode;
    }

    pub fn register_listener(&mut self, listener: Box<dyn WaveListener>) {
        self.listeners.push(listener);
    }

    /// Grow one wave and populate it.
    ///
    /// The wave index only advances when growth produced a region. Placement
    /// shortfalls are reported to listeners but never fail the wave.
    pub fn run_wave(
        &mut self,
        spatial: &dyn SpatialQueryPort,
        player: Vec2,
    ) -> GrowthResult<WaveOutcome> {
        let wave_index = self.wave_index;
        let region = match self.strategy.advance(spatial)? {
            GrowthOutcome::Grown(region) => region,
            GrowthOutcome::Exhausted => {
                warn!(
                    "Wave {wave_index}: {} growth exhausted with {} cells filled",
                    self.strategy.name(),
                    self.strategy.filled().len()
                );
                for listener in &mut self.listeners {
                    listener.on_growth_exhausted(wave_index);
                }
                return Ok(WaveOutcome::Exhausted { wave_index });
            }
        };

        let mode = self.config.schedule.mode;
        let props = if mode.places_props() {
            self.prop_planner.place(
                &region.band,
                self.terrain.as_ref(),
                &self.config.prop_rules,
                spatial,
                Some(&self.placed_props),
                &mut self.rng,
            )
        } else {
            PlacementBatch::default()
        };
        for prop in &props.placements {
            self.placed_props.insert(prop.position, 0.0);
        }

        let enemies = if mode.spawns_enemies() {
            self.enemy_planner.plan(
                self.strategy.filled(),
                self.terrain.as_ref(),
                &self.config.enemy_roster,
                player,
                wave_index,
                spatial,
                &mut self.rng,
            )
        } else {
            PlacementBatch::default()
        };

        let mut shortfalls = props.shortfalls;
        shortfalls.extend(enemies.shortfalls);
        let report = WaveReport {
            wave_index,
            strategy: self.strategy.name(),
            band: region.band,
            surfaces: region.surfaces,
            ring_style: RingStyle::for_wave(&self.config.ring_styles, wave_index),
            props: props.placements,
            enemies: enemies.placements,
            shortfalls,
        };

        for listener in &mut self.listeners {
            for shortfall in &report.shortfalls {
                listener.on_shortfall(wave_index, shortfall);
            }
            listener.on_wave_completed(&report);
        }

        self.wave_index = self.wave_index.saturating_add(1);
        info!(
            "Wave {wave_index} complete: {} cells, {} surfaces, {} props, {} enemies",
            report.band.len(),
            report.surfaces.len(),
            report.props.len(),
            report.enemies.len()
        );
        Ok(WaveOutcome::Completed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::range_types::TriesPerUnit;
    use crate::game_logic::placement::PlacementKind;
    use crate::map::TerrainMap;
    use crate::spatial::OpenField;
    use crate::terrain::surface::SurfaceKind;
    use std::collections::HashSet;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    fn seed_mask() -> Vec<Cell> {
        (0..3)
            .flat_map(|x| (0..3).map(move |y| Cell::new(x, y)))
            .collect()
    }

    fn grid_orchestrator(config: WaveConfig) -> WaveOrchestrator {
        WaveOrchestrator::grid(
            seed_mask(),
            Box::new(TerrainMap::uniform("meadow")),
            config,
            &OpenField,
        )
    }

    fn enclosed() -> SpatialHash {
        let mut walls = SpatialHash::new(1.0);
        for i in -3..=5 {
            walls.block_cells([
                Cell::new(i, -3),
                Cell::new(i, 5),
                Cell::new(-3, i),
                Cell::new(5, i),
            ]);
        }
        walls
    }

    #[test]
    fn test_wave_index_advances_per_completed_wave() {
        let mut orchestrator = grid_orchestrator(WaveConfig::default());
        assert_eq!(orchestrator.wave_index(), 1);

        let outcome = orchestrator.run_wave(&OpenField, Vec2::splat(1.5)).unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.wave_index, 1);
        assert_eq!(report.strategy, "grid");
        assert!(!report.band.is_empty());
        assert_eq!(orchestrator.wave_index(), 2);
    }

    #[test]
    fn test_filled_region_grows_monotonically() {
        let mut orchestrator = grid_orchestrator(WaveConfig::default());
        let mut previous: HashSet<Cell> = orchestrator.strategy().filled().clone();
        for _ in 0..3 {
            orchestrator.run_wave(&OpenField, Vec2::ZERO).unwrap();
            let filled = orchestrator.strategy().filled();
            assert!(filled.is_superset(&previous));
            previous = filled.clone();
        }
    }

    #[test]
    fn test_exhausted_wave_keeps_index_and_notifies() {
        let walls = enclosed();
        let mut orchestrator = WaveOrchestrator::grid(
            seed_mask(),
            Box::new(TerrainMap::uniform("meadow")),
            WaveConfig::default(),
            &walls,
        );
        let (sender, receiver) = channel::<WaveEvent>();
        orchestrator.register_listener(Box::new(sender));

        // First wave fills the enclosure, the second has nowhere to go
        assert!(!orchestrator.run_wave(&walls, Vec2::ZERO).unwrap().is_exhausted());
        let outcome = orchestrator.run_wave(&walls, Vec2::ZERO).unwrap();
        assert_eq!(outcome, WaveOutcome::Exhausted { wave_index: 2 });
        assert_eq!(orchestrator.wave_index(), 2);

        let events: Vec<WaveEvent> = receiver.try_iter().collect();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, WaveEvent::Completed { wave_index: 1, .. }))
        );
        assert_eq!(events.last(), Some(&WaveEvent::Exhausted { wave_index: 2 }));
    }

    #[test]
    fn test_blocked_frontier_does_not_complete_a_wave() {
        let mut orchestrator = grid_orchestrator(WaveConfig::default());
        let (sender, receiver) = channel::<WaveEvent>();
        orchestrator.register_listener(Box::new(sender));

        // Wall off the ring around the seed after the frontier was computed
        let mut walls = SpatialHash::new(1.0);
        for i in -1..=3 {
            walls.block_cells([
                Cell::new(i, -1),
                Cell::new(i, 3),
                Cell::new(-1, i),
                Cell::new(3, i),
            ]);
        }

        let outcome = orchestrator.run_wave(&walls, Vec2::ZERO).unwrap();
        assert_eq!(outcome, WaveOutcome::Exhausted { wave_index: 1 });
        assert_eq!(orchestrator.wave_index(), 1);
        assert_eq!(orchestrator.strategy().filled().len(), 9);

        let events: Vec<WaveEvent> = receiver.try_iter().collect();
        assert_eq!(events, vec![WaveEvent::Exhausted { wave_index: 1 }]);
    }

    #[test]
    fn test_huge_start_index_is_clamped_and_runs() {
        let mut config: WaveConfig =
            toml::from_str("[schedule]\nstart_wave_index = 4294967295").unwrap();
        config.enemies.max_tries_per_unit = TriesPerUnit::new(1);
        assert!(config.check().is_ok());

        let mut orchestrator = grid_orchestrator(config);
        assert_eq!(orchestrator.wave_index(), 1_000_000);

        let outcome = orchestrator.run_wave(&OpenField, Vec2::splat(100.0)).unwrap();
        let report = outcome.report().unwrap();
        assert!(!report.enemies.is_empty());
        assert!(report.shortfalls.iter().any(|s| s.kind == PlacementKind::Enemy));
        assert_eq!(orchestrator.wave_index(), 1_000_001);
    }

    #[test]
    fn test_mode_selects_populations() {
        let mut config = WaveConfig::default();
        config.schedule.mode = WaveMode::Population;
        let mut orchestrator = grid_orchestrator(config);

        let report = orchestrator
            .run_wave(&OpenField, Vec2::ZERO)
            .unwrap()
            .report()
            .cloned()
            .unwrap();
        assert!(report.enemies.is_empty());
        assert_eq!(orchestrator.placed_props().len(), report.props.len());

        orchestrator.set_mode(WaveMode::CombatPreparation);
        let report = orchestrator
            .run_wave(&OpenField, Vec2::ZERO)
            .unwrap()
            .report()
            .cloned()
            .unwrap();
        assert!(report.props.is_empty());
        assert!(!report.enemies.is_empty());
    }

    #[test]
    fn test_props_keep_distance_across_waves() {
        let mut config = WaveConfig::default();
        config.schedule.mode = WaveMode::Population;
        let separation = config.placement.min_separation.get();
        let mut orchestrator = grid_orchestrator(config);

        let mut all = Vec::new();
        for _ in 0..3 {
            let outcome = orchestrator.run_wave(&OpenField, Vec2::ZERO).unwrap();
            all.extend(outcome.report().unwrap().props.iter().map(|p| p.position));
        }
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.distance(*b) >= separation);
            }
        }
    }

    #[test]
    fn test_polygon_waves_emit_ring_geometry_and_cycle_styles() {
        let mut config = WaveConfig::default();
        config.growth.strategy = StrategyKind::Polygon;
        let palette = config.ring_styles.clone();
        let mut orchestrator = WaveOrchestrator::from_config(
            Polygon::rectangle(Vec2::splat(-2.0), Vec2::splat(2.0)),
            Box::new(TerrainMap::uniform("forest")),
            config,
            &OpenField,
        );

        let mut styles = Vec::new();
        for _ in 0..palette.len() + 1 {
            let outcome = orchestrator.run_wave(&OpenField, Vec2::ZERO).unwrap();
            let report = outcome.report().unwrap();
            assert_eq!(report.strategy, "polygon");
            assert_eq!(report.surfaces[0].kind, SurfaceKind::RingTop);
            styles.push(report.ring_style);
        }
        assert_eq!(styles[0], palette[1]);
        assert_eq!(styles[palette.len()], styles[0]);
    }

    #[test]
    fn test_same_seed_same_waves() {
        let run = || {
            let mut orchestrator = grid_orchestrator(WaveConfig::default());
            (0..3)
                .map(|_| orchestrator.run_wave(&OpenField, Vec2::ZERO).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_scheduler_drives_due_waves() {
        let mut orchestrator = grid_orchestrator(WaveConfig::default());
        let mut scheduler = WaveScheduler::from_seconds(10.0);

        let outcomes = scheduler
            .drive(Duration::from_secs(25), &mut orchestrator, &OpenField, Vec2::ZERO)
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(orchestrator.wave_index(), 3);
    }
}
