use crate::config::range_types::*;
use crate::game_logic::errors::{GrowthError, GrowthResult};
use crate::game_logic::placement::{PlacementRule, RuleTable, WeightedVariant};
use crate::game_logic::spawning::EnemyRoster;
use crate::terrain::constants::DEFAULT_MIN_SPAWN_DISTANCE_FROM_PLAYER;
use crate::terrain::coordinates::Connectivity;
use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which growth strategy drives the waves
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Grid,
    Polygon,
}

/// What each wave populates after growing
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaveMode {
    /// Props only
    Population,
    /// Enemies only
    CombatPreparation,
    #[default]
    Both,
}

impl WaveMode {
    pub fn places_props(self) -> bool {
        matches!(self, WaveMode::Population | WaveMode::Both)
    }

    pub fn spawns_enemies(self) -> bool {
        matches!(self, WaveMode::CombatPreparation | WaveMode::Both)
    }
}

/// Inner and outer RGBA colors of one ring
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RingStyle {
    pub inner_color: [f32; 4],
    pub outer_color: [f32; 4],
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(default)]
// NOTE: When adding new fields, update the example config.toml in the project root
pub struct WaveConfig {
    pub growth: GrowthSettings,
    pub placement: PlacementSettings,
    pub enemies: EnemySettings,
    pub schedule: ScheduleSettings,
    #[validate(length(min = 1))]
    pub ring_styles: Vec<RingStyle>,
    pub prop_rules: RuleTable,
    pub enemy_roster: EnemyRoster,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GrowthSettings {
    pub strategy: StrategyKind,
    pub band_width: BandWidth,
    pub connectivity: Connectivity,
    pub ring_thickness: RingThickness,
    pub wall_height: WallHeight,
    pub cell_size: CellSize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlacementSettings {
    pub min_separation: Separation,
    pub max_tries_per_unit: TriesPerUnit,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EnemySettings {
    pub min_separation: Separation,
    pub min_spawn_distance_from_player: Separation,
    pub max_tries_per_unit: TriesPerUnit,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScheduleSettings {
    pub mode: WaveMode,
    pub start_wave_index: StartWaveIndex,
    /// Seconds between waves when driven by the scheduler
    pub interval: WaveInterval,
    pub seed: u64,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Grid,
            band_width: BandWidth::default(),
            connectivity: Connectivity::Eight,
            ring_thickness: RingThickness::default(),
            wall_height: WallHeight::default(),
            cell_size: CellSize::default(),
        }
    }
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            min_separation: Separation::default(),
            max_tries_per_unit: TriesPerUnit::default(),
        }
    }
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            min_separation: Separation::new(2.0),
            min_spawn_distance_from_player: Separation::new(DEFAULT_MIN_SPAWN_DISTANCE_FROM_PLAYER),
            max_tries_per_unit: TriesPerUnit::default(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            mode: WaveMode::Both,
            start_wave_index: StartWaveIndex::default(),
            interval: WaveInterval::default(),
            seed: 0,
        }
    }
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            inner_color: [0.36, 0.55, 0.25, 1.0],
            outer_color: [0.48, 0.38, 0.24, 1.0],
        }
    }
}

impl RingStyle {
    /// Style for a wave, cycling through the palette
    pub fn for_wave(palette: &[RingStyle], wave_index: u32) -> RingStyle {
        if palette.is_empty() {
            return RingStyle::default();
        }
        palette[wave_index as usize % palette.len()]
    }
}

/// Palette used when the config names none
pub fn default_ring_styles() -> Vec<RingStyle> {
    vec![
        RingStyle::default(),
        RingStyle {
            inner_color: [0.30, 0.48, 0.22, 1.0],
            outer_color: [0.42, 0.42, 0.40, 1.0],
        },
        RingStyle {
            inner_color: [0.55, 0.50, 0.30, 1.0],
            outer_color: [0.35, 0.30, 0.22, 1.0],
        },
    ]
}

pub fn default_prop_rules() -> RuleTable {
    RuleTable::new()
        .with_rule(
            "meadow",
            PlacementRule::new(
                12.0,
                vec![
                    WeightedVariant::new("flower", 3.0),
                    WeightedVariant::new("bush", 1.0),
                ],
            )
            .with_jitter(Vec2::splat(0.35))
            .with_scale_range(0.8, 1.2)
            .with_flip(true),
        )
        .with_rule(
            "forest",
            PlacementRule::new(
                25.0,
                vec![
                    WeightedVariant::new("pine", 2.0),
                    WeightedVariant::new("oak", 1.0),
                ],
            )
            .with_jitter(Vec2::splat(0.3))
            .with_scale_range(0.9, 1.4),
        )
        .with_default(
            PlacementRule::new(5.0, vec![WeightedVariant::new("rock", 1.0)])
                .with_jitter(Vec2::splat(0.25))
                .with_scale_range(0.7, 1.1),
        )
}

pub fn default_enemy_roster() -> EnemyRoster {
    EnemyRoster::new(
        PlacementRule::new(
            0.0,
            vec![
                WeightedVariant::new("grunt", 3.0),
                WeightedVariant::new("archer", 1.0),
            ],
        )
        .with_jitter(Vec2::splat(0.3)),
    )
    .with_terrain(
        "forest",
        PlacementRule::new(0.0, vec![WeightedVariant::new("wolf", 1.0)]),
    )
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            growth: GrowthSettings::default(),
            placement: PlacementSettings::default(),
            enemies: EnemySettings::default(),
            schedule: ScheduleSettings::default(),
            ring_styles: default_ring_styles(),
            prop_rules: default_prop_rules(),
            enemy_roster: default_enemy_roster(),
        }
    }
}

impl WaveConfig {
    /// Run the declarative checks, then the rule table and roster checks
    pub fn check(&self) -> GrowthResult<()> {
        self.validate().map_err(|e| GrowthError::InvalidConfig {
            reason: e.to_string(),
        })?;
        self.prop_rules.check()?;
        self.enemy_roster.check()
    }
}
