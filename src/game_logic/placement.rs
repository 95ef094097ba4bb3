//! Rejection-sampled scattering of props (and, through `spawning`, enemies)
//! onto freshly grown cells.

use crate::config::range_types::Density;
use crate::game_logic::errors::{GrowthError, GrowthResult};
use crate::map::{TerrainId, TerrainLayout};
use crate::spatial::{SpatialHash, SpatialQueryPort};
use crate::terrain::constants::DEFAULT_SPATIAL_BUCKET_SIZE;
use crate::terrain::coordinates::Cell;
use bevy::log::{debug, warn};
use bevy::math::Vec2;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// One placeable variant with its relative selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeightedVariant {
    pub name: String,
    #[validate(range(min = 0.0))]
    pub weight: f32,
}

/// How to decorate one terrain type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PlacementRule {
    /// Items per 100 cells
    pub density: Density,
    #[validate(length(min = 1), nested)]
    pub variants: Vec<WeightedVariant>,
    /// Maximum absolute offset from the cell center on each axis
    pub jitter: Vec2,
    pub scale_range: (f32, f32),
    /// Randomly mirror placements horizontally
    pub flip: bool,
}

/// Rules keyed by terrain, with an optional catch-all
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub rules: BTreeMap<TerrainId, PlacementRule>,
    #[serde(default)]
    pub default: Option<PlacementRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    Prop,
    Enemy,
}

/// A resolved placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub kind: PlacementKind,
    pub variant: String,
    pub terrain: TerrainId,
    pub cell: Cell,
    /// World position, jitter included
    pub position: Vec2,
    pub jitter: Vec2,
    pub scale: f32,
    pub flipped: bool,
}

/// Fewer placements than targeted once the try budget ran out
#[derive(Debug, Clone, PartialEq)]
pub struct Shortfall {
    pub kind: PlacementKind,
    /// `None` for placements drawn from the whole region
    pub terrain: Option<TerrainId>,
    pub target: usize,
    pub placed: usize,
    pub attempts: usize,
}

impl Shortfall {
    pub fn missing(&self) -> usize {
        self.target - self.placed
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementBatch {
    pub placements: Vec<Placement>,
    pub shortfalls: Vec<Shortfall>,
}

impl PlacementBatch {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub(crate) fn absorb(&mut self, other: PlacementBatch) {
        self.placements.extend(other.placements);
        self.shortfalls.extend(other.shortfalls);
    }
}

impl Default for PlacementRule {
    fn default() -> Self {
        Self {
            density: Density::default(),
            variants: Vec::new(),
            jitter: Vec2::ZERO,
            scale_range: (1.0, 1.0),
            flip: false,
        }
    }
}

impl WeightedVariant {
    pub fn new(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

impl PlacementRule {
    pub fn new(density: f32, variants: Vec<WeightedVariant>) -> Self {
        Self {
            density: Density::new(density),
            variants,
            ..Default::default()
        }
    }

    pub fn with_jitter(mut self, jitter: Vec2) -> Self {
        self.jitter = jitter.abs();
        self
    }

    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.scale_range = (min, max);
        self
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// `round(density / 100 * group_size)`
    pub fn target_count(&self, group_size: usize) -> usize {
        (self.density.get() / 100.0 * group_size as f32).round() as usize
    }

    fn variant_picker(&self) -> Option<WeightedIndex<f32>> {
        WeightedIndex::new(self.variants.iter().map(|v| v.weight.max(0.0))).ok()
    }

    /// Reject rules that could never place anything or whose jitter or scale range is unusable
    pub fn check(&self, terrain: &TerrainId) -> GrowthResult<()> {
        let invalid = |reason: &str| GrowthError::InvalidRuleReference {
            terrain: terrain.clone(),
            reason: reason.to_string(),
        };

        self.validate().map_err(|e| invalid(&e.to_string()))?;
        if self.variant_picker().is_none() {
            return Err(invalid("no variant has a positive weight"));
        }
        if !self.jitter.is_finite() || self.jitter.min_element() < 0.0 {
            return Err(invalid("jitter must be finite and non-negative"));
        }
        let (min, max) = self.scale_range;
        if !min.is_finite() || !max.is_finite() {
            return Err(invalid("scale range must be finite"));
        }
        if min <= 0.0 || min > max {
            return Err(invalid("scale range must be positive and ordered min <= max"));
        }
        Ok(())
    }
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, terrain: impl Into<TerrainId>, rule: PlacementRule) -> Self {
        self.rules.insert(terrain.into(), rule);
        self
    }

    pub fn with_default(mut self, rule: PlacementRule) -> Self {
        self.default = Some(rule);
        self
    }

    /// Rule for a terrain, falling back to the default rule
    pub fn resolve(&self, terrain: &TerrainId) -> Option<&PlacementRule> {
        self.rules.get(terrain).or(self.default.as_ref())
    }

    pub fn check(&self) -> GrowthResult<()> {
        for (terrain, rule) in &self.rules {
            rule.check(terrain)?;
        }
        if let Some(rule) = &self.default {
            rule.check(&TerrainId::from("default"))?;
        }
        Ok(())
    }
}

/// Weighted random choice: a uniform draw scaled by the total weight, matched against
/// cumulative weights. Returns `None` when no variant has a positive weight.
pub fn pick_variant<'a, R: Rng + ?Sized>(
    variants: &'a [WeightedVariant],
    rng: &mut R,
) -> Option<&'a WeightedVariant> {
    let picker = WeightedIndex::new(variants.iter().map(|v| v.weight.max(0.0))).ok()?;
    variants.get(picker.sample(rng))
}

/// Shared limits and occupancy sources for one scatter pass
pub(crate) struct ScatterContext<'a> {
    pub cell_size: f32,
    pub min_separation: f32,
    pub max_tries_per_unit: u32,
    pub spatial: &'a dyn SpatialQueryPort,
    /// Placements from earlier waves that still block
    pub persistent: Option<&'a SpatialHash>,
    /// Circle nothing may land in (e.g. around the player)
    pub keep_out: Option<(Vec2, f32)>,
}

pub(crate) struct ScatterYield {
    pub placements: Vec<Placement>,
    pub attempts: usize,
}

impl ScatterContext<'_> {
    fn conflicts(&self, position: Vec2, pool: &SpatialHash) -> bool {
        let radius = self.min_separation;
        self.spatial.is_blocked(Cell::from_world(position, self.cell_size))
            || self
                .keep_out
                .is_some_and(|(center, r)| position.distance(center) < r)
            || self.spatial.is_occupied(position, radius)
            || self
                .persistent
                .is_some_and(|p| p.is_occupied(position, radius))
            || pool.is_occupied(position, radius)
    }
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> f32 {
    let bound = bound.abs();
    if bound.is_finite() && bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

/// Rejection-sample up to `target` placements from `cells`.
///
/// The cells are shuffled and then walked cyclically, so every attempt lands
/// on a uniformly random cell and no cell is retried before all others were
/// tried. At most `target * max_tries_per_unit` attempts are made; accepted
/// positions are added to `pool`.
pub(crate) fn scatter<R: Rng + ?Sized>(
    cells: &mut [Cell],
    target: usize,
    rule: &PlacementRule,
    kind: PlacementKind,
    terrain: &dyn TerrainLayout,
    ctx: &ScatterContext,
    pool: &mut SpatialHash,
    rng: &mut R,
) -> ScatterYield {
    let mut placements = Vec::with_capacity(target.min(cells.len()));
    if target == 0 || cells.is_empty() {
        return ScatterYield {
            placements,
            attempts: 0,
        };
    }
    let Some(picker) = rule.variant_picker() else {
        warn!("Placement rule has no selectable variant, skipping {target} placements");
        return ScatterYield {
            placements,
            attempts: 0,
        };
    };

    cells.shuffle(rng);
    let budget = target.saturating_mul(ctx.max_tries_per_unit as usize);
    let mut attempts = 0;

    while placements.len() < target && attempts < budget {
        let cell = cells[attempts % cells.len()];
        attempts += 1;

        let jitter = Vec2::new(
            symmetric(rng, rule.jitter.x),
            symmetric(rng, rule.jitter.y),
        );
        let position = cell.center(ctx.cell_size) + jitter;
        if ctx.conflicts(position, pool) {
            continue;
        }

        let variant = &rule.variants[picker.sample(rng)];
        let (min_scale, max_scale) = rule.scale_range;
        let scale = if !min_scale.is_finite() {
            1.0
        } else if max_scale.is_finite() && max_scale > min_scale {
            rng.gen_range(min_scale..=max_scale)
        } else {
            min_scale
        };
        let flipped = rule.flip && rng.gen_bool(0.5);

        pool.insert(position, 0.0);
        placements.push(Placement {
            kind,
            variant: variant.name.clone(),
            terrain: terrain.terrain_at(cell),
            cell,
            position,
            jitter,
            scale,
            flipped,
        });
    }

    ScatterYield {
        placements,
        attempts,
    }
}

/// Scatters props over newly grown cells according to per-terrain rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPlanner {
    pub cell_size: f32,
    pub min_separation: f32,
    pub max_tries_per_unit: u32,
}

impl PlacementPlanner {
    pub fn new(cell_size: f32, min_separation: f32, max_tries_per_unit: u32) -> Self {
        Self {
            cell_size,
            min_separation,
            max_tries_per_unit: max_tries_per_unit.max(1),
        }
    }

    /// Place props on `cells`, grouped by terrain.
    ///
    /// All groups share one exclusion pool, so every pair of returned placements
    /// is at least `min_separation` apart. `persistent` holds props from earlier
    /// waves. Shortfalls are logged and reported, never treated as errors.
    pub fn place<R: Rng + ?Sized>(
        &self,
        cells: &[Cell],
        terrain: &dyn TerrainLayout,
        rules: &RuleTable,
        spatial: &dyn SpatialQueryPort,
        persistent: Option<&SpatialHash>,
        rng: &mut R,
    ) -> PlacementBatch {
        let mut groups: BTreeMap<TerrainId, Vec<Cell>> = BTreeMap::new();
        for &cell in cells {
            groups.entry(terrain.terrain_at(cell)).or_default().push(cell);
        }

        let ctx = ScatterContext {
            cell_size: self.cell_size,
            min_separation: self.min_separation,
            max_tries_per_unit: self.max_tries_per_unit,
            spatial,
            persistent,
            keep_out: None,
        };
        let mut pool = SpatialHash::new(DEFAULT_SPATIAL_BUCKET_SIZE.max(self.min_separation));
        let mut batch = PlacementBatch::default();

        for (terrain_id, mut group) in groups {
            let Some(rule) = rules.resolve(&terrain_id) else {
                debug!("No placement rule for terrain '{terrain_id}', skipping {} cells", group.len());
                continue;
            };
            let target = rule.target_count(group.len());
            if target == 0 {
                continue;
            }

            let result = scatter(
                &mut group,
                target,
                rule,
                PlacementKind::Prop,
                terrain,
                &ctx,
                &mut pool,
                rng,
            );
            batch.absorb(yield_to_batch(
                result,
                target,
                PlacementKind::Prop,
                Some(terrain_id),
            ));
        }

        batch
    }
}

/// Wrap a scatter result, logging and recording any shortfall
pub(crate) fn yield_to_batch(
    result: ScatterYield,
    target: usize,
    kind: PlacementKind,
    terrain: Option<TerrainId>,
) -> PlacementBatch {
    let placed = result.placements.len();
    let mut shortfalls = Vec::new();
    if placed < target {
        warn!(
            "Placed {placed} of {target} {kind:?} placements on '{}' after {} attempts",
            terrain.as_ref().map_or("any terrain", TerrainId::as_str),
            result.attempts
        );
        shortfalls.push(Shortfall {
            kind,
            terrain,
            target,
            placed,
            attempts: result.attempts,
        });
    }
    PlacementBatch {
        placements: result.placements,
        shortfalls,
    }
}
