/// Constants for the wave growth system
/// Geometry tolerances
pub const PARALLEL_EPSILON: f32 = 1e-6;
pub const EAR_CLIP_ITERATION_CAP: usize = 10_000;
pub const TOP_SURFACE_Y: f32 = 0.0;

/// Default values for growth
pub const DEFAULT_BAND_WIDTH: u32 = 3;
pub const DEFAULT_RING_THICKNESS: f32 = 1.0;
pub const DEFAULT_WALL_HEIGHT: f32 = 0.2;
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Default values for placement
pub const DEFAULT_PROP_DENSITY: f32 = 10.0;
pub const DEFAULT_MAX_TRIES_PER_UNIT: u32 = 10;
pub const DEFAULT_MIN_SEPARATION: f32 = 1.5;
pub const DEFAULT_SPATIAL_BUCKET_SIZE: f32 = 4.0;

/// Enemy spawn formulas
pub const COMMON_SPAWN_BASE: u32 = 2;
pub const TERRAIN_SPAWN_WAVE_DIVISOR: u32 = 3;
pub const DEFAULT_MIN_SPAWN_DISTANCE_FROM_PLAYER: f32 = 6.0;

/// Wave sequencing
pub const DEFAULT_START_WAVE_INDEX: u32 = 1;
pub const DEFAULT_WAVE_INTERVAL_SECS: f32 = 30.0;
