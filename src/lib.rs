pub mod config;
pub mod game_logic;
pub mod map;
pub mod resources;
pub mod spatial;
pub mod terrain;
pub mod waves;

// Selective re-exports for embedding applications

// Game logic - errors and the planners
pub use game_logic::errors::{GrowthError, GrowthResult};
pub use game_logic::placement::{Placement, PlacementPlanner, PlacementRule, RuleTable};
pub use game_logic::spawning::{EnemyRoster, EnemySpawnPlanner};

// Growth - strategies and geometry
pub use terrain::coordinates::{Cell, Connectivity};
pub use terrain::geometry::Polygon;
pub use terrain::surface::Surface;
pub use terrain::{GridGrowth, GrowthOutcome, GrowthStrategy, PolygonGrowth};

// Waves - orchestration and configuration
pub use resources::WaveConfig;
pub use spatial::{SpatialHash, SpatialQueryPort};
pub use waves::{WaveOrchestrator, WaveOutcome, WaveReport, WaveScheduler};
