use crate::terrain::constants::*;
use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

// Every type clamps on construction and on deserialization, so an out-of-range
// value in config.toml is pulled back to the nearest bound instead of rejected.

/// Grid layers painted per wave, constrained to [1, 64]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Into, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BandWidth(u32);

impl BandWidth {
    const MIN: u32 = 1;
    const MAX: u32 = 64;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for BandWidth {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl Default for BandWidth {
    fn default() -> Self {
        Self::new(DEFAULT_BAND_WIDTH)
    }
}

/// Polygon offset distance per wave, constrained to [0.05, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct RingThickness(f32);

impl RingThickness {
    const MIN: f32 = 0.05;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for RingThickness {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for RingThickness {
    fn default() -> Self {
        Self::new(DEFAULT_RING_THICKNESS)
    }
}

/// Side wall drop below the top surface, constrained to [0.01, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct WallHeight(f32);

impl WallHeight {
    const MIN: f32 = 0.01;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for WallHeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for WallHeight {
    fn default() -> Self {
        Self::new(DEFAULT_WALL_HEIGHT)
    }
}

/// World units per grid cell, constrained to [0.05, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct CellSize(f32);

impl CellSize {
    const MIN: f32 = 0.05;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for CellSize {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

/// Placements per 100 cells, constrained to [0.0, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Density(f32);

impl Density {
    const MIN: f32 = 0.0;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for Density {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::new(DEFAULT_PROP_DENSITY)
    }
}

/// Minimum distance between placements, constrained to [0.0, 1000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Separation(f32);

impl Separation {
    const MIN: f32 = 0.0;
    const MAX: f32 = 1000.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for Separation {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for Separation {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SEPARATION)
    }
}

/// Rejection-sampling attempts per requested placement, constrained to [1, 1000]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Into, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct TriesPerUnit(u32);

impl TriesPerUnit {
    const MIN: u32 = 1;
    const MAX: u32 = 1000;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for TriesPerUnit {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl Default for TriesPerUnit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIES_PER_UNIT)
    }
}

/// Seconds between waves, constrained to [0.1, 3600.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct WaveInterval(f32);

impl WaveInterval {
    const MIN: f32 = 0.1;
    const MAX: f32 = 3600.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for WaveInterval {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for WaveInterval {
    fn default() -> Self {
        Self::new(DEFAULT_WAVE_INTERVAL_SECS)
    }
}

/// First wave index of a run, constrained to [0, 1_000_000]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Into, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct StartWaveIndex(u32);

impl StartWaveIndex {
    const MIN: u32 = 0;
    const MAX: u32 = 1_000_000;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for StartWaveIndex {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl Default for StartWaveIndex {
    fn default() -> Self {
        Self::new(DEFAULT_START_WAVE_INDEX)
    }
}
