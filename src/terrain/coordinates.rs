use bevy::math::{IVec2, Vec2};
use derive_more::Display;
use serde::{Deserialize, Serialize};

const CARDINAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const ALL_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Grid coordinates of a single terrain cell (signed, the region grows in every direction)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("({x}, {y})")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

/// Neighborhood used when flooding outward from a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Axis-aligned neighbors only, grows diamond-shaped regions
    Four,
    /// Axis-aligned plus diagonal neighbors, grows square-ish regions
    #[default]
    Eight,
}

impl Connectivity {
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &CARDINAL_OFFSETS,
            Connectivity::Eight => &ALL_OFFSETS,
        }
    }

    /// Map a neighbor count (4 or 8) to a connectivity
    pub fn from_neighbor_count(count: u32) -> Option<Self> {
        match count {
            4 => Some(Connectivity::Four),
            8 => Some(Connectivity::Eight),
            _ => None,
        }
    }
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Neighboring cells for the given connectivity
    pub fn neighbors(self, connectivity: Connectivity) -> impl Iterator<Item = Cell> {
        connectivity
            .offsets()
            .iter()
            .map(move |&(dx, dy)| self.offset(dx, dy))
    }

    /// World-space center of this cell
    pub fn center(self, cell_size: f32) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * cell_size,
            (self.y as f32 + 0.5) * cell_size,
        )
    }

    /// Cell containing a world-space position
    pub fn from_world(position: Vec2, cell_size: f32) -> Self {
        Self::new(
            (position.x / cell_size).floor() as i32,
            (position.y / cell_size).floor() as i32,
        )
    }
}

impl From<IVec2> for Cell {
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Cell> for IVec2 {
    fn from(cell: Cell) -> Self {
        IVec2::new(cell.x, cell.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
