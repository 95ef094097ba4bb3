//! Occupancy and blocking queries used by growth and placement

use crate::terrain::coordinates::Cell;
use bevy::math::Vec2;
use std::collections::{HashMap, HashSet};

/// Spatial queries answered by whatever owns collision data (physics, tilemap, ...)
pub trait SpatialQueryPort {
    /// Whether growth may never paint this cell
    fn is_blocked(&self, cell: Cell) -> bool;

    /// Whether anything sits closer than `radius` to `position`
    fn is_occupied(&self, position: Vec2, radius: f32) -> bool;
}

impl<T: SpatialQueryPort + ?Sized> SpatialQueryPort for &T {
    fn is_blocked(&self, cell: Cell) -> bool {
        (**self).is_blocked(cell)
    }

    fn is_occupied(&self, position: Vec2, radius: f32) -> bool {
        (**self).is_occupied(position, radius)
    }
}

/// Nothing blocked, nothing occupied
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl SpatialQueryPort for OpenField {
    fn is_blocked(&self, _cell: Cell) -> bool {
        false
    }

    fn is_occupied(&self, _position: Vec2, _radius: f32) -> bool {
        false
    }
}

/// Something already standing in the world, with its own footprint radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    pub position: Vec2,
    pub radius: f32,
}

/// Bucketed point store with a blocked-cell set
#[derive(Debug, Clone)]
pub struct SpatialHash {
    bucket_size: f32,
    buckets: HashMap<Cell, Vec<Occupant>>,
    blocked: HashSet<Cell>,
    max_radius: f32,
    len: usize,
}

impl SpatialHash {
    pub fn new(bucket_size: f32) -> Self {
        Self {
            bucket_size: bucket_size.max(f32::EPSILON),
            buckets: HashMap::new(),
            blocked: HashSet::new(),
            max_radius: 0.0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record an occupant with a footprint radius (0 for a bare point)
    pub fn insert(&mut self, position: Vec2, radius: f32) {
        let radius = radius.max(0.0);
        let bucket = Cell::from_world(position, self.bucket_size);
        self.buckets
            .entry(bucket)
            .or_default()
            .push(Occupant { position, radius });
        self.max_radius = self.max_radius.max(radius);
        self.len += 1;
    }

    pub fn block(&mut self, cell: Cell) {
        self.blocked.insert(cell);
    }

    pub fn block_cells(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.blocked.extend(cells);
    }

    pub fn unblock(&mut self, cell: Cell) -> bool {
        self.blocked.remove(&cell)
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.buckets.values().flatten()
    }

    /// Drop every occupant but keep blocked cells
    pub fn clear_occupants(&mut self) {
        self.buckets.clear();
        self.max_radius = 0.0;
        self.len = 0;
    }
}

impl SpatialQueryPort for SpatialHash {
    fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked.contains(&cell)
    }

    fn is_occupied(&self, position: Vec2, radius: f32) -> bool {
        if self.len == 0 {
            return false;
        }

        let reach = radius + self.max_radius;
        let min = Cell::from_world(position - Vec2::splat(reach), self.bucket_size);
        let max = Cell::from_world(position + Vec2::splat(reach), self.bucket_size);

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let Some(bucket) = self.buckets.get(&Cell::new(x, y)) else {
                    continue;
                };
                if bucket
                    .iter()
                    .any(|occ| occ.position.distance(position) < radius + occ.radius)
                {
                    return true;
                }
            }
        }
        false
    }
}
