use astrarium_core::constants::{DEFAULT_LOAD_RADIUS, MAX_LOAD_RADIUS};
use astrarium_core::types::ChunkCoord;
use std::collections::HashSet;

use crate::chunk_map::ChunkMap;

/// Policy for loading/unloading chunks around the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingPolicy {
    /// Chebyshev radius in chunks. 1 keeps a 3x3 neighborhood loaded.
    load_radius: i32,
}

/// Coordinates to load and evict for one viewpoint update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingPlan {
    pub load: Vec<ChunkCoord>,
    pub evict: Vec<ChunkCoord>,
}

impl Default for StreamingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_RADIUS)
    }
}

impl StreamingPolicy {
    /// Radius is clamped to `0..=MAX_LOAD_RADIUS`.
    pub fn new(load_radius: i32) -> Self {
        Self {
            load_radius: load_radius.clamp(0, MAX_LOAD_RADIUS),
        }
    }

    pub fn load_radius(&self) -> i32 {
        self.load_radius
    }

    /// Coordinates that must be loaded for a viewpoint in `center`.
    pub fn required_coords(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        ChunkMap::neighborhood(center, self.load_radius)
    }

    /// Diff the required neighborhood against what is loaded.
    pub fn plan(&self, chunk_map: &ChunkMap, center: ChunkCoord) -> StreamingPlan {
        let required = self.required_coords(center);
        let wanted: HashSet<ChunkCoord> = required.iter().copied().collect();
        let load = required
            .into_iter()
            .filter(|c| !chunk_map.contains(c))
            .collect();
        let evict = chunk_map
            .sorted_coords()
            .into_iter()
            .filter(|c| !wanted.contains(c))
            .collect();
        StreamingPlan { load, evict }
    }
}
