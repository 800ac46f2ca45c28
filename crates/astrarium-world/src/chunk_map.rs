use astrarium_core::types::ChunkCoord;
use astrarium_gen::Chunk;
use glam::IVec2;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Live mapping from chunk coordinate to loaded chunk.
///
/// Removing a chunk drops it and nothing else; discovery state lives in the
/// discovery store and is reattached when the coordinate is generated again.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chunk under its own coordinate, returning any chunk replaced.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.coord, chunk)
    }

    /// Remove a chunk from the map.
    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(coord)
    }

    /// Get a chunk by coordinate.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    /// Get a mutable chunk by coordinate.
    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    /// Get the chunk at `coord`, building it with `build` when absent. A
    /// failed build leaves the coordinate unloaded.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        coord: ChunkCoord,
        build: impl FnOnce() -> Result<Chunk, E>,
    ) -> Result<&mut Chunk, E> {
        match self.chunks.entry(coord) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(build()?)),
        }
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Drop every chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Iterator over all loaded chunks, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// Mutable iterator over all loaded chunks, in arbitrary order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoord, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    /// Loaded coordinates sorted by (y, x). Used wherever output order must
    /// not depend on hash iteration.
    pub fn sorted_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_by_key(|c| (c.y, c.x));
        coords
    }

    /// Loaded chunks in `sorted_coords` order.
    pub fn sorted_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.sorted_coords()
            .into_iter()
            .filter_map(move |c| self.chunks.get(&c))
    }

    /// Number of loaded chunks.
    pub fn loaded_count(&self) -> u32 {
        self.chunks.len() as u32
    }

    /// Square neighborhood of `radius` chunks around `center`, row-major.
    /// Coordinates saturate at the `i32` edge, so duplicates are dropped there.
    pub fn neighborhood(center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
        let radius = radius.max(0);
        let side = (radius * 2 + 1) as usize;
        let mut coords = Vec::with_capacity(side * side);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coord = IVec2::new(center.x.saturating_add(dx), center.y.saturating_add(dy));
                if !coords.contains(&coord) {
                    coords.push(coord);
                }
            }
        }
        coords
    }
}
