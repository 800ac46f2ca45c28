use crate::constants::{CHUNK_SIZE, MAX_CHUNK_COORD};
use crate::types::{CellCoord, ChunkCoord, WorldPos};
use glam::{DVec2, IVec2};

fn axis_to_chunk(v: f64) -> i32 {
    let limit = MAX_CHUNK_COORD as f64;
    (v / CHUNK_SIZE).floor().clamp(-limit, limit) as i32
}

/// Convert a world-space position to its containing chunk coordinate.
/// Each axis is clamped to `±MAX_CHUNK_COORD`; NaN maps to 0.
pub fn world_to_chunk(pos: WorldPos) -> ChunkCoord {
    IVec2::new(axis_to_chunk(pos.x), axis_to_chunk(pos.y))
}

/// World-space position of a chunk's minimum corner.
pub fn chunk_origin(coord: ChunkCoord) -> WorldPos {
    DVec2::new(coord.x as f64 * CHUNK_SIZE, coord.y as f64 * CHUNK_SIZE)
}

/// Convert a chunk coordinate to its wormhole cell.
pub fn chunk_to_cell(coord: ChunkCoord, cell_size: i32) -> CellCoord {
    IVec2::new(coord.x.div_euclid(cell_size), coord.y.div_euclid(cell_size))
}

/// Chunk coordinate of a cell-local slot index (row-major).
pub fn cell_slot_to_chunk(cell: CellCoord, cell_size: i32, slot: u32) -> ChunkCoord {
    let slot = slot as i32;
    let corner = |c: i32| c.saturating_mul(cell_size);
    IVec2::new(
        corner(cell.x).saturating_add(slot % cell_size),
        corner(cell.y).saturating_add(slot / cell_size),
    )
}

/// Point on a circle of `radius` around `center` at `angle` radians.
pub fn orbit_point(center: WorldPos, radius: f64, angle: f64) -> WorldPos {
    center + DVec2::new(angle.cos(), angle.sin()) * radius
}

/// Point on an ellipse with semi-axes `(a, b)` rotated by `rotation`, at parameter `t`.
pub fn ellipse_point(center: WorldPos, a: f64, b: f64, rotation: f64, t: f64) -> WorldPos {
    let local = DVec2::new(a * t.cos(), b * t.sin());
    center + DVec2::from_angle(rotation).rotate(local)
}

/// Floor a world position to the integer anchor used by identity keys.
pub fn floor_anchor(pos: WorldPos) -> (i64, i64) {
    (pos.x.floor() as i64, pos.y.floor() as i64)
}
