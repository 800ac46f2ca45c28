use glam::{DVec2, IVec2};

/// Chunk coordinate in chunk-space (each unit = CHUNK_SIZE world units).
pub type ChunkCoord = IVec2;

/// Position in world-space.
pub type WorldPos = DVec2;

/// Wormhole cell coordinate (each unit = `wormhole_cell_size` chunks).
pub type CellCoord = IVec2;

/// Cache key string for a chunk coordinate, `"cx,cy"`.
pub fn chunk_key(coord: ChunkCoord) -> String {
    format!("{},{}", coord.x, coord.y)
}

/// Parse a `"cx,cy"` chunk key. Returns None on malformed input.
pub fn parse_chunk_key(key: &str) -> Option<ChunkCoord> {
    let (x, y) = key.split_once(',')?;
    Some(IVec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_key_format() {
        assert_eq!(chunk_key(IVec2::new(-3, 7)), "-3,7");
    }

    #[test]
    fn test_parse_chunk_key() {
        assert_eq!(parse_chunk_key("-3,7"), Some(IVec2::new(-3, 7)));
        assert_eq!(parse_chunk_key(" 4 , 5 "), Some(IVec2::new(4, 5)));
        assert_eq!(parse_chunk_key("4;5"), None);
        assert_eq!(parse_chunk_key("a,5"), None);
    }
}
