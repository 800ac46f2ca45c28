//! Single source of truth for shared spatial and generation constants.
//! Probabilities and type tables are data (see `data/*.ron`); only values
//! that define the coordinate system or the identity scheme live here.

/// Side length of a chunk in world units.
pub const CHUNK_SIZE: f64 = 2000.0;

/// Default Chebyshev load radius in chunks (1 = 3x3 neighborhood).
pub const DEFAULT_LOAD_RADIUS: i32 = 1;

/// Seed used when the host supplies none.
pub const DEFAULT_UNIVERSE_SEED: u32 = 42;

/// Upper bound on load radius. Keeps per-frame aggregation cost bounded.
pub const MAX_LOAD_RADIUS: i32 = 8;

/// Largest chunk coordinate magnitude. Viewpoints beyond it resolve to the
/// edge chunk, leaving headroom for neighborhoods and wormhole cells.
pub const MAX_CHUNK_COORD: i32 = 1 << 30;

/// Largest allowed `wormhole_cell_size`.
pub const MAX_WORMHOLE_CELL_SIZE: i32 = 1024;

/// Base radius of a background (decorative) star, in world units.
pub const BACKGROUND_STAR_BASE_SIZE: f64 = 1.5;

/// Palette for background stars. Drawn by index so the draw count is fixed.
pub const BACKGROUND_STAR_PALETTE: [&str; 5] = ["#ffffff", "#fff4e8", "#cad7ff", "#ffd2a1", "#aabfff"];

/// Version of the persisted record envelope.
pub const STORE_FORMAT_VERSION: u32 = 1;

// Discovery distances in world units, per category.
pub const STAR_DISCOVERY_DISTANCE: f64 = 420.0;
pub const PLANET_DISCOVERY_DISTANCE: f64 = 180.0;
pub const MOON_DISCOVERY_DISTANCE: f64 = 110.0;
pub const NEBULA_DISCOVERY_DISTANCE: f64 = 520.0;
pub const ASTEROID_GARDEN_DISCOVERY_DISTANCE: f64 = 300.0;
pub const WORMHOLE_DISCOVERY_DISTANCE: f64 = 260.0;
pub const BLACK_HOLE_DISCOVERY_DISTANCE: f64 = 650.0;
pub const COMET_DISCOVERY_DISTANCE: f64 = 220.0;
pub const PROTOSTAR_DISCOVERY_DISTANCE: f64 = 380.0;
pub const ROGUE_PLANET_DISCOVERY_DISTANCE: f64 = 160.0;
pub const DARK_NEBULA_DISCOVERY_DISTANCE: f64 = 480.0;
pub const CRYSTAL_GARDEN_DISCOVERY_DISTANCE: f64 = 280.0;

/// Fraction of a black hole's visual radius that forms the event horizon.
pub const EVENT_HORIZON_FRACTION: f64 = 0.45;

/// Multiplier from a black hole's visual radius to the reach of its pull.
pub const BLACK_HOLE_PULL_RANGE: f64 = 9.0;
