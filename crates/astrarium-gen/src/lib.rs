pub mod chunk;
pub mod generators;
pub mod loader;
pub mod object;
pub mod tables;
pub mod validator;
pub mod wormhole;

pub use chunk::{Chunk, ChunkGenerator, ObjectCollections};
pub use object::{BackgroundStar, Body, CelestialObject, CometPath, Effects, Orbit, WormholeEnd};
pub use tables::{GenerationConfig, TypeTable, TypeTables, VariantDef};
