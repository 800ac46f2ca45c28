pub mod active;
pub mod chunk_map;
pub mod gravity;
pub mod kinematics;
pub mod manager;
pub mod naming;
pub mod streaming;

#[cfg(test)]
mod scenarios;

pub use active::ActiveObjects;
pub use chunk_map::ChunkMap;
pub use manager::{ChunkDelta, ChunkManager, DiscoveryEvent, RebirthOutcome};
pub use streaming::StreamingPolicy;
