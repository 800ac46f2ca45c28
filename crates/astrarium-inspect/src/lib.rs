pub mod inspector;
pub mod report;
pub mod spawner;

pub use inspector::{inspect_region, RegionReport};
pub use spawner::{spawn_object, SpawnError};
