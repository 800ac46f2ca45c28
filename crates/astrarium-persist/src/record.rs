use astrarium_core::{Category, ObjectId};
use serde::{Deserialize, Serialize};

/// Discovery metadata for one object, independent of chunk lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    pub id: ObjectId,
    pub category: Category,
    pub discovered: bool,
    pub display_name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// World position at the moment of discovery.
    pub position: [f64; 2],
    /// Seed of the universe the object was found in.
    pub universe_seed: u32,
}

impl DiscoveryRecord {
    pub fn new(
        id: ObjectId,
        display_name: impl Into<String>,
        timestamp_ms: u64,
        position: [f64; 2],
        universe_seed: u32,
    ) -> Self {
        Self {
            category: id.category,
            id,
            discovered: true,
            display_name: display_name.into(),
            timestamp_ms,
            position,
            universe_seed,
        }
    }
}
