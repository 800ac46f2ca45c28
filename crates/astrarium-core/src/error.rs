use thiserror::Error;

use crate::identity::Category;
use crate::types::ChunkCoord;

/// Errors raised while generating chunks or objects.
///
/// Generation is deterministic, so any of these affects every player at the
/// same coordinate identically and must surface rather than be swallowed.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("type table for {0} has no variants")]
    EmptyTable(Category),

    #[error("type tables failed to load: {0}")]
    TableLoad(String),

    #[error("type tables failed validation: {0}")]
    InvalidTables(String),

    #[error("unknown {category} variant '{name}'")]
    UnknownVariant { category: Category, name: String },

    #[error("{0} objects are not generated on their own")]
    UnsupportedCategory(Category),

    #[error("generated non-finite {field} for {category} in chunk {coord}")]
    NonFinite {
        category: Category,
        field: &'static str,
        coord: ChunkCoord,
    },
}
