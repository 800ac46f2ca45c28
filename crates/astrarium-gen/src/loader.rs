use thiserror::Error;

use crate::tables::{GenerationConfig, TypeTables};

const BUILTIN_TYPES_RON: &str = include_str!("../../../data/celestial_types.ron");
const BUILTIN_GENERATION_RON: &str = include_str!("../../../data/generation.ron");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse type tables RON: {0}")]
    TypeTableParseError(String),
    #[error("Failed to parse generation config RON: {0}")]
    GenerationParseError(String),
}

/// Parse type tables from a RON string.
pub fn load_type_tables_from_str(ron_str: &str) -> Result<TypeTables, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::TypeTableParseError(e.to_string()))
}

/// Parse a generation config from a RON string.
pub fn load_generation_config_from_str(ron_str: &str) -> Result<GenerationConfig, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::GenerationParseError(e.to_string()))
}

/// Type tables shipped with the crate.
pub fn builtin_type_tables() -> Result<TypeTables, LoadError> {
    load_type_tables_from_str(BUILTIN_TYPES_RON)
}

/// Generation config shipped with the crate.
pub fn builtin_generation_config() -> Result<GenerationConfig, LoadError> {
    load_generation_config_from_str(BUILTIN_GENERATION_RON)
}
